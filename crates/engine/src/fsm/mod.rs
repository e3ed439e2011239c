mod builder;
pub mod gen_mob;
mod runtime;
mod state;

pub use builder::{fix_states, FsmBuilder, UnresolvedStateTarget};
pub use runtime::{go_to_dying_state, run_actions, run_event, set_state};
pub use state::{EventHandler, FsmInstance, FsmTable, MobState, STATE_HISTORY_SIZE};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
