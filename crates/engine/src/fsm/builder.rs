use crate::script::coerce::is_number;
use crate::script::{ActionCall, ActionKind, MobEvent, NativeAction};

use super::state::{EventHandler, MobState};

/// A `set_state` whose target name matches no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedStateTarget {
    pub state: String,
    pub target: String,
}

/// Declares a state graph in code, one state and event at a time.
///
/// ```ignore
/// let mut efc = FsmBuilder::new();
/// efc.new_state("idling", IDLING);
/// efc.new_event(MobEvent::OnEnter);
/// efc.run(start_idling);
/// efc.new_event(MobEvent::Whistled);
/// efc.change_state("called");
/// let states = efc.finish(N_STATES);
/// ```
#[derive(Debug, Default)]
pub struct FsmBuilder {
    states: Vec<MobState>,
    cur_event: Option<MobEvent>,
}

impl FsmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_state(&mut self, name: &str, id: usize) {
        self.states.push(MobState::new(name, id));
        self.cur_event = None;
    }

    pub fn new_event(&mut self, event: MobEvent) {
        let Some(state) = self.states.last_mut() else {
            panic!("new_event({event:?}) called before any new_state");
        };
        state
            .events
            .insert(event, EventHandler::new(event, Vec::new()));
        self.cur_event = Some(event);
    }

    pub fn run(&mut self, code: NativeAction) {
        self.push(ActionCall::native(code));
    }

    pub fn run_call(&mut self, call: ActionCall) {
        self.push(call);
    }

    /// Target names are resolved by [`fix_states`] once every state exists.
    pub fn change_state(&mut self, target: &str) {
        self.push(ActionCall::set_state(target));
    }

    fn push(&mut self, mut call: ActionCall) {
        let (Some(state), Some(event)) = (self.states.last_mut(), self.cur_event) else {
            panic!("action added outside of an event");
        };
        call.parent_event = Some(event);
        if let Some(handler) = state.events.get_mut(&event) {
            handler.actions.push(call);
        }
    }

    /// Returns the states sorted by id. Declaring a different number of
    /// states than the category expects, or ids that do not run from 0
    /// without gaps, is a programming error.
    pub fn finish(mut self, expected_states: usize) -> Vec<MobState> {
        self.states.sort_by_key(|state| state.id);
        assert_eq!(
            self.states.len(),
            expected_states,
            "FSM declares {} states but {} were expected",
            self.states.len(),
            expected_states
        );
        for (idx, state) in self.states.iter().enumerate() {
            assert_eq!(
                state.id, idx,
                "FSM state '{}' has id {} but sits at index {}",
                state.name, state.id, idx
            );
        }
        self.states
    }
}

/// Rewrites every `set_state` name into its state index. Targets that are
/// already numbers are left alone; unknown names become `-1` and are returned.
pub fn fix_states(states: &mut [MobState]) -> Vec<UnresolvedStateTarget> {
    let names: Vec<String> = states.iter().map(|state| state.name.clone()).collect();
    let mut unresolved = Vec::new();
    for state in states.iter_mut() {
        for handler in state.events.values_mut() {
            for call in handler
                .actions
                .iter_mut()
                .filter(|call| call.kind == ActionKind::SetState)
            {
                let target = &call.args[0];
                if is_number(target) && !target.is_empty() {
                    continue;
                }
                match names.iter().position(|name| name == target) {
                    Some(idx) => call.args[0] = idx.to_string(),
                    None => {
                        unresolved.push(UnresolvedStateTarget {
                            state: state.name.clone(),
                            target: target.clone(),
                        });
                        call.args[0] = "-1".to_string();
                    }
                }
            }
        }
    }
    unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob::{MobId, MobWorld};
    use crate::script::EventPayload;

    fn noop(_world: &mut MobWorld, _id: MobId, _payload: &EventPayload) {}

    #[test]
    fn finish_sorts_by_id_and_resolves_forward_targets() {
        let mut efc = FsmBuilder::new();
        efc.new_state("walking", 1);
        efc.new_event(MobEvent::OnEnter);
        efc.run(noop);
        efc.new_event(MobEvent::ReachedDestination);
        efc.change_state("idling");
        efc.new_state("idling", 0);
        efc.new_event(MobEvent::Timer);
        efc.change_state("walking");

        let mut states = efc.finish(2);
        assert_eq!(states[0].name, "idling");
        assert!(fix_states(&mut states).is_empty());

        let walk_target = &states[1].events[&MobEvent::ReachedDestination].actions[0];
        assert_eq!(walk_target.args[0], "0");
        assert_eq!(walk_target.parent_event, Some(MobEvent::ReachedDestination));
        assert_eq!(states[0].events[&MobEvent::Timer].actions[0].args[0], "1");
        assert!(states[1].events[&MobEvent::OnEnter].actions[0].is_native());
    }

    #[test]
    fn unknown_target_is_reported() {
        let mut efc = FsmBuilder::new();
        efc.new_state("idling", 0);
        efc.new_event(MobEvent::Timer);
        efc.change_state("flying");
        let mut states = efc.finish(1);
        let unresolved = fix_states(&mut states);
        assert_eq!(
            unresolved,
            vec![UnresolvedStateTarget {
                state: "idling".to_string(),
                target: "flying".to_string(),
            }]
        );
        assert_eq!(states[0].events[&MobEvent::Timer].actions[0].args[0], "-1");
        assert!(fix_states(&mut states).is_empty());
    }

    #[test]
    #[should_panic(expected = "FSM declares 1 states but 2 were expected")]
    fn state_count_mismatch_panics() {
        let mut efc = FsmBuilder::new();
        efc.new_state("idling", 0);
        efc.finish(2);
    }

    #[test]
    #[should_panic(expected = "FSM state 'walking' has id 0 but sits at index 1")]
    fn duplicate_state_ids_panic() {
        let mut efc = FsmBuilder::new();
        efc.new_state("idling", 0);
        efc.new_state("walking", 0);
        efc.finish(2);
    }
}
