//! State machines declared in code for the categories whose behavior is
//! built into the game. Scripts loaded afterwards merge into these states.

pub mod drop;
pub mod group_task;
pub mod leader;
pub mod pikmin;
pub mod resource;
pub mod tool;
pub mod track;

use std::sync::Arc;

use engine::fsm::fix_states;
use engine::{FsmTable, MobCategoryId, MobState, MobType};
use tracing::debug;

/// Builds the built-in state machine for the type's category, if it has one.
pub fn create_category_fsm(mob_type: &mut MobType) -> bool {
    match mob_type.category {
        MobCategoryId::Pikmin => pikmin::create_fsm(mob_type),
        MobCategoryId::Leaders => leader::create_fsm(mob_type),
        MobCategoryId::Resources => resource::create_fsm(mob_type),
        MobCategoryId::Drops => drop::create_fsm(mob_type),
        MobCategoryId::Tools => tool::create_fsm(mob_type),
        MobCategoryId::Tracks => track::create_fsm(mob_type),
        MobCategoryId::GroupTasks => group_task::create_fsm(mob_type),
        _ => return false,
    }
    true
}

/// Resolves state names and installs the table on the type. A target that
/// names no state is a bug in the graph above, not in content.
fn install_states(
    mob_type: &mut MobType,
    mut states: Vec<MobState>,
    first_state: &str,
    dying_state: Option<&str>,
) {
    let unresolved = fix_states(&mut states);
    assert!(
        unresolved.is_empty(),
        "{} FSM has unresolved targets: {unresolved:?}",
        mob_type.category.internal_name()
    );

    let mut table = FsmTable::new(states);
    table.first_state = table.state_index(first_state);
    table.dying_state = dying_state.and_then(|name| table.state_index(name));
    mob_type.script.first_state = first_state.to_string();
    mob_type.script.dying_state = dying_state.unwrap_or_default().to_string();

    debug!(
        mob_type = %mob_type.name,
        category = mob_type.category.internal_name(),
        states = table.len(),
        "category_fsm_built"
    );
    mob_type.fsm = Arc::new(table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_categories_have_no_built_in_fsm() {
        let mut enemy = MobType::new("Bulborb", MobCategoryId::Enemies);
        assert!(!create_category_fsm(&mut enemy));
        assert!(enemy.fsm.is_empty());
    }

    #[test]
    fn every_built_in_category_gets_a_first_state() {
        for category in [
            MobCategoryId::Pikmin,
            MobCategoryId::Leaders,
            MobCategoryId::Resources,
            MobCategoryId::Drops,
            MobCategoryId::Tools,
            MobCategoryId::Tracks,
            MobCategoryId::GroupTasks,
        ] {
            let mut mob_type = MobType::new("Thing", category);
            assert!(create_category_fsm(&mut mob_type));
            let first = mob_type.fsm.first_state.expect("first state");
            assert_eq!(
                mob_type.fsm.state(first).map(|state| state.name.as_str()),
                Some(mob_type.script.first_state.as_str())
            );
        }
    }

    #[test]
    fn pikmin_fsm_has_every_state_and_a_dying_state() {
        let mut mob_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
        pikmin::create_fsm(&mut mob_type);
        assert_eq!(mob_type.fsm.len(), pikmin::N_STATES);
        assert_eq!(mob_type.fsm.dying_state, Some(pikmin::DYING));
        assert_eq!(mob_type.fsm.first_state, Some(pikmin::IDLING));
        assert!(mob_type.status_gain_hook.is_some());
    }
}
