use std::sync::Arc;

use tracing::{debug, warn};

use crate::mob::{MobId, MobWorld};
use crate::script::{ActionCall, ActionKind, EventPayload, MobEvent};

/// Runs the current state's handler for `event`, if it has one.
///
/// Handlers may raise further events on the same mob, including state
/// changes; each nested call sees whatever state is current when it starts.
pub fn run_event(world: &mut MobWorld, id: MobId, event: MobEvent, payload: &EventPayload) {
    let Some(mob) = world.mob(id) else {
        return;
    };
    let Some(cur_state) = mob.fsm.cur_state else {
        return;
    };
    let mob_type = Arc::clone(&mob.mob_type);
    let parent = mob.parent;
    let Some(handler) = mob_type
        .fsm
        .state(cur_state)
        .and_then(|state| state.event(event))
    else {
        return;
    };

    if let Some(parent) = parent.filter(|parent| parent.relay_events) {
        run_event(world, parent.mob, event, payload);
        if !parent.handle_events {
            return;
        }
    }

    run_actions(world, id, &handler.actions, payload);
}

/// Executes an action list with `if`/`else`/`end_if` and `goto`/`label`
/// control flow. A `set_state` ends the list.
pub fn run_actions(world: &mut MobWorld, id: MobId, actions: &[ActionCall], payload: &EventPayload) {
    let mut a = 0;
    while a < actions.len() {
        let call = &actions[a];
        match call.kind {
            ActionKind::If => {
                if !call.run(world, id, payload) {
                    a = branch_end(actions, a + 1, true);
                }
            }
            ActionKind::Else => {
                a = branch_end(actions, a + 1, false);
            }
            ActionKind::Goto => {
                if let Some(label) = actions
                    .iter()
                    .position(|other| other.kind == ActionKind::Label && other.args[0] == call.args[0])
                {
                    a = label;
                }
            }
            ActionKind::EndIf | ActionKind::Label => {}
            ActionKind::SetState => {
                call.run(world, id, payload);
                return;
            }
            _ => {
                call.run(world, id, payload);
            }
        }
        a += 1;
    }
}

/// Index of the `else` (if allowed) or `end_if` that closes the branch
/// starting at `from`, or the list length if there is none.
fn branch_end(actions: &[ActionCall], from: usize, stop_at_else: bool) -> usize {
    let mut depth = 0usize;
    for (idx, call) in actions.iter().enumerate().skip(from) {
        match call.kind {
            ActionKind::If => depth += 1,
            ActionKind::Else if stop_at_else && depth == 0 => return idx,
            ActionKind::EndIf if depth == 0 => return idx,
            ActionKind::EndIf => depth -= 1,
            _ => {}
        }
    }
    actions.len()
}

/// Moves a mob to state `target`: `ON_LEAVE` runs on the old state, then
/// `ON_ENTER` on the new one. Returns false and changes nothing if `target`
/// is not a state of the mob's type.
pub fn set_state(world: &mut MobWorld, id: MobId, target: usize, payload: &EventPayload) -> bool {
    let Some(mob) = world.mob(id) else {
        return false;
    };
    let mob_type = Arc::clone(&mob.mob_type);
    let Some(new_state) = mob_type.fsm.state(target) else {
        warn!(
            mob = id.0,
            mob_type = %mob_type.name,
            target,
            "invalid_state_change"
        );
        return false;
    };

    let prev_name = mob
        .fsm
        .cur_state
        .and_then(|idx| mob_type.fsm.state(idx))
        .map(|state| state.name.clone());
    if let Some(prev_name) = &prev_name {
        if let Some(mob) = world.mob_mut(id) {
            mob.fsm.push_history(prev_name.clone());
        }
        run_event(world, id, MobEvent::OnLeave, payload);
    }

    let Some(mob) = world.mob_mut(id) else {
        return false;
    };
    mob.fsm.cur_state = Some(target);
    debug!(
        mob = id.0,
        from = prev_name.as_deref().unwrap_or("none"),
        to = %new_state.name,
        "mob_state_changed"
    );

    run_event(world, id, MobEvent::OnEnter, payload);
    true
}

/// Moves a mob to its type's dying state, if the type has one.
pub fn go_to_dying_state(world: &mut MobWorld, id: MobId, payload: &EventPayload) -> bool {
    let dying = world.mob(id).and_then(|mob| mob.mob_type.fsm.dying_state);
    match dying {
        Some(dying) => set_state(world, id, dying, payload),
        None => false,
    }
}
