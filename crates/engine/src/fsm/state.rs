use std::collections::BTreeMap;

use crate::script::{ActionCall, MobEvent};

pub const STATE_HISTORY_SIZE: usize = 3;

/// Ordered actions a state runs when it receives one kind of event.
#[derive(Debug, Clone)]
pub struct EventHandler {
    pub event: MobEvent,
    pub actions: Vec<ActionCall>,
}

impl EventHandler {
    pub fn new(event: MobEvent, mut actions: Vec<ActionCall>) -> Self {
        for call in &mut actions {
            call.parent_event = Some(event);
        }
        Self { event, actions }
    }

    /// Adds actions at the front or the back, tagging them with this event.
    pub fn insert_actions(&mut self, actions: Vec<ActionCall>, at_end: bool) {
        let actions = actions.into_iter().map(|mut call| {
            call.parent_event = Some(self.event);
            call
        });
        if at_end {
            self.actions.extend(actions);
        } else {
            self.actions.splice(0..0, actions);
        }
    }
}

#[derive(Debug, Clone)]
pub struct MobState {
    pub name: String,
    pub id: usize,
    pub events: BTreeMap<MobEvent, EventHandler>,
}

impl MobState {
    pub fn new(name: impl Into<String>, id: usize) -> Self {
        Self {
            name: name.into(),
            id,
            events: BTreeMap::new(),
        }
    }

    pub fn event(&self, event: MobEvent) -> Option<&EventHandler> {
        self.events.get(&event)
    }

    pub fn has_event(&self, event: MobEvent) -> bool {
        self.events.contains_key(&event)
    }
}

/// The finished state graph of one mob type. Shared read-only by every mob
/// of that type.
#[derive(Debug, Clone, Default)]
pub struct FsmTable {
    pub states: Vec<MobState>,
    pub first_state: Option<usize>,
    pub dying_state: Option<usize>,
}

impl FsmTable {
    pub fn new(states: Vec<MobState>) -> Self {
        Self {
            states,
            first_state: None,
            dying_state: None,
        }
    }

    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|state| state.name == name)
    }

    pub fn state(&self, idx: usize) -> Option<&MobState> {
        self.states.get(idx)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Per-mob FSM data: where the mob is in its type's table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FsmInstance {
    pub cur_state: Option<usize>,
    /// Most recent first.
    pub prev_state_names: [String; STATE_HISTORY_SIZE],
}

impl FsmInstance {
    pub fn push_history(&mut self, name: impl Into<String>) {
        self.prev_state_names.rotate_right(1);
        self.prev_state_names[0] = name.into();
    }
}
