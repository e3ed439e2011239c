use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::fsm::{fix_states, gen_mob, EventHandler, FsmTable, MobState};
use crate::mob::{ContentCatalog, MobType};
use crate::script::{
    assert_actions, ActionCall, ActionLoadContext, ActionRegistry, MobEvent, NativeAction,
};

use super::diagnostics::{ScriptDiagnostic, ScriptDiagnostics, ScriptErrorCode, SourceLocation};
use super::mob_type_xml::{EventDef, ScriptDef, StateDef};

/// Event handlers read from one `<state>` or the `<global>` block.
struct LoadedEvent {
    event: MobEvent,
    actions: Vec<ActionCall>,
    custom_actions_after: bool,
    global_actions_after: bool,
}

struct ScriptLoader<'a> {
    registry: &'a ActionRegistry,
    ctx: ActionLoadContext<'a>,
    file_path: &'a Path,
    diagnostics: &'a mut ScriptDiagnostics,
}

impl ScriptLoader<'_> {
    fn report(&mut self, code: ScriptErrorCode, message: String, location: Option<SourceLocation>) {
        self.diagnostics.push(ScriptDiagnostic {
            code,
            message,
            mob_type: self.ctx.mob_type.name.clone(),
            file_path: self.file_path.to_path_buf(),
            location,
        });
    }

    fn load_events(&mut self, defs: &[EventDef]) -> Vec<LoadedEvent> {
        let mut loaded = Vec::with_capacity(defs.len());
        for def in defs {
            let Some(event) = MobEvent::from_script_name(&def.name) else {
                self.report(
                    ScriptErrorCode::UnknownEvent,
                    format!("unknown script event name \"{}\"", def.name),
                    Some(def.location),
                );
                continue;
            };
            let actions = self.load_actions(def);
            for error in assert_actions(&actions) {
                self.report(
                    ScriptErrorCode::InvalidActionStructure,
                    format!("{} in <{}>", error, def.name),
                    Some(def.location),
                );
            }
            loaded.push(LoadedEvent {
                event,
                actions,
                custom_actions_after: def.custom_actions_after,
                global_actions_after: def.global_actions_after,
            });
        }
        loaded
    }

    fn load_actions(&mut self, def: &EventDef) -> Vec<ActionCall> {
        let mut actions = Vec::with_capacity(def.lines.len());
        for line in &def.lines {
            match ActionCall::parse(self.registry, &line.text, &self.ctx) {
                Ok(call) => actions.push(call),
                Err(error) => self.report(
                    ScriptErrorCode::InvalidAction,
                    error.to_string(),
                    Some(line.location),
                ),
            }
        }
        actions
    }
}

/// Loads a mob type's script on top of whatever states its category
/// already declared in code.
///
/// Scripted states with new names are appended. Handlers for events a state
/// already has are merged in front of the existing actions, or after them
/// when the event node says `custom_actions_after`. Every problem becomes a
/// diagnostic and loading carries on with what is left.
pub fn load_script(
    mob_type: &mut MobType,
    script: &ScriptDef,
    registry: &ActionRegistry,
    catalog: &ContentCatalog,
    diagnostics: &mut ScriptDiagnostics,
) {
    apply_settings(mob_type, script);

    let mut states = mob_type.fsm.states.clone();
    for def in &script.states {
        if !states.iter().any(|state| state.name == def.name) {
            let id = states.len();
            states.push(MobState::new(def.name.clone(), id));
        }
    }

    let before = diagnostics.len();
    let mut loader = ScriptLoader {
        registry,
        ctx: ActionLoadContext {
            mob_type,
            catalog,
        },
        file_path: &script.file_path,
        diagnostics: &mut *diagnostics,
    };
    let global = loader.load_events(&script.global);
    for def in &script.states {
        let Some(state) = states.iter_mut().find(|state| state.name == def.name) else {
            continue;
        };
        load_state(&mut loader, mob_type, state, def, &global);
    }

    for unresolved in fix_states(&mut states) {
        loader.report(
            ScriptErrorCode::UnknownStateTarget,
            format!(
                "state \"{}\" changes to unknown state \"{}\"",
                unresolved.state, unresolved.target
            ),
            script
                .states
                .iter()
                .find(|def| def.name == unresolved.state)
                .map(|def| def.location),
        );
    }

    let mut table = FsmTable::new(states);
    table.first_state = mob_type.fsm.first_state;
    table.dying_state = mob_type.fsm.dying_state;
    if !mob_type.script.first_state.is_empty() {
        table.first_state = table.state_index(&mob_type.script.first_state);
        if table.first_state.is_none() {
            loader.report(
                ScriptErrorCode::UnknownInitialState,
                format!("unknown initial state \"{}\"", mob_type.script.first_state),
                None,
            );
        }
    }
    if !mob_type.script.dying_state.is_empty() {
        table.dying_state = table.state_index(&mob_type.script.dying_state);
        if table.dying_state.is_none() {
            loader.report(
                ScriptErrorCode::UnknownDyingState,
                format!("unknown dying state \"{}\"", mob_type.script.dying_state),
                None,
            );
        }
    }

    debug!(
        mob_type = %mob_type.name,
        states = table.len(),
        diagnostics = diagnostics.len() - before,
        "script_loaded"
    );
    mob_type.fsm = Arc::new(table);
}

fn apply_settings(mob_type: &mut MobType, script: &ScriptDef) {
    let settings = &mut mob_type.script;
    if let Some(initial) = &script.initial_state {
        settings.first_state = initial.clone();
    }
    if let Some(dying) = &script.dying_state {
        settings.dying_state = dying.clone();
    }
    settings
        .states_ignoring_death
        .extend(script.states_ignoring_death.iter().cloned());
    settings
        .states_ignoring_spray
        .extend(script.states_ignoring_spray.iter().cloned());
    settings
        .states_ignoring_hazard
        .extend(script.states_ignoring_hazard.iter().cloned());
}

fn load_state(
    loader: &mut ScriptLoader<'_>,
    mob_type: &MobType,
    state: &mut MobState,
    def: &StateDef,
    global: &[LoadedEvent],
) {
    if def.events.is_empty() && global.is_empty() {
        return;
    }

    let mut new_events = loader.load_events(&def.events);

    for global_event in global {
        match new_events
            .iter_mut()
            .find(|loaded| loaded.event == global_event.event)
        {
            Some(loaded) => {
                let actions = global_event.actions.iter().cloned();
                if global_event.global_actions_after || loaded.global_actions_after {
                    loaded.actions.extend(actions);
                } else {
                    loaded.actions.splice(0..0, actions);
                }
            }
            None => new_events.push(LoadedEvent {
                event: global_event.event,
                actions: global_event.actions.clone(),
                custom_actions_after: false,
                global_actions_after: false,
            }),
        }
    }

    let settings = &mob_type.script;
    let ignores = |list: &[String]| list.iter().any(|name| *name == state.name);
    let mut injected: Vec<(MobEvent, NativeAction)> = vec![(
        MobEvent::HitboxTouchNA,
        gen_mob::be_attacked as NativeAction,
    )];
    if !settings.dying_state.is_empty()
        && settings.dying_state != state.name
        && !ignores(&settings.states_ignoring_death)
    {
        injected.push((MobEvent::ZeroHealth, gen_mob::go_to_dying_state));
    }
    injected.push((MobEvent::BottomlessPit, gen_mob::fall_down_pit));
    if !ignores(&settings.states_ignoring_spray) {
        injected.push((MobEvent::TouchedSpray, gen_mob::touch_spray));
    }
    if !ignores(&settings.states_ignoring_hazard) {
        injected.push((MobEvent::TouchedHazard, gen_mob::touch_hazard));
    }
    for (event, code) in injected {
        let defined = state.has_event(event) || new_events.iter().any(|e| e.event == event);
        if !defined {
            new_events.push(LoadedEvent {
                event,
                actions: vec![ActionCall::native(code)],
                custom_actions_after: false,
                global_actions_after: false,
            });
        }
    }

    for loaded in new_events {
        match state.events.get_mut(&loaded.event) {
            Some(handler) => handler.insert_actions(loaded.actions, loaded.custom_actions_after),
            None => {
                state
                    .events
                    .insert(loaded.event, EventHandler::new(loaded.event, loaded.actions));
            }
        }
    }
}
