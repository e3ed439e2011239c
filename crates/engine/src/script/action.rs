use std::collections::HashMap;

use crate::mob::{ContentCatalog, MobId, MobType, MobWorld};

use super::call::{ActionCall, ActionParseError};
use super::event::{EventPayload, MobEvent};
use super::{loaders, runners};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    AddHealth,
    Calculate,
    Delete,
    Else,
    EndIf,
    FinishDying,
    Focus,
    GetAngle,
    GetAreaInfo,
    GetChomped,
    GetCoordinatesFromAngle,
    GetDistance,
    GetEventInfo,
    GetFloorZ,
    GetFocusVar,
    GetMobInfo,
    GetRandomFloat,
    GetRandomInt,
    Goto,
    HoldFocusedMob,
    If,
    Label,
    LinkWithFocusedMob,
    LoadFocusedMobMemory,
    MoveToAbsolute,
    MoveToRelative,
    MoveToTarget,
    OrderRelease,
    Print,
    ReceiveStatus,
    Release,
    RemoveStatus,
    SaveFocusedMobMemory,
    SendMessageToFocus,
    SendMessageToLinks,
    SendMessageToNearby,
    SetAnimation,
    SetFarReach,
    SetFlying,
    SetGravity,
    SetHealth,
    SetHeight,
    SetHiding,
    SetHoldable,
    SetHuntable,
    SetNearReach,
    SetRadius,
    SetState,
    SetTangible,
    SetTeam,
    SetTimer,
    SetVar,
    Spawn,
    StabilizeZ,
    StartChomping,
    StartDying,
    StartParticles,
    Stop,
    StopChomping,
    StopParticles,
    StopVertically,
    Swallow,
    SwallowAll,
    TeleportToAbsolute,
    TeleportToRelative,
    ThrowFocusedMob,
    TurnToAbsolute,
    TurnToRelative,
    TurnToTarget,
    /// Category code injected by an FSM builder rather than parsed from text.
    Native,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Int,
    Float,
    Bool,
    String,
    Enum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionParam {
    pub name: &'static str,
    pub param_type: ParamType,
    /// Variables (`$name`) are rejected for this parameter.
    pub force_const: bool,
    /// This parameter absorbs any number of trailing arguments.
    pub is_extras: bool,
}

/// Everything a runner gets when its call executes.
pub struct ActionRunData<'a> {
    pub world: &'a mut MobWorld,
    pub mob: MobId,
    pub args: Vec<String>,
    pub payload: &'a EventPayload,
    pub parent_event: Option<MobEvent>,
    pub return_value: bool,
}

pub type ActionRunner = fn(&mut ActionRunData<'_>);

/// Category FSM code, run with the mob and the event payload.
pub type NativeAction = fn(&mut MobWorld, MobId, &EventPayload);

/// What load-time hooks may consult when resolving names to indexes.
pub struct ActionLoadContext<'a> {
    pub mob_type: &'a MobType,
    pub catalog: &'a ContentCatalog,
}

pub type ActionLoader = fn(&mut ActionCall, &ActionLoadContext<'_>) -> Result<(), ActionParseError>;

#[derive(Debug, Clone)]
pub struct MobAction {
    pub kind: ActionKind,
    pub name: &'static str,
    pub params: Vec<ActionParam>,
    pub runner: Option<ActionRunner>,
    pub loader: Option<ActionLoader>,
}

impl MobAction {
    /// Parameters that every call must supply.
    pub fn mandatory_params(&self) -> usize {
        match self.params.last() {
            Some(last) if last.is_extras => self.params.len() - 1,
            _ => self.params.len(),
        }
    }

    pub fn has_extras(&self) -> bool {
        self.params.last().is_some_and(|param| param.is_extras)
    }
}

/// Table of every script verb, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<MobAction>,
    ids_by_name: HashMap<&'static str, usize>,
}

impl ActionRegistry {
    pub fn with_builtin_actions() -> Self {
        let mut registry = Self::default();
        register_builtin_actions(&mut registry);
        registry
    }

    pub fn register(
        &mut self,
        kind: ActionKind,
        name: &'static str,
        runner: Option<ActionRunner>,
        loader: Option<ActionLoader>,
        params: Vec<ActionParam>,
    ) {
        let action = MobAction {
            kind,
            name,
            params,
            runner,
            loader,
        };
        match self.ids_by_name.get(name) {
            Some(idx) => self.actions[*idx] = action,
            None => {
                self.ids_by_name.insert(name, self.actions.len());
                self.actions.push(action);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MobAction> {
        self.ids_by_name.get(name).map(|idx| &self.actions[*idx])
    }

    pub fn actions(&self) -> &[MobAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn param(name: &'static str, param_type: ParamType, force_const: bool, is_extras: bool) -> ActionParam {
    ActionParam {
        name,
        param_type,
        force_const,
        is_extras,
    }
}

fn register_builtin_actions(reg: &mut ActionRegistry) {
    use ActionKind as K;
    use ParamType::{Bool, Enum, Float, Int, String as Str};

    reg.register(
        K::AddHealth,
        "add_health",
        Some(runners::add_health),
        None,
        vec![param("amount", Float, false, false)],
    );
    reg.register(
        K::Calculate,
        "calculate",
        Some(runners::calculate),
        Some(loaders::calculate),
        vec![
            param("destination var name", Str, true, false),
            param("operand", Float, false, false),
            param("operation", Enum, true, false),
            param("operand", Float, false, false),
        ],
    );
    reg.register(K::Delete, "delete", Some(runners::delete), None, vec![]);
    reg.register(K::Else, "else", None, None, vec![]);
    reg.register(K::EndIf, "end_if", None, None, vec![]);
    reg.register(
        K::FinishDying,
        "finish_dying",
        Some(runners::finish_dying),
        None,
        vec![],
    );
    reg.register(
        K::Focus,
        "focus",
        Some(runners::focus),
        Some(loaders::focus),
        vec![param("target", Enum, true, false)],
    );
    reg.register(
        K::GetAngle,
        "get_angle",
        Some(runners::get_angle),
        None,
        vec![
            param("destination var name", Str, true, false),
            param("center x", Float, false, false),
            param("center y", Float, false, false),
            param("target x", Float, false, false),
            param("target y", Float, false, false),
        ],
    );
    reg.register(
        K::GetAreaInfo,
        "get_area_info",
        Some(runners::get_area_info),
        Some(loaders::get_area_info),
        vec![
            param("destination var name", Str, true, false),
            param("info", Str, true, false),
        ],
    );
    reg.register(
        K::GetChomped,
        "get_chomped",
        Some(runners::get_chomped),
        None,
        vec![],
    );
    reg.register(
        K::GetCoordinatesFromAngle,
        "get_coordinates_from_angle",
        Some(runners::get_coordinates_from_angle),
        None,
        vec![
            param("x destination var name", Str, true, false),
            param("y destination var name", Str, true, false),
            param("angle", Float, false, false),
            param("distance", Float, false, false),
        ],
    );
    reg.register(
        K::GetDistance,
        "get_distance",
        Some(runners::get_distance),
        None,
        vec![
            param("destination var name", Str, true, false),
            param("center x", Float, false, false),
            param("center y", Float, false, false),
            param("target x", Float, false, false),
            param("target y", Float, false, false),
        ],
    );
    reg.register(
        K::GetEventInfo,
        "get_event_info",
        Some(runners::get_event_info),
        Some(loaders::get_event_info),
        vec![
            param("destination var name", Str, true, false),
            param("info", Str, true, false),
        ],
    );
    reg.register(
        K::GetFloorZ,
        "get_floor_z",
        Some(runners::get_floor_z),
        None,
        vec![
            param("destination var name", Str, true, false),
            param("x", Float, false, false),
            param("y", Float, false, false),
        ],
    );
    reg.register(
        K::GetFocusVar,
        "get_focus_var",
        Some(runners::get_focus_var),
        None,
        vec![
            param("destination var name", Str, true, false),
            param("focused mob's var name", Str, true, false),
        ],
    );
    reg.register(
        K::GetMobInfo,
        "get_mob_info",
        Some(runners::get_mob_info),
        Some(loaders::get_mob_info),
        vec![
            param("destination var name", Str, true, false),
            param("target", Str, true, false),
            param("info", Str, true, false),
        ],
    );
    reg.register(
        K::GetRandomFloat,
        "get_random_float",
        Some(runners::get_random_float),
        None,
        vec![
            param("destination var name", Str, true, false),
            param("minimum value", Float, false, false),
            param("maximum value", Float, false, false),
        ],
    );
    reg.register(
        K::GetRandomInt,
        "get_random_int",
        Some(runners::get_random_int),
        None,
        vec![
            param("destination var name", Str, true, false),
            param("minimum value", Int, false, false),
            param("maximum value", Int, false, false),
        ],
    );
    reg.register(
        K::Goto,
        "goto",
        None,
        None,
        vec![param("label name", Str, true, false)],
    );
    reg.register(
        K::HoldFocusedMob,
        "hold_focused_mob",
        Some(runners::hold_focused_mob),
        Some(loaders::hold_focused_mob),
        vec![
            param("body part name", Enum, true, false),
            param("hold above", Bool, false, true),
        ],
    );
    reg.register(
        K::If,
        "if",
        Some(runners::if_function),
        Some(loaders::if_function),
        vec![
            param("comparand", Str, false, false),
            param("operation", Enum, true, false),
            param("value", Str, false, true),
        ],
    );
    reg.register(
        K::Label,
        "label",
        None,
        None,
        vec![param("label name", Str, true, false)],
    );
    reg.register(
        K::LinkWithFocusedMob,
        "link_with_focused_mob",
        Some(runners::link_with_focused_mob),
        None,
        vec![],
    );
    reg.register(
        K::LoadFocusedMobMemory,
        "load_focused_mob_memory",
        Some(runners::load_focused_mob_memory),
        None,
        vec![param("slot", Int, false, false)],
    );
    reg.register(
        K::MoveToAbsolute,
        "move_to_absolute",
        Some(runners::move_to_absolute),
        None,
        vec![
            param("x", Float, false, false),
            param("y", Float, false, false),
            param("z", Float, false, true),
        ],
    );
    reg.register(
        K::MoveToRelative,
        "move_to_relative",
        Some(runners::move_to_relative),
        None,
        vec![
            param("x", Float, false, false),
            param("y", Float, false, false),
            param("z", Float, false, true),
        ],
    );
    reg.register(
        K::MoveToTarget,
        "move_to_target",
        Some(runners::move_to_target),
        Some(loaders::move_to_target),
        vec![param("target", Enum, true, false)],
    );
    reg.register(
        K::OrderRelease,
        "order_release",
        Some(runners::order_release),
        None,
        vec![],
    );
    reg.register(
        K::Print,
        "print",
        Some(runners::print),
        None,
        vec![param("text", Str, false, true)],
    );
    reg.register(
        K::ReceiveStatus,
        "receive_status",
        Some(runners::receive_status),
        Some(loaders::receive_status),
        vec![param("status name", Enum, true, false)],
    );
    reg.register(K::Release, "release", Some(runners::release), None, vec![]);
    reg.register(
        K::RemoveStatus,
        "remove_status",
        Some(runners::remove_status),
        Some(loaders::remove_status),
        vec![param("status name", Enum, true, false)],
    );
    reg.register(
        K::SaveFocusedMobMemory,
        "save_focused_mob_memory",
        Some(runners::save_focused_mob_memory),
        None,
        vec![param("slot", Int, false, false)],
    );
    reg.register(
        K::SendMessageToFocus,
        "send_message_to_focus",
        Some(runners::send_message_to_focus),
        None,
        vec![param("message", Str, false, false)],
    );
    reg.register(
        K::SendMessageToLinks,
        "send_message_to_links",
        Some(runners::send_message_to_links),
        None,
        vec![param("message", Str, false, false)],
    );
    reg.register(
        K::SendMessageToNearby,
        "send_message_to_nearby",
        Some(runners::send_message_to_nearby),
        None,
        vec![
            param("distance", Float, false, false),
            param("message", Str, false, false),
        ],
    );
    reg.register(
        K::SetAnimation,
        "set_animation",
        Some(runners::set_animation),
        Some(loaders::set_animation),
        vec![
            param("animation name", Str, true, false),
            param("options", Enum, true, true),
        ],
    );
    reg.register(
        K::SetFarReach,
        "set_far_reach",
        Some(runners::set_far_reach),
        Some(loaders::set_reach),
        vec![param("reach name", Enum, true, false)],
    );
    reg.register(
        K::SetFlying,
        "set_flying",
        Some(runners::set_flying),
        None,
        vec![param("flying", Bool, false, false)],
    );
    reg.register(
        K::SetGravity,
        "set_gravity",
        Some(runners::set_gravity),
        None,
        vec![param("multiplier", Float, false, false)],
    );
    reg.register(
        K::SetHealth,
        "set_health",
        Some(runners::set_health),
        None,
        vec![param("amount", Float, false, false)],
    );
    reg.register(
        K::SetHeight,
        "set_height",
        Some(runners::set_height),
        None,
        vec![param("height", Float, false, false)],
    );
    reg.register(
        K::SetHiding,
        "set_hiding",
        Some(runners::set_hiding),
        None,
        vec![param("hiding", Bool, false, false)],
    );
    reg.register(
        K::SetHoldable,
        "set_holdable",
        Some(runners::set_holdable),
        Some(loaders::set_holdable),
        vec![param("options", Enum, true, true)],
    );
    reg.register(
        K::SetHuntable,
        "set_huntable",
        Some(runners::set_huntable),
        None,
        vec![param("huntable", Bool, false, false)],
    );
    reg.register(
        K::SetNearReach,
        "set_near_reach",
        Some(runners::set_near_reach),
        Some(loaders::set_reach),
        vec![param("reach name", Enum, true, false)],
    );
    reg.register(
        K::SetRadius,
        "set_radius",
        Some(runners::set_radius),
        None,
        vec![param("radius", Float, false, false)],
    );
    reg.register(
        K::SetState,
        "set_state",
        Some(runners::set_state),
        None,
        vec![param("state name", Str, true, false)],
    );
    reg.register(
        K::SetTangible,
        "set_tangible",
        Some(runners::set_tangible),
        None,
        vec![param("tangible", Bool, false, false)],
    );
    reg.register(
        K::SetTeam,
        "set_team",
        Some(runners::set_team),
        Some(loaders::set_team),
        vec![param("team name", Enum, true, false)],
    );
    reg.register(
        K::SetTimer,
        "set_timer",
        Some(runners::set_timer),
        None,
        vec![param("time", Float, false, false)],
    );
    reg.register(
        K::SetVar,
        "set_var",
        Some(runners::set_var),
        None,
        vec![
            param("destination var name", Str, true, false),
            param("value", Str, false, false),
        ],
    );
    reg.register(
        K::Spawn,
        "spawn",
        Some(runners::spawn),
        Some(loaders::spawn),
        vec![param("spawn data", Enum, true, false)],
    );
    reg.register(
        K::StabilizeZ,
        "stabilize_z",
        Some(runners::stabilize_z),
        Some(loaders::stabilize_z),
        vec![
            param("reference", Enum, true, false),
            param("offset", Float, false, false),
        ],
    );
    reg.register(
        K::StartChomping,
        "start_chomping",
        Some(runners::start_chomping),
        Some(loaders::start_chomping),
        vec![
            param("victim max", Int, false, false),
            param("body part", Enum, true, false),
            param("more body parts", Enum, true, true),
        ],
    );
    reg.register(
        K::StartDying,
        "start_dying",
        Some(runners::start_dying),
        None,
        vec![],
    );
    reg.register(
        K::StartParticles,
        "start_particles",
        Some(runners::start_particles),
        Some(loaders::start_particles),
        vec![
            param("generator name", Enum, true, false),
            param("offset coordinates", Float, false, true),
        ],
    );
    reg.register(K::Stop, "stop", Some(runners::stop), None, vec![]);
    reg.register(
        K::StopChomping,
        "stop_chomping",
        Some(runners::stop_chomping),
        None,
        vec![],
    );
    reg.register(
        K::StopParticles,
        "stop_particles",
        Some(runners::stop_particles),
        None,
        vec![],
    );
    reg.register(
        K::StopVertically,
        "stop_vertically",
        Some(runners::stop_vertically),
        None,
        vec![],
    );
    reg.register(
        K::Swallow,
        "swallow",
        Some(runners::swallow),
        None,
        vec![param("amount", Int, false, false)],
    );
    reg.register(
        K::SwallowAll,
        "swallow_all",
        Some(runners::swallow_all),
        None,
        vec![],
    );
    reg.register(
        K::TeleportToAbsolute,
        "teleport_to_absolute",
        Some(runners::teleport_to_absolute),
        None,
        vec![
            param("x", Float, false, false),
            param("y", Float, false, false),
            param("z", Float, false, false),
        ],
    );
    reg.register(
        K::TeleportToRelative,
        "teleport_to_relative",
        Some(runners::teleport_to_relative),
        None,
        vec![
            param("x", Float, false, false),
            param("y", Float, false, false),
            param("z", Float, false, false),
        ],
    );
    reg.register(
        K::ThrowFocusedMob,
        "throw_focused_mob",
        Some(runners::throw_focused_mob),
        None,
        vec![
            param("x coordinate", Float, false, false),
            param("y coordinate", Float, false, false),
            param("z coordinate", Float, false, false),
            param("max height", Float, false, false),
        ],
    );
    reg.register(
        K::TurnToAbsolute,
        "turn_to_absolute",
        Some(runners::turn_to_absolute),
        None,
        vec![
            param("angle or x coordinate", Float, false, false),
            param("y coordinate", Float, false, true),
        ],
    );
    reg.register(
        K::TurnToRelative,
        "turn_to_relative",
        Some(runners::turn_to_relative),
        None,
        vec![
            param("angle or x coordinate", Float, false, false),
            param("y coordinate", Float, false, true),
        ],
    );
    reg.register(
        K::TurnToTarget,
        "turn_to_target",
        Some(runners::turn_to_target),
        Some(loaders::turn_to_target),
        vec![param("target", Enum, true, false)],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_knows_every_script_verb() {
        let registry = ActionRegistry::with_builtin_actions();
        assert_eq!(registry.len(), 69);
        assert!(registry.get("set_state").is_some());
        assert!(registry.get("explode").is_none());
    }

    #[test]
    fn extras_parameter_is_not_mandatory() {
        let registry = ActionRegistry::with_builtin_actions();
        let if_action = registry.get("if").expect("if");
        assert_eq!(if_action.mandatory_params(), 2);
        assert!(if_action.has_extras());
        let set_var = registry.get("set_var").expect("set_var");
        assert_eq!(set_var.mandatory_params(), 2);
        assert!(!set_var.has_extras());
    }
}
