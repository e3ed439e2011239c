use serde::Serialize;

use crate::mob::{MobId, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MobEvent {
    OnEnter,
    OnLeave,
    OnTick,
    OnReady,
    AnimationEnd,
    BottomlessPit,
    Damage,
    FarFromHome,
    FocusDied,
    FocusOffReach,
    FrameSignal,
    Held,
    HitboxTouchEat,
    InputReceived,
    Itch,
    LeftHazard,
    ObjectInReach,
    OpponentInReach,
    ThrownPikminLanded,
    ReachedDestination,
    ReceiveMessage,
    Released,
    RiderAdded,
    RiderRemoved,
    Swallowed,
    TouchedActiveLeader,
    TouchedHazard,
    TouchedSpray,
    TouchedObject,
    TouchedOpponent,
    TouchedWall,
    Timer,
    WeightAdded,
    WeightRemoved,
    Plucked,
    GrabbedByFriend,
    Dismissed,
    Thrown,
    Landed,
    ReleaseOrder,
    Whistled,
    SpotIsFar,
    SwarmStarted,
    SwarmEnded,
    GoToOnion,
    FinishedTask,
    NearCarriableObject,
    NearTool,
    NearGroupTask,
    HitboxTouchAN,
    HitboxTouchNA,
    HitboxTouchNN,
    PikminDamageConfirmed,
    CarrierAdded,
    CarrierRemoved,
    CarryBeginMove,
    CarryStopMove,
    CarryDelivered,
    PathBlocked,
    PathsChanged,
    FocusedMobUnavailable,
    StartedReceivingDelivery,
    FinishedReceivingDelivery,
    TouchedDrop,
    TouchedTrack,
    TouchedBouncer,
    ZeroHealth,
    LeaderActivated,
    LeaderInactivated,
    LeaderMoveStart,
    LeaderMoveEnd,
    LeaderHolding,
    LeaderThrow,
    LeaderStartWhistle,
    LeaderStopWhistle,
    LeaderDismiss,
}

const SCRIPT_EVENT_NAMES: &[(&str, MobEvent)] = &[
    ("on_enter", MobEvent::OnEnter),
    ("on_leave", MobEvent::OnLeave),
    ("on_tick", MobEvent::OnTick),
    ("on_ready", MobEvent::OnReady),
    ("on_animation_end", MobEvent::AnimationEnd),
    ("on_damage", MobEvent::Damage),
    ("on_far_from_home", MobEvent::FarFromHome),
    (
        "on_finish_receiving_delivery",
        MobEvent::FinishedReceivingDelivery,
    ),
    ("on_focus_off_reach", MobEvent::FocusOffReach),
    ("on_frame_signal", MobEvent::FrameSignal),
    ("on_held", MobEvent::Held),
    ("on_hitbox_touch_eat", MobEvent::HitboxTouchEat),
    ("on_hitbox_touch_a_n", MobEvent::HitboxTouchAN),
    ("on_hitbox_touch_n_n", MobEvent::HitboxTouchNN),
    ("on_input_received", MobEvent::InputReceived),
    ("on_itch", MobEvent::Itch),
    ("on_land", MobEvent::Landed),
    ("on_leave_hazard", MobEvent::LeftHazard),
    ("on_object_in_reach", MobEvent::ObjectInReach),
    ("on_opponent_in_reach", MobEvent::OpponentInReach),
    ("on_pikmin_land", MobEvent::ThrownPikminLanded),
    ("on_receive_message", MobEvent::ReceiveMessage),
    ("on_released", MobEvent::Released),
    ("on_reach_destination", MobEvent::ReachedDestination),
    (
        "on_start_receiving_delivery",
        MobEvent::StartedReceivingDelivery,
    ),
    ("on_swallowed", MobEvent::Swallowed),
    ("on_timer", MobEvent::Timer),
    ("on_touch_hazard", MobEvent::TouchedHazard),
    ("on_touch_object", MobEvent::TouchedObject),
    ("on_touch_opponent", MobEvent::TouchedOpponent),
    ("on_touch_wall", MobEvent::TouchedWall),
    ("on_weight_added", MobEvent::WeightAdded),
    ("on_weight_removed", MobEvent::WeightRemoved),
];

impl MobEvent {
    /// Event for a script event node name such as `on_enter`.
    pub fn from_script_name(name: &str) -> Option<Self> {
        SCRIPT_EVENT_NAMES
            .iter()
            .find(|(script_name, _)| *script_name == name)
            .map(|(_, event)| *event)
    }

    pub fn script_name(self) -> Option<&'static str> {
        SCRIPT_EVENT_NAMES
            .iter()
            .find(|(_, event)| *event == self)
            .map(|(name, _)| *name)
    }
}

/// Two touching hitboxes: `h1` belongs to the mob handling the event,
/// `h2` to `mob2`. Both are body part indexes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxInteraction {
    pub mob2: MobId,
    pub h1: usize,
    pub h2: usize,
}

/// Data that travels with an event. Which variant a handler receives
/// depends on the event kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventPayload {
    #[default]
    None,
    Mob(MobId),
    Point(Vec2),
    Hitbox(HitboxInteraction),
    EatHitbox { eater: MobId, hitbox: usize },
    Message { text: String, sender: MobId },
    Hazard(String),
    Spray(String),
    FrameSignal(usize),
    Input { name: String, value: f32 },
    Flag(bool),
}

impl EventPayload {
    /// The other mob involved in this event, if any.
    pub fn mob(&self) -> Option<MobId> {
        match self {
            EventPayload::Mob(mob) => Some(*mob),
            EventPayload::Hitbox(interaction) => Some(interaction.mob2),
            EventPayload::EatHitbox { eater, .. } => Some(*eater),
            EventPayload::Message { sender, .. } => Some(*sender),
            _ => None,
        }
    }

    pub fn hitbox(&self) -> Option<&HitboxInteraction> {
        match self {
            EventPayload::Hitbox(interaction) => Some(interaction),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<Vec2> {
        match self {
            EventPayload::Point(point) => Some(*point),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, EventPayload::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_names_resolve_both_ways() {
        assert_eq!(MobEvent::from_script_name("on_land"), Some(MobEvent::Landed));
        assert_eq!(MobEvent::Landed.script_name(), Some("on_land"));
        assert_eq!(MobEvent::from_script_name("on_dance"), None);
        assert_eq!(MobEvent::Whistled.script_name(), None);
    }

    #[test]
    fn hitbox_payload_exposes_other_mob() {
        let payload = EventPayload::Hitbox(HitboxInteraction {
            mob2: MobId(3),
            h1: 0,
            h2: 1,
        });
        assert_eq!(payload.mob(), Some(MobId(3)));
        assert!(payload.hitbox().is_some());
        assert_eq!(payload.point(), None);
    }
}
