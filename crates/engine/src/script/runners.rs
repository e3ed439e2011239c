//! One function per script verb. Arguments arrive already resolved: variables
//! are substituted and symbolic names were turned into indexes at load time.

use tracing::warn;

use crate::fsm;
use crate::mob::{deg_to_rad, rad_to_deg, AnimStart, Mob, MobCategoryId, MobId, ScriptParticles, Team, Vec2};

use super::action::ActionRunData;
use super::codes::{
    AreaInfo, CalculateOp, ComparisonOp, EventInfo, MobInfo, MoveTarget, ScriptCode,
    StabilizeReference, TargetMob, TurnTarget, HOLDABLE_BY_ENEMIES, HOLDABLE_BY_PIKMIN,
};
use super::coerce::{f2s, i2s, is_number, s2b, s2f, s2i};
use super::event::{EventPayload, MobEvent};

const AWAY_FROM_FOCUS_DISTANCE: f32 = 2000.0;

fn this<'w>(data: &'w mut ActionRunData<'_>) -> Option<&'w mut Mob> {
    data.world.mob_mut(data.mob)
}

fn store(data: &mut ActionRunData<'_>, var: usize, value: String) {
    let name = data.args[var].clone();
    if let Some(mob) = this(data) {
        mob.set_var(name, value);
    }
}

fn arg_f(data: &ActionRunData<'_>, idx: usize) -> f32 {
    data.args.get(idx).map_or(0.0, |arg| s2f(arg))
}

fn arg_i(data: &ActionRunData<'_>, idx: usize) -> i32 {
    data.args.get(idx).map_or(0, |arg| s2i(arg))
}

fn focused(data: &ActionRunData<'_>) -> Option<MobId> {
    data.world
        .mob(data.mob)
        .and_then(|mob| mob.focused_mob)
        .filter(|focus| data.world.contains(*focus))
}

/// The mob that caused the event being handled, when the event has one.
pub fn get_trigger_mob(data: &ActionRunData<'_>) -> Option<MobId> {
    match data.parent_event {
        Some(
            MobEvent::ObjectInReach
            | MobEvent::OpponentInReach
            | MobEvent::ThrownPikminLanded
            | MobEvent::TouchedObject
            | MobEvent::TouchedOpponent
            | MobEvent::Held
            | MobEvent::Released
            | MobEvent::Swallowed
            | MobEvent::StartedReceivingDelivery
            | MobEvent::FinishedReceivingDelivery
            | MobEvent::ReceiveMessage
            | MobEvent::HitboxTouchAN
            | MobEvent::HitboxTouchNA
            | MobEvent::HitboxTouchNN
            | MobEvent::Damage,
        ) => data.payload.mob(),
        _ => None,
    }
}

pub fn get_target_mob(data: &ActionRunData<'_>, target: TargetMob) -> Option<MobId> {
    let mob = data.world.mob(data.mob)?;
    let id = match target {
        TargetMob::SelfMob => Some(data.mob),
        TargetMob::Focus => mob.focused_mob,
        TargetMob::Trigger => get_trigger_mob(data),
        TargetMob::Link => mob.links.first().copied(),
        TargetMob::Parent => mob.parent.map(|parent| parent.mob),
    };
    id.filter(|id| data.world.contains(*id))
}

pub fn add_health(data: &mut ActionRunData<'_>) {
    let amount = arg_f(data, 0);
    if let Some(mob) = this(data) {
        mob.set_health(true, false, amount);
    }
}

pub fn calculate(data: &mut ActionRunData<'_>) {
    let lhs = arg_f(data, 1);
    let rhs = arg_f(data, 3);
    let result = match CalculateOp::from_arg(&data.args[2]) {
        Some(CalculateOp::Sum) => lhs + rhs,
        Some(CalculateOp::Subtract) => lhs - rhs,
        Some(CalculateOp::Multiply) => lhs * rhs,
        Some(CalculateOp::Divide) if rhs != 0.0 => lhs / rhs,
        Some(CalculateOp::Modulo) if rhs != 0.0 => lhs % rhs,
        _ => 0.0,
    };
    store(data, 0, f2s(result));
}

pub fn delete(data: &mut ActionRunData<'_>) {
    if let Some(mob) = this(data) {
        mob.flags.to_delete = true;
    }
}

pub fn finish_dying(data: &mut ActionRunData<'_>) {
    data.world.finish_dying(data.mob);
}

pub fn focus(data: &mut ActionRunData<'_>) {
    let Some(target) = TargetMob::from_arg(&data.args[0]) else {
        return;
    };
    if let Some(target) = get_target_mob(data, target) {
        data.world.focus_on_mob(data.mob, target);
    }
}

pub fn get_angle(data: &mut ActionRunData<'_>) {
    let center = Vec2::new(arg_f(data, 1), arg_f(data, 2));
    let target = Vec2::new(arg_f(data, 3), arg_f(data, 4));
    store(data, 0, f2s(rad_to_deg(center.angle_to(target))));
}

pub fn get_area_info(data: &mut ActionRunData<'_>) {
    let value = match AreaInfo::from_arg(&data.args[1]) {
        Some(AreaInfo::DayMinutes) => i2s(data.world.area.day_minutes as i64),
        Some(AreaInfo::FieldPikmin) => i2s(data.world.field_pikmin() as i64),
        None => return,
    };
    store(data, 0, value);
}

/// Under an eat-hitbox touch, lets the eater grab this mob.
pub fn get_chomped(data: &mut ActionRunData<'_>) {
    if data.parent_event != Some(MobEvent::HitboxTouchEat) {
        return;
    }
    if let EventPayload::EatHitbox { eater, .. } = data.payload {
        data.world.chomp(*eater, data.mob);
    }
}

pub fn get_coordinates_from_angle(data: &mut ActionRunData<'_>) {
    let point = Vec2::from_angle(deg_to_rad(arg_f(data, 2)), arg_f(data, 3));
    store(data, 0, f2s(point.x));
    store(data, 1, f2s(point.y));
}

pub fn get_distance(data: &mut ActionRunData<'_>) {
    let center = Vec2::new(arg_f(data, 1), arg_f(data, 2));
    let target = Vec2::new(arg_f(data, 3), arg_f(data, 4));
    store(data, 0, f2s(center.distance(target)));
}

pub fn get_event_info(data: &mut ActionRunData<'_>) {
    let Some(info) = EventInfo::from_arg(&data.args[1]) else {
        return;
    };
    let Some(mob) = data.world.mob(data.mob) else {
        return;
    };
    let hitbox_event = matches!(
        data.parent_event,
        Some(
            MobEvent::HitboxTouchAN
                | MobEvent::HitboxTouchNA
                | MobEvent::HitboxTouchNN
                | MobEvent::Damage
        )
    );
    let touch_event = matches!(
        data.parent_event,
        Some(MobEvent::TouchedObject | MobEvent::TouchedOpponent | MobEvent::ThrownPikminLanded)
    );
    let body_part_name = |owner: &Mob, idx: usize| {
        owner
            .mob_type
            .hitboxes
            .get(idx)
            .map(|hitbox| hitbox.body_part.clone())
    };

    let value = match (info, data.payload) {
        (EventInfo::BodyPart, EventPayload::Hitbox(hit)) if hitbox_event => {
            body_part_name(mob, hit.h1)
        }
        (EventInfo::BodyPart, EventPayload::Mob(other)) if touch_event => data
            .world
            .mob(*other)
            .and_then(|other| mob.closest_hitbox(other.pos, None))
            .and_then(|(idx, _)| body_part_name(mob, idx)),
        (EventInfo::OtherBodyPart, EventPayload::Hitbox(hit)) if hitbox_event => data
            .world
            .mob(hit.mob2)
            .and_then(|other| body_part_name(other, hit.h2)),
        (EventInfo::OtherBodyPart, EventPayload::Mob(other)) if touch_event => {
            data.world.mob(*other).and_then(|other| {
                other
                    .closest_hitbox(mob.pos, None)
                    .and_then(|(idx, _)| body_part_name(other, idx))
            })
        }
        (EventInfo::FrameSignal, EventPayload::FrameSignal(signal))
            if data.parent_event == Some(MobEvent::FrameSignal) =>
        {
            Some(i2s(*signal as i64))
        }
        (EventInfo::Hazard, EventPayload::Hazard(hazard))
            if matches!(
                data.parent_event,
                Some(MobEvent::TouchedHazard | MobEvent::LeftHazard)
            ) =>
        {
            Some(hazard.clone())
        }
        (EventInfo::InputName, EventPayload::Input { name, .. })
            if data.parent_event == Some(MobEvent::InputReceived) =>
        {
            Some(name.clone())
        }
        (EventInfo::InputValue, EventPayload::Input { value, .. })
            if data.parent_event == Some(MobEvent::InputReceived) =>
        {
            Some(f2s(*value))
        }
        (EventInfo::Message, EventPayload::Message { text, .. })
            if data.parent_event == Some(MobEvent::ReceiveMessage) =>
        {
            Some(text.clone())
        }
        _ => None,
    };
    if let Some(value) = value {
        store(data, 0, value);
    }
}

/// There is no terrain here, so the floor is always at height zero.
pub fn get_floor_z(data: &mut ActionRunData<'_>) {
    store(data, 0, f2s(0.0));
}

pub fn get_focus_var(data: &mut ActionRunData<'_>) {
    let Some(focus) = focused(data) else {
        return;
    };
    let value = data
        .world
        .mob(focus)
        .map(|mob| mob.var(&data.args[1]).to_string())
        .unwrap_or_default();
    store(data, 0, value);
}

pub fn get_mob_info(data: &mut ActionRunData<'_>) {
    let (Some(target), Some(info)) = (
        TargetMob::from_arg(&data.args[1]),
        MobInfo::from_arg(&data.args[2]),
    ) else {
        return;
    };
    let Some(target) = get_target_mob(data, target).and_then(|id| data.world.mob(id)) else {
        return;
    };

    let latched = || {
        data.world
            .mobs()
            .filter(|other| {
                other.focused_mob == Some(target.id) && other.pikmin().is_some_and(|p| p.latched)
            })
            .collect::<Vec<_>>()
    };
    let value = match info {
        MobInfo::Angle => Some(f2s(rad_to_deg(target.angle))),
        MobInfo::ChompedPikmin => Some(i2s(target.chomping.len() as i64)),
        MobInfo::FocusDistance => target
            .focused_mob
            .and_then(|focus| data.world.mob(focus))
            .map(|focus| f2s(target.pos.distance(focus.pos))),
        MobInfo::GroupTaskPower => target.group_task().map(|task| f2s(task.power)),
        MobInfo::Health => Some(i2s(target.health as i64)),
        MobInfo::HealthRatio => Some(if target.max_health != 0.0 {
            f2s(target.health / target.max_health)
        } else {
            f2s(0.0)
        }),
        MobInfo::Id => Some(i2s(target.id.0 as i64)),
        MobInfo::LatchedPikmin => Some(i2s(latched().len() as i64)),
        MobInfo::LatchedPikminWeight => Some(i2s(
            latched()
                .iter()
                .map(|pikmin| pikmin.mob_type.weight)
                .sum::<f32>() as i64,
        )),
        MobInfo::MobCategory => Some(target.category_id().internal_name().to_string()),
        MobInfo::MobType => Some(target.mob_type.name.clone()),
        MobInfo::State => Some(target.state_name().unwrap_or_default().to_string()),
        MobInfo::Weight => (target.category_id() == MobCategoryId::Scales).then(|| {
            let weight: f32 = data
                .world
                .mobs()
                .filter(|other| other.id != target.id && other.pos.distance(target.pos) <= target.radius)
                .map(|other| other.mob_type.weight)
                .sum();
            i2s(weight as i64)
        }),
        MobInfo::X => Some(f2s(target.pos.x)),
        MobInfo::Y => Some(f2s(target.pos.y)),
        MobInfo::Z => Some(f2s(target.z)),
    };
    if let Some(value) = value {
        store(data, 0, value);
    }
}

pub fn get_random_float(data: &mut ActionRunData<'_>) {
    let value = data.world.rng_f(arg_f(data, 1), arg_f(data, 2));
    store(data, 0, f2s(value));
}

pub fn get_random_int(data: &mut ActionRunData<'_>) {
    let value = data.world.rng_i(arg_i(data, 1), arg_i(data, 2));
    store(data, 0, i2s(value as i64));
}

pub fn hold_focused_mob(data: &mut ActionRunData<'_>) {
    if let Some(focus) = focused(data) {
        data.world.hold(data.mob, focus);
    }
}

/// Equality compares as numbers only when both sides look numeric; ordering
/// always compares as numbers.
pub fn if_function(data: &mut ActionRunData<'_>) {
    let lhs = data.args[0].as_str();
    let rhs = data.args.get(2..).map(|tail| tail.join(" ")).unwrap_or_default();
    let numeric = is_number(lhs) && is_number(&rhs);
    data.return_value = match ComparisonOp::from_arg(&data.args[1]) {
        Some(ComparisonOp::Equal) if numeric => s2f(lhs) == s2f(&rhs),
        Some(ComparisonOp::Equal) => lhs == rhs,
        Some(ComparisonOp::NotEqual) if numeric => s2f(lhs) != s2f(&rhs),
        Some(ComparisonOp::NotEqual) => lhs != rhs,
        Some(ComparisonOp::Less) => s2f(lhs) < s2f(&rhs),
        Some(ComparisonOp::Greater) => s2f(lhs) > s2f(&rhs),
        Some(ComparisonOp::LessOrEqual) => s2f(lhs) <= s2f(&rhs),
        Some(ComparisonOp::GreaterOrEqual) => s2f(lhs) >= s2f(&rhs),
        None => false,
    };
}

pub fn link_with_focused_mob(data: &mut ActionRunData<'_>) {
    let Some(focus) = focused(data) else {
        return;
    };
    if let Some(mob) = this(data) {
        if !mob.links.contains(&focus) {
            mob.links.push(focus);
        }
    }
}

pub fn load_focused_mob_memory(data: &mut ActionRunData<'_>) {
    let Ok(slot) = usize::try_from(arg_i(data, 0)) else {
        return;
    };
    let remembered = data
        .world
        .mob(data.mob)
        .and_then(|mob| mob.focused_mob_memory.get(&slot).copied());
    if let Some(remembered) = remembered {
        data.world.focus_on_mob(data.mob, remembered);
    }
}

pub fn move_to_absolute(data: &mut ActionRunData<'_>) {
    let target = Vec2::new(arg_f(data, 0), arg_f(data, 1));
    let z = (data.args.len() > 2).then(|| arg_f(data, 2));
    if let Some(mob) = this(data) {
        let z = z.unwrap_or(mob.z);
        mob.chase_point(target, z, false);
    }
}

pub fn move_to_relative(data: &mut ActionRunData<'_>) {
    let offset = Vec2::new(arg_f(data, 0), arg_f(data, 1));
    let z = arg_f(data, 2);
    if let Some(mob) = this(data) {
        let target = mob.pos + offset.rotated(mob.angle);
        let z = mob.z + z;
        mob.chase_point(target, z, false);
    }
}

pub fn move_to_target(data: &mut ActionRunData<'_>) {
    let Some(kind) = MoveTarget::from_arg(&data.args[0]) else {
        return;
    };
    let focus = focused(data);
    let focus_pos = focus.and_then(|id| data.world.mob(id)).map(|mob| (mob.pos, mob.z));
    let links_avg = data.world.mob(data.mob).and_then(|mob| {
        let positions: Vec<Vec2> = mob
            .links
            .iter()
            .filter_map(|link| data.world.mob(*link))
            .map(|link| link.pos)
            .collect();
        (!positions.is_empty()).then(|| {
            let sum = positions.iter().fold(Vec2::ZERO, |acc, pos| acc + *pos);
            sum * (1.0 / positions.len() as f32)
        })
    });

    let Some(mob) = this(data) else {
        return;
    };
    match kind {
        MoveTarget::AwayFromFocusedMob => match focus_pos {
            Some((pos, _)) => {
                let away = mob.pos.angle_to(pos) + std::f32::consts::PI;
                let target = mob.pos + Vec2::from_angle(away, AWAY_FROM_FOCUS_DISTANCE);
                let z = mob.z;
                mob.chase_point(target, z, false);
            }
            None => mob.stop_chasing(),
        },
        MoveTarget::FocusedMob => match focus {
            Some(focus) => mob.chase_mob(focus, Vec2::ZERO, false, 3.0),
            None => mob.stop_chasing(),
        },
        MoveTarget::FocusedMobPosition => match focus_pos {
            Some((pos, z)) => mob.chase_point(pos, z, false),
            None => mob.stop_chasing(),
        },
        MoveTarget::Home => {
            let (home, z) = (mob.home, mob.z);
            mob.chase_point(home, z, false);
        }
        MoveTarget::LinkedMobAverage => {
            if let Some(target) = links_avg {
                let z = mob.z;
                mob.chase_point(target, z, false);
            }
        }
    }
}

pub fn order_release(data: &mut ActionRunData<'_>) {
    let holder = data.world.mob(data.mob).and_then(|mob| mob.holder);
    if let Some(holder) = holder {
        data.world
            .run_event(holder, MobEvent::ReleaseOrder, &EventPayload::None);
    }
}

pub fn print(data: &mut ActionRunData<'_>) {
    let text = data.args.join(" ");
    data.world.print(data.mob, text);
}

pub fn receive_status(data: &mut ActionRunData<'_>) {
    let name = data.args[0].clone();
    data.world.receive_status(data.mob, &name);
}

/// Releases everything the mob is chomping.
pub fn release(data: &mut ActionRunData<'_>) {
    data.world.release_chomped(data.mob);
}

pub fn remove_status(data: &mut ActionRunData<'_>) {
    let name = data.args[0].clone();
    data.world.remove_status(data.mob, &name);
}

pub fn save_focused_mob_memory(data: &mut ActionRunData<'_>) {
    let Some(focus) = focused(data) else {
        return;
    };
    let Ok(slot) = usize::try_from(arg_i(data, 0)) else {
        return;
    };
    if let Some(mob) = this(data) {
        mob.focused_mob_memory.insert(slot, focus);
    }
}

pub fn send_message_to_focus(data: &mut ActionRunData<'_>) {
    if let Some(focus) = focused(data) {
        let text = data.args[0].clone();
        data.world.send_message(data.mob, focus, &text);
    }
}

pub fn send_message_to_links(data: &mut ActionRunData<'_>) {
    let links = data
        .world
        .mob(data.mob)
        .map(|mob| mob.links.clone())
        .unwrap_or_default();
    let text = data.args[0].clone();
    for link in links.into_iter().filter(|link| *link != data.mob) {
        data.world.send_message(data.mob, link, &text);
    }
}

pub fn send_message_to_nearby(data: &mut ActionRunData<'_>) {
    let distance = arg_f(data, 0);
    let Some(pos) = data.world.mob(data.mob).map(|mob| mob.pos) else {
        return;
    };
    let text = data.args[1].clone();
    for other in data.world.mobs_within(pos, distance) {
        if other != data.mob {
            data.world.send_message(data.mob, other, &text);
        }
    }
}

pub fn set_animation(data: &mut ActionRunData<'_>) {
    let Ok(anim) = usize::try_from(arg_i(data, 0)) else {
        return;
    };
    let start = AnimStart::from_index(arg_i(data, 1));
    let speed_baseline = data.args.get(2).is_some_and(|arg| s2b(arg));
    if let Some(mob) = this(data) {
        mob.set_animation(anim, start, speed_baseline);
    }
}

pub fn set_far_reach(data: &mut ActionRunData<'_>) {
    let reach = usize::try_from(arg_i(data, 0)).unwrap_or(usize::MAX);
    if let Some(mob) = this(data) {
        mob.far_reach = reach;
    }
}

pub fn set_flying(data: &mut ActionRunData<'_>) {
    let flying = s2b(&data.args[0]);
    if let Some(mob) = this(data) {
        mob.flags.can_move_midair = flying;
    }
}

pub fn set_gravity(data: &mut ActionRunData<'_>) {
    let mult = arg_f(data, 0);
    if let Some(mob) = this(data) {
        mob.gravity_mult = mult;
    }
}

pub fn set_health(data: &mut ActionRunData<'_>) {
    let amount = arg_f(data, 0);
    if let Some(mob) = this(data) {
        mob.set_health(false, false, amount);
    }
}

/// Walkable mobs carry whatever is standing on them along.
pub fn set_height(data: &mut ActionRunData<'_>) {
    let height = arg_f(data, 0);
    let Some(mob) = this(data) else {
        return;
    };
    let old_top = mob.z + mob.height;
    mob.height = height;
    if !mob.mob_type.walkable {
        return;
    }
    let (pos, radius, new_top) = (mob.pos, mob.radius, mob.z + height);
    let riders: Vec<MobId> = data
        .world
        .mobs()
        .filter(|other| {
            other.id != data.mob
                && (other.z - old_top).abs() < f32::EPSILON
                && other.pos.distance(pos) <= radius
        })
        .map(|other| other.id)
        .collect();
    for rider in riders {
        if let Some(rider) = data.world.mob_mut(rider) {
            rider.z = new_top;
        }
    }
}

pub fn set_hiding(data: &mut ActionRunData<'_>) {
    let hidden = s2b(&data.args[0]);
    if let Some(mob) = this(data) {
        mob.flags.hidden = hidden;
    }
}

/// Only tools keep holdability flags.
pub fn set_holdable(data: &mut ActionRunData<'_>) {
    let flags = data.args.iter().fold(0, |acc, arg| acc | s2i(arg));
    if let Some(tool) = this(data).and_then(Mob::tool_mut) {
        tool.holdable_by_pikmin = flags & HOLDABLE_BY_PIKMIN != 0;
        tool.holdable_by_enemies = flags & HOLDABLE_BY_ENEMIES != 0;
    }
}

pub fn set_huntable(data: &mut ActionRunData<'_>) {
    let huntable = s2b(&data.args[0]);
    if let Some(mob) = this(data) {
        mob.flags.non_huntable = !huntable;
    }
}

pub fn set_near_reach(data: &mut ActionRunData<'_>) {
    let reach = usize::try_from(arg_i(data, 0)).unwrap_or(usize::MAX);
    if let Some(mob) = this(data) {
        mob.near_reach = reach;
    }
}

pub fn set_radius(data: &mut ActionRunData<'_>) {
    let radius = arg_f(data, 0);
    if let Some(mob) = this(data) {
        mob.radius = radius;
    }
}

/// The argument is a state index written by the FSM loader. Anything that
/// did not resolve to an index is refused.
pub fn set_state(data: &mut ActionRunData<'_>) {
    let arg = data.args[0].as_str();
    let target = (!arg.is_empty() && is_number(arg))
        .then(|| usize::try_from(s2i(arg)).ok())
        .flatten();
    match target {
        Some(target) => {
            fsm::set_state(data.world, data.mob, target, data.payload);
        }
        None => warn!(mob = data.mob.0, target = arg, "unresolved_state_change"),
    }
}

pub fn set_tangible(data: &mut ActionRunData<'_>) {
    let tangible = s2b(&data.args[0]);
    if let Some(mob) = this(data) {
        mob.flags.intangible = !tangible;
    }
}

pub fn set_team(data: &mut ActionRunData<'_>) {
    let team = usize::try_from(arg_i(data, 0))
        .ok()
        .and_then(Team::from_index);
    if let (Some(team), Some(mob)) = (team, this(data)) {
        mob.team = team;
    }
}

pub fn set_timer(data: &mut ActionRunData<'_>) {
    let time = arg_f(data, 0);
    if let Some(mob) = this(data) {
        mob.set_timer(time);
    }
}

pub fn set_var(data: &mut ActionRunData<'_>) {
    let value = data.args[1].clone();
    store(data, 0, value);
}

pub fn spawn(data: &mut ActionRunData<'_>) {
    if let Ok(idx) = usize::try_from(arg_i(data, 0)) {
        data.world.spawn_child(data.mob, idx);
    }
}

pub fn stabilize_z(data: &mut ActionRunData<'_>) {
    let Some(reference) = StabilizeReference::from_arg(&data.args[0]) else {
        return;
    };
    let offset = arg_f(data, 1);
    let zs: Vec<f32> = data
        .world
        .mob(data.mob)
        .map(|mob| {
            mob.links
                .iter()
                .filter_map(|link| data.world.mob(*link))
                .map(|link| link.z)
                .collect()
        })
        .unwrap_or_default();
    let best = match reference {
        StabilizeReference::Lowest => zs.iter().copied().reduce(f32::min),
        StabilizeReference::Highest => zs.iter().copied().reduce(f32::max),
    };
    if let (Some(best), Some(mob)) = (best, this(data)) {
        mob.z = best + offset;
    }
}

pub fn start_chomping(data: &mut ActionRunData<'_>) {
    let max = usize::try_from(arg_i(data, 0)).unwrap_or_default();
    let parts: Vec<usize> = data.args[1..]
        .iter()
        .filter_map(|arg| usize::try_from(s2i(arg)).ok())
        .collect();
    if let Some(mob) = this(data) {
        mob.chomp_max = max;
        mob.chomp_body_parts = parts;
    }
}

pub fn start_dying(data: &mut ActionRunData<'_>) {
    data.world.start_dying(data.mob);
}

pub fn start_particles(data: &mut ActionRunData<'_>) {
    let generator = data.args[0].clone();
    let offset = Vec2::new(arg_f(data, 1), arg_f(data, 2));
    let z = arg_f(data, 3);
    if let Some(mob) = this(data) {
        mob.particle_generators.push(ScriptParticles {
            generator,
            offset,
            z,
        });
    }
}

pub fn stop(data: &mut ActionRunData<'_>) {
    if let Some(mob) = this(data) {
        mob.stop_chasing();
        mob.stop_turning();
        mob.stop_following_path();
    }
}

pub fn stop_chomping(data: &mut ActionRunData<'_>) {
    if let Some(mob) = this(data) {
        mob.chomp_max = 0;
        mob.chomp_body_parts.clear();
    }
}

pub fn stop_particles(data: &mut ActionRunData<'_>) {
    if let Some(mob) = this(data) {
        mob.particle_generators.clear();
    }
}

pub fn stop_vertically(data: &mut ActionRunData<'_>) {
    if let Some(mob) = this(data) {
        mob.speed_z = 0.0;
    }
}

pub fn swallow(data: &mut ActionRunData<'_>) {
    let amount = usize::try_from(arg_i(data, 0)).unwrap_or_default();
    data.world.swallow_chomped(data.mob, amount);
}

pub fn swallow_all(data: &mut ActionRunData<'_>) {
    let amount = data
        .world
        .mob(data.mob)
        .map_or(0, |mob| mob.chomping.len());
    data.world.swallow_chomped(data.mob, amount);
}

pub fn teleport_to_absolute(data: &mut ActionRunData<'_>) {
    let target = Vec2::new(arg_f(data, 0), arg_f(data, 1));
    let z = arg_f(data, 2);
    if let Some(mob) = this(data) {
        mob.stop_chasing();
        mob.chase_point(target, z, true);
    }
}

pub fn teleport_to_relative(data: &mut ActionRunData<'_>) {
    let offset = Vec2::new(arg_f(data, 0), arg_f(data, 1));
    let z = arg_f(data, 2);
    if let Some(mob) = this(data) {
        mob.stop_chasing();
        let target = mob.pos + offset.rotated(mob.angle);
        let z = mob.z + z;
        mob.chase_point(target, z, true);
    }
}

/// A max height of zero only drops the mob.
pub fn throw_focused_mob(data: &mut ActionRunData<'_>) {
    let Some(focus) = focused(data) else {
        return;
    };
    if data.world.mob(focus).and_then(|mob| mob.holder) == Some(data.mob) {
        data.world.release(data.mob, focus);
    }
    let max_height = arg_f(data, 3);
    if max_height == 0.0 {
        return;
    }
    let target = Vec2::new(arg_f(data, 0), arg_f(data, 1));
    let target_z = arg_f(data, 2);
    data.world.throw_mob(focus, target, target_z, max_height);
}

pub fn turn_to_absolute(data: &mut ActionRunData<'_>) {
    let single = data.args.len() == 1;
    let first = arg_f(data, 0);
    let second = arg_f(data, 1);
    if let Some(mob) = this(data) {
        let angle = if single {
            deg_to_rad(first)
        } else {
            mob.pos.angle_to(Vec2::new(first, second))
        };
        mob.face(angle);
    }
}

pub fn turn_to_relative(data: &mut ActionRunData<'_>) {
    let single = data.args.len() == 1;
    let first = arg_f(data, 0);
    let second = arg_f(data, 1);
    if let Some(mob) = this(data) {
        let angle = if single {
            mob.angle + deg_to_rad(first)
        } else {
            let offset = Vec2::new(first, second).rotated(mob.angle);
            mob.pos.angle_to(mob.pos + offset)
        };
        mob.face(angle);
    }
}

pub fn turn_to_target(data: &mut ActionRunData<'_>) {
    let Some(kind) = TurnTarget::from_arg(&data.args[0]) else {
        return;
    };
    let focus_pos = focused(data)
        .and_then(|id| data.world.mob(id))
        .map(|mob| mob.pos);
    let Some(mob) = this(data) else {
        return;
    };
    match kind {
        TurnTarget::FocusedMob => {
            if let Some(pos) = focus_pos {
                let angle = mob.pos.angle_to(pos);
                mob.face(angle);
            }
        }
        TurnTarget::Home => {
            let angle = mob.pos.angle_to(mob.home);
            mob.face(angle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mob::{ContentCatalog, MobType, MobTypeDatabase, MobWorld};
    use crate::script::{ActionCall, ActionLoadContext, ActionRegistry};

    struct Harness {
        world: MobWorld,
        mob: MobId,
        registry: ActionRegistry,
    }

    impl Harness {
        fn new() -> Self {
            let mob_type = Arc::new(
                MobType::new("Tester", MobCategoryId::Custom).with_animations(&["idling"]),
            );
            let types = MobTypeDatabase::from_types(vec![Arc::clone(&mob_type)]);
            let mut world = MobWorld::new(types, Arc::new(ContentCatalog::default()), 1);
            let mob = world.create_mob(Vec2::ZERO, mob_type, 0.0, &[]);
            Self {
                world,
                mob,
                registry: ActionRegistry::with_builtin_actions(),
            }
        }

        fn run(&mut self, line: &str) -> bool {
            let mob_type = Arc::clone(&self.world.mob(self.mob).expect("mob").mob_type);
            let catalog = ContentCatalog::default();
            let ctx = ActionLoadContext {
                mob_type: &mob_type,
                catalog: &catalog,
            };
            let call = ActionCall::parse(&self.registry, line, &ctx).expect("parse");
            call.run(&mut self.world, self.mob, &EventPayload::None)
        }

        fn var(&self, name: &str) -> String {
            self.world.mob(self.mob).expect("mob").var(name).to_string()
        }
    }

    #[test]
    fn division_and_modulo_by_zero_store_zero() {
        let mut h = Harness::new();
        h.run("calculate result 10 / 0");
        assert_eq!(h.var("result"), "0");
        h.run("calculate result 10 % 0");
        assert_eq!(h.var("result"), "0");
        h.run("calculate result 10 % 3");
        assert_eq!(h.var("result"), f2s(10.0_f32 % 3.0));
        assert_eq!(h.var("result"), "1");
        h.run("calculate result 7 / 2");
        assert_eq!(h.var("result"), "3.5");
    }

    #[test]
    fn equality_falls_back_to_text() {
        let mut h = Harness::new();
        assert!(h.run("if 5 = 5.0"));
        assert!(h.run("if abc = abc"));
        assert!(!h.run("if abc = abd"));
        assert!(h.run("if abc != 5"));
        assert!(h.run("if abc < 2"));
        assert!(!h.run("if abc > 2"));
        assert!(h.run("if hello = hello"));
    }

    #[test]
    fn comparison_value_joins_the_argument_tail() {
        let mut h = Harness::new();
        assert!(h.run("if $greeting = "));
        h.world
            .mob_mut(h.mob)
            .expect("mob")
            .set_var("greeting", "hi there");
        assert!(h.run("if $greeting = hi there"));
    }

    #[test]
    fn variables_are_read_at_call_time() {
        let mut h = Harness::new();
        h.run("set_var a 4");
        h.run("calculate b $a * 2");
        assert_eq!(h.var("b"), "8");
        h.run("set_var a 10");
        h.run("calculate b $a * 2");
        assert_eq!(h.var("b"), "20");
    }

    #[test]
    fn print_is_recorded() {
        let mut h = Harness::new();
        h.run("print hello world");
        let log = h.world.print_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].text, "hello world");
    }

    #[test]
    fn angle_and_coordinates_use_degrees() {
        let mut h = Harness::new();
        h.run("get_angle a 0 0 0 10");
        assert_eq!(h.var("a"), "90");
        h.run("get_coordinates_from_angle x y 0 5");
        assert_eq!(h.var("x"), "5");
        assert_eq!(h.var("y"), "0");
        h.run("get_distance d 0 0 3 4");
        assert_eq!(h.var("d"), "5");
    }

    #[test]
    fn mob_info_reads_the_state_and_type() {
        let mut h = Harness::new();
        h.run("get_mob_info t self mob_type");
        assert_eq!(h.var("t"), "Tester");
        h.run("get_mob_info c self mob_category");
        assert_eq!(h.var("c"), "custom");
        h.run("set_health 25");
        h.run("get_mob_info hp self health_ratio");
        assert_eq!(h.var("hp"), "0.25");
    }

    #[test]
    fn random_int_stays_in_range() {
        let mut h = Harness::new();
        for _ in 0..20 {
            h.run("get_random_int r 10 1");
            let value = s2i(&h.var("r"));
            assert!((1..=10).contains(&value));
        }
    }

    #[test]
    fn random_verbs_survive_extreme_and_reversed_bounds() {
        let mut h = Harness::new();
        let (lo, hi) = (s2f("-3e38"), s2f("3e38"));
        for _ in 0..20 {
            h.run("get_random_float r -3e38 3e38");
            let value = s2f(&h.var("r"));
            assert!(value.is_finite());
            assert!((lo..=hi).contains(&value));

            h.run("get_random_float r 2 1");
            assert!((1.0..=2.0).contains(&s2f(&h.var("r"))));

            h.run("get_random_int r 1e12 -1e12");
            let value = h.var("r");
            assert!(value.parse::<i64>().is_ok(), "{value}");
        }
        h.run("get_random_float r 5 1e39");
        assert_eq!(h.var("r"), "5");
    }

    #[test]
    fn timer_and_flags() {
        let mut h = Harness::new();
        h.run("set_timer 2.5");
        h.run("set_hiding true");
        h.run("set_tangible false");
        h.run("set_huntable no");
        let mob = h.world.mob(h.mob).expect("mob");
        assert_eq!(mob.script_timer.time_left, 2.5);
        assert!(mob.flags.hidden);
        assert!(mob.flags.intangible);
        assert!(mob.flags.non_huntable);
    }
}
