//! Native handlers any category can plug into its FSM, and the ones the
//! script loader injects into scripted states.

use tracing::debug;

use crate::mob::{MobCategoryId, MobId, MobWorld, SpotState, Vec2};
use crate::script::{EventPayload, HitboxInteraction, MobEvent};

use super::runtime;

pub const DELIVERY_DURATION: f32 = 2.0;

/// Another mob's attack hitbox touched one of ours.
pub fn be_attacked(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(hit) = payload.hitbox().copied() else {
        return;
    };
    let attacker_view = HitboxInteraction {
        mob2: id,
        h1: hit.h2,
        h2: hit.h1,
    };
    let Some(damage) = world.attack_damage(hit.mob2, id, &attacker_view) else {
        return;
    };
    apply_attack_damage(world, id, hit, damage);
}

pub fn apply_attack_damage(world: &mut MobWorld, id: MobId, hit: HitboxInteraction, damage: f32) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_health(true, false, -damage);
    }
    debug!(mob = id.0, attacker = hit.mob2.0, damage, "mob_damaged");
    world.run_event(id, MobEvent::Damage, &EventPayload::Hitbox(hit));
}

pub fn go_to_dying_state(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    runtime::go_to_dying_state(world, id, payload);
}

pub fn fall_down_pit(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_health(false, false, 0.0);
    }
    world.start_dying(id);
    world.finish_dying(id);
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.to_delete = true;
    }
}

pub fn touch_hazard(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let EventPayload::Hazard(name) = payload else {
        return;
    };
    let effects = world
        .catalog()
        .hazard(name)
        .map(|hazard| hazard.effects.clone())
        .unwrap_or_default();
    for effect in effects {
        world.receive_status(id, &effect);
    }
}

pub fn touch_spray(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let EventPayload::Spray(name) = payload else {
        return;
    };
    let effects = world
        .catalog()
        .spray(name)
        .map(|spray| spray.effects.clone())
        .unwrap_or_default();
    for effect in effects {
        world.receive_status(id, &effect);
    }
}

pub fn lose_momentum(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.speed = Vec2::ZERO;
    }
}

fn can_move(world: &MobWorld, id: MobId) -> bool {
    let weight = world.mob(id).map_or(f32::MAX, |mob| mob.mob_type.weight);
    world.carrier_count(id) > 0 && world.carry_strength(id) >= weight
}

/// Where a carried mob should go: the nearest Onion, or the type's return
/// point when it has one and there is no Onion.
fn carry_destination(world: &MobWorld, id: MobId) -> Option<(Option<MobId>, Vec2)> {
    let mob = world.mob(id)?;
    let return_point = mob
        .mob_type
        .resource_info()
        .and_then(|info| info.return_point);
    if let (Some(point), Some(true)) = (return_point, mob.carry.as_ref().map(|c| c.must_return)) {
        return Some((None, point));
    }
    let onion = world
        .mobs()
        .filter(|other| other.category_id() == MobCategoryId::Onions && !other.flags.to_delete)
        .min_by(|a, b| {
            a.pos
                .distance(mob.pos)
                .total_cmp(&b.pos.distance(mob.pos))
        })
        .map(|onion| (Some(onion.id), onion.pos));
    onion.or_else(|| return_point.map(|point| (None, point)))
}

/// A Pikmin took a carry spot. Its `temp_i` names the spot.
pub fn handle_carrier_added(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(pikmin) = payload.mob() else {
        return;
    };
    let Some(spot) = world
        .mob(pikmin)
        .and_then(|p| p.pikmin())
        .map(|p| p.temp_i)
    else {
        return;
    };
    let could_move = can_move(world, id);
    if let Some(carry) = world.mob_mut(id).and_then(|mob| mob.carry.as_mut()) {
        if let Some(spot) = carry.spots.get_mut(spot) {
            spot.pikmin = Some(pikmin);
            spot.state = SpotState::Used;
        }
    }
    if can_move(world, id) && !could_move {
        world.run_event(id, MobEvent::CarryBeginMove, &EventPayload::None);
    }
}

pub fn handle_carrier_removed(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(pikmin) = payload.mob() else {
        return;
    };
    let could_move = can_move(world, id);
    if let Some(carry) = world.mob_mut(id).and_then(|mob| mob.carry.as_mut()) {
        for spot in carry
            .spots
            .iter_mut()
            .filter(|spot| spot.pikmin == Some(pikmin))
        {
            spot.pikmin = None;
            spot.state = SpotState::Free;
        }
    }
    if could_move && !can_move(world, id) {
        world.run_event(id, MobEvent::CarryStopMove, &EventPayload::None);
    }
}

pub fn carry_begin_move(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let destination = carry_destination(world, id);
    let Some(mob) = world.mob_mut(id) else {
        return;
    };
    let Some(carry) = mob.carry.as_mut() else {
        return;
    };
    carry.is_moving = true;
    carry.intended_mob = destination.and_then(|(target, _)| target);
    carry.destination = destination.map(|(_, point)| point);
    match destination {
        Some((_, point)) => {
            let z = mob.z;
            mob.chase_point(point, z, false);
        }
        None => world.run_event(id, MobEvent::PathBlocked, &EventPayload::None),
    }
}

pub fn carry_stop_move(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(mob) = world.mob_mut(id) else {
        return;
    };
    let Some(carry) = mob.carry.as_mut() else {
        return;
    };
    carry.is_moving = false;
    mob.flags.can_move_midair = false;
    mob.stop_following_path();
    mob.stop_chasing();
}

pub fn carry_reach_destination(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_following_path();
    }
    world.run_event(id, MobEvent::CarryDelivered, &EventPayload::None);
}

/// Lets go of every carrier and hands the mob to its destination.
pub fn start_being_delivered(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let (carriers, receiver, duration) = {
        let Some(mob) = world.mob_mut(id) else {
            return;
        };
        let duration = mob
            .mob_type
            .resource_info()
            .map_or(DELIVERY_DURATION, |info| info.delivery_duration);
        let Some(carry) = mob.carry.as_mut() else {
            return;
        };
        let carriers: Vec<MobId> = carry.carriers().collect();
        for spot in &mut carry.spots {
            spot.pikmin = None;
            spot.state = SpotState::Free;
        }
        carry.is_moving = false;
        (carriers, carry.intended_mob, duration)
    };
    for carrier in carriers {
        world.run_event(carrier, MobEvent::FinishedTask, &EventPayload::None);
    }

    if let Some(receiver) = receiver {
        world.focus_on_mob(id, receiver);
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.intangible = true;
        mob.stop_chasing();
        mob.set_timer(duration);
    }
    if let Some(receiver) = receiver {
        world.run_event(
            receiver,
            MobEvent::StartedReceivingDelivery,
            &EventPayload::Mob(id),
        );
    }
}

pub fn handle_delivery(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let focus = world.mob(id).and_then(|mob| mob.focused_mob);
    if let Some(focus) = focus {
        world.run_event(
            focus,
            MobEvent::FinishedReceivingDelivery,
            &EventPayload::Mob(id),
        );
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.to_delete = true;
    }
}
