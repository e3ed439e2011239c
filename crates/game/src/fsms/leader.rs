//! Leaders whistle Pikmin into their group, grab and throw them, and send
//! them off again. Player input arrives as `Leader*` events.

use std::f32::consts::PI;
use std::sync::Arc;

use engine::fsm::{self, gen_mob, FsmBuilder};
use engine::mob::{AnimStart, DropEffect, MobCategoryId};
use engine::script::HitboxInteraction;
use engine::{EventPayload, Mob, MobEvent, MobId, MobType, MobWorld, Vec2};
use tracing::debug;

pub const IDLING: usize = 0;
pub const ACTIVE: usize = 1;
pub const WHISTLING: usize = 2;
pub const HOLDING: usize = 3;
pub const THROWING: usize = 4;
pub const DISMISSING: usize = 5;
pub const DRINKING: usize = 6;
pub const KNOCKED_BACK: usize = 7;
pub const DYING: usize = 8;
pub const N_STATES: usize = 9;

const DISMISS_DISTANCE: f32 = 60.0;
const KNOCKBACK_H_POWER: f32 = 100.0;
const KNOCKBACK_V_POWER: f32 = 200.0;

pub fn create_fsm(mob_type: &mut MobType) {
    let mut efc = FsmBuilder::new();

    efc.new_state("idling", IDLING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(become_inactive);
    efc.new_event(MobEvent::LeaderActivated);
    efc.change_state("active");
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    common_handlers(&mut efc);

    efc.new_state("active", ACTIVE);
    efc.new_event(MobEvent::OnEnter);
    efc.run(become_active);
    efc.new_event(MobEvent::LeaderInactivated);
    efc.run(stand_still);
    efc.change_state("idling");
    efc.new_event(MobEvent::LeaderMoveStart);
    efc.run(move_to);
    efc.new_event(MobEvent::LeaderMoveEnd);
    efc.run(stand_still);
    efc.new_event(MobEvent::ReachedDestination);
    efc.run(stand_still);
    efc.new_event(MobEvent::LeaderHolding);
    efc.run(grab_mob);
    efc.new_event(MobEvent::LeaderStartWhistle);
    efc.change_state("whistling");
    efc.new_event(MobEvent::LeaderDismiss);
    efc.change_state("dismissing");
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    common_handlers(&mut efc);

    efc.new_state("whistling", WHISTLING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_whistling);
    efc.new_event(MobEvent::OnTick);
    efc.run(whistle);
    efc.new_event(MobEvent::OnLeave);
    efc.run(stop_whistling);
    efc.new_event(MobEvent::LeaderStopWhistle);
    efc.change_state("active");
    efc.new_event(MobEvent::Timer);
    efc.change_state("active");
    efc.new_event(MobEvent::LeaderMoveStart);
    efc.run(move_to);
    efc.new_event(MobEvent::LeaderMoveEnd);
    efc.run(stand_still);
    common_handlers(&mut efc);

    efc.new_state("holding", HOLDING);
    efc.new_event(MobEvent::LeaderThrow);
    efc.run(throw_held);
    efc.change_state("throwing");
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(release_held);
    efc.change_state("active");
    efc.new_event(MobEvent::LeaderMoveStart);
    efc.run(move_to);
    efc.new_event(MobEvent::LeaderMoveEnd);
    efc.run(stand_still);
    efc.new_event(MobEvent::LeaderStartWhistle);
    efc.run(release_held);
    efc.change_state("whistling");
    efc.new_event(MobEvent::LeaderInactivated);
    efc.run(release_held);
    efc.change_state("idling");
    common_handlers(&mut efc);

    efc.new_state("throwing", THROWING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_throw_anim);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("active");
    efc.new_event(MobEvent::LeaderHolding);
    efc.run(grab_mob);
    common_handlers(&mut efc);

    efc.new_state("dismissing", DISMISSING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(dismiss);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("active");
    efc.new_event(MobEvent::LeaderStartWhistle);
    efc.change_state("whistling");
    common_handlers(&mut efc);

    efc.new_state("drinking", DRINKING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_drinking);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(finish_drinking);
    efc.run(return_to_control);

    efc.new_state("knocked_back", KNOCKED_BACK);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_knockback);
    efc.new_event(MobEvent::Landed);
    efc.run(return_to_control);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);

    efc.new_state("dying", DYING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_dying);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(finish_dying);

    super::install_states(mob_type, efc.finish(N_STATES), "idling", Some("dying"));
}

fn common_handlers(efc: &mut FsmBuilder) {
    efc.new_event(MobEvent::HitboxTouchNA);
    efc.run(get_hit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    efc.new_event(MobEvent::TouchedHazard);
    efc.run(gen_mob::touch_hazard);
    efc.new_event(MobEvent::TouchedSpray);
    efc.run(gen_mob::touch_spray);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
}

fn set_active(world: &mut MobWorld, id: MobId, active: bool) {
    if let Some(state) = world.mob_mut(id).and_then(Mob::leader_mut) {
        state.active = active;
    }
}

fn animate(world: &mut MobWorld, id: MobId, name: &str) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_animation_named(name, AnimStart::Normal);
    }
}

fn become_active(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    set_active(world, id, true);
    animate(world, id, "idling");
    debug!(mob = id.0, "leader_activated");
}

fn become_inactive(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    set_active(world, id, false);
    animate(world, id, "idling");
}

fn stand_still(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.speed = Vec2::ZERO;
    }
}

/// Walks toward the given point and tells the group their spots moved.
fn move_to(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(target) = payload.point() else {
        return;
    };
    let members = {
        let Some(mob) = world.mob_mut(id) else {
            return;
        };
        let z = mob.z;
        let angle = mob.pos.angle_to(target);
        mob.chase_point(target, z, false);
        mob.face(angle);
        mob.set_animation_named("walking", AnimStart::NoRestart);
        mob.group.clone()
    };
    for member in members {
        world.run_event(member, MobEvent::SpotIsFar, &EventPayload::None);
    }
}

/// Picks up a group member so it can be thrown.
fn grab_mob(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(member) = payload.mob() else {
        return;
    };
    let in_group = world
        .mob(member)
        .is_some_and(|mob| mob.following_group == Some(id));
    if !in_group {
        return;
    }
    world.hold(id, member);
    world.run_event(member, MobEvent::GrabbedByFriend, &EventPayload::Mob(id));
    if world.mob(id).is_some_and(|mob| mob.holding.contains(&member)) {
        fsm::set_state(world, id, HOLDING, &EventPayload::None);
    }
}

fn held_mob(world: &MobWorld, id: MobId) -> Option<MobId> {
    world.mob(id).and_then(|mob| mob.holding.first().copied())
}

/// The held mob hears it was thrown before it is let go, so it can switch
/// to its thrown state instead of reacting to a plain release.
fn throw_held(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(target) = payload.point() else {
        return;
    };
    let Some(held) = held_mob(world, id) else {
        return;
    };
    let max_height = world
        .mob(id)
        .and_then(|mob| mob.mob_type.leader_info())
        .map_or(260.0, |info| info.max_throw_height);
    world.run_event(held, MobEvent::Thrown, &EventPayload::Mob(id));
    world.release(id, held);
    world.leave_group(held);
    world.throw_mob(held, target, 0.0, max_height);
    debug!(mob = id.0, thrown = held.0, x = target.x, y = target.y, "leader_threw_mob");
}

fn release_held(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(held) = held_mob(world, id) {
        world.release(id, held);
    }
}

fn start_throw_anim(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    animate(world, id, "throwing");
}

fn start_whistling(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let duration = world
        .mob(id)
        .and_then(|mob| mob.mob_type.leader_info())
        .map_or(2.5, |info| info.whistle_duration);
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(duration);
        mob.set_animation_named("whistling", AnimStart::Normal);
    }
    whistle(world, id, payload);
}

/// Calls every Pikmin in range and clears statuses a whistle can cure.
fn whistle(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some((pos, range)) = world.mob(id).map(|mob| {
        let range = mob.mob_type.leader_info().map_or(80.0, |info| info.whistle_range);
        (mob.pos, range)
    }) else {
        return;
    };
    let catalog = Arc::clone(world.catalog());
    for target in world.mobs_within(pos, range) {
        let Some(mob) = world.mob(target) else {
            continue;
        };
        if target == id || !mob.is_alive() || mob.category_id() != MobCategoryId::Pikmin {
            continue;
        }
        if mob.following_group == Some(id) {
            continue;
        }
        let curable: Vec<String> = mob
            .statuses
            .iter()
            .filter(|active| {
                catalog
                    .status_type(&active.name)
                    .is_some_and(|status| status.removable_with_whistle)
            })
            .map(|active| active.name.clone())
            .collect();
        for status in curable {
            world.remove_status(target, &status);
        }
        world.run_event(target, MobEvent::Whistled, &EventPayload::Mob(id));
    }
}

fn stop_whistling(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(0.0);
    }
}

/// Sends every member to a spot around the leader and empties the group.
fn dismiss(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some((pos, members)) = world.mob(id).map(|mob| (mob.pos, mob.group.clone())) else {
        return;
    };
    for member in &members {
        let Some(member_pos) = world.mob(*member).map(|mob| mob.pos) else {
            continue;
        };
        let angle = if member_pos == pos {
            world.mob(id).map_or(0.0, |mob| mob.angle + PI)
        } else {
            pos.angle_to(member_pos)
        };
        let spot = pos + Vec2::from_angle(angle, DISMISS_DISTANCE);
        world.run_event(*member, MobEvent::Dismissed, &EventPayload::Point(spot));
        world.leave_group(*member);
    }
    animate(world, id, "dismissing");
    debug!(mob = id.0, dismissed = members.len(), "leader_dismissed_group");
}

fn start_drinking(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(drop) = payload.mob() else {
        return;
    };
    world.focus_on_mob(id, drop);
    stand_still(world, id, payload);
    animate(world, id, "drinking");
}

fn finish_drinking(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(drop) = world.mob(id).and_then(|mob| mob.focused_mob) else {
        return;
    };
    let status = world
        .mob(drop)
        .and_then(|mob| mob.mob_type.drop_info())
        .filter(|info| info.effect == DropEffect::GiveStatus)
        .and_then(|info| info.status_to_give.clone());
    if let Some(status) = status {
        world.receive_status(id, &status);
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.unfocus();
    }
}

/// Goes back to the state matching whether the player controls this leader.
fn return_to_control(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let active = world
        .mob(id)
        .and_then(Mob::leader)
        .is_some_and(|state| state.active);
    let next = if active { ACTIVE } else { IDLING };
    fsm::set_state(world, id, next, &EventPayload::None);
}

/// Only hits that actually deal damage knock the leader back.
fn get_hit(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
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
    release_held(world, id, payload);
    gen_mob::apply_attack_damage(world, id, hit, damage);
    fsm::set_state(world, id, KNOCKED_BACK, payload);
}

fn start_knockback(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let attacker_pos = payload.mob().and_then(|attacker| world.mob(attacker)).map(|m| m.pos);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        let angle = attacker_pos.map_or(mob.angle + PI, |from| from.angle_to(mob.pos));
        mob.speed = Vec2::from_angle(angle, KNOCKBACK_H_POWER);
        mob.speed_z = KNOCKBACK_V_POWER;
        mob.set_animation_named("knocked_back", AnimStart::Normal);
    }
}

fn start_dying(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    release_held(world, id, &EventPayload::None);
    world.start_dying(id);
    animate(world, id, "dying");
    debug!(mob = id.0, "leader_dying");
}

fn finish_dying(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    world.finish_dying(id);
}

#[cfg(test)]
mod tests {
    use engine::mob::{LeaderTypeInfo, MobTypeInfo, Team};
    use engine::{ContentCatalog, MobTypeDatabase};

    use super::*;
    use crate::fsms::pikmin;

    fn world() -> (MobWorld, MobId) {
        let mut leader_type = MobType::new("Olimar", MobCategoryId::Leaders)
            .with_animations(&["idling", "whistling", "throwing", "dismissing"]);
        leader_type.default_team = Team::Player1;
        leader_type.info = MobTypeInfo::Leader(LeaderTypeInfo::default());
        create_fsm(&mut leader_type);
        let mut pikmin_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin)
            .with_animations(&["idling", "called", "walking", "thrown"]);
        pikmin_type.default_team = Team::Player1;
        pikmin::create_fsm(&mut pikmin_type);

        let types = MobTypeDatabase::from_types(vec![Arc::new(leader_type), Arc::new(pikmin_type)]);
        let mut world = MobWorld::new(types, Arc::new(ContentCatalog::default()), 4);
        let leader_type = Arc::clone(world.types().by_name("Olimar").expect("type"));
        let leader = world.create_mob(Vec2::ZERO, leader_type, 0.0, &[]);
        world.run_event(leader, MobEvent::LeaderActivated, &EventPayload::None);
        (world, leader)
    }

    fn spawn_pikmin(world: &mut MobWorld, pos: Vec2) -> MobId {
        let mob_type = Arc::clone(world.types().by_name("Red Pikmin").expect("type"));
        world.create_mob(pos, mob_type, 0.0, &[])
    }

    fn state_of(world: &MobWorld, id: MobId) -> Option<String> {
        world.mob(id).and_then(|mob| mob.state_name()).map(str::to_string)
    }

    fn whistle_in(world: &mut MobWorld, leader: MobId, pikmin: MobId) {
        world.run_event(leader, MobEvent::LeaderStartWhistle, &EventPayload::None);
        assert_eq!(state_of(world, pikmin).as_deref(), Some("called"));
        world.run_event(pikmin, MobEvent::AnimationEnd, &EventPayload::None);
        world.run_event(leader, MobEvent::LeaderStopWhistle, &EventPayload::None);
    }

    #[test]
    fn whistle_reaches_only_pikmin_in_range() {
        let (mut world, leader) = world();
        let near = spawn_pikmin(&mut world, Vec2::new(30.0, 0.0));
        let far = spawn_pikmin(&mut world, Vec2::new(500.0, 0.0));

        whistle_in(&mut world, leader, near);

        assert_eq!(state_of(&world, near).as_deref(), Some("in_group_chasing"));
        assert_eq!(state_of(&world, far).as_deref(), Some("idling"));
        assert_eq!(world.mob(leader).expect("leader").group, vec![near]);
    }

    #[test]
    fn grab_and_throw_sends_the_pikmin_flying() {
        let (mut world, leader) = world();
        let pikmin = spawn_pikmin(&mut world, Vec2::new(20.0, 0.0));
        whistle_in(&mut world, leader, pikmin);

        world.run_event(leader, MobEvent::LeaderHolding, &EventPayload::Mob(pikmin));
        assert_eq!(state_of(&world, leader).as_deref(), Some("holding"));
        assert_eq!(state_of(&world, pikmin).as_deref(), Some("grabbed_by_leader"));
        assert_eq!(world.mob(pikmin).expect("pikmin").holder, Some(leader));

        world.run_event(
            leader,
            MobEvent::LeaderThrow,
            &EventPayload::Point(Vec2::new(200.0, 0.0)),
        );
        let thrown = world.mob(pikmin).expect("pikmin");
        assert_eq!(thrown.state_name(), Some("thrown"));
        assert_eq!(thrown.holder, None);
        assert_eq!(thrown.following_group, None);
        assert!(thrown.flags.was_thrown);
        assert!(thrown.speed_z > 0.0);
        assert_eq!(state_of(&world, leader).as_deref(), Some("throwing"));
    }

    #[test]
    fn release_order_puts_the_pikmin_back_in_the_group() {
        let (mut world, leader) = world();
        let pikmin = spawn_pikmin(&mut world, Vec2::new(20.0, 0.0));
        whistle_in(&mut world, leader, pikmin);
        world.run_event(leader, MobEvent::LeaderHolding, &EventPayload::Mob(pikmin));

        world.run_event(leader, MobEvent::ReleaseOrder, &EventPayload::Mob(pikmin));

        assert_eq!(state_of(&world, leader).as_deref(), Some("active"));
        assert_eq!(state_of(&world, pikmin).as_deref(), Some("in_group_chasing"));
        assert_eq!(world.mob(pikmin).expect("pikmin").holder, None);
    }

    #[test]
    fn dismissing_empties_the_group() {
        let (mut world, leader) = world();
        let pikmin = spawn_pikmin(&mut world, Vec2::new(20.0, 0.0));
        whistle_in(&mut world, leader, pikmin);

        world.run_event(leader, MobEvent::LeaderDismiss, &EventPayload::None);

        assert!(world.mob(leader).expect("leader").group.is_empty());
        assert_eq!(
            state_of(&world, pikmin).as_deref(),
            Some("going_to_dismiss_spot")
        );
        let chase = world.mob(pikmin).expect("pikmin").chase.expect("chase");
        assert!(matches!(chase.target, engine::mob::ChaseTarget::Point { .. }));
    }

    #[test]
    fn inactive_leaders_ignore_the_whistle_button() {
        let (mut world, leader) = world();
        world.run_event(leader, MobEvent::LeaderInactivated, &EventPayload::None);
        assert_eq!(state_of(&world, leader).as_deref(), Some("idling"));
        assert!(!world.mob(leader).and_then(Mob::leader).expect("leader").active);
        world.run_event(leader, MobEvent::LeaderStartWhistle, &EventPayload::None);
        assert_eq!(state_of(&world, leader).as_deref(), Some("idling"));
    }
}
