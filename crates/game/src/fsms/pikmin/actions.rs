use std::f32::consts::{FRAC_PI_2, PI, TAU};

use engine::fsm::{self, gen_mob};
use engine::mob::{
    AnimStart, AttackMethod, CircleInfo, DropEffect, GroupTaskPose, HitboxKind, MobCategoryId,
    PikminState, PikminTypeInfo, ScriptParticles, SpotState, StatusStateChange, StatusType,
    TrackRide, TrackRidingPose,
};
use engine::script::HitboxInteraction;
use engine::{EventPayload, Mob, MobEvent, MobId, MobWorld, Vec2};
use tracing::debug;

use super::{
    ATTACKING_GROUNDED, ATTACKING_LATCHED, CALLED, CALLED_H, CELEBRATING, CIRCLING_OPPONENT,
    FLAILING, GOING_TO_GROUP_TASK, GOING_TO_OPPONENT, GOING_TO_TOOL, GRABBED_BY_ENEMY, HELPLESS,
    IDLING, IDLING_H, IMPACT_BOUNCE, IMPACT_LUNGE, IN_GROUP_CHASING, IN_GROUP_CHASING_H,
    KNOCKED_BACK, KNOCKED_DOWN, MOB_LANDING, PANICKING, RETURNING, SIGHING, SPROUT,
};

const BORED_ANIM_MIN_DELAY: f32 = 1.0;
const BORED_ANIM_MAX_DELAY: f32 = 5.0;
const CIRCLE_OPPONENT_CHANCE_GROUNDED: f32 = 0.2;
const CIRCLE_OPPONENT_CHANCE_PRE_LATCH: f32 = 0.5;
const DISMISS_TIMEOUT: f32 = 4.0;
const FLIER_ABOVE_FLOOR_HEIGHT: f32 = 55.0;
const GOTO_TIMEOUT: f32 = 5.0;
const GROUNDED_ATTACK_DIST: f32 = 5.0;
const GROUP_SPOT_INTERVAL: f32 = 12.0;
const GROUP_SPOTS_PER_ROW: usize = 6;
const IMPACT_BOUNCE_SPEED: f32 = 200.0;
const IMPACT_BOUNCE_SPEED_Z: f32 = 500.0;
const INVULN_PERIOD: f32 = 0.7;
const KNOCKBACK_H_POWER: f32 = 130.0;
const KNOCKBACK_V_POWER: f32 = 200.0;
const LATCH_JITTER: f32 = 2.0;
const MAX_CONSECUTIVE_DINGS: u32 = 4;
const MAX_MATURITY: i32 = 2;
const PANIC_CHASE_INTERVAL: f32 = 0.2;
const PANIC_WANDER_DIST: f32 = 1000.0;
const FLAIL_CHASE_INTERVAL: f32 = 1.0;
const MISSED_LANDING_BOUNCE: f32 = -0.3;
const REACH_IDLE_TASK: usize = 0;
const REACH_SWARM: usize = 1;
const THROW_HOR_SPEED: f32 = 80.0;
const THROW_VER_SPEED: f32 = 900.0;

const PARTICLES_PLUCK_DIRT: &str = "pikmin_pluck_dirt";
const PARTICLES_SEED: &str = "pikmin_seed";
const PARTICLES_SEED_LANDED: &str = "pikmin_seed_landed";
const PARTICLES_THROW: &str = "throw_trail";

const ANIM_ARMS_OUT: &str = "arms_out";
const ANIM_ATTACKING: &str = "attacking";
const ANIM_BACKFLIP: &str = "backflip";
const ANIM_BOUNCED_BACK: &str = "bounced_back";
const ANIM_CALLED: &str = "called";
const ANIM_CARRYING: &str = "carrying";
const ANIM_CARRYING_LIGHT: &str = "carrying_light";
const ANIM_CARRYING_STRUGGLE: &str = "carrying_struggle";
const ANIM_CLIMBING: &str = "climbing";
const ANIM_CRUSHED: &str = "crushed";
const ANIM_DRINKING: &str = "drinking";
const ANIM_DYING: &str = "dying";
const ANIM_FLAILING: &str = "flailing";
const ANIM_GETTING_UP: &str = "getting_up";
const ANIM_IDLING: &str = "idling";
const ANIM_KNOCKED_BACK: &str = "knocked_back";
const ANIM_KNOCKED_DOWN_DYING: &str = "knocked_down_dying";
const ANIM_LYING: &str = "lying";
const ANIM_MOB_LANDING: &str = "mob_landing";
const ANIM_PICKING_UP: &str = "picking_up";
const ANIM_PLUCKING: &str = "plucking";
const ANIM_PLUCKING_THROWN: &str = "plucking_thrown";
const ANIM_PUSHING: &str = "pushing";
const ANIM_SIGHING: &str = "sighing";
const ANIM_SLIDING: &str = "sliding";
const ANIM_SPROUT: &str = "sprout";
const ANIM_THROWN: &str = "thrown";
const ANIM_TWIRLING: &str = "twirling";
const ANIM_WALKING: &str = "walking";

const BOREDOM_ANIMS: [&str; 3] = ["looking_around", "sitting", "lounging"];

fn type_info(world: &MobWorld, id: MobId) -> PikminTypeInfo {
    world
        .mob(id)
        .and_then(|mob| mob.mob_type.pikmin_info().cloned())
        .unwrap_or_default()
}

fn can_fly(world: &MobWorld, id: MobId) -> bool {
    world
        .mob(id)
        .and_then(|mob| mob.mob_type.pikmin_info())
        .is_some_and(|info| info.can_fly)
}

fn pikmin(world: &MobWorld, id: MobId) -> Option<&PikminState> {
    world.mob(id).and_then(Mob::pikmin)
}

fn pikmin_mut(world: &mut MobWorld, id: MobId) -> Option<&mut PikminState> {
    world.mob_mut(id).and_then(Mob::pikmin_mut)
}

fn focus(world: &MobWorld, id: MobId) -> Option<MobId> {
    world.mob(id).and_then(|mob| mob.focused_mob)
}

fn animate(world: &mut MobWorld, id: MobId, name: &str, start: AnimStart) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_animation_named(name, start);
    }
}

fn enable_midair_if_flier(world: &mut MobWorld, id: MobId) {
    if can_fly(world, id) {
        if let Some(mob) = world.mob_mut(id) {
            mob.flags.can_move_midair = true;
        }
    }
}

fn disable_midair(world: &mut MobWorld, id: MobId) {
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.can_move_midair = false;
    }
}

/// The tool this Pikmin has in its hands, if any.
fn held_tool(world: &MobWorld, id: MobId) -> Option<MobId> {
    let first = *world.mob(id)?.holding.first()?;
    let is_tool = world
        .mob(first)
        .is_some_and(|held| held.category_id() == MobCategoryId::Tools);
    is_tool.then_some(first)
}

fn called_state(world: &MobWorld, id: MobId) -> usize {
    if held_tool(world, id).is_some() {
        CALLED_H
    } else {
        CALLED
    }
}

fn go_to(world: &mut MobWorld, id: MobId, state: usize, payload: &EventPayload) {
    fsm::set_state(world, id, state, payload);
}

fn bored_delay(world: &mut MobWorld) -> f32 {
    world.rng_f(BORED_ANIM_MIN_DELAY, BORED_ANIM_MAX_DELAY)
}

fn add_particles(world: &mut MobWorld, id: MobId, generator: &str) {
    if let Some(mob) = world.mob_mut(id) {
        mob.particle_generators.push(ScriptParticles {
            generator: generator.to_string(),
            offset: Vec2::ZERO,
            z: 0.0,
        });
    }
}

fn remove_particles(world: &mut MobWorld, id: MobId, generator: &str) {
    if let Some(mob) = world.mob_mut(id) {
        mob.particle_generators
            .retain(|particles| particles.generator != generator);
    }
}

fn increase_maturity(world: &mut MobWorld, id: MobId, amount: i32) {
    if let Some(state) = pikmin_mut(world, id) {
        let maturity = (i32::from(state.maturity) + amount).clamp(0, MAX_MATURITY);
        state.maturity = maturity as u8;
        debug!(mob = id.0, maturity, "pikmin_maturity_changed");
    }
}

/// Where this Pikmin should stand while following `leader`: rows behind it,
/// filled in group order.
fn group_spot(world: &MobWorld, id: MobId, leader: MobId) -> Option<(Vec2, f32)> {
    let leader_mob = world.mob(leader)?;
    let idx = leader_mob
        .group
        .iter()
        .position(|member| *member == id)
        .unwrap_or(0);
    let row = (idx / GROUP_SPOTS_PER_ROW + 1) as f32;
    let column = (idx % GROUP_SPOTS_PER_ROW) as f32 - (GROUP_SPOTS_PER_ROW - 1) as f32 / 2.0;
    let behind = leader_mob.angle + PI;
    let offset = Vec2::from_angle(behind, leader_mob.radius + row * GROUP_SPOT_INTERVAL)
        + Vec2::from_angle(behind + FRAC_PI_2, column * GROUP_SPOT_INTERVAL);
    Some((leader_mob.pos + offset, leader_mob.z))
}

fn apply_knockback(world: &mut MobWorld, id: MobId, angle: f32) {
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.speed = Vec2::from_angle(angle, KNOCKBACK_H_POWER);
        mob.speed_z = KNOCKBACK_V_POWER;
        mob.face(angle + PI);
    }
}

fn latch(world: &mut MobWorld, id: MobId, target: MobId) {
    let jitter = Vec2::new(
        world.rng_f(-LATCH_JITTER, LATCH_JITTER),
        world.rng_f(-LATCH_JITTER, LATCH_JITTER),
    );
    if let Some(mob) = world.mob_mut(id) {
        mob.speed = Vec2::ZERO;
        mob.speed_z = 0.0;
        mob.pos += jitter;
    }
    world.hold(target, id);
    if let Some(state) = pikmin_mut(world, id) {
        state.latched = true;
    }
}

/// Sends the Pikmin back to the closest leader after a tool did its job.
fn return_to_closest_leader(world: &mut MobWorld, id: MobId) {
    if let Some(leader) = world.closest_leader(id) {
        let target = called_state(world, id);
        go_to(world, id, target, &EventPayload::Mob(leader));
    }
}

pub(super) fn be_attacked(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    match payload.hitbox().copied() {
        Some(hit) => {
            let attacker_view = HitboxInteraction {
                mob2: id,
                h1: hit.h2,
                h2: hit.h1,
            };
            if let Some(damage) = world.attack_damage(hit.mob2, id, &attacker_view) {
                gen_mob::apply_attack_damage(world, id, hit, damage);
            }
            let away = world
                .mob(hit.mob2)
                .zip(world.mob(id))
                .map(|(attacker, victim)| attacker.pos.angle_to(victim.pos));
            if let Some(angle) = away {
                apply_knockback(world, id, angle);
            }
        }
        None => {
            if let Some(mob) = world.mob_mut(id) {
                mob.stop_chasing();
                mob.speed_z = KNOCKBACK_V_POWER;
            }
        }
    }
    world.leave_group(id);
    be_released(world, id, payload);
    notify_leader_release(world, id, payload);
    release_tool(world, id, &EventPayload::None);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_turning();
    }
}

pub(super) fn become_helpless(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    disable_midair(world, id);
    world.leave_group(id);
    animate(world, id, ANIM_IDLING, AnimStart::Normal);
}

pub(super) fn become_idle(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    stand_still(world, id, payload);
    let flier = can_fly(world, id);
    let delay = bored_delay(world);
    if let Some(mob) = world.mob_mut(id) {
        if flier {
            mob.flags.can_move_midair = true;
            let pos = mob.pos;
            mob.chase_point(pos, FLIER_ABOVE_FLOOR_HEIGHT, false);
        }
        mob.unfocus();
        mob.set_animation_named(ANIM_IDLING, AnimStart::RandomTime);
        mob.set_timer(delay);
    }
}

pub(super) fn become_sprout(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    world.leave_group(id);
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.intangible = true;
        mob.flags.non_huntable = true;
        mob.flags.non_hurtable = true;
        mob.flags.can_move_midair = false;
        mob.set_animation_named(ANIM_SPROUT, AnimStart::RandomTime);
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.is_seed_or_sprout = true;
    }
}

pub(super) fn be_crushed(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    start_dying(world, id, payload);
    if let Some(mob) = world.mob_mut(id) {
        mob.z = 0.0;
        mob.set_animation_named(ANIM_CRUSHED, AnimStart::Normal);
    }
}

pub(super) fn be_dismissed(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(spot) = payload.point() else {
        return;
    };
    enable_midair_if_flier(world, id);
    if let Some(mob) = world.mob_mut(id) {
        let z = mob.z;
        mob.chase_point(spot, z, false);
    }
}

pub(super) fn begin_pluck(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(leader) = payload.mob() else {
        return;
    };
    world.focus_on_mob(id, leader);
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.intangible = false;
        mob.flags.non_huntable = false;
        mob.flags.non_hurtable = false;
        mob.set_timer(0.0);
        mob.set_animation_named(ANIM_PLUCKING, AnimStart::Normal);
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.is_seed_or_sprout = false;
    }
    debug!(mob = id.0, leader = leader.0, "pikmin_plucked");
}

pub(super) fn be_grabbed_by_enemy(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let EventPayload::EatHitbox { eater, .. } = *payload else {
        return;
    };
    world.chomp(eater, id);
    if let Some(state) = pikmin_mut(world, id) {
        state.is_grabbed_by_enemy = true;
    }
    disable_midair(world, id);
    world.leave_group(id);
    animate(world, id, ANIM_FLAILING, AnimStart::RandomTime);
}

pub(super) fn be_grabbed_by_friend(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    disable_midair(world, id);
    animate(world, id, ANIM_IDLING, AnimStart::Normal);
}

pub(super) fn be_released(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(state) = pikmin_mut(world, id) {
        state.is_grabbed_by_enemy = false;
    }
}

pub(super) fn be_thrown(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    disable_midair(world, id);
    animate(world, id, ANIM_THROWN, AnimStart::Normal);
    add_particles(world, id, PARTICLES_THROW);
}

pub(super) fn be_thrown_after_pluck(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(leader_pos) = focus(world, id).and_then(|leader| world.mob(leader)).map(|m| m.pos) else {
        return;
    };
    disable_midair(world, id);
    if let Some(mob) = world.mob_mut(id) {
        let angle = mob.pos.angle_to(leader_pos);
        mob.speed = Vec2::from_angle(angle, THROW_HOR_SPEED);
        mob.speed_z = THROW_VER_SPEED;
        mob.face(angle + PI);
        mob.set_animation_named(ANIM_PLUCKING_THROWN, AnimStart::Normal);
    }
    add_particles(world, id, PARTICLES_THROW);
    add_particles(world, id, PARTICLES_PLUCK_DIRT);
}

pub(super) fn be_thrown_by_bouncer(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    disable_midair(world, id);
    animate(world, id, ANIM_THROWN, AnimStart::Normal);
    add_particles(world, id, PARTICLES_THROW);
}

pub(super) fn called(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(caller) = payload.mob() else {
        return;
    };
    if let Some(state) = pikmin_mut(world, id) {
        state.was_last_hit_ding = false;
        state.consecutive_dings = 0;
    }
    stand_still(world, id, payload);
    world.focus_on_mob(id, caller);
    animate(world, id, ANIM_CALLED, AnimStart::Normal);
}

pub(super) fn called_while_knocked_down(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(caller) = payload.mob() else {
        return;
    };
    // temp_i == 1 marks that this knockdown already got its whistle bonus.
    if pikmin(world, id).is_some_and(|state| state.temp_i == 1) {
        return;
    }
    let bonus = type_info(world, id).knocked_down_whistle_bonus;
    world.focus_on_mob(id, caller);
    if let Some(mob) = world.mob_mut(id) {
        mob.script_timer.time_left = (mob.script_timer.time_left - bonus).max(0.01);
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.temp_i = 1;
    }
}

pub(super) fn celebrate(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let anim = if world.rng_i(0, 1) == 0 {
        ANIM_BACKFLIP
    } else {
        ANIM_TWIRLING
    };
    animate(world, id, anim, AnimStart::Normal);
}

pub(super) fn check_boredom_anim_end(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if !pikmin(world, id).is_some_and(|state| state.in_bored_animation) {
        return;
    }
    let delay = bored_delay(world);
    if let Some(mob) = world.mob_mut(id) {
        mob.set_animation_named(ANIM_IDLING, AnimStart::Normal);
        mob.set_timer(delay);
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.in_bored_animation = false;
    }
}

/// Confirms an enemy's attack hitbox really hurts before reacting to it.
pub(super) fn check_incoming_attack(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(hit) = payload.hitbox().copied() else {
        return;
    };
    if world.mob(id).map_or(true, |mob| mob.invuln_period > 0.0) {
        return;
    }
    let attacker_view = HitboxInteraction {
        mob2: id,
        h1: hit.h2,
        h2: hit.h1,
    };
    if world.attack_damage(hit.mob2, id, &attacker_view).is_none() {
        return;
    }
    world.run_event(id, MobEvent::PikminDamageConfirmed, payload);
}

pub(super) fn check_leader_bump(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let delay = type_info(world, id).idle_bump_delay;
    if let Some(state) = pikmin_mut(world, id) {
        if state.bump_lock > 0.0 {
            state.bump_lock = delay;
            return;
        }
    }
    let target = called_state(world, id);
    go_to(world, id, target, payload);
}

/// Marks the swing as a ding if it did no damage. Only a new attack clears
/// the mark, so later damaging hits do not.
pub(super) fn check_outgoing_attack(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(hit) = payload.hitbox().copied() else {
        return;
    };
    let damage = world.attack_damage(id, hit.mob2, &hit).unwrap_or(0.0);
    if damage == 0.0 {
        if let Some(state) = pikmin_mut(world, id) {
            state.was_last_hit_ding = true;
        }
    }
}

pub(super) fn check_shaking_anim_end(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if !pikmin(world, id).is_some_and(|state| state.in_shaking_animation) {
        return;
    }
    let delay = bored_delay(world);
    if let Some(mob) = world.mob_mut(id) {
        mob.set_animation_named(ANIM_IDLING, AnimStart::Normal);
        mob.set_timer(delay);
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.in_shaking_animation = false;
    }
}

pub(super) fn circle_opponent(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(target) = focus(world, id) else {
        return;
    };
    let Some((target_pos, target_radius)) = world.mob(target).map(|m| (m.pos, m.radius)) else {
        return;
    };
    // Squared so short circles are more likely than long ones.
    let roll = world.rng_f(0.0, 1.0);
    let circle_time = roll * roll + 0.5;
    let clockwise = world.rng_f(0.0, 1.0) <= 0.5;
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.stop_circling();
        mob.set_timer(circle_time);
        mob.circling = Some(CircleInfo {
            center: target,
            radius: target_radius + mob.radius,
            clockwise,
            angle: target_pos.angle_to(mob.pos),
        });
        mob.set_animation_named(ANIM_WALKING, AnimStart::RandomTime);
    }
}

pub(super) fn clear_boredom_data(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    clear_timer(world, id, payload);
    if let Some(state) = pikmin_mut(world, id) {
        state.in_bored_animation = false;
    }
}

pub(super) fn clear_timer(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(0.0);
    }
}

/// Picks how to engage the focused opponent: latch on, hit it from the
/// ground, lunge at it, or circle around it first.
pub(super) fn decide_attack(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(target) = focus(world, id) else {
        return;
    };
    let info = type_info(world, id);
    let Some(mob) = world.mob(id) else {
        return;
    };
    if mob.invuln_period > 0.0 {
        return;
    }
    let (pos, z, height, radius) = (mob.pos, mob.z, mob.height, mob.radius);
    let circling_now = mob.fsm.cur_state == Some(CIRCLING_OPPONENT);
    let Some(target_mob) = world.mob(target) else {
        return;
    };
    let can_circle = !circling_now && target_mob.category_id() == MobCategoryId::Enemies;
    let can_latch = target_mob
        .closest_hitbox(pos, Some(HitboxKind::Normal))
        .and_then(|(idx, edge_dist)| {
            let hitbox = target_mob.mob_type.hitboxes.get(idx)?;
            let hitbox_z = hitbox.z + target_mob.z;
            let reachable = hitbox.can_pikmin_latch
                && hitbox_z <= z + height
                && hitbox_z + hitbox.height >= z
                && edge_dist < radius;
            reachable.then_some(idx)
        })
        .is_some();

    if let Some(mob) = world.mob_mut(id) {
        if info.can_fly {
            mob.flags.can_move_midair = true;
        }
        mob.stop_chasing();
        mob.stop_circling();
    }

    let next = match info.attack_method {
        AttackMethod::Latch if !can_latch => {
            if world.rng_f(0.0, 1.0) <= CIRCLE_OPPONENT_CHANCE_GROUNDED && can_circle {
                CIRCLING_OPPONENT
            } else {
                ATTACKING_GROUNDED
            }
        }
        AttackMethod::Latch => {
            if world.rng_f(0.0, 1.0) <= CIRCLE_OPPONENT_CHANCE_PRE_LATCH && can_circle {
                CIRCLING_OPPONENT
            } else {
                latch(world, id, target);
                ATTACKING_LATCHED
            }
        }
        AttackMethod::Impact => {
            if world.rng_f(0.0, 1.0) <= CIRCLE_OPPONENT_CHANCE_GROUNDED && can_circle {
                CIRCLING_OPPONENT
            } else {
                IMPACT_LUNGE
            }
        }
    };
    go_to(world, id, next, &EventPayload::None);
}

pub(super) fn do_impact_bounce(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let target_pos = focus(world, id)
        .and_then(|target| world.mob(target))
        .map(|target| target.pos);
    let Some(mob) = world.mob_mut(id) else {
        return;
    };
    mob.flags.can_move_midair = false;
    let (angle, speed) = match target_pos {
        Some(target_pos) => (target_pos.angle_to(mob.pos), IMPACT_BOUNCE_SPEED),
        None => (0.0, 0.0),
    };
    mob.speed = Vec2::from_angle(angle, speed);
    mob.speed_z = IMPACT_BOUNCE_SPEED_Z;
    mob.face(angle + PI);
    mob.set_animation_named(ANIM_BOUNCED_BACK, AnimStart::Normal);
}

pub(super) fn enter_onion(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(onion) = focus(world, id) else {
        return;
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.can_move_midair = false;
        mob.stop_chasing();
        mob.track_ride = Some(TrackRide {
            track: onion,
            checkpoint: 0,
            progress: 0.0,
        });
        mob.set_animation_named(ANIM_CLIMBING, AnimStart::RandomTime);
    }
}

pub(super) fn finish_called_anim(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let holding = world.mob(id).is_some_and(|mob| !mob.holding.is_empty());
    match focus(world, id) {
        Some(leader) => {
            let top_leader = world
                .mob(leader)
                .and_then(|mob| mob.following_group)
                .unwrap_or(leader);
            world.add_to_group(top_leader, id);
            let next = if holding { IN_GROUP_CHASING_H } else { IN_GROUP_CHASING };
            go_to(world, id, next, payload);
        }
        None => {
            let next = if holding { IDLING_H } else { IDLING };
            go_to(world, id, next, payload);
        }
    }
}

pub(super) fn finish_carrying(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(carried) = pikmin(world, id).and_then(|state| state.carrying_mob) else {
        return;
    };
    let must_return = world
        .mob(carried)
        .and_then(|mob| mob.carry.as_ref())
        .is_some_and(|carry| carry.must_return);
    if must_return {
        go_to(world, id, RETURNING, &EventPayload::Mob(carried));
    } else {
        go_to(world, id, CELEBRATING, &EventPayload::None);
    }
}

pub(super) fn finish_drinking(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(drop) = focus(world, id) else {
        return;
    };
    let info = world
        .mob(drop)
        .and_then(|mob| mob.mob_type.drop_info().cloned());
    if let Some(info) = info {
        match info.effect {
            DropEffect::IncreaseMaturity => increase_maturity(world, id, info.increase_amount),
            DropEffect::GiveStatus => {
                if let Some(status) = &info.status_to_give {
                    world.receive_status(id, status);
                }
            }
        }
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.unfocus();
    }
}

pub(super) fn finish_dying(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    world.finish_dying(id);
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.to_delete = true;
    }
    debug!(mob = id.0, "pikmin_died");
}

pub(super) fn finish_getting_up(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let previous_focus = focus(world, id);
    go_to(world, id, IDLING, &EventPayload::None);
    let Some(previous) = previous_focus else {
        return;
    };
    let is_leader = world
        .mob(previous)
        .is_some_and(|mob| mob.category_id() == MobCategoryId::Leaders);
    if world.can_hunt(id, previous) {
        world.run_event(id, MobEvent::OpponentInReach, &EventPayload::Mob(previous));
    } else if is_leader {
        world.run_event(id, MobEvent::Whistled, &EventPayload::Mob(previous));
    }
}

pub(super) fn finish_mob_landing(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if focus(world, id).is_none() {
        go_to(world, id, IDLING, &EventPayload::None);
        return;
    }
    let next = match type_info(world, id).attack_method {
        AttackMethod::Latch => ATTACKING_LATCHED,
        AttackMethod::Impact => IMPACT_BOUNCE,
    };
    go_to(world, id, next, &EventPayload::None);
}

pub(super) fn finish_picking_up(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let tool = focus(world, id).filter(|tool| {
        world
            .mob(*tool)
            .and_then(Mob::tool)
            .is_some_and(|state| state.holdable_by_pikmin)
    });
    let Some(tool) = tool else {
        go_to(world, id, IDLING, &EventPayload::None);
        return;
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.unfocus();
    }
    world.hold(id, tool);
    debug!(mob = id.0, tool = tool.0, "pikmin_picked_up_tool");
    go_to(world, id, IDLING_H, &EventPayload::None);
}

pub(super) fn flail_to_leader(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(target) = payload
        .mob()
        .and_then(|leader| world.mob(leader))
        .map(|leader| (leader.pos, leader.z))
    else {
        return;
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.chase_point(target.0, target.1, false);
    }
}

pub(super) fn forget_carriable_object(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some((carried, spot)) = pikmin(world, id).and_then(|s| Some((s.carrying_mob?, s.temp_i))) else {
        return;
    };
    if let Some(carry) = world.mob_mut(carried).and_then(|mob| mob.carry.as_mut()) {
        if let Some(spot) = carry.spots.get_mut(spot) {
            if spot.pikmin == Some(id) {
                spot.state = SpotState::Free;
                spot.pikmin = None;
            }
        }
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.carrying_mob = None;
    }
}

pub(super) fn forget_group_task(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(task) = focus(world, id) else {
        return;
    };
    let mut was_working = false;
    let Some(task_state) = world.mob_mut(task).and_then(Mob::group_task_mut) else {
        return;
    };
    for spot in task_state
        .spots
        .iter_mut()
        .filter(|spot| spot.pikmin == Some(id))
    {
        was_working |= spot.state == SpotState::Used;
        spot.state = SpotState::Free;
        spot.pikmin = None;
    }
    if was_working {
        world.run_event(task, MobEvent::WeightRemoved, &EventPayload::Mob(id));
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.unfocus();
    }
}

pub(super) fn forget_tool(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(tool) = focus(world, id) else {
        return;
    };
    if let Some(state) = world.mob_mut(tool).and_then(Mob::tool_mut) {
        if state.reserved == Some(id) {
            state.reserved = None;
        }
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.unfocus();
    }
}

pub(super) fn get_knocked_back(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    disable_midair(world, id);
    animate(world, id, ANIM_KNOCKED_BACK, AnimStart::Normal);
}

pub(super) fn get_knocked_down(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let duration = type_info(world, id).knocked_down_duration;
    if let Some(state) = pikmin_mut(world, id) {
        state.temp_i = 0;
    }
    enable_midair_if_flier(world, id);
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(duration);
        mob.set_animation_named(ANIM_LYING, AnimStart::Normal);
    }
}

pub(super) fn going_to_dismiss_spot(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    enable_midair_if_flier(world, id);
    let anim = if held_tool(world, id).is_some() {
        ANIM_CARRYING_LIGHT
    } else {
        ANIM_WALKING
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(DISMISS_TIMEOUT);
        mob.set_animation_named(anim, AnimStart::RandomTime);
    }
}

/// Claims the free carry spot closest to this Pikmin and walks to it.
pub(super) fn go_to_carriable_object(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(carried) = payload.mob() else {
        return;
    };
    let Some(pikmin_pos) = world.mob(id).map(|mob| mob.pos) else {
        return;
    };
    enable_midair_if_flier(world, id);
    world.leave_group(id);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.carrying_mob = Some(carried);
    }

    let claimed = {
        let Some(carried_mob) = world.mob_mut(carried) else {
            return;
        };
        let (carried_pos, carried_angle) = (carried_mob.pos, carried_mob.angle);
        let Some(carry) = carried_mob.carry.as_mut() else {
            return;
        };
        let spot_count = carry.spots.len();
        if carry.spots.iter().all(|spot| spot.state == SpotState::Free) {
            let base = carried_pos.angle_to(pikmin_pos) - carried_angle;
            for (idx, spot) in carry.spots.iter_mut().enumerate() {
                let angle = base + TAU / spot_count as f32 * idx as f32;
                spot.offset = Vec2::from_angle(angle, spot.offset.length());
            }
        }
        let closest = carry
            .spots
            .iter()
            .enumerate()
            .filter(|(_, spot)| spot.state == SpotState::Free)
            .map(|(idx, spot)| {
                let offset = spot.offset.rotated(carried_angle);
                (idx, offset, pikmin_pos.distance(carried_pos + offset))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));
        closest.and_then(|(idx, offset, _)| {
            let spot = carry.spots.get_mut(idx)?;
            spot.state = SpotState::Reserved;
            spot.pikmin = Some(id);
            Some((idx, offset))
        })
    };
    let Some((spot, offset)) = claimed else {
        return;
    };

    world.focus_on_mob(id, carried);
    if let Some(state) = pikmin_mut(world, id) {
        state.temp_i = spot;
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.chase_mob(carried, offset, false, 3.0);
        mob.set_timer(GOTO_TIMEOUT);
        mob.set_animation_named(ANIM_WALKING, AnimStart::RandomTime);
    }
}

pub(super) fn go_to_group_task(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(task) = payload.mob() else {
        return;
    };
    let midair = world.mob(id).is_some_and(|mob| mob.flags.can_move_midair);
    let Some(task_mob) = world.mob(task) else {
        return;
    };
    let flying_only = task_mob
        .mob_type
        .group_task_info()
        .is_some_and(|info| info.flying_pikmin_only);
    if flying_only && !midair {
        return;
    }
    let (task_pos, task_z, task_angle) = (task_mob.pos, task_mob.z, task_mob.angle);
    let Some(task_state) = world.mob_mut(task).and_then(Mob::group_task_mut) else {
        return;
    };
    let Some(spot_idx) = task_state.free_spot() else {
        return;
    };
    let spot = &mut task_state.spots[spot_idx];
    spot.state = SpotState::Reserved;
    spot.pikmin = Some(id);
    let spot_pos = task_pos + spot.offset.rotated(task_angle);

    enable_midair_if_flier(world, id);
    world.leave_group(id);
    world.focus_on_mob(id, task);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.chase_point(spot_pos, task_z, false);
        mob.set_timer(GOTO_TIMEOUT);
        mob.set_animation_named(ANIM_WALKING, AnimStart::RandomTime);
    }
    go_to(world, id, GOING_TO_GROUP_TASK, payload);
}

pub(super) fn go_to_onion(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(onion) = payload.mob() else {
        return;
    };
    let Some((onion_pos, onion_z)) = world.mob(onion).map(|mob| (mob.pos, mob.z)) else {
        return;
    };
    if let Some(state) = pikmin_mut(world, id) {
        state.temp_i = 0;
    }
    enable_midair_if_flier(world, id);
    release_tool(world, id, &EventPayload::Flag(true));
    world.focus_on_mob(id, onion);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.chase_point(onion_pos, onion_z, false);
    }
    world.leave_group(id);
    animate(world, id, ANIM_WALKING, AnimStart::RandomTime);
}

pub(super) fn go_to_opponent(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(target) = payload.mob() else {
        return;
    };
    let flier = can_fly(world, id);
    let Some((z, height, radius)) = world.mob(id).map(|mob| (mob.z, mob.height, mob.radius)) else {
        return;
    };
    let Some(target_mob) = world.mob(target) else {
        return;
    };
    if !flier
        && target_mob.category_id() == MobCategoryId::Enemies
        && target_mob.z > z + height
    {
        return;
    }
    let reach = radius + target_mob.radius + GROUNDED_ATTACK_DIST;
    world.focus_on_mob(id, target);
    if let Some(mob) = world.mob_mut(id) {
        if flier {
            mob.flags.can_move_midair = true;
        }
        mob.stop_chasing();
        mob.chase_mob(target, Vec2::ZERO, false, reach);
    }
    world.leave_group(id);
    animate(world, id, ANIM_WALKING, AnimStart::RandomTime);
    if let Some(state) = pikmin_mut(world, id) {
        state.was_last_hit_ding = false;
        state.consecutive_dings = 0;
    }
    go_to(world, id, GOING_TO_OPPONENT, payload);
}

pub(super) fn go_to_tool(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(tool) = payload.mob() else {
        return;
    };
    if !type_info(world, id).can_carry_tools {
        return;
    }
    let Some(tool_mob) = world.mob(tool) else {
        return;
    };
    let Some(tool_state) = tool_mob.tool() else {
        return;
    };
    if tool_state.reserved.is_some_and(|other| other != id) || !tool_state.holdable_by_pikmin {
        return;
    }
    let tool_radius = tool_mob.radius;
    if let Some(state) = world.mob_mut(tool).and_then(Mob::tool_mut) {
        state.reserved = Some(id);
    }
    enable_midair_if_flier(world, id);
    world.leave_group(id);
    world.focus_on_mob(id, tool);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        let reach = mob.radius + tool_radius;
        mob.chase_mob(tool, Vec2::ZERO, false, reach);
        mob.set_timer(GOTO_TIMEOUT);
        mob.set_animation_named(ANIM_WALKING, AnimStart::RandomTime);
    }
    go_to(world, id, GOING_TO_TOOL, payload);
}

pub(super) fn land(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    stand_still(world, id, payload);
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.was_thrown = false;
    }
    animate(world, id, ANIM_IDLING, AnimStart::Normal);
}

pub(super) fn land_after_impact_bounce(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    go_to(world, id, KNOCKED_DOWN, &EventPayload::None);
}

pub(super) fn land_after_pluck(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let leader = focus(world, id);
    stand_still(world, id, payload);
    animate(world, id, ANIM_IDLING, AnimStart::Normal);
    match leader {
        Some(leader) => {
            let top_leader = world
                .mob(leader)
                .and_then(|mob| mob.following_group)
                .unwrap_or(leader);
            world.add_to_group(top_leader, id);
            go_to(world, id, IN_GROUP_CHASING, &EventPayload::None);
        }
        None => go_to(world, id, IDLING, &EventPayload::None),
    }
}

/// A thrown Pikmin touched another mob's hitbox on the way down.
pub(super) fn land_on_mob(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(hit) = payload.hitbox().copied() else {
        return;
    };
    let was_thrown = world.mob(id).is_some_and(|mob| mob.flags.was_thrown);
    if was_thrown {
        world.run_event(hit.mob2, MobEvent::ThrownPikminLanded, &EventPayload::Mob(id));
    }
    if !world.can_hurt(id, hit.mob2) {
        return;
    }
    let method = type_info(world, id).attack_method;
    let good_hitbox = world
        .mob(hit.mob2)
        .and_then(|mob| mob.mob_type.hitboxes.get(hit.h2))
        .is_some_and(|hitbox| method != AttackMethod::Latch || hitbox.can_pikmin_latch);
    if !good_hitbox {
        if let Some(mob) = world.mob_mut(id) {
            mob.speed = mob.speed * MISSED_LANDING_BOUNCE;
        }
        return;
    }

    world.focus_on_mob(id, hit.mob2);
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.was_thrown = false;
    }
    match method {
        AttackMethod::Latch => latch(world, id, hit.mob2),
        AttackMethod::Impact => {
            if let Some(mob) = world.mob_mut(id) {
                mob.speed = Vec2::ZERO;
                mob.speed_z = 0.0;
            }
        }
    }
    go_to(world, id, MOB_LANDING, payload);
}

pub(super) fn land_on_mob_while_holding(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(hit) = payload.hitbox().copied() else {
        return;
    };
    let Some(tool) = held_tool(world, id) else {
        return;
    };
    if !world.can_hurt(id, hit.mob2) {
        return;
    }
    let was_thrown = world.mob(id).is_some_and(|mob| mob.flags.was_thrown);
    if was_thrown {
        world.run_event(hit.mob2, MobEvent::ThrownPikminLanded, &EventPayload::Mob(id));
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.was_thrown = false;
    }
    let Some(tool_info) = world.mob(tool).and_then(|mob| mob.mob_type.tool_info().cloned()) else {
        return;
    };
    if !tool_info.dropped_when_pikmin_lands_on_opponent {
        return;
    }
    release_tool(world, id, &EventPayload::None);
    go_to(world, id, IDLING, &EventPayload::None);
    if tool_info.stuck_when_pikmin_lands_on_opponent {
        if let Some(tool_mob) = world.mob_mut(tool) {
            tool_mob.speed = Vec2::ZERO;
            tool_mob.speed_z = 0.0;
        }
        world.focus_on_mob(tool, hit.mob2);
        world.hold(hit.mob2, tool);
    }
    if tool_info.pikmin_returns_after_using {
        return_to_closest_leader(world, id);
    }
}

pub(super) fn land_while_holding(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(tool) = held_tool(world, id) else {
        return;
    };
    stand_still(world, id, payload);
    if let Some(state) = pikmin_mut(world, id) {
        state.is_tool_primed_for_whistle = true;
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.was_thrown = false;
    }
    animate(world, id, ANIM_IDLING, AnimStart::Normal);
    let tool_info = world
        .mob(tool)
        .and_then(|mob| mob.mob_type.tool_info().cloned())
        .unwrap_or_default();
    if tool_info.dropped_when_pikmin_lands {
        release_tool(world, id, &EventPayload::None);
        go_to(world, id, IDLING, &EventPayload::None);
        if tool_info.pikmin_returns_after_using {
            return_to_closest_leader(world, id);
        }
    } else {
        go_to(world, id, IDLING_H, &EventPayload::None);
    }
}

pub(super) fn leave_onion(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    disable_midair(world, id);
    animate(world, id, ANIM_SLIDING, AnimStart::RandomTime);
}

pub(super) fn left_hazard(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    if let EventPayload::Hazard(name) = payload {
        remove_particles(world, id, name);
    }
}

pub(super) fn lose_latched_mob(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
    }
}

/// Tells the leader holding this Pikmin to let go of it.
pub(super) fn notify_leader_release(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(mob) = world.mob(id) else {
        return;
    };
    let Some(leader) = mob.following_group.filter(|leader| mob.holder == Some(*leader)) else {
        return;
    };
    world.run_event(leader, MobEvent::ReleaseOrder, &EventPayload::Mob(id));
}

pub(super) fn panic_new_chase(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let wander = Vec2::new(
        world.rng_f(-PANIC_WANDER_DIST, PANIC_WANDER_DIST),
        world.rng_f(-PANIC_WANDER_DIST, PANIC_WANDER_DIST),
    );
    if let Some(mob) = world.mob_mut(id) {
        let (pos, z) = (mob.pos, mob.z);
        mob.chase_point(pos + wander, z, false);
        mob.set_timer(PANIC_CHASE_INTERVAL);
    }
}

pub(super) fn prepare_to_attack(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(state) = pikmin_mut(world, id) {
        state.was_last_hit_ding = false;
    }
    let Some(target_pos) = focus(world, id).and_then(|target| world.mob(target)).map(|m| m.pos) else {
        return;
    };
    if let Some(mob) = world.mob_mut(id) {
        let angle = mob.pos.angle_to(target_pos);
        mob.face(angle);
        mob.set_animation_named(ANIM_ATTACKING, AnimStart::Normal);
    }
}

pub(super) fn reach_carriable_object(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some((carried, spot)) = pikmin(world, id).and_then(|s| Some((s.carrying_mob?, s.temp_i))) else {
        return;
    };
    let Some((carried_pos, offset)) = world.mob(carried).and_then(|mob| {
        let spot = mob.carry.as_ref()?.spots.get(spot)?;
        Some((mob.pos, spot.offset.rotated(mob.angle)))
    }) else {
        return;
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.chase_mob(carried, offset, true, 0.0);
        mob.face((carried_pos + offset).angle_to(carried_pos));
    }
    world.run_event(carried, MobEvent::CarrierAdded, &EventPayload::Mob(id));
    if let Some(state) = pikmin_mut(world, id) {
        state.in_carry_struggle_animation = false;
    }
    animate(world, id, ANIM_CARRYING, AnimStart::Normal);
}

pub(super) fn reach_dismiss_spot(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.set_animation_named(ANIM_IDLING, AnimStart::Normal);
    }
}

/// After a grounded swing: give up after too many dings, stop if the
/// opponent got away, or sometimes circle for a new angle.
pub(super) fn rechase_opponent(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(state) = pikmin_mut(world, id) {
        if state.was_last_hit_ding {
            state.consecutive_dings += 1;
            if state.consecutive_dings >= MAX_CONSECUTIVE_DINGS {
                state.consecutive_dings = 0;
                go_to(world, id, SIGHING, &EventPayload::None);
                return;
            }
        }
    }
    let in_reach = focus(world, id)
        .and_then(|target| Some((world.mob(id)?, world.mob(target)?)))
        .is_some_and(|(mob, target)| {
            target.health > 0.0
                && mob.pos.distance(target.pos)
                    <= mob.radius + target.radius + GROUNDED_ATTACK_DIST
        });
    if !in_reach {
        go_to(world, id, IDLING, &EventPayload::None);
    } else if world.rng_f(0.0, 1.0) <= CIRCLE_OPPONENT_CHANCE_GROUNDED {
        go_to(world, id, CIRCLING_OPPONENT, &EventPayload::None);
    }
}

/// Drops the tool. A `Flag(true)` payload asks for a gentle release.
pub(super) fn release_tool(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(tool) = held_tool(world, id) else {
        return;
    };
    let gentle = matches!(payload, EventPayload::Flag(true));
    let pos = world.mob(id).map(|mob| mob.pos).unwrap_or_default();
    if let Some(tool_mob) = world.mob_mut(tool) {
        tool_mob.set_var("gentle_release", if gentle { "true" } else { "false" });
    }
    world.release(id, tool);
    if let Some(tool_mob) = world.mob_mut(tool) {
        tool_mob.pos = pos;
        tool_mob.speed = Vec2::ZERO;
    }
    debug!(mob = id.0, tool = tool.0, gentle, "pikmin_released_tool");
}

pub(super) fn seed_landed(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.particle_generators.clear();
    }
    add_particles(world, id, PARTICLES_SEED_LANDED);
}

pub(super) fn set_bump_lock(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let delay = type_info(world, id).idle_bump_delay;
    if let Some(state) = pikmin_mut(world, id) {
        state.bump_lock = delay;
    }
}

pub(super) fn set_idle_task_reach(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.near_reach = REACH_IDLE_TASK;
    }
}

pub(super) fn set_swarm_reach(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.near_reach = REACH_SWARM;
    }
}

pub(super) fn sigh(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    animate(world, id, ANIM_SIGHING, AnimStart::Normal);
}

/// Leaf to bud, bud to flower, and a flower wilts back to a leaf.
pub(super) fn sprout_evolve(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(maturity) = pikmin(world, id).map(|state| state.maturity) else {
        return;
    };
    let amount = if maturity < 2 { 1 } else { -2 };
    increase_maturity(world, id, amount);
}

pub(super) fn sprout_schedule_evol(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let info = type_info(world, id);
    let Some(maturity) = pikmin(world, id).map(|state| usize::from(state.maturity)) else {
        return;
    };
    let time = info
        .sprout_evolution_time
        .get(maturity)
        .copied()
        .unwrap_or_default();
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(time);
    }
}

pub(super) fn stand_still(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_circling();
        mob.stop_following_path();
        mob.stop_chasing();
        mob.stop_turning();
        mob.speed = Vec2::ZERO;
    }
}

pub(super) fn start_boredom_anim(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let available: Vec<&str> = match world.mob(id) {
        Some(mob) => BOREDOM_ANIMS
            .into_iter()
            .filter(|name| mob.mob_type.animation_index(name).is_some())
            .collect(),
        None => return,
    };
    if available.is_empty() {
        return;
    }
    let pick = world.rng_i(0, available.len() as i32 - 1) as usize;
    animate(world, id, available[pick], AnimStart::Normal);
    if let Some(state) = pikmin_mut(world, id) {
        state.in_bored_animation = true;
    }
}

pub(super) fn start_chasing_leader(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(leader) = world.mob(id).and_then(|mob| mob.following_group) else {
        return;
    };
    world.focus_on_mob(id, leader);
    update_in_group_chasing(world, id, payload);
    let anim = if world.mob(id).is_some_and(|mob| mob.holding.is_empty()) {
        ANIM_WALKING
    } else {
        ANIM_CARRYING_LIGHT
    };
    animate(world, id, anim, AnimStart::RandomTime);
}

pub(super) fn start_drinking(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(drop) = payload.mob() else {
        return;
    };
    let Some(drop_pos) = world.mob(drop).map(|mob| mob.pos) else {
        return;
    };
    disable_midair(world, id);
    world.leave_group(id);
    world.focus_on_mob(id, drop);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        let angle = mob.pos.angle_to(drop_pos);
        mob.face(angle);
        mob.set_animation_named(ANIM_DRINKING, AnimStart::Normal);
    }
}

pub(super) fn start_dying(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    world.start_dying(id);
    world.leave_group(id);
    be_released(world, id, payload);
    notify_leader_release(world, id, payload);
    release_tool(world, id, &EventPayload::None);
    animate(world, id, ANIM_DYING, AnimStart::Normal);
}

pub(super) fn start_flailing(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    release_tool(world, id, &EventPayload::None);
    disable_midair(world, id);
    world.leave_group(id);
    if let Some(mob) = world.mob_mut(id) {
        // Keep heading wherever the Pikmin was already going.
        let (pos, z) = (mob.pos, mob.z);
        mob.chase_point(pos, z, false);
        mob.set_timer(FLAIL_CHASE_INTERVAL);
        mob.set_animation_named(ANIM_FLAILING, AnimStart::RandomTime);
    }
}

pub(super) fn start_getting_up(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    enable_midair_if_flier(world, id);
    animate(world, id, ANIM_GETTING_UP, AnimStart::Normal);
}

pub(super) fn start_impact_lunge(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(target) = focus(world, id) else {
        return;
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.chase_mob(target, Vec2::ZERO, false, 0.0);
        mob.set_animation_named(ANIM_ATTACKING, AnimStart::Normal);
    }
}

pub(super) fn start_knocked_down_dying(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    start_dying(world, id, payload);
    animate(world, id, ANIM_KNOCKED_DOWN_DYING, AnimStart::Normal);
}

pub(super) fn start_mob_landing(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    animate(world, id, ANIM_MOB_LANDING, AnimStart::Normal);
}

pub(super) fn start_panicking(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    enable_midair_if_flier(world, id);
    world.leave_group(id);
    panic_new_chase(world, id, payload);
    animate(world, id, ANIM_WALKING, AnimStart::RandomTime);
}

pub(super) fn start_picking_up(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.set_animation_named(ANIM_PICKING_UP, AnimStart::Normal);
    }
}

pub(super) fn start_returning(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let return_point = payload
        .mob()
        .and_then(|carried| world.mob(carried))
        .and_then(|carried| carried.carry.as_ref())
        .map(|carry| carry.return_point);
    let Some(point) = return_point else {
        go_to(world, id, IDLING, &EventPayload::None);
        return;
    };
    enable_midair_if_flier(world, id);
    if let Some(mob) = world.mob_mut(id) {
        let z = mob.z;
        mob.chase_point(point, z, false);
        mob.set_animation_named(ANIM_WALKING, AnimStart::RandomTime);
    }
}

pub(super) fn start_riding_track(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(track) = payload.mob() else {
        return;
    };
    let Some(pose) = world
        .mob(track)
        .and_then(|mob| mob.mob_type.track_info())
        .map(|info| info.riding_pose)
    else {
        return;
    };
    disable_midair(world, id);
    let leader = world.mob(id).and_then(|mob| mob.following_group);
    if let Some(state) = pikmin_mut(world, id) {
        state.leader_to_return_to = leader;
    }
    world.leave_group(id);
    world.focus_on_mob(id, track);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.track_ride = Some(TrackRide {
            track,
            checkpoint: 0,
            progress: 0.0,
        });
        match pose {
            TrackRidingPose::Stopped => mob.set_animation_named(ANIM_WALKING, AnimStart::Normal),
            TrackRidingPose::Climbing => {
                mob.set_animation_named(ANIM_CLIMBING, AnimStart::RandomTime)
            }
            TrackRidingPose::Sliding => mob.set_animation_named(ANIM_SLIDING, AnimStart::RandomTime),
        }
    }
    debug!(mob = id.0, track = track.0, "pikmin_started_riding_track");
}

pub(super) fn start_seed_particles(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    add_particles(world, id, PARTICLES_SEED);
}

pub(super) fn stop_being_idle(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(state) = pikmin_mut(world, id) {
        state.bump_lock = 0.0;
        state.in_shaking_animation = false;
    }
}

pub(super) fn stop_being_thrown(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    remove_particles(world, id, PARTICLES_THROW);
}

pub(super) fn stop_carrying(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(carried) = pikmin(world, id).and_then(|state| state.carrying_mob) else {
        return;
    };
    world.run_event(carried, MobEvent::CarrierRemoved, &EventPayload::Mob(id));
    if let Some(state) = pikmin_mut(world, id) {
        state.carrying_mob = None;
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(0.0);
    }
}

pub(super) fn stop_in_group(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let leader_pos = world
        .mob(id)
        .and_then(|mob| mob.following_group)
        .and_then(|leader| world.mob(leader))
        .map(|leader| leader.pos);
    enable_midair_if_flier(world, id);
    let delay = bored_delay(world);
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        if let Some(leader_pos) = leader_pos {
            let angle = mob.pos.angle_to(leader_pos);
            mob.face(angle);
        }
        mob.set_animation_named(ANIM_IDLING, AnimStart::RandomTime);
        mob.set_timer(delay);
    }
}

pub(super) fn tick_carrying(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(state) = pikmin(world, id) else {
        return;
    };
    let struggling = state.in_carry_struggle_animation;
    let Some(moving) = state
        .carrying_mob
        .and_then(|carried| world.mob(carried))
        .and_then(|carried| carried.carry.as_ref())
        .map(|carry| carry.is_moving)
    else {
        return;
    };
    if struggling == !moving {
        return;
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.in_carry_struggle_animation = !moving;
    }
    let anim = if moving {
        ANIM_CARRYING
    } else {
        ANIM_CARRYING_STRUGGLE
    };
    animate(world, id, anim, AnimStart::RandomTime);
}

pub(super) fn tick_entering_onion(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if !world.tick_track_ride(id) {
        return;
    }
    let onion = focus(world, id);
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.to_delete = true;
    }
    debug!(mob = id.0, onion = onion.map(|o| o.0), "pikmin_stored_in_onion");
}

pub(super) fn tick_group_task_work(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(task) = focus(world, id) else {
        return;
    };
    let Some((spot_pos, task_z, task_angle)) = world.mob(task).and_then(|task_mob| {
        let spot = task_mob
            .group_task()?
            .spots
            .iter()
            .find(|spot| spot.pikmin == Some(id))?;
        Some((
            task_mob.pos + spot.offset.rotated(task_mob.angle),
            task_mob.z,
            task_mob.angle,
        ))
    }) else {
        return;
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.chase_point(spot_pos, task_z, true);
        mob.face(task_angle);
        mob.stop_turning();
    }
}

pub(super) fn tick_track_ride(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if !world.tick_track_ride(id) {
        return;
    }
    let leader = pikmin(world, id).and_then(|state| state.leader_to_return_to);
    go_to(world, id, IDLING, &EventPayload::None);
    if let Some(leader) = leader.filter(|leader| world.is_alive(*leader)) {
        let target = called_state(world, id);
        go_to(world, id, target, &EventPayload::Mob(leader));
    }
}

pub(super) fn touched_eat_hitbox(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(mob) = world.mob(id) else {
        return;
    };
    if mob.invuln_period > 0.0 || mob.health <= 0.0 {
        return;
    }
    let catalog = world.catalog();
    let inedible = mob.statuses.iter().any(|active| {
        catalog
            .status_type(&active.name)
            .is_some_and(|status| status.turns_inedible)
    });
    if inedible {
        return;
    }
    go_to(world, id, GRABBED_BY_ENEMY, payload);
}

pub(super) fn touched_hazard(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let EventPayload::Hazard(name) = payload else {
        return;
    };
    if type_info(world, id).hazard_immunities.contains(name) {
        return;
    }
    let Some(effects) = world.catalog().hazard(name).map(|hazard| hazard.effects.clone()) else {
        return;
    };
    let generating = world
        .mob(id)
        .is_some_and(|mob| mob.particle_generators.iter().any(|p| p.generator == *name));
    if !generating {
        add_particles(world, id, name);
    }
    if world.mob(id).map_or(true, |mob| mob.invuln_period > 0.0) {
        return;
    }
    for effect in effects {
        world.receive_status(id, &effect);
    }
}

pub(super) fn touched_spray(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let EventPayload::Spray(name) = payload else {
        return;
    };
    let Some(spray) = world.catalog().spray(name).cloned() else {
        return;
    };
    for effect in &spray.effects {
        world.receive_status(id, effect);
    }
    if spray.buries_pikmin {
        go_to(world, id, SPROUT, &EventPayload::None);
    }
}

/// Something tried to eat a Pikmin holding a tool: the tool takes the bite
/// unless it cannot be swapped out.
pub(super) fn try_held_item_hotswap(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(tool) = held_tool(world, id) else {
        return;
    };
    let hotswappable = world
        .mob(tool)
        .and_then(|mob| mob.mob_type.tool_info())
        .is_some_and(|info| info.can_be_hotswapped);
    let enemy_holdable = world
        .mob(tool)
        .and_then(Mob::tool)
        .is_some_and(|state| state.holdable_by_enemies);
    if !hotswappable && enemy_holdable {
        release_tool(world, id, &EventPayload::None);
        go_to(world, id, GRABBED_BY_ENEMY, payload);
        return;
    }
    release_tool(world, id, &EventPayload::None);
    if let Some(mob) = world.mob_mut(id) {
        mob.invuln_period = INVULN_PERIOD;
    }
    world.leave_group(id);
    be_released(world, id, payload);
    notify_leader_release(world, id, payload);
    go_to(world, id, KNOCKED_BACK, &EventPayload::None);
}

pub(super) fn unlatch(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(target) = focus(world, id) else {
        return;
    };
    world.release(target, id);
    if let Some(state) = pikmin_mut(world, id) {
        state.latched = false;
    }
}

/// Chases the given point, or this Pikmin's spot behind the leader.
pub(super) fn update_in_group_chasing(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let flier = can_fly(world, id);
    let Some(leader) = world.mob(id).and_then(|mob| mob.following_group) else {
        return;
    };
    let Some((spot, leader_z)) = group_spot(world, id, leader) else {
        return;
    };
    let target = payload.point().unwrap_or(spot);
    let target_z = if flier {
        leader_z + FLIER_ABOVE_FLOOR_HEIGHT
    } else {
        leader_z
    };
    if let Some(mob) = world.mob_mut(id) {
        if flier {
            mob.flags.can_move_midair = true;
        }
        mob.chase_point(target, target_z, false);
    }
}

pub(super) fn whistled_while_holding(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let drops_on_whistle = held_tool(world, id)
        .and_then(|tool| world.mob(tool))
        .and_then(|tool| tool.mob_type.tool_info())
        .is_some_and(|info| info.dropped_when_pikmin_is_whistled);
    let primed = pikmin(world, id).is_some_and(|state| state.is_tool_primed_for_whistle);
    if drops_on_whistle && primed {
        release_tool(world, id, &EventPayload::None);
    }
    if let Some(state) = pikmin_mut(world, id) {
        state.is_tool_primed_for_whistle = false;
    }
    let target = called_state(world, id);
    go_to(world, id, target, payload);
}

pub(super) fn whistled_while_riding(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let cancellable = world
        .mob(id)
        .and_then(|mob| mob.track_ride)
        .and_then(|ride| world.mob(ride.track))
        .and_then(|track| track.mob_type.track_info())
        .is_some_and(|info| info.cancellable_with_whistle);
    if !cancellable {
        return;
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.track_ride = None;
    }
    let target = called_state(world, id);
    go_to(world, id, target, payload);
}

pub(super) fn work_on_group_task(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(task) = focus(world, id) else {
        return;
    };
    let Some((task_angle, pose)) = world.mob(task).and_then(|task_mob| {
        let info = task_mob.mob_type.group_task_info()?;
        Some((task_mob.angle, info.worker_pikmin_pose))
    }) else {
        return;
    };
    if let Some(task_state) = world.mob_mut(task).and_then(Mob::group_task_mut) {
        for spot in task_state
            .spots
            .iter_mut()
            .filter(|spot| spot.pikmin == Some(id))
        {
            spot.state = SpotState::Used;
        }
    }
    enable_midair_if_flier(world, id);
    let anim = match pose {
        GroupTaskPose::Standing => ANIM_IDLING,
        GroupTaskPose::ArmsStretched => ANIM_ARMS_OUT,
        GroupTaskPose::Pushing => ANIM_PUSHING,
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.stop_chasing();
        mob.face(task_angle);
        mob.set_animation_named(anim, AnimStart::RandomTime);
    }
    world.run_event(task, MobEvent::WeightAdded, &EventPayload::Mob(id));
}

/// Moves a Pikmin into the state its new status effect calls for.
pub(super) fn handle_status_gain(world: &mut MobWorld, id: MobId, status: &StatusType) {
    let target = match status.state_change {
        StatusStateChange::None => return,
        StatusStateChange::Flailing => FLAILING,
        StatusStateChange::Helpless => HELPLESS,
        StatusStateChange::Panic => PANICKING,
    };
    let Some(mob) = world.mob(id) else {
        return;
    };
    let sprout = mob.pikmin().is_some_and(|state| state.is_seed_or_sprout);
    if mob.flags.dying || sprout || mob.fsm.cur_state == Some(target) {
        return;
    }
    debug!(mob = id.0, status = %status.name, "pikmin_status_state_change");
    go_to(world, id, target, &EventPayload::None);
}
