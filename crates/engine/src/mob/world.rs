use std::collections::BTreeMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::{debug, info, warn};

use crate::fsm;
use crate::script::{EventPayload, HitboxInteraction, MobEvent};

use super::catalog::ContentCatalog;
use super::geometry::Vec2;
use super::mob::{ActiveStatus, ChaseTarget, Mob, MobId, MobIdAllocator, MobParent};
use super::types::{HitboxKind, MobCategoryId, MobType, MobTypeDatabase};

pub const GRAVITY_ADDER: f32 = -2600.0;
const SPAWN_MOMENTUM_Z_MULT: f32 = 7.0;
const MINUTES_PER_DAY: f32 = 24.0 * 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaInfo {
    pub day_minutes: f32,
    pub day_minutes_per_irl_sec: f32,
}

impl Default for AreaInfo {
    fn default() -> Self {
        Self {
            day_minutes: 7.0 * 60.0,
            day_minutes_per_irl_sec: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRecord {
    pub mob: MobId,
    pub text: String,
}

/// Owns every live mob. Mobs refer to each other only through [`MobId`]s,
/// and a stale id simply fails to resolve.
#[derive(Debug)]
pub struct MobWorld {
    allocator: MobIdAllocator,
    mobs: BTreeMap<MobId, Mob>,
    types: MobTypeDatabase,
    catalog: Arc<ContentCatalog>,
    pub area: AreaInfo,
    rng: XorShiftRng,
    print_log: Vec<PrintRecord>,
    delta_t: f32,
}

impl MobWorld {
    pub fn new(types: MobTypeDatabase, catalog: Arc<ContentCatalog>, seed: u64) -> Self {
        Self {
            allocator: MobIdAllocator::default(),
            mobs: BTreeMap::new(),
            types,
            catalog,
            area: AreaInfo::default(),
            rng: XorShiftRng::seed_from_u64(seed),
            print_log: Vec::new(),
            delta_t: 0.0,
        }
    }

    pub fn types(&self) -> &MobTypeDatabase {
        &self.types
    }

    pub fn catalog(&self) -> &Arc<ContentCatalog> {
        &self.catalog
    }

    pub fn delta_t(&self) -> f32 {
        self.delta_t
    }

    pub fn mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.get(&id)
    }

    pub fn mob_mut(&mut self, id: MobId) -> Option<&mut Mob> {
        self.mobs.get_mut(&id)
    }

    pub fn contains(&self, id: MobId) -> bool {
        self.mobs.contains_key(&id)
    }

    pub fn mob_count(&self) -> usize {
        self.mobs.len()
    }

    pub fn mob_ids(&self) -> Vec<MobId> {
        self.mobs.keys().copied().collect()
    }

    pub fn mobs(&self) -> impl Iterator<Item = &Mob> {
        self.mobs.values()
    }

    pub fn mob_ids_in_category(&self, category: MobCategoryId) -> Vec<MobId> {
        self.mobs
            .values()
            .filter(|mob| mob.category_id() == category)
            .map(|mob| mob.id)
            .collect()
    }

    pub fn is_alive(&self, id: MobId) -> bool {
        self.mob(id).is_some_and(Mob::is_alive)
    }

    pub fn mobs_within(&self, center: Vec2, radius: f32) -> Vec<MobId> {
        self.mobs
            .values()
            .filter(|mob| !mob.flags.to_delete && mob.pos.distance(center) <= radius)
            .map(|mob| mob.id)
            .collect()
    }

    /// Creates a mob and puts it in its type's first state.
    pub fn create_mob(
        &mut self,
        pos: Vec2,
        mob_type: Arc<MobType>,
        angle: f32,
        vars: &[(String, String)],
    ) -> MobId {
        let id = self.allocator.allocate();
        let mut mob = Mob::new(id, Arc::clone(&mob_type), pos, angle);
        for (name, value) in vars {
            mob.set_var(name.clone(), value.clone());
        }
        self.mobs.insert(id, mob);
        debug!(mob = id.0, mob_type = %mob_type.name, "mob_created");

        if let Some(first_state) = mob_type.fsm.first_state {
            fsm::set_state(self, id, first_state, &EventPayload::None);
        }
        id
    }

    /// Removes a mob right away and scrubs every reference other mobs hold to it.
    pub fn delete_mob(&mut self, id: MobId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.leave_group(id);

        let watchers: Vec<MobId> = self
            .mobs
            .values()
            .filter(|other| other.focused_mob == Some(id))
            .map(|other| other.id)
            .collect();
        for watcher in watchers {
            self.run_event(watcher, MobEvent::FocusedMobUnavailable, &EventPayload::None);
            self.run_event(watcher, MobEvent::FocusOffReach, &EventPayload::None);
            self.run_event(watcher, MobEvent::FocusDied, &EventPayload::None);
            if let Some(watcher) = self.mob_mut(watcher) {
                watcher.focused_mob = None;
            }
        }

        for other in self.mobs.values_mut() {
            if other.parent.is_some_and(|parent| parent.mob == id) {
                other.parent = None;
                other.flags.to_delete = true;
            }
            other.focused_mob_memory.retain(|_, remembered| *remembered != id);
            other.chomping.retain(|victim| *victim != id);
            other.links.retain(|link| *link != id);
            other.holding.retain(|held| *held != id);
            other.group.retain(|member| *member != id);
            if other.holder == Some(id) {
                other.holder = None;
            }
            if other.following_group == Some(id) {
                other.following_group = None;
            }
            if let Some(carry) = other.carry.as_mut() {
                for spot in carry.spots.iter_mut().filter(|spot| spot.pikmin == Some(id)) {
                    spot.pikmin = None;
                    spot.state = Default::default();
                }
            }
        }

        self.mobs.remove(&id);
        debug!(mob = id.0, "mob_deleted");
        true
    }

    /// Deletes every mob that was marked for deletion during the frame.
    pub fn apply_pending(&mut self) {
        loop {
            let doomed: Vec<MobId> = self
                .mobs
                .values()
                .filter(|mob| mob.flags.to_delete)
                .map(|mob| mob.id)
                .collect();
            if doomed.is_empty() {
                break;
            }
            for id in doomed {
                self.delete_mob(id);
            }
        }
    }

    pub fn run_event(&mut self, id: MobId, event: MobEvent, payload: &EventPayload) {
        fsm::run_event(self, id, event, payload);
    }

    /// Uniform float in `[min, max]`; reversed bounds are swapped. A
    /// non-finite bound gives the other bound, or 0 when neither is finite.
    pub fn rng_f(&mut self, min: f32, max: f32) -> f32 {
        match (min.is_finite(), max.is_finite()) {
            (true, true) => {}
            (true, false) => return min,
            (false, true) => return max,
            (false, false) => return 0.0,
        }
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        let (lo64, hi64) = (f64::from(lo), f64::from(hi));
        let value = lo64 + (hi64 - lo64) * self.rng.gen::<f64>();
        (value as f32).clamp(lo, hi)
    }

    /// Uniform integer in `[min, max]`, both inclusive.
    pub fn rng_i(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    pub fn print(&mut self, id: MobId, text: String) {
        let type_name = self
            .mob(id)
            .map(|mob| mob.mob_type.name.clone())
            .unwrap_or_default();
        info!("[DEBUG PRINT] {type_name} says:\n{text}");
        self.print_log.push(PrintRecord { mob: id, text });
    }

    pub fn print_log(&self) -> &[PrintRecord] {
        &self.print_log
    }

    pub fn focus_on_mob(&mut self, id: MobId, target: MobId) {
        if !self.contains(target) {
            return;
        }
        if let Some(mob) = self.mob_mut(id) {
            mob.focused_mob = Some(target);
        }
    }

    pub fn hold(&mut self, holder: MobId, held: MobId) {
        if holder == held || !self.contains(held) {
            return;
        }
        let Some(holder_mob) = self.mob_mut(holder) else {
            return;
        };
        if !holder_mob.holding.contains(&held) {
            holder_mob.holding.push(held);
        }
        if let Some(held_mob) = self.mob_mut(held) {
            held_mob.holder = Some(holder);
            held_mob.stop_chasing();
        }
        self.run_event(held, MobEvent::Held, &EventPayload::Mob(holder));
    }

    pub fn release(&mut self, holder: MobId, held: MobId) {
        let Some(holder_mob) = self.mob_mut(holder) else {
            return;
        };
        let before = holder_mob.holding.len();
        holder_mob.holding.retain(|mob| *mob != held);
        if holder_mob.holding.len() == before {
            return;
        }
        if let Some(held_mob) = self.mob_mut(held) {
            held_mob.holder = None;
        }
        self.run_event(held, MobEvent::Released, &EventPayload::Mob(holder));
    }

    pub fn add_to_group(&mut self, leader: MobId, member: MobId) {
        if leader == member || !self.contains(leader) {
            return;
        }
        let Some(current) = self.mob(member).map(|mob| mob.following_group) else {
            return;
        };
        if current == Some(leader) {
            return;
        }
        if current.is_some() {
            self.leave_group(member);
        }
        if let Some(member_mob) = self.mob_mut(member) {
            member_mob.following_group = Some(leader);
        }
        if let Some(leader_mob) = self.mob_mut(leader) {
            leader_mob.group.push(member);
        }
    }

    pub fn leave_group(&mut self, member: MobId) {
        let Some(leader) = self.mob_mut(member).and_then(|mob| mob.following_group.take()) else {
            return;
        };
        if let Some(leader_mob) = self.mob_mut(leader) {
            leader_mob.group.retain(|mob| *mob != member);
        }
    }

    pub fn chomp(&mut self, chomper: MobId, victim: MobId) {
        let Some(mob) = self.mob_mut(chomper) else {
            return;
        };
        if mob.chomping.len() >= mob.chomp_max || mob.chomping.contains(&victim) {
            return;
        }
        mob.chomping.push(victim);
        self.hold(chomper, victim);
    }

    /// Swallows up to `amount` chomped mobs, killing them.
    pub fn swallow_chomped(&mut self, chomper: MobId, amount: usize) {
        let victims: Vec<MobId> = match self.mob(chomper) {
            Some(mob) => mob.chomping.iter().take(amount).copied().collect(),
            None => return,
        };
        for victim in victims {
            self.run_event(victim, MobEvent::Swallowed, &EventPayload::None);
            if let Some(victim_mob) = self.mob_mut(victim) {
                victim_mob.set_health(false, false, 0.0);
            }
            self.release(chomper, victim);
            if let Some(mob) = self.mob_mut(chomper) {
                mob.chomping.retain(|mob| *mob != victim);
            }
        }
    }

    pub fn release_chomped(&mut self, chomper: MobId) {
        let victims = match self.mob_mut(chomper) {
            Some(mob) => std::mem::take(&mut mob.chomping),
            None => return,
        };
        for victim in victims {
            self.release(chomper, victim);
        }
    }

    /// Generic part of dying: drops everything the mob was doing.
    pub fn start_dying(&mut self, id: MobId) {
        let members = {
            let Some(mob) = self.mob_mut(id) else {
                return;
            };
            mob.set_health(false, false, 0.0);
            mob.stop_chasing();
            mob.stop_turning();
            mob.stop_circling();
            mob.gravity_mult = 1.0;
            mob.statuses.clear();
            mob.flags.dying = true;
            mob.group.clone()
        };
        self.release_chomped(id);
        let pos = self.mob(id).map(|mob| mob.pos).unwrap_or_default();
        for member in members {
            self.run_event(member, MobEvent::Dismissed, &EventPayload::Point(pos));
            self.leave_group(member);
        }
        debug!(mob = id.0, "mob_started_dying");
    }

    pub fn finish_dying(&mut self, id: MobId) {
        self.release_chomped(id);
        let held = self
            .mob(id)
            .map(|mob| mob.holding.clone())
            .unwrap_or_default();
        for held in held {
            self.release(id, held);
        }
        debug!(mob = id.0, "mob_finished_dying");
    }

    pub fn receive_status(&mut self, id: MobId, name: &str) {
        let catalog = Arc::clone(&self.catalog);
        let Some(status) = catalog.status_type(name) else {
            warn!(mob = id.0, status = name, "unknown_status_effect");
            return;
        };
        let Some(mob) = self.mob_mut(id) else {
            return;
        };
        match mob.statuses.iter_mut().find(|active| active.name == name) {
            Some(active) => active.time_left = status.duration,
            None => mob.statuses.push(ActiveStatus {
                name: status.name.clone(),
                time_left: status.duration,
            }),
        }
        if let Some(hook) = mob.mob_type.status_gain_hook {
            hook(self, id, status);
        }
    }

    pub fn remove_status(&mut self, id: MobId, name: &str) {
        if let Some(mob) = self.mob_mut(id) {
            mob.statuses.retain(|status| status.name != name);
        }
    }

    pub fn send_message(&mut self, sender: MobId, receiver: MobId, text: &str) {
        let payload = EventPayload::Message {
            text: text.to_string(),
            sender,
        };
        self.run_event(receiver, MobEvent::ReceiveMessage, &payload);
    }

    /// Spawns a child from the parent type's spawn table.
    pub fn spawn_child(&mut self, parent: MobId, spawn_idx: usize) -> Option<MobId> {
        let (info, parent_pos, parent_z, parent_angle) = {
            let mob = self.mob(parent)?;
            let info = mob.mob_type.spawns.get(spawn_idx)?.clone();
            (info, mob.pos, mob.z, mob.angle)
        };
        let Some(child_type) = self.types.by_name(&info.mob_type_name).cloned() else {
            warn!(
                mob = parent.0,
                mob_type = %info.mob_type_name,
                "spawn_of_unknown_mob_type"
            );
            return None;
        };

        let (pos, z, angle) = if info.relative {
            (
                parent_pos + info.offset.rotated(parent_angle),
                parent_z + info.z,
                parent_angle + info.angle,
            )
        } else {
            (info.offset, info.z, info.angle)
        };
        let child = self.create_mob(pos, child_type, angle, &info.vars);

        if info.momentum != 0.0 {
            let angle = self.rng_f(0.0, std::f32::consts::TAU);
            if let Some(mob) = self.mob_mut(child) {
                mob.speed = Vec2::from_angle(angle, info.momentum);
                mob.speed_z = info.momentum * SPAWN_MOMENTUM_Z_MULT;
            }
        }
        if let Some(mob) = self.mob_mut(child) {
            mob.z = z;
        }
        if info.link_object_to_spawn {
            if let Some(mob) = self.mob_mut(parent) {
                mob.links.push(child);
            }
        }
        if info.link_spawn_to_object {
            if let Some(mob) = self.mob_mut(child) {
                mob.links.push(parent);
            }
        }
        Some(child)
    }

    /// Launches a mob on an arc that peaks at `max_height` above its current
    /// height and comes down on `target`.
    pub fn throw_mob(&mut self, id: MobId, target: Vec2, target_z: f32, max_height: f32) {
        let Some(mob) = self.mob_mut(id) else {
            return;
        };
        let gravity = -GRAVITY_ADDER * mob.gravity_mult.max(f32::EPSILON);
        let peak = mob.z.max(target_z) + max_height.max(0.0);
        let speed_z = (2.0 * gravity * (peak - mob.z)).sqrt();
        let rise_time = speed_z / gravity;
        let fall_time = (2.0 * (peak - target_z) / gravity).sqrt();
        let flight_time = rise_time + fall_time;
        mob.speed = if flight_time > 0.0 {
            (target - mob.pos) * (1.0 / flight_time)
        } else {
            Vec2::ZERO
        };
        mob.speed_z = speed_z;
        mob.flags.was_thrown = true;
        mob.stop_chasing();
    }

    pub fn set_parent(&mut self, child: MobId, parent: MobParent) {
        if let Some(mob) = self.mob_mut(child) {
            mob.parent = Some(parent);
        }
    }

    /// Combined carrying strength of every Pikmin in a carry spot.
    pub fn carry_strength(&self, carried: MobId) -> f32 {
        let Some(carry) = self.mob(carried).and_then(|mob| mob.carry.as_ref()) else {
            return 0.0;
        };
        carry
            .carriers()
            .filter_map(|carrier| self.mob(carrier))
            .map(|carrier| {
                carrier
                    .mob_type
                    .pikmin_info()
                    .map_or(1.0, |info| info.carry_strength)
            })
            .sum()
    }

    pub fn carrier_count(&self, carried: MobId) -> usize {
        self.mob(carried)
            .and_then(|mob| mob.carry.as_ref())
            .map_or(0, |carry| carry.carriers().count())
    }

    pub fn can_hurt(&self, attacker: MobId, victim: MobId) -> bool {
        let (Some(a), Some(v)) = (self.mob(attacker), self.mob(victim)) else {
            return false;
        };
        a.team != v.team && v.is_alive() && !v.flags.non_hurtable && v.invuln_period <= 0.0
    }

    pub fn can_hunt(&self, hunter: MobId, prey: MobId) -> bool {
        let (Some(h), Some(p)) = (self.mob(hunter), self.mob(prey)) else {
            return false;
        };
        h.team != p.team && p.is_alive() && !p.flags.non_huntable && !p.flags.hidden
    }

    /// Damage an attack hitbox of `attacker` deals to `victim`, or `None` if
    /// the hit does not count.
    pub fn attack_damage(&self, attacker: MobId, victim: MobId, hit: &HitboxInteraction) -> Option<f32> {
        if !self.can_hurt(attacker, victim) {
            return None;
        }
        let a = self.mob(attacker)?;
        let v = self.mob(victim)?;
        let base = match a.mob_type.hitboxes.get(hit.h1) {
            Some(hitbox) if hitbox.kind == HitboxKind::Attack => hitbox.value,
            _ => a.mob_type.pikmin_info().map_or(1.0, |info| info.attack_power),
        };
        let multiplier = match v.mob_type.hitboxes.get(hit.h2) {
            Some(hitbox) if hitbox.kind == HitboxKind::Disabled => return None,
            Some(hitbox) if hitbox.kind == HitboxKind::Normal => hitbox.value,
            _ => 1.0,
        };
        Some(base * multiplier)
    }

    pub fn closest_leader(&self, id: MobId) -> Option<MobId> {
        let pos = self.mob(id)?.pos;
        self.mobs
            .values()
            .filter(|mob| mob.category_id() == MobCategoryId::Leaders && mob.is_alive())
            .min_by(|a, b| a.pos.distance(pos).total_cmp(&b.pos.distance(pos)))
            .map(|mob| mob.id)
    }

    /// Advances a track ride. Returns true once the last checkpoint is reached.
    pub fn tick_track_ride(&mut self, id: MobId) -> bool {
        let delta_t = self.delta_t;
        let Some(ride) = self.mob(id).and_then(|mob| mob.track_ride) else {
            return false;
        };
        let Some((checkpoints, ride_speed, track_pos, track_angle)) = self.mob(ride.track).and_then(|track| {
            let info = track.mob_type.track_info()?;
            Some((info.checkpoints.clone(), info.ride_speed, track.pos, track.angle))
        }) else {
            if let Some(mob) = self.mob_mut(id) {
                mob.track_ride = None;
            }
            return true;
        };

        let world_point = |idx: usize| track_pos + checkpoints[idx].rotated(track_angle);
        let last = checkpoints.len().saturating_sub(1);
        let mut ride = ride;
        ride.progress += ride_speed * delta_t;
        while ride.progress >= 1.0 && ride.checkpoint < last {
            ride.progress -= 1.0;
            ride.checkpoint += 1;
        }

        let Some(mob) = self.mob_mut(id) else {
            return false;
        };
        if ride.checkpoint >= last {
            if !checkpoints.is_empty() {
                mob.pos = world_point(last);
            }
            mob.track_ride = None;
            return true;
        }
        let from = world_point(ride.checkpoint);
        let to = world_point(ride.checkpoint + 1);
        mob.pos = from + (to - from) * ride.progress;
        mob.track_ride = Some(ride);
        false
    }

    pub fn field_pikmin(&self) -> usize {
        self.mobs
            .values()
            .filter(|mob| mob.category_id() == MobCategoryId::Pikmin && !mob.flags.to_delete)
            .count()
    }

    /// Steps every mob by one frame and then deletes the ones that asked for it.
    pub fn tick(&mut self, delta_t: f32) {
        self.delta_t = delta_t;
        self.area.day_minutes = (self.area.day_minutes
            + self.area.day_minutes_per_irl_sec * delta_t)
            .rem_euclid(MINUTES_PER_DAY);
        for id in self.mob_ids() {
            self.tick_mob(id, delta_t);
        }
        self.apply_pending();
    }

    fn tick_mob(&mut self, id: MobId, delta_t: f32) {
        let events = {
            let Some(mob) = self.mobs.get_mut(&id) else {
                return;
            };
            if mob.flags.to_delete {
                return;
            }
            let mut events = Vec::new();

            let catalog = Arc::clone(&self.catalog);
            for status in mob.statuses.iter_mut() {
                if let Some(kind) = catalog.status_type(&status.name) {
                    let change = kind.health_change_per_second * delta_t;
                    mob.health = (mob.health + change).clamp(0.0, mob.max_health);
                    if kind.duration > 0.0 {
                        status.time_left -= delta_t;
                    }
                }
            }
            mob.statuses.retain(|status| {
                catalog
                    .status_type(&status.name)
                    .map_or(true, |kind| kind.duration <= 0.0 || status.time_left > 0.0)
            });

            mob.invuln_period = (mob.invuln_period - delta_t).max(0.0);
            if let Some(pikmin) = mob.pikmin_mut() {
                pikmin.bump_lock = (pikmin.bump_lock - delta_t).max(0.0);
            }

            if mob.script_timer.time_left > 0.0 {
                mob.script_timer.time_left -= delta_t;
                if mob.script_timer.time_left <= 0.0 {
                    mob.script_timer.time_left = 0.0;
                    events.push(MobEvent::Timer);
                }
            }

            if !mob.anim.name.is_empty() {
                let duration = mob
                    .anim
                    .idx
                    .map_or(super::types::DEFAULT_ANIMATION_DURATION, |idx| {
                        mob.mob_type.animation_duration(idx)
                    });
                mob.anim.elapsed += delta_t;
                if duration > 0.0 && mob.anim.elapsed >= duration {
                    mob.anim.elapsed -= duration;
                    events.push(MobEvent::AnimationEnd);
                }
            }
            events
        };

        for event in events {
            self.run_event(id, event, &EventPayload::None);
        }
        self.tick_chase(id, delta_t);
        self.tick_circling(id, delta_t);
        self.tick_vertical(id, delta_t);

        let focus_died = self
            .mob(id)
            .and_then(|mob| mob.focused_mob)
            .is_some_and(|focus| !self.is_alive(focus));
        if focus_died {
            self.run_event(id, MobEvent::FocusDied, &EventPayload::None);
        }

        let zero_health = self
            .mob(id)
            .is_some_and(|mob| mob.max_health > 0.0 && mob.health <= 0.0 && !mob.flags.to_delete);
        if zero_health {
            self.run_event(id, MobEvent::ZeroHealth, &EventPayload::None);
        }
        if self.contains(id) {
            self.run_event(id, MobEvent::OnTick, &EventPayload::None);
        }
    }

    fn chase_target_pos(&self, target: ChaseTarget) -> Option<(Vec2, f32)> {
        match target {
            ChaseTarget::Point { pos, z } => Some((pos, z)),
            ChaseTarget::Mob {
                mob,
                offset,
                z_offset,
            } => self
                .mob(mob)
                .map(|target| (target.pos + offset, target.z + z_offset)),
        }
    }

    fn tick_chase(&mut self, id: MobId, delta_t: f32) {
        let Some(chase) = self.mob(id).and_then(|mob| mob.chase) else {
            if let Some(mob) = self.mob_mut(id) {
                mob.pos = mob.pos + mob.speed * delta_t;
            }
            return;
        };
        let Some((target, target_z)) = self.chase_target_pos(chase.target) else {
            if let Some(mob) = self.mob_mut(id) {
                mob.stop_chasing();
            }
            return;
        };

        let mut arrived = false;
        if let Some(mob) = self.mob_mut(id) {
            if chase.teleport {
                mob.pos = target;
                mob.z = target_z;
                mob.speed = Vec2::ZERO;
                arrived = true;
            } else {
                let to_target = target - mob.pos;
                let distance = to_target.length();
                if distance <= chase.target_distance {
                    mob.speed = Vec2::ZERO;
                    arrived = true;
                } else {
                    let step = (mob.mob_type.move_speed * delta_t).min(distance);
                    let heading = mob.pos.angle_to(target);
                    mob.face(heading);
                    mob.speed = Vec2::from_angle(heading, mob.mob_type.move_speed);
                    mob.pos = mob.pos + to_target * (step / distance);
                    arrived = distance - step <= chase.target_distance;
                }
            }
            if let Some(info) = mob.chase.as_mut() {
                if arrived && info.reached {
                    arrived = false;
                } else if arrived {
                    info.reached = true;
                } else {
                    info.reached = false;
                }
            }
        }
        if arrived {
            self.run_event(id, MobEvent::ReachedDestination, &EventPayload::None);
        }
    }

    fn tick_circling(&mut self, id: MobId, delta_t: f32) {
        let Some(circle) = self.mob(id).and_then(|mob| mob.circling) else {
            return;
        };
        let Some(center) = self.mob(circle.center).map(|mob| mob.pos) else {
            if let Some(mob) = self.mob_mut(id) {
                mob.stop_circling();
            }
            return;
        };
        let Some(mob) = self.mob_mut(id) else {
            return;
        };
        let radius = circle.radius.max(1.0);
        let angular_speed = mob.mob_type.move_speed / radius;
        let direction = if circle.clockwise { 1.0 } else { -1.0 };
        let angle = circle.angle + angular_speed * direction * delta_t;
        mob.pos = center + Vec2::from_angle(angle, radius);
        mob.face(mob.pos.angle_to(center));
        if let Some(info) = mob.circling.as_mut() {
            info.angle = angle;
        }
    }

    fn tick_vertical(&mut self, id: MobId, delta_t: f32) {
        let landed = {
            let Some(mob) = self.mob_mut(id) else {
                return;
            };
            if mob.flags.flying
                || mob.flags.can_move_midair
                || mob.holder.is_some() || (mob.z <= 0.0 && mob.speed_z == 0.0) {
                return;
            }
            mob.speed_z += GRAVITY_ADDER * mob.gravity_mult * delta_t;
            mob.z += mob.speed_z * delta_t;
            if mob.z <= 0.0 {
                mob.z = 0.0;
                mob.speed_z = 0.0;
                mob.speed = Vec2::ZERO;
                mob.flags.was_thrown = false;
                true
            } else {
                false
            }
        };
        if landed {
            self.run_event(id, MobEvent::Landed, &EventPayload::None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob::{SpawnInfo, StatusType};

    fn world_with(types: Vec<MobType>) -> MobWorld {
        let types = MobTypeDatabase::from_types(types.into_iter().map(Arc::new).collect());
        let mut catalog = ContentCatalog::default();
        let mut poison = StatusType::new("poison");
        poison.health_change_per_second = -10.0;
        poison.duration = 1.0;
        catalog.add_status_type(poison);
        MobWorld::new(types, Arc::new(catalog), 7)
    }

    fn spawn(world: &mut MobWorld, name: &str, pos: Vec2) -> MobId {
        let mob_type = Arc::clone(world.types().by_name(name).expect("type"));
        world.create_mob(pos, mob_type, 0.0, &[])
    }

    #[test]
    fn random_ranges_are_inclusive_and_order_independent() {
        let mut world = world_with(Vec::new());
        for _ in 0..100 {
            let value = world.rng_i(5, 3);
            assert!((3..=5).contains(&value));
            let value = world.rng_f(2.0, 1.0);
            assert!((1.0..=2.0).contains(&value));
        }
        assert_eq!(world.rng_i(4, 4), 4);
        assert_eq!(world.rng_f(0.5, 0.5), 0.5);
    }

    #[test]
    fn wide_and_infinite_float_ranges_stay_in_bounds() {
        let mut world = world_with(Vec::new());
        for _ in 0..100 {
            let value = world.rng_f(-3.0e38, 3.0e38);
            assert!(value.is_finite());
            assert!((-3.0e38..=3.0e38).contains(&value));
            let value = world.rng_f(f32::MAX, f32::MIN);
            assert!(value.is_finite());
        }
        assert_eq!(world.rng_f(0.0, crate::script::coerce::s2f("1e39")), 0.0);
        assert_eq!(world.rng_f(f32::NEG_INFINITY, 7.0), 7.0);
        assert_eq!(world.rng_f(f32::NAN, f32::INFINITY), 0.0);
        let full = world.rng_i(i32::MAX, i32::MIN);
        assert!((i32::MIN..=i32::MAX).contains(&full));
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut a = world_with(Vec::new());
        let mut b = world_with(Vec::new());
        let left: Vec<i32> = (0..8).map(|_| a.rng_i(0, 1000)).collect();
        let right: Vec<i32> = (0..8).map(|_| b.rng_i(0, 1000)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn deleting_a_mob_clears_references_to_it() {
        let mut world = world_with(vec![MobType::new("Thing", MobCategoryId::Custom)]);
        let a = spawn(&mut world, "Thing", Vec2::ZERO);
        let b = spawn(&mut world, "Thing", Vec2::new(5.0, 0.0));
        world.focus_on_mob(a, b);
        world.hold(a, b);
        world.mob_mut(a).expect("a").links.push(b);
        assert!(world.delete_mob(b));
        let a = world.mob(a).expect("a");
        assert_eq!(a.focused_mob, None);
        assert!(a.holding.is_empty());
        assert!(a.links.is_empty());
    }

    #[test]
    fn groups_track_both_sides() {
        let mut world = world_with(vec![
            MobType::new("Olimar", MobCategoryId::Leaders),
            MobType::new("Red Pikmin", MobCategoryId::Pikmin),
        ]);
        let leader = spawn(&mut world, "Olimar", Vec2::ZERO);
        let pikmin = spawn(&mut world, "Red Pikmin", Vec2::new(10.0, 0.0));
        world.add_to_group(leader, pikmin);
        assert_eq!(world.mob(leader).expect("leader").group, vec![pikmin]);
        world.leave_group(pikmin);
        assert!(world.mob(leader).expect("leader").group.is_empty());
        assert_eq!(world.mob(pikmin).expect("pikmin").following_group, None);
        assert_eq!(world.closest_leader(pikmin), Some(leader));
    }

    #[test]
    fn statuses_drain_health_and_expire() {
        let mut world = world_with(vec![MobType::new("Thing", MobCategoryId::Custom)]);
        let id = spawn(&mut world, "Thing", Vec2::ZERO);
        world.receive_status(id, "poison");
        world.tick(0.5);
        let mob = world.mob(id).expect("mob");
        assert_eq!(mob.health, 95.0);
        assert!(mob.has_status("poison"));
        world.tick(0.6);
        assert!(!world.mob(id).expect("mob").has_status("poison"));
    }

    #[test]
    fn spawned_children_use_relative_coordinates_and_links() {
        let mut parent_type = MobType::new("Nest", MobCategoryId::Custom);
        parent_type.spawns.push(SpawnInfo {
            name: "egg".to_string(),
            mob_type_name: "Egg".to_string(),
            relative: true,
            offset: Vec2::new(10.0, 0.0),
            z: 0.0,
            angle: 0.0,
            vars: vec![("color".to_string(), "blue".to_string())],
            link_object_to_spawn: true,
            link_spawn_to_object: false,
            momentum: 0.0,
        });
        let mut world = world_with(vec![parent_type, MobType::new("Egg", MobCategoryId::Custom)]);
        let nest = spawn(&mut world, "Nest", Vec2::new(100.0, 100.0));
        let egg = world.spawn_child(nest, 0).expect("egg");
        let egg_mob = world.mob(egg).expect("egg");
        assert_eq!(egg_mob.pos, Vec2::new(110.0, 100.0));
        assert_eq!(egg_mob.var("color"), "blue");
        assert_eq!(world.mob(nest).expect("nest").links, vec![egg]);
    }

    #[test]
    fn chase_reaches_point_and_stops() {
        let mut world = world_with(vec![MobType::new("Thing", MobCategoryId::Custom)]);
        let id = spawn(&mut world, "Thing", Vec2::ZERO);
        world
            .mob_mut(id)
            .expect("mob")
            .chase_point(Vec2::new(50.0, 0.0), 0.0, false);
        for _ in 0..10 {
            world.tick(0.1);
        }
        let mob = world.mob(id).expect("mob");
        assert!(mob.pos.distance(Vec2::new(50.0, 0.0)) <= 3.0);
        assert!(mob.chase.expect("chase").reached);
    }

    #[test]
    fn marked_mobs_are_removed_after_the_frame() {
        let mut world = world_with(vec![MobType::new("Thing", MobCategoryId::Custom)]);
        let id = spawn(&mut world, "Thing", Vec2::ZERO);
        world.mob_mut(id).expect("mob").flags.to_delete = true;
        assert!(world.contains(id));
        world.tick(0.016);
        assert!(!world.contains(id));
    }
}
