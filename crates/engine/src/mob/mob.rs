use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::fsm::FsmInstance;

use super::category_state::{
    CategoryState, DropState, GroupTaskState, LeaderState, PikminState, SpotState, ToolState,
};
use super::geometry::Vec2;
use super::types::{HitboxKind, MobCategoryId, MobType, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MobId(pub u64);

#[derive(Debug, Default)]
pub struct MobIdAllocator {
    next: u64,
}

impl MobIdAllocator {
    pub fn allocate(&mut self) -> MobId {
        let id = MobId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChaseTarget {
    Point { pos: Vec2, z: f32 },
    Mob { mob: MobId, offset: Vec2, z_offset: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseInfo {
    pub target: ChaseTarget,
    pub teleport: bool,
    pub target_distance: f32,
    pub reached: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleInfo {
    pub center: MobId,
    pub radius: f32,
    pub clockwise: bool,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimStart {
    #[default]
    Normal,
    NoRestart,
    RandomTime,
    RandomTimeOnSpawn,
}

impl AnimStart {
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => AnimStart::NoRestart,
            2 => AnimStart::RandomTime,
            3 => AnimStart::RandomTimeOnSpawn,
            _ => AnimStart::Normal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    pub idx: Option<usize>,
    pub name: String,
    pub elapsed: f32,
    pub speed_baseline: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScriptTimer {
    pub time_left: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobParent {
    pub mob: MobId,
    pub handle_events: bool,
    pub relay_events: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStatus {
    pub name: String,
    pub time_left: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptParticles {
    pub generator: String,
    pub offset: Vec2,
    pub z: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarrySpot {
    pub offset: Vec2,
    pub state: SpotState,
    pub pikmin: Option<MobId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarryInfo {
    pub spots: Vec<CarrySpot>,
    pub is_moving: bool,
    pub is_stuck: bool,
    pub must_return: bool,
    pub return_point: Vec2,
    pub destination: Option<Vec2>,
    pub intended_mob: Option<MobId>,
}

impl CarryInfo {
    pub fn new(max_carriers: usize, radius: f32) -> Self {
        let spots = (0..max_carriers)
            .map(|idx| {
                let angle = std::f32::consts::TAU / max_carriers as f32 * idx as f32;
                CarrySpot {
                    offset: Vec2::from_angle(angle, radius),
                    ..CarrySpot::default()
                }
            })
            .collect();
        Self {
            spots,
            ..Self::default()
        }
    }

    pub fn carriers(&self) -> impl Iterator<Item = MobId> + '_ {
        self.spots
            .iter()
            .filter(|spot| spot.state == SpotState::Used)
            .filter_map(|spot| spot.pikmin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackRide {
    pub track: MobId,
    pub checkpoint: usize,
    pub progress: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MobFlags {
    pub hidden: bool,
    pub intangible: bool,
    pub non_huntable: bool,
    pub non_hurtable: bool,
    pub can_move_midair: bool,
    pub flying: bool,
    pub dying: bool,
    pub to_delete: bool,
    pub was_thrown: bool,
}

#[derive(Debug, Clone)]
pub struct Mob {
    pub id: MobId,
    pub mob_type: Arc<MobType>,
    pub pos: Vec2,
    pub z: f32,
    pub angle: f32,
    pub intended_angle: f32,
    pub speed: Vec2,
    pub speed_z: f32,
    pub gravity_mult: f32,
    pub home: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub radius: f32,
    pub height: f32,
    pub team: Team,
    pub fsm: FsmInstance,
    pub vars: BTreeMap<String, String>,
    pub script_timer: ScriptTimer,
    pub anim: AnimationState,
    pub focused_mob: Option<MobId>,
    pub focused_mob_memory: BTreeMap<usize, MobId>,
    pub links: Vec<MobId>,
    pub parent: Option<MobParent>,
    pub holder: Option<MobId>,
    pub holding: Vec<MobId>,
    pub following_group: Option<MobId>,
    pub group: Vec<MobId>,
    pub chase: Option<ChaseInfo>,
    pub circling: Option<CircleInfo>,
    pub path_target: Option<Vec2>,
    pub far_reach: usize,
    pub near_reach: usize,
    pub flags: MobFlags,
    pub statuses: Vec<ActiveStatus>,
    pub particle_generators: Vec<ScriptParticles>,
    pub chomping: Vec<MobId>,
    pub chomp_max: usize,
    pub chomp_body_parts: Vec<usize>,
    pub carry: Option<CarryInfo>,
    pub track_ride: Option<TrackRide>,
    pub invuln_period: f32,
    pub category: CategoryState,
}

impl Mob {
    pub fn new(id: MobId, mob_type: Arc<MobType>, pos: Vec2, angle: f32) -> Self {
        let carry = (mob_type.max_carriers > 0)
            .then(|| CarryInfo::new(mob_type.max_carriers, mob_type.radius));
        let category = CategoryState::for_type(&mob_type);
        Self {
            id,
            pos,
            z: 0.0,
            angle,
            intended_angle: angle,
            speed: Vec2::ZERO,
            speed_z: 0.0,
            gravity_mult: 1.0,
            home: pos,
            health: mob_type.max_health,
            max_health: mob_type.max_health,
            radius: mob_type.radius,
            height: mob_type.height,
            team: mob_type.default_team,
            fsm: FsmInstance::default(),
            vars: BTreeMap::new(),
            script_timer: ScriptTimer::default(),
            anim: AnimationState::default(),
            focused_mob: None,
            focused_mob_memory: BTreeMap::new(),
            links: Vec::new(),
            parent: None,
            holder: None,
            holding: Vec::new(),
            following_group: None,
            group: Vec::new(),
            chase: None,
            circling: None,
            path_target: None,
            far_reach: usize::MAX,
            near_reach: usize::MAX,
            flags: MobFlags::default(),
            statuses: Vec::new(),
            particle_generators: Vec::new(),
            chomping: Vec::new(),
            chomp_max: 0,
            chomp_body_parts: Vec::new(),
            carry,
            track_ride: None,
            invuln_period: 0.0,
            category,
            mob_type,
        }
    }

    pub fn category_id(&self) -> MobCategoryId {
        self.mob_type.category
    }

    pub fn state_name(&self) -> Option<&str> {
        self.fsm
            .cur_state
            .and_then(|idx| self.mob_type.fsm.states.get(idx))
            .map(|state| state.name.as_str())
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && !self.flags.dying && !self.flags.to_delete
    }

    pub fn var(&self, name: &str) -> &str {
        self.vars.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn set_health(&mut self, add: bool, ratio: bool, amount: f32) {
        let change = if ratio { amount * self.max_health } else { amount };
        let base = if add { self.health } else { 0.0 };
        self.health = (base + change).clamp(0.0, self.max_health);
    }

    pub fn set_timer(&mut self, time: f32) {
        self.script_timer = ScriptTimer {
            time_left: time,
            duration: time,
        };
    }

    pub fn set_animation(&mut self, idx: usize, start: AnimStart, speed_baseline: bool) {
        if start == AnimStart::NoRestart && self.anim.idx == Some(idx) {
            return;
        }
        let name = self
            .mob_type
            .animations
            .get(idx)
            .map(|anim| anim.name.clone())
            .unwrap_or_default();
        self.anim = AnimationState {
            idx: Some(idx),
            name,
            elapsed: 0.0,
            speed_baseline,
        };
    }

    /// Switches to the named animation; types without it only record the name.
    pub fn set_animation_named(&mut self, name: &str, start: AnimStart) {
        match self.mob_type.animation_index(name) {
            Some(idx) => self.set_animation(idx, start, true),
            None => {
                if start == AnimStart::NoRestart && self.anim.name == name {
                    return;
                }
                self.anim = AnimationState {
                    idx: None,
                    name: name.to_string(),
                    elapsed: 0.0,
                    speed_baseline: true,
                };
            }
        }
    }

    pub fn chase_point(&mut self, pos: Vec2, z: f32, teleport: bool) {
        self.chase = Some(ChaseInfo {
            target: ChaseTarget::Point { pos, z },
            teleport,
            target_distance: 3.0,
            reached: false,
        });
    }

    pub fn chase_mob(&mut self, target: MobId, offset: Vec2, teleport: bool, target_distance: f32) {
        self.chase = Some(ChaseInfo {
            target: ChaseTarget::Mob {
                mob: target,
                offset,
                z_offset: 0.0,
            },
            teleport,
            target_distance,
            reached: false,
        });
    }

    pub fn stop_chasing(&mut self) {
        self.chase = None;
        self.speed = Vec2::ZERO;
    }

    pub fn stop_circling(&mut self) {
        self.circling = None;
    }

    pub fn stop_turning(&mut self) {
        self.intended_angle = self.angle;
    }

    pub fn stop_following_path(&mut self) {
        self.path_target = None;
    }

    pub fn face(&mut self, angle: f32) {
        self.intended_angle = angle;
        self.angle = angle;
    }

    pub fn unfocus(&mut self) {
        self.focused_mob = None;
    }

    pub fn has_status(&self, name: &str) -> bool {
        self.statuses.iter().any(|status| status.name == name)
    }

    /// World position of a body part's hitbox.
    pub fn hitbox_pos(&self, idx: usize) -> Option<Vec2> {
        self.mob_type
            .hitboxes
            .get(idx)
            .map(|hitbox| self.pos + hitbox.offset.rotated(self.angle))
    }

    /// Closest hitbox to `target`, optionally restricted to one kind.
    /// Returns the body part index and the distance to the hitbox edge.
    pub fn closest_hitbox(&self, target: Vec2, kind: Option<HitboxKind>) -> Option<(usize, f32)> {
        self.mob_type
            .hitboxes
            .iter()
            .enumerate()
            .filter(|(_, hitbox)| kind.map_or(true, |wanted| hitbox.kind == wanted))
            .filter_map(|(idx, hitbox)| {
                let pos = self.hitbox_pos(idx)?;
                Some((idx, pos.distance(target) - hitbox.radius))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn pikmin(&self) -> Option<&PikminState> {
        match &self.category {
            CategoryState::Pikmin(state) => Some(state),
            _ => None,
        }
    }

    pub fn pikmin_mut(&mut self) -> Option<&mut PikminState> {
        match &mut self.category {
            CategoryState::Pikmin(state) => Some(state),
            _ => None,
        }
    }

    pub fn leader(&self) -> Option<&LeaderState> {
        match &self.category {
            CategoryState::Leader(state) => Some(state),
            _ => None,
        }
    }

    pub fn leader_mut(&mut self) -> Option<&mut LeaderState> {
        match &mut self.category {
            CategoryState::Leader(state) => Some(state),
            _ => None,
        }
    }

    pub fn tool(&self) -> Option<&ToolState> {
        match &self.category {
            CategoryState::Tool(state) => Some(state),
            _ => None,
        }
    }

    pub fn tool_mut(&mut self) -> Option<&mut ToolState> {
        match &mut self.category {
            CategoryState::Tool(state) => Some(state),
            _ => None,
        }
    }

    pub fn drop_state_mut(&mut self) -> Option<&mut DropState> {
        match &mut self.category {
            CategoryState::Drop(state) => Some(state),
            _ => None,
        }
    }

    pub fn group_task(&self) -> Option<&GroupTaskState> {
        match &self.category {
            CategoryState::GroupTask(state) => Some(state),
            _ => None,
        }
    }

    pub fn group_task_mut(&mut self) -> Option<&mut GroupTaskState> {
        match &mut self.category {
            CategoryState::GroupTask(state) => Some(state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob::{HitboxDef, MobCategoryId};

    fn test_mob() -> Mob {
        let mut mob_type = MobType::new("Dummy", MobCategoryId::Enemies)
            .with_animations(&["idling", "walking"]);
        let mut head = HitboxDef::new("head", 5.0);
        head.offset = Vec2::new(20.0, 0.0);
        mob_type.hitboxes = vec![HitboxDef::new("body", 10.0), head];
        Mob::new(MobId(7), Arc::new(mob_type), Vec2::ZERO, 0.0)
    }

    #[test]
    fn health_is_clamped_between_zero_and_max() {
        let mut mob = test_mob();
        mob.set_health(true, false, 500.0);
        assert_eq!(mob.health, mob.max_health);
        mob.set_health(true, false, -1000.0);
        assert_eq!(mob.health, 0.0);
        mob.set_health(false, true, 0.5);
        assert_eq!(mob.health, mob.max_health * 0.5);
    }

    #[test]
    fn no_restart_keeps_animation_progress() {
        let mut mob = test_mob();
        mob.set_animation(1, AnimStart::Normal, true);
        mob.anim.elapsed = 0.4;
        mob.set_animation(1, AnimStart::NoRestart, true);
        assert_eq!(mob.anim.elapsed, 0.4);
        mob.set_animation(1, AnimStart::Normal, true);
        assert_eq!(mob.anim.elapsed, 0.0);
        assert_eq!(mob.anim.name, "walking");
    }

    #[test]
    fn closest_hitbox_accounts_for_rotation() {
        let mut mob = test_mob();
        mob.angle = std::f32::consts::PI;
        let (idx, _) = mob
            .closest_hitbox(Vec2::new(-30.0, 0.0), None)
            .expect("hitbox");
        assert_eq!(idx, 1);
    }
}
