use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::fsm::FsmTable;

use super::catalog::StatusType;
use super::geometry::Vec2;
use super::world::MobWorld;
use super::MobId;

pub const DEFAULT_ANIMATION_DURATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MobTypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MobCategoryId {
    None,
    Pikmin,
    Onions,
    Leaders,
    Enemies,
    Treasures,
    Pellets,
    Drops,
    Resources,
    Tools,
    Tracks,
    Bouncers,
    GroupTasks,
    Scales,
    Custom,
}

impl MobCategoryId {
    pub const ALL: [MobCategoryId; 15] = [
        MobCategoryId::None,
        MobCategoryId::Pikmin,
        MobCategoryId::Onions,
        MobCategoryId::Leaders,
        MobCategoryId::Enemies,
        MobCategoryId::Treasures,
        MobCategoryId::Pellets,
        MobCategoryId::Drops,
        MobCategoryId::Resources,
        MobCategoryId::Tools,
        MobCategoryId::Tracks,
        MobCategoryId::Bouncers,
        MobCategoryId::GroupTasks,
        MobCategoryId::Scales,
        MobCategoryId::Custom,
    ];

    pub fn internal_name(self) -> &'static str {
        match self {
            MobCategoryId::None => "none",
            MobCategoryId::Pikmin => "pikmin",
            MobCategoryId::Onions => "onion",
            MobCategoryId::Leaders => "leader",
            MobCategoryId::Enemies => "enemy",
            MobCategoryId::Treasures => "treasure",
            MobCategoryId::Pellets => "pellet",
            MobCategoryId::Drops => "drop",
            MobCategoryId::Resources => "resource",
            MobCategoryId::Tools => "tool",
            MobCategoryId::Tracks => "track",
            MobCategoryId::Bouncers => "bouncer",
            MobCategoryId::GroupTasks => "group_task",
            MobCategoryId::Scales => "scale",
            MobCategoryId::Custom => "custom",
        }
    }

    pub fn from_internal_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.internal_name() == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Team {
    #[default]
    None,
    Player1,
    Player2,
    Player3,
    Player4,
    Enemy1,
    Enemy2,
    Enemy3,
    Enemy4,
    Obstacle,
    Other,
}

impl Team {
    pub fn from_name(name: &str) -> Option<Self> {
        let team = match name {
            "none" => Team::None,
            "player_1" => Team::Player1,
            "player_2" => Team::Player2,
            "player_3" => Team::Player3,
            "player_4" => Team::Player4,
            "enemy_1" => Team::Enemy1,
            "enemy_2" => Team::Enemy2,
            "enemy_3" => Team::Enemy3,
            "enemy_4" => Team::Enemy4,
            "obstacle" => Team::Obstacle,
            "other" => Team::Other,
            _ => return None,
        };
        Some(team)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        [
            Team::None,
            Team::Player1,
            Team::Player2,
            Team::Player3,
            Team::Player4,
            Team::Enemy1,
            Team::Enemy2,
            Team::Enemy3,
            Team::Enemy4,
            Team::Obstacle,
            Team::Other,
        ]
        .get(index)
        .copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HitboxKind {
    #[default]
    Normal,
    Attack,
    Disabled,
}

/// One body part and the hitbox attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct HitboxDef {
    pub body_part: String,
    pub offset: Vec2,
    pub z: f32,
    pub height: f32,
    pub radius: f32,
    pub kind: HitboxKind,
    pub value: f32,
    pub can_pikmin_latch: bool,
    pub hazard: Option<String>,
}

impl HitboxDef {
    pub fn new(body_part: impl Into<String>, radius: f32) -> Self {
        Self {
            body_part: body_part.into(),
            offset: Vec2::ZERO,
            z: 0.0,
            height: 0.0,
            radius,
            kind: HitboxKind::Normal,
            value: 1.0,
            can_pikmin_latch: false,
            hazard: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub name: String,
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reach {
    pub name: String,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnInfo {
    pub name: String,
    pub mob_type_name: String,
    pub relative: bool,
    pub offset: Vec2,
    pub z: f32,
    pub angle: f32,
    pub vars: Vec<(String, String)>,
    pub link_object_to_spawn: bool,
    pub link_spawn_to_object: bool,
    pub momentum: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttackMethod {
    #[default]
    Latch,
    Impact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PikminTypeInfo {
    pub attack_method: AttackMethod,
    pub attack_power: f32,
    pub carry_strength: f32,
    pub can_fly: bool,
    pub can_carry_tools: bool,
    pub knocked_down_duration: f32,
    pub knocked_down_whistle_bonus: f32,
    pub sprout_evolution_time: [f32; 3],
    pub idle_bump_delay: f32,
    pub hazard_immunities: Vec<String>,
}

impl Default for PikminTypeInfo {
    fn default() -> Self {
        Self {
            attack_method: AttackMethod::Latch,
            attack_power: 1.0,
            carry_strength: 1.0,
            can_fly: false,
            can_carry_tools: true,
            knocked_down_duration: 1.8,
            knocked_down_whistle_bonus: 1.2,
            sprout_evolution_time: [120.0, 120.0, 180.0],
            idle_bump_delay: 5.0,
            hazard_immunities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderTypeInfo {
    pub whistle_range: f32,
    pub whistle_duration: f32,
    pub max_throw_height: f32,
}

impl Default for LeaderTypeInfo {
    fn default() -> Self {
        Self {
            whistle_range: 80.0,
            whistle_duration: 2.5,
            max_throw_height: 260.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolTypeInfo {
    pub can_be_hotswapped: bool,
    pub dropped_when_pikmin_lands: bool,
    pub dropped_when_pikmin_lands_on_opponent: bool,
    pub dropped_when_pikmin_is_whistled: bool,
    pub stuck_when_pikmin_lands_on_opponent: bool,
    pub pikmin_returns_after_using: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropConsumer {
    #[default]
    Pikmin,
    Leaders,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropEffect {
    #[default]
    IncreaseMaturity,
    GiveStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTypeInfo {
    pub consumer: DropConsumer,
    pub effect: DropEffect,
    pub increase_amount: i32,
    pub status_to_give: Option<String>,
    pub total_doses: u32,
}

impl Default for DropTypeInfo {
    fn default() -> Self {
        Self {
            consumer: DropConsumer::Pikmin,
            effect: DropEffect::IncreaseMaturity,
            increase_amount: 2,
            status_to_give: None,
            total_doses: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackRidingPose {
    #[default]
    Stopped,
    Climbing,
    Sliding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackTypeInfo {
    pub checkpoints: Vec<Vec2>,
    pub ride_speed: f32,
    pub riding_pose: TrackRidingPose,
    pub cancellable_with_whistle: bool,
    pub ridable_by_pikmin: bool,
    pub ridable_by_leaders: bool,
}

impl Default for TrackTypeInfo {
    fn default() -> Self {
        Self {
            checkpoints: vec![Vec2::ZERO, Vec2::new(100.0, 0.0)],
            ride_speed: 3.0,
            riding_pose: TrackRidingPose::Stopped,
            cancellable_with_whistle: false,
            ridable_by_pikmin: true,
            ridable_by_leaders: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupTaskPose {
    #[default]
    Standing,
    ArmsStretched,
    Pushing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTaskTypeInfo {
    pub power_goal: f32,
    pub spots: Vec<Vec2>,
    pub worker_pikmin_pose: GroupTaskPose,
    pub flying_pikmin_only: bool,
}

impl Default for GroupTaskTypeInfo {
    fn default() -> Self {
        Self {
            power_goal: 10.0,
            spots: vec![Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)],
            worker_pikmin_pose: GroupTaskPose::Standing,
            flying_pikmin_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTypeInfo {
    pub vanish_delay: f32,
    pub delivery_duration: f32,
    pub return_point: Option<Vec2>,
}

impl Default for ResourceTypeInfo {
    fn default() -> Self {
        Self {
            vanish_delay: 10.0,
            delivery_duration: 1.0,
            return_point: None,
        }
    }
}

/// Category-specific static data of a mob type.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MobTypeInfo {
    #[default]
    Generic,
    Pikmin(PikminTypeInfo),
    Leader(LeaderTypeInfo),
    Tool(ToolTypeInfo),
    Drop(DropTypeInfo),
    Track(TrackTypeInfo),
    GroupTask(GroupTaskTypeInfo),
    Resource(ResourceTypeInfo),
}

/// Names the script loader needs to wire up default handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptSettings {
    pub first_state: String,
    pub dying_state: String,
    pub states_ignoring_death: Vec<String>,
    pub states_ignoring_spray: Vec<String>,
    pub states_ignoring_hazard: Vec<String>,
}

pub type StatusGainHook = fn(&mut MobWorld, MobId, &StatusType);

#[derive(Debug, Clone)]
pub struct MobType {
    pub id: MobTypeId,
    pub name: String,
    pub category: MobCategoryId,
    pub max_health: f32,
    pub radius: f32,
    pub height: f32,
    pub move_speed: f32,
    pub weight: f32,
    pub max_carriers: usize,
    pub walkable: bool,
    pub default_team: Team,
    pub animations: Vec<AnimationDef>,
    pub hitboxes: Vec<HitboxDef>,
    pub reaches: Vec<Reach>,
    pub spawns: Vec<SpawnInfo>,
    pub script: ScriptSettings,
    pub info: MobTypeInfo,
    pub fsm: Arc<FsmTable>,
    pub status_gain_hook: Option<StatusGainHook>,
}

impl MobType {
    pub fn new(name: impl Into<String>, category: MobCategoryId) -> Self {
        Self {
            id: MobTypeId(0),
            name: name.into(),
            category,
            max_health: 100.0,
            radius: 10.0,
            height: 20.0,
            move_speed: 100.0,
            weight: 1.0,
            max_carriers: 0,
            walkable: false,
            default_team: Team::None,
            animations: Vec::new(),
            hitboxes: Vec::new(),
            reaches: Vec::new(),
            spawns: Vec::new(),
            script: ScriptSettings::default(),
            info: MobTypeInfo::Generic,
            fsm: Arc::new(FsmTable::default()),
            status_gain_hook: None,
        }
    }

    pub fn with_animations(mut self, names: &[&str]) -> Self {
        self.animations = names
            .iter()
            .map(|name| AnimationDef {
                name: (*name).to_string(),
                duration: DEFAULT_ANIMATION_DURATION,
            })
            .collect();
        self
    }

    pub fn animation_index(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|anim| anim.name == name)
    }

    pub fn animation_duration(&self, idx: usize) -> f32 {
        self.animations
            .get(idx)
            .map(|anim| anim.duration)
            .unwrap_or(DEFAULT_ANIMATION_DURATION)
    }

    pub fn body_part_index(&self, name: &str) -> Option<usize> {
        self.hitboxes.iter().position(|hitbox| hitbox.body_part == name)
    }

    pub fn reach_index(&self, name: &str) -> Option<usize> {
        self.reaches.iter().position(|reach| reach.name == name)
    }

    pub fn spawn_index(&self, name: &str) -> Option<usize> {
        self.spawns.iter().position(|spawn| spawn.name == name)
    }

    pub fn pikmin_info(&self) -> Option<&PikminTypeInfo> {
        match &self.info {
            MobTypeInfo::Pikmin(info) => Some(info),
            _ => None,
        }
    }

    pub fn tool_info(&self) -> Option<&ToolTypeInfo> {
        match &self.info {
            MobTypeInfo::Tool(info) => Some(info),
            _ => None,
        }
    }

    pub fn drop_info(&self) -> Option<&DropTypeInfo> {
        match &self.info {
            MobTypeInfo::Drop(info) => Some(info),
            _ => None,
        }
    }

    pub fn track_info(&self) -> Option<&TrackTypeInfo> {
        match &self.info {
            MobTypeInfo::Track(info) => Some(info),
            _ => None,
        }
    }

    pub fn group_task_info(&self) -> Option<&GroupTaskTypeInfo> {
        match &self.info {
            MobTypeInfo::GroupTask(info) => Some(info),
            _ => None,
        }
    }

    pub fn leader_info(&self) -> Option<&LeaderTypeInfo> {
        match &self.info {
            MobTypeInfo::Leader(info) => Some(info),
            _ => None,
        }
    }

    pub fn resource_info(&self) -> Option<&ResourceTypeInfo> {
        match &self.info {
            MobTypeInfo::Resource(info) => Some(info),
            _ => None,
        }
    }
}

/// Every registered mob type, looked up by name when spawning.
#[derive(Debug, Default, Clone)]
pub struct MobTypeDatabase {
    types: Vec<Arc<MobType>>,
    ids_by_name: HashMap<String, MobTypeId>,
}

impl MobTypeDatabase {
    pub fn from_types(types: Vec<Arc<MobType>>) -> Self {
        let mut ids_by_name = HashMap::with_capacity(types.len());
        for (idx, mob_type) in types.iter().enumerate() {
            ids_by_name.insert(mob_type.name.clone(), MobTypeId(idx as u32));
        }
        Self { types, ids_by_name }
    }

    pub fn insert(&mut self, mob_type: Arc<MobType>) -> MobTypeId {
        if let Some(id) = self.ids_by_name.get(&mob_type.name).copied() {
            self.types[id.0 as usize] = mob_type;
            return id;
        }
        let id = MobTypeId(self.types.len() as u32);
        self.ids_by_name.insert(mob_type.name.clone(), id);
        self.types.push(mob_type);
        id
    }

    pub fn type_id_by_name(&self, name: &str) -> Option<MobTypeId> {
        self.ids_by_name.get(name).copied()
    }

    pub fn get(&self, id: MobTypeId) -> Option<&Arc<MobType>> {
        self.types.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<MobType>> {
        self.type_id_by_name(name).and_then(|id| self.get(id))
    }

    pub fn types(&self) -> &[Arc<MobType>] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip_through_lookup() {
        for category in MobCategoryId::ALL {
            assert_eq!(
                MobCategoryId::from_internal_name(category.internal_name()),
                Some(category)
            );
        }
        assert_eq!(MobCategoryId::from_internal_name("spaceship"), None);
    }

    #[test]
    fn database_replaces_types_with_the_same_name() {
        let mut db = MobTypeDatabase::default();
        let first = db.insert(Arc::new(MobType::new("Red Pikmin", MobCategoryId::Pikmin)));
        let mut heavier = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
        heavier.weight = 3.0;
        let second = db.insert(Arc::new(heavier));
        assert_eq!(first, second);
        assert_eq!(db.len(), 1);
        assert_eq!(db.by_name("Red Pikmin").map(|t| t.weight), Some(3.0));
    }

    #[test]
    fn unknown_animation_has_no_index() {
        let mob_type = MobType::new("Bulborb", MobCategoryId::Enemies)
            .with_animations(&["idling", "attacking"]);
        assert_eq!(mob_type.animation_index("attacking"), Some(1));
        assert_eq!(mob_type.animation_index("dancing"), None);
    }
}
