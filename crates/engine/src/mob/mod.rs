mod catalog;
mod category_state;
mod geometry;
#[allow(clippy::module_inception)]
mod mob;
mod types;
mod world;

pub use catalog::{ContentCatalog, Hazard, SprayType, StatusStateChange, StatusType};
pub use category_state::{
    CategoryState, DropState, GroupTaskSpot, GroupTaskState, LeaderState, PikminState, SpotState,
    ToolState,
};
pub use geometry::{deg_to_rad, normalize_angle, rad_to_deg, Vec2};
pub use mob::{
    ActiveStatus, AnimStart, AnimationState, CarryInfo, CarrySpot, ChaseInfo, ChaseTarget,
    CircleInfo, Mob, MobFlags, MobId, MobIdAllocator, MobParent, ScriptParticles, ScriptTimer,
    TrackRide,
};
pub use types::{
    AnimationDef, AttackMethod, DropConsumer, DropEffect, DropTypeInfo, GroupTaskPose,
    GroupTaskTypeInfo, HitboxDef, HitboxKind, LeaderTypeInfo, MobCategoryId, MobType,
    MobTypeDatabase, MobTypeId, MobTypeInfo, PikminTypeInfo, Reach, ResourceTypeInfo,
    ScriptSettings, SpawnInfo, StatusGainHook, Team, ToolTypeInfo, TrackRidingPose,
    TrackTypeInfo, DEFAULT_ANIMATION_DURATION,
};
pub use world::{AreaInfo, MobWorld, PrintRecord, GRAVITY_ADDER};
