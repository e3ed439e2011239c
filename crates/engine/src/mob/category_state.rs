use super::geometry::Vec2;
use super::types::{MobCategoryId, MobType, MobTypeInfo};
use super::MobId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpotState {
    #[default]
    Free,
    Reserved,
    Used,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PikminState {
    pub maturity: u8,
    pub is_seed_or_sprout: bool,
    pub is_grabbed_by_enemy: bool,
    pub latched: bool,
    pub was_last_hit_ding: bool,
    pub consecutive_dings: u32,
    pub in_bored_animation: bool,
    pub in_shaking_animation: bool,
    pub in_carry_struggle_animation: bool,
    pub is_tool_primed_for_whistle: bool,
    pub must_return: bool,
    pub bump_lock: f32,
    /// Scratch slot: carry/task spot index, or a "whistle already counted" marker.
    pub temp_i: usize,
    pub carrying_mob: Option<MobId>,
    pub leader_to_return_to: Option<MobId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderState {
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub holdable_by_pikmin: bool,
    pub holdable_by_enemies: bool,
    pub reserved: Option<MobId>,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            holdable_by_pikmin: true,
            holdable_by_enemies: false,
            reserved: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropState {
    pub doses_left: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupTaskSpot {
    pub offset: Vec2,
    pub state: SpotState,
    pub pikmin: Option<MobId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupTaskState {
    pub spots: Vec<GroupTaskSpot>,
    pub power: f32,
    pub ran_task_finished_code: bool,
}

impl GroupTaskState {
    pub fn free_spot(&self) -> Option<usize> {
        self.spots
            .iter()
            .position(|spot| spot.state == SpotState::Free)
    }

    pub fn worker_count(&self) -> usize {
        self.spots
            .iter()
            .filter(|spot| spot.state == SpotState::Used)
            .count()
    }
}

/// Per-instance data that only mobs of one category carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CategoryState {
    #[default]
    Generic,
    Pikmin(PikminState),
    Leader(LeaderState),
    Tool(ToolState),
    Drop(DropState),
    GroupTask(GroupTaskState),
}

impl CategoryState {
    pub fn for_type(mob_type: &MobType) -> Self {
        match (&mob_type.info, mob_type.category) {
            (MobTypeInfo::Drop(info), _) => CategoryState::Drop(DropState {
                doses_left: info.total_doses,
            }),
            (MobTypeInfo::GroupTask(info), _) => CategoryState::GroupTask(GroupTaskState {
                spots: info
                    .spots
                    .iter()
                    .map(|offset| GroupTaskSpot {
                        offset: *offset,
                        ..GroupTaskSpot::default()
                    })
                    .collect(),
                power: 0.0,
                ran_task_finished_code: false,
            }),
            (_, MobCategoryId::Pikmin) => CategoryState::Pikmin(PikminState::default()),
            (_, MobCategoryId::Leaders) => CategoryState::Leader(LeaderState::default()),
            (_, MobCategoryId::Tools) => CategoryState::Tool(ToolState::default()),
            _ => CategoryState::Generic,
        }
    }
}
