//! Tools lie around until a Pikmin picks them up, and ride along while held.

use engine::fsm::FsmBuilder;
use engine::mob::AnimStart;
use engine::{EventPayload, Mob, MobEvent, MobId, MobType, MobWorld, Vec2};
use tracing::debug;

pub const IDLING: usize = 0;
pub const BEING_HELD: usize = 1;
pub const N_STATES: usize = 2;

pub fn create_fsm(mob_type: &mut MobType) {
    let mut efc = FsmBuilder::new();

    efc.new_state("idling", IDLING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(lie_still);
    efc.new_event(MobEvent::Held);
    efc.run(be_held);
    efc.change_state("being_held");
    efc.new_event(MobEvent::Landed);
    efc.run(lose_momentum);

    efc.new_state("being_held", BEING_HELD);
    efc.new_event(MobEvent::Released);
    efc.run(be_released);
    efc.change_state("idling");

    super::install_states(mob_type, efc.finish(N_STATES), "idling", None);
}

fn lie_still(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_animation_named("idling", AnimStart::NoRestart);
    }
}

/// The reservation is spent once someone actually holds the tool.
fn be_held(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    if let Some(state) = world.mob_mut(id).and_then(Mob::tool_mut) {
        state.reserved = None;
    }
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.intangible = true;
        mob.stop_chasing();
    }
    debug!(mob = id.0, holder = payload.mob().map(|holder| holder.0), "tool_held");
}

fn be_released(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.intangible = false;
        if mob.var("gentle_release") != "true" {
            mob.speed_z = 0.0;
        }
        mob.vars.remove("gentle_release");
    }
}

fn lose_momentum(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.speed = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::mob::{MobCategoryId, MobTypeInfo, ToolTypeInfo};
    use engine::{ContentCatalog, MobTypeDatabase};

    use super::*;
    use crate::fsms::pikmin;

    fn world() -> (MobWorld, MobId, MobId) {
        let mut bomb = MobType::new("Bomb Rock", MobCategoryId::Tools);
        bomb.info = MobTypeInfo::Tool(ToolTypeInfo::default());
        create_fsm(&mut bomb);
        let mut pikmin_type = MobType::new("Yellow Pikmin", MobCategoryId::Pikmin)
            .with_animations(&["picking_up"]);
        pikmin::create_fsm(&mut pikmin_type);
        let types = MobTypeDatabase::from_types(vec![Arc::new(bomb), Arc::new(pikmin_type)]);
        let mut world = MobWorld::new(types, Arc::new(ContentCatalog::default()), 2);
        let bomb_type = Arc::clone(world.types().by_name("Bomb Rock").expect("type"));
        let tool = world.create_mob(Vec2::new(40.0, 0.0), bomb_type, 0.0, &[]);
        let pikmin_type = Arc::clone(world.types().by_name("Yellow Pikmin").expect("type"));
        let pikmin = world.create_mob(Vec2::ZERO, pikmin_type, 0.0, &[]);
        (world, tool, pikmin)
    }

    #[test]
    fn picking_up_holds_the_tool_and_clears_the_reservation() {
        let (mut world, tool, pikmin) = world();

        world.run_event(pikmin, MobEvent::NearTool, &EventPayload::Mob(tool));
        assert_eq!(world.mob(pikmin).and_then(Mob::state_name), Some("going_to_tool"));
        assert_eq!(world.mob(tool).and_then(Mob::tool).expect("tool").reserved, Some(pikmin));

        world.run_event(pikmin, MobEvent::ReachedDestination, &EventPayload::None);
        world.run_event(pikmin, MobEvent::AnimationEnd, &EventPayload::None);

        assert_eq!(world.mob(pikmin).and_then(Mob::state_name), Some("idling_h"));
        let tool_mob = world.mob(tool).expect("tool");
        assert_eq!(tool_mob.state_name(), Some("being_held"));
        assert_eq!(tool_mob.holder, Some(pikmin));
        assert_eq!(tool_mob.tool().expect("tool").reserved, None);
    }

    #[test]
    fn release_order_drops_the_tool() {
        let (mut world, tool, pikmin) = world();
        world.run_event(pikmin, MobEvent::NearTool, &EventPayload::Mob(tool));
        world.run_event(pikmin, MobEvent::ReachedDestination, &EventPayload::None);
        world.run_event(pikmin, MobEvent::AnimationEnd, &EventPayload::None);

        world.run_event(pikmin, MobEvent::ReleaseOrder, &EventPayload::None);

        assert_eq!(world.mob(pikmin).and_then(Mob::state_name), Some("idling"));
        let tool_mob = world.mob(tool).expect("tool");
        assert_eq!(tool_mob.state_name(), Some("idling"));
        assert_eq!(tool_mob.holder, None);
        assert!(!tool_mob.flags.intangible);
    }

    #[test]
    fn reserved_tools_turn_away_other_pikmin() {
        let (mut world, tool, pikmin) = world();
        let other_type = Arc::clone(world.types().by_name("Yellow Pikmin").expect("type"));
        let other = world.create_mob(Vec2::new(80.0, 0.0), other_type, 0.0, &[]);

        world.run_event(pikmin, MobEvent::NearTool, &EventPayload::Mob(tool));
        world.run_event(other, MobEvent::NearTool, &EventPayload::Mob(tool));

        assert_eq!(world.mob(other).and_then(Mob::state_name), Some("idling"));
    }
}
