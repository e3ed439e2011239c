//! Resources are carried by Pikmin to a destination and delivered there.

use engine::fsm::{gen_mob, FsmBuilder};
use engine::mob::AnimStart;
use engine::{EventPayload, MobEvent, MobId, MobType, MobWorld, Vec2};
use tracing::debug;

pub const IDLE_WAITING: usize = 0;
pub const IDLE_MOVING: usize = 1;
pub const IDLE_STUCK: usize = 2;
pub const IDLE_THROWN: usize = 3;
pub const BEING_DELIVERED: usize = 4;
pub const N_STATES: usize = 5;

pub fn create_fsm(mob_type: &mut MobType) {
    let mut efc = FsmBuilder::new();

    efc.new_state("idle_waiting", IDLE_WAITING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_waiting);
    efc.run(gen_mob::carry_stop_move);
    efc.new_event(MobEvent::CarrierAdded);
    efc.run(gen_mob::handle_carrier_added);
    efc.new_event(MobEvent::CarrierRemoved);
    efc.run(gen_mob::handle_carrier_removed);
    efc.new_event(MobEvent::CarryBeginMove);
    efc.change_state("idle_moving");
    efc.new_event(MobEvent::Landed);
    efc.run(lose_momentum);
    efc.new_event(MobEvent::Timer);
    efc.run(vanish);

    efc.new_state("idle_moving", IDLE_MOVING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(handle_start_moving);
    efc.run(gen_mob::carry_begin_move);
    efc.new_event(MobEvent::CarrierAdded);
    efc.run(gen_mob::handle_carrier_added);
    efc.new_event(MobEvent::CarrierRemoved);
    efc.run(gen_mob::handle_carrier_removed);
    efc.new_event(MobEvent::CarryStopMove);
    efc.run(handle_dropped);
    efc.change_state("idle_waiting");
    efc.new_event(MobEvent::CarryBeginMove);
    efc.run(gen_mob::carry_begin_move);
    efc.new_event(MobEvent::ReachedDestination);
    efc.run(gen_mob::carry_reach_destination);
    efc.new_event(MobEvent::PathBlocked);
    efc.change_state("idle_stuck");
    efc.new_event(MobEvent::PathsChanged);
    efc.run(gen_mob::carry_begin_move);
    efc.new_event(MobEvent::CarryDelivered);
    efc.change_state("being_delivered");
    efc.new_event(MobEvent::TouchedBouncer);
    efc.change_state("idle_thrown");

    efc.new_state("idle_stuck", IDLE_STUCK);
    efc.new_event(MobEvent::OnEnter);
    efc.run(become_stuck);
    efc.new_event(MobEvent::CarrierAdded);
    efc.run(gen_mob::handle_carrier_added);
    efc.new_event(MobEvent::CarrierRemoved);
    efc.run(gen_mob::handle_carrier_removed);
    efc.new_event(MobEvent::CarryBeginMove);
    efc.run(stop_being_stuck);
    efc.change_state("idle_moving");
    efc.new_event(MobEvent::CarryStopMove);
    efc.run(stop_being_stuck);
    efc.run(handle_dropped);
    efc.change_state("idle_waiting");
    efc.new_event(MobEvent::PathsChanged);
    efc.run(stop_being_stuck);
    efc.change_state("idle_moving");

    efc.new_state("idle_thrown", IDLE_THROWN);
    efc.new_event(MobEvent::Landed);
    efc.run(lose_momentum);
    efc.change_state("idle_moving");

    efc.new_state("being_delivered", BEING_DELIVERED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(gen_mob::start_being_delivered);
    efc.new_event(MobEvent::Timer);
    efc.run(gen_mob::handle_delivery);

    super::install_states(mob_type, efc.finish(N_STATES), "idle_waiting", None);
}

/// Resources that came from a pile must go back to it.
fn start_waiting(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let Some(mob) = world.mob_mut(id) else {
        return;
    };
    if mob.flags.to_delete {
        return;
    }
    let return_point = mob
        .mob_type
        .resource_info()
        .and_then(|info| info.return_point);
    if let Some(carry) = mob.carry.as_mut() {
        carry.must_return = return_point.is_some();
        carry.return_point = return_point.unwrap_or_default();
    }
    mob.set_animation_named("idling", AnimStart::RandomTimeOnSpawn);
}

fn handle_start_moving(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_timer(0.0);
    }
}

/// Dropped resources vanish after the type's delay. Zero keeps them forever.
fn handle_dropped(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        let delay = mob
            .mob_type
            .resource_info()
            .map_or(0.0, |info| info.vanish_delay);
        if delay > 0.0 {
            mob.set_timer(delay);
        }
    }
}

fn lose_momentum(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.speed = Vec2::ZERO;
        mob.speed_z = 0.0;
    }
}

fn become_stuck(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        if let Some(carry) = mob.carry.as_mut() {
            carry.is_stuck = true;
        }
        mob.stop_chasing();
    }
    debug!(mob = id.0, "resource_stuck");
}

fn stop_being_stuck(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(carry) = world.mob_mut(id).and_then(|mob| mob.carry.as_mut()) {
        carry.is_stuck = false;
    }
}

fn vanish(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.carry = None;
        mob.flags.to_delete = true;
    }
    debug!(mob = id.0, "resource_vanished");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::mob::{MobCategoryId, MobTypeInfo, ResourceTypeInfo};
    use engine::{ContentCatalog, MobTypeDatabase};

    use super::*;
    use crate::fsms::pikmin;

    fn pellet_type(return_point: Option<Vec2>) -> MobType {
        let mut mob_type = MobType::new("Pellet", MobCategoryId::Resources);
        mob_type.max_carriers = 2;
        mob_type.weight = 2.0;
        mob_type.info = MobTypeInfo::Resource(ResourceTypeInfo {
            vanish_delay: 3.0,
            delivery_duration: 1.0,
            return_point,
        });
        create_fsm(&mut mob_type);
        mob_type
    }

    fn world_with(types: Vec<MobType>) -> MobWorld {
        let types = MobTypeDatabase::from_types(types.into_iter().map(Arc::new).collect());
        MobWorld::new(types, Arc::new(ContentCatalog::default()), 9)
    }

    fn spawn(world: &mut MobWorld, name: &str, pos: Vec2) -> MobId {
        let mob_type = Arc::clone(world.types().by_name(name).expect("type"));
        world.create_mob(pos, mob_type, 0.0, &[])
    }

    fn state_of(world: &MobWorld, id: MobId) -> Option<String> {
        world.mob(id).and_then(|mob| mob.state_name()).map(str::to_string)
    }

    #[test]
    fn enough_carriers_start_the_trip_and_the_return_point_receives_it() {
        let mut pikmin_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
        pikmin::create_fsm(&mut pikmin_type);
        let mut world = world_with(vec![
            pellet_type(Some(Vec2::new(300.0, 0.0))),
            pikmin_type,
        ]);
        let pellet = spawn(&mut world, "Pellet", Vec2::ZERO);
        assert_eq!(state_of(&world, pellet).as_deref(), Some("idle_waiting"));

        let carriers: Vec<MobId> = (0..2)
            .map(|idx| spawn(&mut world, "Red Pikmin", Vec2::new(-30.0, idx as f32 * 10.0)))
            .collect();
        for carrier in &carriers {
            world.run_event(
                *carrier,
                MobEvent::NearCarriableObject,
                &EventPayload::Mob(pellet),
            );
            assert_eq!(
                state_of(&world, *carrier).as_deref(),
                Some("going_to_carriable_object")
            );
            world.run_event(*carrier, MobEvent::ReachedDestination, &EventPayload::None);
            assert_eq!(state_of(&world, *carrier).as_deref(), Some("carrying"));
        }
        assert_eq!(world.carrier_count(pellet), 2);
        assert_eq!(state_of(&world, pellet).as_deref(), Some("idle_moving"));
        assert!(world.mob(pellet).expect("pellet").carry.as_ref().expect("carry").is_moving);

        world.run_event(pellet, MobEvent::ReachedDestination, &EventPayload::None);
        assert_eq!(state_of(&world, pellet).as_deref(), Some("being_delivered"));
        for carrier in &carriers {
            assert_eq!(state_of(&world, *carrier).as_deref(), Some("returning"));
        }
        world.run_event(pellet, MobEvent::Timer, &EventPayload::None);
        assert!(world.mob(pellet).expect("pellet").flags.to_delete);
    }

    #[test]
    fn losing_carriers_stops_the_trip_and_starts_the_vanish_timer() {
        let mut world = world_with(vec![pellet_type(Some(Vec2::new(100.0, 0.0)))]);
        let pellet = spawn(&mut world, "Pellet", Vec2::ZERO);
        engine::fsm::set_state(&mut world, pellet, IDLE_MOVING, &EventPayload::None);
        world.run_event(pellet, MobEvent::CarryStopMove, &EventPayload::None);

        let mob = world.mob(pellet).expect("pellet");
        assert_eq!(mob.state_name(), Some("idle_waiting"));
        assert_eq!(mob.script_timer.time_left, 3.0);
        world.run_event(pellet, MobEvent::Timer, &EventPayload::None);
        assert!(world.mob(pellet).expect("pellet").flags.to_delete);
    }

    #[test]
    fn nowhere_to_go_means_stuck() {
        let mut world = world_with(vec![pellet_type(None)]);
        let pellet = spawn(&mut world, "Pellet", Vec2::ZERO);
        world.run_event(pellet, MobEvent::CarryBeginMove, &EventPayload::None);
        let mob = world.mob(pellet).expect("pellet");
        assert_eq!(mob.state_name(), Some("idle_stuck"));
        assert!(mob.carry.as_ref().expect("carry").is_stuck);
    }
}
