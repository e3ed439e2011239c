//! Tracks (slides, poles) carry whoever touches them along their checkpoints.
//! The riding itself happens on the rider's side.

use engine::fsm::FsmBuilder;
use engine::mob::{AnimStart, MobCategoryId};
use engine::{EventPayload, MobEvent, MobId, MobType, MobWorld};
use tracing::debug;

pub const IDLING: usize = 0;
pub const N_STATES: usize = 1;

pub fn create_fsm(mob_type: &mut MobType) {
    let mut efc = FsmBuilder::new();

    efc.new_state("idling", IDLING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_idle_anim);
    efc.new_event(MobEvent::TouchedObject);
    efc.run(offer_ride);

    super::install_states(mob_type, efc.finish(N_STATES), "idling", None);
}

fn set_idle_anim(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_animation_named("idling", AnimStart::Normal);
    }
}

fn can_ride(world: &MobWorld, track: MobId, rider: MobId) -> bool {
    let Some(info) = world.mob(track).and_then(|mob| mob.mob_type.track_info()) else {
        return false;
    };
    if info.checkpoints.len() < 2 {
        return false;
    }
    match world.mob(rider).map(|mob| mob.category_id()) {
        Some(MobCategoryId::Pikmin) => info.ridable_by_pikmin,
        Some(MobCategoryId::Leaders) => info.ridable_by_leaders,
        _ => false,
    }
}

fn offer_ride(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(rider) = payload.mob() else {
        return;
    };
    if !can_ride(world, id, rider) {
        return;
    }
    debug!(mob = id.0, rider = rider.0, "track_touched");
    world.run_event(rider, MobEvent::TouchedTrack, &EventPayload::Mob(id));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::mob::{MobTypeInfo, TrackTypeInfo};
    use engine::{ContentCatalog, Mob, MobTypeDatabase, Vec2};

    use super::*;
    use crate::fsms::pikmin;

    fn world(ridable_by_pikmin: bool) -> (MobWorld, MobId, MobId) {
        let mut slide = MobType::new("Slide", MobCategoryId::Tracks);
        slide.info = MobTypeInfo::Track(TrackTypeInfo {
            checkpoints: vec![Vec2::ZERO, Vec2::new(100.0, 0.0)],
            ride_speed: 1.0,
            ridable_by_pikmin,
            ..TrackTypeInfo::default()
        });
        create_fsm(&mut slide);
        let mut pikmin_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
        pikmin::create_fsm(&mut pikmin_type);
        let types = MobTypeDatabase::from_types(vec![Arc::new(slide), Arc::new(pikmin_type)]);
        let mut world = MobWorld::new(types, Arc::new(ContentCatalog::default()), 8);
        let slide_type = Arc::clone(world.types().by_name("Slide").expect("type"));
        let slide = world.create_mob(Vec2::ZERO, slide_type, 0.0, &[]);
        let pikmin_type = Arc::clone(world.types().by_name("Red Pikmin").expect("type"));
        let pikmin = world.create_mob(Vec2::new(5.0, 5.0), pikmin_type, 0.0, &[]);
        (world, slide, pikmin)
    }

    #[test]
    fn riders_travel_to_the_last_checkpoint() {
        let (mut world, slide, pikmin) = world(true);

        world.run_event(slide, MobEvent::TouchedObject, &EventPayload::Mob(pikmin));
        assert_eq!(world.mob(pikmin).and_then(Mob::state_name), Some("riding_track"));

        world.tick(0.6);
        assert!(world.mob(pikmin).expect("pikmin").track_ride.is_some());
        world.tick(0.6);

        let rider = world.mob(pikmin).expect("pikmin");
        assert_eq!(rider.state_name(), Some("idling"));
        assert!(rider.track_ride.is_none());
        assert!((rider.pos.x - 100.0).abs() < 1.0);
    }

    #[test]
    fn tracks_closed_to_pikmin_are_ignored() {
        let (mut world, slide, pikmin) = world(false);
        world.run_event(slide, MobEvent::TouchedObject, &EventPayload::Mob(pikmin));
        assert_eq!(world.mob(pikmin).and_then(Mob::state_name), Some("idling"));
    }
}
