//! Drops (nectar, sprays) hand out doses to whoever touches them and
//! vanish once empty.

use engine::fsm::{self, FsmBuilder};
use engine::mob::{AnimStart, DropConsumer, DropEffect, MobCategoryId};
use engine::{EventPayload, Mob, MobEvent, MobId, MobType, MobWorld};
use tracing::debug;

pub const IDLING: usize = 0;
pub const EMPTY: usize = 1;
pub const N_STATES: usize = 2;

const VANISH_DELAY: f32 = 1.5;

pub fn create_fsm(mob_type: &mut MobType) {
    let mut efc = FsmBuilder::new();

    efc.new_state("idling", IDLING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(set_idle_anim);
    efc.new_event(MobEvent::TouchedObject);
    efc.run(on_touched);

    efc.new_state("empty", EMPTY);
    efc.new_event(MobEvent::OnEnter);
    efc.run(start_vanishing);
    efc.new_event(MobEvent::Timer);
    efc.run(vanish);

    super::install_states(mob_type, efc.finish(N_STATES), "idling", None);
}

fn set_idle_anim(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.set_animation_named("idling", AnimStart::RandomTimeOnSpawn);
    }
}

/// Whether the toucher would get anything out of drinking this drop.
fn wants_drop(world: &MobWorld, drop: MobId, toucher: MobId) -> bool {
    let (Some(drop_mob), Some(toucher_mob)) = (world.mob(drop), world.mob(toucher)) else {
        return false;
    };
    let Some(info) = drop_mob.mob_type.drop_info() else {
        return false;
    };
    if !toucher_mob.is_alive() {
        return false;
    }
    match info.consumer {
        DropConsumer::Pikmin => {
            if toucher_mob.category_id() != MobCategoryId::Pikmin {
                return false;
            }
            let maxed = toucher_mob
                .pikmin()
                .is_some_and(|state| state.maturity >= 2);
            !(info.effect == DropEffect::IncreaseMaturity && info.increase_amount > 0 && maxed)
        }
        DropConsumer::Leaders => toucher_mob.category_id() == MobCategoryId::Leaders,
    }
}

/// Offers a dose. It only counts if the toucher actually started drinking.
fn on_touched(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(toucher) = payload.mob() else {
        return;
    };
    if !wants_drop(world, id, toucher) {
        return;
    }
    world.run_event(toucher, MobEvent::TouchedDrop, &EventPayload::Mob(id));
    let drinking = world
        .mob(toucher)
        .and_then(Mob::state_name)
        .is_some_and(|state| state == "drinking");
    if !drinking {
        return;
    }

    let Some(state) = world.mob_mut(id).and_then(Mob::drop_state_mut) else {
        return;
    };
    state.doses_left = state.doses_left.saturating_sub(1);
    let doses_left = state.doses_left;
    debug!(mob = id.0, drinker = toucher.0, doses_left, "drop_dose_taken");
    if doses_left == 0 {
        fsm::set_state(world, id, EMPTY, &EventPayload::None);
    }
}

fn start_vanishing(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.intangible = true;
        mob.set_timer(VANISH_DELAY);
        mob.set_animation_named("shrinking", AnimStart::Normal);
    }
}

fn vanish(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    if let Some(mob) = world.mob_mut(id) {
        mob.flags.to_delete = true;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::mob::{DropTypeInfo, MobTypeInfo};
    use engine::{ContentCatalog, MobTypeDatabase, Vec2};

    use super::*;
    use crate::fsms::pikmin;

    fn world(info: DropTypeInfo) -> MobWorld {
        let mut nectar = MobType::new("Nectar", MobCategoryId::Drops);
        nectar.info = MobTypeInfo::Drop(info);
        create_fsm(&mut nectar);
        let mut pikmin_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
        pikmin::create_fsm(&mut pikmin_type);
        let types = MobTypeDatabase::from_types(vec![Arc::new(nectar), Arc::new(pikmin_type)]);
        MobWorld::new(types, Arc::new(ContentCatalog::default()), 5)
    }

    fn spawn(world: &mut MobWorld, name: &str) -> MobId {
        let mob_type = Arc::clone(world.types().by_name(name).expect("type"));
        world.create_mob(Vec2::ZERO, mob_type, 0.0, &[])
    }

    #[test]
    fn last_dose_empties_the_drop() {
        let mut world = world(DropTypeInfo {
            total_doses: 2,
            ..DropTypeInfo::default()
        });
        let nectar = spawn(&mut world, "Nectar");
        let first = spawn(&mut world, "Red Pikmin");
        let second = spawn(&mut world, "Red Pikmin");

        world.run_event(nectar, MobEvent::TouchedObject, &EventPayload::Mob(first));
        assert_eq!(world.mob(first).and_then(Mob::state_name), Some("drinking"));
        assert_eq!(world.mob(nectar).and_then(Mob::state_name), Some("idling"));

        world.run_event(nectar, MobEvent::TouchedObject, &EventPayload::Mob(second));
        let drop = world.mob(nectar).expect("drop");
        assert_eq!(drop.state_name(), Some("empty"));
        assert!(drop.flags.intangible);

        world.run_event(nectar, MobEvent::Timer, &EventPayload::None);
        assert!(world.mob(nectar).expect("drop").flags.to_delete);
    }

    #[test]
    fn flowered_pikmin_skip_maturity_drops() {
        let mut world = world(DropTypeInfo::default());
        let nectar = spawn(&mut world, "Nectar");
        let pikmin = spawn(&mut world, "Red Pikmin");
        world
            .mob_mut(pikmin)
            .and_then(Mob::pikmin_mut)
            .expect("pikmin")
            .maturity = 2;

        world.run_event(nectar, MobEvent::TouchedObject, &EventPayload::Mob(pikmin));

        assert_eq!(world.mob(pikmin).and_then(Mob::state_name), Some("idling"));
        assert_eq!(world.mob(nectar).and_then(Mob::state_name), Some("idling"));
    }

    #[test]
    fn leader_drops_ignore_pikmin() {
        let mut world = world(DropTypeInfo {
            consumer: DropConsumer::Leaders,
            effect: DropEffect::GiveStatus,
            status_to_give: Some("ultra_spicy".to_string()),
            ..DropTypeInfo::default()
        });
        let nectar = spawn(&mut world, "Nectar");
        let pikmin = spawn(&mut world, "Red Pikmin");
        world.run_event(nectar, MobEvent::TouchedObject, &EventPayload::Mob(pikmin));
        assert_eq!(world.mob(pikmin).and_then(Mob::state_name), Some("idling"));
    }
}
