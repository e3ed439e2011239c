//! Headless driver: spawns a scenario into a world and steps it frame by
//! frame, handing leader orders to the leaders as input events.

use std::collections::BTreeMap;

use engine::mob::deg_to_rad;
use engine::{EventPayload, MobEvent, MobId, MobWorld, Vec2};
use tracing::{debug, info, warn};

use crate::categories::CategoryManager;
use crate::scenario::{LeaderOrder, Scenario, ScheduledOrder};

pub const FRAME_DT: f32 = 1.0 / 30.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    pub frames: u32,
    pub mobs: usize,
    /// Mob count per `type name/state name`.
    pub states: BTreeMap<String, usize>,
}

pub struct Demo {
    world: MobWorld,
    categories: CategoryManager,
    spawned: Vec<Option<MobId>>,
    orders: Vec<ScheduledOrder>,
    next_order: usize,
    frame: u32,
}

impl Demo {
    pub fn new(mut world: MobWorld, mut categories: CategoryManager, scenario: &Scenario) -> Self {
        let spawned = scenario
            .spawns
            .iter()
            .map(|spawn| {
                let id = categories.create_mob(
                    &mut world,
                    spawn.position,
                    &spawn.mob_type,
                    deg_to_rad(spawn.angle_deg),
                );
                if id.is_none() {
                    warn!(mob_type = %spawn.mob_type, "scenario_spawn_skipped");
                }
                id
            })
            .collect();

        let mut orders = scenario.orders.clone();
        orders.sort_by_key(|order| order.frame);

        Self {
            world,
            categories,
            spawned,
            orders,
            next_order: 0,
            frame: 0,
        }
    }

    pub fn world(&self) -> &MobWorld {
        &self.world
    }

    pub fn categories(&self) -> &CategoryManager {
        &self.categories
    }

    pub fn spawned(&self, index: usize) -> Option<MobId> {
        self.spawned.get(index).copied().flatten()
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Gives this frame's orders, then ticks the world once.
    pub fn step(&mut self) {
        while let Some(scheduled) = self
            .orders
            .get(self.next_order)
            .filter(|scheduled| scheduled.frame <= self.frame)
            .cloned()
        {
            self.next_order += 1;
            self.give_order(&scheduled);
        }

        self.world.tick(FRAME_DT);
        self.categories.forget_deleted(&self.world);
        self.frame += 1;
    }

    pub fn run(&mut self, frames: u32) -> DemoSummary {
        for _ in 0..frames {
            self.step();
        }
        let summary = self.summary();
        info!(
            frames = summary.frames,
            mobs = summary.mobs,
            states = ?summary.states,
            "demo_finished"
        );
        summary
    }

    pub fn summary(&self) -> DemoSummary {
        let mut states = BTreeMap::new();
        for mob in self.world.mobs() {
            let key = format!(
                "{}/{}",
                mob.mob_type.name,
                mob.state_name().unwrap_or("-")
            );
            *states.entry(key).or_insert(0) += 1;
        }
        DemoSummary {
            frames: self.frame,
            mobs: self.world.mob_count(),
            states,
        }
    }

    fn give_order(&mut self, scheduled: &ScheduledOrder) {
        let Some(leader) = self.spawned(scheduled.leader) else {
            return;
        };
        let (event, payload) = match scheduled.order {
            LeaderOrder::Activate => (MobEvent::LeaderActivated, EventPayload::None),
            LeaderOrder::Deactivate => (MobEvent::LeaderInactivated, EventPayload::None),
            LeaderOrder::MoveTo { to } => (MobEvent::LeaderMoveStart, EventPayload::Point(to)),
            LeaderOrder::Stop => (MobEvent::LeaderMoveEnd, EventPayload::None),
            LeaderOrder::StartWhistle => (MobEvent::LeaderStartWhistle, EventPayload::None),
            LeaderOrder::StopWhistle => (MobEvent::LeaderStopWhistle, EventPayload::None),
            LeaderOrder::Grab { target } => {
                let Some(target) = self.spawned(target) else {
                    return;
                };
                (MobEvent::LeaderHolding, EventPayload::Mob(target))
            }
            LeaderOrder::Throw { to } => (MobEvent::LeaderThrow, EventPayload::Point(to)),
            LeaderOrder::Release => (MobEvent::ReleaseOrder, EventPayload::None),
            LeaderOrder::Dismiss => (MobEvent::LeaderDismiss, EventPayload::None),
        };
        debug!(frame = self.frame, leader = leader.0, order = ?scheduled.order, "leader_order");
        self.world.run_event(leader, event, &payload);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::{ContentCatalog, Mob, MobCategoryId, MobType, MobTypeDatabase};

    use super::*;
    use crate::fsms;
    use crate::scenario::ScenarioSpawn;

    fn demo(scenario: &Scenario) -> Demo {
        let mut categories = CategoryManager::with_builtin_categories();
        let mut types = MobTypeDatabase::default();
        for (name, category) in [
            ("Olimar", MobCategoryId::Leaders),
            ("Red Pikmin", MobCategoryId::Pikmin),
        ] {
            let mut mob_type = MobType::new(name, category);
            fsms::create_category_fsm(&mut mob_type);
            let mob_type = Arc::new(mob_type);
            categories.register_type(Arc::clone(&mob_type));
            types.insert(mob_type);
        }
        let world = MobWorld::new(types, Arc::new(ContentCatalog::default()), 3);
        Demo::new(world, categories, scenario)
    }

    fn spawn(mob_type: &str, x: f32) -> ScenarioSpawn {
        ScenarioSpawn {
            mob_type: mob_type.to_string(),
            position: Vec2::new(x, 0.0),
            angle_deg: 0.0,
        }
    }

    fn order(frame: u32, order: LeaderOrder) -> ScheduledOrder {
        ScheduledOrder {
            frame,
            leader: 0,
            order,
        }
    }

    #[test]
    fn whistled_pikmin_end_up_in_the_group() {
        let scenario = Scenario {
            spawns: vec![spawn("Olimar", 0.0), spawn("Red Pikmin", 30.0)],
            orders: vec![
                order(1, LeaderOrder::StartWhistle),
                order(0, LeaderOrder::Activate),
            ],
        };
        let mut demo = demo(&scenario);
        let leader = demo.spawned(0).expect("leader");
        let pikmin = demo.spawned(1).expect("pikmin");

        demo.step();
        assert_eq!(demo.world().mob(leader).and_then(Mob::state_name), Some("active"));
        demo.step();
        assert_eq!(
            demo.world().mob(leader).and_then(Mob::state_name),
            Some("whistling")
        );

        let summary = demo.run(90);
        assert_eq!(summary.frames, 92);
        assert_eq!(demo.world().mob(pikmin).expect("pikmin").following_group, Some(leader));
        assert!(demo.world().mob(leader).expect("leader").group.contains(&pikmin));
    }

    #[test]
    fn unknown_types_are_skipped_and_their_orders_ignored() {
        let scenario = Scenario {
            spawns: vec![spawn("Louie", 0.0), spawn("Red Pikmin", 10.0)],
            orders: vec![order(0, LeaderOrder::Activate)],
        };
        let mut demo = demo(&scenario);
        assert_eq!(demo.spawned(0), None);
        assert!(demo.spawned(1).is_some());

        let summary = demo.run(3);
        assert_eq!(summary.mobs, 1);
        assert_eq!(summary.states.get("Red Pikmin/idling"), Some(&1));
        assert_eq!(
            demo.categories()
                .get(MobCategoryId::Pikmin)
                .expect("category")
                .mobs()
                .len(),
            1
        );
    }
}
