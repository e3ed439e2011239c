//! Group tasks (walls to push, gates to lift) gather Pikmin in spots and
//! finish once enough combined strength is working on them.

use engine::fsm::{self, FsmBuilder};
use engine::{EventPayload, Mob, MobEvent, MobId, MobType, MobWorld};
use tracing::{debug, info};

pub const WAITING: usize = 0;
pub const FINISHED: usize = 1;
pub const N_STATES: usize = 2;

pub const POWER_VAR: &str = "power";

pub fn create_fsm(mob_type: &mut MobType) {
    let mut efc = FsmBuilder::new();

    efc.new_state("waiting", WAITING);
    efc.new_event(MobEvent::WeightAdded);
    efc.run(add_worker_power);
    efc.new_event(MobEvent::WeightRemoved);
    efc.run(remove_worker_power);

    efc.new_state("finished", FINISHED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(dismiss_workers);

    super::install_states(mob_type, efc.finish(N_STATES), "waiting", None);
}

fn worker_strength(world: &MobWorld, worker: MobId) -> f32 {
    world
        .mob(worker)
        .and_then(|mob| mob.mob_type.pikmin_info())
        .map_or(1.0, |info| info.carry_strength)
}

fn set_power(world: &mut MobWorld, id: MobId, delta: f32) -> Option<f32> {
    let power = {
        let state = world.mob_mut(id).and_then(Mob::group_task_mut)?;
        state.power = (state.power + delta).max(0.0);
        state.power
    };
    if let Some(mob) = world.mob_mut(id) {
        mob.set_var(POWER_VAR, power.to_string());
    }
    Some(power)
}

fn add_worker_power(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(worker) = payload.mob() else {
        return;
    };
    let strength = worker_strength(world, worker);
    let Some(power) = set_power(world, id, strength) else {
        return;
    };
    let goal = world
        .mob(id)
        .and_then(|mob| mob.mob_type.group_task_info())
        .map_or(f32::MAX, |info| info.power_goal);
    debug!(mob = id.0, worker = worker.0, power, goal, "group_task_worker_added");

    let already_ran = world
        .mob(id)
        .and_then(Mob::group_task)
        .map_or(true, |state| state.ran_task_finished_code);
    if power < goal || already_ran {
        return;
    }
    if let Some(state) = world.mob_mut(id).and_then(Mob::group_task_mut) {
        state.ran_task_finished_code = true;
    }
    info!(mob = id.0, power, "group_task_finished");
    fsm::set_state(world, id, FINISHED, &EventPayload::None);
}

fn remove_worker_power(world: &mut MobWorld, id: MobId, payload: &EventPayload) {
    let Some(worker) = payload.mob() else {
        return;
    };
    let strength = worker_strength(world, worker);
    if let Some(power) = set_power(world, id, -strength) {
        debug!(mob = id.0, worker = worker.0, power, "group_task_worker_removed");
    }
}

/// Tells every Pikmin still at a spot that the job is done.
fn dismiss_workers(world: &mut MobWorld, id: MobId, _payload: &EventPayload) {
    let workers: Vec<MobId> = world
        .mob(id)
        .and_then(Mob::group_task)
        .map(|state| state.spots.iter().filter_map(|spot| spot.pikmin).collect())
        .unwrap_or_default();
    for worker in workers {
        world.run_event(worker, MobEvent::FinishedTask, &EventPayload::None);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::mob::{GroupTaskTypeInfo, MobCategoryId, MobTypeInfo};
    use engine::{ContentCatalog, MobTypeDatabase, Vec2};

    use super::*;
    use crate::fsms::pikmin;

    fn world() -> (MobWorld, MobId, Vec<MobId>) {
        let mut gate = MobType::new("Gate", MobCategoryId::GroupTasks);
        gate.info = MobTypeInfo::GroupTask(GroupTaskTypeInfo {
            power_goal: 2.0,
            ..GroupTaskTypeInfo::default()
        });
        create_fsm(&mut gate);
        let mut pikmin_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
        pikmin::create_fsm(&mut pikmin_type);
        let types = MobTypeDatabase::from_types(vec![Arc::new(gate), Arc::new(pikmin_type)]);
        let mut world = MobWorld::new(types, Arc::new(ContentCatalog::default()), 6);
        let gate_type = Arc::clone(world.types().by_name("Gate").expect("type"));
        let gate = world.create_mob(Vec2::ZERO, gate_type, 0.0, &[]);
        let workers = (0..2)
            .map(|idx| {
                let pikmin_type = Arc::clone(world.types().by_name("Red Pikmin").expect("type"));
                world.create_mob(Vec2::new(-40.0, idx as f32 * 15.0), pikmin_type, 0.0, &[])
            })
            .collect();
        (world, gate, workers)
    }

    fn start_working(world: &mut MobWorld, gate: MobId, worker: MobId) {
        world.run_event(worker, MobEvent::NearGroupTask, &EventPayload::Mob(gate));
        assert_eq!(
            world.mob(worker).and_then(Mob::state_name),
            Some("going_to_group_task")
        );
        world.run_event(worker, MobEvent::ReachedDestination, &EventPayload::None);
    }

    #[test]
    fn reaching_the_goal_finishes_the_task_once() {
        let (mut world, gate, workers) = world();

        start_working(&mut world, gate, workers[0]);
        assert_eq!(world.mob(workers[0]).and_then(Mob::state_name), Some("on_group_task"));
        assert_eq!(world.mob(gate).expect("gate").var(POWER_VAR), "1");

        start_working(&mut world, gate, workers[1]);
        let task = world.mob(gate).expect("gate");
        assert_eq!(task.state_name(), Some("finished"));
        assert!(task.group_task().expect("task").ran_task_finished_code);
        for worker in &workers {
            assert_eq!(world.mob(*worker).and_then(Mob::state_name), Some("celebrating"));
        }
    }

    #[test]
    fn leaving_workers_take_their_strength_with_them() {
        let (mut world, gate, workers) = world();
        let leader_type = Arc::new(MobType::new("Olimar", MobCategoryId::Leaders));
        let leader = world.create_mob(Vec2::ZERO, leader_type, 0.0, &[]);

        start_working(&mut world, gate, workers[0]);
        world.run_event(workers[0], MobEvent::Whistled, &EventPayload::Mob(leader));

        let task = world.mob(gate).expect("gate");
        assert_eq!(task.state_name(), Some("waiting"));
        assert_eq!(task.group_task().expect("task").power, 0.0);
        assert_eq!(task.group_task().expect("task").free_spot(), Some(0));
    }
}
