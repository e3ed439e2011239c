//! The Pikmin state machine. Every state a Pikmin can be in is declared
//! here, wired to the handlers in `actions`.
//!
//! States ending in `_h` are twins of the plain ones for a Pikmin holding a
//! tool. They react to `ReleaseOrder` by dropping it and falling back to the
//! plain twin.

mod actions;

use engine::fsm::{gen_mob, FsmBuilder};
use engine::{MobEvent, MobType};

pub const SEED: usize = 0;
pub const SPROUT: usize = 1;
pub const PLUCKING: usize = 2;
pub const PLUCKING_THROWN: usize = 3;
pub const LEAVING_ONION: usize = 4;
pub const ENTERING_ONION: usize = 5;
pub const IN_GROUP_CHASING: usize = 6;
pub const IN_GROUP_STOPPED: usize = 7;
pub const SWARM_CHASING: usize = 8;
pub const SWARM_STOPPED: usize = 9;
pub const GRABBED_BY_LEADER: usize = 10;
pub const THROWN: usize = 11;
pub const MOB_LANDING: usize = 12;
pub const GOING_TO_DISMISS_SPOT: usize = 13;
pub const IDLING: usize = 14;
pub const CALLED: usize = 15;
pub const GOING_TO_OPPONENT: usize = 16;
pub const CIRCLING_OPPONENT: usize = 17;
pub const GOING_TO_CARRIABLE_OBJECT: usize = 18;
pub const GOING_TO_TOOL: usize = 19;
pub const GOING_TO_GROUP_TASK: usize = 20;
pub const GOING_TO_ONION: usize = 21;
pub const SIGHING: usize = 22;
pub const CARRYING: usize = 23;
pub const PICKING_UP: usize = 24;
pub const ON_GROUP_TASK: usize = 25;
pub const RETURNING: usize = 26;
pub const ATTACKING_GROUNDED: usize = 27;
pub const ATTACKING_LATCHED: usize = 28;
pub const GRABBED_BY_ENEMY: usize = 29;
pub const KNOCKED_BACK: usize = 30;
pub const KNOCKED_DOWN: usize = 31;
pub const GETTING_UP: usize = 32;
pub const IMPACT_BOUNCE: usize = 33;
pub const IMPACT_LUNGE: usize = 34;
pub const HELPLESS: usize = 35;
pub const FLAILING: usize = 36;
pub const PANICKING: usize = 37;
pub const DRINKING: usize = 38;
pub const CELEBRATING: usize = 39;
pub const IN_GROUP_CHASING_H: usize = 40;
pub const IN_GROUP_STOPPED_H: usize = 41;
pub const SWARM_CHASING_H: usize = 42;
pub const SWARM_STOPPED_H: usize = 43;
pub const GRABBED_BY_LEADER_H: usize = 44;
pub const THROWN_H: usize = 45;
pub const GOING_TO_DISMISS_SPOT_H: usize = 46;
pub const IDLING_H: usize = 47;
pub const CALLED_H: usize = 48;
pub const RIDING_TRACK: usize = 49;
pub const CRUSHED: usize = 50;
pub const KNOCKED_DOWN_DYING: usize = 51;
pub const DYING: usize = 52;
pub const N_STATES: usize = 53;

pub fn create_fsm(mob_type: &mut MobType) {
    let mut efc = FsmBuilder::new();

    efc.new_state("seed", SEED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::become_sprout);
    efc.run(actions::start_seed_particles);
    efc.new_event(MobEvent::Landed);
    efc.run(actions::seed_landed);
    efc.change_state("sprout");

    efc.new_state("sprout", SPROUT);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::become_sprout);
    efc.run(actions::sprout_schedule_evol);
    efc.new_event(MobEvent::Plucked);
    efc.change_state("plucking");
    efc.new_event(MobEvent::Timer);
    efc.run(actions::sprout_evolve);
    efc.run(actions::sprout_schedule_evol);

    efc.new_state("plucking", PLUCKING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::begin_pluck);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("plucking_thrown");

    efc.new_state("plucking_thrown", PLUCKING_THROWN);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::be_thrown_after_pluck);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::stop_being_thrown);
    efc.new_event(MobEvent::Landed);
    efc.run(actions::land_after_pluck);
    efc.new_event(MobEvent::TouchedHazard);
    efc.run(actions::touched_hazard);
    efc.new_event(MobEvent::LeftHazard);
    efc.run(actions::left_hazard);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);

    efc.new_state("leaving_onion", LEAVING_ONION);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::leave_onion);
    efc.new_event(MobEvent::OnTick);
    efc.run(actions::tick_track_ride);

    efc.new_state("entering_onion", ENTERING_ONION);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::enter_onion);
    efc.new_event(MobEvent::OnTick);
    efc.run(actions::tick_entering_onion);

    efc.new_state("in_group_chasing", IN_GROUP_CHASING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_chasing_leader);
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader");
    efc.new_event(MobEvent::GoToOnion);
    efc.change_state("going_to_onion");
    efc.new_event(MobEvent::SpotIsFar);
    efc.run(actions::update_in_group_chasing);
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("in_group_stopped");
    efc.new_event(MobEvent::SwarmStarted);
    efc.change_state("swarm_chasing");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    efc.new_event(MobEvent::TouchedBouncer);
    efc.run(actions::be_thrown_by_bouncer);
    efc.change_state("thrown");
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("in_group_stopped", IN_GROUP_STOPPED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stop_in_group);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::clear_boredom_data);
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader");
    efc.new_event(MobEvent::GoToOnion);
    efc.change_state("going_to_onion");
    efc.new_event(MobEvent::SpotIsFar);
    efc.change_state("in_group_chasing");
    efc.new_event(MobEvent::SwarmStarted);
    efc.change_state("swarm_chasing");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot");
    efc.new_event(MobEvent::Timer);
    efc.run(actions::start_boredom_anim);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::check_boredom_anim_end);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("swarm_chasing", SWARM_CHASING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::set_swarm_reach);
    efc.run(actions::start_chasing_leader);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::set_idle_task_reach);
    efc.new_event(MobEvent::OnTick);
    efc.run(actions::update_in_group_chasing);
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader");
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("swarm_stopped");
    efc.new_event(MobEvent::SwarmEnded);
    efc.change_state("in_group_chasing");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::OpponentInReach);
    efc.run(actions::go_to_opponent);
    efc.new_event(MobEvent::NearCarriableObject);
    efc.change_state("going_to_carriable_object");
    efc.new_event(MobEvent::NearTool);
    efc.run(actions::go_to_tool);
    efc.new_event(MobEvent::NearGroupTask);
    efc.run(actions::go_to_group_task);
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    efc.new_event(MobEvent::TouchedTrack);
    efc.change_state("riding_track");
    efc.new_event(MobEvent::TouchedBouncer);
    efc.run(actions::be_thrown_by_bouncer);
    efc.change_state("thrown");
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("swarm_stopped", SWARM_STOPPED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::set_swarm_reach);
    efc.run(actions::stop_in_group);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::set_idle_task_reach);
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader");
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("swarm_stopped");
    efc.new_event(MobEvent::SpotIsFar);
    efc.change_state("swarm_chasing");
    efc.new_event(MobEvent::SwarmEnded);
    efc.change_state("in_group_chasing");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::OpponentInReach);
    efc.run(actions::go_to_opponent);
    efc.new_event(MobEvent::NearCarriableObject);
    efc.change_state("going_to_carriable_object");
    efc.new_event(MobEvent::NearTool);
    efc.run(actions::go_to_tool);
    efc.new_event(MobEvent::NearGroupTask);
    efc.run(actions::go_to_group_task);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("grabbed_by_leader", GRABBED_BY_LEADER);
    efc.new_event(MobEvent::Thrown);
    efc.run(actions::be_thrown);
    efc.change_state("thrown");
    efc.new_event(MobEvent::Released);
    efc.run(actions::be_released);
    efc.change_state("in_group_chasing");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::notify_leader_release);
    efc.run(actions::be_released);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::notify_leader_release);
    efc.run(actions::be_released);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("thrown", THROWN);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::stop_being_thrown);
    efc.new_event(MobEvent::Landed);
    efc.run(actions::land);
    efc.run(actions::set_bump_lock);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchAN);
    efc.run(actions::check_outgoing_attack);
    efc.run(actions::land_on_mob);
    efc.new_event(MobEvent::HitboxTouchNN);
    efc.run(actions::land_on_mob);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::TouchedBouncer);
    efc.run(actions::be_thrown_by_bouncer);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    hazard_handlers(&mut efc);

    efc.new_state("mob_landing", MOB_LANDING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_mob_landing);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_mob_landing);
    efc.new_event(MobEvent::HitboxTouchAN);
    efc.run(actions::check_outgoing_attack);
    efc.new_event(MobEvent::HitboxTouchNA);
    efc.run(actions::check_incoming_attack);
    efc.new_event(MobEvent::PikminDamageConfirmed);
    efc.run(actions::unlatch);
    efc.change_state("knocked_back");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    hazard_handlers(&mut efc);

    efc.new_state("going_to_dismiss_spot", GOING_TO_DISMISS_SPOT);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::going_to_dismiss_spot);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::clear_timer);
    efc.new_event(MobEvent::ReachedDestination);
    efc.run(actions::reach_dismiss_spot);
    efc.run(actions::set_bump_lock);
    efc.change_state("idling");
    efc.new_event(MobEvent::Timer);
    efc.run(actions::reach_dismiss_spot);
    efc.run(actions::set_bump_lock);
    efc.change_state("idling");
    efc.new_event(MobEvent::OpponentInReach);
    efc.run(actions::go_to_opponent);
    efc.new_event(MobEvent::NearCarriableObject);
    efc.change_state("going_to_carriable_object");
    efc.new_event(MobEvent::NearTool);
    efc.run(actions::go_to_tool);
    efc.new_event(MobEvent::NearGroupTask);
    efc.run(actions::go_to_group_task);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    efc.new_event(MobEvent::TouchedTrack);
    efc.change_state("riding_track");
    efc.new_event(MobEvent::TouchedBouncer);
    efc.run(actions::be_thrown_by_bouncer);
    efc.change_state("thrown");
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("idling", IDLING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::become_idle);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::clear_boredom_data);
    efc.run(actions::stop_being_idle);
    efc.new_event(MobEvent::OpponentInReach);
    efc.run(actions::go_to_opponent);
    efc.new_event(MobEvent::NearCarriableObject);
    efc.change_state("going_to_carriable_object");
    efc.new_event(MobEvent::NearTool);
    efc.run(actions::go_to_tool);
    efc.new_event(MobEvent::NearGroupTask);
    efc.run(actions::go_to_group_task);
    efc.new_event(MobEvent::TouchedTrack);
    efc.change_state("riding_track");
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::TouchedActiveLeader);
    efc.run(actions::check_leader_bump);
    efc.new_event(MobEvent::Timer);
    efc.run(actions::start_boredom_anim);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::check_boredom_anim_end);
    efc.run(actions::check_shaking_anim_end);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::TouchedDrop);
    efc.change_state("drinking");
    efc.new_event(MobEvent::TouchedBouncer);
    efc.run(actions::be_thrown_by_bouncer);
    efc.change_state("thrown");
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("called", CALLED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::called);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_called_anim);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("going_to_opponent", GOING_TO_OPPONENT);
    efc.new_event(MobEvent::ReachedDestination);
    efc.run(actions::decide_attack);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::FocusOffReach);
    efc.change_state("idling");
    efc.new_event(MobEvent::FocusDied);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("circling_opponent", CIRCLING_OPPONENT);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::circle_opponent);
    efc.new_event(MobEvent::Timer);
    efc.run(actions::decide_attack);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::FocusOffReach);
    efc.change_state("idling");
    efc.new_event(MobEvent::FocusDied);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("going_to_carriable_object", GOING_TO_CARRIABLE_OBJECT);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::go_to_carriable_object);
    efc.new_event(MobEvent::ReachedDestination);
    efc.run(actions::reach_carriable_object);
    efc.change_state("carrying");
    efc.new_event(MobEvent::FocusedMobUnavailable);
    efc.run(actions::forget_carriable_object);
    efc.change_state("idling");
    efc.new_event(MobEvent::Timer);
    efc.run(actions::forget_carriable_object);
    efc.change_state("sighing");
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::forget_carriable_object);
    efc.change_state("called");
    efc.new_event(MobEvent::HitboxTouchNA);
    efc.run(actions::check_incoming_attack);
    efc.new_event(MobEvent::PikminDamageConfirmed);
    efc.run(actions::forget_carriable_object);
    efc.change_state("knocked_back");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::forget_carriable_object);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::forget_carriable_object);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    hazard_handlers(&mut efc);

    efc.new_state("going_to_tool", GOING_TO_TOOL);
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("picking_up");
    efc.new_event(MobEvent::Timer);
    efc.run(actions::forget_tool);
    efc.change_state("sighing");
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::forget_tool);
    efc.change_state("called");
    efc.new_event(MobEvent::HitboxTouchNA);
    efc.run(actions::check_incoming_attack);
    efc.new_event(MobEvent::PikminDamageConfirmed);
    efc.run(actions::forget_tool);
    efc.change_state("knocked_back");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::forget_tool);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::forget_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    hazard_handlers(&mut efc);

    efc.new_state("going_to_group_task", GOING_TO_GROUP_TASK);
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("on_group_task");
    efc.new_event(MobEvent::Timer);
    efc.run(actions::forget_group_task);
    efc.change_state("sighing");
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::forget_group_task);
    efc.change_state("called");
    efc.new_event(MobEvent::FocusedMobUnavailable);
    efc.run(actions::forget_group_task);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchNA);
    efc.run(actions::check_incoming_attack);
    efc.new_event(MobEvent::PikminDamageConfirmed);
    efc.run(actions::forget_group_task);
    efc.change_state("knocked_back");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::forget_group_task);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::forget_group_task);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    hazard_handlers(&mut efc);

    efc.new_state("going_to_onion", GOING_TO_ONION);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::go_to_onion);
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("entering_onion");
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("sighing", SIGHING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::sigh);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("idling");
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::TouchedActiveLeader);
    efc.run(actions::check_leader_bump);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("carrying", CARRYING);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::stop_carrying);
    efc.run(actions::stand_still);
    efc.new_event(MobEvent::OnTick);
    efc.run(actions::tick_carrying);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::FinishedTask);
    efc.run(actions::finish_carrying);
    efc.new_event(MobEvent::FocusedMobUnavailable);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("picking_up", PICKING_UP);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_picking_up);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_picking_up);
    efc.new_event(MobEvent::TouchedHazard);
    efc.run(actions::touched_hazard);
    efc.new_event(MobEvent::LeftHazard);
    efc.run(actions::left_hazard);

    efc.new_state("on_group_task", ON_GROUP_TASK);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::work_on_group_task);
    efc.new_event(MobEvent::OnTick);
    efc.run(actions::tick_group_task_work);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::forget_group_task);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::FocusedMobUnavailable);
    efc.change_state("idling");
    efc.new_event(MobEvent::FinishedTask);
    efc.change_state("celebrating");
    efc.new_event(MobEvent::HitboxTouchAN);
    efc.run(actions::check_outgoing_attack);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("returning", RETURNING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_returning);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::stand_still);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("attacking_grounded", ATTACKING_GROUNDED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::prepare_to_attack);
    efc.new_event(MobEvent::FocusOffReach);
    efc.change_state("idling");
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::rechase_opponent);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::HitboxTouchAN);
    efc.run(actions::check_outgoing_attack);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("attacking_latched", ATTACKING_LATCHED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::prepare_to_attack);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::unlatch);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::FocusDied);
    efc.run(actions::lose_latched_mob);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchAN);
    efc.run(actions::check_outgoing_attack);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("grabbed_by_enemy", GRABBED_BY_ENEMY);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::be_grabbed_by_enemy);
    efc.new_event(MobEvent::Released);
    efc.run(actions::be_released);
    efc.change_state("idling");
    efc.new_event(MobEvent::Swallowed);
    efc.run(actions::start_dying);
    efc.run(actions::finish_dying);

    efc.new_state("knocked_back", KNOCKED_BACK);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::be_attacked);
    efc.run(actions::get_knocked_back);
    efc.new_event(MobEvent::Landed);
    efc.change_state("knocked_down");
    efc.new_event(MobEvent::TouchedBouncer);
    efc.run(actions::be_thrown_by_bouncer);
    efc.change_state("thrown");
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    hazard_handlers(&mut efc);

    efc.new_state("knocked_down", KNOCKED_DOWN);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::get_knocked_down);
    efc.new_event(MobEvent::Timer);
    efc.change_state("getting_up");
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::called_while_knocked_down);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("knocked_down_dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("getting_up", GETTING_UP);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_getting_up);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_getting_up);
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::called_while_knocked_down);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("impact_bounce", IMPACT_BOUNCE);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::do_impact_bounce);
    efc.new_event(MobEvent::Landed);
    efc.run(actions::land_after_impact_bounce);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    hazard_handlers(&mut efc);

    efc.new_state("impact_lunge", IMPACT_LUNGE);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_impact_lunge);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("impact_bounce");
    efc.new_event(MobEvent::HitboxTouchAN);
    efc.run(actions::check_outgoing_attack);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    hazard_handlers(&mut efc);

    efc.new_state("helpless", HELPLESS);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::notify_leader_release);
    efc.run(actions::be_released);
    efc.run(actions::release_tool);
    efc.run(actions::stand_still);
    efc.run(actions::become_helpless);
    efc.new_event(MobEvent::LeftHazard);
    efc.run(actions::left_hazard);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("flailing", FLAILING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::notify_leader_release);
    efc.run(actions::be_released);
    efc.run(actions::release_tool);
    efc.run(actions::start_flailing);
    efc.new_event(MobEvent::Timer);
    efc.run(actions::stand_still);
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::flail_to_leader);
    efc.new_event(MobEvent::LeftHazard);
    efc.run(actions::left_hazard);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("panicking", PANICKING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::unlatch);
    efc.run(actions::notify_leader_release);
    efc.run(actions::be_released);
    efc.run(actions::release_tool);
    efc.run(actions::start_panicking);
    efc.new_event(MobEvent::Timer);
    efc.run(actions::panic_new_chase);
    efc.new_event(MobEvent::LeftHazard);
    efc.run(actions::left_hazard);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("drinking", DRINKING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_drinking);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::finish_drinking);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("idling");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("celebrating", CELEBRATING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::celebrate);
    efc.new_event(MobEvent::AnimationEnd);
    efc.change_state("idling");
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called");
    efc.new_event(MobEvent::TouchedActiveLeader);
    efc.run(actions::check_leader_bump);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("in_group_chasing_h", IN_GROUP_CHASING_H);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_chasing_leader);
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("in_group_chasing");
    efc.new_event(MobEvent::GoToOnion);
    efc.change_state("going_to_onion");
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader_h");
    efc.new_event(MobEvent::SpotIsFar);
    efc.run(actions::update_in_group_chasing);
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("in_group_stopped_h");
    efc.new_event(MobEvent::SwarmStarted);
    efc.change_state("swarm_chasing_h");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot_h");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("in_group_stopped_h", IN_GROUP_STOPPED_H);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stop_in_group);
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("in_group_stopped");
    efc.new_event(MobEvent::GoToOnion);
    efc.change_state("going_to_onion");
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader_h");
    efc.new_event(MobEvent::SpotIsFar);
    efc.change_state("in_group_chasing_h");
    efc.new_event(MobEvent::SwarmStarted);
    efc.change_state("swarm_chasing_h");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot_h");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("swarm_chasing_h", SWARM_CHASING_H);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::set_swarm_reach);
    efc.run(actions::start_chasing_leader);
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("swarm_chasing");
    efc.new_event(MobEvent::GoToOnion);
    efc.change_state("going_to_onion");
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::set_idle_task_reach);
    efc.new_event(MobEvent::OnTick);
    efc.run(actions::update_in_group_chasing);
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader_h");
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("swarm_stopped_h");
    efc.new_event(MobEvent::SwarmEnded);
    efc.change_state("in_group_chasing_h");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot_h");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("swarm_stopped_h", SWARM_STOPPED_H);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::set_swarm_reach);
    efc.run(actions::stop_in_group);
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("swarm_stopped");
    efc.new_event(MobEvent::GoToOnion);
    efc.change_state("going_to_onion");
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::set_idle_task_reach);
    efc.new_event(MobEvent::GrabbedByFriend);
    efc.run(actions::be_grabbed_by_friend);
    efc.change_state("grabbed_by_leader_h");
    efc.new_event(MobEvent::ReachedDestination);
    efc.change_state("swarm_stopped_h");
    efc.new_event(MobEvent::SpotIsFar);
    efc.change_state("swarm_chasing_h");
    efc.new_event(MobEvent::SwarmEnded);
    efc.change_state("in_group_chasing_h");
    efc.new_event(MobEvent::Dismissed);
    efc.run(actions::be_dismissed);
    efc.change_state("going_to_dismiss_spot_h");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("grabbed_by_leader_h", GRABBED_BY_LEADER_H);
    efc.new_event(MobEvent::Thrown);
    efc.run(actions::be_thrown);
    efc.change_state("thrown_h");
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("grabbed_by_leader");
    efc.new_event(MobEvent::Released);
    efc.change_state("in_group_chasing_h");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::notify_leader_release);
    efc.run(actions::be_released);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::notify_leader_release);
    efc.run(actions::be_released);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("thrown_h", THROWN_H);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::stop_being_thrown);
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("thrown");
    efc.new_event(MobEvent::Landed);
    efc.run(actions::land_while_holding);
    efc.new_event(MobEvent::HitboxTouchAN);
    efc.run(actions::land_on_mob_while_holding);
    efc.new_event(MobEvent::HitboxTouchNN);
    efc.run(actions::land_on_mob_while_holding);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    hazard_handlers(&mut efc);

    efc.new_state("going_to_dismiss_spot_h", GOING_TO_DISMISS_SPOT_H);
    efc.new_event(MobEvent::Whistled);
    efc.change_state("called_h");
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("going_to_dismiss_spot");
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::going_to_dismiss_spot);
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::clear_timer);
    efc.new_event(MobEvent::ReachedDestination);
    efc.run(actions::reach_dismiss_spot);
    efc.run(actions::set_bump_lock);
    efc.change_state("idling_h");
    efc.new_event(MobEvent::Timer);
    efc.run(actions::reach_dismiss_spot);
    efc.change_state("idling_h");
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("idling_h", IDLING_H);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::become_idle);
    efc.new_event(MobEvent::ReleaseOrder);
    efc.run(actions::release_tool);
    efc.change_state("idling");
    efc.new_event(MobEvent::OnLeave);
    efc.run(actions::stop_being_idle);
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::whistled_while_holding);
    efc.new_event(MobEvent::TouchedActiveLeader);
    efc.run(actions::check_leader_bump);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::try_held_item_hotswap);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(actions::release_tool);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("called_h", CALLED_H);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::called);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_called_anim);
    efc.new_event(MobEvent::HitboxTouchEat);
    efc.run(actions::touched_eat_hitbox);
    efc.new_event(MobEvent::BottomlessPit);
    efc.run(gen_mob::fall_down_pit);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");
    attack_handlers(&mut efc);
    hazard_handlers(&mut efc);

    efc.new_state("riding_track", RIDING_TRACK);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::start_riding_track);
    efc.new_event(MobEvent::OnTick);
    efc.run(actions::tick_track_ride);
    efc.new_event(MobEvent::Whistled);
    efc.run(actions::whistled_while_riding);
    efc.new_event(MobEvent::ZeroHealth);
    efc.change_state("dying");

    efc.new_state("crushed", CRUSHED);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::be_crushed);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_dying);

    efc.new_state("knocked_down_dying", KNOCKED_DOWN_DYING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::start_knocked_down_dying);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_dying);

    efc.new_state("dying", DYING);
    efc.new_event(MobEvent::OnEnter);
    efc.run(actions::stand_still);
    efc.run(actions::start_dying);
    efc.new_event(MobEvent::AnimationEnd);
    efc.run(actions::finish_dying);

    super::install_states(mob_type, efc.finish(N_STATES), "idling", Some("dying"));
    mob_type.status_gain_hook = Some(actions::handle_status_gain);
}

fn attack_handlers(efc: &mut FsmBuilder) {
    efc.new_event(MobEvent::HitboxTouchNA);
    efc.run(actions::check_incoming_attack);
    efc.new_event(MobEvent::PikminDamageConfirmed);
    efc.change_state("knocked_back");
}

fn hazard_handlers(efc: &mut FsmBuilder) {
    efc.new_event(MobEvent::TouchedHazard);
    efc.run(actions::touched_hazard);
    efc.new_event(MobEvent::LeftHazard);
    efc.run(actions::left_hazard);
    efc.new_event(MobEvent::TouchedSpray);
    efc.run(actions::touched_spray);
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
