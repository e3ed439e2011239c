    use std::sync::Arc;

    use engine::fsm;
    use engine::mob::{
        DropTypeInfo, HitboxDef, HitboxKind, MobCategoryId, MobTypeInfo, StatusStateChange,
        StatusType, Team, ToolTypeInfo,
    };
    use engine::script::HitboxInteraction;
    use engine::{ContentCatalog, EventPayload, Mob, MobId, MobTypeDatabase, MobWorld, Vec2};

    use super::*;

    struct Field {
        world: MobWorld,
        pikmin: MobId,
        enemy: MobId,
        leader: MobId,
    }

    impl Field {
        fn new() -> Self {
            let mut catalog = ContentCatalog::default();
            let mut soaked = StatusType::new("soaked");
            soaked.state_change = StatusStateChange::Flailing;
            catalog.add_status_type(soaked);

            let mut pikmin_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
            pikmin_type.default_team = Team::Player1;
            create_fsm(&mut pikmin_type);

            let mut enemy_type = MobType::new("Bulborb", MobCategoryId::Enemies);
            enemy_type.default_team = Team::Enemy1;
            let mut jaw = HitboxDef::new("jaw", 20.0);
            jaw.kind = HitboxKind::Attack;
            jaw.value = 5.0;
            let mut shell = HitboxDef::new("shell", 20.0);
            shell.value = 0.0;
            enemy_type.hitboxes = vec![jaw, shell];

            let mut leader_type = MobType::new("Olimar", MobCategoryId::Leaders);
            leader_type.default_team = Team::Player1;

            let mut nectar_type = MobType::new("Nectar", MobCategoryId::Drops);
            nectar_type.info = MobTypeInfo::Drop(DropTypeInfo::default());

            let mut rock_type = MobType::new("Bomb Rock", MobCategoryId::Tools);
            rock_type.info = MobTypeInfo::Tool(ToolTypeInfo::default());

            let types = MobTypeDatabase::from_types(
                [pikmin_type, enemy_type, leader_type, nectar_type, rock_type]
                    .into_iter()
                    .map(Arc::new)
                    .collect(),
            );
            let mut world = MobWorld::new(types, Arc::new(catalog), 11);
            let pikmin = spawn(&mut world, "Red Pikmin", Vec2::ZERO);
            let enemy = spawn(&mut world, "Bulborb", Vec2::new(30.0, 0.0));
            let leader = spawn(&mut world, "Olimar", Vec2::new(-60.0, 0.0));
            Self {
                world,
                pikmin,
                enemy,
                leader,
            }
        }

        fn state(&self) -> Option<&str> {
            self.world.mob(self.pikmin).and_then(Mob::state_name)
        }

        fn pikmin(&self) -> &Mob {
            self.world.mob(self.pikmin).expect("pikmin")
        }

        fn event(&mut self, event: MobEvent, payload: EventPayload) {
            self.world.run_event(self.pikmin, event, &payload);
        }
    }

    fn spawn(world: &mut MobWorld, name: &str, pos: Vec2) -> MobId {
        let mob_type = Arc::clone(world.types().by_name(name).expect("type"));
        world.create_mob(pos, mob_type, 0.0, &[])
    }

    #[test]
    fn new_pikmin_start_idle() {
        let field = Field::new();
        assert_eq!(field.state(), Some("idling"));
        assert!(field.pikmin().pikmin().is_some());
    }

    #[test]
    fn whistled_pikmin_join_the_group_after_the_call_animation() {
        let mut field = Field::new();
        let leader = field.leader;

        field.event(MobEvent::Whistled, EventPayload::Mob(leader));
        assert_eq!(field.state(), Some("called"));
        assert_eq!(field.pikmin().focused_mob, Some(leader));

        field.event(MobEvent::AnimationEnd, EventPayload::None);
        assert_eq!(field.state(), Some("in_group_chasing"));
        assert_eq!(field.pikmin().following_group, Some(leader));
        assert!(field.pikmin().chase.is_some());
    }

    #[test]
    fn damaging_hits_knock_back_then_down() {
        let mut field = Field::new();
        let hit = HitboxInteraction {
            mob2: field.enemy,
            h1: 0,
            h2: 0,
        };

        field.event(MobEvent::HitboxTouchNA, EventPayload::Hitbox(hit));
        assert_eq!(field.state(), Some("knocked_back"));
        assert_eq!(field.pikmin().health, 95.0);
        assert!(field.pikmin().speed_z > 0.0);

        field.event(MobEvent::Landed, EventPayload::None);
        assert_eq!(field.state(), Some("knocked_down"));
        let lying = field.pikmin().script_timer.time_left;
        assert!(lying > 0.0);

        let leader = field.leader;
        field.event(MobEvent::Whistled, EventPayload::Mob(leader));
        assert_eq!(field.state(), Some("knocked_down"));
        assert!(field.pikmin().script_timer.time_left < lying);

        field.event(MobEvent::Whistled, EventPayload::Mob(leader));
        let after_second_whistle = field.pikmin().script_timer.time_left;
        assert!(after_second_whistle < lying);
        field.event(MobEvent::Whistled, EventPayload::Mob(leader));
        assert_eq!(field.pikmin().script_timer.time_left, after_second_whistle);
    }

    #[test]
    fn teammates_cannot_knock_pikmin_back() {
        let mut field = Field::new();
        field.world.mob_mut(field.enemy).expect("enemy").team = Team::Player1;
        let hit = HitboxInteraction {
            mob2: field.enemy,
            h1: 0,
            h2: 0,
        };
        field.event(MobEvent::HitboxTouchNA, EventPayload::Hitbox(hit));
        assert_eq!(field.state(), Some("idling"));
        assert_eq!(field.pikmin().health, 100.0);
    }

    #[test]
    fn too_many_dings_in_a_row_make_a_pikmin_sigh() {
        let mut field = Field::new();
        let (pikmin, enemy) = (field.pikmin, field.enemy);
        field.world.focus_on_mob(pikmin, enemy);
        fsm::set_state(&mut field.world, pikmin, ATTACKING_GROUNDED, &EventPayload::None);
        field
            .world
            .mob_mut(pikmin)
            .and_then(Mob::pikmin_mut)
            .expect("pikmin")
            .consecutive_dings = 3;

        let ding = HitboxInteraction {
            mob2: enemy,
            h1: 0,
            h2: 1,
        };
        field.event(MobEvent::HitboxTouchAN, EventPayload::Hitbox(ding));
        assert!(field.pikmin().pikmin().expect("pikmin").was_last_hit_ding);

        field.event(MobEvent::AnimationEnd, EventPayload::None);
        assert_eq!(field.state(), Some("sighing"));
        assert_eq!(field.pikmin().pikmin().expect("pikmin").consecutive_dings, 0);
    }

    #[test]
    fn real_hits_after_a_ding_still_count_toward_the_sigh() {
        let mut field = Field::new();
        let (pikmin, enemy) = (field.pikmin, field.enemy);
        field.world.focus_on_mob(pikmin, enemy);
        fsm::set_state(&mut field.world, pikmin, ATTACKING_GROUNDED, &EventPayload::None);
        field
            .world
            .mob_mut(pikmin)
            .and_then(Mob::pikmin_mut)
            .expect("pikmin")
            .consecutive_dings = 3;

        let ding = HitboxInteraction {
            mob2: enemy,
            h1: 0,
            h2: 1,
        };
        let hit = HitboxInteraction {
            mob2: enemy,
            h1: 0,
            h2: 0,
        };
        field.event(MobEvent::HitboxTouchAN, EventPayload::Hitbox(ding));
        field.event(MobEvent::HitboxTouchAN, EventPayload::Hitbox(hit));
        let state = field.pikmin().pikmin().expect("pikmin");
        assert!(state.was_last_hit_ding);
        assert_eq!(state.consecutive_dings, 3);

        field.event(MobEvent::AnimationEnd, EventPayload::None);
        assert_eq!(field.state(), Some("sighing"));
    }

    #[test]
    fn a_new_attack_clears_the_ding_mark() {
        let mut field = Field::new();
        let (pikmin, enemy) = (field.pikmin, field.enemy);
        field.world.focus_on_mob(pikmin, enemy);
        {
            let state = field
                .world
                .mob_mut(pikmin)
                .and_then(Mob::pikmin_mut)
                .expect("pikmin");
            state.was_last_hit_ding = true;
            state.consecutive_dings = 2;
        }

        fsm::set_state(&mut field.world, pikmin, ATTACKING_GROUNDED, &EventPayload::None);
        let state = field.pikmin().pikmin().expect("pikmin");
        assert!(!state.was_last_hit_ding);
        assert_eq!(state.consecutive_dings, 2);

        let leader = field.leader;
        field.event(MobEvent::Whistled, EventPayload::Mob(leader));
        assert_eq!(field.state(), Some("called"));
        assert_eq!(field.pikmin().pikmin().expect("pikmin").consecutive_dings, 0);
    }

    #[test]
    fn flailing_statuses_move_the_pikmin_into_flailing() {
        let mut field = Field::new();
        let pikmin = field.pikmin;
        field.world.receive_status(pikmin, "soaked");
        assert_eq!(field.state(), Some("flailing"));
        assert!(field.pikmin().has_status("soaked"));
    }

    #[test]
    fn sprouts_ignore_status_state_changes() {
        let mut field = Field::new();
        let pikmin = field.pikmin;
        fsm::set_state(&mut field.world, pikmin, SPROUT, &EventPayload::None);
        field.world.receive_status(pikmin, "soaked");
        assert_eq!(field.state(), Some("sprout"));
    }

    #[test]
    fn nectar_makes_the_pikmin_bloom() {
        let mut field = Field::new();
        let nectar = spawn(&mut field.world, "Nectar", Vec2::new(10.0, 0.0));

        field.event(MobEvent::TouchedDrop, EventPayload::Mob(nectar));
        assert_eq!(field.state(), Some("drinking"));
        assert_eq!(field.pikmin().focused_mob, Some(nectar));

        field.event(MobEvent::AnimationEnd, EventPayload::None);
        assert_eq!(field.state(), Some("idling"));
        assert_eq!(field.pikmin().pikmin().expect("pikmin").maturity, 2);
    }

    #[test]
    fn group_members_leave_the_group_to_drink() {
        let mut field = Field::new();
        let (pikmin, leader) = (field.pikmin, field.leader);
        field.world.add_to_group(leader, pikmin);
        fsm::set_state(&mut field.world, pikmin, IN_GROUP_CHASING, &EventPayload::None);
        let nectar = spawn(&mut field.world, "Nectar", Vec2::new(0.0, 10.0));

        field.event(MobEvent::TouchedDrop, EventPayload::Mob(nectar));
        assert_eq!(field.state(), Some("drinking"));
        assert_eq!(field.pikmin().following_group, None);
        assert!(!field.world.mob(leader).expect("leader").group.contains(&pikmin));
        assert!((field.pikmin().angle - std::f32::consts::FRAC_PI_2).abs() < 1e-4);

        field.event(MobEvent::AnimationEnd, EventPayload::None);
        assert_eq!(field.state(), Some("idling"));
    }

    #[test]
    fn release_order_while_holding_drops_the_tool_and_keeps_following() {
        let mut field = Field::new();
        let (pikmin, leader) = (field.pikmin, field.leader);
        let rock = spawn(&mut field.world, "Bomb Rock", Vec2::new(5.0, 0.0));
        field.world.add_to_group(leader, pikmin);
        field.world.hold(pikmin, rock);
        fsm::set_state(&mut field.world, pikmin, IN_GROUP_CHASING_H, &EventPayload::None);

        field.event(MobEvent::ReleaseOrder, EventPayload::None);
        assert_eq!(field.state(), Some("in_group_chasing"));
        assert!(field.pikmin().holding.is_empty());
        assert_eq!(field.world.mob(rock).expect("rock").holder, None);
        assert_eq!(field.pikmin().following_group, Some(leader));
    }

    #[test]
    fn zero_health_leads_to_the_dying_state() {
        let mut field = Field::new();
        let pikmin = field.pikmin;
        field.world.mob_mut(pikmin).expect("pikmin").health = 0.0;
        field.world.tick(0.01);
        let mob = field.pikmin();
        assert_eq!(mob.state_name(), Some("dying"));
        assert!(mob.flags.dying);
    }

    #[test]
    fn every_release_order_on_a_holding_state_falls_back_to_its_twin() {
        let mut mob_type = MobType::new("Red Pikmin", MobCategoryId::Pikmin);
        create_fsm(&mut mob_type);
        let table = &mob_type.fsm;

        let mut checked = 0;
        for state in table.states.iter().filter(|state| state.name.ends_with("_h")) {
            let Some(handler) = state.event(MobEvent::ReleaseOrder) else {
                continue;
            };
            let target = handler
                .actions
                .iter()
                .find(|call| call.name == "set_state")
                .and_then(|call| call.args[0].parse::<usize>().ok())
                .and_then(|idx| table.state(idx))
                .map(|target| target.name.as_str());
            assert_eq!(
                target,
                state.name.strip_suffix("_h"),
                "{} should release into its twin",
                state.name
            );
            checked += 1;
        }
        assert_eq!(checked, 8);
    }
