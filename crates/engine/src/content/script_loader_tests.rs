    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::content::load_mob_type_file;
    use crate::mob::{MobCategoryId, MobId, MobTypeDatabase, MobWorld, Vec2};
    use crate::script::EventPayload;

    fn load_with(mob_type: Option<MobType>, xml: &str) -> (MobType, ScriptDiagnostics) {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("mob_types").join("tester.xml");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, xml).expect("write");

        let doc = load_mob_type_file(&path).expect("load");
        let script = doc.script.expect("script");
        let mut mob_type = mob_type.unwrap_or(doc.mob_type);
        let mut diagnostics = ScriptDiagnostics::new();
        load_script(
            &mut mob_type,
            &script,
            &ActionRegistry::with_builtin_actions(),
            &ContentCatalog::default(),
            &mut diagnostics,
        );
        (mob_type, diagnostics)
    }

    fn load(xml: &str) -> (MobType, ScriptDiagnostics) {
        load_with(None, xml)
    }

    fn spawn(mob_type: MobType) -> (MobWorld, MobId) {
        let mob_type = Arc::new(mob_type);
        let types = MobTypeDatabase::from_types(vec![Arc::clone(&mob_type)]);
        let mut world = MobWorld::new(types, Arc::new(ContentCatalog::default()), 5);
        let id = world.create_mob(Vec2::ZERO, mob_type, 0.0, &[]);
        (world, id)
    }

    fn printed(world: &MobWorld) -> Vec<String> {
        world.print_log().iter().map(|record| record.text.clone()).collect()
    }

    fn state_name(world: &MobWorld, id: MobId) -> Option<String> {
        world
            .mob(id)
            .and_then(|mob| mob.state_name())
            .map(str::to_string)
    }

    #[test]
    fn global_actions_run_before_state_actions() {
        let (mob_type, diagnostics) = load(
            r#"<MobType category="custom" name="Tester">
  <script initialState="idle">
    <state name="idle">
      <on_receive_message>print state</on_receive_message>
    </state>
    <global>
      <on_receive_message>print global</on_receive_message>
      <on_timer>print tick</on_timer>
    </global>
  </script>
</MobType>"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let (mut world, id) = spawn(mob_type);

        world.send_message(id, id, "hello");
        world.run_event(id, MobEvent::Timer, &EventPayload::None);

        assert_eq!(printed(&world), vec!["global", "state", "tick"]);
    }

    #[test]
    fn global_actions_after_appends_them() {
        let (mob_type, _) = load(
            r#"<MobType category="custom" name="Tester">
  <script initialState="idle">
    <state name="idle">
      <on_timer>print state</on_timer>
    </state>
    <global>
      <on_timer global_actions_after="true">print global</on_timer>
    </global>
  </script>
</MobType>"#,
        );
        let (mut world, id) = spawn(mob_type);
        world.run_event(id, MobEvent::Timer, &EventPayload::None);
        assert_eq!(printed(&world), vec!["state", "global"]);
    }

    #[test]
    fn states_without_zero_health_go_to_the_dying_state() {
        let (mob_type, diagnostics) = load(
            r#"<MobType category="custom" name="Tester">
  <script initialState="idle" dyingState="dying" statesIgnoringDeath="stunned">
    <state name="idle"><on_enter>set_var x 1</on_enter></state>
    <state name="stunned"><on_enter>set_var x 2</on_enter></state>
    <state name="dying"><on_enter>print rip</on_enter></state>
  </script>
</MobType>"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let table = Arc::clone(&mob_type.fsm);
        let has_zero_health = |name: &str| {
            table
                .state_index(name)
                .and_then(|idx| table.state(idx))
                .is_some_and(|state| state.has_event(MobEvent::ZeroHealth))
        };
        assert!(has_zero_health("idle"));
        assert!(!has_zero_health("stunned"));
        assert!(!has_zero_health("dying"));

        let (mut world, id) = spawn(mob_type);
        world.run_event(id, MobEvent::ZeroHealth, &EventPayload::None);
        assert_eq!(state_name(&world, id).as_deref(), Some("dying"));
        assert_eq!(printed(&world), vec!["rip"]);
    }

    #[test]
    fn every_scripted_state_gets_the_default_handlers() {
        let (mob_type, _) = load(
            r#"<MobType category="custom" name="Tester">
  <script initialState="idle" statesIgnoringHazard="idle">
    <state name="idle"><on_enter>set_var x 1</on_enter></state>
  </script>
</MobType>"#,
        );
        let idle = mob_type.fsm.state(0).expect("idle");
        assert!(idle.has_event(MobEvent::HitboxTouchNA));
        assert!(idle.has_event(MobEvent::BottomlessPit));
        assert!(idle.has_event(MobEvent::TouchedSpray));
        assert!(!idle.has_event(MobEvent::TouchedHazard));
        assert!(!idle.has_event(MobEvent::ZeroHealth));
    }

    #[test]
    fn unknown_state_target_is_reported_and_ignored() {
        let (mob_type, diagnostics) = load(
            r#"<MobType category="custom" name="Tester">
  <script initialState="idle">
    <state name="idle">
      <on_leave>print left</on_leave>
      <on_timer>set_state nowhere</on_timer>
    </state>
  </script>
</MobType>"#,
        );
        let reported: Vec<_> = diagnostics
            .with_code(ScriptErrorCode::UnknownStateTarget)
            .collect();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].mob_type, "Tester");
        assert!(reported[0].file_path.ends_with("mob_types/tester.xml"));
        assert!(reported[0].message.contains("nowhere"));
        assert_eq!(reported[0].location.map(|loc| loc.line), Some(3));

        let (mut world, id) = spawn(mob_type);
        world.run_event(id, MobEvent::Timer, &EventPayload::None);
        assert_eq!(state_name(&world, id).as_deref(), Some("idle"));
        assert!(printed(&world).is_empty());
    }

    #[test]
    fn bad_lines_are_skipped_with_their_location() {
        let (mob_type, diagnostics) = load(
            r#"<MobType category="custom" name="Tester">
  <animations>idling</animations>
  <script initialState="idle">
    <state name="idle">
      <on_timer>
        fly_away
        set_animation dancing
        print kept
        else
      </on_timer>
      <on_sneeze>print achoo</on_sneeze>
    </state>
  </script>
</MobType>"#,
        );
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                ScriptErrorCode::InvalidAction,
                ScriptErrorCode::InvalidAction,
                ScriptErrorCode::InvalidActionStructure,
                ScriptErrorCode::UnknownEvent,
            ]
        );
        assert_eq!(diagnostics.iter().next().and_then(|d| d.location).map(|l| l.line), Some(6));

        let (mut world, id) = spawn(mob_type);
        world.run_event(id, MobEvent::Timer, &EventPayload::None);
        assert_eq!(printed(&world), vec!["kept"]);
    }

    #[test]
    fn unknown_initial_and_dying_states_are_reported() {
        let (mob_type, diagnostics) = load(
            r#"<MobType category="custom" name="Tester">
  <script initialState="sleeping" dyingState="gone">
    <state name="idle"/>
  </script>
</MobType>"#,
        );
        assert_eq!(
            diagnostics
                .with_code(ScriptErrorCode::UnknownInitialState)
                .count(),
            1
        );
        assert_eq!(
            diagnostics.with_code(ScriptErrorCode::UnknownDyingState).count(),
            1
        );
        assert_eq!(mob_type.fsm.first_state, None);
    }

    #[test]
    fn scripts_merge_into_states_declared_in_code() {
        let mut efc = crate::fsm::FsmBuilder::new();
        efc.new_state("idle", 0);
        efc.new_event(MobEvent::Timer);
        efc.run_call(ActionCall::parse(
            &ActionRegistry::with_builtin_actions(),
            "print native",
            &ActionLoadContext {
                mob_type: &MobType::new("Tester", MobCategoryId::Custom),
                catalog: &ContentCatalog::default(),
            },
        )
        .expect("parse"));
        let mut table = FsmTable::new(efc.finish(1));
        table.first_state = Some(0);
        let mut native = MobType::new("Tester", MobCategoryId::Custom);
        native.fsm = Arc::new(table);

        let (mob_type, diagnostics) = load_with(
            Some(native),
            r#"<MobType category="custom" name="Tester">
  <script>
    <state name="idle">
      <on_timer>print before</on_timer>
      <on_receive_message custom_actions_after="true">set_state extra</on_receive_message>
    </state>
    <state name="extra">
      <on_enter>print extra</on_enter>
    </state>
  </script>
</MobType>"#,
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(mob_type.fsm.len(), 2);
        assert_eq!(mob_type.fsm.first_state, Some(0));

        let (mut world, id) = spawn(mob_type);
        world.run_event(id, MobEvent::Timer, &EventPayload::None);
        world.send_message(id, id, "go");
        assert_eq!(printed(&world), vec!["before", "native", "extra"]);
        assert_eq!(state_name(&world, id).as_deref(), Some("extra"));
    }
