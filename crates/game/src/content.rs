//! Loads the base content: the catalog and every mob type file, each type
//! getting its category's built-in states before its script is merged in.

use std::path::Path;
use std::sync::Arc;

use engine::{
    collect_xml_files_sorted, load_catalog_file, load_mob_type_file, load_script, ActionRegistry,
    AppPaths, ContentCatalog, ContentLoadError, MobType, MobTypeDatabase, MobWorld,
    ScriptDiagnostics,
};
use tracing::{info, warn};

use crate::categories::CategoryManager;
use crate::fsms;

pub struct LoadedContent {
    pub catalog: Arc<ContentCatalog>,
    pub types: MobTypeDatabase,
    pub categories: CategoryManager,
    pub diagnostics: ScriptDiagnostics,
    pub failed_files: usize,
}

impl LoadedContent {
    pub fn into_world(self, seed: u64) -> (MobWorld, CategoryManager) {
        let world = MobWorld::new(self.types, self.catalog, seed);
        (world, self.categories)
    }
}

/// A missing or broken catalog stops everything. A broken mob type file only
/// loses that type.
pub fn load_base_content(
    paths: &AppPaths,
    registry: &ActionRegistry,
) -> Result<LoadedContent, ContentLoadError> {
    let catalog = Arc::new(load_catalog_file(&paths.catalog_path)?);
    let files = collect_xml_files_sorted(&paths.mob_types_dir)?;

    let mut types = MobTypeDatabase::default();
    let mut categories = CategoryManager::with_builtin_categories();
    let mut diagnostics = ScriptDiagnostics::new();
    let mut failed_files = 0;

    for path in &files {
        let mob_type = match load_mob_type(path, registry, &catalog, &mut diagnostics) {
            Ok(mob_type) => Arc::new(mob_type),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "mob_type_load_failed");
                failed_files += 1;
                continue;
            }
        };
        if !categories.register_type(Arc::clone(&mob_type)) {
            warn!(mob_type = %mob_type.name, "mob_type_category_unregistered");
        }
        types.insert(mob_type);
    }

    for diagnostic in diagnostics.iter() {
        warn!(diagnostic = %diagnostic, "script_diagnostic");
    }
    info!(
        files = files.len(),
        mob_types = types.len(),
        failed_files,
        diagnostics = diagnostics.len(),
        status_types = catalog.status_types.len(),
        "content_load_summary"
    );

    Ok(LoadedContent {
        catalog,
        types,
        categories,
        diagnostics,
        failed_files,
    })
}

fn load_mob_type(
    path: &Path,
    registry: &ActionRegistry,
    catalog: &ContentCatalog,
    diagnostics: &mut ScriptDiagnostics,
) -> Result<MobType, ContentLoadError> {
    let document = load_mob_type_file(path)?;
    let mut mob_type = document.mob_type;
    fsms::create_category_fsm(&mut mob_type);
    if let Some(script) = &document.script {
        load_script(&mut mob_type, script, registry, catalog, diagnostics);
    }
    Ok(mob_type)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use engine::{MobCategoryId, ScriptErrorCode};
    use tempfile::TempDir;

    use super::*;

    const CATALOG: &str = r#"<Catalog>
    <statusType name="soaked" stateChange="flailing" removableWithWhistle="true"/>
    <hazard name="water" effects="soaked"/>
</Catalog>"#;

    const RED_PIKMIN: &str = r#"<MobType category="pikmin" name="Red Pikmin">
    <maxHealth>20</maxHealth>
    <animations>idling walking attacking</animations>
    <pikmin attackPower="2"/>
    <script>
        <state name="idling">
            <on_enter>
                set_var greeted true
            </on_enter>
        </state>
    </script>
</MobType>"#;

    const BULBORB: &str = r#"<MobType category="enemy" name="Bulborb">
    <animations>idling</animations>
    <script initialState="sleeping">
        <state name="sleeping">
            <on_enter>
                set_animation idling
            </on_enter>
            <on_timer>
                set_state hunting
            </on_timer>
        </state>
    </script>
</MobType>"#;

    fn write_root(files: &[(&str, &str)]) -> (TempDir, AppPaths) {
        let temp = TempDir::new().expect("temp");
        let paths = AppPaths::from_root(temp.path());
        fs::create_dir_all(&paths.mob_types_dir).expect("mkdir");
        fs::write(&paths.catalog_path, CATALOG).expect("write catalog");
        for (name, raw) in files {
            fs::write(paths.mob_types_dir.join(name), raw).expect("write mob type");
        }
        (temp, paths)
    }

    #[test]
    fn scripts_merge_into_the_built_in_states() {
        let (_temp, paths) = write_root(&[("red_pikmin.xml", RED_PIKMIN)]);
        let content =
            load_base_content(&paths, &ActionRegistry::with_builtin_actions()).expect("content");

        assert_eq!(content.failed_files, 0);
        let red = content.types.by_name("Red Pikmin").expect("type");
        assert_eq!(red.fsm.len(), fsms::pikmin::N_STATES);
        assert!(content.categories.find_mob_type("Red Pikmin").is_some());

        let (mut world, _categories) = content.into_world(0);
        let red = Arc::clone(world.types().by_name("Red Pikmin").expect("type"));
        let id = world.create_mob(engine::Vec2::ZERO, red, 0.0, &[]);
        let mob = world.mob(id).expect("mob");
        assert_eq!(mob.state_name(), Some("idling"));
        assert_eq!(mob.var("greeted"), "true");
    }

    #[test]
    fn unknown_targets_are_reported_and_loading_goes_on() {
        let (_temp, paths) =
            write_root(&[("bulborb.xml", BULBORB), ("red_pikmin.xml", RED_PIKMIN)]);
        let content =
            load_base_content(&paths, &ActionRegistry::with_builtin_actions()).expect("content");

        assert_eq!(content.types.len(), 2);
        assert_eq!(
            content
                .diagnostics
                .with_code(ScriptErrorCode::UnknownStateTarget)
                .count(),
            1
        );
        let bulborb = content
            .categories
            .get(MobCategoryId::Enemies)
            .and_then(|category| category.get_type("Bulborb"))
            .expect("type");
        assert_eq!(bulborb.fsm.first_state, bulborb.fsm.state_index("sleeping"));
    }

    #[test]
    fn broken_files_are_skipped() {
        let (_temp, paths) = write_root(&[
            ("broken.xml", "<MobType category=\"pikmin\">"),
            ("red_pikmin.xml", RED_PIKMIN),
        ]);
        let content =
            load_base_content(&paths, &ActionRegistry::with_builtin_actions()).expect("content");
        assert_eq!(content.failed_files, 1);
        assert_eq!(content.types.len(), 1);
    }

    #[test]
    fn shipped_content_loads_cleanly() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let content = load_base_content(
            &AppPaths::from_root(root),
            &ActionRegistry::with_builtin_actions(),
        )
        .expect("content");

        let diagnostics: Vec<String> = content.diagnostics.iter().map(ToString::to_string).collect();
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
        assert_eq!(content.failed_files, 0);
        assert_eq!(content.types.len(), 10);
        for mob_type in content.types.types() {
            assert!(
                mob_type.fsm.first_state.is_some(),
                "{} has no first state",
                mob_type.name
            );
        }
    }

    #[test]
    fn a_missing_catalog_fails_the_load() {
        let (_temp, paths) = write_root(&[]);
        fs::remove_file(&paths.catalog_path).expect("remove");
        let result = load_base_content(&paths, &ActionRegistry::with_builtin_actions());
        assert!(matches!(result, Err(ContentLoadError::Io { .. })));
    }
}
