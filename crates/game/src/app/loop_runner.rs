use std::process::ExitCode;

use engine::{resolve_app_paths, ActionRegistry};
use pikifen::content::load_base_content;
use pikifen::demo::Demo;
use pikifen::scenario::load_scenario;
use tracing::{error, info};

use super::bootstrap::AppWiring;

const DEMO_SCENARIO_FILE: &str = "scenarios/demo.json";

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_demo(&app) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_demo(app: &AppWiring) -> Result<(), String> {
    let paths = resolve_app_paths().map_err(|err| err.to_string())?;
    info!(root = %paths.root.display(), "app_paths_resolved");

    let registry = ActionRegistry::with_builtin_actions();
    let content = load_base_content(&paths, &registry).map_err(|err| err.to_string())?;
    let scenario = load_scenario(&paths.base_content_dir.join(DEMO_SCENARIO_FILE))?;

    let (world, categories) = content.into_world(app.config.seed);
    let mut demo = Demo::new(world, categories, &scenario);
    demo.run(app.config.ticks);
    Ok(())
}
