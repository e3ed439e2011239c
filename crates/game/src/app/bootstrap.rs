use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SEED_ENV_VAR: &str = "PIKIFEN_SEED";
const DEMO_TICKS_ENV_VAR: &str = "PIKIFEN_DEMO_TICKS";
const DEFAULT_DEMO_TICKS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DemoConfig {
    pub(crate) seed: u64,
    pub(crate) ticks: u32,
}

pub(crate) struct AppWiring {
    pub(crate) config: DemoConfig,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Pikifen Startup ===");

    let config = DemoConfig {
        seed: parse_env_or(SEED_ENV_VAR, 0),
        ticks: parse_env_or(DEMO_TICKS_ENV_VAR, DEFAULT_DEMO_TICKS),
    };
    info!(seed = config.seed, ticks = config.ticks, "demo_config");

    AppWiring { config }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_env_or<T: std::str::FromStr>(var: &'static str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|raw| parse_number(var, &raw))
        .unwrap_or(default)
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse::<T>().ok();
    if parsed.is_none() {
        warn!(var, value = raw, "env_var_ignored");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed_before_parsing() {
        assert_eq!(parse_number::<u64>(SEED_ENV_VAR, " 42 "), Some(42));
        assert_eq!(parse_number::<u32>(DEMO_TICKS_ENV_VAR, "300"), Some(300));
    }

    #[test]
    fn garbage_falls_back_to_none() {
        assert_eq!(parse_number::<u32>(DEMO_TICKS_ENV_VAR, "-5"), None);
        assert_eq!(parse_number::<u64>(SEED_ENV_VAR, "seed"), None);
    }
}
