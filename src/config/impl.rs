use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults if `init_config`
/// was never called (tests, library use).
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration from `path` plus `KSHORT__*` overrides.
///
/// # Examples
/// ```no_run
/// use kshort::config::init_config;
/// init_config("config.toml").unwrap();
/// ```
pub fn init_config(path: &str) -> crate::errors::Result<Arc<StaticConfig>> {
    let loaded = StaticConfig::load(path)?;
    set_config(loaded);
    Ok(get_config())
}

/// Replace the global configuration
pub fn set_config(config: StaticConfig) {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .store(Arc::new(config));
}
