use std::{env, path::PathBuf};

use super::schema::Settings;

/// Longest accepted refresh tick, in milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;
/// Slowest accepted artwork rotation, in milliseconds.
pub const MAX_ROTATION_PERIOD_MS: u64 = 600_000;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `MUSICVERSE__`) on top, and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MUSICVERSE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_TICK_INTERVAL_MS).contains(&self.ui.tick_interval_ms) {
            return Err(format!(
                "ui.tick_interval_ms must be between 1 and {MAX_TICK_INTERVAL_MS}"
            ));
        }
        if !(1..=MAX_ROTATION_PERIOD_MS).contains(&self.ui.rotation_period_ms) {
            return Err(format!(
                "ui.rotation_period_ms must be between 1 and {MAX_ROTATION_PERIOD_MS}"
            ));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err("audio.volume must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `MUSICVERSE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MUSICVERSE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/musicverse/config.toml`
/// or `~/.config/musicverse/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("musicverse").join("config.toml"))
}

/// Compute the default log file under `$XDG_STATE_HOME/musicverse/` or
/// `~/.local/state/musicverse/`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("musicverse").join("musicverse.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
