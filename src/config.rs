// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::{AppContext, NoHomeDir};
use crate::model::agenda::DEFAULT_WINDOW_DAYS;
use anyhow::{Context, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_duration_mins() -> u32 {
    60
}
fn default_quick_add_note() -> String {
    "Created via Quick Add".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Length given to events created from quick entry, in minutes.
    #[serde(default = "default_duration_mins")]
    pub default_duration_mins: u32,
    #[serde(default = "default_quick_add_note")]
    pub quick_add_note: String,
    /// One of error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Mirror log output to `quickplan.log` in the log directory.
    #[serde(default)]
    pub log_to_file: bool,
    /// How far, in days, the task list reaches around the selected day.
    #[serde(default = "default_window_days")]
    pub agenda_window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration_mins: default_duration_mins(),
            quick_add_note: default_quick_add_note(),
            log_level: default_log_level(),
            log_to_file: false,
            agenda_window_days: default_window_days(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults. Unreadable or
    /// malformed files are still errors.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Like `load_or_default`, but also falls back to the defaults when the
    /// context has nowhere to look. That error is handed back so it can be
    /// reported once logging is up.
    pub fn load_or_fallback(ctx: &dyn AppContext) -> Result<(Self, Option<Error>)> {
        match Self::load_or_default(ctx) {
            Ok(cfg) => Ok((cfg, None)),
            Err(e) if e.is::<NoHomeDir>() => Ok((Self::default(), Some(e))),
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        })
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.config_file_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory '{}'", dir.display()))?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str)
            .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
        Ok(())
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
