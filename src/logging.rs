// File: ./src/logging.rs
//! Logger bootstrap for the command-line binary.
//!
//! The library only talks to the `log` facade. Binaries call [`init`]; once a
//! logger is installed further calls are no-ops, and initialization never
//! panics.

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Logs go to stderr, and are appended to `log_file` when one is given.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Debug)
        .set_target_level(LevelFilter::Trace)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory '{}'", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
        loggers.push(WriteLogger::new(level, config, file));
    }

    // The facade accepts exactly one logger; losing the race is fine.
    if CombinedLogger::init(loggers).is_err() {
        log::debug!("Logger already installed");
        return Ok(());
    }
    log::debug!("Logging initialized at {}", level);
    Ok(())
}
