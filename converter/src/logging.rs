// Licensed under the Apache-2.0 license

//! The driver's log sink: plain messages on the console, timestamped records
//! appended to a log file.
//!
//! The logger is returned to the caller instead of being installed globally,
//! so several drivers (or tests) can run in one process.

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelPadding, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::Path;

fn console_config() -> Config {
    ConfigBuilder::new()
        .set_max_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .set_level_padding(LevelPadding::Off)
        .build()
}

fn file_config() -> Config {
    ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build()
}

/// Build the combined console and file logger, creating the log file's
/// directory if needed.
pub fn build_logger(log_file: &Path, level: LevelFilter) -> Result<Box<CombinedLogger>> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory '{}'", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file '{}'", log_file.display()))?;

    Ok(CombinedLogger::new(vec![
        TermLogger::new(level, console_config(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, file_config(), file),
    ]))
}
