// Licensed under the Apache-2.0 license

//! Batch settings: an optional TOML file, overridden by command-line flags.
//!
//! ```toml
//! input_dir = "~/firmware/descriptions"
//! output_dir = "$BUILD_DIR/yaml"
//! exclusions = "settings/exclusions.json"
//! log_file = "logs/cpsw-converter.log"
//! log_level = "debug"
//! schema_version = "3.0.0"
//! ```

use anyhow::{anyhow, bail, Context, Result};
use log::LevelFilter;
use registers_cpsw_yaml::config::DEFAULT_SCHEMA_VERSION;
use registers_cpsw_yaml::ConverterConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_EXCLUSIONS: &str = "settings/exclusions.json";
pub const DEFAULT_LOG_FILE: &str = "logs/cpsw-converter.log";

/// Contents of a settings file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub exclusions: Option<String>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
    pub schema_version: Option<String>,
}

impl SettingsFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))
    }
}

/// Values given on the command line; they take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub exclusions: Option<String>,
    pub log_file: Option<String>,
    pub log_level: Option<LevelFilter>,
    pub schema_version: Option<String>,
}

/// Fully resolved batch settings, paths expanded.
#[derive(Clone, Debug)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub exclusions: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub schema_version: String,
}

impl Settings {
    /// Settings for `input_dir` with every other value defaulted.
    pub fn new(input_dir: &Path) -> Self {
        Self {
            input_dir: input_dir.to_path_buf(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            exclusions: PathBuf::from(DEFAULT_EXCLUSIONS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
        }
    }

    /// Merge `file` and `overrides` and expand every path.
    pub fn resolve(file: SettingsFile, overrides: Overrides) -> Result<Self> {
        let Some(input_dir) = overrides.input_dir.or(file.input_dir) else {
            bail!("no input directory given on the command line or in the settings file");
        };
        let log_level = match (overrides.log_level, file.log_level) {
            (Some(level), _) => level,
            (None, Some(level)) => level
                .parse::<LevelFilter>()
                .map_err(|_| anyhow!("invalid log level '{level}' in settings file"))?,
            (None, None) => LevelFilter::Info,
        };
        let path = |value: Option<String>, default: &str| {
            expand_path(value.as_deref().unwrap_or(default))
        };

        Ok(Self {
            input_dir: expand_path(&input_dir),
            output_dir: path(overrides.output_dir.or(file.output_dir), DEFAULT_OUTPUT_DIR),
            exclusions: path(overrides.exclusions.or(file.exclusions), DEFAULT_EXCLUSIONS),
            log_file: path(overrides.log_file.or(file.log_file), DEFAULT_LOG_FILE),
            log_level,
            schema_version: overrides
                .schema_version
                .or(file.schema_version)
                .unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string()),
        })
    }

    /// Load the optional settings file at `path` and apply `overrides`.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match path {
            Some(path) => SettingsFile::from_path(path)?,
            None => SettingsFile::default(),
        };
        Self::resolve(file, overrides)
    }

    pub fn converter_config(&self) -> ConverterConfig {
        ConverterConfig::with_defaults().schema_version(&self.schema_version)
    }
}

/// Expand a leading `~` and `$VAR` / `${VAR}` references.
pub fn expand_path(value: &str) -> PathBuf {
    PathBuf::from(expand_vars(&expand_user(value)))
}

fn expand_user(value: &str) -> String {
    let home = std::env::var("HOME").ok();
    match (value.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            format!("{home}{rest}")
        }
        _ => value.to_string(),
    }
}

/// Undefined variables are left as written.
fn expand_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };
        match std::env::var(name) {
            Ok(val) if !name.is_empty() => out.push_str(&val),
            _ => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}
