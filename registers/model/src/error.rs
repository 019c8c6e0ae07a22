// Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading device descriptions or resolving sources.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse device description '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No constructor is registered for the normalized source identifier.
    #[error("no device is registered for source '{name}' (looked up as '{normalized}')")]
    UnknownSource { name: String, normalized: String },

    #[error("invalid definition of '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },
}

impl ModelError {
    /// Short name of the error variant, for failure records.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::Io { .. } => "Io",
            ModelError::Parse { .. } => "Parse",
            ModelError::UnknownSource { .. } => "UnknownSource",
            ModelError::InvalidDefinition { .. } => "InvalidDefinition",
        }
    }
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
