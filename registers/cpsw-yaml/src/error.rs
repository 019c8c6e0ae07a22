// Licensed under the Apache-2.0 license

use registers_model::NodeKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while converting one device tree.
///
/// An existing output file is not an error; see
/// [`Outcome::Skipped`](crate::Outcome::Skipped).
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A child node lacks an attribute its kind requires.
    #[error("{kind} '{node}' has no {attribute}")]
    MalformedNode {
        kind: NodeKind,
        node: String,
        attribute: &'static str,
    },

    #[error("failed to emit YAML: {0}")]
    Emit(#[from] serde_yaml::Error),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Short name of the error variant, for failure records.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::MalformedNode { .. } => "MalformedNode",
            ConvertError::Emit(_) => "Emit",
            ConvertError::Io { .. } => "Io",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConvertError::Io { path, source }
    }
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
