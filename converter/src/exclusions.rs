// Licensed under the Apache-2.0 license

//! Sources that must not be converted.
//!
//! The exclusions file is a JSON object mapping a source stem to the reason
//! it is excluded:
//!
//! ```json
//! { "_Pgp2bAxi": "Depends on a device that has no description" }
//! ```

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exclusions {
    reasons: BTreeMap<String, String>,
}

impl Exclusions {
    /// Load the exclusions file. `Ok(None)` if it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exclusions file '{}'", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("failed to parse exclusions file '{}'", path.display()))
            .map(Some)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            reasons: serde_json::from_str(text)?,
        })
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.reasons.contains_key(stem)
    }

    /// `(stem, reason)` pairs, sorted by stem.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reasons.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }
}
