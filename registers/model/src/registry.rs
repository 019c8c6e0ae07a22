// Licensed under the Apache-2.0 license

//! Explicit mapping from source identifiers to device constructors.
//!
//! A source such as `_AxiVersion.toml` is identified by its normalized stem
//! (`axiversion`). Callers register a constructor per identifier; resolving a
//! source runs that constructor. There is no guessing of class names.

use crate::description::DescriptionFile;
use crate::error::{ModelError, ModelResult};
use crate::tree::DeviceTree;
use std::collections::BTreeMap;

type Constructor = Box<dyn Fn() -> ModelResult<Box<dyn DeviceTree>>>;

/// Normalize a source name or class identifier for lookup.
///
/// Leading underscores are stripped and ASCII letters lowercased, so
/// `_AxiVersion`, `AxiVersion` and `axiversion` all normalize the same.
///
/// ```
/// use registers_model::normalize;
/// assert_eq!(normalize("_AxiVersion"), "axiversion");
/// assert_eq!(normalize("PrlSlave"), "prlslave");
/// ```
pub fn normalize(name: &str) -> String {
    name.trim_start_matches('_').to_ascii_lowercase()
}

#[derive(Default)]
pub struct SourceRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under the normalized form of `id`.
    ///
    /// The first registration of an identifier wins; a later duplicate is
    /// rejected with [`ModelError::InvalidDefinition`].
    pub fn register<F>(&mut self, id: &str, constructor: F) -> ModelResult<()>
    where
        F: Fn() -> ModelResult<Box<dyn DeviceTree>> + 'static,
    {
        let key = normalize(id);
        if self.constructors.contains_key(&key) {
            return Err(ModelError::InvalidDefinition {
                name: id.to_string(),
                reason: format!("a device is already registered as '{key}'"),
            });
        }
        self.constructors.insert(key, Box::new(constructor));
        Ok(())
    }

    /// Register every device class of a description file.
    ///
    /// Returns the identifiers that were rejected as duplicates.
    pub fn register_description(&mut self, file: &DescriptionFile) -> Vec<String> {
        let mut duplicates = vec![];
        for device in &file.devices {
            let device = device.clone();
            let class = device.class.clone();
            let result = self.register(&class, move || {
                Ok(Box::new(device.clone()) as Box<dyn DeviceTree>)
            });
            if result.is_err() {
                duplicates.push(class);
            }
        }
        duplicates
    }

    /// Instantiate the device registered for `source_name`.
    pub fn resolve(&self, source_name: &str) -> ModelResult<Box<dyn DeviceTree>> {
        let normalized = normalize(source_name);
        match self.constructors.get(&normalized) {
            Some(constructor) => constructor(),
            None => Err(ModelError::UnknownSource {
                name: source_name.to_string(),
                normalized,
            }),
        }
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
