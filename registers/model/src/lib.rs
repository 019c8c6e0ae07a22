// Licensed under the Apache-2.0 license

//! Register-map device trees as seen by the CPSW YAML converter.
//!
//! The converter never looks at how a device tree was built. It only talks to
//! the [`DeviceTree`] capability trait, which exposes a device's name and
//! description, an optional replica count, and its children grouped by
//! [`NodeKind`].
//!
//! ## Module Organization
//!
//! - [`tree`]: the capability trait and the per-child view ([`ChildNode`])
//! - [`description`]: TOML device descriptions and the in-memory [`Device`]
//! - [`registry`]: explicit source identifier to constructor mapping
//! - [`error`]: [`ModelError`]

pub mod description;
pub mod error;
pub mod registry;
pub mod tree;

pub use description::{Command, DescriptionFile, Device, SubDevice, Variable};
pub use error::{ModelError, ModelResult};
pub use registry::{normalize, SourceRegistry};
pub use tree::{AccessMode, ChildNode, DeviceTree, NodeKind};
