// Licensed under the Apache-2.0 license

//! Batch driver for converting a directory of device descriptions into CPSW
//! YAML files.
//!
//! - [`settings`]: settings file, command-line overrides and path expansion
//! - [`logging`]: the console and log-file sink
//! - [`exclusions`]: sources that are never converted
//! - [`collect`]: discovery of description files
//! - [`batch`]: the conversion loop and its summary

pub mod batch;
pub mod collect;
pub mod exclusions;
pub mod logging;
pub mod settings;

pub use batch::{BatchDriver, Records};
pub use settings::{Overrides, Settings};
