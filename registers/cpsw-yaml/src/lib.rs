// Licensed under the Apache-2.0 license

//! Register-map device tree to CPSW YAML converter.
//!
//! This crate turns a [`DeviceTree`](registers_model::DeviceTree) into the
//! schema-versioned YAML dialect read by CPSW.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use registers_cpsw_yaml::{Converter, ConverterConfig, Outcome};
//! use registers_model::{AccessMode, Device, Variable};
//!
//! let device = Device::new("AxiVersion")
//!     .with_description("AXI-Lite Version Module")
//!     .variable(Variable::new("FpgaVersion", 0x0).mode(AccessMode::RO));
//!
//! let config = ConverterConfig::with_defaults();
//! let converter = Converter::new(&config, log::logger());
//! match converter.convert(&device, Path::new("output"), "AxiVersion.yaml").unwrap() {
//!     Outcome::Written(path) => println!("wrote {}", path.display()),
//!     Outcome::Skipped(reason) => println!("skipped: {reason}"),
//! }
//! ```
//!
//! ## Conversion Flow
//!
//! ```text
//! DeviceTree → walk → DeviceWalk → build → ConfigDocument → emit → YAML text
//!                       ├── ArrayCollapser   (name[k] siblings)      │
//!                       └── ls_bit           (bit offsets)           ▼
//!                                                     post_process + header → file
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: [`ConverterConfig`] (schema version, license banner)
//! - [`walk`]: validated, ordered view of a device's children
//! - [`array`]: collapsing of bracket-indexed siblings
//! - [`lsbit`]: byte-local least-significant-bit normalization
//! - [`document`]: the insertion-ordered [`ConfigDocument`]
//! - [`builder`]: assembles the document from a walk
//! - [`emit`]: YAML serialization of the document
//! - [`postprocess`]: dialect rewriting, header and the file write sequence
//! - [`convert`]: the [`Converter`] entry point

pub mod array;
pub mod builder;
pub mod config;
pub mod convert;
pub mod document;
pub mod emit;
pub mod error;
pub mod lsbit;
pub mod postprocess;
pub mod util;
pub mod walk;

mod sink;

pub use config::ConverterConfig;
pub use convert::{Converter, Outcome, SkipReason};
pub use document::{ConfigDocument, OrderedMap, Value};
pub use error::{ConvertError, ConvertResult};
pub use walk::DeviceWalk;
