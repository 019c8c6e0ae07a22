// Licensed under the Apache-2.0 license

//! The [`Converter`] entry point.

use crate::builder::build_document;
use crate::config::ConverterConfig;
use crate::emit::emit;
use crate::error::ConvertResult;
use crate::postprocess::{header, post_process, write_output};
use crate::sink::sink_debug;
use crate::walk::walk;
use log::Log;
use registers_model::DeviceTree;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a conversion produced no file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The output file already exists and is never overwritten.
    OutputExists { path: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OutputExists { path } => {
                write!(f, "output file '{}' already exists", path.display())
            }
        }
    }
}

/// Result of a successful [`Converter::convert`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Written(PathBuf),
    Skipped(SkipReason),
}

/// Converts device trees into CPSW YAML files.
pub struct Converter<'a> {
    config: &'a ConverterConfig,
    sink: &'a dyn Log,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a ConverterConfig, sink: &'a dyn Log) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &ConverterConfig {
        self.config
    }

    /// Render the complete file contents for `device` without touching the
    /// filesystem.
    pub fn render(&self, device: &dyn DeviceTree, file_name: &str) -> ConvertResult<String> {
        let body = self.emit_body(device)?;
        Ok(header(self.config, file_name) + &post_process(&body))
    }

    /// Convert `device` into `out_dir/file_name`.
    ///
    /// An existing output file is left untouched and reported as
    /// [`Outcome::Skipped`]. The device is only walked when the file will be
    /// written.
    pub fn convert(
        &self,
        device: &dyn DeviceTree,
        out_dir: &Path,
        file_name: &str,
    ) -> ConvertResult<Outcome> {
        let path = out_dir.join(file_name);
        if path.exists() {
            return Ok(Outcome::Skipped(SkipReason::OutputExists { path }));
        }
        let body = self.emit_body(device)?;
        write_output(out_dir, file_name, &body, self.config, self.sink).map(Outcome::Written)
    }

    fn emit_body(&self, device: &dyn DeviceTree) -> ConvertResult<String> {
        let walk = walk(device)?;
        sink_debug!(
            self.sink,
            "Walked '{}': {} fields, {} devices, {} commands",
            walk.name.as_deref().unwrap_or("<unnamed>"),
            walk.fields.len(),
            walk.devices.len(),
            walk.commands.len()
        );
        emit(&build_document(&walk, self.sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registers_model::{AccessMode, Device, Variable};
    use tempfile::TempDir;

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::OutputExists {
            path: PathBuf::from("out/Dev.yaml"),
        };
        assert_eq!(reason.to_string(), "output file 'out/Dev.yaml' already exists");
    }

    #[test]
    fn test_malformed_device_writes_nothing() {
        use registers_model::{ChildNode, NodeKind};

        struct Broken;
        impl DeviceTree for Broken {
            fn name(&self) -> Option<&str> {
                Some("Broken")
            }
            fn description(&self) -> Option<&str> {
                None
            }
            fn children(&self, kind: NodeKind) -> Option<Vec<ChildNode>> {
                (kind == NodeKind::RegisterField).then(|| vec![ChildNode::new("NoOffset")])
            }
        }

        let dir = TempDir::new().unwrap();
        let config = ConverterConfig::default();
        let converter = Converter::new(&config, log::logger());
        assert!(converter.convert(&Broken, dir.path(), "Broken.yaml").is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_render_matches_written_file() {
        let device = Device::new("Dev").variable(Variable::new("Reg", 0x4).mode(AccessMode::WO));
        let dir = TempDir::new().unwrap();
        let config = ConverterConfig::default();
        let converter = Converter::new(&config, log::logger());
        let rendered = converter.render(&device, "Dev.yaml").unwrap();
        let Outcome::Written(path) = converter.convert(&device, dir.path(), "Dev.yaml").unwrap()
        else {
            panic!("expected a written file");
        };
        assert_eq!(std::fs::read_to_string(path).unwrap(), rendered);
    }
}
