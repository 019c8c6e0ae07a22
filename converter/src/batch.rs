// Licensed under the Apache-2.0 license

//! Batch conversion of every description file under an input directory.
//!
//! A failing source never stops the batch: each outcome is recorded and
//! reported in the closing summary. Only problems with the batch itself (an
//! unreadable input directory, a malformed exclusions file, an output
//! directory that cannot be created) are returned as errors.

use crate::collect::{collect_sources, Source};
use crate::exclusions::Exclusions;
use crate::settings::Settings;
use anyhow::{Context, Result};
use log::{Level, Log, Record};
use registers_cpsw_yaml::{Converter, Outcome};
use registers_model::{DescriptionFile, SourceRegistry};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

const TARGET: &str = "cpsw_converter";
const NAME_COLUMN: usize = 30;
const RULE_WIDTH: usize = 80;

/// Names of converted sources and reasons for everything else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Records {
    pub successes: Vec<String>,
    /// `(name, reason)` in the order first recorded. Skipped outputs are
    /// keyed by output file name, other failures by source stem.
    pub failures: Vec<(String, String)>,
}

impl Records {
    /// Record a failure; a later failure for the same name replaces the
    /// reason but keeps its position.
    pub fn fail(&mut self, name: &str, reason: String) {
        match self.failures.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = reason,
            None => self.failures.push((name.to_string(), reason)),
        }
    }

    pub fn succeed(&mut self, name: &str) {
        self.successes.push(name.to_string());
    }

    pub fn failure(&self, name: &str) -> Option<&str> {
        self.failures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, reason)| reason.as_str())
    }

    /// The closing summary, one log line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let rule = "-".repeat(RULE_WIDTH);
        let mut lines = vec![
            rule.clone(),
            format!(
                "Number of files successfully converted: {}",
                self.successes.len()
            ),
            format!(
                "Number of files unsuccessfully converted: {}",
                self.failures.len()
            ),
        ];
        if !self.successes.is_empty() {
            lines.push(rule.clone());
            lines.push("Successfully converted files:".to_string());
            lines.extend(self.successes.iter().cloned());
        }
        if !self.failures.is_empty() {
            lines.push(rule);
            lines.push("Unsuccessfully converted files:".to_string());
            lines.extend(
                self.failures
                    .iter()
                    .map(|(name, reason)| format!("{name:<NAME_COLUMN$}=>     {reason}")),
            );
        }
        lines.push("#".repeat(RULE_WIDTH));
        lines
    }
}

pub struct BatchDriver<'a> {
    settings: &'a Settings,
    sink: &'a dyn Log,
}

impl<'a> BatchDriver<'a> {
    pub fn new(settings: &'a Settings, sink: &'a dyn Log) -> Self {
        Self { settings, sink }
    }

    /// Convert every collected source and log the summary.
    pub fn run(&self) -> Result<Records> {
        self.log(Level::Info, format_args!("Starting a new conversion session..."));
        self.log(Level::Info, format_args!("{}", "-".repeat(RULE_WIDTH)));

        let output_dir = &self.settings.output_dir;
        fs::create_dir_all(output_dir).with_context(|| {
            format!("failed to create output directory '{}'", output_dir.display())
        })?;

        let exclusions = match Exclusions::load(&self.settings.exclusions)? {
            Some(exclusions) => exclusions,
            None => {
                self.log(
                    Level::Info,
                    format_args!(
                        "No exclusions file at '{}'",
                        self.settings.exclusions.display()
                    ),
                );
                Exclusions::default()
            }
        };
        let mut records = Records::default();
        for (stem, reason) in exclusions.iter() {
            records.fail(stem, reason.to_string());
        }

        let (sources, duplicates) = collect_sources(&self.settings.input_dir, &exclusions)?;
        for path in duplicates {
            self.log(
                Level::Warn,
                format_args!("Ignoring '{}': a source with the same name was found first", path.display()),
            );
        }
        self.log(
            Level::Debug,
            format_args!("Collected {} source files", sources.len()),
        );

        let (registry, malformed) = self.build_registry(&sources, &mut records);
        if registry.is_empty() {
            self.log(Level::Warn, format_args!("No device classes were registered"));
        } else {
            self.log(
                Level::Debug,
                format_args!(
                    "Registered {} device classes: {}",
                    registry.len(),
                    registry.ids().collect::<Vec<_>>().join(", ")
                ),
            );
        }

        let config = self.settings.converter_config();
        let converter = Converter::new(&config, self.sink);
        for source in sources.iter().filter(|s| !malformed.contains(&s.stem)) {
            self.convert_source(&converter, &registry, source, &mut records);
        }

        for line in records.summary_lines() {
            self.log(Level::Info, format_args!("{line}"));
        }
        self.sink.flush();
        Ok(records)
    }

    fn build_registry(
        &self,
        sources: &[Source],
        records: &mut Records,
    ) -> (SourceRegistry, HashSet<String>) {
        let mut registry = SourceRegistry::new();
        let mut malformed = HashSet::new();
        for source in sources {
            match DescriptionFile::from_path(&source.path) {
                Ok(file) => {
                    for class in registry.register_description(&file) {
                        self.log(
                            Level::Warn,
                            format_args!(
                                "Device class '{class}' in '{}' is already defined; keeping the first definition",
                                source.path.display()
                            ),
                        );
                    }
                }
                Err(err) => {
                    self.log(
                        Level::Error,
                        format_args!("Cannot load '{}'. {err}", source.file_name()),
                    );
                    records.fail(
                        &source.stem,
                        format!("Malformed source. {}. {err}", err.kind()),
                    );
                    malformed.insert(source.stem.clone());
                }
            }
        }
        (registry, malformed)
    }

    fn convert_source(
        &self,
        converter: &Converter,
        registry: &SourceRegistry,
        source: &Source,
        records: &mut Records,
    ) {
        let output_dir = &self.settings.output_dir;
        let output_name = converter.config().output_file_name(&source.stem);
        if output_dir.join(&output_name).exists() {
            self.skip(source, &output_name, output_dir, records);
            return;
        }

        self.log(
            Level::Info,
            format_args!("Converting file '{}'...", source.file_name()),
        );
        let device = match registry.resolve(&source.stem) {
            Ok(device) => device,
            Err(err) => {
                self.log(
                    Level::Error,
                    format_args!(
                        "Cannot instantiate the device for '{}'. Make sure the file defines a device class named after it. {err}",
                        source.stem
                    ),
                );
                records.fail(
                    &source.stem,
                    format!(
                        "Make sure the file name and the device class are the same. {}. {err}",
                        err.kind()
                    ),
                );
                return;
            }
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            converter.convert(&*device, output_dir, &output_name)
        }));
        let result = match result {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.log(
                    Level::Error,
                    format_args!(
                        "Conversion of '{}' failed. Error type: Panic. Error: {message}",
                        source.file_name()
                    ),
                );
                records.fail(&source.stem, format!("Panic. {message}"));
                return;
            }
        };

        match result {
            Ok(Outcome::Written(path)) => {
                self.log(Level::Debug, format_args!("Wrote '{}'", path.display()));
                records.succeed(&source.stem);
            }
            Ok(Outcome::Skipped(_)) => self.skip(source, &output_name, output_dir, records),
            Err(err) => {
                self.log(
                    Level::Error,
                    format_args!(
                        "Conversion of '{}' failed. Error type: {}. Error: {err}",
                        source.file_name(),
                        err.kind()
                    ),
                );
                records.fail(&source.stem, format!("{}. {err}", err.kind()));
            }
        }
    }

    fn skip(&self, source: &Source, output_name: &str, output_dir: &Path, records: &mut Records) {
        let message = format!(
            "Skipping file '{}' as its converted file '{output_name}' is found in the output directory '{}'.",
            source.file_name(),
            output_dir.display()
        );
        self.log(Level::Info, format_args!("{message}"));
        records.fail(output_name, message);
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.sink.log(
            &Record::builder()
                .args(args)
                .level(level)
                .target(TARGET)
                .build(),
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_replaces_in_place() {
        let mut records = Records::default();
        records.fail("_A", "excluded".to_string());
        records.fail("_B", "broken".to_string());
        records.fail("_A", "still excluded".to_string());
        assert_eq!(
            records.failures,
            [
                ("_A".to_string(), "still excluded".to_string()),
                ("_B".to_string(), "broken".to_string())
            ]
        );
        assert_eq!(records.failure("_B"), Some("broken"));
        assert_eq!(records.failure("_C"), None);
    }

    #[test]
    fn test_summary_alignment() {
        let mut records = Records::default();
        records.succeed("_AxiVersion");
        records.fail("_Short", "reason one".to_string());
        records.fail("_AVeryLongSourceNameThatOverflows", "reason two".to_string());

        let lines = records.summary_lines();
        assert_eq!(lines[1], "Number of files successfully converted: 1");
        assert_eq!(lines[2], "Number of files unsuccessfully converted: 2");
        assert_eq!(lines[4], "Successfully converted files:");
        assert_eq!(lines[5], "_AxiVersion");
        assert_eq!(lines[7], "Unsuccessfully converted files:");
        assert_eq!(
            lines[8],
            format!("_Short{}=>     reason one", " ".repeat(24))
        );
        assert_eq!(
            lines[9],
            "_AVeryLongSourceNameThatOverflows=>     reason two"
        );
        assert_eq!(lines[10], "#".repeat(80));
    }

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| panic!("attempt to add with overflow")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "attempt to add with overflow");
        let code = 7;
        let payload = panic::catch_unwind(|| panic!("code {code}")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "code 7");
        let payload = panic::catch_unwind(|| std::panic::panic_any(3u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_empty_summary() {
        let lines = Records::default().summary_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Number of files successfully converted: 0");
    }
}
