// Licensed under the Apache-2.0 license

//! Configuration of the generated document's preamble and file naming.
//!
//! [`ConverterConfig`] carries everything that varies between deployments of
//! the converter: the CPSW schema version stamped into each file, the license
//! banner written above it, and the names of output and temporary files. The
//! class labels and other constants of the dialect itself live in
//! [`crate::builder`] and are not configurable.

/// CPSW YAML schema version written when none is configured.
pub const DEFAULT_SCHEMA_VERSION: &str = "3.0.0";

/// License banner written at the top of every generated file.
///
/// Trailing spaces are part of the expected output.
pub const DEFAULT_LICENSE_BANNER: &[&str] = &[
    "##############################################################################",
    "## This file is part of 'SLAC Firmware Standard Library'.",
    "## It is subject to the license terms in the LICENSE.txt file found in the ",
    "## top-level directory of this distribution and at: ",
    "##    https://confluence.slac.stanford.edu/display/ppareg/LICENSE.html. ",
    "## No part of 'SLAC Firmware Standard Library', including this file, ",
    "## may be copied, modified, propagated, or distributed except according to ",
    "## the terms contained in the LICENSE.txt file. ",
    "############################################################################## ",
];

/// Configuration for a [`Converter`](crate::Converter).
///
/// # Example
///
/// ```
/// use registers_cpsw_yaml::ConverterConfig;
///
/// let config = ConverterConfig::with_defaults().schema_version("3.1.0");
/// assert_eq!(config.output_file_name("_AxiVersion"), "_AxiVersion.yaml");
/// assert_eq!(config.temp_file_name("_AxiVersion.yaml"), "_AxiVersion.yaml.tmp");
/// ```
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    /// Value of the `#schemaversion` directive.
    pub schema_version: String,

    /// Lines written before the directives, each followed by a newline.
    pub license_banner: Vec<String>,

    /// Extension of generated files, without the dot.
    pub output_extension: String,

    /// Suffix appended to the output file name for the intermediate file.
    pub temp_suffix: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConverterConfig {
    pub fn with_defaults() -> Self {
        Self {
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            license_banner: DEFAULT_LICENSE_BANNER
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_extension: "yaml".to_string(),
            temp_suffix: "tmp".to_string(),
        }
    }

    pub fn schema_version(mut self, version: &str) -> Self {
        self.schema_version = version.to_string();
        self
    }

    pub fn license_banner(mut self, lines: &[&str]) -> Self {
        self.license_banner = lines.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Output file name for a source stem, e.g. `_AxiVersion` → `_AxiVersion.yaml`.
    pub fn output_file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.output_extension)
    }

    /// Intermediate file name used while post-processing `file_name`.
    pub fn temp_file_name(&self, file_name: &str) -> String {
        format!("{file_name}.{}", self.temp_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::with_defaults();
        assert_eq!(config.schema_version, DEFAULT_SCHEMA_VERSION);
        assert_eq!(config.license_banner.len(), 9);
        assert!(config.license_banner[2].ends_with(' '));
    }

    #[test]
    fn test_custom_banner() {
        let config = ConverterConfig::with_defaults().license_banner(&[]);
        assert!(config.license_banner.is_empty());
        let config = ConverterConfig::with_defaults().license_banner(&["# one", "# two"]);
        assert_eq!(config.license_banner, ["# one", "# two"]);
    }
}
