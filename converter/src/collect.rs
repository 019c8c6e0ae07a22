// Licensed under the Apache-2.0 license

//! Discovery of description files under the input directory.

use crate::exclusions::Exclusions;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SOURCE_EXTENSION: &str = "toml";

/// One description file to convert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    /// File name without extension; names the output file.
    pub stem: String,
    pub path: PathBuf,
}

impl Source {
    /// File name of the source, e.g. `_AxiVersion.toml`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.stem.clone())
    }
}

/// Recursively collect `*.toml` files under `input_dir`, in sorted walk
/// order.
///
/// Excluded stems are never collected. When two files share a stem, the
/// first one found is kept and the others are returned as duplicates.
pub fn collect_sources(
    input_dir: &Path,
    exclusions: &Exclusions,
) -> Result<(Vec<Source>, Vec<PathBuf>)> {
    let mut sources = vec![];
    let mut duplicates = vec![];
    let mut seen = HashSet::new();

    for entry in WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("failed to read input directory '{}'", input_dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION)
        {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if exclusions.contains(stem) {
            continue;
        }
        if seen.insert(stem.to_string()) {
            sources.push(Source {
                stem: stem.to_string(),
                path: path.to_path_buf(),
            });
        } else {
            duplicates.push(path.to_path_buf());
        }
    }

    Ok((sources, duplicates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/nested")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        for file in [
            "a/_AxiVersion.toml",
            "a/nested/_Excluded.toml",
            "a/notes.txt",
            "b/_AxiVersion.toml",
            "b/_PrlSlave.toml",
        ] {
            fs::write(root.join(file), "").unwrap();
        }
        let exclusions = Exclusions::parse(r#"{"_Excluded": "not ready"}"#).unwrap();

        let (sources, duplicates) = collect_sources(root, &exclusions).unwrap();
        let stems: Vec<_> = sources.iter().map(|s| s.stem.as_str()).collect();
        assert_eq!(stems, ["_AxiVersion", "_PrlSlave"]);
        assert_eq!(sources[0].path, root.join("a/_AxiVersion.toml"));
        assert_eq!(sources[0].file_name(), "_AxiVersion.toml");
        assert_eq!(duplicates, [root.join("b/_AxiVersion.toml")]);
    }

    #[test]
    fn test_missing_input_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(collect_sources(&missing, &Exclusions::default()).is_err());
    }
}
