// Licensed under the Apache-2.0 license

use registers_model::{DescriptionFile, DeviceTree, ModelError, NodeKind, SourceRegistry};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PRL_SLAVE: &str = r#"
[[device]]
class = "PrlSlave"
name = "SaltSlave"
description = "Parallel slave interface"
replicas = 2
min_access_bytes = 1

[[device.variable]]
name = "Status"
offset = 0x00
bit_size = [4, 4]
bit_offset = [0, 12]
mode = "ro"

[[device.command]]
name = "Clear"
offset = 0x20

[[device]]
class = "PrlMaster"
"#;

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_load_and_resolve() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "_PrlSlave.toml", PRL_SLAVE);
    let file = DescriptionFile::from_path(&path).unwrap();

    let mut registry = SourceRegistry::new();
    assert!(registry.register_description(&file).is_empty());
    assert_eq!(registry.ids().collect::<Vec<_>>(), ["prlmaster", "prlslave"]);

    let device = registry.resolve("_PrlSlave").unwrap();
    assert_eq!(device.name(), Some("SaltSlave"));
    assert_eq!(device.replica_count(), Some(2));

    let fields = device.children(NodeKind::RegisterField).unwrap();
    assert_eq!(fields.len(), 1);
    // Last element ends at bit 16: two one-byte accesses
    assert_eq!(fields[0].size_bits, Some(16));
    assert_eq!(fields[0].bit_offsets.as_deref(), Some(&[0, 12][..]));
    assert_eq!(fields[0].access_mode.map(|m| m.as_str()), Some("RO"));

    let master = registry.resolve("prlmaster").unwrap();
    assert_eq!(master.name(), Some("PrlMaster"));
    assert_eq!(master.children(NodeKind::Command), Some(vec![]));
}

#[test]
fn test_duplicate_classes_across_files() {
    let dir = TempDir::new().unwrap();
    let first = write(dir.path(), "a.toml", "[[device]]\nclass = \"Dup\"\ndescription = \"first\"\n");
    let second = write(dir.path(), "b.toml", "[[device]]\nclass = \"_dup\"\ndescription = \"second\"\n");

    let mut registry = SourceRegistry::new();
    registry.register_description(&DescriptionFile::from_path(&first).unwrap());
    let duplicates = registry.register_description(&DescriptionFile::from_path(&second).unwrap());
    assert_eq!(duplicates, ["_dup"]);
    assert_eq!(registry.len(), 1);
    let device = registry.resolve("Dup").unwrap();
    assert_eq!(device.description(), Some("first"));
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let err = DescriptionFile::from_path(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ModelError::Io { .. }));

    let path = write(dir.path(), "bad.toml", "[[device]]\nclass = \n");
    let err = DescriptionFile::from_path(&path).unwrap_err();
    assert!(matches!(err, ModelError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}
