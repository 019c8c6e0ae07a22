// Licensed under the Apache-2.0 license

use log::LevelFilter;
use registers_cpsw_yaml::config::DEFAULT_LICENSE_BANNER;
use registers_cpsw_yaml::{Converter, ConverterConfig, Outcome, SkipReason};
use registers_model::{AccessMode, Command, Device, SubDevice, Variable};
use simple_logger::SimpleLogger;
use std::fs;
use tempfile::TempDir;

fn banner80(indent: usize) -> String {
    format!("{}{}", " ".repeat(indent), "#".repeat(80))
}

fn axi_version() -> Device {
    Device::new("AxiVersion")
        .with_description("AXI-Lite Version Module")
        .variable(
            Variable::new("FpgaVersion", 0x0)
                .description("FPGA Firmware Version Number")
                .mode(AccessMode::RO),
        )
}

/// Rendered body without the license banner and directives.
fn body(device: &Device) -> String {
    let config = ConverterConfig::with_defaults().license_banner(&[]);
    let converter = Converter::new(&config, log::logger());
    let text = converter.render(device, "Dev.yaml").unwrap();
    let header = "#schemaversion 3.0.0 \n#once Dev.yaml \n\n\n";
    assert!(text.starts_with(header));
    text[header.len()..].to_string()
}

#[test]
fn test_golden_axi_version() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Info).init();

    let dir = TempDir::new().unwrap();
    let config = ConverterConfig::with_defaults();
    let converter = Converter::new(&config, log::logger());
    let outcome = converter
        .convert(&axi_version(), dir.path(), "AxiVersion.yaml")
        .unwrap();
    let path = dir.path().join("AxiVersion.yaml");
    assert_eq!(outcome, Outcome::Written(path.clone()));

    let mut expected = String::new();
    for line in DEFAULT_LICENSE_BANNER {
        expected.push_str(line);
        expected.push('\n');
    }
    expected.push_str("#schemaversion 3.0.0 \n");
    expected.push_str("#once AxiVersion.yaml \n\n\n");
    expected.push_str(&format!(
        "AxiVersion: &AxiVersion
  description: AXI-Lite Version Module
  configPrio: 1
  class: MMIODev
  size: 0x8
  ##########
  children:
  ##########
{b}
    FpgaVersion:
      at:
        offset: 0x0
        byteOrder: BE
      description: FPGA Firmware Version Number
      class: IntField
      sizeBits: 32
      mode: RO
{b}
",
        b = banner80(4)
    ));

    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    assert!(!dir.path().join("AxiVersion.yaml.tmp").exists());
}

#[test]
fn test_existing_output_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("AxiVersion.yaml");
    fs::write(&path, "hand edited\n").unwrap();

    let config = ConverterConfig::with_defaults();
    let converter = Converter::new(&config, log::logger());
    let outcome = converter
        .convert(&axi_version(), dir.path(), "AxiVersion.yaml")
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Skipped(SkipReason::OutputExists { path: path.clone() })
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "hand edited\n");
}

#[test]
fn test_conversion_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let config = ConverterConfig::with_defaults();
    let converter = Converter::new(&config, log::logger());
    for dir in [&first, &second] {
        converter
            .convert(&axi_version(), dir.path(), "AxiVersion.yaml")
            .unwrap();
    }
    assert_eq!(
        fs::read(first.path().join("AxiVersion.yaml")).unwrap(),
        fs::read(second.path().join("AxiVersion.yaml")).unwrap()
    );
}

#[test]
fn test_single_register_field() {
    let device = Device::new("Dev").variable(
        Variable::new("Version", 0x10)
            .description("Test")
            .bit_size(32)
            .bit_offset(0)
            .mode(AccessMode::RO),
    );
    let text = body(&device);
    assert!(text.contains(
        "    Version:
      at:
        offset: 0x10
        byteOrder: BE
      description: Test
      class: IntField
      sizeBits: 32
      mode: RO
"
    ));
    assert!(!text.contains("lsBit"));
    assert!(!text.contains('\''));
}

#[test]
fn test_arrays_and_ls_bit() {
    let device = Device::new("Dev")
        .variable(Variable::new("Rate", 0x100).array(4, 4).mode(AccessMode::RO))
        .variable(Variable::new("Flag", 0x200).bit_size(1).bit_offset(13));
    let text = body(&device);
    assert!(text.contains(
        "    Rate:
      at:
        offset: 0x100
        byteOrder: BE
        nelms: 4
"
    ));
    assert!(!text.contains("Rate[1]"));
    assert!(text.contains("      lsBit: 5\n"));
}

#[test]
fn test_replicated_device() {
    let device = Device::new("Buffers")
        .replicas(8)
        .variable(Variable::new("Ptr", 0x0).array(8, 4));
    let text = body(&device);
    assert!(text.contains("  metadata:\n    numBuffers: &numBuffers 8\n"));
    assert!(text.contains(
        "      at:
        offset: 0x0
        nelms: *numBuffers
        byteOrder: BE
"
    ));
}

#[test]
fn test_devices_and_commands() {
    let device = Device::new("Top")
        .sub_device(SubDevice::new("Lane").offset(0x1000).array(2, 0x100))
        .command(Command::new("Reset").offset(0x104).description("Reset counters"));
    let text = body(&device);
    assert!(text.contains(
        "    Lane:
      <<: *Lane
      at:
        offset: 0x1000
        nelms: 2
"
    ));
    assert!(text.contains(
        "    Reset:
      at:
        offset: 0x104
      name: Reset
      description: Reset counters
      class: SequenceCommand
"
    ));
    // One opening banner for all children, one closing banner per child
    let banners = text.lines().filter(|l| *l == banner80(4)).count();
    assert_eq!(banners, 3);
}
