// Licensed under the Apache-2.0 license

//! TOML device descriptions.
//!
//! A description file holds one or more device classes:
//!
//! ```toml
//! [[device]]
//! class = "AxiVersion"
//! description = "AXI-Lite Version Module"
//!
//! [[device.variable]]
//! name = "FpgaVersion"
//! description = "FPGA Firmware Version Number"
//! offset = 0x000
//! mode = "RO"
//!
//! [[device.variable]]
//! name = "UserConstants"
//! offset = 0x100
//! count = 64
//! stride = 4
//!
//! [[device.device]]
//! name = "Core"
//! offset = 0x1000
//!
//! [[device.command]]
//! name = "FpgaReload"
//! offset = 0x104
//! ```
//!
//! Variables default to a 32-bit field at bit 0 with `RW` access. A `count`
//! expands one entry into `name[0]..name[count-1]` spaced `stride` bytes apart.

use crate::error::{ModelError, ModelResult};
use crate::tree::{AccessMode, ChildNode, DeviceTree, NodeKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_BIT_SIZE: u32 = 32;
const DEFAULT_MIN_ACCESS_BYTES: u32 = 4;

fn default_bit_size() -> Bits {
    Bits::One(DEFAULT_BIT_SIZE)
}

fn default_bit_offset() -> Bits {
    Bits::One(0)
}

fn default_min_access_bytes() -> u32 {
    DEFAULT_MIN_ACCESS_BYTES
}

/// A bit size or bit offset, given either as one value or per element.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Bits {
    One(u32),
    Many(Vec<u32>),
}

impl Bits {
    pub fn to_vec(&self) -> Vec<u32> {
        match self {
            Bits::One(v) => vec![*v],
            Bits::Many(v) => v.clone(),
        }
    }
}

/// Parsed contents of one description file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptionFile {
    #[serde(default, rename = "device")]
    pub devices: Vec<Device>,
}

impl DescriptionFile {
    /// Read and validate a description file.
    pub fn from_path(path: &Path) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse and validate description text. `path` is only used in errors.
    pub fn parse(text: &str, path: &Path) -> ModelResult<Self> {
        let file: DescriptionFile = toml::from_str(text).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        for device in &file.devices {
            device.validate()?;
        }
        Ok(file)
    }
}

/// A device class: its register fields, nested devices and commands.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Device {
    /// Class identifier, used as the registry key.
    pub class: String,
    /// Instance name; defaults to the class identifier.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Replica (buffer) count of the whole device.
    #[serde(default)]
    pub replicas: Option<u32>,
    /// Minimum bus access size; field byte widths are rounded up to it.
    #[serde(default = "default_min_access_bytes")]
    pub min_access_bytes: u32,
    #[serde(default, rename = "variable")]
    pub variables: Vec<Variable>,
    #[serde(default, rename = "device")]
    pub devices: Vec<SubDevice>,
    #[serde(default, rename = "command")]
    pub commands: Vec<Command>,
}

impl Device {
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            name: None,
            description: None,
            replicas: None,
            min_access_bytes: DEFAULT_MIN_ACCESS_BYTES,
            variables: vec![],
            devices: vec![],
            commands: vec![],
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn replicas(mut self, replicas: u32) -> Self {
        self.replicas = Some(replicas);
        self
    }

    pub fn variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn sub_device(mut self, device: SubDevice) -> Self {
        self.devices.push(device);
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Name the device is known by: its instance name, or else its class.
    pub fn instance_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.class)
    }

    /// Check the constraints TOML alone cannot express.
    pub fn validate(&self) -> ModelResult<()> {
        let invalid = |name: &str, reason: String| ModelError::InvalidDefinition {
            name: format!("{}.{}", self.class, name),
            reason,
        };
        if self.class.is_empty() {
            return Err(ModelError::InvalidDefinition {
                name: "<device>".to_string(),
                reason: "device class must not be empty".to_string(),
            });
        }
        if self.min_access_bytes == 0 {
            return Err(invalid(
                "min_access_bytes",
                "minimum access size must be at least one byte".to_string(),
            ));
        }
        if self.min_access_bytes.checked_mul(8).is_none() {
            return Err(invalid(
                "min_access_bytes",
                format!("{} bytes is too wide for a bit count", self.min_access_bytes),
            ));
        }
        for var in &self.variables {
            let sizes = var.bit_size.to_vec();
            let offsets = var.bit_offset.to_vec();
            if sizes.is_empty() || offsets.is_empty() {
                return Err(invalid(&var.name, "bit_size and bit_offset must not be empty".into()));
            }
            if sizes.len() != offsets.len() {
                return Err(invalid(
                    &var.name,
                    format!(
                        "bit_size has {} entries but bit_offset has {}",
                        sizes.len(),
                        offsets.len()
                    ),
                ));
            }
            if var.size_bits(self.min_access_bytes).is_none() {
                return Err(invalid(&var.name, "bit layout is too wide for a bit count".into()));
            }
            if var.count.is_some() && var.stride.is_none() {
                return Err(invalid(&var.name, "count requires a stride".into()));
            }
            if end_offset(var.offset, var.count, var.stride).is_none() {
                return Err(invalid(&var.name, "element offsets overflow".into()));
            }
        }
        for dev in &self.devices {
            if dev.count.is_some() && dev.stride.is_none() {
                return Err(invalid(&dev.name, "count requires a stride".into()));
            }
            if end_offset(dev.offset.unwrap_or(0), dev.count, dev.stride).is_none() {
                return Err(invalid(&dev.name, "element offsets overflow".into()));
            }
        }
        Ok(())
    }
}

/// A register field ("remote variable").
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub offset: u64,
    #[serde(default = "default_bit_size")]
    pub bit_size: Bits,
    #[serde(default = "default_bit_offset")]
    pub bit_offset: Bits,
    #[serde(default)]
    pub mode: AccessMode,
    /// Expand into `count` elements named `name[i]`.
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub stride: Option<u64>,
}

impl Variable {
    pub fn new(name: &str, offset: u64) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            offset,
            bit_size: default_bit_size(),
            bit_offset: default_bit_offset(),
            mode: AccessMode::default(),
            count: None,
            stride: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn bit_size(mut self, bit_size: u32) -> Self {
        self.bit_size = Bits::One(bit_size);
        self
    }

    pub fn bit_offset(mut self, bit_offset: u32) -> Self {
        self.bit_offset = Bits::One(bit_offset);
        self
    }

    /// Per-element bit sizes and offsets of a field split across words.
    pub fn bits(mut self, bit_sizes: &[u32], bit_offsets: &[u32]) -> Self {
        self.bit_size = Bits::Many(bit_sizes.to_vec());
        self.bit_offset = Bits::Many(bit_offsets.to_vec());
        self
    }

    pub fn mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn array(mut self, count: u32, stride: u64) -> Self {
        self.count = Some(count);
        self.stride = Some(stride);
        self
    }

    /// Width of the field in bits, rounded up to whole accesses.
    ///
    /// Returns `None` when the bit layout is empty or its width does not
    /// fit in a `u32`.
    pub fn size_bits(&self, min_access_bytes: u32) -> Option<u32> {
        let last_size = *self.bit_size.to_vec().last()?;
        let last_offset = *self.bit_offset.to_vec().last()?;
        let access_bits = min_access_bytes.max(1).checked_mul(8)?;
        let accesses = last_offset.checked_add(last_size)?.div_ceil(access_bits);
        accesses.checked_mul(access_bits)
    }

    fn child_nodes(&self, min_access_bytes: u32) -> Vec<ChildNode> {
        let node = |name: String, offset: u64| ChildNode {
            name,
            description: self.description.clone(),
            offset: Some(offset),
            bit_offsets: Some(self.bit_offset.to_vec()),
            size_bits: self.size_bits(min_access_bytes),
            access_mode: Some(self.mode),
        };
        expand(&self.name, self.offset, self.count, self.stride)
            .into_iter()
            .map(|(name, offset)| node(name, offset))
            .collect()
    }
}

/// A nested device instance, emitted as a reference to its own definition.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubDevice {
    pub name: String,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub stride: Option<u64>,
}

impl SubDevice {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            offset: None,
            count: None,
            stride: None,
        }
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn array(mut self, count: u32, stride: u64) -> Self {
        self.count = Some(count);
        self.stride = Some(stride);
        self
    }

    fn child_nodes(&self) -> Vec<ChildNode> {
        match self.offset {
            Some(offset) => expand(&self.name, offset, self.count, self.stride)
                .into_iter()
                .map(|(name, offset)| ChildNode::new(&name).with_offset(offset))
                .collect(),
            None => expand(&self.name, 0, self.count, self.stride)
                .into_iter()
                .map(|(name, _)| ChildNode::new(&name))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            offset: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn child_node(&self) -> ChildNode {
        ChildNode {
            name: self.name.clone(),
            description: self.description.clone(),
            offset: self.offset,
            ..Default::default()
        }
    }
}

/// Offset of the last element of an arrayed entry, `None` on overflow.
fn end_offset(offset: u64, count: Option<u32>, stride: Option<u64>) -> Option<u64> {
    match count {
        Some(count) if count > 0 => u64::from(count - 1)
            .checked_mul(stride.unwrap_or(0))?
            .checked_add(offset),
        _ => Some(offset),
    }
}

/// Expand an arrayed entry into `(name[i], offset + i * stride)` pairs.
///
/// Expansion stops at the first element whose offset overflows; validated
/// descriptions never reach it.
fn expand(name: &str, offset: u64, count: Option<u32>, stride: Option<u64>) -> Vec<(String, u64)> {
    match count {
        Some(count) => {
            let stride = stride.unwrap_or(0);
            (0..count)
                .map_while(|i| {
                    let element = u64::from(i).checked_mul(stride)?.checked_add(offset)?;
                    Some((format!("{name}[{i}]"), element))
                })
                .collect()
        }
        None => vec![(name.to_string(), offset)],
    }
}

impl DeviceTree for Device {
    fn name(&self) -> Option<&str> {
        Some(self.instance_name())
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn replica_count(&self) -> Option<u32> {
        self.replicas
    }

    fn children(&self, kind: NodeKind) -> Option<Vec<ChildNode>> {
        let children = match kind {
            NodeKind::RegisterField => self
                .variables
                .iter()
                .flat_map(|v| v.child_nodes(self.min_access_bytes))
                .collect(),
            NodeKind::SubDevice => self.devices.iter().flat_map(|d| d.child_nodes()).collect(),
            NodeKind::Command => self.commands.iter().map(|c| c.child_node()).collect(),
        };
        Some(children)
    }
}
