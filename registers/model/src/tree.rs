// Licensed under the Apache-2.0 license

//! The capability interface between a device-tree provider and the converter.
//!
//! Every member a provider may or may not support is modeled as an `Option`.
//! Consumers check presence once, at the point where they walk the tree,
//! instead of probing the provider repeatedly.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Category of a device's children. Converters enumerate them in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An addressable register field (a "remote variable").
    RegisterField,
    /// A nested device, referenced by name.
    SubDevice,
    /// A command sequence.
    Command,
}

impl NodeKind {
    /// All kinds, in the order a device's children are emitted.
    pub const ORDERED: [NodeKind; 3] = [
        NodeKind::RegisterField,
        NodeKind::SubDevice,
        NodeKind::Command,
    ];
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::RegisterField => "register field",
            NodeKind::SubDevice => "sub-device",
            NodeKind::Command => "command",
        };
        f.write_str(s)
    }
}

/// Software access mode of a register field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum AccessMode {
    #[default]
    RW,
    RO,
    WO,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::RW => "RW",
            AccessMode::RO => "RO",
            AccessMode::WO => "WO",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RW" => Ok(AccessMode::RW),
            "RO" => Ok(AccessMode::RO),
            "WO" => Ok(AccessMode::WO),
            _ => Err(format!("unknown access mode '{s}', expected RO, RW or WO")),
        }
    }
}

impl TryFrom<String> for AccessMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A read-only view of one child of a device.
///
/// Which members are required depends on the [`NodeKind`] the child was
/// enumerated under; a register field needs `bit_offsets`, `size_bits` and
/// `access_mode`, while a command only needs its name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildNode {
    /// Name, unique among siblings except for `name[k]` array elements.
    pub name: String,
    pub description: Option<String>,
    /// Byte offset from the parent device.
    pub offset: Option<u64>,
    /// Bit offset of each replicated element; the last one is authoritative.
    pub bit_offsets: Option<Vec<u32>>,
    /// Field width in bits, derived from its byte width.
    pub size_bits: Option<u32>,
    pub access_mode: Option<AccessMode>,
}

impl ChildNode {
    /// Create a child with only a name set.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_bit_offsets(mut self, bit_offsets: &[u32]) -> Self {
        self.bit_offsets = Some(bit_offsets.to_vec());
        self
    }

    pub fn with_size_bits(mut self, size_bits: u32) -> Self {
        self.size_bits = Some(size_bits);
        self
    }

    pub fn with_access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = Some(access_mode);
        self
    }
}

/// A hierarchical register-map description.
///
/// Implementations are supplied by the caller; the converter treats them as
/// read-only and never mutates them.
pub trait DeviceTree {
    /// The device's own name. Used as the anchor of the generated document.
    fn name(&self) -> Option<&str>;

    fn description(&self) -> Option<&str>;

    /// Number of replicated buffers this device describes, if any.
    fn replica_count(&self) -> Option<u32> {
        None
    }

    /// Children of the given kind, in declaration order.
    ///
    /// `None` means the provider does not expose this category at all, which
    /// is not an error.
    fn children(&self, kind: NodeKind) -> Option<Vec<ChildNode>>;
}

impl<T: DeviceTree + ?Sized> DeviceTree for Box<T> {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn description(&self) -> Option<&str> {
        (**self).description()
    }

    fn replica_count(&self) -> Option<u32> {
        (**self).replica_count()
    }

    fn children(&self, kind: NodeKind) -> Option<Vec<ChildNode>> {
        (**self).children(kind)
    }
}
