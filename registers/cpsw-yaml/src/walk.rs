// Licensed under the Apache-2.0 license

//! Tree walk: the single point where provider capabilities are checked.
//!
//! [`walk`] enumerates a device's register fields, nested devices and
//! commands in that order and validates each child once. Everything after
//! the walk works on plain, fully populated values.

use crate::error::{ConvertError, ConvertResult};
use registers_model::{AccessMode, ChildNode, DeviceTree, NodeKind};

/// A register field with every attribute the dialect needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterField {
    pub name: String,
    pub description: Option<String>,
    pub offset: u64,
    /// Never empty.
    pub bit_offsets: Vec<u32>,
    pub size_bits: u32,
    pub mode: AccessMode,
}

/// A nested device, referenced by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRef {
    pub name: String,
    pub offset: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandNode {
    pub name: String,
    pub description: Option<String>,
    pub offset: Option<u64>,
}

/// Ordered, validated view of one device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceWalk {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Zero when the provider reports no replicas.
    pub replica_count: u32,
    pub fields: Vec<RegisterField>,
    pub devices: Vec<DeviceRef>,
    pub commands: Vec<CommandNode>,
}

impl DeviceWalk {
    /// Total number of children across all kinds.
    pub fn child_count(&self) -> usize {
        self.fields.len() + self.devices.len() + self.commands.len()
    }
}

/// Walk `device` and validate its children.
///
/// A category the provider does not expose yields an empty sequence. A child
/// missing a required attribute fails the whole walk with
/// [`ConvertError::MalformedNode`].
pub fn walk(device: &dyn DeviceTree) -> ConvertResult<DeviceWalk> {
    let mut walk = DeviceWalk {
        name: device.name().map(str::to_string),
        description: device.description().map(str::to_string),
        replica_count: device.replica_count().unwrap_or(0),
        ..Default::default()
    };

    for kind in NodeKind::ORDERED {
        let children = device.children(kind).unwrap_or_default();
        for child in children {
            match kind {
                NodeKind::RegisterField => walk.fields.push(register_field(child)?),
                NodeKind::SubDevice => walk.devices.push(DeviceRef {
                    name: child.name,
                    offset: child.offset,
                }),
                NodeKind::Command => walk.commands.push(CommandNode {
                    name: child.name,
                    description: child.description,
                    offset: child.offset,
                }),
            }
        }
    }

    Ok(walk)
}

fn register_field(child: ChildNode) -> ConvertResult<RegisterField> {
    let missing = |attribute| ConvertError::MalformedNode {
        kind: NodeKind::RegisterField,
        node: child.name.clone(),
        attribute,
    };
    let offset = child.offset.ok_or_else(|| missing("offset"))?;
    let bit_offsets = match &child.bit_offsets {
        Some(offsets) if !offsets.is_empty() => offsets.clone(),
        _ => return Err(missing("bitOffsets")),
    };
    let size_bits = child.size_bits.ok_or_else(|| missing("sizeBits"))?;
    let mode = child.access_mode.ok_or_else(|| missing("accessMode"))?;

    Ok(RegisterField {
        name: child.name,
        description: child.description,
        offset,
        bit_offsets,
        size_bits,
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use registers_model::{Command, Device, SubDevice, Variable};

    /// A provider that only exposes some categories.
    struct Partial {
        fields: Option<Vec<ChildNode>>,
    }

    impl DeviceTree for Partial {
        fn name(&self) -> Option<&str> {
            None
        }
        fn description(&self) -> Option<&str> {
            None
        }
        fn children(&self, kind: NodeKind) -> Option<Vec<ChildNode>> {
            match kind {
                NodeKind::RegisterField => self.fields.clone(),
                _ => None,
            }
        }
    }

    #[test]
    fn test_walk_order_and_values() {
        let device = Device::new("Dev")
            .with_description("A device")
            .command(Command::new("Reset"))
            .sub_device(SubDevice::new("Core").offset(0x1000))
            .variable(Variable::new("Version", 0x0).mode(AccessMode::RO));
        let walk = walk(&device).unwrap();
        assert_eq!(walk.name.as_deref(), Some("Dev"));
        assert_eq!(walk.fields[0].name, "Version");
        assert_eq!(walk.fields[0].size_bits, 32);
        assert_eq!(walk.devices[0].offset, Some(0x1000));
        assert_eq!(walk.commands[0].offset, None);
        assert_eq!(walk.child_count(), 3);
        assert_eq!(walk.replica_count, 0);
    }

    #[test]
    fn test_missing_categories_are_empty() {
        let walk = walk(&Partial { fields: None }).unwrap();
        assert_eq!(walk, DeviceWalk::default());
    }

    #[test]
    fn test_malformed_field() {
        let node = ChildNode::new("Broken")
            .with_offset(4)
            .with_size_bits(32)
            .with_access_mode(AccessMode::RW);
        let err = walk(&Partial {
            fields: Some(vec![node]),
        })
        .unwrap_err();
        match err {
            ConvertError::MalformedNode {
                kind,
                node,
                attribute,
            } => {
                assert_eq!(kind, NodeKind::RegisterField);
                assert_eq!(node, "Broken");
                assert_eq!(attribute, "bitOffsets");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_bit_offsets_are_malformed() {
        let device = Device::new("Dev").variable(Variable::new("Empty", 0).bits(&[], &[]));
        let err = walk(&device).unwrap_err();
        assert_eq!(err.to_string(), "register field 'Empty' has no bitOffsets");
    }
}
