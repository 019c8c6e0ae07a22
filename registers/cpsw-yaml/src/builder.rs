// Licensed under the Apache-2.0 license

//! Assembly of the [`ConfigDocument`] from a [`DeviceWalk`].
//!
//! ## Document Layout
//!
//! ```text
//! AxiVersion: '&AxiVersion'          # anchor entry named after the device
//! __root__:                          # removed when emitted
//!   description: ...
//!   configPrio: 1
//!   class: MMIODev
//!   size: '0x8'
//!   metadata:                        # only with a replica count
//!     numBuffers: '&numBuffers 4'
//!   children:
//!     '#': '####################'    # banner anchor, shared by all children
//!     FpgaVersion:
//!       at: {offset, [nelms], byteOrder, [nelms]}
//!       description / class / sizeBits / [lsBit] / mode
//!       '##': '####################' # banner anchor closing the child
//!     Core:
//!       '<<': '*Core'
//!       at: {offset, [nelms]}
//!     FpgaReload:
//!       at: {offset}
//!       name / description / class
//! ```
//!
//! The `#` and `##` keys are placeholders for the banners written by
//! [`crate::postprocess`]. Because every child inserts the same `#` key into
//! the children mapping, only its first insertion keeps a position.

use crate::array::{ArrayCollapser, Collapsed, Step};
use crate::document::{ConfigDocument, OrderedMap};
use crate::lsbit::ls_bit_attribute;
use crate::sink::{sink_debug, sink_warn};
use crate::util::hex;
use crate::walk::{CommandNode, DeviceRef, DeviceWalk, RegisterField};
use log::Log;

/// Key holding the device body; dropped from the emitted text.
pub const ROOT_KEY: &str = "__root__";
pub const CHILDREN_KEY: &str = "children";
/// Placeholder key opening a child's banner.
pub const BANNER_KEY: &str = "#";
/// Placeholder key closing a child's banner.
pub const BANNER_END_KEY: &str = "##";
pub const BANNER_VALUE: &str = "####################";

pub const ROOT_CLASS: &str = "MMIODev";
pub const FIELD_CLASS: &str = "IntField";
pub const COMMAND_CLASS: &str = "SequenceCommand";
pub const CONFIG_PRIO: u64 = 1;
pub const ROOT_SIZE: u64 = 0x8;
pub const BYTE_ORDER: &str = "BE";
pub const DEFAULT_COMMAND_OFFSET: u64 = 0;
pub const REPLICA_ANCHOR: &str = "numBuffers";

/// Build the document for one walked device.
pub fn build_document(walk: &DeviceWalk, sink: &dyn Log) -> ConfigDocument {
    let mut top = OrderedMap::new();
    if let Some(name) = &walk.name {
        top.insert(name, format!("&{name}"));
    }

    let mut root = OrderedMap::new();
    if let Some(description) = &walk.description {
        root.insert("description", description.as_str());
    }
    root.insert("configPrio", CONFIG_PRIO);
    root.insert("class", ROOT_CLASS);
    root.insert("size", hex(ROOT_SIZE));

    let replicas = (walk.replica_count != 0).then_some(walk.replica_count);
    if let Some(count) = replicas {
        let mut metadata = OrderedMap::new();
        metadata.insert(REPLICA_ANCHOR, format!("&{REPLICA_ANCHOR} {count}"));
        root.insert("metadata", metadata);
    }

    let mut children = OrderedMap::new();
    for field in collapse(&walk.fields, |f| &f.name, sink) {
        insert_child(&mut children, &field.name, field_entry(&field, replicas));
    }
    for device in collapse(&walk.devices, |d| &d.name, sink) {
        insert_child(&mut children, &device.name, device_entry(&device));
    }
    for command in &walk.commands {
        insert_child(&mut children, &command.name, command_entry(command));
    }
    sink_debug!(
        sink,
        "Built {} children entries from {} nodes for '{}'",
        children.len(),
        walk.child_count(),
        walk.name.as_deref().unwrap_or("<unnamed>")
    );
    root.insert(CHILDREN_KEY, children);

    top.insert(ROOT_KEY, root);
    ConfigDocument::new(top)
}

fn collapse<'a, T>(
    nodes: &'a [T],
    name: impl Fn(&'a T) -> &'a String,
    sink: &dyn Log,
) -> Vec<Collapsed<&'a T>> {
    let mut collapser = ArrayCollapser::new();
    for node in nodes {
        let name = name(node);
        if collapser.push(name, node) == Step::Dropped {
            sink_warn!(sink, "Dropping '{name}': no [0] element precedes it");
        }
    }
    collapser.finish()
}

/// Wrap `entry` in banner anchors and add it to `children`.
fn insert_child(children: &mut OrderedMap, name: &str, mut entry: OrderedMap) {
    children.insert(BANNER_KEY, BANNER_VALUE);
    entry.insert(BANNER_END_KEY, BANNER_VALUE);
    children.insert(name, entry);
}

fn field_entry(field: &Collapsed<&RegisterField>, replicas: Option<u32>) -> OrderedMap {
    let node = field.node;

    let mut at = OrderedMap::new();
    at.insert("offset", hex(node.offset));
    if replicas.is_some() {
        at.insert("nelms", format!("*{REPLICA_ANCHOR}"));
    }
    at.insert("byteOrder", BYTE_ORDER);
    if let (None, Some(count)) = (replicas, field.element_count) {
        at.insert("nelms", count);
    }

    let mut entry = OrderedMap::new();
    entry.insert("at", at);
    if let Some(description) = &node.description {
        entry.insert("description", description.as_str());
    }
    entry.insert("class", FIELD_CLASS);
    entry.insert("sizeBits", node.size_bits);
    if let Some(ls_bit) = ls_bit_attribute(&node.bit_offsets) {
        entry.insert("lsBit", ls_bit);
    }
    entry.insert("mode", node.mode.as_str());
    entry
}

fn device_entry(device: &Collapsed<&DeviceRef>) -> OrderedMap {
    let mut at = OrderedMap::new();
    if let Some(offset) = device.node.offset {
        at.insert("offset", hex(offset));
    }
    if let Some(count) = device.element_count {
        at.insert("nelms", count);
    }

    let mut entry = OrderedMap::new();
    entry.insert("<<", format!("*{}", device.name));
    entry.insert("at", at);
    entry
}

fn command_entry(command: &CommandNode) -> OrderedMap {
    let mut at = OrderedMap::new();
    at.insert(
        "offset",
        hex(command.offset.unwrap_or(DEFAULT_COMMAND_OFFSET)),
    );

    let mut entry = OrderedMap::new();
    entry.insert("at", at);
    entry.insert("name", command.name.as_str());
    if let Some(description) = &command.description {
        entry.insert("description", description.as_str());
    }
    entry.insert("class", COMMAND_CLASS);
    entry
}
