// Licensed under the Apache-2.0 license

//! The insertion-ordered configuration document.
//!
//! Key order in the output is meaningful: anchors must be defined before
//! they are referenced, and readers expect children in declaration order.
//! [`OrderedMap`] keeps entries in insertion order and serializes them in
//! that order, unlike a hash map.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A scalar or nested mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(u64),
    Map(OrderedMap),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(u64::from(v))
    }
}

impl From<OrderedMap> for Value {
    fn from(m: OrderedMap) -> Self {
        Value::Map(m)
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<u64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrderedMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// A mapping that preserves insertion order.
///
/// Inserting an existing key replaces its value in place; the key keeps the
/// position of its first insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedMap {
    entries: IndexMap<String, Value>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous value of `key`.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.to_string(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a nested mapping by path, e.g. `["children", "Version", "at"]`.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let value = self.get(first)?;
        if rest.is_empty() {
            Some(value)
        } else {
            value.as_map()?.get_path(rest)
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(v) => serializer.serialize_u64(*v),
            Value::Map(m) => m.serialize(serializer),
        }
    }
}

/// A complete document, built once per device tree and then serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    root: OrderedMap,
}

impl ConfigDocument {
    pub fn new(root: OrderedMap) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &OrderedMap {
        &self.root
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = OrderedMap::new();
        for key in ["zeta", "alpha", "mid", "beta"] {
            map.insert(key, key);
        }
        assert_eq!(map.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid", "beta"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("#", "first");
        map.insert("A", 1u64);
        let previous = map.insert("#", "second");
        assert_eq!(previous, Some(Value::from("first")));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["#", "A"]);
        assert_eq!(map.get("#").and_then(Value::as_str), Some("second"));
    }

    #[test]
    fn test_get_path() {
        let mut at = OrderedMap::new();
        at.insert("offset", "0x10");
        let mut field = OrderedMap::new();
        field.insert("at", at);
        let mut root = OrderedMap::new();
        root.insert("Field", field);
        assert_eq!(
            root.get_path(&["Field", "at", "offset"])
                .and_then(Value::as_str),
            Some("0x10")
        );
        assert!(root.get_path(&["Field", "missing"]).is_none());
        assert!(root.get_path(&[]).is_none());
    }
}
