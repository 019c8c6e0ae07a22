// Licensed under the Apache-2.0 license

//! Collapsing of bracket-indexed siblings into single array descriptors.
//!
//! Siblings named `X[0]`, `X[1]`, ... `X[N-1]` become one entry `X` whose
//! element count is `N`. The `[0]` element is the representative; its
//! attributes (offset, width, ...) describe the whole array. Later elements
//! only bump the count of the entry already accumulated for their base name.
//!
//! Indices are assumed contiguous and zero-based. They are counted, not
//! checked: `X[0]`, `X[5]` yields a count of 2, and an element seen before
//! any `X[0]` has nothing to attach to and is dropped.

use crate::util::{split_index, IndexedName};
use std::collections::HashMap;

/// One collapsed entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collapsed<T> {
    /// Entry name, with any subscript removed.
    pub name: String,
    /// The representative node.
    pub node: T,
    /// `None` for plain entries and single-element arrays, otherwise the
    /// number of elements observed.
    pub element_count: Option<u32>,
}

/// What [`ArrayCollapser::push`] did with a sibling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// A new entry was started.
    Started,
    /// The element was folded into an existing entry, now `count` long.
    Counted { count: u32 },
    /// The element had no `[0]` representative and was discarded.
    Dropped,
}

/// Keyed accumulator of collapsed siblings.
///
/// ```
/// use registers_cpsw_yaml::array::ArrayCollapser;
///
/// let mut collapser = ArrayCollapser::new();
/// for name in ["Rate[0]", "Rate[1]", "Rate[2]", "Version"] {
///     collapser.push(name, ());
/// }
/// let entries = collapser.finish();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].name, "Rate");
/// assert_eq!(entries[0].element_count, Some(3));
/// assert_eq!(entries[1].element_count, None);
/// ```
#[derive(Clone, Debug)]
pub struct ArrayCollapser<T> {
    entries: Vec<Collapsed<T>>,
    /// Base name → position of its in-progress entry.
    open: HashMap<String, usize>,
}

impl<T> Default for ArrayCollapser<T> {
    fn default() -> Self {
        Self {
            entries: vec![],
            open: HashMap::new(),
        }
    }
}

impl<T> ArrayCollapser<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sibling, in order.
    pub fn push(&mut self, name: &str, node: T) -> Step {
        match split_index(name) {
            IndexedName::Plain(name) => {
                self.start(name, node);
                Step::Started
            }
            IndexedName::Element { base, first: true } => {
                let pos = self.start(base, node);
                self.open.insert(base.to_string(), pos);
                Step::Started
            }
            IndexedName::Element { base, first: false } => match self.open.get(base) {
                Some(&pos) => {
                    let entry = &mut self.entries[pos];
                    let count = entry.element_count.map_or(2, |count| count + 1);
                    entry.element_count = Some(count);
                    Step::Counted { count }
                }
                None => Step::Dropped,
            },
        }
    }

    /// The collapsed entries, in order of their first appearance.
    pub fn finish(self) -> Vec<Collapsed<T>> {
        self.entries
    }

    fn start(&mut self, name: &str, node: T) -> usize {
        self.entries.push(Collapsed {
            name: name.to_string(),
            node,
            element_count: None,
        });
        self.entries.len() - 1
    }
}
