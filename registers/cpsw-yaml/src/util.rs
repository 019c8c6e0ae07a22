// Licensed under the Apache-2.0 license

//! Utility functions for name splitting and value formatting.

/// Formats an integer the way the CPSW dialect writes addresses.
///
/// Always lowercase hex with a `0x` prefix and no digit separators.
///
/// # Examples
/// ```
/// use registers_cpsw_yaml::util::hex;
/// assert_eq!(hex(0), "0x0");
/// assert_eq!(hex(0x10), "0x10");
/// assert_eq!(hex(0xFFC), "0xffc");
/// ```
pub fn hex(val: u64) -> String {
    format!("{val:#x}")
}

/// An array element name split at its first bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexedName<'a> {
    /// No bracket in the name.
    Plain(&'a str),
    /// `base[...]`, with `first` set when the subscript starts with `[0]`.
    Element { base: &'a str, first: bool },
}

/// Split `name[k]` into its base name and whether it is the index-0 element.
///
/// Only the first bracket is considered, so `Lane[0][3]` counts as a first
/// element of `Lane`. Subscripts are not otherwise validated.
///
/// # Examples
/// ```
/// use registers_cpsw_yaml::util::{split_index, IndexedName};
/// assert_eq!(split_index("Version"), IndexedName::Plain("Version"));
/// assert_eq!(split_index("Rate[0]"), IndexedName::Element { base: "Rate", first: true });
/// assert_eq!(split_index("Rate[12]"), IndexedName::Element { base: "Rate", first: false });
/// ```
pub fn split_index(name: &str) -> IndexedName<'_> {
    match name.find('[') {
        Some(pos) => IndexedName::Element {
            base: &name[..pos],
            first: name[pos..].starts_with("[0]"),
        },
        None => IndexedName::Plain(name),
    }
}

/// Number of leading whitespace bytes in `line`.
pub fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// A run of `width` `#` characters indented by `indent` spaces.
pub fn banner(indent: usize, width: usize) -> String {
    format!("{}{}", " ".repeat(indent), "#".repeat(width))
}
