// Licensed under the Apache-2.0 license

//! YAML serialization of a [`ConfigDocument`].
//!
//! The document is written in block style, keys in insertion order, with the
//! `__root__:` line removed so the device body nests directly under the
//! anchor entry.

use crate::builder::ROOT_KEY;
use crate::document::ConfigDocument;
use crate::error::ConvertResult;

/// Serialize `document` to YAML text, without the `__root__` line.
pub fn emit(document: &ConfigDocument) -> ConvertResult<String> {
    let text = serde_yaml::to_string(document)?;
    Ok(text.replace(&format!("{ROOT_KEY}:\n"), ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::OrderedMap;

    #[test]
    fn test_root_line_removed() {
        let mut root = OrderedMap::new();
        root.insert("configPrio", 1u64);
        root.insert("class", "MMIODev");
        let mut top = OrderedMap::new();
        top.insert("Dev", "&Dev");
        top.insert(ROOT_KEY, root);

        let text = emit(&ConfigDocument::new(top)).unwrap();
        assert_eq!(text, "Dev: '&Dev'\n  configPrio: 1\n  class: MMIODev\n");
    }

    #[test]
    fn test_keys_in_insertion_order() {
        let mut at = OrderedMap::new();
        at.insert("offset", "0x10");
        at.insert("byteOrder", "BE");
        let mut top = OrderedMap::new();
        top.insert("zz", at);
        top.insert("aa", 2u64);

        let text = emit(&ConfigDocument::new(top)).unwrap();
        assert_eq!(text, "zz:\n  offset: '0x10'\n  byteOrder: BE\naa: 2\n");
    }

    #[test]
    fn test_banner_keys_are_quoted() {
        let mut top = OrderedMap::new();
        top.insert("#", "####################");
        top.insert("##", "####################");
        let text = emit(&ConfigDocument::new(top)).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "'#': '####################'");
        assert_eq!(lines[1], "'##': '####################'");
    }

    #[test]
    fn test_long_scalars_not_folded() {
        let description = "Version register holding the firmware build identifier, \
                           the git hash and the build timestamp of the FPGA image";
        assert!(description.len() > 100);
        let mut root = OrderedMap::new();
        root.insert("description", description);
        let mut top = OrderedMap::new();
        top.insert("Dev", "&Dev");
        top.insert(ROOT_KEY, root);

        let text = emit(&ConfigDocument::new(top)).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(
            text.lines().nth(1),
            Some(format!("  description: {description}").as_str())
        );
    }
}
