// Licensed under the Apache-2.0 license

//! Least-significant-bit normalization.
//!
//! CPSW addresses fields byte-wise, so `lsBit` must fall within `0..=7`. The
//! raw bit offset of the last element is reduced modulo 8; a result of zero
//! is the schema default and is left out of the document.

/// Byte-local bit position of a field, from its raw bit offsets.
///
/// Returns `None` for an empty offset list.
pub fn ls_bit(bit_offsets: &[u32]) -> Option<u32> {
    bit_offsets.last().map(|&last| last % 8)
}

/// The `lsBit` attribute to write, if any.
pub fn ls_bit_attribute(bit_offsets: &[u32]) -> Option<u32> {
    ls_bit(bit_offsets).filter(|&bit| bit != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ls_bit() {
        assert_eq!(ls_bit(&[0]), Some(0));
        assert_eq!(ls_bit(&[3]), Some(3));
        assert_eq!(ls_bit(&[7]), Some(7));
        assert_eq!(ls_bit(&[8]), Some(0));
        assert_eq!(ls_bit(&[13]), Some(5));
        assert_eq!(ls_bit(&[31]), Some(7));
        assert_eq!(ls_bit(&[]), None);
    }

    #[test]
    fn test_last_offset_is_authoritative() {
        assert_eq!(ls_bit(&[4, 16]), Some(0));
        assert_eq!(ls_bit(&[0, 19]), Some(3));
    }

    #[test]
    fn test_attribute_present_iff_nonzero() {
        for offset in 0..64u32 {
            let attr = ls_bit_attribute(&[offset]);
            if offset % 8 == 0 {
                assert_eq!(attr, None, "offset {offset}");
            } else {
                assert_eq!(attr, Some(offset % 8), "offset {offset}");
            }
        }
    }
}
