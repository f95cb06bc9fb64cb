//! Latin script membership
//!
//! Ranges follow the Unicode `Scripts.txt` assignments for `Latin`. Common
//! (punctuation, digits, spaces) and Inherited (combining marks) code points
//! are not Latin.

use std::cmp::Ordering;

/// Inclusive code point ranges assigned to the Latin script, sorted
static LATIN: &[(u32, u32)] = &[
    (0x0041, 0x005A),
    (0x0061, 0x007A),
    (0x00AA, 0x00AA),
    (0x00BA, 0x00BA),
    (0x00C0, 0x00D6),
    (0x00D8, 0x00F6),
    (0x00F8, 0x02B8),
    (0x02E0, 0x02E4),
    (0x1D00, 0x1D25),
    (0x1D2C, 0x1D5C),
    (0x1D62, 0x1D65),
    (0x1D6B, 0x1D77),
    (0x1D79, 0x1DBE),
    (0x1E00, 0x1EFF),
    (0x2071, 0x2071),
    (0x207F, 0x207F),
    (0x2090, 0x209C),
    (0x212A, 0x212B),
    (0x2132, 0x2132),
    (0x214E, 0x214E),
    (0x2160, 0x2188),
    (0x2C60, 0x2C7F),
    (0xA722, 0xA787),
    (0xA78B, 0xA7CA),
    (0xA7D0, 0xA7D1),
    (0xA7D3, 0xA7D3),
    (0xA7D5, 0xA7D9),
    (0xA7F2, 0xA7FF),
    (0xAB30, 0xAB5A),
    (0xAB5C, 0xAB64),
    (0xAB66, 0xAB69),
    (0xFB00, 0xFB06),
    (0xFF21, 0xFF3A),
    (0xFF41, 0xFF5A),
    (0x10780, 0x10785),
    (0x10787, 0x107B0),
    (0x107B2, 0x107BA),
    (0x1DF00, 0x1DF1E),
    (0x1DF25, 0x1DF2A),
];

/// Check if `c` belongs to the Latin script
pub fn is_latin(c: char) -> bool {
    let cp = u32::from(c);
    LATIN
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                Ordering::Less
            } else if lo > cp {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(LATIN.windows(2).all(|w| w[0].1 < w[1].0));
        assert!(LATIN.iter().all(|&(lo, hi)| lo <= hi));
    }

    #[test]
    fn test_latin_letters() {
        for c in "tschüßÀÿĀžẞﬀＡ".chars() {
            assert!(is_latin(c), "{c:?} should be Latin");
        }
    }

    #[test]
    fn test_not_latin() {
        for c in "; до свидания 1\u{0308}αא".chars() {
            assert!(!is_latin(c), "{c:?} should not be Latin");
        }
    }
}
