//! Predicate-driven character removal
//!
//! Copies UTF-8 input to the output unchanged, except for characters the
//! predicate selects, which are dropped. A unit is always copied whole or
//! not at all.

use std::fmt;

use super::{Progress, Status, Transformer};
use crate::encoding::utf8::{self, Unit};

/// Removes every character for which the predicate returns true
pub struct RemoveFilter<F> {
    predicate: F,
    /// Emit U+FFFD instead of copying kept invalid bytes verbatim
    replace_invalid: bool,
}

/// Shorthand for [`RemoveFilter::new`]
pub fn remove<F: Fn(char) -> bool>(predicate: F) -> RemoveFilter<F> {
    RemoveFilter::new(predicate)
}

impl<F: Fn(char) -> bool> RemoveFilter<F> {
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            replace_invalid: false,
        }
    }

    /// Replace kept invalid bytes with U+FFFD.
    ///
    /// Without this, removing a character between two stray bytes can splice
    /// them into a valid sequence the predicate never saw.
    pub fn replace_invalid(mut self, enabled: bool) -> Self {
        self.replace_invalid = enabled;
        self
    }
}

impl<F: Fn(char) -> bool> Transformer for RemoveFilter<F> {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let mut written = 0;
        let mut read = 0;

        while read < src.len() {
            let rest = &src[read..];
            let (kept, size): (&[u8], usize) = match utf8::decode(rest) {
                Unit::Char(c, len) => {
                    if (self.predicate)(c) {
                        (&rest[..0], len)
                    } else {
                        (&rest[..len], len)
                    }
                }
                Unit::Incomplete if !at_eof => {
                    return Progress::new(written, read, Status::ShortSource);
                }
                // Invalid bytes are single-byte units seen by the predicate as U+FFFD
                Unit::Invalid | Unit::Incomplete => {
                    if (self.predicate)(char::REPLACEMENT_CHARACTER) {
                        (&rest[..0], 1)
                    } else if self.replace_invalid {
                        (utf8::REPLACEMENT, 1)
                    } else {
                        (&rest[..1], 1)
                    }
                }
            };

            if written + kept.len() > dst.len() {
                return Progress::new(written, read, Status::ShortDestination);
            }
            dst[written..written + kept.len()].copy_from_slice(kept);
            written += kept.len();
            read += size;
        }

        Progress::done(written, read)
    }

    fn reset(&mut self) {}

    fn max_output_len(&self, src_len: usize) -> usize {
        if self.replace_invalid {
            src_len * utf8::REPLACEMENT.len()
        } else {
            src_len
        }
    }
}

impl<F> fmt::Debug for RemoveFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoveFilter")
            .field("replace_invalid", &self.replace_invalid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{apply, transform_to_vec};

    const INPUT: &str = "tschüß; до свидания";

    #[test]
    fn test_remove_whitespace() {
        let mut filter = remove(char::is_whitespace);
        let mut dst = vec![0u8; INPUT.len()];
        let progress = apply(&mut filter, &mut dst, INPUT.as_bytes());

        assert_eq!(progress.status, Status::Done);
        assert_eq!(&dst[..progress.written], "tschüß;досвидания".as_bytes());
    }

    #[test]
    fn test_remove_nothing() {
        let mut filter = remove(|_| false);
        let out = transform_to_vec(&mut filter, INPUT.as_bytes()).unwrap();
        assert_eq!(out, INPUT.as_bytes());
    }

    #[test]
    fn test_short_destination_keeps_units_whole() {
        let mut filter = remove(|c| c == ' ');
        // "ü" needs two bytes but only one is left after "tsch"
        let mut dst = [0u8; 5];
        let progress = filter.transform(&mut dst, "tschü".as_bytes(), true);

        assert_eq!(progress, Progress::new(4, 4, Status::ShortDestination));
        assert_eq!(&dst[..4], b"tsch");
    }

    #[test]
    fn test_short_source_mid_character() {
        let mut filter = remove(|c| c == ' ');
        let bytes = "aü".as_bytes();
        let mut dst = [0u8; 8];

        let progress = filter.transform(&mut dst, &bytes[..2], false);
        assert_eq!(progress, Progress::new(1, 1, Status::ShortSource));

        let progress = filter.transform(&mut dst, &bytes[1..], false);
        assert_eq!(progress, Progress::done(2, 2));
        assert_eq!(&dst[..2], "ü".as_bytes());
    }

    #[test]
    fn test_truncated_tail_at_eof_is_single_byte_unit() {
        let mut filter = remove(|c| c == ' ');
        let mut dst = [0u8; 8];
        let progress = filter.transform(&mut dst, &[b'a', 0xC3], true);

        assert_eq!(progress, Progress::done(2, 2));
        assert_eq!(&dst[..2], &[b'a', 0xC3]);
    }

    #[test]
    fn test_invalid_bytes_are_copied_verbatim() {
        let mut filter = remove(|c| c == 'x');
        let out = transform_to_vec(&mut filter, &[b'a', 0xFF, b'x', b'b']).unwrap();
        assert_eq!(out, &[b'a', 0xFF, b'b']);
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut filter = remove(|c| c == 'x').replace_invalid(true);
        let out = transform_to_vec(&mut filter, &[0xC3, b'x', 0xBC]).unwrap();
        assert_eq!(out, "\u{FFFD}\u{FFFD}".as_bytes());
    }

    #[test]
    fn test_predicate_sees_replacement_character() {
        let mut filter = remove(|c| c == char::REPLACEMENT_CHARACTER);
        let out = transform_to_vec(&mut filter, &[b'o', 0x80, b'k']).unwrap();
        assert_eq!(out, b"ok");
    }
}
