//! Canonical (de)composition of accented Latin-1 letters
//!
//! `Nfd` splits a precomposed letter into its base letter followed by a
//! combining mark; `Nfc` joins such pairs back. The composition table only
//! covers the Latin-1 Supplement letters.

use crate::encoding::utf8::{self, Unit};
use crate::transform::{Progress, Status, Transformer};

/// (composite, base, combining mark), sorted by composite
static COMPOSITIONS: &[(char, char, char)] = &[
    ('À', 'A', '\u{0300}'),
    ('Á', 'A', '\u{0301}'),
    ('Â', 'A', '\u{0302}'),
    ('Ã', 'A', '\u{0303}'),
    ('Ä', 'A', '\u{0308}'),
    ('Å', 'A', '\u{030A}'),
    ('Ç', 'C', '\u{0327}'),
    ('È', 'E', '\u{0300}'),
    ('É', 'E', '\u{0301}'),
    ('Ê', 'E', '\u{0302}'),
    ('Ë', 'E', '\u{0308}'),
    ('Ì', 'I', '\u{0300}'),
    ('Í', 'I', '\u{0301}'),
    ('Î', 'I', '\u{0302}'),
    ('Ï', 'I', '\u{0308}'),
    ('Ñ', 'N', '\u{0303}'),
    ('Ò', 'O', '\u{0300}'),
    ('Ó', 'O', '\u{0301}'),
    ('Ô', 'O', '\u{0302}'),
    ('Õ', 'O', '\u{0303}'),
    ('Ö', 'O', '\u{0308}'),
    ('Ù', 'U', '\u{0300}'),
    ('Ú', 'U', '\u{0301}'),
    ('Û', 'U', '\u{0302}'),
    ('Ü', 'U', '\u{0308}'),
    ('Ý', 'Y', '\u{0301}'),
    ('à', 'a', '\u{0300}'),
    ('á', 'a', '\u{0301}'),
    ('â', 'a', '\u{0302}'),
    ('ã', 'a', '\u{0303}'),
    ('ä', 'a', '\u{0308}'),
    ('å', 'a', '\u{030A}'),
    ('ç', 'c', '\u{0327}'),
    ('è', 'e', '\u{0300}'),
    ('é', 'e', '\u{0301}'),
    ('ê', 'e', '\u{0302}'),
    ('ë', 'e', '\u{0308}'),
    ('ì', 'i', '\u{0300}'),
    ('í', 'i', '\u{0301}'),
    ('î', 'i', '\u{0302}'),
    ('ï', 'i', '\u{0308}'),
    ('ñ', 'n', '\u{0303}'),
    ('ò', 'o', '\u{0300}'),
    ('ó', 'o', '\u{0301}'),
    ('ô', 'o', '\u{0302}'),
    ('õ', 'o', '\u{0303}'),
    ('ö', 'o', '\u{0308}'),
    ('ù', 'u', '\u{0300}'),
    ('ú', 'u', '\u{0301}'),
    ('û', 'u', '\u{0302}'),
    ('ü', 'u', '\u{0308}'),
    ('ý', 'y', '\u{0301}'),
    ('ÿ', 'y', '\u{0308}'),
];

fn decompose(c: char) -> Option<(char, char)> {
    COMPOSITIONS
        .binary_search_by_key(&c, |&(composite, _, _)| composite)
        .ok()
        .map(|i| (COMPOSITIONS[i].1, COMPOSITIONS[i].2))
}

fn compose(base: char, mark: char) -> Option<char> {
    COMPOSITIONS
        .iter()
        .find(|&&(_, b, m)| b == base && m == mark)
        .map(|&(composite, _, _)| composite)
}

fn is_base(c: char) -> bool {
    c.is_ascii_alphabetic() && COMPOSITIONS.iter().any(|&(_, b, _)| b == c)
}

/// Write `bytes` at `dst[*written..]`, or report that they do not fit
fn put(dst: &mut [u8], written: &mut usize, bytes: &[u8]) -> bool {
    if *written + bytes.len() > dst.len() {
        return false;
    }
    dst[*written..*written + bytes.len()].copy_from_slice(bytes);
    *written += bytes.len();
    true
}

/// Canonical decomposition
#[derive(Clone, Copy, Debug, Default)]
pub struct Nfd;

impl Transformer for Nfd {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let mut written = 0;
        let mut read = 0;

        while read < src.len() {
            let rest = &src[read..];
            let (fits, len) = match utf8::decode(rest) {
                Unit::Char(c, len) => match decompose(c) {
                    Some((base, mark)) => {
                        let mut pair = [0u8; 8];
                        let n = base.encode_utf8(&mut pair).len();
                        let m = mark.encode_utf8(&mut pair[n..]).len();
                        (put(dst, &mut written, &pair[..n + m]), len)
                    }
                    None => (put(dst, &mut written, &rest[..len]), len),
                },
                Unit::Incomplete if !at_eof => {
                    return Progress::new(written, read, Status::ShortSource);
                }
                // Invalid bytes pass through untouched
                Unit::Invalid | Unit::Incomplete => (put(dst, &mut written, &rest[..1]), 1),
            };
            if !fits {
                return Progress::new(written, read, Status::ShortDestination);
            }
            read += len;
        }

        Progress::done(written, read)
    }

    fn reset(&mut self) {}

    fn max_output_len(&self, src_len: usize) -> usize {
        src_len * 3 / 2
    }
}

/// Canonical composition of base letter + combining mark pairs
#[derive(Clone, Copy, Debug, Default)]
pub struct Nfc;

impl Transformer for Nfc {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let mut written = 0;
        let mut read = 0;

        while read < src.len() {
            let rest = &src[read..];
            let (fits, len) = match utf8::decode(rest) {
                Unit::Char(c, len) if is_base(c) => match utf8::decode(&rest[len..]) {
                    Unit::Char(mark, mark_len) => match compose(c, mark) {
                        Some(composite) => {
                            let mut buf = [0u8; 4];
                            let bytes = composite.encode_utf8(&mut buf).as_bytes();
                            (put(dst, &mut written, bytes), len + mark_len)
                        }
                        None => (put(dst, &mut written, &rest[..len]), len),
                    },
                    // The mark may still arrive in the next chunk
                    Unit::Incomplete if !at_eof => {
                        return Progress::new(written, read, Status::ShortSource);
                    }
                    _ => (put(dst, &mut written, &rest[..len]), len),
                },
                Unit::Char(_, len) => (put(dst, &mut written, &rest[..len]), len),
                Unit::Incomplete if !at_eof => {
                    return Progress::new(written, read, Status::ShortSource);
                }
                Unit::Invalid | Unit::Incomplete => (put(dst, &mut written, &rest[..1]), 1),
            };
            if !fits {
                return Progress::new(written, read, Status::ShortDestination);
            }
            read += len;
        }

        Progress::done(written, read)
    }

    fn reset(&mut self) {}
}
