//! UTF-8 unit decoding
//!
//! Multi-byte characters can split across chunk boundaries. Transformers
//! that work on decoded units call [`decode`] on the front of their source
//! and get back one of three answers: a complete character, an invalid
//! byte, or "incomplete - need more bytes".
//!
//! A UTF-8 character can be 1-4 bytes:
//! - 1 byte:  0xxxxxxx (ASCII)
//! - 2 bytes: 110xxxxx 10xxxxxx
//! - 3 bytes: 1110xxxx 10xxxxxx 10xxxxxx
//! - 4 bytes: 11110xxx 10xxxxxx 10xxxxxx 10xxxxxx

use std::ops::RangeInclusive;

/// Encoded form of U+FFFD REPLACEMENT CHARACTER
pub const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// One unit at the front of a byte slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    /// A complete character and its encoded length
    Char(char, usize),
    /// The first byte can never start a valid sequence here; treat it as one byte
    Invalid,
    /// The slice ends inside a sequence that may still become valid
    Incomplete,
}

/// Decode the unit at the front of `src`. An empty slice is `Incomplete`.
pub fn decode(src: &[u8]) -> Unit {
    let Some(&first) = src.first() else {
        return Unit::Incomplete;
    };
    if first < 0x80 {
        return Unit::Char(first as char, 1);
    }

    let len = sequence_length(first);
    if len == 1 {
        return Unit::Invalid;
    }
    if src.len() < len {
        return if is_valid_prefix(src) {
            Unit::Incomplete
        } else {
            Unit::Invalid
        };
    }

    match std::str::from_utf8(&src[..len]).ok().and_then(|s| s.chars().next()) {
        Some(c) => Unit::Char(c, len),
        None => Unit::Invalid,
    }
}

/// Write `c` to the front of `dst`. Returns `None` when it does not fit.
pub fn encode(c: char, dst: &mut [u8]) -> Option<usize> {
    let len = c.len_utf8();
    if dst.len() < len {
        return None;
    }
    c.encode_utf8(dst);
    Some(len)
}

/// Check if byte is a UTF-8 continuation byte (10xxxxxx)
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    (byte & 0b11000000) == 0b10000000
}

/// Get expected length of UTF-8 sequence from first byte
#[inline]
pub fn sequence_length(first_byte: u8) -> usize {
    match first_byte {
        0x00..=0x7F => 1, // ASCII
        0xC2..=0xDF => 2, // 2-byte sequence
        0xE0..=0xEF => 3, // 3-byte sequence
        0xF0..=0xF4 => 4, // 4-byte sequence
        _ => 1,           // Invalid, treat as single byte
    }
}

/// Allowed range of the byte after `first`, excluding overlongs and surrogates
fn second_byte_range(first: u8) -> RangeInclusive<u8> {
    match first {
        0xE0 => 0xA0..=0xBF,
        0xED => 0x80..=0x9F,
        0xF0 => 0x90..=0xBF,
        0xF4 => 0x80..=0x8F,
        _ => 0x80..=0xBF,
    }
}

/// A truncated sequence whose bytes so far are all legal
fn is_valid_prefix(src: &[u8]) -> bool {
    let range = second_byte_range(src[0]);
    src[1..].iter().enumerate().all(|(i, &b)| {
        if i == 0 {
            range.contains(&b)
        } else {
            is_continuation(b)
        }
    })
}
