//! ISO-8859-1 (Latin-1)
//!
//! Every Latin-1 byte maps to the code point of the same value, so decoding
//! never fails and encoding fails only for characters above U+00FF.

use super::utf8::{self, Unit};
use crate::transform::{Progress, Status, Transformer};

/// ISO-8859-1 bytes to UTF-8
#[derive(Clone, Copy, Debug, Default)]
pub struct Latin1Decoder;

impl Latin1Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for Latin1Decoder {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], _at_eof: bool) -> Progress {
        let mut written = 0;
        for (read, &byte) in src.iter().enumerate() {
            let c = char::from(byte);
            match utf8::encode(c, &mut dst[written..]) {
                Some(n) => written += n,
                None => return Progress::new(written, read, Status::ShortDestination),
            }
        }
        Progress::done(written, src.len())
    }

    fn reset(&mut self) {}

    fn max_output_len(&self, src_len: usize) -> usize {
        src_len * 2
    }
}

/// UTF-8 to ISO-8859-1 bytes
#[derive(Clone, Copy, Debug, Default)]
pub struct Latin1Encoder;

impl Latin1Encoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for Latin1Encoder {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let mut written = 0;
        let mut read = 0;

        while read < src.len() {
            let (c, len) = match utf8::decode(&src[read..]) {
                Unit::Char(c, len) if (c as u32) <= 0xFF => (c, len),
                Unit::Incomplete if !at_eof => {
                    return Progress::new(written, read, Status::ShortSource);
                }
                _ => return Progress::new(written, read, Status::Malformed { offset: read }),
            };
            if written == dst.len() {
                return Progress::new(written, read, Status::ShortDestination);
            }
            dst[written] = c as u32 as u8;
            written += 1;
            read += len;
        }

        Progress::done(written, read)
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform_to_vec;

    const UTF8: [u8; 8] = [116, 115, 99, 104, 195, 188, 195, 159];
    const LATIN1: [u8; 6] = [116, 115, 99, 104, 252, 223];

    #[test]
    fn test_encode_tschuess() {
        let out = transform_to_vec(&mut Latin1Encoder::new(), &UTF8).unwrap();
        assert_eq!(out, LATIN1);
    }

    #[test]
    fn test_decode_tschuess() {
        let out = transform_to_vec(&mut Latin1Decoder::new(), &LATIN1).unwrap();
        assert_eq!(out, UTF8);
    }

    #[test]
    fn test_round_trip_all_bytes() {
        let all: Vec<u8> = (0..=255).collect();
        let utf8 = transform_to_vec(&mut Latin1Decoder::new(), &all).unwrap();
        let back = transform_to_vec(&mut Latin1Encoder::new(), &utf8).unwrap();
        assert_eq!(back, all);
    }

    #[test]
    fn test_unrepresentable_is_malformed() {
        let mut dst = [0u8; 16];
        let progress = Latin1Encoder::new().transform(&mut dst, "a€".as_bytes(), true);
        assert_eq!(progress, Progress::new(1, 1, Status::Malformed { offset: 1 }));
    }

    #[test]
    fn test_incomplete_tail() {
        let mut encoder = Latin1Encoder::new();
        let mut dst = [0u8; 16];

        let progress = encoder.transform(&mut dst, &[b'a', 0xC3], false);
        assert_eq!(progress, Progress::new(1, 1, Status::ShortSource));

        let progress = encoder.transform(&mut dst, &[b'a', 0xC3], true);
        assert_eq!(progress, Progress::new(1, 1, Status::Malformed { offset: 1 }));
    }

    #[test]
    fn test_decoder_short_destination() {
        let mut dst = [0u8; 3];
        let progress = Latin1Decoder::new().transform(&mut dst, &[b'a', 252, b'b'], true);
        assert_eq!(progress, Progress::new(3, 2, Status::ShortDestination));
        assert_eq!(&dst, &[b'a', 195, 188]);
    }
}
