//! Streaming chunked byte transforms
//!
//! A [`Transformer`] converts bytes chunk by chunk with bounded memory. It can
//! stop anywhere (output buffer full, partial multi-byte unit at the end of
//! the input) and resume on the next call without losing or repeating
//! bytes. On top of that contract the crate provides:
//! - [`Chain`]: several transformers run as one
//! - [`remove`]: drop every code point matching a predicate
//! - [`Reader`] / [`Writer`]: `std::io` adapters that drive a transformer
//! - [`apply`] / [`transform_to_vec`]: whole-buffer helpers
//! - Latin-1, UTF-16 and WHATWG codecs, plus Latin-1 letter (de)composition
//!
//! ```
//! use std::io::Read;
//! use chunk_transform::encoding::Latin1Encoder;
//! use chunk_transform::Reader;
//!
//! let mut reader = Reader::new("tschüß".as_bytes(), Latin1Encoder::new());
//! let mut latin1 = Vec::new();
//! reader.read_to_end(&mut latin1).unwrap();
//! assert_eq!(latin1, [116, 115, 99, 104, 252, 223]);
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod streaming;
pub mod telemetry;
pub mod transform;
pub mod unicode;

pub use config::{MalformedPolicy, StreamConfig};
pub use error::{ConfigError, TransformError};
pub use streaming::{Reader, Writer};
pub use transform::{
    append_transformed, apply, remove, transform_to_vec, Chain, Discard, Nop, Progress,
    RemoveFilter, Skipped, Status, Transformer,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{BomPolicy, Endian, Latin1Decoder, Latin1Encoder, Utf16};
    use crate::streaming::testing::ChunkedSource;
    use crate::unicode::{is_not_latin, Nfd};
    use rstest::rstest;
    use std::io::{self, Read, Write};

    const INPUT: &str = "tschüß; до свидания";

    #[test]
    fn test_latin1_encode_then_decode() {
        let utf8 = [116, 115, 99, 104, 195, 188, 195, 159];

        let mut latin1 = Vec::new();
        Reader::new(&utf8[..], Latin1Encoder::new())
            .read_to_end(&mut latin1)
            .unwrap();
        assert_eq!(latin1, [116, 115, 99, 104, 252, 223]);

        let mut back = Vec::new();
        Reader::new(&latin1[..], Latin1Decoder::new())
            .read_to_end(&mut back)
            .unwrap();
        assert_eq!(back, utf8);
    }

    #[test]
    fn test_latin1_through_writer_to_utf16be() {
        let latin1 = [116u8, 115, 99, 104, 252, 223];
        let utf16 = Utf16::new(Endian::Big, BomPolicy::Ignore);

        let mut reader = Reader::new(&latin1[..], Latin1Decoder::new());
        let mut writer = Writer::new(Vec::new(), utf16.encoder());
        io::copy(&mut reader, &mut writer).unwrap();

        assert_eq!(
            writer.finish().unwrap(),
            [0, 116, 0, 115, 0, 99, 0, 104, 0, 252, 0, 223]
        );
    }

    #[test]
    fn test_remove_whitespace_in_place() {
        let mut dst = [0u8; 64];
        let progress = apply(&mut remove(char::is_whitespace), &mut dst, INPUT.as_bytes());

        assert_eq!(progress.status, Status::Done);
        assert_eq!(progress.read, INPUT.len());
        assert_eq!(&dst[..progress.written], "tschüß;досвидания".as_bytes());
    }

    #[test]
    fn test_remove_non_latin() {
        let out = transform_to_vec(&mut remove(is_not_latin), INPUT.as_bytes()).unwrap();
        assert_eq!(out, "tschüß".as_bytes());
    }

    #[test]
    fn test_decomposed_input_loses_diacritic() {
        let mut chain = Chain::new(vec![Box::new(Nfd), Box::new(remove(is_not_latin))]);
        let out = transform_to_vec(&mut chain, INPUT.as_bytes()).unwrap();
        assert_eq!(out, "tschuß".as_bytes());
    }

    #[rstest]
    #[case(1, 16)]
    #[case(2, 16)]
    #[case(3, 64)]
    #[case(11, 16)]
    #[case(4096, 4096)]
    fn test_reader_matches_one_shot(#[case] chunk: usize, #[case] buffer_size: usize) {
        let text = INPUT.repeat(25);
        let make = || Chain::with_capacity(vec![Box::new(Nfd), Box::new(remove(is_not_latin))], 16);
        let expected = transform_to_vec(&mut make(), text.as_bytes()).unwrap();

        let config = StreamConfig::default().with_buffer_size(buffer_size);
        let source = ChunkedSource::new(text.as_bytes(), chunk);
        let mut out = Vec::new();
        Reader::with_config(source, make(), config)
            .read_to_end(&mut out)
            .unwrap();

        assert_eq!(out, expected);
        assert_eq!(out, "tschuß".repeat(25).as_bytes());
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(9)]
    fn test_writer_matches_one_shot(#[case] piece: usize) {
        let text = INPUT.repeat(25);
        let expected = transform_to_vec(&mut remove(char::is_whitespace), text.as_bytes()).unwrap();

        let config = StreamConfig::default().with_buffer_size(16);
        let mut writer = Writer::with_config(Vec::new(), remove(char::is_whitespace), config);
        for chunk in text.as_bytes().chunks(piece) {
            writer.write_all(chunk).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), expected);
    }

    #[test]
    fn test_reset_matches_fresh_instance() {
        let mut chain = Chain::new(vec![Box::new(Nfd), Box::new(remove(is_not_latin))]);
        let first = transform_to_vec(&mut chain, INPUT.as_bytes()).unwrap();

        // Leave the chain mid-stream, then reset
        let mut dst = [0u8; 4];
        chain.transform(&mut dst, INPUT.as_bytes(), false);
        chain.reset();

        let mut fresh = Chain::new(vec![Box::new(Nfd), Box::new(remove(is_not_latin))]);
        let mut from_reset = Vec::new();
        let mut from_fresh = Vec::new();
        append_transformed(&mut chain, &mut from_reset, INPUT.as_bytes()).unwrap();
        append_transformed(&mut fresh, &mut from_fresh, INPUT.as_bytes()).unwrap();

        assert_eq!(from_reset, from_fresh);
        assert_eq!(from_reset, first);
    }

    #[test]
    fn test_config_drives_reader() {
        let config = StreamConfig::from_bytes(br#"{"buffer_size": 16, "on_malformed": "skip"}"#).unwrap();
        let mut reader = Reader::with_config("a€b".as_bytes(), Latin1Encoder::new(), config);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ab");
        assert_eq!(reader.stats().skipped, 3);
    }
}
