//! Character encodings expressed as transformers
//!
//! This module provides:
//! - UTF-8 unit decoding shared by every UTF-8 consumer
//! - ISO-8859-1 encoder and decoder
//! - UTF-16 encoder and decoder (either byte order, optional BOM)
//! - WHATWG legacy decoders backed by `encoding_rs`

pub mod latin1;
pub mod utf16;
pub mod utf8;
pub mod whatwg;

pub use latin1::{Latin1Decoder, Latin1Encoder};
pub use utf16::{BomPolicy, Endian, Utf16, Utf16Decoder, Utf16Encoder};
pub use whatwg::WhatwgDecoder;
