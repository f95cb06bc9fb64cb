//! UTF-16 in either byte order
//!
//! The encoder turns UTF-8 into UTF-16 code units, the decoder turns them
//! back. With [`BomPolicy::Use`] the encoder starts its output with a byte
//! order mark and the decoder honours (and strips) a leading one.

use super::utf8::{self, Unit};
use crate::transform::{Progress, Status, Transformer};

/// Byte order of the UTF-16 code units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    fn write(self, unit: u16, dst: &mut [u8]) {
        let bytes = match self {
            Endian::Big => unit.to_be_bytes(),
            Endian::Little => unit.to_le_bytes(),
        };
        dst[..2].copy_from_slice(&bytes);
    }

    fn read(self, src: &[u8]) -> u16 {
        let bytes = [src[0], src[1]];
        match self {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        }
    }
}

/// Byte order mark handling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BomPolicy {
    /// Never write a BOM; a leading U+FEFF decodes as a character
    Ignore,
    /// Write a BOM when encoding; honour and strip one when decoding
    Use,
}

const BOM: u16 = 0xFEFF;

/// UTF-16 flavour: byte order plus BOM policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Utf16 {
    pub endian: Endian,
    pub bom: BomPolicy,
}

impl Utf16 {
    pub fn new(endian: Endian, bom: BomPolicy) -> Self {
        Self { endian, bom }
    }

    /// UTF-8 to UTF-16
    pub fn encoder(&self) -> Utf16Encoder {
        Utf16Encoder {
            flavour: *self,
            bom_written: false,
        }
    }

    /// UTF-16 to UTF-8
    pub fn decoder(&self) -> Utf16Decoder {
        Utf16Decoder {
            flavour: *self,
            endian: self.endian,
            bom_checked: false,
        }
    }
}

/// UTF-8 to UTF-16 transformer
#[derive(Clone, Debug)]
pub struct Utf16Encoder {
    flavour: Utf16,
    bom_written: bool,
}

impl Transformer for Utf16Encoder {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let endian = self.flavour.endian;
        let mut written = 0;
        let mut read = 0;

        if self.flavour.bom == BomPolicy::Use && !self.bom_written {
            if dst.len() < 2 {
                return Progress::new(0, 0, Status::ShortDestination);
            }
            endian.write(BOM, dst);
            self.bom_written = true;
            written = 2;
        }

        while read < src.len() {
            let (c, len) = match utf8::decode(&src[read..]) {
                Unit::Char(c, len) => (c, len),
                Unit::Incomplete if !at_eof => {
                    return Progress::new(written, read, Status::ShortSource);
                }
                _ => return Progress::new(written, read, Status::Malformed { offset: read }),
            };

            let mut buf = [0u16; 2];
            let units = c.encode_utf16(&mut buf);
            if written + units.len() * 2 > dst.len() {
                return Progress::new(written, read, Status::ShortDestination);
            }
            for &unit in units.iter() {
                endian.write(unit, &mut dst[written..]);
                written += 2;
            }
            read += len;
        }

        Progress::done(written, read)
    }

    fn reset(&mut self) {
        self.bom_written = false;
    }

    fn max_output_len(&self, src_len: usize) -> usize {
        src_len * 2 + 2
    }
}

/// UTF-16 to UTF-8 transformer
#[derive(Clone, Debug)]
pub struct Utf16Decoder {
    flavour: Utf16,
    /// Byte order in effect, possibly switched by a BOM
    endian: Endian,
    bom_checked: bool,
}

impl Utf16Decoder {
    /// Consume a leading BOM if present. Returns bytes consumed, or `None`
    /// when more input is needed to decide.
    fn check_bom(&mut self, src: &[u8], at_eof: bool) -> Option<usize> {
        if src.len() < 2 && !at_eof {
            return None;
        }
        self.bom_checked = true;
        match src {
            [0xFE, 0xFF, ..] => {
                self.endian = Endian::Big;
                Some(2)
            }
            [0xFF, 0xFE, ..] => {
                self.endian = Endian::Little;
                Some(2)
            }
            _ => Some(0),
        }
    }
}

impl Transformer for Utf16Decoder {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let mut written = 0;
        let mut read = 0;

        if self.flavour.bom == BomPolicy::Use && !self.bom_checked {
            if src.is_empty() && !at_eof {
                return Progress::done(0, 0);
            }
            match self.check_bom(src, at_eof) {
                Some(n) => read = n,
                None => return Progress::new(0, 0, Status::ShortSource),
            }
        }

        while read < src.len() {
            let rest = &src[read..];
            let incomplete = if at_eof {
                Status::Malformed { offset: read }
            } else {
                Status::ShortSource
            };
            if rest.len() < 2 {
                return Progress::new(written, read, incomplete);
            }

            let unit = self.endian.read(rest);
            let (c, len) = match unit {
                0xD800..=0xDBFF => {
                    if rest.len() < 4 {
                        return Progress::new(written, read, incomplete);
                    }
                    let low = self.endian.read(&rest[2..]);
                    match char::decode_utf16([unit, low]).next() {
                        Some(Ok(c)) => (c, 4),
                        _ => return Progress::new(written, read, Status::Malformed { offset: read }),
                    }
                }
                _ => match char::from_u32(u32::from(unit)) {
                    Some(c) => (c, 2),
                    None => return Progress::new(written, read, Status::Malformed { offset: read }),
                },
            };

            match utf8::encode(c, &mut dst[written..]) {
                Some(n) => written += n,
                None => return Progress::new(written, read, Status::ShortDestination),
            }
            read += len;
        }

        Progress::done(written, read)
    }

    fn reset(&mut self) {
        self.endian = self.flavour.endian;
        self.bom_checked = false;
    }

    fn max_output_len(&self, src_len: usize) -> usize {
        src_len / 2 * 3
    }
}
