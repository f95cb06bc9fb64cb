//! Legacy encodings via `encoding_rs`
//!
//! Wraps an `encoding_rs` streaming decoder so any WHATWG encoding can feed
//! UTF-8 into a chain. The decoder keeps partial sequences internally, so it
//! always consumes its whole input unless the destination fills up.

use encoding_rs::{Decoder, DecoderResult, Encoding};

use crate::transform::{Progress, Status, Transformer};

/// Any WHATWG encoding to UTF-8, without replacement
pub struct WhatwgDecoder {
    encoding: &'static Encoding,
    decoder: Decoder,
    /// The final chunk has been fully decoded
    finished: bool,
}

impl WhatwgDecoder {
    /// Creates a new UTF-8 decoder for the specified character encoding.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            decoder: encoding.new_decoder_without_bom_handling(),
            finished: false,
        }
    }

    /// Look up an encoding by WHATWG label, e.g. `"windows-1251"`
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(Self::new)
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Transformer for WhatwgDecoder {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        if self.finished {
            return Progress::done(0, src.len());
        }

        let (result, read, written) = self.decoder.decode_to_utf8_without_replacement(src, dst, at_eof);
        match result {
            DecoderResult::InputEmpty => {
                self.finished = at_eof;
                Progress::done(written, read)
            }
            DecoderResult::OutputFull => Progress::new(written, read, Status::ShortDestination),
            DecoderResult::Malformed(bad, extra) => {
                // The bad sequence ended `extra` bytes before `read` and may start in an earlier chunk
                let offset = read.saturating_sub(usize::from(bad) + usize::from(extra));
                Progress::new(written, read, Status::Malformed { offset })
            }
        }
    }

    fn reset(&mut self) {
        self.decoder = self.encoding.new_decoder_without_bom_handling();
        self.finished = false;
    }

    fn max_output_len(&self, src_len: usize) -> usize {
        self.decoder
            .max_utf8_buffer_length_without_replacement(src_len)
            .unwrap_or(src_len.saturating_mul(3))
    }
}

impl std::fmt::Debug for WhatwgDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatwgDecoder")
            .field("encoding", &self.encoding.name())
            .field("finished", &self.finished)
            .finish()
    }
}
