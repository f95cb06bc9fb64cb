//! Resumable chunked transforms
//!
//! A [`Transformer`] converts a byte stream one chunk at a time. Every call
//! reports how much it wrote, how much it consumed, and why it stopped:
//! - `Done`: all of `src` was consumed
//! - `ShortDestination`: `dst` ran out of room, retry with a larger one
//! - `ShortSource`: the tail of `src` is an incomplete unit, supply more input
//! - `Malformed`: the byte at `offset` cannot be converted
//!
//! Retrying never re-consumes bytes: the caller resubmits `src[read..]`.

pub mod chain;
pub mod remove;

pub use chain::Chain;
pub use remove::{remove, RemoveFilter};

use crate::error::{Result, TransformError};

/// Why a [`Transformer::transform`] call returned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// All given source bytes were consumed
    Done,
    /// Destination is full; retry with more room
    ShortDestination,
    /// Source ends inside a unit; only legal when the chunk is not final
    ShortSource,
    /// `src[offset]` starts a sequence that cannot be converted.
    ///
    /// Usually `read <= offset`. A transformer that has already swallowed the
    /// bad sequence internally may report `read > offset`; the caller then
    /// resumes at `src[read..]` as usual.
    Malformed { offset: usize },
}

impl Status {
    /// Check if the caller may continue after this status
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Status::Malformed { .. })
    }
}

/// Result of one [`Transformer::transform`] call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Bytes written to the start of `dst`
    pub written: usize,
    /// Bytes consumed from the start of `src`
    pub read: usize,
    pub status: Status,
}

impl Progress {
    pub fn new(written: usize, read: usize, status: Status) -> Self {
        Self { written, read, status }
    }

    /// Shorthand for a call that consumed all of its input
    pub fn done(written: usize, read: usize) -> Self {
        Self::new(written, read, Status::Done)
    }

    /// Check if the call produced or consumed anything
    pub fn made_progress(&self) -> bool {
        self.written > 0 || self.read > 0
    }
}

/// What [`Transformer::skip_malformed`] did with the malformed input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skipped {
    /// The bad byte is still in the caller's `src`; the caller drops it
    InSource,
    /// This many bytes were dropped from internal buffers
    Internal(usize),
    /// The failure was not caused by an input byte and cannot be skipped
    Unskippable,
}

/// Stateful, resumable chunk transform.
///
/// Implementations keep any partially converted state in their own fields so
/// a `ShortDestination` retry continues exactly where the last call stopped.
pub trait Transformer {
    /// Convert `src` into `dst`.
    ///
    /// `at_eof` is true only when no bytes will ever follow `src`. With
    /// `at_eof` set an incomplete trailing unit must be reported as
    /// `Malformed`, never `ShortSource`.
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress;

    /// Clear internal state so the instance can start a new stream
    fn reset(&mut self);

    /// Largest output one call can produce for `src_len` input bytes
    fn max_output_len(&self, src_len: usize) -> usize {
        src_len
    }

    /// Drop the malformed input reported by the last call if it is held in
    /// an internal buffer rather than in the caller's `src`.
    ///
    /// Transformers without internal buffering keep the default, which
    /// leaves the bad byte to the caller.
    fn skip_malformed(&mut self) -> Skipped {
        Skipped::InSource
    }
}

impl<T: Transformer + ?Sized> Transformer for &mut T {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        (**self).transform(dst, src, at_eof)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn max_output_len(&self, src_len: usize) -> usize {
        (**self).max_output_len(src_len)
    }

    fn skip_malformed(&mut self) -> Skipped {
        (**self).skip_malformed()
    }
}

impl<T: Transformer + ?Sized> Transformer for Box<T> {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        (**self).transform(dst, src, at_eof)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn max_output_len(&self, src_len: usize) -> usize {
        (**self).max_output_len(src_len)
    }

    fn skip_malformed(&mut self) -> Skipped {
        (**self).skip_malformed()
    }
}

/// Copies input to output unchanged
#[derive(Clone, Copy, Debug, Default)]
pub struct Nop;

impl Transformer for Nop {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], _at_eof: bool) -> Progress {
        copy_through(dst, src)
    }

    fn reset(&mut self) {}
}

/// Consumes all input and produces nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl Transformer for Discard {
    fn transform(&mut self, _dst: &mut [u8], src: &[u8], _at_eof: bool) -> Progress {
        Progress::done(0, src.len())
    }

    fn reset(&mut self) {}

    fn max_output_len(&self, _src_len: usize) -> usize {
        0
    }
}

/// Byte-for-byte copy, shared by [`Nop`] and the empty [`Chain`]
pub(crate) fn copy_through(dst: &mut [u8], src: &[u8]) -> Progress {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
    let status = if n < src.len() {
        Status::ShortDestination
    } else {
        Status::Done
    };
    Progress::new(n, n, status)
}

/// Transform a fully materialized `src` in a single final call.
///
/// No buffering and no retry: on `ShortDestination` the caller grows `dst`
/// and calls again with `src[progress.read..]`.
pub fn apply<T: Transformer + ?Sized>(transformer: &mut T, dst: &mut [u8], src: &[u8]) -> Progress {
    transformer.transform(dst, src, true)
}

/// Reset `transformer` and convert all of `src` into a new vector
pub fn transform_to_vec<T: Transformer + ?Sized>(transformer: &mut T, src: &[u8]) -> Result<Vec<u8>> {
    transformer.reset();
    let mut out = Vec::new();
    append_transformed(transformer, &mut out, src)?;
    Ok(out)
}

/// Convert all of `src` as the final chunk and append the result to `out`.
///
/// Returns the number of bytes appended. On error `out` keeps everything
/// produced before the malformed input.
pub fn append_transformed<T: Transformer + ?Sized>(
    transformer: &mut T,
    out: &mut Vec<u8>,
    mut src: &[u8],
) -> Result<usize> {
    let start_len = out.len();
    let mut scratch = vec![0u8; transformer.max_output_len(src.len()).max(MIN_SCRATCH)];
    let mut consumed = 0usize;

    loop {
        let progress = transformer.transform(&mut scratch, src, true);
        out.extend_from_slice(&scratch[..progress.written]);
        src = &src[progress.read..];

        match progress.status {
            Status::Done => return Ok(out.len() - start_len),
            Status::ShortDestination => {
                if !progress.made_progress() {
                    let grown = scratch.len() * 2;
                    scratch.resize(grown, 0);
                }
            }
            Status::ShortSource => {
                return Err(TransformError::Malformed {
                    offset: (consumed + progress.read) as u64,
                });
            }
            Status::Malformed { offset } => {
                return Err(TransformError::Malformed {
                    offset: (consumed + offset) as u64,
                });
            }
        }
        consumed += progress.read;
    }
}

const MIN_SCRATCH: usize = 64;
