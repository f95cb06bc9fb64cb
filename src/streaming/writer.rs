//! Push adapter: transforms bytes on their way to a downstream writer
//!
//! Caller bytes are appended to a fixed source buffer and transformed into a
//! fixed destination buffer, which is written downstream in full before the
//! next transform call. An incomplete unit at the end of a write stays
//! buffered until the next write or [`Writer::close`].

use std::io::{self, Write};

use log::{debug, trace, warn};

use super::ChunkBuffer;
use crate::config::{MalformedPolicy, StreamConfig, MIN_BUFFER_SIZE};
use crate::error::TransformError;
use crate::telemetry::{Direction, Outcome, StreamStats};
use crate::transform::{Skipped, Status, Transformer};

/// Transformed [`Write`] over a downstream [`Write`]
///
/// Call [`close`](Self::close) (or [`finish`](Self::finish)) once all data
/// is written; dropping the writer discards any buffered partial unit.
#[derive(Debug)]
pub struct Writer<W, T> {
    inner: W,
    transformer: T,
    config: StreamConfig,
    src: ChunkBuffer,
    dst: ChunkBuffer,
    closed: bool,
    /// First terminal error, returned again on every later call
    error: Option<TransformError>,
    /// Caller bytes consumed (or skipped) so far
    consumed: u64,
    stats: StreamStats,
}

impl<W: Write, T: Transformer> Writer<W, T> {
    /// Create a writer with the default configuration
    pub fn new(inner: W, transformer: T) -> Self {
        Self::with_config(inner, transformer, StreamConfig::default())
    }

    /// Create a writer with explicit buffer size and malformed-input policy
    pub fn with_config(inner: W, transformer: T, config: StreamConfig) -> Self {
        let size = config.buffer_size.max(MIN_BUFFER_SIZE);
        Self {
            inner,
            transformer,
            config,
            src: ChunkBuffer::new(size),
            dst: ChunkBuffer::new(size),
            closed: false,
            error: None,
            consumed: 0,
            stats: StreamStats::new(Direction::Write),
        }
    }

    fn check_open(&self) -> io::Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone().into());
        }
        if self.closed {
            return Err(TransformError::Closed.into());
        }
        Ok(())
    }

    /// Transform buffered input until the transformer wants more of it.
    /// With `at_eof` set, runs until the transformer is fully flushed.
    fn drain(&mut self, at_eof: bool) -> io::Result<()> {
        loop {
            let progress = self
                .transformer
                .transform(self.dst.whole_mut(), self.src.data(), at_eof);
            trace!(
                "transform: read={} written={} status={:?} eof={}",
                progress.read,
                progress.written,
                progress.status,
                at_eof
            );

            let consumed_before = self.consumed;
            self.stats.calls += 1;
            self.src.consume(progress.read);
            self.consumed += progress.read as u64;
            self.dst.commit(progress.written);

            if !self.dst.is_empty() {
                if let Err(e) = self.inner.write_all(self.dst.data()) {
                    debug!("downstream write failed: {}", e);
                    self.error = Some(TransformError::from_io(&e));
                    self.stats.finish(Outcome::IoError, self.config.emit_stats);
                    return Err(e);
                }
                self.stats.bytes_out += self.dst.len() as u64;
                self.dst.clear();
            }

            let offset = match progress.status {
                Status::Done if self.src.is_empty() => return Ok(()),
                // An incomplete unit with no more input coming
                Status::Done | Status::ShortSource if at_eof => progress.read,
                Status::Done | Status::ShortSource => {
                    if self.src.is_full() {
                        return Err(self.fail(TransformError::BufferTooSmall {
                            capacity: self.src.capacity(),
                        }));
                    }
                    return Ok(());
                }
                Status::ShortDestination if progress.made_progress() => continue,
                Status::ShortDestination => {
                    return Err(self.fail(TransformError::BufferTooSmall {
                        capacity: self.dst.capacity(),
                    }));
                }
                Status::Malformed { offset } => offset,
            };

            let at = consumed_before + offset as u64;
            if self.config.on_malformed == MalformedPolicy::Skip {
                let skipped = match self.transformer.skip_malformed() {
                    Skipped::Internal(n) => Some(n),
                    Skipped::InSource => {
                        let n = (offset + 1).saturating_sub(progress.read).min(self.src.len());
                        self.src.consume(n);
                        self.consumed += n as u64;
                        (n > 0 || progress.read > 0).then_some(n)
                    }
                    Skipped::Unskippable => None,
                };
                if let Some(n) = skipped {
                    warn!("skipping malformed input at byte offset {}", at);
                    self.stats.skipped += n as u64;
                    continue;
                }
            }

            warn!("malformed input at byte offset {}", at);
            return Err(self.fail(TransformError::Malformed { offset: at }));
        }
    }

    /// Record a terminal error and convert it for the caller
    fn fail(&mut self, err: TransformError) -> io::Error {
        let outcome = if err.is_malformed() {
            Outcome::Malformed
        } else {
            Outcome::Stalled
        };
        self.stats.finish(outcome, self.config.emit_stats);
        self.error = Some(err.clone());
        err.into()
    }

    /// Flush the transformer's final output and the downstream writer.
    /// Any later write or close fails with [`TransformError::Closed`].
    pub fn close(&mut self) -> io::Result<()> {
        self.check_open()?;
        self.closed = true;

        self.drain(true)?;
        if let Err(e) = self.inner.flush() {
            self.error = Some(TransformError::from_io(&e));
            self.stats.finish(Outcome::IoError, self.config.emit_stats);
            return Err(e);
        }

        debug!("writer closed after {} bytes in", self.stats.bytes_in);
        self.stats.finish(Outcome::Complete, self.config.emit_stats);
        Ok(())
    }

    /// Close the writer and hand back the downstream writer
    pub fn finish(mut self) -> io::Result<W> {
        self.close()?;
        Ok(self.inner)
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }
}

impl<W: Write, T: Transformer> Write for Writer<W, T> {
    /// Accepts all of `data`; only terminal errors are reported
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.check_open()?;

        let mut rest = data;
        while !rest.is_empty() {
            let n = self.src.append(rest);
            rest = &rest[n..];
            self.stats.bytes_in += n as u64;
            self.drain(false)?;
        }
        Ok(data.len())
    }

    /// Flushes the downstream writer; buffered partial units stay buffered
    fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone().into());
        }
        self.inner.flush()
    }
}
