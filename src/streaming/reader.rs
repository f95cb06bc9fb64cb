//! Pull adapter: a transformed view of an upstream reader
//!
//! The reader pulls bytes from upstream into a fixed source buffer, runs the
//! transformer into a fixed destination buffer, and hands the result to the
//! caller. Bytes the transformer could not consume yet stay in the source
//! buffer for the next round, so chunk boundaries never lose or duplicate
//! data.

use std::io::{self, Read};

use log::{debug, trace, warn};

use super::ChunkBuffer;
use crate::config::{MalformedPolicy, StreamConfig, MIN_BUFFER_SIZE};
use crate::error::TransformError;
use crate::telemetry::{Direction, Outcome, StreamStats};
use crate::transform::{Progress, Skipped, Status, Transformer};

/// Where the reader is in its pull cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadState {
    /// Source buffer holds nothing the transformer can use; pull upstream
    NeedInput,
    /// Source buffer or transformer holds bytes not yet handed out
    HaveBuffered,
    /// Upstream is exhausted; flushing the transformer
    Draining,
    /// Stream finished or failed
    Done,
}

/// Transformed [`Read`] over an upstream [`Read`]
#[derive(Debug)]
pub struct Reader<R, T> {
    inner: R,
    transformer: T,
    config: StreamConfig,
    src: ChunkBuffer,
    dst: ChunkBuffer,
    at_eof: bool,
    state: ReadState,
    /// First terminal error, returned again on every later call
    error: Option<TransformError>,
    /// Upstream bytes consumed (or skipped) so far
    consumed: u64,
    stats: StreamStats,
}

impl<R: Read, T: Transformer> Reader<R, T> {
    /// Create a reader with the default configuration
    pub fn new(inner: R, transformer: T) -> Self {
        Self::with_config(inner, transformer, StreamConfig::default())
    }

    /// Create a reader with explicit buffer size and malformed-input policy
    pub fn with_config(inner: R, transformer: T, config: StreamConfig) -> Self {
        let size = config.buffer_size.max(MIN_BUFFER_SIZE);
        Self {
            inner,
            transformer,
            config,
            src: ChunkBuffer::new(size),
            dst: ChunkBuffer::new(size),
            at_eof: false,
            state: ReadState::NeedInput,
            error: None,
            consumed: 0,
            stats: StreamStats::new(Direction::Read),
        }
    }

    /// Pull more upstream bytes after whatever the transformer left behind
    fn fill(&mut self) -> io::Result<()> {
        self.src.compact();
        loop {
            match self.inner.read(self.src.spare_mut()) {
                Ok(0) => {
                    trace!("upstream exhausted with {} bytes buffered", self.src.len());
                    self.at_eof = true;
                    self.state = ReadState::Draining;
                    return Ok(());
                }
                Ok(n) => {
                    self.src.commit(n);
                    self.stats.bytes_in += n as u64;
                    self.state = ReadState::HaveBuffered;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("upstream read failed: {}", e);
                    self.error = Some(TransformError::from_io(&e));
                    self.finish(Outcome::IoError);
                    return Err(e);
                }
            }
        }
    }

    /// Run the transformer once over the buffered source
    fn step(&mut self) {
        let progress = self
            .transformer
            .transform(self.dst.whole_mut(), self.src.data(), self.at_eof);
        trace!(
            "transform: read={} written={} status={:?} eof={}",
            progress.read,
            progress.written,
            progress.status,
            self.at_eof
        );

        let consumed_before = self.consumed;
        self.stats.calls += 1;
        self.dst.commit(progress.written);
        self.src.consume(progress.read);
        self.consumed += progress.read as u64;

        match progress.status {
            Status::Done if self.at_eof && self.src.is_empty() => {
                self.finish(Outcome::Complete);
            }
            // An incomplete unit with no more input coming
            Status::Done | Status::ShortSource if self.at_eof => {
                self.malformed(progress, consumed_before, progress.read);
            }
            Status::Done | Status::ShortSource => {
                if self.src.is_full() {
                    self.fail(TransformError::BufferTooSmall {
                        capacity: self.src.capacity(),
                    });
                } else {
                    self.state = ReadState::NeedInput;
                }
            }
            Status::ShortDestination => {
                if progress.made_progress() {
                    // The transformer may hold output even when `src` is empty
                    self.state = self.pending_state();
                } else {
                    self.fail(TransformError::BufferTooSmall {
                        capacity: self.dst.capacity(),
                    });
                }
            }
            Status::Malformed { offset } => self.malformed(progress, consumed_before, offset),
        }
    }

    /// Apply the malformed-input policy; `offset` is relative to this call's source
    fn malformed(&mut self, progress: Progress, consumed_before: u64, offset: usize) {
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
                self.state = self.pending_state();
                return;
            }
        }

        warn!("malformed input at byte offset {}", at);
        self.fail(TransformError::Malformed { offset: at });
    }

    /// Run the transformer again before pulling upstream
    fn pending_state(&self) -> ReadState {
        if self.at_eof {
            ReadState::Draining
        } else {
            ReadState::HaveBuffered
        }
    }

    fn fail(&mut self, err: TransformError) {
        let outcome = if err.is_malformed() {
            Outcome::Malformed
        } else {
            Outcome::Stalled
        };
        self.error = Some(err);
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!("reader done: {:?}", outcome);
        self.state = ReadState::Done;
        self.stats.finish(outcome, self.config.emit_stats);
    }

    /// Clear buffers, errors, and transformer state to start a new stream.
    /// Swap the upstream through [`get_mut`](Self::get_mut) if needed.
    pub fn reset(&mut self) {
        self.transformer.reset();
        self.src.clear();
        self.dst.clear();
        self.at_eof = false;
        self.state = ReadState::NeedInput;
        self.error = None;
        self.consumed = 0;
        self.stats = StreamStats::new(Direction::Read);
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    /// Unwrap the upstream reader; buffered bytes are discarded
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, T: Transformer> Read for Reader<R, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            // Hand out what is already transformed, even if an error follows
            if !self.dst.is_empty() {
                let n = self.dst.drain_into(buf);
                self.stats.bytes_out += n as u64;
                return Ok(n);
            }
            if let Some(err) = &self.error {
                return Err(err.clone().into());
            }

            match self.state {
                ReadState::Done => return Ok(0),
                ReadState::NeedInput => self.fill()?,
                ReadState::HaveBuffered | ReadState::Draining => self.step(),
            }
        }
    }
}
