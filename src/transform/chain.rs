//! Transformer composition
//!
//! A chain pipes the output of each link into the next through a fixed-size
//! scratch buffer per link boundary, so memory stays bounded whatever the
//! stream length. Link `k + 1` only sees `at_eof` once every link up to `k`
//! has been drained.
//!
//! Malformed offsets are exact for the first link. A later link fails on
//! bytes already derived from the input, so the chain reports how much input
//! it had consumed at that point, which may lie past the actual bad byte.

use std::fmt;

use log::warn;

use super::{copy_through, Progress, Skipped, Status, Transformer};
use crate::streaming::ChunkBuffer;

/// Default scratch capacity between two links
pub const DEFAULT_SCRATCH_SIZE: usize = 4096;

/// N transformers presented as one
pub struct Chain {
    links: Vec<Box<dyn Transformer>>,
    /// `scratch[i]` holds output of link `i` not yet consumed by link `i + 1`
    scratch: Vec<ChunkBuffer>,
    /// Why the last call reported `Malformed`, if it did
    failed: Option<Failure>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Failure {
    /// Link `link` rejected its input; the bad sequence occupies the next
    /// `pending` bytes of that input
    Link { link: usize, pending: usize },
    /// A scratch buffer cannot hold one unit
    Stalled,
}

impl Chain {
    /// Create a chain with the default scratch capacity
    pub fn new(links: Vec<Box<dyn Transformer>>) -> Self {
        Self::with_capacity(links, DEFAULT_SCRATCH_SIZE)
    }

    /// Create a chain with `capacity` bytes of scratch per link boundary
    pub fn with_capacity(links: Vec<Box<dyn Transformer>>, capacity: usize) -> Self {
        let boundaries = links.len().saturating_sub(1);
        let scratch = (0..boundaries).map(|_| ChunkBuffer::new(capacity)).collect();
        Self {
            links,
            scratch,
            failed: None,
        }
    }

    /// Keep the first failure of a call; later links still drain
    fn record(&mut self, failure: &mut Option<Status>, cause: Failure, offset: usize) {
        if failure.is_none() {
            *failure = Some(Status::Malformed { offset });
            self.failed = Some(cause);
        }
    }

    /// Number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Transformer for Chain {
    fn transform(&mut self, dst: &mut [u8], src: &[u8], at_eof: bool) -> Progress {
        let Some(high) = self.links.len().checked_sub(1) else {
            return copy_through(dst, src);
        };

        let mut read = 0usize;
        let mut written = 0usize;
        let mut status = Status::Done;
        let mut failure: Option<Status> = None;
        let mut last_full = false;
        self.failed = None;

        // `i` is the link to run next; links below `low` are drained for this call.
        let (mut low, mut i) = (0usize, 0usize);
        while low <= i && i <= high {
            let read_before = read;
            let progress = {
                let (before, after) = self.scratch.split_at_mut(i);
                let input = if i == 0 { &src[read..] } else { before[i - 1].data() };
                let output = if i == high {
                    &mut dst[written..]
                } else {
                    let next = &mut after[0];
                    next.compact();
                    next.spare_mut()
                };
                self.links[i].transform(output, input, at_eof && low == i)
            };

            if i == 0 {
                read += progress.read;
            } else {
                self.scratch[i - 1].consume(progress.read);
            }
            if i == high {
                written += progress.written;
            } else {
                self.scratch[i].commit(progress.written);
            }

            let need_progress = last_full;
            last_full = false;

            match progress.status {
                Status::ShortDestination => {
                    if i == high {
                        return Progress::new(written, read, Status::ShortDestination);
                    }
                    if !self.scratch[i].is_empty() {
                        // Let the next link make room before coming back here
                        i += 1;
                        last_full = true;
                        continue;
                    }
                    warn!(
                        "chain link {} cannot fit one unit in {} bytes of scratch",
                        i,
                        self.scratch[i].capacity()
                    );
                    self.record(&mut failure, Failure::Stalled, read);
                }
                Status::ShortSource => {
                    if i == 0 {
                        status = Status::ShortSource;
                    } else if (need_progress && progress.read == 0) || self.scratch[i - 1].is_full() {
                        warn!(
                            "chain link {} needs more than {} bytes of lookahead",
                            i,
                            self.scratch[i - 1].capacity()
                        );
                        self.record(&mut failure, Failure::Stalled, read);
                    } else {
                        self.scratch[i - 1].compact();
                        if i > low {
                            i -= 1;
                            continue;
                        }
                    }
                }
                Status::Done => {
                    if i > low {
                        // Fetch more bytes from the lower links first
                        i -= 1;
                        continue;
                    }
                }
                Status::Malformed { offset } => {
                    let pending = (offset + 1).saturating_sub(progress.read);
                    let offset = if i == 0 { read_before + offset } else { read };
                    self.record(&mut failure, Failure::Link { link: i, pending }, offset);
                }
            }

            // Link `i` is exhausted or failed; drain what the later links already hold.
            i += 1;
            low = i;
        }

        Progress::new(written, read, failure.unwrap_or(status))
    }

    fn reset(&mut self) {
        for link in &mut self.links {
            link.reset();
        }
        for scratch in &mut self.scratch {
            scratch.clear();
        }
        self.failed = None;
    }

    fn skip_malformed(&mut self) -> Skipped {
        match self.failed.take() {
            None => Skipped::InSource,
            Some(Failure::Stalled) => Skipped::Unskippable,
            // The first link reads the caller's source directly
            Some(Failure::Link { link: 0, .. }) => self.links[0].skip_malformed(),
            Some(Failure::Link { link, pending }) => match self.links[link].skip_malformed() {
                Skipped::InSource => {
                    let input = &mut self.scratch[link - 1];
                    let n = pending.min(input.len());
                    input.consume(n);
                    Skipped::Internal(n)
                }
                other => other,
            },
        }
    }

    fn max_output_len(&self, src_len: usize) -> usize {
        let mut len = src_len;
        for (i, link) in self.links.iter().enumerate() {
            let held = if i == 0 { 0 } else { self.scratch[i - 1].len() };
            len = link.max_output_len(len + held);
        }
        len
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("links", &self.links.len())
            .field("scratch", &self.scratch)
            .finish()
    }
}
