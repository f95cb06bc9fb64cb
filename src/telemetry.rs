//! Stream statistics
//!
//! Each adapter counts what went through it and, at end of stream, emits one
//! structured log line that external collectors can pick up.

use log::{debug, warn};
use serde::Serialize;

/// Which adapter produced the statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Read,
    Write,
}

/// How the stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Still running
    Open,
    /// All input transformed
    Complete,
    /// Stopped on malformed input
    Malformed,
    /// Upstream or downstream failed
    IoError,
    /// Transformer could not fit a unit in the internal buffers
    Stalled,
}

/// Counters for one transformed stream
#[derive(Debug, Clone, Serialize)]
pub struct StreamStats {
    pub direction: Direction,
    /// Bytes taken from upstream (reader) or the caller (writer)
    pub bytes_in: u64,
    /// Bytes handed to the caller (reader) or downstream (writer)
    pub bytes_out: u64,
    /// Transform calls made
    pub calls: u64,
    /// Malformed bytes dropped under the skip policy
    pub skipped: u64,
    pub outcome: Outcome,
}

impl StreamStats {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            bytes_in: 0,
            bytes_out: 0,
            calls: 0,
            skipped: 0,
            outcome: Outcome::Open,
        }
    }

    /// Record the final outcome and log the counters
    pub fn finish(&mut self, outcome: Outcome, emit: bool) {
        self.outcome = outcome;
        if emit {
            self.emit();
        }
    }

    /// Log the counters as one JSON line
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => debug!("[TRANSFORM-STATS] {}", json),
            Err(e) => warn!("Failed to serialize stream stats: {}", e),
        }
    }
}
