//! Configuration for the stream adapters
//!
//! Loaded from JSON (e.g. an embedding application's settings blob) or built
//! in code. Every field has a default, so `{}` is a valid configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Smallest buffer that still fits one 4-byte unit plus its expansion
pub const MIN_BUFFER_SIZE: usize = 16;

/// What an adapter does when the transformer reports malformed input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Stop the stream and report the offset
    #[default]
    Abort,
    /// Drop the offending byte and keep going
    Skip,
}

/// Stream adapter configuration
#[derive(Clone, Debug, Deserialize)]
pub struct StreamConfig {
    /// Capacity of the internal source and destination buffers
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Resynchronisation policy after malformed input
    #[serde(default)]
    pub on_malformed: MalformedPolicy,

    /// Whether to log stream statistics at end of stream
    #[serde(default = "default_emit_stats")]
    pub emit_stats: bool,
}

fn default_buffer_size() -> usize {
    4096
}

fn default_emit_stats() -> bool {
    true
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            on_malformed: MalformedPolicy::default(),
            emit_stats: default_emit_stats(),
        }
    }
}

impl StreamConfig {
    /// Parse and validate configuration from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config_str = std::str::from_utf8(bytes)?;
        let config: Self = serde_json::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the adapters cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(ConfigError::BufferTooSmall {
                min: MIN_BUFFER_SIZE,
                actual: self.buffer_size,
            });
        }
        Ok(())
    }

    /// Same configuration with a different buffer size
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(MIN_BUFFER_SIZE);
        self
    }

    /// Same configuration with a different malformed-input policy
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }
}
