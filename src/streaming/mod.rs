//! Streaming adapters with bounded memory
//!
//! This module provides:
//! - A fixed-capacity byte buffer that never grows
//! - [`Reader`]: pull transformed bytes out of any [`std::io::Read`]
//! - [`Writer`]: push bytes through a transformer into any [`std::io::Write`]

pub mod chunk_buffer;
pub mod reader;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use chunk_buffer::ChunkBuffer;
pub use reader::{ReadState, Reader};
pub use writer::Writer;
