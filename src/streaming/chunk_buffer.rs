//! Fixed-capacity chunk buffer
//!
//! Memory usage is FLAT regardless of stream length:
//! - Pre-allocated once, never grows
//! - Pending bytes live between a start and an end cursor
//! - Consumed space is reclaimed by compacting pending bytes to the front

/// Pre-allocated window of pending bytes
#[derive(Debug)]
pub struct ChunkBuffer {
    /// Pre-allocated fixed-size storage
    buffer: Vec<u8>,
    /// First pending byte
    start: usize,
    /// One past the last pending byte
    end: usize,
}

impl ChunkBuffer {
    /// Create with fixed capacity - NO dynamic growth
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity],
            start: 0,
            end: 0,
        }
    }

    /// Pending bytes
    pub fn data(&self) -> &[u8] {
        &self.buffer[self.start..self.end]
    }

    /// Writable space after the pending bytes
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.end..]
    }

    /// Whole storage, discarding anything pending
    pub fn whole_mut(&mut self) -> &mut [u8] {
        self.clear();
        &mut self.buffer[..]
    }

    /// Mark `n` bytes of the spare space as pending
    pub fn commit(&mut self, n: usize) {
        debug_assert!(self.end + n <= self.buffer.len());
        self.end += n;
    }

    /// Drop `n` pending bytes from the front
    pub fn consume(&mut self, n: usize) {
        debug_assert!(self.start + n <= self.end);
        self.start += n;
        if self.start == self.end {
            self.clear();
        }
    }

    /// Copy as much of `bytes` as fits after the pending bytes, compacting when needed.
    /// Returns the number of bytes taken.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        if self.buffer.len() - self.end < bytes.len() {
            self.compact();
        }
        let n = bytes.len().min(self.buffer.len() - self.end);
        self.buffer[self.end..self.end + n].copy_from_slice(&bytes[..n]);
        self.end += n;
        n
    }

    /// Move pending bytes to the front so all free space is at the end
    pub fn compact(&mut self) {
        if self.start > 0 {
            self.buffer.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
    }

    /// Copy pending bytes into `out`, consuming what was copied
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.len());
        out[..n].copy_from_slice(&self.buffer[self.start..self.start + n]);
        self.consume(n);
        n
    }

    /// Forget all pending bytes
    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    /// Number of pending bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Pending bytes fill the entire buffer
    pub fn is_full(&self) -> bool {
        self.len() == self.buffer.len()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_limit() {
        let mut buffer = ChunkBuffer::new(8);
        assert_eq!(buffer.append(b"0123456789"), 8);
        assert!(buffer.is_full());
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.buffer.len(), 8);
    }

    #[test]
    fn test_commit_and_consume() {
        let mut buffer = ChunkBuffer::new(16);
        buffer.spare_mut()[..5].copy_from_slice(b"hello");
        buffer.commit(5);
        assert_eq!(buffer.data(), b"hello");

        buffer.consume(2);
        assert_eq!(buffer.data(), b"llo");
        assert_eq!(buffer.spare_mut().len(), 11);
    }

    #[test]
    fn test_consume_all_rewinds() {
        let mut buffer = ChunkBuffer::new(4);
        buffer.append(b"abcd");
        buffer.consume(4);
        assert!(buffer.is_empty());
        assert_eq!(buffer.spare_mut().len(), 4);
    }

    #[test]
    fn test_append_compacts_when_tail_is_full() {
        let mut buffer = ChunkBuffer::new(4);
        buffer.append(b"abcd");
        buffer.consume(3);

        assert_eq!(buffer.append(b"xyz"), 3);
        assert_eq!(buffer.data(), b"dxyz");
    }

    #[test]
    fn test_drain_into() {
        let mut buffer = ChunkBuffer::new(8);
        buffer.append(b"abcdef");

        let mut out = [0u8; 4];
        assert_eq!(buffer.drain_into(&mut out), 4);
        assert_eq!(&out, b"abcd");
        assert_eq!(buffer.data(), b"ef");
    }

    #[test]
    fn test_whole_mut_discards_pending() {
        let mut buffer = ChunkBuffer::new(4);
        buffer.append(b"ab");
        assert_eq!(buffer.whole_mut().len(), 4);
        assert!(buffer.is_empty());
    }
}
