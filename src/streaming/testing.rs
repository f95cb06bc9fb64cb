//! Test doubles for the stream adapters

use std::io::{self, Read, Write};

/// Upstream that hands out at most `chunk` bytes per read
pub struct ChunkedSource<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> ChunkedSource<'a> {
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self { data, chunk: chunk.max(1) }
    }
}

impl Read for ChunkedSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Upstream that yields `data` once, then fails on every later read
pub struct FailingSource<'a> {
    data: &'a [u8],
    kind: io::ErrorKind,
}

impl<'a> FailingSource<'a> {
    pub fn new(data: &'a [u8], kind: io::ErrorKind) -> Self {
        Self { data, kind }
    }
}

impl Read for FailingSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(self.kind, "source failed"));
        }
        let n = buf.len().min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Downstream that accepts `budget` bytes, then fails
pub struct FailingSink {
    pub written: Vec<u8>,
    budget: usize,
    kind: io::ErrorKind,
}

impl FailingSink {
    pub fn new(budget: usize, kind: io::ErrorKind) -> Self {
        Self {
            written: Vec::new(),
            budget,
            kind,
        }
    }
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(self.kind, "sink failed"));
        }
        let n = buf.len().min(self.budget);
        self.written.extend_from_slice(&buf[..n]);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
