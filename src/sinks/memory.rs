//! In-memory sink, used by tests and benchmarks

use crate::core::{Result, Sink};

/// Collects flushed chunks into an in-memory buffer.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Vec<u8>,
    chunk_sizes: Vec<usize>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything flushed so far
    pub fn contents(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of chunks received (one per successful flush)
    pub fn chunk_count(&self) -> usize {
        self.chunk_sizes.len()
    }

    /// Size in bytes of each received chunk, in arrival order
    pub fn chunk_sizes(&self) -> &[usize] {
        &self.chunk_sizes
    }

    /// Contents as UTF-8 text
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Contents split into lines
    pub fn lines(&self) -> Vec<String> {
        self.as_text().lines().map(String::from).collect()
    }
}

impl Sink for MemorySink {
    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);
        self.chunk_sizes.push(bytes.len());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
