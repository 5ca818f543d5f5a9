//! Sink trait for flush destinations

use super::error::Result;

/// A destination the batch writer flushes buffered bytes to.
///
/// Exactly one writer thread owns the sink for the duration of a run, so
/// implementations need no interior locking.
pub trait Sink: Send {
    /// Write one flushed buffer in a single operation
    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()>;

    /// Push any sink-internal buffering to its final destination
    fn flush(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}
