//! Batch writer: the single consumer

use crate::core::{PipelineContext, PipelineMetrics, Record, Sink};
use std::sync::Arc;

/// Drains the hand-off channel and flushes records to a sink in batches.
///
/// One writer exists per run and it exclusively owns both the write buffer
/// and the sink, so nothing here needs locking. The drain loop runs until
/// `dequeue` returns the closed-and-empty sentinel; since the channel is
/// only closed after every producer has returned, reaching the sentinel
/// means every record that was ever enqueued has passed through the buffer.
pub struct BatchWriter<S: Sink> {
    sink: S,
    buffer: Vec<u8>,
    flush_threshold: usize,
    metrics: Arc<PipelineMetrics>,
}

impl<S: Sink> BatchWriter<S> {
    pub fn new(sink: S, flush_threshold: usize, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            sink,
            buffer: Vec::with_capacity(flush_threshold),
            flush_threshold,
            metrics,
        }
    }

    /// Consume records until the channel is closed and drained, then flush
    /// whatever the buffer still holds. Returns the sink so the caller can
    /// inspect it after the thread is joined.
    pub fn run(mut self, ctx: &PipelineContext) -> S {
        while let Some(record) = ctx.channel().dequeue() {
            self.append(&record);
        }

        self.flush();
        if let Err(e) = self.sink.flush() {
            eprintln!("[LOGPIPE ERROR] sink '{}' flush failed: {}", self.sink.name(), e);
        }
        self.sink
    }

    /// Append one record to the write buffer.
    ///
    /// If the record would push the buffer past the flush threshold, the
    /// current contents are flushed first; a record at or past the threshold
    /// on its own is flushed immediately after being appended.
    fn append(&mut self, record: &Record) {
        if !self.buffer.is_empty() && self.buffer.len() + record.line_len() > self.flush_threshold {
            self.flush();
        }

        self.buffer.extend_from_slice(record.message.as_bytes());
        self.buffer.push(b'\n');
        self.metrics.record_written();

        if self.buffer.len() >= self.flush_threshold {
            self.flush();
        }
    }

    /// Write the buffer to the sink in one operation and reset it.
    ///
    /// A failed write is reported and counted, the buffer contents are
    /// dropped, and draining continues; records are never re-queued after a
    /// successful dequeue.
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        match self.sink.write_chunk(&self.buffer) {
            Ok(()) => self.metrics.record_flush(self.buffer.len() as u64),
            Err(e) => {
                self.metrics.record_flush_failure();
                eprintln!(
                    "[LOGPIPE ERROR] flush of {} bytes failed: {}",
                    self.buffer.len(),
                    e
                );
            }
        }

        self.buffer.clear();
    }
}
