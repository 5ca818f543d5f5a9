//! Pipeline metrics for observability
//!
//! Counters for monitoring a run: records moved, flush activity, and how
//! hard the backpressure path was exercised.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for pipeline observability
///
/// All counters are relaxed atomics; they are advisory and never drive
/// control flow.
#[derive(Debug)]
pub struct PipelineMetrics {
    /// Records successfully enqueued by producers
    records_produced: AtomicU64,

    /// Records appended to the write buffer by the writer
    records_written: AtomicU64,

    /// Bytes handed to the sink across all flushes
    bytes_written: AtomicU64,

    /// Number of buffer flushes attempted
    flushes: AtomicU64,

    /// Number of flushes that failed at the sink
    flush_failures: AtomicU64,

    /// Number of enqueues that had to wait for channel space
    producer_block_events: AtomicU64,

    /// Highest channel occupancy observed at enqueue time
    queue_high_water: AtomicU64,
}

impl PipelineMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_produced: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            producer_block_events: AtomicU64::new(0),
            queue_high_water: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_produced(&self) -> u64 {
        self.records_produced.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn producer_block_events(&self) -> u64 {
        self.producer_block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_high_water(&self) -> u64 {
        self.queue_high_water.load(Ordering::Relaxed)
    }

    /// Record a successful enqueue
    #[inline]
    pub fn record_produced(&self) -> u64 {
        self.records_produced.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a record appended to the write buffer
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a flush of `bytes` handed to the sink
    #[inline]
    pub fn record_flush(&self, bytes: u64) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a failed flush attempt
    #[inline]
    pub fn record_flush_failure(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.flush_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an enqueue that had to wait for space
    #[inline]
    pub fn record_producer_block(&self) -> u64 {
        self.producer_block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Raise the observed occupancy high-water mark to at least `depth`
    #[inline]
    pub fn observe_queue_depth(&self, depth: u64) {
        self.queue_high_water.fetch_max(depth, Ordering::Relaxed);
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.records_produced.store(0, Ordering::Relaxed);
        self.records_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
        self.flush_failures.store(0, Ordering::Relaxed);
        self.producer_block_events.store(0, Ordering::Relaxed);
        self.queue_high_water.store(0, Ordering::Relaxed);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PipelineMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            records_produced: AtomicU64::new(self.records_produced()),
            records_written: AtomicU64::new(self.records_written()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            flushes: AtomicU64::new(self.flushes()),
            flush_failures: AtomicU64::new(self.flush_failures()),
            producer_block_events: AtomicU64::new(self.producer_block_events()),
            queue_high_water: AtomicU64::new(self.queue_high_water()),
        }
    }
}
