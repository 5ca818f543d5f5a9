//! Shared pipeline state
//!
//! There is no process-wide mutable state anywhere in the crate; everything
//! the threads share lives here, behind one `Arc` handed to every thread:
//! the configuration, the hand-off channel, the metrics handle, the shared
//! quota counter, the running flag, and the start-of-run timestamps.

use super::channel::HandoffChannel;
use super::config::{PipelineConfig, QuotaMode};
use super::metrics::PipelineMetrics;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared state for one pipeline run
pub struct PipelineContext {
    config: PipelineConfig,
    channel: HandoffChannel,
    metrics: Arc<PipelineMetrics>,
    /// Sequence numbers claimed so far under `QuotaMode::SharedTotal`
    claimed: AtomicU64,
    /// True from construction until all producers have finished. One-way.
    running: AtomicBool,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl PipelineContext {
    pub fn new(config: PipelineConfig) -> Self {
        let metrics = Arc::new(PipelineMetrics::new());
        let channel = HandoffChannel::new(config.channel_capacity, Arc::clone(&metrics));
        Self {
            config,
            channel,
            metrics,
            claimed: AtomicU64::new(0),
            running: AtomicBool::new(true),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn channel(&self) -> &HandoffChannel {
        &self.channel
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    /// Claim the next sequence number under a shared-total quota.
    ///
    /// Atomic increment-and-check: returns `None` once the cap is reached,
    /// and no two callers ever receive the same number. Under
    /// `QuotaMode::PerWorker` there is nothing to claim and this always
    /// returns `None`.
    pub fn claim_sequence(&self) -> Option<u64> {
        let QuotaMode::SharedTotal(cap) = self.config.quota else {
            return None;
        };
        self.claimed
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |claimed| {
                (claimed < cap).then_some(claimed + 1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    /// Seconds elapsed since the run started, at microsecond print precision
    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Wall-clock duration since the run started
    pub fn elapsed(&self) -> std::time::Duration {
        self.started.elapsed()
    }

    /// Wall-clock timestamp of the run start
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether producers are still considered active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Flip the running flag and close the channel.
    ///
    /// Must only be called after every producer has returned; the channel
    /// close wakes a consumer blocked on an empty queue so it can drain and
    /// exit. The flag transition is one-way and the close happens exactly
    /// once.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            self.channel.close();
        }
    }
}
