//! Pipeline configuration
//!
//! The configuration surface is a plain struct with named defaults, built in
//! code rather than parsed from flags. A JSON file loader is provided for
//! deployments that keep the knobs next to the binary.

use super::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of producer workers
pub const DEFAULT_WORKER_COUNT: usize = 10;
/// Default total record quota shared across all workers
pub const DEFAULT_TOTAL_RECORDS: u64 = 1_000_000;
/// Default per-message size cap in bytes
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 256;
/// Default write-buffer flush threshold in bytes
pub const DEFAULT_FLUSH_THRESHOLD: usize = 4096;
/// Default output file path
pub const DEFAULT_OUTPUT_PATH: &str = "logs/log.txt";

/// How producers decide when their work is done.
///
/// Both models terminate a worker when its quota is exhausted; records it
/// already enqueued stay owned by the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaMode {
    /// One global cap, claimed record-by-record via an atomic
    /// increment-and-check. The sum of records produced by all workers never
    /// exceeds the cap and no two workers claim the same sequence number.
    SharedTotal(u64),

    /// A fixed count per worker, independent of other workers. Sequence
    /// numbers are local to each worker (`1..=count`).
    PerWorker(u64),
}

impl QuotaMode {
    /// Total number of records a full run will produce
    #[must_use]
    pub fn total_records(&self, workers: usize) -> u64 {
        match self {
            QuotaMode::SharedTotal(n) => *n,
            QuotaMode::PerWorker(n) => n.saturating_mul(workers as u64),
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of producer workers
    pub workers: usize,
    /// Record quota model
    pub quota: QuotaMode,
    /// Per-message size cap in bytes
    pub max_message_len: usize,
    /// Hand-off channel capacity; `None` means unbounded
    pub channel_capacity: Option<usize>,
    /// Write-buffer flush threshold in bytes
    pub flush_threshold: usize,
    /// Output file path (opened in append mode)
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKER_COUNT,
            quota: QuotaMode::SharedTotal(DEFAULT_TOTAL_RECORDS),
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            channel_capacity: None,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of producer workers
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the quota model
    #[must_use]
    pub fn with_quota(mut self, quota: QuotaMode) -> Self {
        self.quota = quota;
        self
    }

    /// Set the per-message size cap
    #[must_use]
    pub fn with_max_message_len(mut self, max_len: usize) -> Self {
        self.max_message_len = max_len;
        self
    }

    /// Bound the hand-off channel at `capacity` records
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }

    /// Leave the hand-off channel unbounded
    #[must_use]
    pub fn with_unbounded_channel(mut self) -> Self {
        self.channel_capacity = None;
        self
    }

    /// Set the write-buffer flush threshold
    #[must_use]
    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold;
        self
    }

    /// Set the output file path
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PipelineError::io_operation(
                format!("reading config file '{}'", path.as_ref().display()),
                e,
            )
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Total number of records this configuration will produce
    #[must_use]
    pub fn total_records(&self) -> u64 {
        self.quota.total_records(self.workers)
    }

    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(PipelineError::config(
                "PipelineConfig",
                "workers must be at least 1",
            ));
        }
        if self.channel_capacity == Some(0) {
            return Err(PipelineError::config(
                "PipelineConfig",
                "channel capacity must be at least 1 when bounded",
            ));
        }
        if self.flush_threshold == 0 {
            return Err(PipelineError::config(
                "PipelineConfig",
                "flush threshold must be at least 1 byte",
            ));
        }
        if self.max_message_len == 0 {
            return Err(PipelineError::config(
                "PipelineConfig",
                "message cap must be at least 1 byte",
            ));
        }
        Ok(())
    }
}
