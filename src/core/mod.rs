//! Core pipeline types and traits

pub mod channel;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod record;
pub mod sink;

pub use channel::HandoffChannel;
pub use config::{
    PipelineConfig, QuotaMode, DEFAULT_FLUSH_THRESHOLD, DEFAULT_MAX_MESSAGE_LEN,
    DEFAULT_OUTPUT_PATH, DEFAULT_TOTAL_RECORDS, DEFAULT_WORKER_COUNT,
};
pub use context::PipelineContext;
pub use error::{PipelineError, Result};
pub use metrics::PipelineMetrics;
pub use record::Record;
pub use sink::Sink;
