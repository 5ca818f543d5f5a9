//! # logpipe
//!
//! A concurrent log-aggregation pipeline: independent producer workers
//! generate timestamped records at high rate, and a single batch writer
//! serializes them to a file using buffered writes.
//!
//! ## Features
//!
//! - **Blocking hand-off**: a bounded or unbounded queue with condition
//!   signaling; full channels apply backpressure instead of dropping
//! - **Batched writes**: records accumulate in a write buffer that flushes
//!   on a size threshold and on shutdown
//! - **Ordered shutdown**: the running flag only drops after every producer
//!   has returned, so the writer always drains the channel to empty
//! - **Observable**: per-run metrics and a final report
//!
//! ## Example
//!
//! ```no_run
//! use logpipe::prelude::*;
//!
//! fn main() -> logpipe::Result<()> {
//!     let config = PipelineConfig::new()
//!         .with_workers(4)
//!         .with_quota(QuotaMode::SharedTotal(20))
//!         .with_channel_capacity(4)
//!         .with_output_path("logs/log.txt");
//!
//!     let report = Pipeline::new(config)?.run()?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod pipeline;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        HandoffChannel, PipelineConfig, PipelineContext, PipelineError, PipelineMetrics,
        QuotaMode, Record, Result, Sink,
    };
    pub use crate::pipeline::{BatchWriter, Pipeline, PipelineReport, ProducerPool};
    pub use crate::sinks::{FileSink, MemorySink};
}

pub use crate::core::{
    HandoffChannel, PipelineConfig, PipelineContext, PipelineError, PipelineMetrics, QuotaMode,
    Record, Result, Sink,
};
pub use pipeline::{BatchWriter, Pipeline, PipelineReport, ProducerPool};
pub use sinks::{FileSink, MemorySink};
