//! Pipeline lifecycle coordination

pub mod producer;
pub mod writer;

pub use producer::ProducerPool;
pub use writer::BatchWriter;

use crate::core::{PipelineConfig, PipelineContext, PipelineError, Result, Sink};
use crate::sinks::FileSink;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Coordinates one run: writer first, then producers, then an ordered
/// shutdown.
///
/// The ordering contract, start to finish:
/// 1. channel and write state are built before any thread exists;
/// 2. the batch-writer thread starts;
/// 3. the producer pool starts;
/// 4. all producers are joined;
/// 5. only then is the running flag dropped and the channel closed, waking
///    a consumer blocked on an empty queue;
/// 6. the writer is joined, which implies the final drain and flush ran;
/// 7. channel and file resources are released by ownership.
///
/// Flipping the flag before step 4 completes would let the writer exit while
/// producers still hold records in flight, so `run_with_sink` never exposes
/// a way to do that.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validate `config` and build a pipeline ready to run.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run against the configured output file.
    ///
    /// The file is opened before any thread is spawned; an open failure is
    /// fatal and nothing else happens.
    pub fn run(self) -> Result<PipelineReport> {
        let sink = FileSink::create(&self.config.output_path)?;
        let (report, _sink) = self.run_with_sink(sink)?;
        Ok(report)
    }

    /// Run against a caller-provided sink and hand the sink back afterwards.
    pub fn run_with_sink<S: Sink + 'static>(self, sink: S) -> Result<(PipelineReport, S)> {
        let ctx = Arc::new(PipelineContext::new(self.config.clone()));

        let batch_writer = BatchWriter::new(
            sink,
            self.config.flush_threshold,
            Arc::clone(ctx.metrics()),
        );
        let writer_ctx = Arc::clone(&ctx);
        let writer_handle = thread::Builder::new()
            .name("batch-writer".to_string())
            .spawn(move || batch_writer.run(&writer_ctx))
            .map_err(|e| PipelineError::io_operation("spawning batch-writer", e))?;

        let producers = match ProducerPool::spawn(&ctx) {
            Ok(pool) => pool,
            Err(e) => {
                // Writer is already up; close the channel so it drains out
                ctx.shutdown();
                let _ = writer_handle.join();
                return Err(e);
            }
        };

        // All producers must have returned before the flag flips
        let joined = producers.join();
        ctx.shutdown();

        let sink = writer_handle
            .join()
            .map_err(|_| PipelineError::worker_panicked("batch-writer"))?;
        let produced = joined?;

        Ok((PipelineReport::collect(&ctx, produced), sink))
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Wall-clock timestamp the run started at
    pub started_at: DateTime<Utc>,
    /// Total elapsed wall-clock time
    pub elapsed: Duration,
    pub records_produced: u64,
    pub records_written: u64,
    pub bytes_written: u64,
    pub flushes: u64,
    pub flush_failures: u64,
    pub producer_block_events: u64,
    pub queue_high_water: u64,
}

impl PipelineReport {
    fn collect(ctx: &PipelineContext, produced: u64) -> Self {
        let metrics = ctx.metrics();
        Self {
            started_at: ctx.started_at(),
            elapsed: ctx.elapsed(),
            records_produced: produced,
            records_written: metrics.records_written(),
            bytes_written: metrics.bytes_written(),
            flushes: metrics.flushes(),
            flush_failures: metrics.flush_failures(),
            producer_block_events: metrics.producer_block_events(),
            queue_high_water: metrics.queue_high_water(),
        }
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} records produced, {} written ({} bytes in {} flushes, {} failed)",
            self.records_produced,
            self.records_written,
            self.bytes_written,
            self.flushes,
            self.flush_failures
        )?;
        writeln!(
            f,
            "peak queue depth {}, producer waits {}",
            self.queue_high_water, self.producer_block_events
        )?;
        write!(
            f,
            "Total execution time: {:.4} seconds",
            self.elapsed.as_secs_f64()
        )
    }
}
