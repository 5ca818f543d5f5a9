//! Producer pool

use crate::core::{PipelineContext, PipelineError, QuotaMode, Record, Result};
use std::sync::Arc;
use std::thread;

/// A fixed pool of independent producer threads.
///
/// Workers share nothing beyond the context: the quota counter (shared-total
/// mode only) and the hand-off channel. Each worker stops when its quota is
/// exhausted and does no cleanup beyond returning; records it already
/// enqueued belong to the channel.
pub struct ProducerPool {
    handles: Vec<thread::JoinHandle<u64>>,
}

impl ProducerPool {
    /// Spawn `config.workers` producer threads.
    ///
    /// If a spawn fails partway, the workers that did start are joined
    /// before the error is returned, so no thread outlives the pool.
    pub fn spawn(ctx: &Arc<PipelineContext>) -> Result<Self> {
        let workers = ctx.config().workers;
        let mut handles = Vec::with_capacity(workers);

        for worker_id in 0..workers {
            let worker_ctx = Arc::clone(ctx);
            let spawned = thread::Builder::new()
                .name(format!("producer-{worker_id}"))
                .spawn(move || produce(&worker_ctx, worker_id));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PipelineError::io_operation(
                        format!("spawning producer-{worker_id}"),
                        e,
                    ));
                }
            }
        }

        Ok(Self { handles })
    }

    /// Number of workers in the pool
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker and return the total records produced.
    ///
    /// All handles are joined even if one worker panicked; the first panic
    /// is reported after the rest have finished.
    pub fn join(self) -> Result<u64> {
        let mut produced = 0;
        let mut panicked: Option<String> = None;

        for handle in self.handles {
            let name = handle
                .thread()
                .name()
                .unwrap_or("producer")
                .to_string();
            match handle.join() {
                Ok(count) => produced += count,
                Err(_) => {
                    panicked.get_or_insert(name);
                }
            }
        }

        match panicked {
            Some(name) => Err(PipelineError::worker_panicked(name)),
            None => Ok(produced),
        }
    }
}

/// Worker loop: claim or count a sequence number, stamp the elapsed time,
/// render the record, hand it off. Returns the number of records produced.
fn produce(ctx: &PipelineContext, worker_id: usize) -> u64 {
    let max_len = ctx.config().max_message_len;
    let mut produced = 0;

    match ctx.config().quota {
        QuotaMode::SharedTotal(_) => {
            while let Some(sequence) = ctx.claim_sequence() {
                if !emit(ctx, worker_id, sequence, max_len) {
                    break;
                }
                produced += 1;
            }
        }
        QuotaMode::PerWorker(count) => {
            for sequence in 1..=count {
                if !emit(ctx, worker_id, sequence, max_len) {
                    break;
                }
                produced += 1;
            }
        }
    }

    produced
}

fn emit(ctx: &PipelineContext, worker_id: usize, sequence: u64, max_len: usize) -> bool {
    let record = Record::new(worker_id, sequence, ctx.elapsed_seconds(), max_len);
    if ctx.channel().enqueue(record).is_err() {
        // Channel closed under us; nothing more to hand off
        return false;
    }
    ctx.metrics().record_produced();
    true
}
