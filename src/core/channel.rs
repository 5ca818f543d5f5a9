//! Hand-off channel between producers and the writer
//!
//! A blocking multi-producer/single-consumer queue. Producers enqueue at the
//! tail and, when the channel is bounded and full, wait for space instead of
//! dropping records or growing without limit. The consumer dequeues from the
//! head and waits while the channel is empty and still open; once the channel
//! is closed and drained, `dequeue` returns `None` as the no-more-data
//! sentinel.
//!
//! All queue state is guarded by one mutex, so every enqueue/dequeue is
//! atomic with respect to every other. The close bit lives under the same
//! mutex as the wait predicates; a close can therefore never race a waiter
//! into a lost wake-up.

use super::error::{PipelineError, Result};
use super::metrics::PipelineMetrics;
use super::record::Record;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;

struct ChannelState {
    queue: VecDeque<Record>,
    closed: bool,
}

/// The concurrent queue moving records from producers to the writer.
pub struct HandoffChannel {
    state: Mutex<ChannelState>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: Option<usize>,
    metrics: Arc<PipelineMetrics>,
}

impl HandoffChannel {
    /// Create a channel. `capacity` of `None` means unbounded.
    pub fn new(capacity: Option<usize>, metrics: Arc<PipelineMetrics>) -> Self {
        let initial = match capacity {
            Some(n) => VecDeque::with_capacity(n),
            None => VecDeque::new(),
        };
        Self {
            state: Mutex::new(ChannelState {
                queue: initial,
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            metrics,
        }
    }

    /// Append a record at the tail.
    ///
    /// If the channel is bounded and full, the calling producer waits until
    /// a dequeue frees space. Exactly one waiting consumer is woken after a
    /// successful enqueue. Enqueueing on a closed channel returns
    /// [`PipelineError::ChannelClosed`] and the record is discarded with the
    /// error.
    pub fn enqueue(&self, record: Record) -> Result<()> {
        let mut state = self.state.lock();

        if let Some(capacity) = self.capacity {
            let mut counted_block = false;
            while state.queue.len() >= capacity && !state.closed {
                if !counted_block {
                    counted_block = true;
                    self.metrics.record_producer_block();
                }
                self.not_full.wait(&mut state);
            }
        }

        if state.closed {
            return Err(PipelineError::ChannelClosed);
        }

        state.queue.push_back(record);
        self.metrics.observe_queue_depth(state.queue.len() as u64);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the head record.
    ///
    /// Waits while the channel is empty and still open. Returns `None` only
    /// once the channel has been closed and every enqueued record has been
    /// handed out.
    pub fn dequeue(&self) -> Option<Record> {
        let mut state = self.state.lock();

        while state.queue.is_empty() && !state.closed {
            self.not_empty.wait(&mut state);
        }

        match state.queue.pop_front() {
            Some(record) => {
                drop(state);
                self.not_full.notify_one();
                Some(record)
            }
            // Closed and drained
            None => None,
        }
    }

    /// Close the channel: no further enqueues, dequeues drain what remains.
    ///
    /// Wakes every waiter on both conditions so blocked producers see the
    /// error and a blocked consumer sees the sentinel. Idempotent; the
    /// open→closed transition is one-way.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);

        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// Point-in-time record count. Advisory only.
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Point-in-time emptiness check. Advisory only.
    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// Whether the channel has been closed
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Configured capacity; `None` means unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
