/*!
 * Handoff Queue
 *
 * Unbounded FIFO blocking queue. Producers never block; consumers either
 * block in `dequeue` until an item is handed to them or poll with
 * `try_dequeue`.
 *
 * # Protocol
 *
 * One mutex guards the item store, the waiter set and every counter.
 *
 * - `enqueue` appends under the lock. If a consumer is registered, the new
 *   head moves straight into the oldest waiter's delivery slot and only that
 *   waiter's condvar is signalled, before the lock is released.
 * - `dequeue` takes the head if there is one. Otherwise it registers a
 *   waiter with a fresh condvar and sleeps on it; the wait releases the lock
 *   atomically. On wake it collects from its own slot.
 * - `try_dequeue` never registers and never sleeps.
 *
 * Waiters only exist while the store is empty. Delivery slots are private,
 * so a racing `try_dequeue` can never steal an item meant for a waiter, and
 * a wakeup with an empty slot (parking_lot may wake spuriously) just goes
 * back to sleep.
 *
 * A handed-off item counts as dequeued, and its waiter stops counting as
 * waiting, at the moment of the handoff.
 */

mod stats;
mod store;
mod waiters;

pub use stats::QueueStats;

use crate::config::QueueConfig;
use crate::errors::{EnqueueError, QueueError, QueueResult};
use parking_lot::Mutex;
use std::borrow::Cow;
use std::fmt;
use std::time::{Duration, Instant};
use store::ItemStore;
use tracing::{debug, info, warn};
use waiters::{WaitCoordinator, WaiterId};

/// State guarded by the queue lock
struct QueueState<T> {
    store: ItemStore<T>,
    waiters: WaitCoordinator<T>,
    dequeued: usize,
}

impl<T> QueueState<T> {
    #[inline]
    fn take_head(&mut self) -> Option<T> {
        let item = self.store.remove_head()?;
        self.dequeued += 1;
        Some(item)
    }

    /// Move the head item to the oldest waiter, if anyone is waiting
    fn hand_off_head(&mut self) -> Option<WaiterId> {
        if self.waiters.is_empty() {
            return None;
        }
        let head = self.store.remove_head()?;
        match self.waiters.hand_off(head) {
            Ok(waiter) => {
                self.dequeued += 1;
                Some(waiter)
            }
            Err(head) => {
                self.store.restore_head(head);
                None
            }
        }
    }
}

/// Thread-safe unbounded FIFO queue with per-waiter handoff
///
/// # Examples
///
/// ```
/// use handoff_queue::HandoffQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(HandoffQueue::new());
/// let consumer = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || queue.dequeue())
/// };
///
/// queue.enqueue("job").unwrap();
/// assert_eq!(consumer.join().unwrap().unwrap(), "job");
/// assert_eq!(queue.visited(), 1);
/// ```
pub struct HandoffQueue<T> {
    state: Mutex<QueueState<T>>,
    label: Cow<'static, str>,
}

impl<T> HandoffQueue<T> {
    /// Create a queue with the default configuration
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        let queue = Self {
            state: Mutex::new(QueueState {
                store: ItemStore::with_capacity(config.effective_initial_capacity()),
                waiters: WaitCoordinator::with_capacity(config.effective_waiter_capacity()),
                dequeued: 0,
            }),
            label: config.label,
        };
        debug!(queue = %queue.label, "queue created");
        queue
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Append an item, waking the oldest blocked consumer if there is one
    ///
    /// Never blocks. On allocation failure the item is returned inside the
    /// error and no state changes.
    pub fn enqueue(&self, item: T) -> Result<(), EnqueueError<T>> {
        let mut state = self.state.lock();

        if let Err((item, err)) = state.store.try_append(item) {
            warn!(queue = %self.label, error = %err, "enqueue rejected");
            return Err(EnqueueError::new(item, err));
        }

        if !state.waiters.is_empty() {
            debug_assert_eq!(state.store.len(), 1, "waiters registered on a non-empty store");
            if let Some(waiter) = state.hand_off_head() {
                debug!(
                    queue = %self.label,
                    waiter = %waiter,
                    still_waiting = state.waiters.len(),
                    "item handed off"
                );
            }
        }

        Ok(())
    }

    /// Remove the oldest item, blocking until one is handed off
    ///
    /// Waits indefinitely. Fails only if the waiter record cannot be
    /// allocated, in which case nothing is registered.
    pub fn dequeue(&self) -> QueueResult<T> {
        self.dequeue_until(None)
    }

    /// Like `dequeue`, but gives up after `timeout`
    ///
    /// An item handed off right at the deadline is still returned. Otherwise
    /// the waiter leaves the set with no pending notification.
    pub fn dequeue_timeout(&self, timeout: Duration) -> QueueResult<T> {
        let deadline = Instant::now().checked_add(timeout);
        self.dequeue_until(deadline.map(|at| (at, timeout)))
    }

    fn dequeue_until(&self, deadline: Option<(Instant, Duration)>) -> QueueResult<T> {
        let mut state = self.state.lock();

        if let Some(item) = state.take_head() {
            return Ok(item);
        }

        let (id, signal) = state.waiters.register().map_err(|err| {
            warn!(queue = %self.label, error = %err, "waiter registration failed");
            err
        })?;
        debug!(
            queue = %self.label,
            waiter = %id,
            waiting = state.waiters.len(),
            "consumer waiting"
        );

        loop {
            if let Some(item) = state.waiters.collect(id) {
                return Ok(item);
            }

            match deadline {
                None => signal.wait(&mut state),
                Some((at, timeout)) => {
                    if signal.wait_until(&mut state, at).timed_out() {
                        // The handoff may have landed between the timeout and relocking.
                        if let Some(item) = state.waiters.collect(id) {
                            return Ok(item);
                        }
                        state.waiters.deregister(id);
                        debug!(queue = %self.label, waiter = %id, "wait timed out");
                        return Err(QueueError::Timeout {
                            waited_ms: timeout.as_millis().try_into().unwrap_or(u64::MAX),
                        });
                    }
                }
            }
        }
    }

    /// Remove the oldest item without blocking
    ///
    /// `None` means the store was empty at the time of the check.
    pub fn try_dequeue(&self) -> Option<T> {
        self.state.lock().take_head()
    }

    /// Items currently stored
    pub fn size(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Consumers currently blocked in `dequeue`
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Lifetime successful enqueues
    pub fn visited(&self) -> usize {
        self.state.lock().store.visited()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    /// Consistent snapshot of every counter
    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        QueueStats {
            label: self.label.to_string(),
            size: state.store.len(),
            waiting: state.waiters.len(),
            visited: state.store.visited(),
            dequeued: state.dequeued,
        }
    }

    /// Tear the queue down and return every undelivered item
    ///
    /// Taking `self` by value means no other thread can still be inside an
    /// operation, so no waiter records survive.
    pub fn destroy(self) -> Vec<T> {
        let mut state = self.state.into_inner();
        debug_assert!(state.waiters.is_empty());
        debug_assert_eq!(state.waiters.pending_deliveries(), 0);

        let remaining = state.store.drain();
        info!(
            queue = %self.label,
            visited = state.store.visited(),
            remaining = remaining.len(),
            "queue destroyed"
        );
        remaining
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandoffQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("HandoffQueue")
            .field("label", &stats.label)
            .field("size", &stats.size)
            .field("waiting", &stats.waiting)
            .field("visited", &stats.visited)
            .finish()
    }
}
