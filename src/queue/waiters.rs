/*!
 * Wait Coordinator
 *
 * Ordered set of blocked consumers. Each waiter owns a private condvar for
 * exactly one wait episode, so a signal always has a single recipient.
 *
 * # Handoff
 *
 * A producer never leaves an item in the store for a waiter to race for.
 * It pops the oldest waiter, parks the item in that waiter's delivery slot
 * and signals only that waiter's condvar, all under the queue lock. The
 * woken consumer then collects from its own slot, which cannot have been
 * taken by anyone else.
 */

use crate::errors::{QueueError, QueueResult, Resource};
use ahash::RandomState;
use parking_lot::Condvar;
use std::collections::{HashMap, TryReserveError, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Identifier of a single wait episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct WaiterId(u64);

impl fmt::Display for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// A registered, blocked consumer
struct Waiter {
    id: WaiterId,
    signal: Arc<Condvar>,
}

pub(crate) struct WaitCoordinator<T> {
    /// Oldest waiter first
    waiters: VecDeque<Waiter>,
    /// Items handed off but not yet collected by their waiter
    delivered: HashMap<WaiterId, T, RandomState>,
    next_id: u64,
}

impl<T> WaitCoordinator<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            waiters: VecDeque::with_capacity(capacity),
            delivered: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            next_id: 0,
        }
    }

    /// Register a new waiter at the tail of the set
    ///
    /// Room for the waiter and its future delivery is reserved first, so a
    /// failed reservation leaves the set exactly as it was and a later
    /// `hand_off` never allocates. The condvar's `Arc` has no fallible
    /// constructor and aborts on OOM like any other std allocation; it is
    /// made before the id is taken, so nothing is half-registered either way.
    pub fn register(&mut self) -> QueueResult<(WaiterId, Arc<Condvar>)> {
        let exhausted = |_: TryReserveError| QueueError::ResourceExhausted(Resource::WaiterSet);
        self.waiters.try_reserve(1).map_err(exhausted)?;
        self.delivered
            .try_reserve(self.waiters.len() + 1)
            .map_err(exhausted)?;

        let signal = Arc::new(Condvar::new());

        let id = WaiterId(self.next_id);
        self.next_id += 1;
        self.waiters.push_back(Waiter {
            id,
            signal: Arc::clone(&signal),
        });
        Ok((id, signal))
    }

    /// Give `item` to the oldest waiter and wake it
    ///
    /// Returns the item unchanged when nobody is waiting.
    pub fn hand_off(&mut self, item: T) -> Result<WaiterId, T> {
        let Some(waiter) = self.waiters.pop_front() else {
            return Err(item);
        };
        self.delivered.insert(waiter.id, item);
        waiter.signal.notify_one();
        Ok(waiter.id)
    }

    /// Take the item delivered to `id`, if any
    #[inline]
    pub fn collect(&mut self, id: WaiterId) -> Option<T> {
        self.delivered.remove(&id)
    }

    /// Remove a waiter that gave up before receiving anything
    pub fn deregister(&mut self, id: WaiterId) -> bool {
        match self.waiters.iter().position(|w| w.id == id) {
            Some(pos) => {
                self.waiters.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of registered waiters
    #[inline]
    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Deliveries not yet collected
    #[inline]
    pub fn pending_deliveries(&self) -> usize {
        self.delivered.len()
    }
}
