/*!
 * Item Store
 * Ordered FIFO sequence of items with current and lifetime counters
 */

use crate::errors::{QueueError, QueueResult, Resource};
use std::collections::VecDeque;

/// FIFO item storage
///
/// Head is the oldest unconsumed item. Only mutated under the queue lock.
pub(crate) struct ItemStore<T> {
    items: VecDeque<T>,
    /// Lifetime appends, never decremented
    visited: usize,
}

impl<T> ItemStore<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            visited: 0,
        }
    }

    /// Append at the tail
    ///
    /// Space is reserved before the item moves in, so a failed allocation
    /// hands the item back untouched along with the error.
    pub fn try_append(&mut self, item: T) -> Result<(), (T, QueueError)> {
        if let Err(err) = self.reserve_one() {
            return Err((item, err));
        }
        self.items.push_back(item);
        self.visited += 1;
        Ok(())
    }

    fn reserve_one(&mut self) -> QueueResult<()> {
        self.items
            .try_reserve(1)
            .map_err(|_| QueueError::ResourceExhausted(Resource::ItemStore))
    }

    /// Remove the oldest item
    #[inline]
    pub fn remove_head(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Put back an item just taken from the head
    ///
    /// Never allocates: the slot freed by `remove_head` is reused.
    #[inline]
    pub fn restore_head(&mut self, item: T) {
        self.items.push_front(item);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Release the nodes, handing every remaining item back in FIFO order
    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }
}
