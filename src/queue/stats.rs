/*!
 * Queue Statistics
 */

use serde::{Deserialize, Serialize};

/// Point-in-time counters, read together under the queue lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub label: String,
    /// Items in the store
    pub size: usize,
    /// Consumers currently registered as waiters
    pub waiting: usize,
    /// Lifetime successful enqueues
    pub visited: usize,
    /// Lifetime items removed by a consumer or handed off to one
    pub dequeued: usize,
}

impl QueueStats {
    /// Every accepted item is either still stored or already dequeued
    pub fn is_consistent(&self) -> bool {
        self.visited == self.size + self.dequeued
    }
}
