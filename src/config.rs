/*!
 * Queue Configuration
 *
 * Construction-time settings: a tracing label and preallocation hints
 */

use crate::limits::{
    DEFAULT_INITIAL_CAPACITY, DEFAULT_QUEUE_LABEL, DEFAULT_WAITER_CAPACITY, MAX_INITIAL_CAPACITY,
    MAX_WAITER_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Queue configuration
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Name recorded on every tracing event emitted by the queue
    pub label: Cow<'static, str>,
    /// Item slots to preallocate
    pub initial_capacity: usize,
    /// Waiter slots to preallocate
    pub waiter_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            label: Cow::Borrowed(DEFAULT_QUEUE_LABEL),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            waiter_capacity: DEFAULT_WAITER_CAPACITY,
        }
    }
}

impl QueueConfig {
    /// Configuration for queues that rarely hold more than a handful of items
    pub const fn small() -> Self {
        Self {
            label: Cow::Borrowed(DEFAULT_QUEUE_LABEL),
            initial_capacity: 4,
            waiter_capacity: 1,
        }
    }

    /// Configuration for bursty producers and many blocked consumers
    pub const fn high_throughput() -> Self {
        Self {
            label: Cow::Borrowed(DEFAULT_QUEUE_LABEL),
            initial_capacity: 4096,
            waiter_capacity: 64,
        }
    }

    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    /// Item preallocation after clamping
    pub fn effective_initial_capacity(&self) -> usize {
        self.initial_capacity.min(MAX_INITIAL_CAPACITY)
    }

    /// Waiter preallocation after clamping
    pub fn effective_waiter_capacity(&self) -> usize {
        self.waiter_capacity.min(MAX_WAITER_CAPACITY)
    }
}
