/*!
 * Error Types
 * Queue errors with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Internal structure whose growth failed
///
/// Fieldless so that reporting an allocation failure never allocates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    ItemStore,
    WaiterSet,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::ItemStore => "item store",
            Resource::WaiterSet => "waiter set",
        })
    }
}

/// Queue errors
///
/// An empty queue is not an error: `try_dequeue` reports it as `None`.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum QueueError {
    #[error("Allocation failed: {0}")]
    #[diagnostic(
        code(queue::resource_exhausted),
        help("The process could not grow the item store or waiter set. Queue state is unchanged.")
    )]
    ResourceExhausted(Resource),

    #[error("Contract violation: {0}")]
    #[diagnostic(
        code(queue::contract_violation),
        help("Initialize the queue once before use and tear it down only after all producers and consumers have stopped.")
    )]
    ContractViolation(String),

    #[error("Dequeue timed out after {waited_ms}ms")]
    #[diagnostic(
        code(queue::timeout),
        help("No item was handed off before the deadline. The waiter has left the wait set.")
    )]
    Timeout { waited_ms: u64 },
}

impl QueueError {
    pub fn contract(msg: impl Into<String>) -> Self {
        QueueError::ContractViolation(msg.into())
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, QueueError::Timeout { .. })
    }
}

/// Failed enqueue that hands the item back to the producer
///
/// The queue never drops a payload it did not accept.
pub struct EnqueueError<T> {
    item: T,
    source: QueueError,
}

impl<T> EnqueueError<T> {
    pub(crate) fn new(item: T, source: QueueError) -> Self {
        Self { item, source }
    }

    /// The underlying queue error
    pub fn error(&self) -> &QueueError {
        &self.source
    }

    /// Recover the rejected item
    pub fn into_inner(self) -> T {
        self.item
    }

    /// Split into the rejected item and the error
    pub fn into_parts(self) -> (T, QueueError) {
        (self.item, self.source)
    }
}

impl<T> fmt::Debug for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnqueueError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enqueue rejected: {}", self.source)
    }
}

impl<T> std::error::Error for EnqueueError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<T> From<EnqueueError<T>> for QueueError {
    fn from(err: EnqueueError<T>) -> Self {
        err.source
    }
}
