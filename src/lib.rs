/*!
 * Handoff Queue Library
 * Unbounded FIFO blocking queue with per-waiter handoff
 */

pub mod config;
pub mod errors;
pub mod global;
pub mod handle;
pub mod limits;
pub mod queue;

// Re-exports
pub use config::QueueConfig;
pub use errors::{EnqueueError, QueueError, QueueResult, Resource};
pub use handle::ItemHandle;
pub use queue::{HandoffQueue, QueueStats};
