/*!
 * Process-Wide Queue
 *
 * Singleton facade over a `HandoffQueue<ItemHandle>` with explicit
 * init/destroy lifecycle. Prefer owning a `HandoffQueue` directly; this
 * module exists for callers that need one queue shared by the whole process.
 *
 * Lifecycle misuse is reported as `QueueError::ContractViolation` instead of
 * being undefined: initializing twice, using the queue before init or after
 * destroy, and destroying while another thread still holds the queue.
 */

use crate::config::QueueConfig;
use crate::errors::{QueueError, QueueResult};
use crate::handle::ItemHandle;
use crate::queue::{HandoffQueue, QueueStats};
use parking_lot::{const_rwlock, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type SharedQueue = Arc<HandoffQueue<ItemHandle>>;

static GLOBAL_QUEUE: RwLock<Option<SharedQueue>> = const_rwlock(None);

/// Initialize the process-wide queue with the default configuration
pub fn init_queue() -> QueueResult<()> {
    init_queue_with(QueueConfig::default())
}

pub fn init_queue_with(config: QueueConfig) -> QueueResult<()> {
    let mut slot = GLOBAL_QUEUE.write();
    if slot.is_some() {
        warn!("init_queue called on an initialized queue");
        return Err(QueueError::contract("queue already initialized"));
    }
    info!(queue = %config.label, "process-wide queue initialized");
    *slot = Some(Arc::new(HandoffQueue::with_config(config)));
    Ok(())
}

/// Tear down the process-wide queue, returning undelivered handles
///
/// Fails without side effects if any thread is still inside a queue call.
pub fn destroy_queue() -> QueueResult<Vec<ItemHandle>> {
    let mut slot = GLOBAL_QUEUE.write();
    let Some(shared) = slot.take() else {
        warn!("destroy_queue called on an uninitialized queue");
        return Err(QueueError::contract("queue not initialized"));
    };

    match Arc::try_unwrap(shared) {
        Ok(queue) => Ok(queue.destroy()),
        Err(shared) => {
            let holders = Arc::strong_count(&shared) - 1;
            *slot = Some(shared);
            warn!(holders, "destroy_queue called while the queue is in use");
            Err(QueueError::contract(format!(
                "queue still in use by {} caller(s)",
                holders
            )))
        }
    }
}

/// Whether `init_queue` has run without a matching `destroy_queue`
pub fn is_initialized() -> bool {
    GLOBAL_QUEUE.read().is_some()
}

/// Clone the shared queue out so the registry lock is never held while blocking
fn shared() -> QueueResult<SharedQueue> {
    GLOBAL_QUEUE
        .read()
        .as_ref()
        .map(Arc::clone)
        .ok_or_else(|| QueueError::contract("queue used before init_queue"))
}

pub fn enqueue(item: ItemHandle) -> QueueResult<()> {
    shared()?.enqueue(item).map_err(QueueError::from)
}

/// Block until a handle is available
pub fn dequeue() -> QueueResult<ItemHandle> {
    shared()?.dequeue()
}

pub fn dequeue_timeout(timeout: Duration) -> QueueResult<ItemHandle> {
    shared()?.dequeue_timeout(timeout)
}

/// `Ok(None)` when the queue is empty
pub fn try_dequeue() -> QueueResult<Option<ItemHandle>> {
    Ok(shared()?.try_dequeue())
}

pub fn size() -> QueueResult<usize> {
    Ok(shared()?.size())
}

pub fn waiting() -> QueueResult<usize> {
    Ok(shared()?.waiting())
}

pub fn visited() -> QueueResult<usize> {
    Ok(shared()?.visited())
}

pub fn stats() -> QueueResult<QueueStats> {
    Ok(shared()?.stats())
}
