/*!
 * Allocation Failure Tests
 *
 * Runs the queue against a global allocator that can be made to fail on
 * the current thread, checking that exhaustion is reported as an error and
 * leaves the store and waiter set untouched.
 */

use handoff_queue::{HandoffQueue, QueueConfig, QueueError, Resource};
use pretty_assertions::assert_eq;
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;

/// System allocator that returns null while the calling thread is armed
struct FailingAlloc;

thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
}

fn armed() -> bool {
    ARMED.try_with(Cell::get).unwrap_or(false)
}

unsafe impl GlobalAlloc for FailingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if armed() {
            return ptr::null_mut();
        }
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if armed() {
            return ptr::null_mut();
        }
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if armed() {
            return ptr::null_mut();
        }
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: FailingAlloc = FailingAlloc;

/// Run `f` with every allocation on this thread failing
fn without_memory<R>(f: impl FnOnce() -> R) -> R {
    // Touch the tracing dispatcher's thread-local before arming.
    tracing::dispatcher::get_default(|_| ());

    ARMED.with(|a| a.set(true));
    let result = f();
    ARMED.with(|a| a.set(false));
    result
}

fn unpreallocated() -> QueueConfig {
    QueueConfig {
        initial_capacity: 0,
        waiter_capacity: 0,
        ..QueueConfig::default()
    }
}

#[test]
fn test_enqueue_returns_item_when_store_cannot_grow() {
    let queue = HandoffQueue::with_config(unpreallocated());

    let result = without_memory(|| queue.enqueue(5u32));

    let (item, err) = result.unwrap_err().into_parts();
    assert_eq!(item, 5);
    assert_eq!(err, QueueError::ResourceExhausted(Resource::ItemStore));
    assert_eq!(queue.size(), 0);
    assert_eq!(queue.visited(), 0);
    assert!(queue.stats().is_consistent());

    // Nothing was left half-done: the queue works once memory is back.
    queue.enqueue(6).unwrap();
    assert_eq!(queue.dequeue().unwrap(), 6);
    assert_eq!(queue.visited(), 1);
}

#[test]
fn test_dequeue_fails_cleanly_when_waiter_set_cannot_grow() {
    let queue = HandoffQueue::<u32>::with_config(unpreallocated());

    let result = without_memory(|| queue.dequeue());

    assert_eq!(
        result.unwrap_err(),
        QueueError::ResourceExhausted(Resource::WaiterSet)
    );
    assert_eq!(queue.waiting(), 0);
    assert_eq!(queue.size(), 0);

    // A later enqueue is stored, not handed to a phantom waiter.
    queue.enqueue(8).unwrap();
    assert_eq!(queue.size(), 1);
    assert_eq!(queue.stats().dequeued, 0);
    assert_eq!(queue.try_dequeue(), Some(8));
}

#[test]
fn test_timed_dequeue_fails_cleanly_when_waiter_set_cannot_grow() {
    let queue = HandoffQueue::<u32>::with_config(unpreallocated());

    let result = without_memory(|| queue.dequeue_timeout(std::time::Duration::from_secs(5)));

    assert!(matches!(
        result,
        Err(QueueError::ResourceExhausted(Resource::WaiterSet))
    ));
    assert_eq!(queue.waiting(), 0);
}
