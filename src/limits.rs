/*!
 * Queue Limits and Constants
 *
 * Defaults and clamps for preallocation hints. The queue itself is
 * unbounded: these values only size the initial allocations.
 */

/// Label attached to tracing events when none is configured
pub const DEFAULT_QUEUE_LABEL: &str = "handoff";

/// Item slots preallocated by a default queue
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Waiter slots preallocated by a default queue
pub const DEFAULT_WAITER_CAPACITY: usize = 8;

/// Largest item preallocation honoured (1M slots)
/// Larger hints are clamped; the store still grows past this on demand
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Largest waiter preallocation honoured
/// One waiter per blocked OS thread, so a few thousand is already generous
pub const MAX_WAITER_CAPACITY: usize = 4096;
