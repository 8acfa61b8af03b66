/*!
 * Item Handles
 * Pointer-sized opaque handles moved through the process-wide queue
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, pointer-sized item handle
///
/// The queue relocates handles from producers to consumers and never
/// dereferences or frees what they point at. Ownership of the payload
/// stays with the caller.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ItemHandle(usize);

impl ItemHandle {
    #[inline]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }

    /// Wrap a pointer without taking ownership of the pointee
    #[inline]
    pub fn from_ptr<P>(ptr: *const P) -> Self {
        Self(ptr as usize)
    }

    /// Recover the pointer the handle was created from
    #[inline]
    pub fn as_ptr<P>(self) -> *const P {
        self.0 as *const P
    }
}

impl From<usize> for ItemHandle {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl From<ItemHandle> for usize {
    fn from(handle: ItemHandle) -> Self {
        handle.0
    }
}

impl fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemHandle({:#x})", self.0)
    }
}
