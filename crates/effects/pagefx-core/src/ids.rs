//! Identifiers and a simple allocator for watch items.

use serde::{Deserialize, Serialize};

/// Handle returned by [`crate::ScrollTracker::add`]; equals the registration index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WatchId(pub u32);

/// Monotonic allocator for WatchId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_watch: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_watch(&mut self) -> WatchId {
        let id = WatchId(self.next_watch);
        self.next_watch = self.next_watch.wrapping_add(1);
        id
    }
}
