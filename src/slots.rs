//! Fixed-capacity pool of concurrency slots for flood branches.
#![cfg_attr(not(feature = "parallel"), allow(dead_code))]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bounds how many flood branches may run concurrently.
///
/// Acquiring never blocks: when every slot is taken the caller keeps the work for itself.
#[derive(Debug)]
pub(crate) struct SlotPool {
    capacity: usize,
    in_use: AtomicUsize,
}

impl SlotPool {
    pub(crate) fn new(capacity: usize) -> Self {
        SlotPool {
            capacity,
            in_use: AtomicUsize::new(0),
        }
    }

    /// Takes a free slot, or returns `None` if the pool is saturated.
    pub(crate) fn try_acquire(&self) -> Option<SlotPermit<'_>> {
        self.in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |in_use| {
                (in_use < self.capacity).then_some(in_use + 1)
            })
            .ok()
            .map(|_| SlotPermit { pool: self })
    }

    pub(crate) fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }
}

/// A held slot. Dropping it returns the slot to its pool.
#[derive(Debug)]
pub(crate) struct SlotPermit<'a> {
    pool: &'a SlotPool,
}

impl Drop for SlotPermit<'_> {
    fn drop(&mut self) {
        self.pool.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}
