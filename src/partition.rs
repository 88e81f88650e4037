//! Splitting a linear index space into per-worker ranges.
//!
//! `total_units` is divided into `workers` contiguous ranges whose lengths differ by at
//! most one: every range gets `total_units / workers` units and the first
//! `total_units % workers` ranges get one more. Worker `i` starts at
//! `i * base + min(i, remainder)`.
//!
//! The ranges of one partition are disjoint and cover `[0, total_units)` exactly, so a
//! range boundary can be used as a claim boundary without any synchronisation.

use std::num::NonZeroUsize;
use std::ops::Range;

/// A half-open slice `[start, start + len)` of a linear index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkRange {
    pub start: usize,
    pub len: usize,
}

impl WorkRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// The range owned by worker `index` when `total_units` are split across `workers`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= workers`.
    pub fn for_worker(index: usize, total_units: usize, workers: NonZeroUsize) -> Self {
        let workers = workers.get();
        assert!(
            index < workers,
            "worker index {index} out of bounds for {workers} workers"
        );

        let base = total_units / workers;
        let remainder = total_units % workers;

        let start = index * base + index.min(remainder);
        let len = base + usize::from(index < remainder);

        Self { start, len }
    }

    #[inline(always)]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Iterator over the ranges of one partition, in worker order.
#[derive(Debug, Clone)]
pub struct Partition {
    total_units: usize,
    workers: NonZeroUsize,
    next: usize,
}

impl Iterator for Partition {
    type Item = WorkRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.workers.get() {
            return None;
        }
        let range = WorkRange::for_worker(self.next, self.total_units, self.workers);
        self.next += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.workers.get() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Partition {}

/// Splits `total_units` across `workers` near-equal contiguous ranges.
///
/// Always yields exactly `workers` ranges; when `total_units < workers` the trailing
/// ranges are empty.
pub fn partition(total_units: usize, workers: NonZeroUsize) -> Partition {
    Partition {
        total_units,
        workers,
        next: 0,
    }
}
