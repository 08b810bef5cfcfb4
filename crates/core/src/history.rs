//! Fixed-capacity chronological history.

use std::collections::VecDeque;

/// Number of snapshots kept for trend charts.
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// Bounded history that evicts the oldest entry once full.
///
/// Iteration is always oldest-first, whether or not the ring has wrapped
/// and whether or not it has filled up yet.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryRing<T> {
    /// Create an empty ring. A capacity of 0 is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `item`, evicting the oldest entry if the ring is full.
    pub fn push(&mut self, item: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(item);
    }

    /// Oldest-first iterator.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> HistoryRing<T> {
    /// Oldest-first copy of the retained entries.
    pub fn ordered(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> Default for HistoryRing<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
