//! Priority frontier for Dijkstra and A*.
//!
//! Entries are kept in a deque that is stable-sorted by the caller's current
//! key before every removal, and the first entry is taken. Keys are looked up
//! at removal time, so an entry whose node was relaxed after insertion sorts by
//! its new key. Among equal keys the entry that already sat earlier in the
//! deque wins. The visual trace depends on this order, so it is kept exactly
//! rather than approximated with a binary heap.
//!
//! Duplicate entries for the same node are allowed; callers skip the stale
//! ones on removal.

use std::cmp::Ordering;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub(crate) struct Frontier<'g> {
    entries: VecDeque<&'g str>,
}

impl<'g> Frontier<'g> {
    pub(crate) fn seeded(start: &'g str) -> Self {
        Self {
            entries: VecDeque::from([start]),
        }
    }

    pub(crate) fn push(&mut self, id: &'g str) {
        self.entries.push_back(id);
    }

    /// Remove the entry that sorts first under `compare`.
    pub(crate) fn pop_min_by<F>(&mut self, mut compare: F) -> Option<&'g str>
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.entries
            .make_contiguous()
            .sort_by(|a, b| compare(a, b));
        self.entries.pop_front()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
