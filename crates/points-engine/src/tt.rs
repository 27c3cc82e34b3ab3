//! Transposition table keyed by full game signature.

use crate::eval::Score;
use std::collections::HashMap;

/// How a stored score relates to the true value of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact.
    Exact,
    /// A beta cutoff: the true value is at least the score.
    Lower,
    /// Every move failed low: the true value is at most the score.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub score: Score,
    pub depth: u32,
    pub bound: Bound,
}

/// Search cache. Stores overwrite unconditionally; when the table reaches its
/// capacity it is flushed.
#[derive(Debug)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Returns a usable score for a node searched to `depth` with the window
    /// `(alpha, beta)`, if a deep enough entry allows it.
    pub fn probe(&self, key: u64, depth: u32, alpha: Score, beta: Score) -> Option<Score> {
        let entry = self.entries.get(&key)?;
        if entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some(entry.score),
            Bound::Lower if entry.score >= beta => Some(entry.score),
            Bound::Upper if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    pub fn get(&self, key: u64) -> Option<&TtEntry> {
        self.entries.get(&key)
    }

    pub fn store(&mut self, key: u64, depth: u32, score: Score, bound: Bound) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            tracing::trace!(capacity = self.capacity, "transposition table full, flushing");
            self.entries.clear();
        }
        self.entries.insert(key, TtEntry { score, depth, bound });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
