//! Transposition table keyed by canonical state.
//!
//! Values are the first player's win probability. Every entry records how it
//! was obtained so that a Monte Carlo estimate is never mistaken for a proven
//! result, and a cutoff bound is never mistaken for an exact value.

use std::collections::HashMap;

use trail_core::{Player, State};

/// What a stored value proves about the true value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail-high: the true value is at least `value`.
    Lower,
    /// Fail-low: the true value is at most `value`.
    Upper,
}

/// Whether playouts contributed to a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Derived from terminal positions only.
    Solved,
    /// Some leaf below was a playout estimate.
    Estimated,
}

/// Canonical position plus the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    pub state: State,
    pub to_move: Player,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    pub value: f64,
    pub bound: Bound,
    pub provenance: Provenance,
    /// Plies left before the playout horizon when this entry was computed.
    pub budget: u32,
}

impl Entry {
    /// The stored value, if it settles a node searched with `(alpha, beta)`
    /// and `budget` plies to spare.
    pub fn usable(&self, alpha: f64, beta: f64, budget: u32) -> Option<f64> {
        // An estimate only stands in for searches that would hit the horizon no later.
        if self.provenance == Provenance::Estimated && budget > self.budget {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.value),
            Bound::Lower if self.value >= beta => Some(self.value),
            Bound::Upper if self.value <= alpha => Some(self.value),
            _ => None,
        }
    }

    fn is_final(&self) -> bool {
        self.bound == Bound::Exact && self.provenance == Provenance::Solved
    }
}

/// In-memory table owned by one solver; lives until [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<Key, Entry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &Key) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Look up a value usable for the given window and budget.
    #[inline]
    pub fn probe(&self, key: &Key, alpha: f64, beta: f64, budget: u32) -> Option<Entry> {
        let entry = self.entries.get(key)?;
        entry.usable(alpha, beta, budget).map(|_| *entry)
    }

    /// Record a result. A solved exact entry is final and never replaced.
    pub fn store(&mut self, key: Key, entry: Entry) {
        match self.entries.get(&key) {
            Some(existing) if existing.is_final() => {}
            _ => {
                self.entries.insert(key, entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trail_core::Cell;

    fn key(piece: u8) -> Key {
        Key {
            state: State {
                piece: Cell(piece),
                visited: Cell(piece).bit(),
            },
            to_move: Player::One,
        }
    }

    fn entry(value: f64, bound: Bound, provenance: Provenance, budget: u32) -> Entry {
        Entry {
            value,
            bound,
            provenance,
            budget,
        }
    }

    #[test]
    fn test_exact_solved_always_usable() {
        let e = entry(1.0, Bound::Exact, Provenance::Solved, 0);
        assert_eq!(e.usable(0.0, 1.0, 100), Some(1.0));
        assert_eq!(e.usable(0.3, 0.4, 0), Some(1.0));
    }

    #[test]
    fn test_bounds() {
        let lower = entry(0.7, Bound::Lower, Provenance::Solved, 5);
        assert_eq!(lower.usable(0.0, 0.6, 5), Some(0.7));
        assert_eq!(lower.usable(0.0, 0.8, 5), None);

        let upper = entry(0.2, Bound::Upper, Provenance::Solved, 5);
        assert_eq!(upper.usable(0.3, 1.0, 5), Some(0.2));
        assert_eq!(upper.usable(0.1, 1.0, 5), None);
    }

    #[test]
    fn test_estimate_needs_no_larger_budget() {
        let e = entry(0.5, Bound::Exact, Provenance::Estimated, 10);
        assert_eq!(e.usable(0.0, 1.0, 10), Some(0.5));
        assert_eq!(e.usable(0.0, 1.0, 3), Some(0.5));
        assert_eq!(e.usable(0.0, 1.0, 11), None);
    }

    #[test]
    fn test_store_and_probe() {
        let mut table = TranspositionTable::new();
        assert!(table.is_empty());

        table.store(key(0), entry(0.4, Bound::Exact, Provenance::Estimated, 2));
        assert_eq!(table.probe(&key(0), 0.0, 1.0, 2).map(|e| e.value), Some(0.4));
        assert!(table.probe(&key(0), 0.0, 1.0, 3).is_none());
        assert!(table.probe(&key(1), 0.0, 1.0, 0).is_none());

        // A solved value replaces the estimate and then stays
        table.store(key(0), entry(1.0, Bound::Exact, Provenance::Solved, 9));
        table.store(key(0), entry(0.2, Bound::Upper, Provenance::Solved, 9));
        assert_eq!(table.get(&key(0)).map(|e| e.value), Some(1.0));
        assert_eq!(table.len(), 1);

        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_side_to_move_is_part_of_key() {
        let mut table = TranspositionTable::new();
        let first = key(3);
        let second = Key {
            to_move: Player::Two,
            ..first
        };
        table.store(first, entry(0.0, Bound::Exact, Provenance::Solved, 0));
        assert!(table.get(&second).is_none());
    }
}
