//! Move ordering and symmetry pruning for the search.
//!
//! Moves are produced in cell-index order, then optionally:
//! 1. Symmetric duplicates dropped (shallow depths only)
//! 2. Sorted far-from-center first, to raise the alpha-beta cutoff rate

use std::cmp::Reverse;

use trail_core::{Board, MoveList, State};

use crate::SearchConfig;

/// Moves to search from `board` at `depth`, after pruning and ordering.
///
/// Also returns how many moves symmetry pruning removed.
pub fn ordered_moves(board: &mut Board, depth: u32, config: &SearchConfig) -> (MoveList, usize) {
    let mut moves: MoveList = board.available_moves().collect();
    let mut skipped = 0;

    if config.symmetry && depth <= config.symmetry_depth && board.has_visited_symmetry() {
        let before = moves.len();
        moves = distinct_successors(board, &moves);
        skipped = before - moves.len();
    }

    if config.heuristic {
        let geometry = *board.geometry();
        moves
            .as_mut_slice()
            .sort_by_key(|&cell| Reverse(geometry.doubled_center_distance(cell)));
    }

    (moves, skipped)
}

/// Keep the first move leading to each canonical successor.
fn distinct_successors(board: &mut Board, moves: &MoveList) -> MoveList {
    let mut seen: Vec<State> = Vec::with_capacity(moves.len());
    let mut kept = MoveList::new();

    for mov in moves.iter() {
        let canonical = board.play(mov).canonical();
        if !seen.contains(&canonical) {
            seen.push(canonical);
            kept.push(mov);
        }
    }
    kept
}
