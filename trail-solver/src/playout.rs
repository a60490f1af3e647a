//! Monte Carlo playouts used past the search horizon.

use rand::Rng;
use trail_core::{Board, Player};

/// Play uniformly random legal moves until the side to move is stuck.
/// Returns the winner. The board is left at the terminal position.
pub fn random_game<R: Rng + ?Sized>(board: &mut Board, to_move: Player, rng: &mut R) -> Player {
    let mut mover = to_move;
    loop {
        let mut moves = board.available_moves();
        if moves.is_empty() {
            return mover.opponent();
        }
        let pick = rng.random_range(0..moves.len());
        if let Some(dest) = moves.nth(pick) {
            board.make_move(dest);
        }
        mover = mover.opponent();
    }
}

/// Fraction of `trials` random games from the current position won by the
/// first player. The board is restored after every game.
pub fn estimate<R: Rng + ?Sized>(
    board: &mut Board,
    to_move: Player,
    trials: u32,
    rng: &mut R,
) -> f64 {
    debug_assert!(trials > 0);
    let saved = board.state();
    let mut first_player_wins = 0u32;

    for _ in 0..trials {
        if random_game(board, to_move, rng) == Player::One {
            first_player_wins += 1;
        }
        board.restore(saved);
    }

    first_player_wins as f64 / trials as f64
}
