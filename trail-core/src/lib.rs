//! Game logic for the visit-once piece game with a bit-based board representation.
//!
//! A single piece stands on a board of at most 8×8 cells. Players take turns
//! moving that piece according to its [`Archetype`]; a move may only land on a
//! cell that has never been visited. The player left without a legal move loses.
//!
//! # Board Encoding (64-bit)
//!
//! ```text
//! Bit i: cell i has been visited (1) or not (0)
//! Bits >= rows*cols: always zero
//!
//! Cell indices (row-major order), e.g. on a 3×4 board:
//!   (0,0)=0  (0,1)=1  (0,2)=2   (0,3)=3
//!   (1,0)=4  (1,1)=5  (1,2)=6   (1,3)=7
//!   (2,0)=8  (2,1)=9  (2,2)=10  (2,3)=11
//! ```
//!
//! The piece cell is stored next to the mask and is always a visited cell.

mod archetype;
mod board;
mod error;
mod geometry;
mod symmetry;

pub use archetype::{Archetype, MoveTable};
pub use board::{Board, MoveGuard, MoveList, Moves, Setup, State};
pub use error::SetupError;
pub use geometry::Geometry;
pub use symmetry::{SymmetryGroup, Transform};

/// Upper bound on the number of cells, so a visited set fits in a `u64`.
pub const MAX_CELLS: usize = 64;

/// Player identifier. `One` is the player to move in the initial position.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Human-readable name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Player::One => "first",
            Player::Two => "second",
        }
    }
}

/// Linear cell index `row * cols + col`.
///
/// The mapping to `(row, col)` depends on the board width, so conversions live
/// on [`Geometry`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Cell(pub u8);

impl Cell {
    /// Single-bit mask for this cell.
    #[inline]
    pub const fn bit(self) -> u64 {
        1 << self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
