//! Errors raised while setting up a game.

/// A game setup violated one of the board invariants.
///
/// These are reported before any search begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// Board dimensions outside `1..=8`.
    #[error("board size {rows}x{cols} is out of range (each side must be 1 to 8)")]
    BoardSize { rows: u8, cols: u8 },

    /// Initial piece position not on the board.
    #[error("initial position ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds { row: u8, col: u8, rows: u8, cols: u8 },

    /// Piece name not one of rook, king, queen, knight.
    #[error("unknown piece type '{0}' (expected rook, king, queen or knight)")]
    UnknownArchetype(String),
}
