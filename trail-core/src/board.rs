//! Mutable game state: visited mask, piece cell, make/undo and canonicalization.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Archetype, Cell, Geometry, MoveTable, SetupError, SymmetryGroup, Transform, MAX_CELLS};

/// Piece cell plus visited mask.
///
/// Ordering is lexicographic on `(piece, visited)`, which is what
/// canonicalization minimizes over.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct State {
    pub piece: Cell,
    pub visited: u64,
}

/// Immutable per-game data shared between copies of a board.
#[derive(Debug)]
struct Rules {
    geometry: Geometry,
    moves: MoveTable,
    symmetries: SymmetryGroup,
}

/// Game state for one piece on one board.
///
/// Cloning is cheap: the move table and symmetry group are shared.
#[derive(Clone, Debug)]
pub struct Board {
    rules: Arc<Rules>,
    visited: u64,
    piece: Cell,
}

impl Board {
    /// Create a board with the piece on `start`, which is marked visited.
    pub fn new(geometry: Geometry, start: Cell, archetype: Archetype) -> Board {
        debug_assert!(start.index() < geometry.cell_count());
        let rules = Rules {
            geometry,
            moves: MoveTable::new(&geometry, archetype),
            symmetries: SymmetryGroup::new(&geometry),
        };
        Board {
            rules: Arc::new(rules),
            visited: start.bit(),
            piece: start,
        }
    }

    /// Validate dimensions and start position, then create the board.
    pub fn with_size(
        rows: u8,
        cols: u8,
        row: u8,
        col: u8,
        archetype: Archetype,
    ) -> Result<Board, SetupError> {
        let geometry = Geometry::new(rows, cols)?;
        let start = geometry.checked_cell(row, col)?;
        Ok(Board::new(geometry, start, archetype))
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.rules.geometry
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.rules.moves.archetype()
    }

    #[inline]
    pub fn symmetries(&self) -> &SymmetryGroup {
        &self.rules.symmetries
    }

    #[inline]
    pub fn piece(&self) -> Cell {
        self.piece
    }

    #[inline]
    pub fn visited(&self) -> u64 {
        self.visited
    }

    #[inline]
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visited & cell.bit() != 0
    }

    #[inline]
    pub fn state(&self) -> State {
        State {
            piece: self.piece,
            visited: self.visited,
        }
    }

    /// Reset to a previously saved state of this same board.
    #[inline]
    pub fn restore(&mut self, state: State) {
        debug_assert!(state.visited & state.piece.bit() != 0);
        self.visited = state.visited;
        self.piece = state.piece;
    }

    /// Number of moves played since the start position.
    #[inline]
    pub fn moves_played(&self) -> u32 {
        self.visited.count_ones() - 1
    }

    /// Legal destinations: reachable and never visited.
    #[inline]
    pub fn available_moves(&self) -> Moves {
        Moves(!self.visited & self.rules.moves.moves_from(self.piece))
    }

    /// Legal destinations as `(row, col)` pairs.
    pub fn available_cells(&self) -> Vec<(u8, u8)> {
        self.available_moves()
            .map(|cell| self.geometry().row_col(cell))
            .collect()
    }

    /// Move the piece to `dest` and mark it visited. Returns the previous cell.
    ///
    /// `dest` must come from [`available_moves`](Self::available_moves).
    #[inline]
    pub fn make_move(&mut self, dest: Cell) -> Cell {
        debug_assert!(!self.is_visited(dest), "destination already visited");
        let prev = self.piece;
        self.visited |= dest.bit();
        self.piece = dest;
        prev
    }

    /// Undo the last [`make_move`](Self::make_move): unmark `unmark`, put the piece on `restore`.
    #[inline]
    pub fn undo_move(&mut self, unmark: Cell, restore: Cell) {
        debug_assert_eq!(self.piece, unmark, "undo does not match the last move");
        debug_assert!(self.is_visited(restore));
        self.visited &= !unmark.bit();
        self.piece = restore;
    }

    /// Play `dest` for the lifetime of the returned guard; dropping it undoes the move.
    #[inline]
    pub fn play(&mut self, dest: Cell) -> MoveGuard<'_> {
        let prev = self.make_move(dest);
        MoveGuard {
            board: self,
            dest,
            prev,
        }
    }

    /// Canonical form: the minimum of all symmetric images of this state.
    #[inline]
    pub fn canonical(&self) -> State {
        self.rules.symmetries.canonical(self.state())
    }

    /// This state under every element of the symmetry group, identity first.
    pub fn all_symmetries(&self) -> Vec<State> {
        let state = self.state();
        (0..self.symmetries().len())
            .map(|t| self.symmetries().apply(t, state))
            .collect()
    }

    /// Whether `transform` exists on this board and maps the state onto itself.
    pub fn symmetric_under(&self, transform: Transform) -> bool {
        self.symmetries()
            .position(transform)
            .is_some_and(|t| self.symmetries().fixes(t, self.state()))
    }

    /// Piece on the vertical center line and visited cells mirrored left-right.
    ///
    /// Diagnostic helper for inspecting positions; move pruning gates on
    /// [`has_visited_symmetry`](Self::has_visited_symmetry), which also covers
    /// rotations and diagonals.
    pub fn is_horizontally_symmetric(&self) -> bool {
        let (_, col) = self.geometry().row_col(self.piece);
        col as usize * 2 + 1 == self.geometry().cols() as usize
            && self.symmetric_under(Transform::MirrorHorizontal)
    }

    /// Piece on the horizontal center line and visited cells mirrored top-bottom.
    ///
    /// Diagnostic helper, see [`is_horizontally_symmetric`](Self::is_horizontally_symmetric).
    pub fn is_vertically_symmetric(&self) -> bool {
        let (row, _) = self.geometry().row_col(self.piece);
        row as usize * 2 + 1 == self.geometry().rows() as usize
            && self.symmetric_under(Transform::MirrorVertical)
    }

    /// Whether some non-identity symmetry maps the visited set onto itself.
    ///
    /// Two different moves can only lead to equivalent positions when this
    /// holds, so it gates the more expensive per-move canonicalization.
    pub fn has_visited_symmetry(&self) -> bool {
        let group = self.symmetries();
        (1..group.len()).any(|t| !group.is_trivial(t) && group.fixes_mask(t, self.visited))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geometry = self.geometry();
        write!(f, " ")?;
        for col in 0..geometry.cols() {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for row in 0..geometry.rows() {
            write!(f, "{row}")?;
            for col in 0..geometry.cols() {
                let cell = geometry.cell(row, col);
                let symbol = if cell == self.piece {
                    'P'
                } else if self.is_visited(cell) {
                    'x'
                } else {
                    '-'
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A move held for the lifetime of the guard.
///
/// Derefs to the board so the search can recurse through it; the move is
/// undone on drop, including early returns and `?` propagation.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    dest: Cell,
    prev: Cell,
}

impl MoveGuard<'_> {
    /// Cell the piece came from.
    pub fn prev(&self) -> Cell {
        self.prev
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.undo_move(self.dest, self.prev);
    }
}

/// Set of destination cells, iterated lowest index first.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Moves(pub u64);

impl Moves {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Iterator for Moves {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Cell> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(Cell(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Moves {}

/// A fixed-size move list that avoids heap allocation.
#[derive(Clone, Copy)]
pub struct MoveList {
    cells: [Cell; MAX_CELLS],
    len: usize,
}

impl MoveList {
    #[inline]
    pub const fn new() -> MoveList {
        MoveList {
            cells: [Cell(0); MAX_CELLS],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, cell: Cell) {
        debug_assert!(self.len < MAX_CELLS, "MoveList overflow");
        self.cells[self.len] = cell;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Cell] {
        &mut self.cells[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Cell> for MoveList {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut list = MoveList::new();
        for cell in iter {
            list.push(cell);
        }
        list
    }
}

/// Game setup as supplied by a caller: board size, start square, piece name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub rows: u8,
    pub cols: u8,
    pub row: u8,
    pub col: u8,
    pub piece: String,
}

impl Setup {
    /// Validate every field and build the starting board.
    pub fn board(&self) -> Result<Board, SetupError> {
        let geometry = Geometry::new(self.rows, self.cols)?;
        let start = geometry.checked_cell(self.row, self.col)?;
        let archetype: Archetype = self.piece.parse()?;
        Ok(Board::new(geometry, start, archetype))
    }
}
