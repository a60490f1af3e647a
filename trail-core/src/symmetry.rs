//! Board automorphisms as precomputed cell permutations.
//!
//! Every rectangular board has the 4 symmetries of the Klein group
//! (identity, two mirrors, half turn). Square boards add the diagonal mirrors
//! and quarter turns for the full 8-element D4 group.

use crate::{Cell, Geometry, State, MAX_CELLS};

/// A single board symmetry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Transform {
    Identity,
    /// Flip left-right: `(r, c) -> (r, cols-1-c)`.
    MirrorHorizontal,
    /// Flip top-bottom: `(r, c) -> (rows-1-r, c)`.
    MirrorVertical,
    /// `(r, c) -> (rows-1-r, cols-1-c)`.
    Rotate180,
    /// Reflect over the main diagonal: `(r, c) -> (c, r)`.
    Transpose,
    /// Reflect over the anti-diagonal: `(r, c) -> (cols-1-c, rows-1-r)`.
    AntiTranspose,
    /// Quarter turn clockwise: `(r, c) -> (c, rows-1-r)`.
    Rotate90,
    /// Quarter turn counter-clockwise: `(r, c) -> (cols-1-c, r)`.
    Rotate270,
}

impl Transform {
    const RECTANGULAR: [Transform; 4] = [
        Transform::Identity,
        Transform::MirrorHorizontal,
        Transform::MirrorVertical,
        Transform::Rotate180,
    ];

    const SQUARE_EXTRA: [Transform; 4] = [
        Transform::Transpose,
        Transform::AntiTranspose,
        Transform::Rotate90,
        Transform::Rotate270,
    ];

    /// Image of `(row, col)`. The diagonal variants assume `rows == cols`.
    fn map(self, row: u8, col: u8, rows: u8, cols: u8) -> (u8, u8) {
        match self {
            Transform::Identity => (row, col),
            Transform::MirrorHorizontal => (row, cols - 1 - col),
            Transform::MirrorVertical => (rows - 1 - row, col),
            Transform::Rotate180 => (rows - 1 - row, cols - 1 - col),
            Transform::Transpose => (col, row),
            Transform::AntiTranspose => (cols - 1 - col, rows - 1 - row),
            Transform::Rotate90 => (col, rows - 1 - row),
            Transform::Rotate270 => (cols - 1 - col, row),
        }
    }
}

/// The symmetry group of one board geometry.
///
/// Each element is stored as a forward permutation `old cell -> new cell`.
/// Element 0 is always the identity.
#[derive(Clone, Debug)]
pub struct SymmetryGroup {
    transforms: Vec<Transform>,
    permutations: Vec<[u8; MAX_CELLS]>,
    /// Elements that move no cell (mirrors of a single row or column).
    trivial: Vec<bool>,
}

impl SymmetryGroup {
    pub fn new(geometry: &Geometry) -> SymmetryGroup {
        let mut transforms = Transform::RECTANGULAR.to_vec();
        if geometry.is_square() {
            transforms.extend_from_slice(&Transform::SQUARE_EXTRA);
        }

        let (rows, cols) = (geometry.rows(), geometry.cols());
        let permutations = transforms
            .iter()
            .map(|&transform| {
                let mut permutation = [0u8; MAX_CELLS];
                for cell in geometry.cells() {
                    let (row, col) = geometry.row_col(cell);
                    let (new_row, new_col) = transform.map(row, col, rows, cols);
                    permutation[cell.index()] = geometry.cell(new_row, new_col).0;
                }
                permutation
            })
            .collect::<Vec<_>>();
        let trivial = permutations
            .iter()
            .map(|permutation| geometry.cells().all(|cell| permutation[cell.index()] == cell.0))
            .collect();

        SymmetryGroup {
            transforms,
            permutations,
            trivial,
        }
    }

    /// Number of elements (4 or 8).
    #[inline]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Never true; the identity is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Index of `transform` in this group, if the board admits it.
    pub fn position(&self, transform: Transform) -> Option<usize> {
        self.transforms.iter().position(|&t| t == transform)
    }

    /// Whether element `t` acts as the identity on this geometry.
    #[inline]
    pub fn is_trivial(&self, t: usize) -> bool {
        self.trivial[t]
    }

    /// Image of a cell under element `t`.
    #[inline]
    pub fn map_cell(&self, t: usize, cell: Cell) -> Cell {
        Cell(self.permutations[t][cell.index()])
    }

    /// Image of a cell mask under element `t`. Cost is one step per set bit.
    #[inline]
    pub fn map_mask(&self, t: usize, mask: u64) -> u64 {
        let permutation = &self.permutations[t];
        let mut remaining = mask;
        let mut result = 0u64;
        while remaining != 0 {
            let index = remaining.trailing_zeros() as usize;
            remaining &= remaining - 1;
            result |= 1u64 << permutation[index];
        }
        result
    }

    /// Apply element `t` to a whole state.
    #[inline]
    pub fn apply(&self, t: usize, state: State) -> State {
        State {
            piece: self.map_cell(t, state.piece),
            visited: self.map_mask(t, state.visited),
        }
    }

    /// The lexicographically smallest image of `state` over the group.
    pub fn canonical(&self, state: State) -> State {
        let mut min = state;
        for t in 1..self.len() {
            let transformed = self.apply(t, state);
            if transformed < min {
                min = transformed;
            }
        }
        min
    }

    /// Whether element `t` maps `state` onto itself.
    #[inline]
    pub fn fixes(&self, t: usize, state: State) -> bool {
        self.map_cell(t, state.piece) == state.piece && self.fixes_mask(t, state.visited)
    }

    /// Whether element `t` maps the cell set `mask` onto itself.
    #[inline]
    pub fn fixes_mask(&self, t: usize, mask: u64) -> bool {
        self.map_mask(t, mask) == mask
    }
}
