//! Piece movement rules and the per-cell reachability table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Cell, Geometry, SetupError, MAX_CELLS};

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Movement rule set of the piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Any distance orthogonally.
    Rook,
    /// One step in any of the 8 directions.
    King,
    /// Any distance orthogonally or diagonally.
    Queen,
    /// One of the 8 L-shaped jumps.
    Knight,
}

impl Archetype {
    /// Direction vectors as `(d_row, d_col)`.
    pub fn directions(self) -> &'static [(i8, i8)] {
        match self {
            Archetype::Rook => &ORTHOGONAL,
            Archetype::King | Archetype::Queen => &ALL_DIRECTIONS,
            Archetype::Knight => &KNIGHT_JUMPS,
        }
    }

    /// Whether the piece slides along a direction until it leaves the board.
    pub fn is_unlimited(self) -> bool {
        matches!(self, Archetype::Rook | Archetype::Queen)
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Rook => "rook",
            Archetype::King => "king",
            Archetype::Queen => "queen",
            Archetype::Knight => "knight",
        }
    }

    /// All archetypes.
    pub fn all() -> impl Iterator<Item = Archetype> {
        [
            Archetype::Rook,
            Archetype::King,
            Archetype::Queen,
            Archetype::Knight,
        ]
        .into_iter()
    }
}

impl FromStr for Archetype {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rook" => Ok(Archetype::Rook),
            "king" => Ok(Archetype::King),
            "queen" => Ok(Archetype::Queen),
            "knight" => Ok(Archetype::Knight),
            other => Err(SetupError::UnknownArchetype(other.to_string())),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// For every cell, the mask of cells the piece reaches in one move on an
/// empty board. Occupancy is applied later by [`Board`](crate::Board).
#[derive(Clone, Debug)]
pub struct MoveTable {
    archetype: Archetype,
    targets: [u64; MAX_CELLS],
}

impl MoveTable {
    /// Build the table for `archetype` on `geometry`.
    pub fn new(geometry: &Geometry, archetype: Archetype) -> MoveTable {
        let mut targets = [0u64; MAX_CELLS];
        let unlimited = archetype.is_unlimited();

        for from in geometry.cells() {
            let mut mask = 0u64;
            for &(dr, dc) in archetype.directions() {
                let mut cursor = geometry.offset(from, dr, dc);
                while let Some(to) = cursor {
                    mask |= to.bit();
                    if !unlimited {
                        break;
                    }
                    cursor = geometry.offset(to, dr, dc);
                }
            }
            targets[from.index()] = mask;
        }

        MoveTable { archetype, targets }
    }

    /// Parse `name` and build its table.
    pub fn for_name(geometry: &Geometry, name: &str) -> Result<MoveTable, SetupError> {
        Ok(Self::new(geometry, name.parse()?))
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Cells reachable from `cell`, ignoring visited cells.
    #[inline]
    pub fn moves_from(&self, cell: Cell) -> u64 {
        self.targets[cell.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_archetype() {
        for archetype in Archetype::all() {
            assert_eq!(archetype.name().parse::<Archetype>(), Ok(archetype));
        }
        assert_eq!(
            "bishop".parse::<Archetype>(),
            Err(SetupError::UnknownArchetype("bishop".to_string()))
        );
    }

    #[test]
    fn test_for_name_rejects_unknown() {
        let geometry = Geometry::new(3, 3).unwrap();
        assert!(MoveTable::for_name(&geometry, "queen").is_ok());
        assert!(matches!(
            MoveTable::for_name(&geometry, "Queen"),
            Err(SetupError::UnknownArchetype(_))
        ));
    }

    #[test]
    fn test_no_self_moves_and_on_board() {
        for rows in 1..=8 {
            for cols in 1..=8 {
                let geometry = Geometry::new(rows, cols).unwrap();
                for archetype in Archetype::all() {
                    let table = MoveTable::new(&geometry, archetype);
                    for cell in geometry.cells() {
                        let mask = table.moves_from(cell);
                        assert_eq!(mask & cell.bit(), 0, "{archetype} reaches its own cell");
                        assert_eq!(mask & !geometry.full_mask(), 0, "{archetype} leaves the board");
                    }
                }
            }
        }
    }

    #[test]
    fn test_reachability_is_symmetric() {
        let geometry = Geometry::new(5, 7).unwrap();
        for archetype in Archetype::all() {
            let table = MoveTable::new(&geometry, archetype);
            for a in geometry.cells() {
                for b in geometry.cells() {
                    let forward = table.moves_from(a) & b.bit() != 0;
                    let backward = table.moves_from(b) & a.bit() != 0;
                    assert_eq!(forward, backward);
                }
            }
        }
    }

    #[test]
    fn test_move_counts() {
        let geometry = Geometry::new(8, 8).unwrap();
        let corner = geometry.cell(0, 0);
        let inner = geometry.cell(3, 3);

        let rook = MoveTable::new(&geometry, Archetype::Rook);
        assert_eq!(rook.moves_from(corner).count_ones(), 14);
        assert_eq!(rook.moves_from(inner).count_ones(), 14);

        let king = MoveTable::new(&geometry, Archetype::King);
        assert_eq!(king.moves_from(corner).count_ones(), 3);
        assert_eq!(king.moves_from(inner).count_ones(), 8);

        let queen = MoveTable::new(&geometry, Archetype::Queen);
        assert_eq!(queen.moves_from(corner).count_ones(), 21);
        assert_eq!(queen.moves_from(inner).count_ones(), 27);

        let knight = MoveTable::new(&geometry, Archetype::Knight);
        assert_eq!(knight.moves_from(corner).count_ones(), 2);
        assert_eq!(knight.moves_from(inner).count_ones(), 8);
    }

    #[test]
    fn test_knight_stuck_on_small_boards() {
        for (rows, cols) in [(1, 1), (2, 2), (1, 8)] {
            let geometry = Geometry::new(rows, cols).unwrap();
            let table = MoveTable::new(&geometry, Archetype::Knight);
            for cell in geometry.cells() {
                assert_eq!(table.moves_from(cell), 0);
            }
        }
    }

    #[test]
    fn test_king_steps() {
        let geometry = Geometry::new(3, 3).unwrap();
        let table = MoveTable::new(&geometry, Archetype::King);
        // From (0,0): (0,1), (1,0), (1,1)
        assert_eq!(table.moves_from(Cell(0)), 0b000_011_010);
        // From the center: every other cell
        assert_eq!(table.moves_from(Cell(4)), 0b111_101_111);
    }
}
