use core::fmt;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::*;

pub const INITIAL_CASH: Money = 10;
pub const INITIAL_SCORE: Money = 10;
pub const START_COORDS: Coord2 = (2, 2);

/// Immutable snapshot of a game: the 5x5 grid plus cash, score and move counter.
///
/// Every transition yields a fresh copy, a board is never changed behind
/// the back of whoever holds it. Cash is never negative, a transition that
/// would make it so fails with [`GameError::Bankrupt`] instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardParts")]
pub struct Board {
    pub(crate) cells: [Cell; CELL_COUNT],
    pub(crate) cash: Money,
    pub(crate) score: Money,
    pub(crate) moves: u32,
}

#[derive(Deserialize)]
struct BoardParts {
    cells: [Cell; CELL_COUNT],
    cash: Money,
    score: Money,
    moves: u32,
}

impl TryFrom<BoardParts> for Board {
    type Error = GameError;

    fn try_from(parts: BoardParts) -> Result<Self> {
        Self::from_parts(parts.cells, parts.cash, parts.score, parts.moves)
    }
}

impl Board {
    /// Starting position: a single `1` tile in the center.
    pub fn new() -> Self {
        let mut cells = [None; CELL_COUNT];
        cells[START_COORDS.to_cell_index()] = Some(1);
        Self {
            cells,
            cash: INITIAL_CASH,
            score: INITIAL_SCORE,
            moves: 0,
        }
    }

    pub fn from_parts(cells: [Cell; CELL_COUNT], cash: Money, score: Money, moves: u32) -> Result<Self> {
        if cash < 0 {
            return Err(GameError::Bankrupt { cash });
        }
        Ok(Self {
            cells,
            cash,
            score,
            moves,
        })
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn cash(&self) -> Money {
        self.cash
    }

    pub fn score(&self) -> Money {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn get(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn set(&mut self, coords: Coord2, cell: Cell) {
        self[coords] = cell;
    }

    /// Copy of this board with one cell replaced.
    pub fn with_tile(mut self, coords: Coord2, cell: Cell) -> Self {
        self.set(coords, cell);
        self
    }

    /// Coordinates of every player tile, in cell-index order.
    pub fn player_tiles(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_player())
            .map(|(index, _)| coords_of(index))
    }

    /// Coordinates and values of every competitor tile, in cell-index order.
    pub fn competitors(&self) -> impl Iterator<Item = (Coord2, TileValue)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.competitor().map(|value| (coords_of(index), value)))
    }

    /// Cash charged each move for the competitors on the board, never positive.
    pub fn competitor_upkeep(&self) -> Money {
        self.competitors().map(|(_, value)| Money::from(value)).sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_cell_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_cell_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.cells.chunks(usize::from(SIDE)).enumerate() {
            if row_index > 0 {
                writeln!(f)?;
            }
            for (col_index, cell) in row.iter().enumerate() {
                if col_index > 0 {
                    write!(f, ", ")?;
                }
                match cell {
                    Some(value) => write!(f, "{value}")?,
                    None => write!(f, "None")?,
                }
            }
        }
        Ok(())
    }
}
