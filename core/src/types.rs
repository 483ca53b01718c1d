use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for positions on the board.
pub type Coord = u8;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Value carried by a tile. Player tiles are `>= 1`, competitors are `<= 0`.
pub type TileValue = i32;

/// Content of one cell, `None` when empty.
pub type Cell = Option<TileValue>;

/// Cash and score amounts.
pub type Money = i64;

/// Heuristic and expected values produced by evaluation and search.
pub type Value = i64;

/// Width and height of the board.
pub const SIDE: Coord = 5;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = (SIDE as usize) * (SIDE as usize);

pub trait ToCellIndex {
    fn to_cell_index(self) -> usize;
}

impl ToCellIndex for Coord2 {
    fn to_cell_index(self) -> usize {
        usize::from(self.0) + usize::from(SIDE) * usize::from(self.1)
    }
}

/// Inverse of [`ToCellIndex`], `index` must be below [`CELL_COUNT`].
pub const fn coords_of(index: usize) -> Coord2 {
    let side = SIDE as usize;
    ((index % side) as Coord, (index / side) as Coord)
}

pub const fn in_bounds(coords: Coord2) -> bool {
    coords.0 < SIDE && coords.1 < SIDE
}

/// Line of travel of an orthogonal move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A candidate move of the tile at `source` onto `dest`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub source: Coord2,
    pub dest: Coord2,
}

impl Move {
    pub const fn new(source: Coord2, dest: Coord2) -> Self {
        Self { source, dest }
    }

    /// Axis and distance of travel, `None` unless source and dest share a row or column.
    pub fn line(&self) -> Option<(Axis, Coord)> {
        let ((x1, y1), (x2, y2)) = (self.source, self.dest);
        if y1 == y2 {
            Some((Axis::Horizontal, x1.abs_diff(x2)))
        } else if x1 == x2 {
            Some((Axis::Vertical, y1.abs_diff(y2)))
        } else {
            None
        }
    }

    /// Cells strictly between source and dest along the line of travel.
    ///
    /// Empty for moves that are not orthogonal.
    pub fn path(&self) -> impl Iterator<Item = Coord2> + use<> {
        let ((x1, y1), (x2, y2)) = (self.source, self.dest);
        let (axis, start, end) = match self.line() {
            Some((Axis::Horizontal, _)) => (Axis::Horizontal, x1.min(x2), x1.max(x2)),
            Some((Axis::Vertical, _)) => (Axis::Vertical, y1.min(y2), y1.max(y2)),
            None => (Axis::Horizontal, 0, 0),
        };

        (start.saturating_add(1)..end).map(move |i| match axis {
            Axis::Horizontal => (i, y1),
            Axis::Vertical => (x1, i),
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ((x1, y1), (x2, y2)) = (self.source, self.dest);
        write!(f, "({x1}, {y1}) -> ({x2}, {y2})")
    }
}

/// Placement class of a cell, used to weigh competitor tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Corner,
    Edge,
    Center,
}

impl Region {
    pub const fn of((x, y): Coord2) -> Self {
        let last = SIDE - 1;
        let border_x = x == 0 || x == last;
        let border_y = y == 0 || y == last;

        match (border_x, border_y) {
            (true, true) => Self::Corner,
            (true, false) | (false, true) => Self::Edge,
            (false, false) => Self::Center,
        }
    }
}
