use crate::*;

/// Classification of cell contents by the sign of the tile value.
pub trait CellExt: Copy {
    fn is_player(self) -> bool;
    fn is_competitor(self) -> bool;

    /// Value of the competitor tile in this cell, if any.
    fn competitor(self) -> Option<TileValue>;
}

impl CellExt for Cell {
    fn is_player(self) -> bool {
        matches!(self, Some(value) if value >= 1)
    }

    fn is_competitor(self) -> bool {
        matches!(self, Some(value) if value <= 0)
    }

    fn competitor(self) -> Option<TileValue> {
        self.filter(|&value| value <= 0)
    }
}
