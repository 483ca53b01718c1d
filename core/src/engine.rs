use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Moves available from one board; at most eight per player tile.
pub type MoveList = SmallVec<[Move; 64]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Single step onto an empty cell.
    Slide,
    /// Single step onto an equal tile.
    Merge,
    /// Jump over one or more cells onto an equal tile.
    JumpMerge,
}

impl MoveKind {
    pub const fn is_merge(self) -> bool {
        matches!(self, Self::Merge | Self::JumpMerge)
    }
}

/// Result of validating a move against a board, before any state is produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlan {
    pub axis: Axis,
    pub distance: Coord,
    pub kind: MoveKind,
    pub source_value: TileValue,
}

impl Board {
    /// Check every legality rule for `mv`, reporting the first one violated.
    pub fn validate_move(&self, mv: Move) -> Result<MovePlan> {
        let Move { source, dest } = mv;

        if !in_bounds(source) || !in_bounds(dest) {
            return Err(InvalidMove::OutOfBounds.into());
        }
        if source == dest {
            return Err(InvalidMove::SameCell.into());
        }
        let Some((axis, distance)) = mv.line() else {
            return Err(InvalidMove::NotOrthogonal.into());
        };
        let source_value = match self[source] {
            Some(value) if value >= 1 => value,
            _ => return Err(InvalidMove::NotPlayerTile.into()),
        };

        let kind = match self[dest] {
            None if distance > 1 => return Err(InvalidMove::JumpToEmpty.into()),
            None => MoveKind::Slide,
            Some(value) if value != source_value => return Err(InvalidMove::TileMismatch.into()),
            Some(_) if distance > 1 => MoveKind::JumpMerge,
            Some(_) => MoveKind::Merge,
        };

        Ok(MovePlan {
            axis,
            distance,
            kind,
            source_value,
        })
    }

    /// Play `mv`, refilling a vacated single-step source with `next_tile`.
    ///
    /// Passing `None` as `next_tile` performs a dry run that leaves the source empty.
    pub fn play(&self, mv: Move, next_tile: Cell) -> Result<Board> {
        let plan = self.validate_move(mv)?;

        let (dest_value, cash_delta, score_delta) = if plan.kind.is_merge() {
            let merged = plan.source_value.checked_add(1).ok_or(InvalidMove::Overflow)?;
            (merged, Money::from(merged), Money::from(merged))
        } else {
            (plan.source_value, -1, 0)
        };

        let mut next = *self;
        next.moves = next.moves.checked_add(1).ok_or(InvalidMove::Overflow)?;

        // XXX: vertical travel keeps zero-valued competitors on its path, horizontal travel eats them
        for coords in mv.path() {
            let eaten = match (plan.axis, next[coords]) {
                (Axis::Horizontal, Some(value)) => value <= 0,
                (Axis::Vertical, Some(value)) => value < 0,
                (_, None) => false,
            };
            if eaten {
                next[coords] = None;
            }
        }

        next[mv.source] = if plan.distance == 1 { next_tile } else { None };
        next[mv.dest] = Some(dest_value);

        next.cash = next
            .cash
            .checked_add(next.competitor_upkeep() + cash_delta)
            .ok_or(InvalidMove::Overflow)?;
        next.score = next.score.checked_add(score_delta).ok_or(InvalidMove::Overflow)?;

        if next.cash < 0 {
            return Err(GameError::Bankrupt { cash: next.cash });
        }
        Ok(next)
    }

    /// Play the move from `source` to `dest`, see [`Board::play`].
    pub fn apply_move(&self, source: Coord2, dest: Coord2, next_tile: Cell) -> Result<Board> {
        self.play(Move::new(source, dest), next_tile)
    }

    /// Every orthogonal move of every player tile, legal or not.
    ///
    /// Sources come in cell-index order; for each, horizontal destinations
    /// left to right, then vertical destinations top to bottom.
    pub fn candidate_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for source @ (x, y) in self.player_tiles() {
            moves.extend((0..SIDE).filter(|&i| i != x).map(|i| Move::new(source, (i, y))));
            moves.extend((0..SIDE).filter(|&i| i != y).map(|i| Move::new(source, (x, i))));
        }
        moves
    }

    /// Moves that are legal and keep the player solvent, with the board each produces.
    pub fn legal_moves(&self, next_tile: Cell) -> impl Iterator<Item = (Move, Board)> + '_ {
        self.candidate_moves()
            .into_iter()
            .filter_map(move |mv| match self.play(mv, next_tile) {
                Ok(next) => Some((mv, next)),
                Err(err) => {
                    log::trace!("discarding {mv}: {err}");
                    None
                }
            })
    }

    /// True when no player tile can step onto an empty neighbour or jump onto an equal tile.
    ///
    /// Cash is ignored, and a single step onto an equal tile does not count.
    pub fn is_terminal(&self) -> bool {
        !self.candidate_moves().into_iter().any(|mv| {
            let Some((_, distance)) = mv.line() else {
                return false;
            };
            match self[mv.dest] {
                None => distance == 1,
                Some(value) => distance > 1 && self[mv.source] == Some(value),
            }
        })
    }
}

pub fn initial_state() -> Board {
    Board::new()
}

pub fn apply_move(board: &Board, source: Coord2, dest: Coord2, next_tile: Cell) -> Result<Board> {
    board.apply_move(source, dest, next_tile)
}

pub fn is_terminal(board: &Board) -> bool {
    board.is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn cells(rows: [[Cell; 5]; 5]) -> [Cell; CELL_COUNT] {
        let mut out = [None; CELL_COUNT];
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                out[x + 5 * y] = cell;
            }
        }
        out
    }

    fn invalid(board: &Board, source: Coord2, dest: Coord2) -> InvalidMove {
        match board.apply_move(source, dest, Some(1)) {
            Err(GameError::InvalidMove(reason)) => reason,
            other => panic!("expected invalid move, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_straight_moves() {
        let board = Board::new();

        assert_eq!(invalid(&board, (2, 2), (1, 1)), InvalidMove::NotOrthogonal);
        assert_eq!(invalid(&board, (2, 2), (4, 4)), InvalidMove::NotOrthogonal);
        assert_eq!(invalid(&board, (2, 2), (3, 4)), InvalidMove::NotOrthogonal);
    }

    #[test]
    fn rejects_moving_competitors_and_empty_cells() {
        let board = Board::new().with_tile((2, 2), Some(-1));

        assert_eq!(invalid(&board, (2, 2), (2, 1)), InvalidMove::NotPlayerTile);
        assert_eq!(invalid(&board, (0, 0), (0, 1)), InvalidMove::NotPlayerTile);
        let zero = Board::new().with_tile((2, 2), Some(0));
        assert_eq!(invalid(&zero, (2, 2), (2, 1)), InvalidMove::NotPlayerTile);
    }

    #[test]
    fn rejects_staying_still() {
        assert_eq!(invalid(&Board::new(), (2, 2), (2, 2)), InvalidMove::SameCell);
    }

    #[test]
    fn rejects_jump_to_empty_cell() {
        assert_eq!(invalid(&Board::new(), (2, 2), (2, 0)), InvalidMove::JumpToEmpty);
    }

    #[test]
    fn rejects_mismatched_destination_at_any_distance() {
        let board = Board::new().with_tile((2, 0), Some(2)).with_tile((3, 2), Some(3));

        assert_eq!(invalid(&board, (2, 2), (2, 0)), InvalidMove::TileMismatch);
        assert_eq!(invalid(&board, (2, 2), (3, 2)), InvalidMove::TileMismatch);
        let competitor = Board::new().with_tile((1, 2), Some(0));
        assert_eq!(invalid(&competitor, (2, 2), (1, 2)), InvalidMove::TileMismatch);
    }

    #[test]
    fn rejects_coordinates_off_the_board() {
        assert_eq!(invalid(&Board::new(), (2, 2), (5, 2)), InvalidMove::OutOfBounds);
        assert_eq!(invalid(&Board::new(), (7, 7), (2, 2)), InvalidMove::OutOfBounds);
    }

    #[test]
    fn merge_step_refills_source_and_pays_out() {
        let board = Board::new().with_tile((3, 2), Some(1));

        let next = board.apply_move((2, 2), (3, 2), Some(2)).unwrap();

        let mut expected = [None; CELL_COUNT];
        expected[12] = Some(2);
        expected[13] = Some(2);
        assert_eq!(next.cells(), &expected);
        assert_eq!(next.cash(), 12);
        assert_eq!(next.score(), 12);
        assert_eq!(next.moves(), 1);
    }

    #[test]
    fn slide_costs_one_and_keeps_score() {
        let next = Board::new().apply_move((2, 2), (1, 2), Some(2)).unwrap();

        let mut expected = [None; CELL_COUNT];
        expected[11] = Some(1);
        expected[12] = Some(2);
        assert_eq!(next.cells(), &expected);
        assert_eq!(next.cash(), 9);
        assert_eq!(next.score(), 10);
        assert_eq!(next.moves(), 1);
    }

    #[test]
    fn merging_value_v_yields_v_plus_one() {
        for value in 1..6 {
            let board = Board::new().with_tile((2, 2), Some(value)).with_tile((2, 3), Some(value));

            let next = board.apply_move((2, 2), (2, 3), None).unwrap();

            let gain = Money::from(value + 1);
            assert_eq!(next[(2, 3)], Some(value + 1));
            assert_eq!(next.cash(), board.cash() + gain);
            assert_eq!(next.score(), board.score() + gain);
        }
    }

    #[test]
    fn jump_vacates_source_and_eats_competitors_on_the_path() {
        let board = Board::new().with_tile((4, 2), Some(1)).with_tile((3, 2), Some(5));

        let first = board.apply_move((2, 2), (4, 2), Some(2)).unwrap();

        let mut expected = [None; CELL_COUNT];
        expected[13] = Some(5);
        expected[14] = Some(2);
        assert_eq!(first.cells(), &expected);
        assert_eq!(first.cash(), 12);
        assert_eq!(first.moves(), 1);
        assert_eq!(first.score(), 12);

        let staged = first
            .with_tile((1, 2), Some(2))
            .with_tile((2, 2), Some(-1))
            .with_tile((1, 1), Some(-2));

        let second = staged.apply_move((4, 2), (1, 2), Some(2)).unwrap();

        let expected = cells([
            [None, None, None, None, None],
            [None, Some(-2), None, None, None],
            [None, Some(3), None, Some(5), None],
            [None, None, None, None, None],
            [None, None, None, None, None],
        ]);
        assert_eq!(second.cells(), &expected);
        // +3 from the merge, -2 upkeep for the competitor left at (1, 1)
        assert_eq!(second.cash(), 13);
        assert_eq!(second.moves(), 2);
        assert_eq!(second.score(), 15);
    }

    #[test]
    fn horizontal_path_eats_zero_competitors_but_vertical_does_not() {
        let row = Board::new()
            .with_tile((0, 2), Some(1))
            .with_tile((1, 2), Some(0));
        let after_row = row.apply_move((2, 2), (0, 2), None).unwrap();
        assert_eq!(after_row[(1, 2)], None);

        let column = Board::new()
            .with_tile((2, 0), Some(1))
            .with_tile((2, 1), Some(0));
        let after_column = column.apply_move((2, 2), (2, 0), None).unwrap();
        assert_eq!(after_column[(2, 1)], Some(0));

        let deeper = column.with_tile((2, 1), Some(-1));
        let after_deeper = deeper.apply_move((2, 2), (2, 0), None).unwrap();
        assert_eq!(after_deeper[(2, 1)], None);
    }

    #[test]
    fn drawn_competitor_is_charged_immediately() {
        let next = Board::new().apply_move((2, 2), (1, 2), Some(-2)).unwrap();

        assert_eq!(next[(2, 2)], Some(-2));
        assert_eq!(next.cash(), 10 - 1 - 2);
    }

    #[test]
    fn bankrupting_move_is_rejected() {
        let broke = Board::from_parts(*Board::new().cells(), 0, 10, 0).unwrap();

        let result = broke.apply_move((2, 2), (1, 2), Some(2));

        assert_eq!(result, Err(GameError::Bankrupt { cash: -1 }));
    }

    #[test]
    fn dry_run_leaves_stepped_source_empty() {
        let next = Board::new().apply_move((2, 2), (2, 1), None).unwrap();

        assert_eq!(next[(2, 2)], None);
        assert_eq!(next[(2, 1)], Some(1));
    }

    #[test]
    fn candidate_moves_follow_enumeration_order() {
        let moves: Vec<_> = Board::new().candidate_moves().into_iter().collect();

        assert_eq!(
            moves,
            [
                Move::new((2, 2), (0, 2)),
                Move::new((2, 2), (1, 2)),
                Move::new((2, 2), (3, 2)),
                Move::new((2, 2), (4, 2)),
                Move::new((2, 2), (2, 0)),
                Move::new((2, 2), (2, 1)),
                Move::new((2, 2), (2, 3)),
                Move::new((2, 2), (2, 4)),
            ]
        );

        let two_tiles = Board::new().with_tile((0, 0), Some(1)).candidate_moves();
        assert_eq!(two_tiles.len(), 16);
        assert_eq!(two_tiles[0], Move::new((0, 0), (1, 0)));
        assert_eq!(two_tiles[4], Move::new((0, 0), (0, 1)));
    }

    #[test]
    fn legal_moves_are_steps_and_matching_jumps() {
        let board = Board::new().with_tile((2, 0), Some(1)).with_tile((4, 2), Some(3));

        let legal: Vec<_> = board
            .legal_moves(Some(1))
            .filter(|(mv, _)| mv.source == (2, 2))
            .map(|(mv, _)| mv.dest)
            .collect();

        assert_eq!(legal, [(1, 2), (3, 2), (2, 0), (2, 1), (2, 3)]);
    }

    #[test]
    fn terminal_when_no_tile_can_move() {
        assert!(!Board::new().is_terminal());

        let boxed_in = cells([
            [Some(1), Some(2), None, None, None],
            [Some(3), None, None, None, None],
            [None, None, None, None, None],
            [None, None, None, None, None],
            [None, None, None, None, None],
        ]);
        let board = Board::from_parts(boxed_in, 10, 10, 0).unwrap();
        assert!(!board.is_terminal());

        let mut full = [Some(0); CELL_COUNT];
        full[0] = Some(1);
        let board = Board::from_parts(full, 10, 10, 0).unwrap();
        assert!(board.is_terminal());
        for mv in board.candidate_moves() {
            assert!(board.validate_move(mv).is_err());
        }
    }

    #[test]
    fn adjacent_equal_tiles_alone_are_terminal() {
        let mut full = [Some(-1); CELL_COUNT];
        full[0] = Some(2);
        full[1] = Some(2);
        let board = Board::from_parts(full, 1_000, 10, 0).unwrap();

        assert!(board.is_terminal());
        assert_eq!(
            board.validate_move(Move::new((0, 0), (1, 0))).map(|plan| plan.kind),
            Ok(MoveKind::Merge)
        );
    }

    #[test]
    fn equal_tile_two_cells_away_is_not_terminal() {
        let mut full = [Some(-1); CELL_COUNT];
        full[0] = Some(2);
        full[2] = Some(2);
        let board = Board::from_parts(full, 0, 10, 0).unwrap();

        assert!(!board.is_terminal());
    }

    #[test]
    fn moves_counter_overflow_is_rejected() {
        let board = Board::from_parts(*Board::new().cells(), 10, 10, u32::MAX).unwrap();

        let result = board.apply_move((2, 2), (1, 2), Some(1));

        assert_eq!(result, Err(GameError::InvalidMove(InvalidMove::Overflow)));
    }

    #[test]
    fn merging_largest_tile_is_rejected() {
        let board = Board::new()
            .with_tile((2, 2), Some(TileValue::MAX))
            .with_tile((3, 2), Some(TileValue::MAX));

        let result = board.apply_move((2, 2), (3, 2), None);

        assert_eq!(result, Err(GameError::InvalidMove(InvalidMove::Overflow)));
    }
}
