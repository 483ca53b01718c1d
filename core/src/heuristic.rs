use crate::*;

pub const CORNER_COMPETITOR_PENALTY: Value = 30;
pub const EDGE_COMPETITOR_PENALTY: Value = 10;

impl Board {
    /// Number of moves that would raise the score if played right now.
    ///
    /// Moves are dry runs (no tile drawn); illegal or bankrupting ones are skipped.
    pub fn available_combos(&self) -> usize {
        self.legal_moves(None)
            .filter(|(_, next)| next.score > self.score)
            .count()
    }

    /// Penalty for competitors: flat in corners and on edges, by depth in the center.
    pub fn competitor_penalty(&self) -> Value {
        self.competitors()
            .map(|(coords, value)| match Region::of(coords) {
                Region::Corner => CORNER_COMPETITOR_PENALTY,
                Region::Edge => EDGE_COMPETITOR_PENALTY,
                Region::Center => 1 - Value::from(value),
            })
            .sum()
    }

    /// Static desirability of this board, without any search.
    pub fn heuristic_score(&self) -> Value {
        // one extra combo so an empty combo count does not zero the score term
        let combos = self.available_combos() as Value + 1;
        self.score
            .saturating_mul(combos)
            .saturating_sub(self.competitor_penalty())
    }
}

pub fn evaluate(board: &Board) -> Value {
    board.heuristic_score()
}
