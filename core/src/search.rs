#[cfg(feature = "parallel")]
use alloc::vec::Vec;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Value reported when the board has no legal, solvent move.
pub const NO_MOVE_VALUE: Value = -1;

/// Move picked by a search and its expected value.
///
/// `mv` is `None` at a leaf (depth exhausted or terminal board), where `value`
/// is the heuristic score, and when no move survives, where it is [`NO_MOVE_VALUE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub mv: Option<Move>,
    pub value: Value,
}

impl Decision {
    const fn leaf(value: Value) -> Self {
        Self { mv: None, value }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes visited by the last search.
    pub nodes: u64,
    /// Largest node count over all searches since the last reset.
    pub peak_nodes: u64,
}

enum Node {
    /// Player picks a move, the drawn tile refills a stepped-off source.
    Max { next_tile: TileValue },
    /// Tile draw, averaged over the draw distribution.
    Chance,
}

/// Depth-limited expectimax policy with statistics about the last search.
#[derive(Clone, Debug, Default)]
pub struct Searcher {
    cfg: SearchConfig,
    stats: SearchStats,
}

impl Searcher {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(cfg: SearchConfig) -> Self {
        Self {
            cfg,
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> SearchConfig {
        self.cfg
    }

    /// Best move for `board` given the tile about to be drawn.
    pub fn best_move(&mut self, board: &Board, next_tile: TileValue) -> Decision {
        let mut nodes = 0;
        let decision = if self.cfg.parallel {
            choose_move_parallel(board, next_tile, self.cfg.depth, &mut nodes)
        } else {
            search(board, Node::Max { next_tile }, self.cfg.depth, &mut nodes)
        };

        self.stats.nodes = nodes;
        self.stats.peak_nodes = self.stats.peak_nodes.max(nodes);
        log::debug!(
            "depth {} tile {next_tile}: chose {:?} worth {} after {nodes} nodes",
            self.cfg.depth,
            decision.mv,
            decision.value,
        );
        decision
    }

    /// Expected value of `board` before the next tile is known.
    pub fn state_value(&mut self, board: &Board) -> Value {
        let mut nodes = 0;
        let value = search(board, Node::Chance, self.cfg.depth, &mut nodes).value;
        self.stats.nodes = nodes;
        self.stats.peak_nodes = self.stats.peak_nodes.max(nodes);
        value
    }

    /// Statistics collected by the last call to [`Self::best_move`] or [`Self::state_value`].
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }
}

/// Best move for `board` when `next_tile` will be drawn, searching `depth` plies.
pub fn choose_move(board: &Board, next_tile: TileValue, depth: u8) -> Decision {
    let mut nodes = 0;
    search(board, Node::Max { next_tile }, depth, &mut nodes)
}

/// Expected value of `board` over the next tile draw, searching `depth` plies.
pub fn expected_value(board: &Board, depth: u8) -> Value {
    let mut nodes = 0;
    search(board, Node::Chance, depth, &mut nodes).value
}

fn search(board: &Board, node: Node, depth: u8, nodes: &mut u64) -> Decision {
    *nodes += 1;
    if depth == 0 || board.is_terminal() {
        return Decision::leaf(board.heuristic_score());
    }
    match node {
        Node::Max { next_tile } => evaluate_max(board, next_tile, depth, nodes),
        Node::Chance => Decision::leaf(evaluate_chance(board, depth, nodes)),
    }
}

fn evaluate_max(board: &Board, next_tile: TileValue, depth: u8, nodes: &mut u64) -> Decision {
    let scored = board
        .legal_moves(Some(next_tile))
        .map(|(mv, next)| (mv, search(&next, Node::Chance, depth - 1, nodes).value));
    pick_best(scored)
}

fn evaluate_chance(board: &Board, depth: u8, nodes: &mut u64) -> Value {
    tile_distribution(board.score())
        .iter()
        .map(|&(next_tile, probability)| {
            let value = search(board, Node::Max { next_tile }, depth - 1, nodes).value;
            // truncates toward zero, per draw
            (probability * value as f64) as Value
        })
        .sum()
}

/// First move with the highest value, in enumeration order.
fn pick_best(scored: impl Iterator<Item = (Move, Value)>) -> Decision {
    let mut best: Option<(Move, Value)> = None;
    for (mv, value) in scored {
        log::trace!("candidate {mv} worth {value}");
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((mv, value));
        }
    }

    match best {
        Some((mv, value)) => Decision {
            mv: Some(mv),
            value,
        },
        None => Decision::leaf(NO_MOVE_VALUE),
    }
}

/// Root split across the rayon pool; siblings share nothing, so the result
/// matches the sequential search exactly.
#[cfg(feature = "parallel")]
fn choose_move_parallel(board: &Board, next_tile: TileValue, depth: u8, nodes: &mut u64) -> Decision {
    *nodes += 1;
    if depth == 0 || board.is_terminal() {
        return Decision::leaf(board.heuristic_score());
    }

    let children: Vec<(Move, Board)> = board.legal_moves(Some(next_tile)).collect();
    let scored: Vec<(Move, Value, u64)> = children
        .par_iter()
        .map(|(mv, next)| {
            let mut branch_nodes = 0;
            let value = search(next, Node::Chance, depth - 1, &mut branch_nodes).value;
            (*mv, value, branch_nodes)
        })
        .collect();

    *nodes += scored.iter().map(|&(_, _, branch_nodes)| branch_nodes).sum::<u64>();
    pick_best(scored.into_iter().map(|(mv, value, _)| (mv, value)))
}

#[cfg(not(feature = "parallel"))]
fn choose_move_parallel(board: &Board, next_tile: TileValue, depth: u8, nodes: &mut u64) -> Decision {
    log::warn!("built without the `parallel` feature, searching the root sequentially");
    search(board, Node::Max { next_tile }, depth, nodes)
}
