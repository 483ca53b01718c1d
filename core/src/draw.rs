use alloc::collections::VecDeque;
use rand::Rng;

use crate::*;

/// Score above which the harsher late-game distribution applies.
pub const LATE_GAME_SCORE: Money = 300;

const EARLY_GAME_TILES: [(TileValue, f64); 5] =
    [(2, 0.35), (1, 0.35), (0, 0.20), (-1, 0.09), (-2, 0.01)];

const LATE_GAME_TILES: [(TileValue, f64); 6] =
    [(2, 0.23), (1, 0.27), (0, 0.23), (-1, 0.09), (-2, 0.09), (-3, 0.09)];

/// Tiles drawn with equal odds when simulating a game.
pub const UNIFORM_TILES: [TileValue; 5] = [1, 2, 0, -1, -2];

/// Possible next tiles and their probabilities for a board at `score`.
pub fn tile_distribution(score: Money) -> &'static [(TileValue, f64)] {
    if score <= LATE_GAME_SCORE {
        &EARLY_GAME_TILES
    } else {
        &LATE_GAME_TILES
    }
}

/// Supplies the tile drawn after each move when playing a game out.
pub trait TileSource {
    /// Next tile for a game currently at `board`, `None` once the source is exhausted.
    fn next_tile(&mut self, board: &Board) -> Option<TileValue>;
}

/// Uniform draw from [`UNIFORM_TILES`], ignoring the board.
#[derive(Clone, Debug)]
pub struct UniformTiles<R> {
    rng: R,
}

impl<R: Rng> UniformTiles<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TileSource for UniformTiles<R> {
    fn next_tile(&mut self, _board: &Board) -> Option<TileValue> {
        let index = self.rng.random_range(0..UNIFORM_TILES.len());
        Some(UNIFORM_TILES[index])
    }
}

/// Draw following [`tile_distribution`] for the board's current score.
#[derive(Clone, Debug)]
pub struct WeightedTiles<R> {
    rng: R,
}

impl<R: Rng> WeightedTiles<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TileSource for WeightedTiles<R> {
    fn next_tile(&mut self, board: &Board) -> Option<TileValue> {
        let distribution = tile_distribution(board.score());
        let roll: f64 = self.rng.random();

        let mut cumulative = 0.0;
        for &(tile, probability) in distribution {
            cumulative += probability;
            if roll < cumulative {
                return Some(tile);
            }
        }
        // rounding can leave the sum a hair under 1.0
        distribution.last().map(|&(tile, _)| tile)
    }
}

/// Fixed sequence of tiles, for replaying a known game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedTiles {
    tiles: VecDeque<TileValue>,
}

impl ScriptedTiles {
    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }
}

impl FromIterator<TileValue> for ScriptedTiles {
    fn from_iter<I: IntoIterator<Item = TileValue>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}

impl TileSource for ScriptedTiles {
    fn next_tile(&mut self, _board: &Board) -> Option<TileValue> {
        let tile = self.tiles.pop_front();
        if tile.is_none() {
            log::warn!("Scripted tile sequence exhausted");
        }
        tile
    }
}
