#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use draw::*;
pub use engine::*;
pub use error::*;
pub use heuristic::*;
pub use search::*;
pub use tile::*;
pub use types::*;

mod board;
mod draw;
mod engine;
mod error;
mod heuristic;
mod search;
mod tile;
mod types;

/// Plies searched when nothing else is configured.
pub const DEFAULT_DEPTH: u8 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to search; each move and each tile draw consumes one.
    pub depth: u8,
    /// Evaluate root moves on the rayon pool.
    pub parallel: bool,
}

impl SearchConfig {
    pub const fn new(depth: u8) -> Self {
        Self {
            depth,
            parallel: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}
