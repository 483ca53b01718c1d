use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use banker_core::{Board, Coord2, Decision, Searcher, TileSource, TileValue};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOver {
    InputEnded,
    Terminal,
    NoMove,
    OutOfTiles,
    MoveLimit,
}

impl fmt::Display for GameOver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::InputEnded => "input ended",
            Self::Terminal => "no tile can move",
            Self::NoMove => "every move would go bankrupt",
            Self::OutOfTiles => "tile source exhausted",
            Self::MoveLimit => "move limit reached",
        };
        f.write_str(reason)
    }
}

/// A game in progress: the current board and the policy choosing its moves.
pub struct Game {
    board: Board,
    searcher: Searcher,
}

impl Game {
    pub fn new(board: Board, searcher: Searcher) -> Self {
        Self { board, searcher }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Search and play the best move for `next_tile`.
    ///
    /// Returns the decision that was played, or `None` when no move exists.
    pub fn step(&mut self, next_tile: TileValue) -> Result<Option<Decision>> {
        let decision = self.searcher.best_move(&self.board, next_tile);
        let Some(mv) = decision.mv else {
            return Ok(None);
        };

        self.board = self
            .board
            .play(mv, Some(next_tile))
            .with_context(|| format!("playing {mv} with next tile {next_tile}"))?;
        Ok(Some(decision))
    }
}

fn coords(coords: Coord2) -> String {
    format!("({}, {})", coords.0, coords.1)
}

fn report<W: Write>(out: &mut W, decision: &Decision, board: &Board) -> Result<()> {
    if let Some(mv) = decision.mv {
        writeln!(out, "{} {} {}", coords(mv.source), coords(mv.dest), decision.value)?;
    }
    writeln!(out, "{board}")?;
    writeln!(
        out,
        "cash: {}, score: {}, moves: {}",
        board.cash(),
        board.score(),
        board.moves()
    )?;
    Ok(())
}

/// Reference driver: one tile value per input line, best move and board after each.
pub fn play<R: BufRead, W: Write>(game: &mut Game, input: R, out: &mut W) -> Result<GameOver> {
    let mut lines = input.lines().enumerate();
    loop {
        if game.board.is_terminal() {
            return Ok(GameOver::Terminal);
        }

        let Some((line_no, line)) = lines.next() else {
            return Ok(GameOver::InputEnded);
        };
        let line = line.context("reading next tile")?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let next_tile: TileValue = text
            .parse()
            .with_context(|| format!("line {}: expected a tile value, got {text:?}", line_no + 1))?;

        match game.step(next_tile)? {
            Some(decision) => report(out, &decision, &game.board)?,
            None => return Ok(GameOver::NoMove),
        }
    }
}

/// Self-play, drawing each next tile from `source`.
pub fn simulate<S: TileSource, W: Write>(
    game: &mut Game,
    source: &mut S,
    max_moves: Option<u32>,
    out: &mut W,
) -> Result<GameOver> {
    let mut played = 0;
    loop {
        if game.board.is_terminal() {
            return Ok(GameOver::Terminal);
        }
        if max_moves.is_some_and(|limit| played >= limit) {
            return Ok(GameOver::MoveLimit);
        }
        let Some(next_tile) = source.next_tile(&game.board) else {
            return Ok(GameOver::OutOfTiles);
        };

        log::info!("drew {next_tile}");
        match game.step(next_tile)? {
            Some(decision) => report(out, &decision, &game.board)?,
            None => return Ok(GameOver::NoMove),
        }
        played += 1;
    }
}
