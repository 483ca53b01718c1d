use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use banker_core::{Board, SearchConfig, Searcher, UniformTiles, WeightedTiles};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use driver::Game;

mod driver;

#[derive(Parser, Debug)]
#[command(version, about = "Best-move search for the Banker tile game", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Search config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plies to search, overrides the config file
    #[arg(short, long)]
    depth: Option<u8>,

    /// Evaluate root moves in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Start from a saved board (JSON) instead of the opening position
    #[arg(short, long)]
    board: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Read one drawn tile per line from stdin and play the best move for it
    Play,
    /// Play a game against a seeded tile draw
    Simulate {
        /// Force a seed instead of one taken from the clock
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many moves
        #[arg(short, long)]
        max_moves: Option<u32>,

        /// Draw tiles with the score-dependent odds instead of uniformly
        #[arg(short, long)]
        weighted: bool,
    },
}

fn search_config(args: &Args) -> Result<SearchConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SearchConfig::default(),
    };

    if let Some(depth) = args.depth {
        cfg.depth = depth;
    }
    if args.parallel {
        cfg.parallel = true;
    }
    Ok(cfg)
}

fn starting_board(args: &Args) -> Result<Board> {
    let Some(path) = &args.board else {
        return Ok(Board::new());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading board {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing board {}", path.display()))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let cfg = search_config(&args)?;
    log::debug!("search config: {cfg:?}");
    let mut game = Game::new(starting_board(&args)?, Searcher::with_config(cfg));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", game.board())?;

    let over = match args.command.clone().unwrap_or(Command::Play) {
        Command::Play => driver::play(&mut game, io::stdin().lock(), &mut out)?,
        Command::Simulate {
            seed,
            max_moves,
            weighted,
        } => {
            let seed = seed.unwrap_or_else(clock_seed);
            log::info!("simulating with seed {seed}");
            let rng = SmallRng::seed_from_u64(seed);
            if weighted {
                driver::simulate(&mut game, &mut WeightedTiles::new(rng), max_moves, &mut out)?
            } else {
                driver::simulate(&mut game, &mut UniformTiles::new(rng), max_moves, &mut out)?
            }
        }
    };

    let board = game.board();
    writeln!(
        out,
        "game over ({over}): cash {}, score {}, moves {}",
        board.cash(),
        board.score(),
        board.moves()
    )?;
    Ok(())
}
