//! Strictly Generals - command-line shell
//!
//! Each invocation loads a snapshot, applies one command and saves it back.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::{Path, PathBuf};
use strictly_generals::{Game, GameConfig, GameSnapshot, LayoutKind, Phase, Side, TileIndex};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::New {
            config,
            layout,
            seed,
            first,
            out,
        } => run_new(config, layout, seed, first, out),
        Command::Show { snapshot } => run_show(&snapshot),
        Command::Moves { snapshot } => run_moves(&snapshot),
        Command::Move { from, to, snapshot } => run_move(&snapshot, from, to),
    }
}

/// Create a game from config and flags, then save it
#[instrument]
fn run_new(
    config: Option<PathBuf>,
    layout: Option<LayoutKind>,
    seed: Option<u64>,
    first: Option<Side>,
    out: PathBuf,
) -> Result<()> {
    let base = match config {
        Some(path) => GameConfig::from_file(&path)?,
        None => GameConfig::default(),
    };
    let config = GameConfig::new(
        first.unwrap_or(*base.first_mover()),
        layout.unwrap_or(*base.layout()),
        seed.or(*base.seed()),
    );

    let game = config.new_game()?;
    game.snapshot().write_to(&out)?;
    info!(path = %out.display(), "New game saved");

    print_game(&game);
    Ok(())
}

fn load(path: &Path) -> Result<Game> {
    let snapshot = GameSnapshot::read_from(path)?;
    let game = Game::restore(&snapshot)
        .with_context(|| format!("Failed to restore {}", path.display()))?;
    Ok(game)
}

/// Print a saved game
#[instrument]
fn run_show(path: &Path) -> Result<()> {
    print_game(&load(path)?);
    Ok(())
}

/// List legal moves of the side to play
#[instrument]
fn run_moves(path: &Path) -> Result<()> {
    let game = load(path)?;
    let moves = game.legal_moves();
    if moves.is_empty() {
        println!("No moves available ({})", game.phase());
        return Ok(());
    }

    println!("{} to play:", game.active_side());
    for (source, target) in moves {
        let piece = game.board().piece_at(source).map(|p| p.to_string()).unwrap_or_default();
        match game.board().piece_at(target) {
            Some(_) => println!("  {piece} {source} -> {target} (attack)"),
            None => println!("  {piece} {source} -> {target}"),
        }
    }
    Ok(())
}

/// Play a move for the active side and save the game
#[instrument]
fn run_move(path: &Path, from: usize, to: usize) -> Result<()> {
    let mut game = load(path)?;
    let side = game.active_side();
    let source = TileIndex::new(from)?;
    let target = TileIndex::new(to)?;

    match game.attempt_move(side, source, target) {
        Ok(mv) => {
            println!("{mv}");
            game.snapshot().write_to(path)?;
            print_game(&game);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Move refused");
            Err(e).context(format!("Move {from} -> {to} refused"))
        }
    }
}

fn print_game(game: &Game) {
    println!("{}", game.board());
    println!();
    match (game.winner(), game.phase()) {
        (Some(winner), _) => println!("Game over: {winner} wins on turn {}", game.turn()),
        (None, Phase::Concluded) => println!("Game over: no pieces left on turn {}", game.turn()),
        (None, _) => println!(
            "Turn {} ({}), {} to play; white {} pieces, black {} pieces",
            game.turn(),
            game.phase(),
            game.active_side(),
            game.live_pieces(Side::White),
            game.live_pieces(Side::Black)
        ),
    }
}
