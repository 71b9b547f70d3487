//! Command-line interface for strictly_generals.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_generals::{LayoutKind, Side};

/// Strictly Generals - headless shell for the generals rules engine
#[derive(Parser, Debug)]
#[command(name = "generals")]
#[command(about = "Play hidden-rank generals from saved snapshots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new game and save it
    New {
        /// Path to a TOML game config (flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Layout generator (demo or random)
        #[arg(long)]
        layout: Option<LayoutKind>,

        /// Seed for random layouts
        #[arg(long)]
        seed: Option<u64>,

        /// Side that moves first (white or black)
        #[arg(long)]
        first: Option<Side>,

        /// Where to write the snapshot
        #[arg(short, long, default_value = "generals.json")]
        out: PathBuf,
    },

    /// Print the board and turn state of a saved game
    Show {
        /// Snapshot to read
        #[arg(default_value = "generals.json")]
        snapshot: PathBuf,
    },

    /// List the moves available to the side to play
    Moves {
        /// Snapshot to read
        #[arg(default_value = "generals.json")]
        snapshot: PathBuf,
    },

    /// Play one move for the side to play and save the result
    Move {
        /// Source tile index
        from: usize,

        /// Target tile index
        to: usize,

        /// Snapshot to update
        #[arg(short, long, default_value = "generals.json")]
        snapshot: PathBuf,
    },
}
