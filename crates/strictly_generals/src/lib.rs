//! Strictly Generals - a rules engine for a hidden-rank generals board game.
//!
//! Two sides field 21 ranked pieces each on a 9x8 board. Pieces step one
//! tile orthogonally; moving onto an opposing piece resolves combat by
//! rank. A side wins by capturing the enemy flag, walking its own flag to
//! the far row, or leaving the opponent without a legal move.
//!
//! # Architecture
//!
//! - **Board**: index-addressed tiles with fixed territories
//! - **Builder**: validated initial layouts (demo, random, custom)
//! - **Rules**: pure combat, reachability and win detection
//! - **Game**: lifecycle, turn order and history, guarded by contracts
//!   and invariants
//! - **Snapshot**: serializable state, restored by replay
//!
//! # Example
//!
//! ```
//! use strictly_generals::{BoardBuilder, Game, MoveKind, Side, TileIndex};
//!
//! let mut game = Game::new();
//! game.build(&BoardBuilder::demo()).unwrap();
//! game.start(Side::White).unwrap();
//!
//! let mv = game
//!     .attempt_move(Side::White, TileIndex::new(16).unwrap(), TileIndex::new(7).unwrap())
//!     .unwrap();
//! assert_eq!(mv.kind(), MoveKind::Normal);
//! assert_eq!(game.active_side(), Side::Black);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod board;
mod builder;
mod config;
mod contracts;
mod game;
mod invariants;
mod phases;
mod rank;
mod session;
mod snapshot;
mod types;

pub mod rules;

// Crate-level exports - Domain types
pub use rank::{PIECES_PER_SIDE, Rank, RankSpec, UnknownRank};
pub use types::{COLUMNS, Direction, HALF_BOARD, Piece, ROWS, Side, TILE_COUNT, Tile, TileIndex};

// Crate-level exports - Board and layout
pub use board::{Board, BoardError};
pub use builder::{BoardBuilder, Placement, PlacementError};

// Crate-level exports - Moves
pub use action::{Move, MoveError, MoveKind, MoveRequest, RejectedMove};
pub use rules::{Engagement, Outcome};

// Crate-level exports - Game
pub use game::{Game, GameError, SideState};
pub use phases::Phase;

// Crate-level exports - Contracts
pub use contracts::{
    AcceptingMoves, Contract, LegalMove, MoveContract, OwnsPiece, PieceAtSource, SidesTurn,
    TargetAdjacent,
};

// Crate-level exports - Invariants
pub use invariants::{
    GeneralsInvariants, HistoryConsistentInvariant, Invariant, InvariantSet, InvariantViolation,
    PieceCountInvariant, TerritoryInvariant,
};

// Crate-level exports - Persistence
pub use snapshot::{GameSnapshot, MoveRecord, RestoreError, SnapshotError, TileRecord, TurnRecord};

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, LayoutKind};

// Crate-level exports - Sessions
pub use session::{GameSession, Player, PlayerId, SessionError, SessionId};
