//! Serialized game state and reconstruction by replay.
//!
//! A snapshot has three blocks: the initial layout tile by tile, a scalar
//! turn record, and the executed moves. Restoring replays the layout and
//! then every move in turn order. A restored game matches the one it was
//! taken from in everything except its last rejected attempt.

use super::action::{Move, MoveError, MoveKind};
use super::board::{Board, BoardError};
use super::game::{Game, GameError};
use super::phases::Phase;
use super::rank::Rank;
use super::types::{Piece, Side, TILE_COUNT, TileIndex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// One tile of the initial layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Tile index.
    pub tile: TileIndex,
    /// Home territory of the tile.
    pub territory: Side,
    /// Rank of the piece on the tile.
    pub rank: Option<Rank>,
    /// Side of the piece on the tile.
    pub side: Option<Side>,
}

/// Scalar turn state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Side that moved first.
    pub first_mover: Side,
    /// Turn id of the next move; 0 if the game has not started.
    pub current_turn: u32,
    /// Turn id of the latest executed move.
    pub last_executed_turn: Option<u32>,
}

/// One executed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Turn id.
    pub turn: u32,
    /// Classification.
    pub kind: MoveKind,
    /// Moving side.
    pub side: Side,
    /// Rank of the moving piece.
    pub source_rank: Rank,
    /// Rank of the piece on the target tile.
    pub target_rank: Option<Rank>,
    /// Source tile.
    pub source: TileIndex,
    /// Target tile.
    pub target: TileIndex,
    /// Whether the move was executed.
    pub executed: bool,
}

impl From<&Move> for MoveRecord {
    fn from(mv: &Move) -> Self {
        Self {
            turn: mv.turn(),
            kind: mv.kind(),
            side: mv.side(),
            source_rank: mv.piece().rank,
            target_rank: mv.target_piece().map(|piece| piece.rank),
            source: mv.source(),
            target: mv.target(),
            executed: mv.executed(),
        }
    }
}

/// Complete serialized game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Initial layout, one record per tile in board order.
    pub layout: Vec<TileRecord>,
    /// Turn state.
    pub turns: TurnRecord,
    /// Executed moves in turn order.
    pub moves: Vec<MoveRecord>,
}

/// Reasons a snapshot cannot be turned back into a game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RestoreError {
    /// The layout does not list every tile.
    #[display("Layout has {} tiles, expected {}", _0, TILE_COUNT)]
    LayoutSize(usize),

    /// A record is out of board order.
    #[display("Layout position {position} holds tile {tile}")]
    TileOrder {
        /// Position in the layout list.
        position: usize,
        /// Tile recorded there.
        tile: TileIndex,
    },

    /// A record claims a territory its tile does not have.
    #[display("Tile {} records the wrong territory", _0)]
    TerritoryMismatch(TileIndex),

    /// A record has a rank without a side or the reverse.
    #[display("Tile {} has an incomplete piece record", _0)]
    IncompletePiece(TileIndex),

    /// A recorded move was refused during replay.
    #[display("Replay of turn {turn} failed: {error}")]
    Move {
        /// Turn being replayed.
        turn: u32,
        /// Why the move failed.
        error: MoveError,
    },

    /// A replayed move produced a different result than recorded.
    #[display("Replay diverged at turn {}", _0)]
    Diverged(u32),

    /// The replayed game ends on a different turn than recorded.
    #[display("Replay ended on turn {actual}, snapshot says {expected}")]
    TurnMismatch {
        /// Recorded current turn.
        expected: u32,
        /// Current turn after replay.
        actual: u32,
    },

    /// Lifecycle error while rebuilding.
    #[display("Game error: {}", _0)]
    Game(GameError),
}

impl std::error::Error for RestoreError {}

impl From<GameError> for RestoreError {
    fn from(err: GameError) -> Self {
        RestoreError::Game(err)
    }
}

impl From<BoardError> for RestoreError {
    fn from(err: BoardError) -> Self {
        RestoreError::Game(GameError::Board(err))
    }
}

/// Errors reading or writing snapshot files.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SnapshotError {
    /// No snapshot exists at the path.
    #[display("No saved game at {}", _0.display())]
    NotFound(PathBuf),

    /// Filesystem error.
    #[display("I/O error: {}", _0)]
    Io(String),

    /// Malformed JSON.
    #[display("Invalid snapshot: {}", _0)]
    Json(String),
}

impl std::error::Error for SnapshotError {}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err.to_string())
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Io(err.to_string())
    }
}

impl GameSnapshot {
    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the snapshot to a file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        debug!("Snapshot written");
        Ok(())
    }

    /// Reads a snapshot from a file.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::NotFound`] if the file does not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Snapshot not found");
            return Err(SnapshotError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Game {
    /// Captures the layout, turn state and executed moves.
    ///
    /// Before the game starts the layout is the current board.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> GameSnapshot {
        let layout = self
            .initial_layout()
            .unwrap_or(self.board())
            .tiles()
            .iter()
            .map(|tile| TileRecord {
                tile: tile.id(),
                territory: tile.territory(),
                rank: tile.occupant().map(|piece| piece.rank),
                side: tile.occupant().map(|piece| piece.side),
            })
            .collect();

        GameSnapshot {
            layout,
            turns: TurnRecord {
                first_mover: self.first_mover(),
                current_turn: self.turn(),
                last_executed_turn: self.last_executed_turn(),
            },
            moves: self.history().into_iter().map(MoveRecord::from).collect(),
        }
    }

    /// Rebuilds a game from a snapshot by replaying it.
    #[instrument(skip(snapshot), fields(moves = snapshot.moves.len()))]
    pub fn restore(snapshot: &GameSnapshot) -> Result<Game, RestoreError> {
        let board = restore_layout(&snapshot.layout)?;
        let mut game = Game::arranged(board);

        let turns = snapshot.turns;
        if turns.current_turn == 0 {
            return match snapshot.moves.first() {
                Some(record) => Err(RestoreError::Diverged(record.turn)),
                None => Ok(game),
            };
        }
        game.start(turns.first_mover)?;

        let mut records: Vec<MoveRecord> = snapshot
            .moves
            .iter()
            .copied()
            .filter(|record| record.executed)
            .collect();
        records.sort_by_key(|record| record.turn);

        for record in records {
            while game.phase() == Phase::InProgress && game.turn() < record.turn {
                game.advance_turn()?;
            }
            if game.turn() != record.turn {
                return Err(RestoreError::Diverged(record.turn));
            }

            let mv = game
                .attempt_move(record.side, record.source, record.target)
                .map_err(|error| RestoreError::Move {
                    turn: record.turn,
                    error,
                })?;
            if MoveRecord::from(&mv) != record {
                return Err(RestoreError::Diverged(record.turn));
            }
        }

        while game.phase() == Phase::InProgress && game.turn() < turns.current_turn {
            game.advance_turn()?;
        }
        if game.turn() != turns.current_turn
            || game.last_executed_turn() != turns.last_executed_turn
        {
            return Err(RestoreError::TurnMismatch {
                expected: turns.current_turn,
                actual: game.turn(),
            });
        }

        info!(turn = game.turn(), phase = %game.phase(), "Game restored");
        Ok(game)
    }
}

fn restore_layout(layout: &[TileRecord]) -> Result<Board, RestoreError> {
    if layout.len() != TILE_COUNT {
        return Err(RestoreError::LayoutSize(layout.len()));
    }

    let mut board = Board::new();
    for (position, record) in layout.iter().enumerate() {
        if record.tile.index() != position {
            return Err(RestoreError::TileOrder {
                position,
                tile: record.tile,
            });
        }
        if record.territory != record.tile.territory() {
            return Err(RestoreError::TerritoryMismatch(record.tile));
        }
        match (record.rank, record.side) {
            (Some(rank), Some(side)) => board.place(record.tile, Piece::new(rank, side))?,
            (None, None) => {}
            _ => return Err(RestoreError::IncompletePiece(record.tile)),
        }
    }
    Ok(board)
}
