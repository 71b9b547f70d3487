//! First-class move types.
//!
//! A [`Move`] is classified once when it is evaluated against a board and
//! may be executed at most once afterwards. Rejected attempts are kept as
//! [`RejectedMove`] records so callers can explain what went wrong.

use super::board::{Board, BoardError};
use super::contracts::LegalMove;
use super::rules::combat::{Engagement, classify};
use super::types::{Piece, Side, TileIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Outcome category of a move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum MoveKind {
    /// The target was empty; the piece relocates.
    Normal,
    /// Combat with a clear winner.
    Aggressive,
    /// Combat between equal powers; both pieces leave the board.
    Draw,
    /// The target holds a friendly piece. Never executable.
    Invalid,
}

/// A side's request to move the piece on `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Side submitting the move.
    pub side: Side,
    /// Tile the piece moves from.
    pub source: TileIndex,
    /// Tile the piece moves to.
    pub target: TileIndex,
}

impl MoveRequest {
    /// Creates a move request.
    pub fn new(side: Side, source: TileIndex, target: TileIndex) -> Self {
        Self {
            side,
            source,
            target,
        }
    }
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} -> {}", self.side, self.source, self.target)
    }
}

/// An evaluated move attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    side: Side,
    source: TileIndex,
    target: TileIndex,
    piece: Piece,
    target_piece: Option<Piece>,
    turn: u32,
    kind: MoveKind,
    engagement: Option<Engagement>,
    executed: bool,
}

impl Move {
    /// Evaluates a request against the board and classifies it.
    ///
    /// # Errors
    ///
    /// Fails if the source is empty, holds an opposing piece, or the
    /// target is not an orthogonal neighbour. A friendly-occupied target is
    /// not an error here: it yields a [`MoveKind::Invalid`] move.
    #[instrument(skip(board))]
    pub fn evaluate(board: &Board, request: MoveRequest, turn: u32) -> Result<Self, MoveError> {
        LegalMove::check(&request, board)?;

        let piece = board
            .piece_at(request.source)
            .ok_or(MoveError::NoPieceAtSource(request.source))?;
        let target_piece = board.piece_at(request.target);
        let (kind, engagement) = classify(piece, target_piece);

        debug!(%kind, ?engagement, "Move classified");
        Ok(Self {
            side: request.side,
            source: request.source,
            target: request.target,
            piece,
            target_piece,
            turn,
            kind,
            engagement,
            executed: false,
        })
    }

    /// Applies the move to the board.
    ///
    /// The request is re-evaluated against the live board first; if either
    /// tile changed since evaluation the move is stale.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::AlreadyExecuted`] on a second call,
    /// [`MoveError::FriendlyOccupied`] for invalid moves and
    /// [`MoveError::StaleMove`] when the board moved on. The board is not
    /// modified on error.
    #[instrument(skip(self, board), fields(turn = self.turn, kind = %self.kind))]
    pub fn execute(&mut self, board: &mut Board) -> Result<(), MoveError> {
        if self.executed {
            return Err(MoveError::AlreadyExecuted(self.turn));
        }
        if self.kind == MoveKind::Invalid {
            return Err(MoveError::FriendlyOccupied(self.target));
        }

        let fresh = Move::evaluate(board, self.request(), self.turn)?;
        if fresh.piece != self.piece || fresh.target_piece != self.target_piece {
            return Err(MoveError::StaleMove(self.turn));
        }

        match self.engagement {
            None => board.relocate(self.source, self.target)?,
            Some(Engagement::AttackerWins) => {
                board.remove(self.target)?;
                board.relocate(self.source, self.target)?;
            }
            Some(Engagement::DefenderWins) => {
                board.remove(self.source)?;
            }
            Some(Engagement::Draw) => {
                board.remove(self.source)?;
                board.remove(self.target)?;
            }
        }

        self.executed = true;
        Ok(())
    }

    /// The request this move was evaluated from.
    pub fn request(&self) -> MoveRequest {
        MoveRequest::new(self.side, self.source, self.target)
    }

    /// Side that made the move.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Source tile.
    pub fn source(&self) -> TileIndex {
        self.source
    }

    /// Target tile.
    pub fn target(&self) -> TileIndex {
        self.target
    }

    /// Snapshot of the moving piece.
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Snapshot of the piece on the target tile, if any.
    pub fn target_piece(&self) -> Option<Piece> {
        self.target_piece
    }

    /// Turn id this move was evaluated for.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Classification.
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Combat result, for `Aggressive` and `Draw` moves.
    pub fn engagement(&self) -> Option<Engagement> {
        self.engagement
    }

    /// Whether the move has been applied.
    pub fn executed(&self) -> bool {
        self.executed
    }

    /// Pieces this move removes from the board.
    pub fn eliminated(&self) -> Vec<Piece> {
        match (self.engagement, self.target_piece) {
            (Some(Engagement::AttackerWins), Some(defender)) => vec![defender],
            (Some(Engagement::DefenderWins), _) => vec![self.piece],
            (Some(Engagement::Draw), Some(defender)) => vec![self.piece, defender],
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {} {} -> {} ({})",
            self.turn,
            self.side,
            self.piece.rank,
            self.source,
            self.target,
            self.kind
        )
    }
}

/// An attempt that was refused, kept for feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedMove {
    /// The refused request.
    pub request: MoveRequest,
    /// Turn during which it was attempted.
    pub turn: u32,
    /// Why it was refused.
    pub reason: MoveError,
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The source tile is empty.
    #[display("No piece on tile {}", _0)]
    NoPieceAtSource(TileIndex),

    /// The source piece belongs to the other side.
    #[display("Piece on tile {tile} does not belong to {side}")]
    NotOwner {
        /// Side that tried to move.
        side: Side,
        /// Source tile.
        tile: TileIndex,
    },

    /// The target is not an orthogonal neighbour of the source.
    #[display("Tile {target} is not reachable from tile {source}")]
    Unreachable {
        /// Source tile.
        source: TileIndex,
        /// Requested target.
        target: TileIndex,
    },

    /// The target holds a piece of the moving side.
    #[display("Tile {} is occupied by a friendly piece", _0)]
    FriendlyOccupied(TileIndex),

    /// It's the other side's turn.
    #[display("It's not {}'s turn", _0)]
    WrongSide(Side),

    /// The game has not been started.
    #[display("Game has not started")]
    NotStarted,

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// The move object was already applied.
    #[display("Move for turn {} was already executed", _0)]
    AlreadyExecuted(u32),

    /// The board changed since the move was evaluated.
    #[display("Move for turn {} no longer matches the board", _0)]
    StaleMove(u32),

    /// A tile operation failed.
    #[display("Board error: {}", _0)]
    Board(BoardError),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

impl From<BoardError> for MoveError {
    fn from(err: BoardError) -> Self {
        MoveError::Board(err)
    }
}
