//! The game aggregate: board, side states, turn order and lifecycle.
//!
//! A [`Game`] is exclusively owned by its caller and mutated through
//! `&mut self`. Moves are serialized by the active-side precondition;
//! there is no locking and no global state.

use super::action::{Move, MoveError, MoveRequest, RejectedMove};
use super::board::{Board, BoardError};
use super::builder::BoardBuilder;
use super::contracts::{Contract, MoveContract};
use super::invariants::{GeneralsInvariants, InvariantSet};
use super::phases::Phase;
use super::rules::{self, Outcome};
use super::types::{Side, TileIndex};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Per-side bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SideState {
    /// The side this state belongs to.
    pub(crate) side: Side,
    /// Pieces still on the board.
    pub(crate) live: usize,
    /// Moves this side has executed.
    pub(crate) turns: u32,
    /// Whether this side is the active mover.
    pub(crate) active: bool,
    /// Executed moves in turn order.
    pub(crate) history: Vec<Move>,
}

impl SideState {
    fn new(side: Side) -> Self {
        Self {
            side,
            live: 0,
            turns: 0,
            active: false,
            history: Vec::new(),
        }
    }
}

/// Errors from lifecycle and arrangement operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The operation is not allowed in the current phase.
    #[display("Operation requires phase {expected}, game is {actual}")]
    WrongPhase {
        /// Phase the operation needs.
        expected: Phase,
        /// Phase the game is in.
        actual: Phase,
    },

    /// A side has no pieces, so the game cannot start.
    #[display("{} has no pieces on the board", _0)]
    MissingSide(Side),

    /// Arrangement tried to touch pieces of both sides at once.
    #[display("Tiles {a} and {b} hold pieces of different sides")]
    MixedSides {
        /// First tile.
        a: TileIndex,
        /// Second tile.
        b: TileIndex,
    },

    /// Arrangement tried to leave the piece's home territory.
    #[display("Tile {tile} is outside {side}'s territory")]
    OutsideTerritory {
        /// Requested tile.
        tile: TileIndex,
        /// Side of the piece.
        side: Side,
    },

    /// A tile operation failed.
    #[display("Board error: {}", _0)]
    Board(BoardError),
}

impl std::error::Error for GameError {}

impl From<BoardError> for GameError {
    fn from(err: BoardError) -> Self {
        GameError::Board(err)
    }
}

/// A game of generals.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) phase: Phase,
    pub(crate) white: SideState,
    pub(crate) black: SideState,
    pub(crate) first_mover: Side,
    pub(crate) active: Side,
    pub(crate) turn: u32,
    pub(crate) last_executed_turn: Option<u32>,
    pub(crate) last_move: Option<Move>,
    pub(crate) last_rejected: Option<RejectedMove>,
    pub(crate) winner: Option<Side>,
    pub(crate) initial_layout: Option<Board>,
}

// ─────────────────────────────────────────────────────────────
//  Construction and arrangement
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Creates an empty game waiting for a layout.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            phase: Phase::Initializing,
            white: SideState::new(Side::White),
            black: SideState::new(Side::Black),
            first_mover: Side::White,
            active: Side::White,
            turn: 0,
            last_executed_turn: None,
            last_move: None,
            last_rejected: None,
            winner: None,
            initial_layout: None,
        }
    }

    /// Wraps an already-populated board, ready for arrangement.
    pub(crate) fn arranged(board: Board) -> Self {
        let mut game = Self::new();
        game.board = board;
        game.sync_live_counts();
        game.phase = Phase::Arranging;
        game
    }

    /// Starts a game from an arbitrary position.
    ///
    /// Unlike [`Game::build`], pieces may stand anywhere; only the presence
    /// of both sides is checked.
    #[instrument(skip(board))]
    pub fn with_position(board: Board, first_mover: Side) -> Result<Self, GameError> {
        let mut game = Self::arranged(board);
        game.start(first_mover)?;
        Ok(game)
    }

    /// Commits a builder's layout to the empty board.
    ///
    /// Returns the number of pieces placed.
    #[instrument(skip(self, builder))]
    pub fn build(&mut self, builder: &BoardBuilder) -> Result<usize, GameError> {
        self.expect_phase(Phase::Initializing)?;
        let placed = builder.commit(&mut self.board);
        self.sync_live_counts();
        self.phase = Phase::Arranging;
        self.debug_check();
        Ok(placed)
    }

    /// Swaps two pieces of the same side before the game starts.
    #[instrument(skip(self))]
    pub fn arrange_swap(&mut self, a: TileIndex, b: TileIndex) -> Result<(), GameError> {
        self.expect_phase(Phase::Arranging)?;
        let first = self.board.piece_at(a).ok_or(BoardError::TileEmpty(a))?;
        let second = self.board.piece_at(b).ok_or(BoardError::TileEmpty(b))?;
        if first.side != second.side {
            return Err(GameError::MixedSides { a, b });
        }
        self.board.swap(a, b)?;
        self.debug_check();
        Ok(())
    }

    /// Moves a piece to an empty tile of its own territory before the game starts.
    #[instrument(skip(self))]
    pub fn arrange_relocate(
        &mut self,
        source: TileIndex,
        target: TileIndex,
    ) -> Result<(), GameError> {
        self.expect_phase(Phase::Arranging)?;
        let piece = self.board.piece_at(source).ok_or(BoardError::TileEmpty(source))?;
        if !piece.side.owns_tile(target) {
            return Err(GameError::OutsideTerritory {
                tile: target,
                side: piece.side,
            });
        }
        self.board.relocate(source, target)?;
        self.debug_check();
        Ok(())
    }

    /// Ends arrangement and gives the first move to `first_mover`.
    ///
    /// # Errors
    ///
    /// [`GameError::MissingSide`] if either side has no pieces.
    #[instrument(skip(self))]
    pub fn start(&mut self, first_mover: Side) -> Result<(), GameError> {
        self.expect_phase(Phase::Arranging)?;
        if let Some(side) = Side::iter().find(|side| self.board.piece_count(*side) == 0) {
            warn!(%side, "Cannot start without both sides");
            return Err(GameError::MissingSide(side));
        }

        self.first_mover = first_mover;
        self.active = first_mover;
        self.turn = 1;
        self.initial_layout = Some(self.board.clone());
        self.phase = Phase::InProgress;
        self.sync_active_flags();

        info!(
            %first_mover,
            white = self.white.live,
            black = self.black.live,
            "Game started"
        );
        Ok(())
    }

    /// Throws the game away and returns to an empty board.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        info!(winner = ?self.winner, "Restarting game");
        *self = Self::new();
    }
}

// ─────────────────────────────────────────────────────────────
//  Play
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Attempts a move for `side`.
    ///
    /// On success the executed move is returned, the history updated and
    /// either the game concludes or the turn passes to the other side.
    ///
    /// # Errors
    ///
    /// Any [`MoveError`]. The board is untouched and the attempt is kept as
    /// the last rejected move.
    #[instrument(skip(self), fields(turn = self.turn))]
    pub fn attempt_move(
        &mut self,
        side: Side,
        source: TileIndex,
        target: TileIndex,
    ) -> Result<Move, MoveError> {
        let request = MoveRequest::new(side, source, target);
        match self.apply(request) {
            Ok(mv) => Ok(mv),
            Err(reason) => {
                warn!(%request, %reason, "Move rejected");
                self.last_rejected = Some(RejectedMove {
                    request,
                    turn: self.turn,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }

    fn apply(&mut self, request: MoveRequest) -> Result<Move, MoveError> {
        #[cfg(debug_assertions)]
        let before = self.clone();

        MoveContract::pre(self, &request)?;
        let mut mv = Move::evaluate(&self.board, request, self.turn)?;
        mv.execute(&mut self.board)?;

        for piece in mv.eliminated() {
            let state = self.side_state_mut(piece.side);
            state.live = state.live.saturating_sub(1);
        }
        let state = self.side_state_mut(request.side);
        state.turns += 1;
        state.history.push(mv.clone());
        self.last_executed_turn = Some(mv.turn());
        self.last_move = Some(mv.clone());
        debug!(%mv, "Move executed");

        match rules::outcome_after(&self.board, &mv) {
            Some(outcome) => self.conclude(outcome),
            None => self.pass_turn(),
        }

        #[cfg(debug_assertions)]
        MoveContract::post(&before, self)?;

        Ok(mv)
    }

    /// Hands the move to the other side without playing.
    #[instrument(skip(self))]
    pub fn advance_turn(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::InProgress)?;
        self.pass_turn();
        Ok(())
    }

    fn pass_turn(&mut self) {
        self.active = self.active.opponent();
        self.turn += 1;
        self.sync_active_flags();
    }

    fn conclude(&mut self, outcome: Outcome) {
        debug_assert!(self.winner.is_none(), "winner is set at most once");
        if self.winner.is_none() {
            self.winner = outcome.winner();
        }
        self.phase = Phase::Concluded;
        self.sync_active_flags();
        info!(?outcome, turn = self.turn, "Game concluded");
    }
}

// ─────────────────────────────────────────────────────────────
//  Queries
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side permitted to move.
    pub fn active_side(&self) -> Side {
        self.active
    }

    /// Side that moved first.
    pub fn first_mover(&self) -> Side {
        self.first_mover
    }

    /// Turn id of the next move (0 before the game starts).
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Turn id of the most recent executed move.
    pub fn last_executed_turn(&self) -> Option<u32> {
        self.last_executed_turn
    }

    /// Most recent executed move.
    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// Most recent refused attempt.
    pub fn last_rejected(&self) -> Option<&RejectedMove> {
        self.last_rejected.as_ref()
    }

    /// Winner, once the game has concluded.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Per-side bookkeeping.
    pub fn side_state(&self, side: Side) -> &SideState {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    fn side_state_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    /// Pieces a side still has on the board.
    pub fn live_pieces(&self, side: Side) -> usize {
        self.side_state(side).live
    }

    /// Both sides' executed moves in turn order.
    pub fn history(&self) -> Vec<&Move> {
        let mut moves: Vec<&Move> = self
            .white
            .history
            .iter()
            .chain(self.black.history.iter())
            .collect();
        moves.sort_by_key(|mv| mv.turn());
        moves
    }

    /// Board as it stood when the game started.
    pub fn initial_layout(&self) -> Option<&Board> {
        self.initial_layout.as_ref()
    }

    /// Destinations of the piece on `source`.
    pub fn reachable(&self, source: TileIndex) -> Vec<TileIndex> {
        rules::reachable(&self.board, source)
    }

    /// Moves available to the active side.
    pub fn legal_moves(&self) -> Vec<(TileIndex, TileIndex)> {
        if !self.phase.accepts_moves() {
            return Vec::new();
        }
        rules::legal_moves(&self.board, self.active)
    }
}

// ─────────────────────────────────────────────────────────────
//  Internal helpers
// ─────────────────────────────────────────────────────────────

impl Game {
    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn sync_live_counts(&mut self) {
        self.white.live = self.board.piece_count(Side::White);
        self.black.live = self.board.piece_count(Side::Black);
    }

    fn sync_active_flags(&mut self) {
        let playing = self.phase.accepts_moves();
        self.white.active = playing && self.active == Side::White;
        self.black.active = playing && self.active == Side::Black;
    }

    fn debug_check(&self) {
        debug_assert!(
            GeneralsInvariants::check_all(self).is_ok(),
            "Game invariants violated"
        );
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use crate::types::Piece;

    fn tile(i: usize) -> TileIndex {
        TileIndex::new(i).unwrap()
    }

    fn demo() -> Game {
        let mut game = Game::new();
        game.build(&BoardBuilder::demo()).unwrap();
        game
    }

    #[test]
    fn test_lifecycle() {
        let mut game = Game::new();
        assert_eq!(game.phase(), Phase::Initializing);
        assert_eq!(game.build(&BoardBuilder::demo()), Ok(42));
        assert_eq!(game.phase(), Phase::Arranging);
        game.start(Side::Black).unwrap();
        assert_eq!(game.phase(), Phase::InProgress);
        assert_eq!(game.active_side(), Side::Black);
        assert_eq!(game.turn(), 1);
        assert!(*game.side_state(Side::Black).active());
        assert!(!*game.side_state(Side::White).active());
    }

    #[test]
    fn test_double_build_rejected() {
        let mut game = demo();
        assert_eq!(
            game.build(&BoardBuilder::demo()),
            Err(GameError::WrongPhase {
                expected: Phase::Initializing,
                actual: Phase::Arranging
            })
        );
    }

    #[test]
    fn test_start_requires_both_sides() {
        let mut builder = BoardBuilder::new();
        builder.set_piece(4, Piece::new(Rank::Flag, Side::White)).unwrap();
        let mut game = Game::new();
        game.build(&builder).unwrap();
        assert_eq!(game.start(Side::White), Err(GameError::MissingSide(Side::Black)));
        assert_eq!(game.phase(), Phase::Arranging);
    }

    #[test]
    fn test_arrange_swap_same_side_only() {
        let mut game = demo();
        // White flag at 4, white private at 16.
        game.arrange_swap(tile(4), tile(16)).unwrap();
        assert_eq!(game.board().piece_at(tile(16)).map(|p| p.rank), Some(Rank::Flag));

        assert_eq!(
            game.arrange_swap(tile(27), tile(36)),
            Err(GameError::MixedSides {
                a: tile(27),
                b: tile(36)
            })
        );
    }

    #[test]
    fn test_arrange_relocate_stays_home() {
        let mut game = demo();
        game.arrange_relocate(tile(4), tile(0)).unwrap();
        assert!(game.board().is_empty(tile(4)));

        assert!(matches!(
            game.arrange_relocate(tile(35), tile(45)),
            Err(GameError::OutsideTerritory { .. })
        ));
    }

    #[test]
    fn test_arrangement_closed_after_start() {
        let mut game = demo();
        game.start(Side::White).unwrap();
        assert!(matches!(
            game.arrange_swap(tile(4), tile(16)),
            Err(GameError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_moves_alternate() {
        let mut game = demo();
        game.start(Side::White).unwrap();

        game.attempt_move(Side::White, tile(16), tile(7)).unwrap();
        assert_eq!(game.active_side(), Side::Black);
        assert_eq!(game.turn(), 2);
        assert_eq!(
            game.attempt_move(Side::White, tile(7), tile(6)),
            Err(MoveError::WrongSide(Side::White))
        );
        game.attempt_move(Side::Black, tile(55), tile(64)).unwrap();
        assert_eq!(game.last_executed_turn(), Some(2));
        assert_eq!(*game.side_state(Side::White).turns(), 1);
        assert_eq!(*game.side_state(Side::Black).turns(), 1);
    }

    #[test]
    fn test_rejected_move_recorded() {
        let mut game = demo();
        game.start(Side::White).unwrap();
        let before = game.board().clone();

        let err = game.attempt_move(Side::White, tile(4), tile(6)).unwrap_err();
        assert_eq!(
            err,
            MoveError::Unreachable {
                source: tile(4),
                target: tile(6)
            }
        );
        let rejected = game.last_rejected().unwrap();
        assert_eq!(rejected.request.source, tile(4));
        assert_eq!(rejected.turn, 1);
        assert_eq!(game.board(), &before);
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_advance_turn() {
        let mut game = demo();
        assert!(game.advance_turn().is_err());
        game.start(Side::White).unwrap();
        game.advance_turn().unwrap();
        assert_eq!(game.active_side(), Side::Black);
        assert_eq!(game.turn(), 2);
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut game = demo();
        game.start(Side::White).unwrap();
        game.attempt_move(Side::White, tile(16), tile(7)).unwrap();
        game.restart();
        assert_eq!(game.phase(), Phase::Initializing);
        assert_eq!(game.board().occupied_count(), 0);
        assert!(game.history().is_empty());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_legal_moves_only_while_in_progress() {
        let mut game = demo();
        assert!(game.legal_moves().is_empty());
        game.start(Side::White).unwrap();
        assert!(!game.legal_moves().is_empty());
        assert!(game.legal_moves().iter().all(|(source, _)| {
            game.board().piece_at(*source).map(|p| p.side) == Some(Side::White)
        }));
    }
}
