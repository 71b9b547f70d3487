//! Contract-based validation for moves.
//!
//! Contracts define correctness through preconditions and postconditions.
//! Board-level preconditions are shared by [`crate::Move::evaluate`];
//! game-level ones add phase and turn order on top.

use super::action::{MoveError, MoveRequest};
use super::board::Board;
use super::game::Game;
use super::invariants::{GeneralsInvariants, InvariantSet};
use super::phases::Phase;
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Board Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the source tile holds a piece.
pub struct PieceAtSource;

impl PieceAtSource {
    /// Checks the precondition.
    pub fn check(request: &MoveRequest, board: &Board) -> Result<(), MoveError> {
        if board.is_empty(request.source) {
            Err(MoveError::NoPieceAtSource(request.source))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the source piece belongs to the requesting side.
pub struct OwnsPiece;

impl OwnsPiece {
    /// Checks the precondition.
    pub fn check(request: &MoveRequest, board: &Board) -> Result<(), MoveError> {
        match board.piece_at(request.source) {
            Some(piece) if piece.side == request.side => Ok(()),
            Some(_) => Err(MoveError::NotOwner {
                side: request.side,
                tile: request.source,
            }),
            None => Err(MoveError::NoPieceAtSource(request.source)),
        }
    }
}

/// Precondition: the target is an orthogonal neighbour of the source.
pub struct TargetAdjacent;

impl TargetAdjacent {
    /// Checks the precondition.
    pub fn check(request: &MoveRequest) -> Result<(), MoveError> {
        if request.source.is_adjacent(request.target) {
            Ok(())
        } else {
            Err(MoveError::Unreachable {
                source: request.source,
                target: request.target,
            })
        }
    }
}

/// Composite board precondition, checked in order.
pub struct LegalMove;

impl LegalMove {
    /// Validates all board preconditions for a move.
    #[instrument(skip(board))]
    pub fn check(request: &MoveRequest, board: &Board) -> Result<(), MoveError> {
        PieceAtSource::check(request, board)?;
        OwnsPiece::check(request, board)?;
        TargetAdjacent::check(request)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Game Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game is accepting moves.
pub struct AcceptingMoves;

impl AcceptingMoves {
    /// Checks the precondition.
    pub fn check(game: &Game) -> Result<(), MoveError> {
        match game.phase() {
            Phase::InProgress => Ok(()),
            Phase::Concluded => Err(MoveError::GameOver),
            Phase::Initializing | Phase::Arranging => Err(MoveError::NotStarted),
        }
    }
}

/// Precondition: it is the requesting side's turn.
pub struct SidesTurn;

impl SidesTurn {
    /// Checks the precondition.
    pub fn check(request: &MoveRequest, game: &Game) -> Result<(), MoveError> {
        if request.side != game.active_side() {
            Err(MoveError::WrongSide(request.side))
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move actions.
///
/// Preconditions:
/// - Game is in progress
/// - Requesting side is the active side
/// - Source holds the side's piece and the target is adjacent
///
/// Postconditions:
/// - Piece counts match the board
/// - Territories are unchanged
/// - History is consistent with the turn counter
pub struct MoveContract;

impl Contract<Game, MoveRequest> for MoveContract {
    fn pre(game: &Game, request: &MoveRequest) -> Result<(), MoveError> {
        AcceptingMoves::check(game)?;
        SidesTurn::check(request, game)?;
        LegalMove::check(request, game.board())
    }

    fn post(_before: &Game, after: &Game) -> Result<(), MoveError> {
        GeneralsInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use crate::types::{Piece, Side, TileIndex};

    fn tile(i: usize) -> TileIndex {
        TileIndex::new(i).unwrap()
    }

    fn started() -> Game {
        let mut board = Board::new();
        board.place(tile(10), Piece::new(Rank::Private, Side::White)).unwrap();
        board.place(tile(60), Piece::new(Rank::Private, Side::Black)).unwrap();
        Game::with_position(board, Side::White).unwrap()
    }

    #[test]
    fn test_precondition_holds_for_legal_move() {
        let game = started();
        let request = MoveRequest::new(Side::White, tile(10), tile(1));
        assert!(MoveContract::pre(&game, &request).is_ok());
    }

    #[test]
    fn test_precondition_wrong_side() {
        let game = started();
        let request = MoveRequest::new(Side::Black, tile(60), tile(51));
        assert_eq!(
            MoveContract::pre(&game, &request),
            Err(MoveError::WrongSide(Side::Black))
        );
    }

    #[test]
    fn test_precondition_not_started() {
        let game = Game::new();
        let request = MoveRequest::new(Side::White, tile(10), tile(1));
        assert_eq!(MoveContract::pre(&game, &request), Err(MoveError::NotStarted));
    }

    #[test]
    fn test_board_preconditions_in_order() {
        let game = started();
        let empty = MoveRequest::new(Side::White, tile(11), tile(40));
        assert_eq!(
            LegalMove::check(&empty, game.board()),
            Err(MoveError::NoPieceAtSource(tile(11)))
        );
        let foreign = MoveRequest::new(Side::White, tile(60), tile(40));
        assert!(matches!(
            LegalMove::check(&foreign, game.board()),
            Err(MoveError::NotOwner { .. })
        ));
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let mut game = started();
        let before = game.clone();
        game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
        assert!(MoveContract::post(&before, &game).is_ok());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let mut game = started();
        let before = game.clone();
        game.attempt_move(Side::White, tile(10), tile(1)).unwrap();

        // Sneak a piece onto the board without updating the live count.
        game.board
            .place(tile(30), Piece::new(Rank::Major, Side::White))
            .unwrap();
        assert!(MoveContract::post(&before, &game).is_err());
    }
}
