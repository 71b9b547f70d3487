//! Win detection after an executed move.

use super::super::action::{Move, MoveKind};
use super::super::board::Board;
use super::super::types::Side;
use super::reach::legal_moves;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The winner if the move eliminated a flag.
///
/// A draw never captures a flag.
pub fn captured_flag(mv: &Move) -> Option<Side> {
    if mv.kind() != MoveKind::Aggressive {
        return None;
    }
    mv.eliminated()
        .into_iter()
        .find(|piece| piece.rank.is_flag())
        .map(|flag| flag.side.opponent())
}

/// The winner if a flag walked onto its goal row.
pub fn flag_reached_goal(mv: &Move) -> Option<Side> {
    let reached = mv.kind() == MoveKind::Normal
        && mv.piece().rank.is_flag()
        && mv.target().row() == mv.side().goal_row();
    reached.then_some(mv.side())
}

/// Checks if a side has no legal move left.
pub fn is_immobilized(board: &Board, side: Side) -> bool {
    legal_moves(board, side).is_empty()
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// One side won.
    Won(Side),
    /// Both sides lost their last pieces in the same draw.
    Exhausted,
}

impl Outcome {
    /// The winning side, if any.
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Won(side) => Some(side),
            Outcome::Exhausted => None,
        }
    }
}

/// Decides whether the executed move ends the game.
///
/// Flag capture and flag arrival take precedence. Then a side left without
/// pieces loses; if neither side has any, the game ends without a winner.
/// Otherwise the mover wins when the side to move next cannot move.
#[instrument(skip(board))]
pub fn outcome_after(board: &Board, mv: &Move) -> Option<Outcome> {
    if let Some(winner) = captured_flag(mv).or_else(|| flag_reached_goal(mv)) {
        return Some(Outcome::Won(winner));
    }

    let mover = mv.side();
    let opponent = mover.opponent();
    match (board.piece_count(mover), board.piece_count(opponent)) {
        (0, 0) => Some(Outcome::Exhausted),
        (0, _) => Some(Outcome::Won(opponent)),
        _ => is_immobilized(board, opponent).then_some(Outcome::Won(mover)),
    }
}
