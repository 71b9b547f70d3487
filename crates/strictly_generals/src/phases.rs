//! Lifecycle phases of a game.

use serde::{Deserialize, Serialize};

/// Where a game is in its lifecycle.
///
/// Transitions only move forward:
/// `Initializing -> Arranging -> InProgress -> Concluded`.
/// Restarting replaces the whole game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Phase {
    /// Empty board, waiting for a layout.
    Initializing,
    /// Layout committed; pieces may be swapped or moved within territory.
    Arranging,
    /// Sides alternate moves.
    InProgress,
    /// A winner has been decided.
    Concluded,
}

impl Phase {
    /// Returns true if moves may be submitted.
    pub fn accepts_moves(self) -> bool {
        self == Phase::InProgress
    }

    /// Returns true once the game has ended.
    pub fn is_over(self) -> bool {
        self == Phase::Concluded
    }
}
