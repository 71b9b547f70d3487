//! First-class invariants for the generals game.
//!
//! Invariants are logical properties that must hold after every mutating
//! operation. They are checked in debug builds and can be tested
//! independently.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

pub mod history_consistent;
pub mod piece_count;
pub mod territory;

pub use history_consistent::HistoryConsistentInvariant;
pub use piece_count::PieceCountInvariant;
pub use territory::TerritoryInvariant;

/// All game invariants as a composable set.
pub type GeneralsInvariants = (
    PieceCountInvariant,
    TerritoryInvariant,
    HistoryConsistentInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardBuilder, Game, Piece, Rank, Side, TileIndex};

    fn tile(i: usize) -> TileIndex {
        TileIndex::new(i).unwrap()
    }

    fn demo_game() -> Game {
        let mut game = Game::new();
        game.build(&BoardBuilder::demo()).unwrap();
        game.start(Side::White).unwrap();
        game
    }

    #[test]
    fn test_invariant_set_holds_for_new_game() {
        assert!(GeneralsInvariants::check_all(&Game::new()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut game = demo_game();
        // White private takes the facing spy, then a black private runs
        // into the white sergeant and loses.
        game.attempt_move(Side::White, tile(27), tile(36)).unwrap();
        game.attempt_move(Side::Black, tile(37), tile(28)).unwrap();
        assert!(GeneralsInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut game = demo_game();
        game.board
            .place(tile(0), Piece::new(Rank::Major, Side::White))
            .unwrap();

        let violations = GeneralsInvariants::check_all(&game).unwrap_err();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (PieceCountInvariant, TerritoryInvariant);
        assert!(TwoInvariants::check_all(&demo_game()).is_ok());
    }
}
