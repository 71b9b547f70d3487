//! History consistency invariant: recorded moves agree with the turn counter.

use super::super::game::Game;
use super::Invariant;
use crate::types::Side;
use strum::IntoEnumIterator;

/// Invariant: every recorded move was executed by its side, turn ids
/// increase strictly, each side's turn counter equals its history length
/// and the latest recorded turn is the game's last executed turn.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let per_side = Side::iter().all(|side| {
            let state = game.side_state(side);
            let history = state.history();
            *state.turns() as usize == history.len()
                && history.iter().all(|mv| mv.executed() && mv.side() == side)
                && history.windows(2).all(|pair| pair[0].turn() < pair[1].turn())
        });

        let latest = game.history().last().map(|mv| mv.turn());
        per_side && latest == game.last_executed_turn()
    }

    fn description() -> &'static str {
        "History matches turn counters and last executed turn"
    }
}
