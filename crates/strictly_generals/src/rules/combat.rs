//! Combat arbitration between an attacking and a defending piece.

use super::super::action::MoveKind;
use super::super::rank::Rank;
use super::super::types::Piece;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

/// Result of one piece challenging another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engagement {
    /// The defender is eliminated; the attacker takes its tile.
    AttackerWins,
    /// The attacker is eliminated; the defender stays put.
    DefenderWins,
    /// Both pieces are eliminated.
    Draw,
}

/// Decides a challenge between two ranks.
///
/// Higher power wins and equal power draws, except that a private always
/// beats a spy and a flag attacking a flag captures it.
#[instrument]
pub fn engage(attacker: Rank, defender: Rank) -> Engagement {
    match (attacker, defender) {
        (Rank::Flag, Rank::Flag) => Engagement::AttackerWins,
        (Rank::Spy, Rank::Private) => Engagement::DefenderWins,
        (Rank::Private, Rank::Spy) => Engagement::AttackerWins,
        _ => match attacker.power().cmp(&defender.power()) {
            Ordering::Greater => Engagement::AttackerWins,
            Ordering::Less => Engagement::DefenderWins,
            Ordering::Equal => Engagement::Draw,
        },
    }
}

/// Classifies a move by what stands on its target tile.
pub fn classify(attacker: Piece, defender: Option<Piece>) -> (MoveKind, Option<Engagement>) {
    match defender {
        None => (MoveKind::Normal, None),
        Some(defender) if defender.side == attacker.side => (MoveKind::Invalid, None),
        Some(defender) => match engage(attacker.rank, defender.rank) {
            Engagement::Draw => (MoveKind::Draw, Some(Engagement::Draw)),
            outcome => (MoveKind::Aggressive, Some(outcome)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use strum::IntoEnumIterator;

    #[test]
    fn test_higher_power_wins() {
        assert_eq!(engage(Rank::Sergeant, Rank::Private), Engagement::AttackerWins);
        assert_eq!(engage(Rank::Private, Rank::Sergeant), Engagement::DefenderWins);
        assert_eq!(
            engage(Rank::FiveStarGeneral, Rank::FourStarGeneral),
            Engagement::AttackerWins
        );
    }

    #[test]
    fn test_equal_ranks_draw() {
        for rank in Rank::iter().filter(|r| *r != Rank::Flag) {
            assert_eq!(engage(rank, rank), Engagement::Draw, "{rank} vs {rank}");
        }
    }

    #[test]
    fn test_private_beats_spy_both_directions() {
        assert_eq!(engage(Rank::Spy, Rank::Private), Engagement::DefenderWins);
        assert_eq!(engage(Rank::Private, Rank::Spy), Engagement::AttackerWins);
    }

    #[test]
    fn test_spy_beats_every_officer() {
        for rank in Rank::iter().filter(|r| !matches!(r, Rank::Private | Rank::Spy)) {
            assert_eq!(engage(Rank::Spy, rank), Engagement::AttackerWins, "spy vs {rank}");
            assert_eq!(engage(rank, Rank::Spy), Engagement::DefenderWins, "{rank} vs spy");
        }
    }

    #[test]
    fn test_flag_loses_to_any_attacker() {
        for rank in Rank::iter() {
            assert_eq!(engage(rank, Rank::Flag), Engagement::AttackerWins, "{rank} vs flag");
        }
    }

    #[test]
    fn test_attacking_flag_loses_to_non_flags() {
        for rank in Rank::iter().filter(|r| *r != Rank::Flag) {
            assert_eq!(engage(Rank::Flag, rank), Engagement::DefenderWins, "flag vs {rank}");
        }
    }

    #[test]
    fn test_classify() {
        let white = Piece::new(Rank::Major, Side::White);
        assert_eq!(classify(white, None), (MoveKind::Normal, None));
        assert_eq!(
            classify(white, Some(Piece::new(Rank::Captain, Side::White))),
            (MoveKind::Invalid, None)
        );
        assert_eq!(
            classify(white, Some(Piece::new(Rank::Captain, Side::Black))),
            (MoveKind::Aggressive, Some(Engagement::AttackerWins))
        );
        assert_eq!(
            classify(white, Some(Piece::new(Rank::Colonel, Side::Black))),
            (MoveKind::Aggressive, Some(Engagement::DefenderWins))
        );
        assert_eq!(
            classify(white, Some(Piece::new(Rank::Major, Side::Black))),
            (MoveKind::Draw, Some(Engagement::Draw))
        );
    }
}
