//! Piece count invariant: occupied tiles match each side's live count.

use super::super::game::Game;
use super::Invariant;
use crate::types::Side;
use strum::IntoEnumIterator;

/// Invariant: for each side, the tiles it occupies equal its live piece count.
///
/// Pieces enter the board only through layout commits and leave only
/// through combat, so any drift means a mutation bypassed the game.
pub struct PieceCountInvariant;

impl Invariant<Game> for PieceCountInvariant {
    fn holds(game: &Game) -> bool {
        Side::iter().all(|side| game.board().piece_count(side) == *game.side_state(side).live())
    }

    fn description() -> &'static str {
        "Occupied tiles per side match live piece counts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, Piece, Rank, TileIndex};

    fn tile(i: usize) -> TileIndex {
        TileIndex::new(i).unwrap()
    }

    fn skirmish() -> Game {
        let mut board = Board::new();
        board.place(tile(10), Piece::new(Rank::Private, Side::White)).unwrap();
        board.place(tile(1), Piece::new(Rank::Sergeant, Side::Black)).unwrap();
        board.place(tile(70), Piece::new(Rank::Flag, Side::Black)).unwrap();
        Game::with_position(board, Side::White).unwrap()
    }

    #[test]
    fn test_fresh_position_holds() {
        assert!(PieceCountInvariant::holds(&skirmish()));
    }

    #[test]
    fn test_combat_keeps_counts_in_step() {
        let mut game = skirmish();
        game.attempt_move(Side::White, tile(10), tile(1)).unwrap();
        assert_eq!(*game.side_state(Side::White).live(), 0);
        assert!(PieceCountInvariant::holds(&game));
    }

    #[test]
    fn test_removed_piece_violates() {
        let mut game = skirmish();
        game.board.remove(tile(70)).unwrap();
        assert!(!PieceCountInvariant::holds(&game));
    }
}
