//! Territory invariant: the board keeps its fixed two-halves partition.

use super::super::game::Game;
use super::Invariant;
use crate::types::{HALF_BOARD, TILE_COUNT};

/// Invariant: tiles are in index order and each carries the territory its
/// index implies, giving two equal contiguous halves.
pub struct TerritoryInvariant;

impl Invariant<Game> for TerritoryInvariant {
    fn holds(game: &Game) -> bool {
        let tiles = game.board().tiles();
        tiles.len() == TILE_COUNT
            && tiles.iter().enumerate().all(|(position, tile)| {
                tile.id().index() == position && tile.territory() == tile.id().territory()
            })
            && tiles
                .iter()
                .filter(|tile| tile.territory() == crate::Side::White)
                .count()
                == HALF_BOARD
    }

    fn description() -> &'static str {
        "Tile territories partition the board into two fixed halves"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardBuilder, Side};

    #[test]
    fn test_new_game_holds() {
        assert!(TerritoryInvariant::holds(&Game::new()));
    }

    #[test]
    fn test_holds_after_layout() {
        let mut game = Game::new();
        game.build(&BoardBuilder::demo()).unwrap();
        game.start(Side::Black).unwrap();
        assert!(TerritoryInvariant::holds(&game));
    }
}
