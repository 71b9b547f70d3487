//! Move generation: where a piece may step from its current tile.

use super::super::board::Board;
use super::super::types::{Side, TileIndex};
use tracing::instrument;

/// Destinations of the piece on `source`, recomputed from the live board.
///
/// Orthogonal neighbours that are empty or hold an opposing piece. An
/// empty source has no destinations.
#[instrument(skip(board))]
pub fn reachable(board: &Board, source: TileIndex) -> Vec<TileIndex> {
    let Some(piece) = board.piece_at(source) else {
        return Vec::new();
    };
    source
        .neighbors()
        .filter(|target| {
            board
                .piece_at(*target)
                .is_none_or(|occupant| occupant.side != piece.side)
        })
        .collect()
}

/// Every `(source, target)` pair the side could play.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board, side: Side) -> Vec<(TileIndex, TileIndex)> {
    board
        .pieces(side)
        .flat_map(|(source, _)| {
            reachable(board, source)
                .into_iter()
                .map(move |target| (source, target))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use crate::types::Piece;

    fn tile(i: usize) -> TileIndex {
        TileIndex::new(i).unwrap()
    }

    #[test]
    fn test_empty_tile_reaches_nothing() {
        assert!(reachable(&Board::new(), tile(10)).is_empty());
    }

    #[test]
    fn test_friendly_neighbours_excluded() {
        let mut board = Board::new();
        board.place(tile(10), Piece::new(Rank::Private, Side::White)).unwrap();
        board.place(tile(11), Piece::new(Rank::Major, Side::White)).unwrap();
        board.place(tile(1), Piece::new(Rank::Major, Side::Black)).unwrap();

        let mut targets: Vec<_> = reachable(&board, tile(10))
            .into_iter()
            .map(TileIndex::index)
            .collect();
        targets.sort();
        assert_eq!(targets, vec![1, 9, 19]);
    }

    #[test]
    fn test_corner_piece() {
        let mut board = Board::new();
        board.place(tile(71), Piece::new(Rank::Flag, Side::Black)).unwrap();
        let mut targets: Vec<_> = reachable(&board, tile(71))
            .into_iter()
            .map(TileIndex::index)
            .collect();
        targets.sort();
        assert_eq!(targets, vec![62, 70]);
    }

    #[test]
    fn test_legal_moves_per_side() {
        let mut board = Board::new();
        board.place(tile(0), Piece::new(Rank::Flag, Side::White)).unwrap();
        board.place(tile(1), Piece::new(Rank::Spy, Side::White)).unwrap();
        board.place(tile(70), Piece::new(Rank::Flag, Side::Black)).unwrap();

        // Flag: 9 only (1 is friendly). Spy: 2 and 10.
        assert_eq!(legal_moves(&board, Side::White).len(), 3);
        assert_eq!(legal_moves(&board, Side::Black).len(), 3);
    }
}
