//! Board builder: validates a proposed initial layout before play.
//!
//! Placements are checked against the board bounds, the piece's home
//! territory, the rank's per-side instance cap and earlier placements in
//! the same build. Committing to a board is a separate step that
//! re-checks occupancy on its own.

use super::board::Board;
use super::rank::Rank;
use super::types::{Piece, Side, TILE_COUNT, TileIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Reasons a placement is rejected, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlacementError {
    /// Raw index outside the board.
    #[display("Tile index {} is out of bounds (0-{})", _0, TILE_COUNT - 1)]
    OutOfBounds(usize),

    /// The tile is in the opponent's half.
    #[display("Tile {tile} is outside {side}'s territory")]
    OutsideTerritory {
        /// Requested tile.
        tile: TileIndex,
        /// Side of the piece.
        side: Side,
    },

    /// The side already fields every allowed instance of the rank.
    #[display("{side} already has every {rank} allowed")]
    InstanceCap {
        /// Rank of the piece.
        rank: Rank,
        /// Side of the piece.
        side: Side,
    },

    /// An earlier placement in this build took the tile.
    #[display("Tile {} is already claimed", _0)]
    TileClaimed(TileIndex),
}

impl std::error::Error for PlacementError {}

/// A piece destined for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Destination tile.
    pub tile: TileIndex,
    /// The piece.
    pub piece: Piece,
}

// White's demo arrangement. Black uses the same one rotated half a turn.
const DEMO_LAYOUT: [(Rank, usize); 21] = [
    (Rank::Flag, 4),
    (Rank::TwoStarGeneral, 11),
    (Rank::LieutenantColonel, 13),
    (Rank::OneStarGeneral, 15),
    (Rank::Private, 16),
    (Rank::SecondLieutenant, 19),
    (Rank::ThreeStarGeneral, 20),
    (Rank::Private, 21),
    (Rank::Colonel, 22),
    (Rank::FourStarGeneral, 23),
    (Rank::Spy, 24),
    (Rank::FirstLieutenant, 25),
    (Rank::Private, 27),
    (Rank::Sergeant, 28),
    (Rank::Captain, 29),
    (Rank::Private, 30),
    (Rank::FiveStarGeneral, 31),
    (Rank::Private, 32),
    (Rank::Major, 33),
    (Rank::Private, 34),
    (Rank::Spy, 35),
];

/// Accumulates a validated layout for one game.
#[derive(Debug, Clone, Default)]
pub struct BoardBuilder {
    placements: Vec<Placement>,
    claimed: HashSet<TileIndex>,
}

impl BoardBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a piece to the layout.
    ///
    /// # Errors
    ///
    /// Checks run in order: bounds, territory, instance cap, vacancy.
    /// The first failing check is returned and the layout is unchanged.
    #[instrument(skip(self))]
    pub fn set_piece(&mut self, tile: usize, piece: Piece) -> Result<(), PlacementError> {
        let tile = TileIndex::new(tile).map_err(|_| PlacementError::OutOfBounds(tile))?;

        if !piece.side.owns_tile(tile) {
            return Err(PlacementError::OutsideTerritory {
                tile,
                side: piece.side,
            });
        }

        if self.count(piece.side, piece.rank) >= piece.rank.max_instances() as usize {
            return Err(PlacementError::InstanceCap {
                rank: piece.rank,
                side: piece.side,
            });
        }

        if self.claimed.contains(&tile) {
            return Err(PlacementError::TileClaimed(tile));
        }

        self.push(tile, piece);
        Ok(())
    }

    fn push(&mut self, tile: TileIndex, piece: Piece) {
        self.claimed.insert(tile);
        self.placements.push(Placement { tile, piece });
    }

    /// Number of placed pieces of a rank for a side.
    pub fn count(&self, side: Side, rank: Rank) -> usize {
        self.placements
            .iter()
            .filter(|p| p.piece.side == side && p.piece.rank == rank)
            .count()
    }

    /// Placements in the order they were accepted.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Returns true once a side fields every rank at its cap.
    pub fn is_side_complete(&self, side: Side) -> bool {
        Rank::iter().all(|rank| self.count(side, rank) == rank.max_instances() as usize)
    }

    /// Returns true once both sides are complete.
    pub fn is_complete(&self) -> bool {
        Side::iter().all(|side| self.is_side_complete(side))
    }

    /// The fixed demo layout for both sides.
    #[instrument]
    pub fn demo() -> Self {
        let mut builder = Self::new();
        for side in Side::iter() {
            for (rank, index) in DEMO_LAYOUT {
                let index = match side {
                    Side::White => index,
                    Side::Black => TILE_COUNT - 1 - index,
                };
                if let Ok(tile) = TileIndex::new(index) {
                    builder.push(tile, Piece::new(rank, side));
                }
            }
        }
        builder
    }

    /// A complete layout with every piece on a uniformly random home tile.
    #[instrument(skip(rng))]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut builder = Self::new();
        for side in Side::iter() {
            builder.fill_side_randomly(side, rng);
        }
        builder
    }

    /// Places every missing piece of `side` on random unclaimed home tiles.
    ///
    /// Tiles are drawn without replacement, so the loop ends after at most
    /// one draw per missing piece.
    #[instrument(skip(self, rng))]
    pub fn fill_side_randomly<R: Rng + ?Sized>(&mut self, side: Side, rng: &mut R) {
        let mut free: Vec<TileIndex> = side
            .home()
            .filter_map(|index| TileIndex::new(index).ok())
            .filter(|tile| !self.claimed.contains(tile))
            .collect();

        for rank in Rank::iter() {
            while self.count(side, rank) < rank.max_instances() as usize {
                if free.is_empty() {
                    debug!(%side, %rank, "No free home tile left");
                    return;
                }
                let tile = free.swap_remove(rng.random_range(0..free.len()));
                self.push(tile, Piece::new(rank, side));
            }
        }
    }

    /// Places the layout onto a board.
    ///
    /// Only empty tiles receive a piece; the rest are dropped. Returns the
    /// number of pieces placed.
    #[instrument(skip(self, board), fields(placements = self.placements.len()))]
    pub fn commit(&self, board: &mut Board) -> usize {
        let mut placed = 0;
        for placement in &self.placements {
            match board.place(placement.tile, placement.piece) {
                Ok(()) => placed += 1,
                Err(e) => debug!(piece = %placement.piece, error = %e, "Placement dropped"),
            }
        }
        info!(placed, "Layout committed");
        placed
    }
}
