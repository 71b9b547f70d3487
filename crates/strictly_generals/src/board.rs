//! The tile board: a fixed, index-addressed collection of 72 tiles.
//!
//! All mutations move pieces by value between tiles. Each operation
//! either fully succeeds or leaves the board untouched.

use super::types::{COLUMNS, Piece, ROWS, Side, TILE_COUNT, Tile, TileIndex};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Errors raised by tile operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// Raw index outside `0..TILE_COUNT`.
    #[display("Tile index {} is out of bounds (0-{})", _0, TILE_COUNT - 1)]
    OutOfBounds(usize),

    /// The tile already holds a piece.
    #[display("Tile {} is already occupied", _0)]
    TileOccupied(TileIndex),

    /// The tile holds no piece.
    #[display("Tile {} is empty", _0)]
    TileEmpty(TileIndex),
}

impl std::error::Error for BoardError {}

/// The 9x8 tile board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Tiles in row-major order.
    tiles: Vec<Tile>,
}

impl Board {
    /// Creates an empty board with fixed territories.
    #[instrument]
    pub fn new() -> Self {
        Self {
            tiles: TileIndex::all().map(Tile::new).collect(),
        }
    }

    /// Returns the tile at a valid index.
    pub fn tile(&self, index: TileIndex) -> &Tile {
        &self.tiles[index.index()]
    }

    /// Returns the tile at a raw index.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if `index >= TILE_COUNT`.
    pub fn tile_at(&self, index: usize) -> Result<&Tile, BoardError> {
        self.tiles.get(index).ok_or(BoardError::OutOfBounds(index))
    }

    /// All tiles in board order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns the piece on a tile.
    pub fn piece_at(&self, index: TileIndex) -> Option<Piece> {
        self.tile(index).occupant()
    }

    /// Checks if a tile is empty.
    pub fn is_empty(&self, index: TileIndex) -> bool {
        self.tile(index).is_empty()
    }

    /// Checks if a tile holds a piece.
    pub fn is_occupied(&self, index: TileIndex) -> bool {
        !self.is_empty(index)
    }

    /// Puts a piece on an empty tile.
    #[instrument(skip(self))]
    pub fn place(&mut self, index: TileIndex, piece: Piece) -> Result<(), BoardError> {
        let tile = &mut self.tiles[index.index()];
        if tile.occupant.is_some() {
            return Err(BoardError::TileOccupied(index));
        }
        tile.occupant = Some(piece);
        Ok(())
    }

    /// Takes the piece off a tile and returns it.
    #[instrument(skip(self))]
    pub fn remove(&mut self, index: TileIndex) -> Result<Piece, BoardError> {
        self.tiles[index.index()]
            .occupant
            .take()
            .ok_or(BoardError::TileEmpty(index))
    }

    /// Substitutes the piece on an occupied tile, returning the old one.
    ///
    /// Never creates occupancy: an empty tile is an error.
    #[instrument(skip(self))]
    pub fn replace(&mut self, index: TileIndex, piece: Piece) -> Result<Piece, BoardError> {
        let tile = &mut self.tiles[index.index()];
        match tile.occupant.replace(piece) {
            Some(previous) => Ok(previous),
            None => {
                tile.occupant = None;
                Err(BoardError::TileEmpty(index))
            }
        }
    }

    /// Moves the piece on `source` to the empty tile `target`.
    #[instrument(skip(self))]
    pub fn relocate(&mut self, source: TileIndex, target: TileIndex) -> Result<(), BoardError> {
        if self.is_empty(source) {
            return Err(BoardError::TileEmpty(source));
        }
        if self.is_occupied(target) {
            return Err(BoardError::TileOccupied(target));
        }
        let piece = self.tiles[source.index()].occupant.take();
        self.tiles[target.index()].occupant = piece;
        trace!(%source, %target, "Piece relocated");
        Ok(())
    }

    /// Exchanges the pieces on two occupied tiles.
    #[instrument(skip(self))]
    pub fn swap(&mut self, a: TileIndex, b: TileIndex) -> Result<(), BoardError> {
        if self.is_empty(a) {
            return Err(BoardError::TileEmpty(a));
        }
        if self.is_empty(b) {
            return Err(BoardError::TileEmpty(b));
        }
        let first = self.tiles[a.index()].occupant;
        self.tiles[a.index()].occupant = self.tiles[b.index()].occupant;
        self.tiles[b.index()].occupant = first;
        Ok(())
    }

    /// Iterates a side's pieces with their tiles.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (TileIndex, Piece)> + '_ {
        self.tiles.iter().filter_map(move |tile| {
            tile.occupant()
                .filter(|piece| piece.side == side)
                .map(|piece| (tile.id(), piece))
        })
    }

    /// Number of tiles occupied by a side.
    pub fn piece_count(&self, side: Side) -> usize {
        self.pieces(side).count()
    }

    /// Number of occupied tiles.
    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_empty()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                let tile = &self.tiles[row * COLUMNS + column];
                match tile.occupant() {
                    Some(piece) => write!(f, "{:>5}", piece.to_string())?,
                    None => write!(f, "{:>5}", ".")?,
                }
            }
            if row + 1 < ROWS {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
