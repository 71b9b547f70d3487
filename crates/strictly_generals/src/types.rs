//! Core domain types: sides, pieces, tile indices and tiles.
//!
//! The board is a 9x8 grid stored in row-major order. Row 0 is the top
//! edge. White's home territory is rows 0-3, Black's is rows 4-7.

use super::board::BoardError;
use super::rank::Rank;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Board width.
pub const COLUMNS: usize = 9;
/// Board height.
pub const ROWS: usize = 8;
/// Number of tiles on the board.
pub const TILE_COUNT: usize = COLUMNS * ROWS;
/// Number of tiles in each side's home territory.
pub const HALF_BOARD: usize = TILE_COUNT / 2;

// ─────────────────────────────────────────────────────────────
//  Side
// ─────────────────────────────────────────────────────────────

/// One of the two opposing sides.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Side {
    /// Home territory is the lower tile indices (rows 0-3).
    White,
    /// Home territory is the upper tile indices (rows 4-7).
    Black,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Tile indices forming this side's home territory.
    pub fn home(self) -> Range<usize> {
        match self {
            Side::White => 0..HALF_BOARD,
            Side::Black => HALF_BOARD..TILE_COUNT,
        }
    }

    /// Returns true if the tile lies in this side's home territory.
    pub fn owns_tile(self, tile: TileIndex) -> bool {
        self.home().contains(&tile.index())
    }

    /// The row farthest from this side's home territory.
    ///
    /// A flag that walks onto this row wins the game.
    pub fn goal_row(self) -> usize {
        match self {
            Side::White => ROWS - 1,
            Side::Black => 0,
        }
    }

    /// Single-character marker used in board renderings.
    pub fn marker(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Piece
// ─────────────────────────────────────────────────────────────

/// A piece: a rank fielded by a side.
///
/// Pieces are plain values. The tile that holds a piece owns it; copies
/// held by moves are snapshots with no board ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Piece kind.
    pub rank: Rank,
    /// Owning side.
    pub side: Side,
}

impl Piece {
    /// Creates a piece.
    pub fn new(rank: Rank, side: Side) -> Self {
        Self { rank, side }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.side.marker(), self.rank.code())
    }
}

// ─────────────────────────────────────────────────────────────
//  Direction
// ─────────────────────────────────────────────────────────────

/// Orthogonal step directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    /// Towards row 0 (index delta -9).
    Up,
    /// Towards the last row (index delta +9).
    Down,
    /// Towards column 0 (index delta -1).
    Left,
    /// Towards the last column (index delta +1).
    Right,
}

// ─────────────────────────────────────────────────────────────
//  TileIndex
// ─────────────────────────────────────────────────────────────

/// Index of a tile, guaranteed to lie in `0..TILE_COUNT`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "usize", into = "usize")]
#[display("{_0}")]
pub struct TileIndex(usize);

impl TileIndex {
    /// Creates a tile index.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfBounds`] if `index >= TILE_COUNT`.
    pub fn new(index: usize) -> Result<Self, BoardError> {
        if index < TILE_COUNT {
            Ok(Self(index))
        } else {
            Err(BoardError::OutOfBounds(index))
        }
    }

    /// Creates a tile index from row and column.
    pub fn at(row: usize, column: usize) -> Result<Self, BoardError> {
        if column >= COLUMNS {
            return Err(BoardError::OutOfBounds(row * COLUMNS + column));
        }
        Self::new(row * COLUMNS + column)
    }

    /// Raw index.
    pub fn index(self) -> usize {
        self.0
    }

    /// Row of this tile (0 is the top edge).
    pub fn row(self) -> usize {
        self.0 / COLUMNS
    }

    /// Column of this tile.
    pub fn column(self) -> usize {
        self.0 % COLUMNS
    }

    /// Side whose home territory contains this tile.
    pub fn territory(self) -> Side {
        if self.0 < HALF_BOARD {
            Side::White
        } else {
            Side::Black
        }
    }

    /// The neighbouring tile in a direction, if it exists.
    ///
    /// Left and right never wrap around to another row.
    pub fn neighbor(self, direction: Direction) -> Option<TileIndex> {
        let index = self.0;
        let next = match direction {
            Direction::Up => index.checked_sub(COLUMNS)?,
            Direction::Down => index + COLUMNS,
            Direction::Left if self.column() > 0 => index - 1,
            Direction::Right if self.column() + 1 < COLUMNS => index + 1,
            Direction::Left | Direction::Right => return None,
        };
        TileIndex::new(next).ok()
    }

    /// All existing orthogonal neighbours.
    pub fn neighbors(self) -> impl Iterator<Item = TileIndex> {
        Direction::iter().filter_map(move |direction| self.neighbor(direction))
    }

    /// Returns true if `other` is an orthogonal neighbour.
    pub fn is_adjacent(self, other: TileIndex) -> bool {
        self.neighbors().any(|n| n == other)
    }

    /// Every tile index in board order.
    pub fn all() -> impl Iterator<Item = TileIndex> {
        (0..TILE_COUNT).map(TileIndex)
    }
}

impl TryFrom<usize> for TileIndex {
    type Error = BoardError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        TileIndex::new(index)
    }
}

impl From<TileIndex> for usize {
    fn from(tile: TileIndex) -> Self {
        tile.0
    }
}

// ─────────────────────────────────────────────────────────────
//  Tile
// ─────────────────────────────────────────────────────────────

/// A board tile. Territory is fixed; occupancy changes during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    id: TileIndex,
    territory: Side,
    pub(crate) occupant: Option<Piece>,
}

impl Tile {
    /// Creates an empty tile; territory follows from the index.
    pub fn new(id: TileIndex) -> Self {
        Self {
            id,
            territory: id.territory(),
            occupant: None,
        }
    }

    /// Tile index.
    pub fn id(&self) -> TileIndex {
        self.id
    }

    /// Home territory this tile belongs to.
    pub fn territory(&self) -> Side {
        self.territory
    }

    /// The piece on this tile, if any.
    pub fn occupant(&self) -> Option<Piece> {
        self.occupant
    }

    /// Returns true if no piece is on this tile.
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}
