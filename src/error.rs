//! Error types for board construction, edits and level files.

use crate::coord::{Coord, Feature};

/// Errors raised while building a board or applying an edit to it.
///
/// The construction variants (`DanglingEdge`, `AmbiguousEdge`,
/// `NeighborCount`, `OneWayAdjacency`, `MisplacedItem`) mean the board is
/// malformed; no session is created from such a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board dimensions {width}x{height}x{depth}: {reason}")]
    InvalidDimensions {
        width: i32,
        height: i32,
        depth: i32,
        reason: &'static str,
    },
    #[error("coordinate {0} is outside the board")]
    OutOfBounds(Coord),
    #[error("coordinate {0} is not an edge midpoint")]
    NotAnEdge(Coord),
    #[error("coordinate {0} is not a tile")]
    NotATile(Coord),
    #[error("cannot place {item} at {coord}, which is a {found:?} position")]
    MisplacedItem {
        coord: Coord,
        item: &'static str,
        found: Feature,
    },
    #[error("edge {edge} of tile {tile} has no tile beyond it")]
    DanglingEdge { tile: Coord, edge: Coord },
    #[error("edge {edge} of tile {tile} touches {count} other tiles")]
    AmbiguousEdge {
        tile: Coord,
        edge: Coord,
        count: usize,
    },
    #[error("tile {tile} has {found} neighbors, expected 4")]
    NeighborCount { tile: Coord, found: usize },
    #[error("tile {tile} sees {neighbor} across {edge}, but not the other way round")]
    OneWayAdjacency {
        tile: Coord,
        neighbor: Coord,
        edge: Coord,
    },
}

/// Errors raised while reading or writing level files.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("level file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level data: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors raised when parsing an `i,j,k` coordinate from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCoordError {
    #[error("expected three comma-separated components in {input:?}, found {found}")]
    Arity { input: String, found: usize },
    #[error("bad component in {input:?}: {source}")]
    Component {
        input: String,
        source: std::num::ParseIntError,
    },
}
