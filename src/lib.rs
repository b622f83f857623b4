//! Galaxies puzzle engine
//!
//! The board is the surface of a box (or a single flat patch) divided into
//! square tiles. The player draws walls along tile edges; walls partition
//! the tiles into zones, and the puzzle is solved when every zone holds
//! exactly one marker tile and is symmetric under a half-turn about it.
//!
//! All positions live on a doubled integer lattice (see [`coord`]), so
//! vertices, edge midpoints and tile centers share one coordinate type.

pub mod adjacency;
pub mod coord;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod session;
pub mod symmetry;
pub mod zones;

pub use coord::{Axis, Coord, Feature};
pub use error::{BoardError, LevelError, ParseCoordError};
pub use geometry::Dimensions;
pub use grid::{Item, Registry, Tile};
pub use persistence::LevelData;
pub use session::{BoardObserver, Keep, Picked, Session};
pub use zones::{Zone, ZoneStatus};
