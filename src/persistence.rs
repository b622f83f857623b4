//! Level files.
//!
//! A level is stored as JSON:
//!
//! ```json
//! { "width": 10, "height": 6, "depth": 8,
//!   "markerTiles": [ { "i": 1, "j": 3, "k": 0 } ] }
//! ```
//!
//! Only the bounds and the marker tiles are stored; walls are what the
//! player adds and are never saved. Older files name the marker list
//! `orbTiles`, which is still accepted on load.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::{BoardError, LevelError};
use crate::geometry::Dimensions;

/// The persisted shape of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    #[serde(default, alias = "orbTiles")]
    pub marker_tiles: Vec<Coord>,
}

impl LevelData {
    /// An empty level of the given size.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            depth: dims.depth,
            marker_tiles: Vec::new(),
        }
    }

    /// Validated board dimensions of this level.
    pub fn dims(&self) -> Result<Dimensions, BoardError> {
        Dimensions::new(self.width, self.height, self.depth)
    }

    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reads a level file.
pub fn load(path: impl AsRef<Path>) -> Result<LevelData, LevelError> {
    let path = path.as_ref();
    let level = LevelData::from_json(&fs::read_to_string(path)?)?;
    info!(
        "loaded {} ({}x{}x{}, {} markers)",
        path.display(),
        level.width,
        level.height,
        level.depth,
        level.marker_tiles.len()
    );
    Ok(level)
}

/// Writes a level file, replacing any existing one.
pub fn save(path: impl AsRef<Path>, level: &LevelData) -> Result<(), LevelError> {
    let path = path.as_ref();
    fs::write(path, level.to_json()?)?;
    info!("saved {}", path.display());
    Ok(())
}
