//! A board being played or edited.
//!
//! The session owns the registry for one board configuration together with
//! the current zones. Every edit re-partitions and/or re-evaluates before it
//! returns, and observers (renderers, status displays) are told about item
//! changes and the new verdict.

use log::{debug, info};

use crate::coord::{Coord, Feature};
use crate::error::BoardError;
use crate::geometry::Dimensions;
use crate::grid::{Item, Registry};
use crate::persistence::LevelData;
use crate::symmetry;
use crate::zones::{partition, Zone, ZoneStatus};

/// Receives notifications from a [`Session`].
///
/// Observers never feed anything back into the board; all methods have
/// empty defaults so an observer implements only what it needs.
pub trait BoardObserver {
    /// An item appeared at `coord`, or changed and should be redrawn.
    fn item_attached(&mut self, _coord: Coord, _item: &Item) {}

    /// The item at `coord` went away.
    fn item_detached(&mut self, _coord: Coord) {}

    /// Called after every evaluation. `solved` is true iff every zone is
    /// valid.
    fn zones_evaluated(&mut self, _zones: &[Zone], _solved: bool) {}
}

/// What [`Session::resize`] carries over into the rebuilt board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Keep {
    #[default]
    Nothing,
    /// Markers whose tile still exists.
    Markers,
    /// Markers and walls whose positions still exist.
    MarkersAndWalls,
}

/// What [`Session::pick`] did at the picked position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picked {
    /// A wall was placed (`true`) or removed at an edge midpoint.
    Wall(Coord, bool),
    /// A marker was placed (`true`) or removed on a tile.
    Marker(Coord, bool),
    /// Nothing there is editable in the current mode.
    Nothing(Coord),
}

pub struct Session {
    registry: Registry,
    zones: Vec<Zone>,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl Session {
    /// Starts a session on an empty board of the given size.
    pub fn new(dims: Dimensions) -> Result<Self, BoardError> {
        let mut session = Self {
            registry: Registry::build(dims)?,
            zones: Vec::new(),
            observers: Vec::new(),
        };
        session.refresh(true);
        Ok(session)
    }

    /// Rebuilds the board described by a level: tiles, no walls, markers.
    pub fn from_level(level: &LevelData) -> Result<Self, BoardError> {
        let mut session = Self::new(level.dims()?)?;
        for &coord in &level.marker_tiles {
            let tile = session
                .registry
                .tile_mut(coord)
                .ok_or(BoardError::NotATile(coord))?;
            tile.has_marker = true;
        }
        session.refresh(false);
        info!(
            "session started on {:?} with {} markers",
            session.dims(),
            level.marker_tiles.len()
        );
        Ok(session)
    }

    /// The level record for the current board: bounds and marker tiles.
    pub fn to_level(&self) -> LevelData {
        LevelData {
            marker_tiles: self.markers(),
            ..LevelData::new(self.dims())
        }
    }

    /// Registers an observer and replays the current board to it.
    pub fn add_observer(&mut self, mut observer: Box<dyn BoardObserver>) {
        for (coord, item) in self.registry.items() {
            observer.item_attached(coord, item);
        }
        observer.zones_evaluated(&self.zones, self.is_solved());
        self.observers.push(observer);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dims(&self) -> Dimensions {
        self.registry.dims()
    }

    /// Current zones, ordered by their smallest tile.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone_of(&self, tile: Coord) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(tile))
    }

    pub fn status_of(&self, tile: Coord) -> Option<ZoneStatus> {
        self.zone_of(tile).map(|zone| zone.status)
    }

    /// True iff every zone is valid.
    pub fn is_solved(&self) -> bool {
        self.zones
            .iter()
            .all(|zone| zone.status == ZoneStatus::Valid)
    }

    /// Marker tiles in ascending order.
    pub fn markers(&self) -> Vec<Coord> {
        self.registry
            .tiles()
            .filter(|tile| tile.has_marker)
            .map(|tile| tile.coord)
            .collect()
    }

    pub fn walls(&self) -> Vec<Coord> {
        self.registry.walls()
    }

    /// Places a wall at an empty edge midpoint or removes the one there.
    ///
    /// Returns whether a wall is present afterwards.
    pub fn toggle_wall(&mut self, coord: Coord) -> Result<bool, BoardError> {
        if !self.dims().contains(coord) {
            return Err(BoardError::OutOfBounds(coord));
        }
        if !coord.is_edge() {
            return Err(BoardError::NotAnEdge(coord));
        }

        let placed = if self.registry.is_wall(coord) {
            self.registry.remove(coord);
            self.detach(coord);
            false
        } else {
            self.registry.set(coord, Item::Wall)?;
            self.attach(coord);
            true
        };
        debug!("wall at {coord} {}", if placed { "placed" } else { "removed" });

        self.refresh(true);
        Ok(placed)
    }

    /// Flips the marker on a tile. Returns whether it carries one afterwards.
    pub fn toggle_marker(&mut self, coord: Coord) -> Result<bool, BoardError> {
        if !self.dims().contains(coord) {
            return Err(BoardError::OutOfBounds(coord));
        }
        let tile = self
            .registry
            .tile_mut(coord)
            .ok_or(BoardError::NotATile(coord))?;
        tile.has_marker = !tile.has_marker;
        let has_marker = tile.has_marker;
        debug!("marker at {coord} {}", if has_marker { "placed" } else { "removed" });

        // walls are unchanged, so the zones are too
        self.attach(coord);
        self.refresh(false);
        Ok(has_marker)
    }

    /// Edits whatever sits at a host-space position.
    ///
    /// Edge midpoints toggle a wall. Tiles toggle their marker, but only
    /// while `editing`; vertices are never editable.
    pub fn pick(&mut self, position: [f32; 3], editing: bool) -> Result<Picked, BoardError> {
        let coord = self.dims().world_to_coord(position);
        if !self.dims().contains(coord) {
            return Err(BoardError::OutOfBounds(coord));
        }

        match coord.classify() {
            Feature::EdgeMidpoint => Ok(Picked::Wall(coord, self.toggle_wall(coord)?)),
            Feature::FaceCell if editing => Ok(Picked::Marker(coord, self.toggle_marker(coord)?)),
            _ => Ok(Picked::Nothing(coord)),
        }
    }

    /// Rebuilds the board at a new size.
    ///
    /// Walls and markers are discarded unless `keep` says otherwise; kept
    /// ones are only carried over where their position still exists. On
    /// error the session is left unchanged.
    pub fn resize(&mut self, dims: Dimensions, keep: Keep) -> Result<(), BoardError> {
        let mut registry = Registry::build(dims)?;

        if keep != Keep::Nothing {
            for coord in self.markers() {
                if let Some(tile) = registry.tile_mut(coord) {
                    tile.has_marker = true;
                }
            }
        }
        if keep == Keep::MarkersAndWalls {
            for coord in self.walls() {
                if dims.contains(coord) {
                    registry.set(coord, Item::Wall)?;
                }
            }
        }

        let old_coords: Vec<Coord> = self.registry.items().iter().map(|&(c, _)| c).collect();
        for coord in old_coords {
            self.detach(coord);
        }
        self.registry = registry;
        let new_coords: Vec<Coord> = self.registry.items().iter().map(|&(c, _)| c).collect();
        for coord in new_coords {
            self.attach(coord);
        }

        info!("board resized to {dims:?} (keeping {keep:?})");
        self.refresh(true);
        Ok(())
    }

    fn attach(&mut self, coord: Coord) {
        if let Some(item) = self.registry.get(coord) {
            for observer in &mut self.observers {
                observer.item_attached(coord, item);
            }
        }
    }

    fn detach(&mut self, coord: Coord) {
        for observer in &mut self.observers {
            observer.item_detached(coord);
        }
    }

    /// Re-evaluates every zone, re-partitioning first if walls changed.
    fn refresh(&mut self, repartition: bool) {
        if repartition {
            self.zones = partition(&self.registry);
        }

        for zone in &mut self.zones {
            zone.status = symmetry::evaluate(&self.registry, zone);
        }
        for zone in &self.zones {
            for &coord in &zone.tiles {
                if let Some(tile) = self.registry.tile_mut(coord) {
                    tile.status = zone.status;
                }
            }
        }

        let solved = self.is_solved();
        debug!(
            "evaluated {} zones ({} valid), solved: {solved}",
            self.zones.len(),
            self.zones
                .iter()
                .filter(|zone| zone.status == ZoneStatus::Valid)
                .count()
        );
        for observer in &mut self.observers {
            observer.zones_evaluated(&self.zones, solved);
        }
    }
}
