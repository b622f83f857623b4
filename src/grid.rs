//! Sparse storage of board items keyed by lattice coordinate.
//!
//! Face cells always hold a [`Tile`], in-bounds vertices hold a decorative
//! pole, and an edge midpoint holds a wall only while one is placed.

use rustc_hash::FxHashMap;

use crate::adjacency;
use crate::coord::{Axis, Coord, Feature};
use crate::error::BoardError;
use crate::geometry::Dimensions;
use crate::zones::ZoneStatus;

/// Purely visual items that the validity engine never inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// Corner post at a vertex.
    Pole,
}

/// A face cell of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub coord: Coord,
    /// Edge midpoints in rotational order (see [`Dimensions::derive_edges`]).
    pub edges: Vec<Coord>,
    /// Tile across each edge, same order as `edges`. `None` only for the
    /// outer rim of a flat patch.
    pub neighbors: Vec<Option<Coord>>,
    pub has_marker: bool,
    /// Status of the zone this tile belonged to at the last evaluation.
    pub status: ZoneStatus,
}

impl Tile {
    fn new(coord: Coord, edges: Vec<Coord>) -> Self {
        Self {
            coord,
            edges,
            neighbors: Vec::new(),
            has_marker: false,
            status: ZoneStatus::Undetermined,
        }
    }

    /// Position of `edge` in this tile's rotational order.
    pub fn edge_index(&self, edge: Coord) -> Option<usize> {
        self.edges.iter().position(|&e| e == edge)
    }
}

/// Everything that can occupy a lattice position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Tile(Tile),
    Wall,
    Decorative(Decoration),
}

impl Item {
    fn name(&self) -> &'static str {
        match self {
            Item::Tile(_) => "a tile",
            Item::Wall => "a wall",
            Item::Decorative(_) => "a decoration",
        }
    }

    /// Whether this item may live at a position of the given feature kind.
    fn fits(&self, feature: Feature) -> bool {
        match self {
            Item::Tile(_) => feature == Feature::FaceCell,
            Item::Wall => feature == Feature::EdgeMidpoint,
            Item::Decorative(_) => matches!(feature, Feature::Vertex | Feature::CellCenter),
        }
    }
}

/// Owns every item of one board configuration.
#[derive(Debug, Clone)]
pub struct Registry {
    dims: Dimensions,
    items: FxHashMap<Coord, Item>,
    /// Tile coordinates in ascending order, for deterministic iteration.
    tile_coords: Vec<Coord>,
}

impl Registry {
    /// Builds a board with a tile on every face cell and no walls, then
    /// resolves adjacency. Fails if the geometry produces a malformed board.
    pub fn build(dims: Dimensions) -> Result<Self, BoardError> {
        let mut registry = Self {
            dims,
            items: FxHashMap::default(),
            tile_coords: Vec::new(),
        };

        for coord in dims.positions() {
            match coord.classify() {
                Feature::FaceCell => {
                    let tile = Tile::new(coord, dims.derive_edges(coord));
                    registry.set(coord, Item::Tile(tile))?;
                }
                Feature::Vertex => {
                    registry.set(coord, Item::Decorative(Decoration::Pole))?;
                }
                Feature::EdgeMidpoint | Feature::CellCenter => {}
            }
        }
        registry.tile_coords.sort_unstable();

        adjacency::resolve(&mut registry)?;
        Ok(registry)
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn get(&self, coord: Coord) -> Option<&Item> {
        self.items.get(&coord)
    }

    /// Places `item` at `coord`, returning whatever was there before.
    ///
    /// Rejects out-of-bounds coordinates and items that do not match the
    /// position's feature kind.
    pub fn set(&mut self, coord: Coord, item: Item) -> Result<Option<Item>, BoardError> {
        if !self.dims.contains(coord) {
            return Err(BoardError::OutOfBounds(coord));
        }
        let feature = coord.classify();
        if !item.fits(feature) {
            return Err(BoardError::MisplacedItem {
                coord,
                item: item.name(),
                found: feature,
            });
        }
        if matches!(item, Item::Tile(_)) && !self.items.contains_key(&coord) {
            self.tile_coords.push(coord);
        }
        Ok(self.items.insert(coord, item))
    }

    /// Removes and returns the item at `coord`.
    pub fn remove(&mut self, coord: Coord) -> Option<Item> {
        let removed = self.items.remove(&coord);
        if matches!(removed, Some(Item::Tile(_))) {
            self.tile_coords.retain(|&c| c != coord);
        }
        removed
    }

    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        match self.items.get(&coord) {
            Some(Item::Tile(tile)) => Some(tile),
            _ => None,
        }
    }

    pub fn tile_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        match self.items.get_mut(&coord) {
            Some(Item::Tile(tile)) => Some(tile),
            _ => None,
        }
    }

    pub fn is_wall(&self, coord: Coord) -> bool {
        matches!(self.items.get(&coord), Some(Item::Wall))
    }

    /// Tile coordinates in ascending order.
    pub fn tile_coords(&self) -> &[Coord] {
        &self.tile_coords
    }

    /// Tiles in ascending coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tile_coords.iter().filter_map(|&coord| self.tile(coord))
    }

    /// Wall coordinates in ascending order.
    pub fn walls(&self) -> Vec<Coord> {
        let mut walls: Vec<Coord> = self
            .items
            .iter()
            .filter(|(_, item)| matches!(item, Item::Wall))
            .map(|(&coord, _)| coord)
            .collect();
        walls.sort_unstable();
        walls
    }

    /// Every item with its coordinate, in ascending coordinate order.
    pub fn items(&self) -> Vec<(Coord, &Item)> {
        let mut items: Vec<(Coord, &Item)> =
            self.items.iter().map(|(&coord, item)| (coord, item)).collect();
        items.sort_unstable_by_key(|&(coord, _)| coord);
        items
    }

    /// True if crossing edge `edge_index` of `tile` is blocked, either by a
    /// wall or because the edge is on the rim of a flat patch. An index the
    /// tile has no edge for counts as blocked.
    pub fn is_closed(&self, tile: &Tile, edge_index: usize) -> bool {
        match (tile.edges.get(edge_index), tile.neighbors.get(edge_index)) {
            (Some(&edge), Some(Some(_))) => self.is_wall(edge),
            _ => true,
        }
    }
}

/// Face planes in display order, as (normal axis, value on that axis).
fn faces(dims: Dimensions) -> Vec<(Axis, i32)> {
    let mut faces = Vec::new();
    for axis in [Axis::K, Axis::J, Axis::I] {
        let max = dims.max(axis);
        let (row_axis, col_axis) = face_axes(axis);
        // a face needs extent along both in-plane axes to hold tiles
        if dims.max(row_axis) == 0 || dims.max(col_axis) == 0 {
            continue;
        }
        faces.push((axis, 0));
        if max != 0 {
            faces.push((axis, max));
        }
    }
    faces
}

/// In-plane axes of a face as (column axis, row axis).
fn face_axes(normal: Axis) -> (Axis, Axis) {
    match normal {
        Axis::I => (Axis::J, Axis::K),
        Axis::J => (Axis::I, Axis::K),
        Axis::K => (Axis::I, Axis::J),
    }
}

fn axis_name(axis: Axis) -> char {
    match axis {
        Axis::I => 'i',
        Axis::J => 'j',
        Axis::K => 'k',
    }
}

/// Formats every face of the board as ASCII art.
///
/// Rows run from the top of the face down. `+` is a vertex, `-` and `|`
/// are closed edges (walls, or the rim of a flat patch), `@` is a marker
/// tile and other tiles show their zone status: `v` valid, `x` invalid,
/// `.` undetermined.
pub fn format_board(registry: &Registry) -> String {
    let dims = registry.dims();
    let mut output = String::new();

    for (normal, value) in faces(dims) {
        let (col_axis, row_axis) = face_axes(normal);
        output.push_str(&format!("face {}={}\n", axis_name(normal), value));

        for row in (0..=dims.max(row_axis)).rev() {
            for col in 0..=dims.max(col_axis) {
                let coord = Coord::new(0, 0, 0)
                    .with(normal, value)
                    .with(col_axis, col)
                    .with(row_axis, row);
                output.push(cell_char(registry, coord, col % 2 != 0));
            }
            output.push('\n');
        }
    }

    output
}

fn cell_char(registry: &Registry, coord: Coord, odd_column: bool) -> char {
    match coord.classify() {
        Feature::FaceCell => match registry.tile(coord) {
            Some(tile) if tile.has_marker => '@',
            Some(tile) => match tile.status {
                ZoneStatus::Valid => 'v',
                ZoneStatus::Invalid => 'x',
                ZoneStatus::Undetermined => '.',
            },
            None => '?',
        },
        Feature::EdgeMidpoint => {
            if edge_is_closed(registry, coord) {
                if odd_column {
                    '-'
                } else {
                    '|'
                }
            } else {
                ' '
            }
        }
        Feature::Vertex | Feature::CellCenter => '+',
    }
}

/// An edge is drawn closed if it carries a wall or borders no tile.
fn edge_is_closed(registry: &Registry, edge: Coord) -> bool {
    if registry.is_wall(edge) {
        return true;
    }
    let bordering = edge
        .surrounding()
        .into_iter()
        .filter(|&c| registry.tile(c).is_some())
        .count();
    bordering < 2
}
