//! Board bounds and per-tile edge derivation.
//!
//! The board is the hollow surface of a `width x height x depth` box in
//! doubled coordinates: vertices sit at even positions from 0 to the
//! dimension, so every dimension is even. A dimension of zero collapses
//! the box into a single-sided flat patch.

use crate::coord::{Axis, Coord};
use crate::error::BoardError;

/// Extents of the box along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Dimensions {
    /// Validates and creates board dimensions.
    ///
    /// Each dimension must be even and non-negative, and at most one of
    /// them may be zero.
    pub fn new(width: i32, height: i32, depth: i32) -> Result<Self, BoardError> {
        let invalid = |reason| BoardError::InvalidDimensions {
            width,
            height,
            depth,
            reason,
        };
        let dims = [width, height, depth];
        if dims.iter().any(|&d| d < 0) {
            return Err(invalid("dimensions must be non-negative"));
        }
        if dims.iter().any(|&d| d % 2 != 0) {
            return Err(invalid("dimensions must be even"));
        }
        if dims.iter().filter(|&&d| d == 0).count() > 1 {
            return Err(invalid("at most one dimension may be zero"));
        }
        Ok(Self {
            width,
            height,
            depth,
        })
    }

    /// Largest valid component along `axis`.
    #[inline]
    pub const fn max(&self, axis: Axis) -> i32 {
        match axis {
            Axis::I => self.width,
            Axis::J => self.height,
            Axis::K => self.depth,
        }
    }

    /// True for a flat patch (one zero dimension) rather than a closed box.
    pub fn is_flat(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }

    /// Returns true if `coord` lies on the box surface.
    ///
    /// All components must be within `0..=dim`, and at least one of them
    /// must sit on a boundary plane; the interior of the box is never part
    /// of the board.
    pub fn contains(&self, coord: Coord) -> bool {
        let within = Axis::ALL
            .iter()
            .all(|&axis| (0..=self.max(axis)).contains(&coord.get(axis)));
        let on_surface = Axis::ALL.iter().any(|&axis| {
            let value = coord.get(axis);
            value == 0 || value == self.max(axis)
        });
        within && on_surface
    }

    /// Whether the edge list of `tile` is stored in reversed order.
    ///
    /// Tiles on the `i == width`, `j == height` and `k == 0` faces are
    /// reversed. Combined with the canonical direction order this gives
    /// every i-face one rotational sense and every j- and k-face the
    /// other (viewed from outside the box). A half-turn about a face axis
    /// maps each face onto a face of the same axis class, so the
    /// symmetry check only needs handedness to agree within a class.
    pub fn reverses_edges(&self, tile: Coord) -> bool {
        tile.i == self.width || tile.j == self.height || tile.k == 0
    }

    /// Derives the edges of a tile in rotational order.
    ///
    /// Starts from the six surrounding positions in canonical order
    /// (-i, -j, -k, +i, +j, +k), keeps the in-bounds ones, and reverses
    /// the result for tiles where [`Self::reverses_edges`] holds. On a
    /// well-formed board this yields four edges with opposite edges at
    /// indices (0, 2) and (1, 3).
    pub fn derive_edges(&self, tile: Coord) -> Vec<Coord> {
        let mut edges: Vec<Coord> = tile
            .surrounding()
            .into_iter()
            .filter(|&edge| self.contains(edge))
            .collect();
        if self.reverses_edges(tile) {
            edges.reverse();
        }
        edges
    }

    /// The axis a tile's face is perpendicular to (its even component).
    pub fn normal_axis(&self, tile: Coord) -> Option<Axis> {
        if !tile.is_tile() {
            return None;
        }
        Axis::ALL.iter().copied().find(|&axis| tile.get(axis) % 2 == 0)
    }

    /// Iterates over every in-bounds lattice position in `i, j, k` order.
    pub fn positions(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..=self.width).flat_map(move |i| {
            (0..=self.height).flat_map(move |j| {
                (0..=self.depth)
                    .map(move |k| Coord::new(i, j, k))
                    .filter(move |&coord| self.contains(coord))
            })
        })
    }

    /// Converts a host-space position into the nearest lattice coordinate.
    ///
    /// The box is centred on the origin in host space, so each component is
    /// offset by half the board extent on its axis before rounding. The
    /// result may be out of bounds; callers check with [`Self::contains`].
    pub fn world_to_coord(&self, position: [f32; 3]) -> Coord {
        let [x, y, z] = position;
        Coord::new(
            (x + self.width as f32 * 0.5).round() as i32,
            (y + self.height as f32 * 0.5).round() as i32,
            (z + self.depth as f32 * 0.5).round() as i32,
        )
    }

    /// Inverse of [`Self::world_to_coord`] for lattice positions.
    pub fn coord_to_world(&self, coord: Coord) -> [f32; 3] {
        [
            coord.i as f32 - self.width as f32 * 0.5,
            coord.j as f32 - self.height as f32 * 0.5,
            coord.k as f32 - self.depth as f32 * 0.5,
        ]
    }
}
