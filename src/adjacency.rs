//! Tile-to-tile adjacency across edges, including wraparound at box seams.
//!
//! The tile on the far side of an edge is found from the edge itself: of
//! the six positions one step away from an edge midpoint, exactly one other
//! in-bounds face cell exists. For an edge inside a face it lies straight
//! ahead; for an edge on a box seam it lies around the corner on the
//! adjacent face.

use log::warn;

use crate::coord::Coord;
use crate::error::BoardError;
use crate::geometry::Dimensions;
use crate::grid::Registry;

/// Resolves the tile across each of `edges` for the tile at `tile`.
///
/// Returns one entry per edge, in the same order. An edge of a closed box
/// must resolve to exactly one tile; on a flat patch an edge on the rim
/// resolves to `None`.
pub fn compute_neighbors(
    dims: &Dimensions,
    tile: Coord,
    edges: &[Coord],
) -> Result<Vec<Option<Coord>>, BoardError> {
    edges
        .iter()
        .map(|&edge| {
            let candidates: Vec<Coord> = edge
                .surrounding()
                .into_iter()
                .filter(|&c| dims.contains(c) && c.is_tile() && c != tile)
                .collect();
            match candidates.as_slice() {
                [neighbor] => Ok(Some(*neighbor)),
                [] if dims.is_flat() => Ok(None),
                [] => Err(BoardError::DanglingEdge { tile, edge }),
                many => Err(BoardError::AmbiguousEdge {
                    tile,
                    edge,
                    count: many.len(),
                }),
            }
        })
        .collect()
}

/// Fills in the neighbor list of every tile and checks the result.
///
/// On a closed box every tile must end up with four live neighbors, and
/// adjacency must be mutual: the neighbor across an edge lists that same
/// edge among its own.
pub fn resolve(registry: &mut Registry) -> Result<(), BoardError> {
    let dims = registry.dims();

    let mut resolved = Vec::with_capacity(registry.tile_coords().len());
    for tile in registry.tiles() {
        let neighbors = compute_neighbors(&dims, tile.coord, &tile.edges).inspect_err(|err| {
            warn!("board {dims:?} is malformed: {err}");
        })?;
        resolved.push((tile.coord, neighbors));
    }

    for (coord, neighbors) in resolved {
        if let Some(tile) = registry.tile_mut(coord) {
            tile.neighbors = neighbors;
        }
    }

    verify(registry).inspect_err(|err| warn!("board {dims:?} is malformed: {err}"))
}

/// Checks neighbor counts and mutual adjacency for every tile.
fn verify(registry: &Registry) -> Result<(), BoardError> {
    let closed_box = !registry.dims().is_flat();

    for tile in registry.tiles() {
        let live = tile.neighbors.iter().flatten().count();
        if tile.edges.len() != 4 || (closed_box && live != 4) {
            return Err(BoardError::NeighborCount {
                tile: tile.coord,
                found: live,
            });
        }

        for (&edge, neighbor) in tile.edges.iter().zip(&tile.neighbors) {
            let Some(neighbor) = *neighbor else {
                continue;
            };
            let mutual = registry
                .tile(neighbor)
                .is_some_and(|other| other.edge_index(edge).is_some());
            if !mutual {
                return Err(BoardError::OneWayAdjacency {
                    tile: tile.coord,
                    neighbor,
                    edge,
                });
            }
        }
    }

    Ok(())
}
