//! Partitioning tiles into wall-bounded zones.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::coord::Coord;
use crate::grid::Registry;

/// Validity of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZoneStatus {
    /// No marker, or more than one: nothing to judge yet.
    #[default]
    Undetermined,
    Valid,
    Invalid,
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ZoneStatus::Undetermined => "undetermined",
            ZoneStatus::Valid => "valid",
            ZoneStatus::Invalid => "invalid",
        })
    }
}

/// A maximal set of tiles reachable from one another without crossing a
/// wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Member tiles in ascending order.
    pub tiles: Vec<Coord>,
    pub status: ZoneStatus,
}

impl Zone {
    /// Creates a zone from its members; status starts undetermined.
    pub fn new(mut tiles: Vec<Coord>) -> Self {
        tiles.sort_unstable();
        tiles.dedup();
        Self {
            tiles,
            status: ZoneStatus::Undetermined,
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.tiles.binary_search(&coord).is_ok()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Member tiles that carry a marker.
    pub fn markers(&self, registry: &Registry) -> Vec<Coord> {
        self.tiles
            .iter()
            .copied()
            .filter(|&coord| registry.tile(coord).is_some_and(|tile| tile.has_marker))
            .collect()
    }
}

/// Partitions every tile of the board into zones.
pub fn partition(registry: &Registry) -> Vec<Zone> {
    partition_from(registry, registry.tile_coords())
}

/// Partitions tiles into zones, starting flood fills in the given order.
///
/// The resulting membership does not depend on `order`; zones come back
/// normalized (sorted members, zones ordered by their smallest tile).
/// Coordinates in `order` that are not tiles are ignored.
pub fn partition_from(registry: &Registry, order: &[Coord]) -> Vec<Zone> {
    let mut visited: FxHashSet<Coord> = FxHashSet::default();
    let mut zones = Vec::new();

    for &start in order {
        if registry.tile(start).is_none() || !visited.insert(start) {
            continue;
        }

        let mut members = vec![start];
        let mut frontier = vec![start];
        while let Some(coord) = frontier.pop() {
            let Some(tile) = registry.tile(coord) else {
                continue;
            };
            for (edge_index, neighbor) in tile.neighbors.iter().enumerate() {
                let Some(neighbor) = *neighbor else {
                    continue;
                };
                if registry.is_wall(tile.edges[edge_index]) {
                    continue;
                }
                if visited.insert(neighbor) {
                    members.push(neighbor);
                    frontier.push(neighbor);
                }
            }
        }

        zones.push(Zone::new(members));
    }

    zones.sort_unstable_by_key(|zone| zone.tiles[0]);
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dimensions;
    use crate::grid::Item;
    use proptest::prelude::*;

    fn registry(w: i32, h: i32, d: i32) -> Registry {
        Registry::build(Dimensions::new(w, h, d).unwrap()).unwrap()
    }

    fn wall_off(registry: &mut Registry, tile: Coord) {
        let edges = registry.tile(tile).unwrap().edges.clone();
        for edge in edges {
            registry.set(edge, Item::Wall).unwrap();
        }
    }

    #[test]
    fn test_open_board_is_one_zone() {
        let registry = registry(4, 2, 6);
        let zones = partition(&registry);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].len(), registry.tile_coords().len());
    }

    #[test]
    fn test_walled_tile_is_its_own_zone() {
        let mut registry = registry(2, 2, 2);
        wall_off(&mut registry, Coord::new(1, 1, 0));
        let zones = partition(&registry);
        assert_eq!(zones.len(), 2);
        let single = zones.iter().find(|zone| zone.len() == 1).unwrap();
        assert_eq!(single.tiles, vec![Coord::new(1, 1, 0)]);
        let rest = zones.iter().find(|zone| zone.len() == 5).unwrap();
        assert!(!rest.contains(Coord::new(1, 1, 0)));
    }

    #[test]
    fn test_three_walls_do_not_split() {
        let mut registry = registry(2, 2, 2);
        let edges = registry.tile(Coord::new(1, 1, 0)).unwrap().edges.clone();
        for &edge in &edges[..3] {
            registry.set(edge, Item::Wall).unwrap();
        }
        assert_eq!(partition(&registry).len(), 1);
    }

    #[test]
    fn test_flat_rim_does_not_split() {
        let registry = registry(6, 4, 0);
        let zones = partition(&registry);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].len(), 6);
    }

    #[test]
    fn test_zones_sorted_by_first_tile() {
        let mut registry = registry(6, 2, 0);
        registry.set(Coord::new(2, 1, 0), Item::Wall).unwrap();
        registry.set(Coord::new(4, 1, 0), Item::Wall).unwrap();
        let zones = partition(&registry);
        let firsts: Vec<Coord> = zones.iter().map(|zone| zone.tiles[0]).collect();
        assert_eq!(
            firsts,
            vec![Coord::new(1, 1, 0), Coord::new(3, 1, 0), Coord::new(5, 1, 0)]
        );
    }

    #[test]
    fn test_markers() {
        let mut registry = registry(2, 2, 2);
        registry.tile_mut(Coord::new(1, 1, 2)).unwrap().has_marker = true;
        let zones = partition(&registry);
        assert_eq!(zones[0].markers(&registry), vec![Coord::new(1, 1, 2)]);
    }

    fn order_and_walls() -> impl Strategy<Value = (Vec<Coord>, Vec<Coord>)> {
        let registry = registry(6, 4, 4);
        let tiles = registry.tile_coords().to_vec();
        let edges: Vec<Coord> = registry.dims().positions().filter(Coord::is_edge).collect();
        let count = edges.len();
        (
            Just(tiles).prop_shuffle(),
            proptest::sample::subsequence(edges, 0..count),
        )
    }

    proptest! {
        #[test]
        fn partition_ignores_visit_order((order, walls) in order_and_walls()) {
            let mut registry = registry(6, 4, 4);
            for wall in walls {
                registry.set(wall, Item::Wall).unwrap();
            }
            let sorted = partition(&registry);
            let shuffled = partition_from(&registry, &order);
            prop_assert_eq!(sorted, shuffled);
        }
    }
}
