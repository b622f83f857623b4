//! Half-turn symmetry check of a zone around its marker.
//!
//! A zone is valid when a 180° rotation about its marker tile maps the zone
//! onto itself, walls included. Rather than transforming coordinates (which
//! breaks down across box seams), the check walks outward from the marker
//! in lockstep along two mirrored paths. Each step compares the local wall
//! layout of the two tiles reached (their footprints) and records them as a
//! matched pair. Every tile of a valid zone ends up matched exactly once,
//! and a tile reached again must meet the same partner through the facing
//! edge. The walk keeps its pending crossings on an explicit stack, so its
//! depth does not grow with the size of the zone.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::coord::Coord;
use crate::grid::{Registry, Tile};
use crate::zones::{Zone, ZoneStatus};

/// Open/closed state of a tile's three other edges, read in rotational order
/// starting just after a reference edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint([bool; 3]);

impl Footprint {
    /// Whether the edge `position + 1` steps after the reference is open.
    pub fn is_open(&self, position: usize) -> bool {
        self.0[position]
    }
}

impl fmt::Display for Footprint {
    /// Renders as three characters, `1` for open and `0` for closed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for open in self.0 {
            f.write_str(if open { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Every tile of a well-formed board has four edges.
const EDGES_PER_TILE: usize = 4;

/// Computes the footprint of `tile` relative to its edge at `edge_index`.
pub fn footprint(registry: &Registry, tile: &Tile, edge_index: usize) -> Footprint {
    let count = tile.edges.len();
    Footprint(std::array::from_fn(|position| {
        count > 0 && !registry.is_closed(tile, (edge_index + position + 1) % count)
    }))
}

/// Tiles matched so far.
///
/// Each tile maps to its image under the half-turn together with the shift
/// between their edge orders: edge `n` of the tile faces edge `n + shift`
/// of its image.
#[derive(Debug, Clone, Default)]
pub struct Pairing(FxHashMap<Coord, (Coord, usize)>);

impl Pairing {
    /// Records `a` and `b` as images of each other, edge `n` of `a` facing
    /// edge `n + shift` of `b`.
    pub fn pair(mut self, a: Coord, b: Coord, shift: usize) -> Self {
        let shift = shift % EDGES_PER_TILE;
        self.0.insert(a, (b, shift));
        self.0.insert(b, (a, (EDGES_PER_TILE - shift) % EDGES_PER_TILE));
        self
    }

    pub fn partner(&self, coord: Coord) -> Option<Coord> {
        self.0.get(&coord).map(|&(partner, _)| partner)
    }

    /// Whether `a` was matched with `b` such that edge `index_a` of `a`
    /// faces edge `index_b` of `b`.
    pub fn aligned(&self, a: Coord, index_a: usize, b: Coord, index_b: usize) -> bool {
        self.0.get(&a).is_some_and(|&(partner, shift)| {
            partner == b && (index_a + shift) % EDGES_PER_TILE == index_b % EDGES_PER_TILE
        })
    }

    /// Whether every tile of `zone` has been matched.
    pub fn covers(&self, zone: &Zone) -> bool {
        zone.tiles.iter().all(|coord| self.0.contains_key(coord))
    }
}

/// Edge `index_a` of tile `a` and edge `index_b` of tile `b`, crossed in
/// lockstep.
type Crossing = (Coord, usize, Coord, usize);

/// Determines the status of one zone.
///
/// Zones without exactly one marker are undetermined. Otherwise the
/// marker's opposite edges must agree on being open or closed, the tiles
/// across each open opposite pair must be symmetric, and the walk from the
/// marker must match every tile of the zone.
pub fn evaluate(registry: &Registry, zone: &Zone) -> ZoneStatus {
    let markers = zone.markers(registry);
    let [center] = markers.as_slice() else {
        return ZoneStatus::Undetermined;
    };
    let Some(center) = registry.tile(*center) else {
        return ZoneStatus::Invalid;
    };
    if center.edges.len() != EDGES_PER_TILE {
        return ZoneStatus::Invalid;
    }

    let closed = |edge_index| registry.is_closed(center, edge_index);
    if closed(0) != closed(2) || closed(1) != closed(3) {
        return ZoneStatus::Invalid;
    }

    // the half-turn maps the marker onto itself with opposite edges swapped
    let pairing = Pairing::default().pair(center.coord, center.coord, 2);
    let pending = [(1, 3), (0, 2)]
        .into_iter()
        .filter(|&(edge_a, _)| !closed(edge_a))
        .map(|(edge_a, edge_b)| (center.coord, edge_a, center.coord, edge_b))
        .collect();

    match walk(registry, zone, pairing, pending) {
        Some(pairing) if pairing.covers(zone) => ZoneStatus::Valid,
        _ => ZoneStatus::Invalid,
    }
}

/// Checks that `a` (entered through `edge_a`) and `b` (entered through
/// `edge_b`) are images of each other under the half-turn.
///
/// Their footprints relative to the entry edges must match, and for every
/// open footprint position the tiles beyond must in turn be symmetric.
/// `pairing` must already contain `a` and `b`; on success the returned
/// pairing extends it with every tile matched beyond this pair.
pub fn symmetric(
    registry: &Registry,
    zone: &Zone,
    a: &Tile,
    edge_a: Coord,
    b: &Tile,
    edge_b: Coord,
    pairing: Pairing,
) -> Option<Pairing> {
    let mut pending = Vec::new();
    expand(registry, a, edge_a, b, edge_b, &mut pending)?;
    walk(registry, zone, pairing, pending)
}

/// Compares the footprints of `a` and `b` relative to their entry edges and
/// queues a crossing for every open position.
fn expand(
    registry: &Registry,
    a: &Tile,
    edge_a: Coord,
    b: &Tile,
    edge_b: Coord,
    pending: &mut Vec<Crossing>,
) -> Option<()> {
    let index_a = a.edge_index(edge_a)?;
    let index_b = b.edge_index(edge_b)?;
    let print = footprint(registry, a, index_a);
    if print != footprint(registry, b, index_b) {
        return None;
    }

    // pushed last to first so the first open position is crossed first
    for offset in (1..=3).rev().filter(|&offset| print.is_open(offset - 1)) {
        pending.push((
            a.coord,
            (index_a + offset) % a.edges.len(),
            b.coord,
            (index_b + offset) % b.edges.len(),
        ));
    }
    Some(())
}

/// Steps across pending crossings until none are left.
///
/// Both tiles reached by a crossing must be zone members. Fresh tiles are
/// paired and expanded; tiles already paired with each other must be
/// entered through facing edges; any other combination breaks the
/// symmetry.
fn walk(
    registry: &Registry,
    zone: &Zone,
    mut pairing: Pairing,
    mut pending: Vec<Crossing>,
) -> Option<Pairing> {
    while let Some((from_a, index_a, from_b, index_b)) = pending.pop() {
        let a = registry.tile(from_a)?;
        let b = registry.tile(from_b)?;
        let edge_a = *a.edges.get(index_a)?;
        let edge_b = *b.edges.get(index_b)?;
        let next_a = (*a.neighbors.get(index_a)?)?;
        let next_b = (*b.neighbors.get(index_b)?)?;
        if !zone.contains(next_a) || !zone.contains(next_b) {
            return None;
        }

        let next_a = registry.tile(next_a)?;
        let next_b = registry.tile(next_b)?;
        let entry_a = next_a.edge_index(edge_a)?;
        let entry_b = next_b.edge_index(edge_b)?;

        match (pairing.partner(next_a.coord), pairing.partner(next_b.coord)) {
            (None, None) => {
                let shift = (entry_b + EDGES_PER_TILE - entry_a) % EDGES_PER_TILE;
                pairing = pairing.pair(next_a.coord, next_b.coord, shift);
                expand(registry, next_a, edge_a, next_b, edge_b, &mut pending)?;
            }
            _ if pairing.aligned(next_a.coord, entry_a, next_b.coord, entry_b) => {}
            _ => return None,
        }
    }

    Some(pairing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dimensions;
    use crate::grid::Item;
    use crate::zones::partition;
    use proptest::prelude::*;

    fn registry(w: i32, h: i32, d: i32) -> Registry {
        Registry::build(Dimensions::new(w, h, d).unwrap()).unwrap()
    }

    fn mark(registry: &mut Registry, coord: Coord) {
        registry.tile_mut(coord).unwrap().has_marker = true;
    }

    fn wall(registry: &mut Registry, coord: Coord) {
        registry.set(coord, Item::Wall).unwrap();
    }

    /// Status of the zone containing `coord`.
    fn status_at(registry: &Registry, coord: Coord) -> ZoneStatus {
        let zones = partition(registry);
        let zone = zones.iter().find(|zone| zone.contains(coord)).unwrap();
        evaluate(registry, zone)
    }

    #[test]
    fn test_footprint_encoding() {
        let mut registry = registry(6, 6, 0);
        let center = Coord::new(3, 3, 0);
        // edges of the center: (3,4,0), (4,3,0), (3,2,0), (2,3,0)
        wall(&mut registry, Coord::new(4, 3, 0));
        let tile = registry.tile(center).unwrap();
        assert_eq!(footprint(&registry, tile, 0).to_string(), "011");
        assert_eq!(footprint(&registry, tile, 1).to_string(), "111");
        assert_eq!(footprint(&registry, tile, 2).to_string(), "110");
    }

    #[test]
    fn test_footprint_counts_rim_as_closed() {
        let registry = registry(2, 2, 0);
        let tile = registry.tile(Coord::new(1, 1, 0)).unwrap();
        assert_eq!(footprint(&registry, tile, 0).to_string(), "000");
    }

    #[test]
    fn test_footprint_of_tile_without_edges() {
        let registry = registry(2, 2, 0);
        let bare = Tile {
            edges: Vec::new(),
            neighbors: Vec::new(),
            ..registry.tile(Coord::new(1, 1, 0)).unwrap().clone()
        };
        assert_eq!(footprint(&registry, &bare, 5).to_string(), "000");
    }

    #[test]
    fn test_no_marker_is_undetermined() {
        let registry = registry(6, 6, 0);
        assert_eq!(status_at(&registry, Coord::new(3, 3, 0)), ZoneStatus::Undetermined);
    }

    #[test]
    fn test_two_markers_is_undetermined() {
        let mut registry = registry(6, 6, 0);
        mark(&mut registry, Coord::new(3, 3, 0));
        mark(&mut registry, Coord::new(1, 1, 0));
        assert_eq!(status_at(&registry, Coord::new(3, 3, 0)), ZoneStatus::Undetermined);

        // walls do not change the verdict while both markers share a zone
        wall(&mut registry, Coord::new(3, 4, 0));
        assert_eq!(status_at(&registry, Coord::new(3, 3, 0)), ZoneStatus::Undetermined);
    }

    #[test]
    fn test_isolated_walled_tile_is_valid() {
        let mut registry = registry(2, 2, 2);
        let center = Coord::new(1, 1, 0);
        mark(&mut registry, center);
        for edge in registry.tile(center).unwrap().edges.clone() {
            wall(&mut registry, edge);
        }
        assert_eq!(status_at(&registry, center), ZoneStatus::Valid);
        assert_eq!(
            status_at(&registry, Coord::new(1, 1, 2)),
            ZoneStatus::Undetermined
        );
    }

    #[test]
    fn test_single_tile_patch_is_valid() {
        let mut registry = registry(2, 2, 0);
        mark(&mut registry, Coord::new(1, 1, 0));
        assert_eq!(status_at(&registry, Coord::new(1, 1, 0)), ZoneStatus::Valid);
    }

    #[test]
    fn test_centered_marker_on_patch_is_valid() {
        let mut registry = registry(6, 6, 0);
        mark(&mut registry, Coord::new(3, 3, 0));
        assert_eq!(status_at(&registry, Coord::new(3, 3, 0)), ZoneStatus::Valid);
    }

    #[test]
    fn test_asymmetric_center_walls_are_invalid() {
        let mut registry = registry(6, 6, 0);
        mark(&mut registry, Coord::new(3, 3, 0));
        // edge 0 walled, edge 2 open
        wall(&mut registry, Coord::new(3, 4, 0));
        assert_eq!(status_at(&registry, Coord::new(3, 3, 0)), ZoneStatus::Invalid);
    }

    #[test]
    fn test_corner_marker_on_patch_is_invalid() {
        let mut registry = registry(6, 6, 0);
        mark(&mut registry, Coord::new(1, 1, 0));
        assert_eq!(status_at(&registry, Coord::new(1, 1, 0)), ZoneStatus::Invalid);
    }

    #[test]
    fn test_far_wall_breaks_symmetry() {
        let mut registry = registry(6, 6, 0);
        let center = Coord::new(3, 3, 0);
        mark(&mut registry, center);
        wall(&mut registry, Coord::new(4, 5, 0));
        assert_eq!(status_at(&registry, center), ZoneStatus::Invalid);

        // the rotated counterpart restores it
        wall(&mut registry, Coord::new(2, 1, 0));
        assert_eq!(status_at(&registry, center), ZoneStatus::Valid);
    }

    #[test]
    fn test_rectangular_zone_on_patch() {
        // 3x1 strip cut out of a 3x3 patch, marker in the middle
        let mut registry = registry(6, 6, 0);
        let center = Coord::new(3, 3, 0);
        mark(&mut registry, center);
        for edge in [(1, 2), (3, 2), (5, 2), (1, 4), (3, 4), (5, 4)] {
            wall(&mut registry, Coord::new(edge.0, edge.1, 0));
        }
        let zones = partition(&registry);
        assert_eq!(zones.len(), 3);
        let zone = zones.iter().find(|zone| zone.contains(center)).unwrap();
        assert_eq!(zone.len(), 3);
        assert_eq!(evaluate(&registry, zone), ZoneStatus::Valid);
    }

    #[test]
    fn test_zone_wrapping_a_seam() {
        // a 2x2x2 box: the marker tile and the four tiles around it form a
        // cross folded over the seams; the far face is walled off
        let mut registry = registry(2, 2, 2);
        let center = Coord::new(1, 1, 0);
        mark(&mut registry, center);
        for edge in registry.tile(Coord::new(1, 1, 2)).unwrap().edges.clone() {
            wall(&mut registry, edge);
        }
        assert_eq!(status_at(&registry, center), ZoneStatus::Valid);
    }

    #[test]
    fn test_whole_cube_around_face_center_is_valid() {
        let mut registry = registry(2, 2, 2);
        mark(&mut registry, Coord::new(1, 1, 0));
        assert_eq!(status_at(&registry, Coord::new(1, 1, 0)), ZoneStatus::Valid);
    }

    #[test]
    fn test_off_center_marker_on_box_is_invalid() {
        let mut registry = registry(6, 6, 6);
        mark(&mut registry, Coord::new(1, 3, 0));
        assert_eq!(status_at(&registry, Coord::new(1, 3, 0)), ZoneStatus::Invalid);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut registry = registry(6, 6, 0);
        mark(&mut registry, Coord::new(3, 3, 0));
        wall(&mut registry, Coord::new(4, 5, 0));
        let zones = partition(&registry);
        let first: Vec<ZoneStatus> = zones.iter().map(|z| evaluate(&registry, z)).collect();
        let second: Vec<ZoneStatus> = zones.iter().map(|z| evaluate(&registry, z)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zone_missing_a_tile_is_invalid() {
        let mut registry = registry(6, 6, 0);
        let center = Coord::new(3, 3, 0);
        mark(&mut registry, center);
        // hand-built zone lacking a tile the walk needs
        let tiles = registry
            .tile_coords()
            .iter()
            .copied()
            .filter(|&c| c != Coord::new(5, 5, 0))
            .collect();
        assert_eq!(evaluate(&registry, &Zone::new(tiles)), ZoneStatus::Invalid);
    }

    #[test]
    fn test_large_patch_does_not_exhaust_the_stack() {
        // 61x61 tiles: the lockstep walk is thousands of pairs deep
        let mut registry = registry(122, 122, 0);
        let center = Coord::new(61, 61, 0);
        mark(&mut registry, center);
        assert_eq!(status_at(&registry, center), ZoneStatus::Valid);

        wall(&mut registry, Coord::new(4, 1, 0));
        assert_eq!(status_at(&registry, center), ZoneStatus::Invalid);
    }

    #[test]
    fn test_revisited_pair_must_face_the_same_edges() {
        let registry = registry(6, 6, 0);
        let zone = partition(&registry).remove(0);
        let center = registry.tile(Coord::new(3, 3, 0)).unwrap();
        let (north, south) = (Coord::new(3, 5, 0), Coord::new(3, 1, 0));

        // walking the center against itself with edges (3,2,0) and (3,4,0)
        // facing comes back to the north/south pair through edges 2 and 0
        let walk_with = |shift| {
            let pairing = Pairing::default()
                .pair(center.coord, center.coord, 2)
                .pair(north, south, shift);
            symmetric(
                &registry,
                &zone,
                center,
                Coord::new(3, 2, 0),
                center,
                Coord::new(3, 4, 0),
                pairing,
            )
        };

        let matched = walk_with(2).unwrap();
        assert!(matched.covers(&zone));
        assert!(matched.aligned(north, 2, south, 0));
        for shift in [0, 1, 3] {
            assert!(walk_with(shift).is_none(), "shift {shift}");
        }
    }

    #[test]
    fn test_pairing_records_both_directions() {
        let (a, b) = (Coord::new(1, 1, 0), Coord::new(5, 5, 0));
        let pairing = Pairing::default().pair(a, b, 1);
        assert_eq!(pairing.partner(a), Some(b));
        assert_eq!(pairing.partner(b), Some(a));
        assert!(pairing.aligned(a, 0, b, 1));
        assert!(pairing.aligned(b, 1, a, 0));
        assert!(pairing.aligned(b, 0, a, 3));
        assert!(!pairing.aligned(a, 1, b, 1));
    }

    /// Centers of all six faces of a box whose half-extents are all odd.
    fn face_centers(w: i32, h: i32, d: i32) -> [Coord; 6] {
        let (ci, cj, ck) = (w / 2, h / 2, d / 2);
        [
            Coord::new(ci, cj, 0),
            Coord::new(ci, cj, d),
            Coord::new(ci, 0, ck),
            Coord::new(ci, h, ck),
            Coord::new(0, cj, ck),
            Coord::new(w, cj, ck),
        ]
    }

    proptest! {
        #[test]
        fn open_box_is_symmetric_about_every_face_center(
            a in prop::sample::select(vec![1i32, 3, 5]),
            b in prop::sample::select(vec![1i32, 3, 5]),
            c in prop::sample::select(vec![1i32, 3, 5]),
        ) {
            let (w, h, d) = (a * 2, b * 2, c * 2);
            for center in face_centers(w, h, d) {
                let mut registry = registry(w, h, d);
                mark(&mut registry, center);
                prop_assert_eq!(status_at(&registry, center), ZoneStatus::Valid, "center {}", center);
            }
        }

        #[test]
        fn walled_band_around_face_center_is_symmetric(
            a in prop::sample::select(vec![1i32, 3, 5]),
            b in prop::sample::select(vec![1i32, 3, 5]),
            c in 1i32..4,
        ) {
            // walls around the whole k=0 face: the face itself is a zone
            // symmetric about its center
            let (w, h, d) = (a * 2, b * 2, c * 2);
            let mut registry = registry(w, h, d);
            let center = Coord::new(a, b, 0);
            mark(&mut registry, center);
            for i in (1..w).step_by(2) {
                wall(&mut registry, Coord::new(i, 0, 0));
                wall(&mut registry, Coord::new(i, h, 0));
            }
            for j in (1..h).step_by(2) {
                wall(&mut registry, Coord::new(0, j, 0));
                wall(&mut registry, Coord::new(w, j, 0));
            }
            let zones = partition(&registry);
            let zone = zones.iter().find(|zone| zone.contains(center)).unwrap();
            prop_assert_eq!(zone.len() as i32, a * b);
            prop_assert_eq!(evaluate(&registry, zone), ZoneStatus::Valid);
        }
    }
}
