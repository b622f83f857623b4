//! 3D view and editor of a board using kiss3d.
//!
//! The scene is kept in step with the session through a [`BoardObserver`]:
//! the session reports attached and detached items and every new verdict,
//! and the render loop applies those changes to the scene nodes between
//! frames. Edits go through a keyboard cursor that is picked into the board
//! like a pointer.

use std::cell::RefCell;
use std::mem;
use std::path::Path;
use std::rc::Rc;

use kiss3d::prelude::*;
use log::{error, info, warn};
use rustc_hash::FxHashMap;

use galaxies::{
    Axis, BoardObserver, Coord, Dimensions, Item, LevelError, Picked, Session, Zone, ZoneStatus,
};

use crate::load_session;

/// Tile plate color for the status of its zone.
fn status_color(status: ZoneStatus) -> Color {
    match status {
        ZoneStatus::Valid => Color::new(0.3, 0.8, 0.3, 1.0),
        ZoneStatus::Invalid => Color::new(0.9, 0.25, 0.25, 1.0),
        ZoneStatus::Undetermined => Color::new(0.7, 0.7, 0.7, 1.0),
    }
}

/// Cube extents along i, j and k.
fn extents(size: impl Fn(Axis) -> f32) -> (f32, f32, f32) {
    (size(Axis::I), size(Axis::J), size(Axis::K))
}

/// The single odd axis of an edge midpoint.
fn edge_axis(edge: Coord) -> Option<Axis> {
    Axis::ALL
        .iter()
        .copied()
        .find(|&axis| edge.get(axis).rem_euclid(2) == 1)
}

/// A change reported by the session, waiting to be applied to the scene.
enum SceneChange {
    Attached(Coord, Item),
    Detached(Coord),
    Evaluated {
        statuses: Vec<(Coord, ZoneStatus)>,
        valid: usize,
        zones: usize,
        solved: bool,
    },
}

/// Observer that queues session changes for the render loop.
#[derive(Clone, Default)]
struct SceneFeed(Rc<RefCell<Vec<SceneChange>>>);

impl SceneFeed {
    fn take(&self) -> Vec<SceneChange> {
        mem::take(&mut *self.0.borrow_mut())
    }
}

impl BoardObserver for SceneFeed {
    fn item_attached(&mut self, coord: Coord, item: &Item) {
        self.0
            .borrow_mut()
            .push(SceneChange::Attached(coord, item.clone()));
    }

    fn item_detached(&mut self, coord: Coord) {
        self.0.borrow_mut().push(SceneChange::Detached(coord));
    }

    fn zones_evaluated(&mut self, zones: &[Zone], solved: bool) {
        let statuses = zones
            .iter()
            .flat_map(|zone| zone.tiles.iter().map(|&tile| (tile, zone.status)))
            .collect();
        let valid = zones
            .iter()
            .filter(|zone| zone.status == ZoneStatus::Valid)
            .count();
        self.0.borrow_mut().push(SceneChange::Evaluated {
            statuses,
            valid,
            zones: zones.len(),
            solved,
        });
    }
}

/// Scene nodes of every board item, keyed by coordinate.
///
/// Coordinate conventions:
/// - Lattice i, j, k map to world X, Y, Z, one lattice step per unit.
/// - The box is centered on the origin (see `Dimensions::coord_to_world`).
/// - A tile spans two lattice steps, so plates are just under 2 units wide.
/// - The first node of a tile is its plate.
struct BoardScene {
    dims: Dimensions,
    nodes: FxHashMap<Coord, Vec<SceneNode3d>>,
}

impl BoardScene {
    fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            nodes: FxHashMap::default(),
        }
    }

    /// Applies one change; returns the new verdict text after an evaluation.
    fn apply(&mut self, scene: &mut SceneNode3d, change: SceneChange) -> Option<String> {
        match change {
            SceneChange::Attached(coord, item) => {
                self.detach(coord);
                let nodes = self.item_nodes(scene, coord, &item);
                self.nodes.insert(coord, nodes);
                None
            }
            SceneChange::Detached(coord) => {
                self.detach(coord);
                None
            }
            SceneChange::Evaluated {
                statuses,
                valid,
                zones,
                solved,
            } => {
                for (tile, status) in statuses {
                    if let Some(plate) = self.nodes.get_mut(&tile).and_then(|nodes| nodes.first_mut()) {
                        plate.set_color(status_color(status));
                    }
                }
                Some(if solved {
                    "SOLVED".to_string()
                } else {
                    format!("{}/{} zones valid", valid, zones)
                })
            }
        }
    }

    fn detach(&mut self, coord: Coord) {
        if let Some(nodes) = self.nodes.remove(&coord) {
            for mut node in nodes {
                node.remove();
            }
        }
    }

    fn clear(&mut self) {
        for (_, nodes) in self.nodes.drain() {
            for mut node in nodes {
                node.remove();
            }
        }
    }

    fn item_nodes(&self, scene: &mut SceneNode3d, coord: Coord, item: &Item) -> Vec<SceneNode3d> {
        const TILE_SIZE: f32 = 1.9;
        const TILE_THICKNESS: f32 = 0.1;
        const WALL_THICKNESS: f32 = 0.25;
        const MARKER_SIZE: f32 = 0.7;
        const POLE_SIZE: f32 = 0.3;

        let [x, y, z] = self.dims.coord_to_world(coord);
        let position = Vec3::new(x, y, z);
        let mut nodes = Vec::new();

        match item {
            Item::Tile(tile) => {
                let Some(normal) = self.dims.normal_axis(coord) else {
                    return nodes;
                };
                let (w, h, d) = extents(|axis| {
                    if axis == normal {
                        TILE_THICKNESS
                    } else {
                        TILE_SIZE
                    }
                });
                nodes.push(
                    scene
                        .add_cube(w, h, d)
                        .set_color(status_color(tile.status))
                        .set_position(position),
                );
                if tile.has_marker {
                    nodes.push(
                        scene
                            .add_cube(MARKER_SIZE, MARKER_SIZE, MARKER_SIZE)
                            .set_color(Color::new(1.0, 0.85, 0.2, 1.0))
                            .set_position(position),
                    );
                }
            }
            Item::Wall => {
                if let Some(along) = edge_axis(coord) {
                    let (w, h, d) =
                        extents(|axis| if axis == along { 2.0 } else { WALL_THICKNESS });
                    nodes.push(
                        scene
                            .add_cube(w, h, d)
                            .set_color(Color::new(0.15, 0.15, 0.5, 1.0))
                            .set_position(position),
                    );
                }
            }
            Item::Decorative(_) => {
                nodes.push(
                    scene
                        .add_cube(POLE_SIZE, POLE_SIZE, POLE_SIZE)
                        .set_color(Color::new(0.2, 0.2, 0.2, 1.0))
                        .set_position(position),
                );
            }
        }

        nodes
    }
}

fn title(path: &Path, verdict: &str, editing: bool) -> String {
    let mode = if editing { "edit" } else { "play" };
    format!(
        "{} - {} - {} mode - [arrows/PgUp/PgDn] move, [Space] toggle, [E] mode, [R] reload",
        path.display(),
        verdict,
        mode
    )
}

/// Starting cursor position: the first tile of the board.
fn initial_cursor(session: &Session) -> Vec3 {
    let dims = session.dims();
    let [x, y, z] = session
        .registry()
        .tile_coords()
        .first()
        .map_or([0.0; 3], |&tile| dims.coord_to_world(tile));
    Vec3::new(x, y, z)
}

/// Displays a level with the given walls in an interactive 3D editor.
pub fn display(path: &Path, walls: &[Coord]) -> Result<(), LevelError> {
    let session = load_session(path, walls)?;
    pollster::block_on(display_async(path, walls, session));
    Ok(())
}

async fn display_async(path: &Path, walls: &[Coord], mut session: Session) {
    let feed = SceneFeed::default();
    session.add_observer(Box::new(feed.clone()));

    let mut editing = false;
    let mut verdict = String::new();
    let mut window = Window::new(&title(path, &verdict, editing)).await;

    let dims = session.dims();
    let extent = dims.width.max(dims.height).max(dims.depth) as f32;
    let mut camera = OrbitCamera3d::default();
    camera.set_dist(extent * 2.0 + 4.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(extent, extent, extent));

    let mut board = BoardScene::new(dims);
    let mut cursor = initial_cursor(&session);
    let mut cursor_node = scene
        .add_cube(0.4, 0.4, 0.4)
        .set_color(Color::new(1.0, 1.0, 1.0, 1.0))
        .set_position(cursor);
    let mut needs_title = true;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action != Action::Press {
                    continue;
                }
                match key {
                    Key::Left => cursor.x -= 1.0,
                    Key::Right => cursor.x += 1.0,
                    Key::Down => cursor.y -= 1.0,
                    Key::Up => cursor.y += 1.0,
                    Key::PageDown => cursor.z -= 1.0,
                    Key::PageUp => cursor.z += 1.0,
                    Key::E => {
                        editing = !editing;
                        needs_title = true;
                    }
                    Key::Space => match session.pick([cursor.x, cursor.y, cursor.z], editing) {
                        Ok(Picked::Nothing(coord)) => info!("nothing to toggle at {}", coord),
                        Ok(picked) => info!("{:?}", picked),
                        Err(e) => warn!("cannot toggle here: {}", e),
                    },
                    Key::R => match load_session(path, walls) {
                        Ok(reloaded) => {
                            info!("reloaded {}", path.display());
                            board.clear();
                            // drop changes queued by the old session
                            feed.take();
                            board.dims = reloaded.dims();
                            session = reloaded;
                            session.add_observer(Box::new(feed.clone()));
                        }
                        Err(e) => error!("failed to reload {}: {}", path.display(), e),
                    },
                    _ => {}
                }
            }
        }
        cursor_node.set_position(cursor);

        for change in feed.take() {
            if let Some(text) = board.apply(&mut scene, change) {
                verdict = text;
                needs_title = true;
            }
        }

        if needs_title {
            window.set_title(&title(path, &verdict, editing));
            needs_title = false;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
