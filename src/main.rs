//! Galaxies
//!
//! Checks, creates and displays symmetry puzzles played on the surface of a
//! box. A level file holds the board size and the marker tiles; walls are
//! supplied on the command line, the way a player would draw them.

mod visualization;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use galaxies::{grid, persistence, Coord, Dimensions, LevelError, Session};

/// Checks and displays galaxies puzzles on box surfaces.
#[derive(Parser)]
#[command(name = "galaxies")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply walls to a level and report whether it is solved.
    Check {
        /// Level file (JSON).
        level: PathBuf,
        /// Wall position as an edge midpoint, e.g. `2,1,0`. Repeatable.
        #[arg(long = "wall", value_name = "I,J,K")]
        walls: Vec<Coord>,
    },
    /// Write a new level file.
    New {
        #[arg(long)]
        width: i32,
        #[arg(long)]
        height: i32,
        #[arg(long)]
        depth: i32,
        /// Marker tile, e.g. `3,3,0`. Repeatable.
        #[arg(long = "marker", value_name = "I,J,K")]
        markers: Vec<Coord>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Open a level in the interactive 3D viewer.
    Show {
        level: PathBuf,
        #[arg(long = "wall", value_name = "I,J,K")]
        walls: Vec<Coord>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check { level, walls } => run_check(&level, &walls),
        Command::New {
            width,
            height,
            depth,
            markers,
            output,
        } => run_new(width, height, depth, &markers, &output),
        Command::Show { level, walls } => {
            println!("Controls: mouse to orbit, R reload level");
            visualization::display(&level, &walls)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Loads a level and draws the given walls on it.
pub(crate) fn load_session(path: &Path, walls: &[Coord]) -> Result<Session, LevelError> {
    let level = persistence::load(path)?;
    let mut session = Session::from_level(&level)?;
    for &wall in walls {
        session.toggle_wall(wall)?;
    }
    Ok(session)
}

fn run_check(path: &Path, walls: &[Coord]) -> Result<(), LevelError> {
    let session = load_session(path, walls)?;
    println!("{}", report(&session));
    Ok(())
}

fn run_new(
    width: i32,
    height: i32,
    depth: i32,
    markers: &[Coord],
    output: &Path,
) -> Result<(), LevelError> {
    let mut session = Session::new(Dimensions::new(width, height, depth)?)?;
    for &marker in markers {
        session.toggle_marker(marker)?;
    }
    persistence::save(output, &session.to_level())?;
    println!(
        "Wrote {} ({} tiles, {} markers)",
        output.display(),
        session.registry().tile_coords().len(),
        session.markers().len()
    );
    Ok(())
}

/// The board drawing followed by one line per zone and the verdict.
fn report(session: &Session) -> String {
    let mut output = grid::format_board(session.registry());

    for (index, zone) in session.zones().iter().enumerate() {
        let markers = zone.markers(session.registry());
        let markers = if markers.is_empty() {
            "none".to_string()
        } else {
            markers
                .iter()
                .map(Coord::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        output.push_str(&format!(
            "zone {}: {}, {} tiles, markers: {}\n",
            index + 1,
            zone.status,
            zone.len(),
            markers
        ));
    }

    output.push_str(if session.is_solved() {
        "SOLVED"
    } else {
        "NOT SOLVED"
    });
    output
}
