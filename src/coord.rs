//! Doubled lattice coordinates.
//!
//! Every feature of the box surface lives on one integer lattice. The
//! number of odd components tells which feature a triple names:
//!
//! | odd components | feature        |
//! |----------------|----------------|
//! | 0              | vertex         |
//! | 1              | edge midpoint  |
//! | 2              | face cell      |
//! | 3              | cell center    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseCoordError;

/// The kind of board feature a coordinate names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Vertex,
    EdgeMidpoint,
    FaceCell,
    CellCenter,
}

/// One of the three lattice axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    I,
    J,
    K,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::I, Axis::J, Axis::K];
}

/// Unit steps in canonical order: -i, -j, -k, +i, +j, +k.
///
/// Edge derivation and neighbor lookup both rely on this order.
pub const DIRECTIONS: [(i32, i32, i32); 6] = [
    (-1, 0, 0),
    (0, -1, 0),
    (0, 0, -1),
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
];

/// A position on the doubled lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub i: i32,
    pub j: i32,
    pub k: i32,
}

impl Coord {
    pub const fn new(i: i32, j: i32, k: i32) -> Self {
        Self { i, j, k }
    }

    /// Returns the component along `axis`.
    #[inline]
    pub const fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::I => self.i,
            Axis::J => self.j,
            Axis::K => self.k,
        }
    }

    /// Returns a copy with the component along `axis` replaced.
    #[inline]
    pub fn with(mut self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::I => self.i = value,
            Axis::J => self.j = value,
            Axis::K => self.k = value,
        }
        self
    }

    #[inline]
    pub const fn offset(&self, (di, dj, dk): (i32, i32, i32)) -> Self {
        Self::new(self.i + di, self.j + dj, self.k + dk)
    }

    /// Number of odd components.
    #[inline]
    pub const fn odd_count(&self) -> u32 {
        // `& 1` is parity for negative values too (two's complement)
        (self.i & 1) as u32 + (self.j & 1) as u32 + (self.k & 1) as u32
    }

    pub const fn classify(&self) -> Feature {
        match self.odd_count() {
            0 => Feature::Vertex,
            1 => Feature::EdgeMidpoint,
            2 => Feature::FaceCell,
            _ => Feature::CellCenter,
        }
    }

    #[inline]
    pub const fn is_tile(&self) -> bool {
        self.odd_count() == 2
    }

    #[inline]
    pub const fn is_edge(&self) -> bool {
        self.odd_count() == 1
    }

    /// The six positions one unit step away, in [`DIRECTIONS`] order.
    pub fn surrounding(&self) -> [Coord; 6] {
        DIRECTIONS.map(|step| self.offset(step))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    /// Parses `"i,j,k"`; whitespace around components is ignored.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        let [i, j, k] = parts.as_slice() else {
            return Err(ParseCoordError::Arity {
                input: text.to_string(),
                found: parts.len(),
            });
        };
        let parse = |part: &str| {
            part.parse::<i32>()
                .map_err(|source| ParseCoordError::Component {
                    input: text.to_string(),
                    source,
                })
        };
        Ok(Coord::new(parse(*i)?, parse(*j)?, parse(*k)?))
    }
}
