//! Strongly-typed identifiers: [`WorkerId`], [`Coord`], and [`GridDims`].

use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::error::ConfigError;

/// Flat identifier of one worker, equal to its rank in the launcher.
///
/// A worker owns exactly one cell; the row-major bijection
/// `WorkerId = x * Y + y` links it to that cell's [`Coord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// The coordinator rank.
    pub const COORDINATOR: WorkerId = WorkerId(0);

    /// Whether this worker is the coordinator.
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }

    /// Index into rank-ordered buffers.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for WorkerId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// A grid coordinate `(x, y)`.
///
/// Components are unbounded before normalization: offsets and
/// neighbour arithmetic may leave `[0, X) x [0, Y)` and are wrapped back
/// by the topology. `(-1, -1)` is reserved as the end-of-stream sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    /// Position along the first (width) axis.
    pub x: i64,
    /// Position along the second (height) axis.
    pub y: i64,
}

impl Coord {
    /// The "no more requests" sentinel.
    pub const SENTINEL: Coord = Coord { x: -1, y: -1 };

    /// The origin, home of the operator-power reference cell.
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    /// Create a coordinate.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Whether this is the end-of-stream sentinel.
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

impl From<(i64, i64)> for Coord {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

/// Grid extent `(X, Y)`: `x` is the width, `y` the height.
///
/// Fixed for the lifetime of a run and known to every worker after the
/// coordinator's startup broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    x: u32,
    y: u32,
}

impl GridDims {
    /// Maximum extent per axis: coordinates must survive `i32` consumers.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create grid dimensions, rejecting empty or oversized axes.
    pub fn new(x: u32, y: u32) -> Result<Self, ConfigError> {
        for (name, value) in [("width", x), ("height", y)] {
            if value == 0 {
                return Err(ConfigError::EmptyGrid { axis: name });
            }
            if value > Self::MAX_DIM {
                return Err(ConfigError::DimensionTooLarge {
                    axis: name,
                    value,
                    max: Self::MAX_DIM,
                });
            }
        }
        Ok(Self { x, y })
    }

    /// Width (extent of the `x` axis).
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Height (extent of the `y` axis).
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Number of cells, and therefore of workers, `X * Y`.
    pub fn cell_count(&self) -> usize {
        self.x as usize * self.y as usize
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_reject_zero_axis() {
        assert!(matches!(
            GridDims::new(0, 3),
            Err(ConfigError::EmptyGrid { axis: "width" })
        ));
        assert!(matches!(
            GridDims::new(3, 0),
            Err(ConfigError::EmptyGrid { axis: "height" })
        ));
    }

    #[test]
    fn dims_reject_oversized_axis() {
        let big = GridDims::MAX_DIM + 1;
        assert!(matches!(
            GridDims::new(big, 1),
            Err(ConfigError::DimensionTooLarge { axis: "width", .. })
        ));
        assert!(GridDims::new(GridDims::MAX_DIM, 1).is_ok());
    }

    #[test]
    fn cell_count_is_product() {
        let dims = GridDims::new(4, 3).unwrap();
        assert_eq!(dims.cell_count(), 12);
        assert_eq!(dims.to_string(), "4x3");
    }

    #[test]
    fn coord_arithmetic() {
        let a = Coord::new(2, -1);
        let b = Coord::new(-5, 4);
        assert_eq!(a + b, Coord::new(-3, 3));
        assert_eq!(a - b, Coord::new(7, -5));
        assert_eq!(-a, Coord::new(-2, 1));
    }

    #[test]
    fn sentinel_detection() {
        assert!(Coord::new(-1, -1).is_sentinel());
        assert!(!Coord::new(-1, 0).is_sentinel());
        assert!(WorkerId(0).is_coordinator());
        assert!(!WorkerId(3).is_coordinator());
    }
}
