//! 2D torus with a 4-connected neighbourhood and a row-major rank map.

use smallvec::SmallVec;
use toroid_core::{Coord, GridDims, WorkerId};

use crate::error::SpaceError;

/// The four cardinal offsets, in read order: up `(-1, 0)`, down `(1, 0)`,
/// left `(0, -1)`, right `(0, 1)`.
pub const CARDINALS: [Coord; 4] = [
    Coord::new(-1, 0),
    Coord::new(1, 0),
    Coord::new(0, -1),
    Coord::new(0, 1),
];

/// The two peers of one exchange call.
///
/// For a direction `delta`, a worker at `c` sends to `c - delta` and
/// receives from `c + delta`, so after the call it holds the value of
/// its `+delta` neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangePair {
    /// Peer that receives this worker's value.
    pub send_to: WorkerId,
    /// Peer whose value this worker receives.
    pub recv_from: WorkerId,
}

/// A two-dimensional torus of `X * Y` cells, one per worker.
///
/// Both axes wrap: coordinate `X` is adjacent to `0`. When an axis has
/// extent 1 the two offsets along it resolve to the cell itself, and
/// callers still count both reads.
///
/// # Examples
///
/// ```
/// use toroid_core::{Coord, GridDims, WorkerId};
/// use toroid_space::Torus;
///
/// let torus = Torus::new(GridDims::new(4, 3).unwrap());
/// assert_eq!(torus.worker_of(Coord::new(1, 2)), WorkerId(5));
/// assert_eq!(torus.coordinate_of(WorkerId(5)).unwrap(), Coord::new(1, 2));
///
/// // Left of column 0 is column X - 1.
/// assert_eq!(torus.normalize(Coord::new(-1, 0)), Coord::new(3, 0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Torus {
    dims: GridDims,
}

impl Torus {
    /// Build the topology for validated dimensions.
    pub fn new(dims: GridDims) -> Self {
        Self { dims }
    }

    /// Grid extent.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Number of cells, equal to the required worker count.
    pub fn cell_count(&self) -> usize {
        self.dims.cell_count()
    }

    /// Wrap each axis into `[0, X) x [0, Y)` using a never-negative modulo.
    pub fn normalize(&self, coord: Coord) -> Coord {
        Coord::new(
            coord.x.rem_euclid(i64::from(self.dims.x())),
            coord.y.rem_euclid(i64::from(self.dims.y())),
        )
    }

    /// Rank owning `coord`, after normalization.
    pub fn worker_of(&self, coord: Coord) -> WorkerId {
        let c = self.normalize(coord);
        WorkerId(c.x as usize * self.dims.y() as usize + c.y as usize)
    }

    /// Inverse of [`worker_of`](Self::worker_of) for ranks in `[0, X * Y)`.
    pub fn coordinate_of(&self, worker: WorkerId) -> Result<Coord, SpaceError> {
        let cells = self.cell_count();
        if worker.index() >= cells {
            return Err(SpaceError::WorkerOutOfRange {
                worker,
                workers: cells,
            });
        }
        let y = self.dims.y() as usize;
        Ok(Coord::new(
            (worker.index() / y) as i64,
            (worker.index() % y) as i64,
        ))
    }

    /// Rank of the cell at `offset` from `coord`.
    ///
    /// Both operands are wrapped before they are added, so any `i64`
    /// coordinate or offset is accepted.
    pub fn neighbour(&self, coord: Coord, offset: Coord) -> WorkerId {
        self.worker_of(self.normalize(coord) + self.normalize(offset))
    }

    /// Peers for one exchange along `delta` from `coord`.
    pub fn exchange_pair(&self, coord: Coord, delta: Coord) -> ExchangePair {
        let delta = self.normalize(delta);
        ExchangePair {
            send_to: self.neighbour(coord, -delta),
            recv_from: self.neighbour(coord, delta),
        }
    }

    /// Exchange peers for the four cardinal reads, in [`CARDINALS`] order.
    pub fn cardinal_pairs(&self, coord: Coord) -> [ExchangePair; 4] {
        CARDINALS.map(|delta| self.exchange_pair(coord, delta))
    }

    /// Ranks of the four cardinal neighbours, in [`CARDINALS`] order.
    ///
    /// Entries may repeat (or equal `coord`'s own rank) on narrow grids.
    pub fn neighbours(&self, coord: Coord) -> SmallVec<[WorkerId; 4]> {
        CARDINALS
            .iter()
            .map(|&delta| self.neighbour(coord, delta))
            .collect()
    }

    /// Row-major canonical ordering: `(0,0), (0,1), ..., (X-1, Y-1)`.
    ///
    /// Position `i` in the returned vector is the coordinate of `WorkerId(i)`.
    pub fn canonical_ordering(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.cell_count());
        for x in 0..i64::from(self.dims.x()) {
            for y in 0..i64::from(self.dims.y()) {
                out.push(Coord::new(x, y));
            }
        }
        out
    }
}
