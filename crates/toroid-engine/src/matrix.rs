//! The coordinator's full copy of the grid.

use toroid_core::{Cell, Coord, GridDims};
use toroid_space::Torus;

/// Every cell of the grid in rank order, held by the coordinator.
///
/// Index `i` is the cell owned by `WorkerId(i)`. All coordinate access
/// is normalized, so `(-1, 0)` addresses the last row.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    torus: Torus,
    cells: Vec<Cell>,
}

impl Matrix {
    /// All-free grid of zeros.
    pub fn new(dims: GridDims) -> Self {
        let torus = Torus::new(dims);
        Self {
            torus,
            cells: vec![Cell::default(); torus.cell_count()],
        }
    }

    /// Grid extent.
    pub fn dims(&self) -> GridDims {
        self.torus.dims()
    }

    /// Topology used for addressing.
    pub fn torus(&self) -> &Torus {
        &self.torus
    }

    /// Cell at `coord`.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[self.torus.worker_of(coord).index()]
    }

    /// Value at `coord`.
    pub fn value(&self, coord: Coord) -> f64 {
        self.get(coord).value
    }

    /// Overwrite the cell at `coord`.
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        let i = self.torus.worker_of(coord).index();
        self.cells[i] = cell;
    }

    /// Cells in rank order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Values in rank order.
    pub fn values(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.value).collect()
    }

    /// Replace every value with a gathered rank-ordered vector, keeping
    /// cell kinds. Extra or missing entries are ignored.
    pub fn update_values(&mut self, values: &[f64]) {
        for (cell, &v) in self.cells.iter_mut().zip(values) {
            cell.value = v;
        }
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.cells.iter().map(|c| c.value).sum()
    }

    /// `(coord, cell)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.torus
            .canonical_ordering()
            .into_iter()
            .zip(self.cells.iter().copied())
    }
}
