//! Test utilities for toroid development.
//!
//! [`serial_relax`] is a dense single-threaded model of the relaxation
//! rule, used as the oracle for the distributed engines. The
//! [`fixtures`] module builds text input and scripted canvases.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use toroid_core::{Cell, Coord, GridDims, RunHeader, SimulationParameters};
use toroid_space::Torus;

pub use fixtures::{input_text, CanvasLog, ScriptedCanvas};

/// Header for an `x` by `y` run. Panics on invalid arguments.
pub fn header(x: u32, y: u32, p: f64, t: u64) -> RunHeader {
    RunHeader::new(
        GridDims::new(x, y).expect("valid test dimensions"),
        SimulationParameters::new(p, t).expect("valid test parameters"),
    )
}

/// Apply `header.params.iterations()` rounds to `cells` (rank order)
/// serially and return the final values.
///
/// Reads the four cardinal neighbours in the same order as the
/// distributed engine, aliasing on narrow axes included, so results
/// agree bit for bit.
pub fn serial_relax(header: &RunHeader, cells: &[Cell]) -> Vec<f64> {
    let torus = Torus::new(header.dims);
    let coords = torus.canonical_ordering();
    let mut current = cells.to_vec();
    for _ in 0..header.params.iterations() {
        let next: Vec<Cell> = coords
            .iter()
            .zip(&current)
            .map(|(&coord, &cell)| {
                let mut reads = [0.0; 4];
                for (read, worker) in reads.iter_mut().zip(torus.neighbours(coord)) {
                    *read = current[worker.index()].value;
                }
                let mut cell = cell;
                cell.commit(header.params.mix(cell.value, reads));
                cell
            })
            .collect();
        current = next;
    }
    current.into_iter().map(|c| c.value).collect()
}

/// All-free cells with `magnitude` at `at` and zero elsewhere.
pub fn impulse(dims: GridDims, at: Coord, magnitude: f64) -> Vec<Cell> {
    let torus = Torus::new(dims);
    let mut cells = vec![Cell::free(0.0); torus.cell_count()];
    cells[torus.worker_of(at).index()] = Cell::free(magnitude);
    cells
}

/// Deterministic pseudo-random free cells in `[0, 1)`.
pub fn scattered(dims: GridDims, seed: u64) -> Vec<Cell> {
    let mut state = seed;
    (0..dims.cell_count())
        .map(|_| {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            Cell::free((z >> 11) as f64 / (1u64 << 53) as f64)
        })
        .collect()
}
