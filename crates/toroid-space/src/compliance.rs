//! Topology compliance test helpers.
//!
//! These functions verify the invariants the engine relies on: the rank
//! map is a bijection, normalization is idempotent, and the cardinal
//! neighbourhood is symmetric. Reused across the torus test module for
//! square, rectangular, and degenerate grids.

use indexmap::IndexSet;
use toroid_core::{Coord, WorkerId};

use crate::torus::{Torus, CARDINALS};

/// Assert `worker_of(coordinate_of(w)) == w` for every rank.
pub fn assert_rank_bijection(torus: &Torus) {
    for i in 0..torus.cell_count() {
        let worker = WorkerId(i);
        let coord = torus
            .coordinate_of(worker)
            .expect("rank within range must map to a coordinate");
        assert_eq!(
            torus.worker_of(coord),
            worker,
            "rank {worker} -> {coord} does not map back"
        );
    }
}

/// Assert that `canonical_ordering()[i]` is the coordinate of rank `i`.
pub fn assert_canonical_ordering_matches_ranks(torus: &Torus) {
    let ordering = torus.canonical_ordering();
    assert_eq!(ordering.len(), torus.cell_count());
    for (i, coord) in ordering.iter().enumerate() {
        assert_eq!(torus.worker_of(*coord), WorkerId(i));
    }
    let unique: IndexSet<_> = ordering.iter().collect();
    assert_eq!(unique.len(), torus.cell_count(), "duplicate coordinates");
}

/// Assert normalization is idempotent on coordinates around the grid.
pub fn assert_normalize_idempotent(torus: &Torus) {
    let x = i64::from(torus.dims().x());
    let y = i64::from(torus.dims().y());
    for cx in -2 * x..2 * x {
        for cy in -2 * y..2 * y {
            let once = torus.normalize(Coord::new(cx, cy));
            assert_eq!(torus.normalize(once), once, "normalize not idempotent at ({cx}, {cy})");
        }
    }
}

/// Assert `b` is a neighbour of `a` along `delta` iff `a` is a neighbour of
/// `b` along `-delta`.
pub fn assert_neighbours_symmetric(torus: &Torus) {
    for coord in torus.canonical_ordering() {
        let me = torus.worker_of(coord);
        for delta in CARDINALS {
            let nb = torus.neighbour(coord, delta);
            let nb_coord = torus
                .coordinate_of(nb)
                .expect("neighbour rank must be in range");
            assert_eq!(
                torus.neighbour(nb_coord, -delta),
                me,
                "neighbour symmetry violated between {coord} and {nb_coord}"
            );
        }
    }
}

/// Run all compliance checks on a torus.
pub fn run_full_compliance(torus: &Torus) {
    assert_rank_bijection(torus);
    assert_canonical_ordering_matches_ranks(torus);
    assert_normalize_idempotent(torus);
    assert_neighbours_symmetric(torus);
}
