//! Benchmark profiles for the toroid diffusion engine.
//!
//! - [`ring_profile`]: a single-row ring with one impulse
//! - [`square_profile`]: a square grid with deterministic free values
//! - [`run_profile`]: run a profile to completion with a given strategy

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::VecDeque;
use std::io;

use toroid_comm::Transport;
use toroid_core::{ConfigError, Coord, GridDims, RunHeader, SimulationParameters};
use toroid_engine::{run, EngineConfig, EngineError, Record, Report, Session, Strategy};

/// A header plus the records a coordinator would read.
#[derive(Clone, Debug)]
pub struct Profile {
    /// Grid shape and parameters.
    pub header: RunHeader,
    /// Assignments followed by queries.
    pub records: Vec<Record>,
}

/// A ring of `n` cells with a unit impulse at the origin, queried at the
/// origin and its opposite cell.
pub fn ring_profile(n: u32, p: f64, t: u64) -> Result<Profile, ConfigError> {
    let header = RunHeader::new(GridDims::new(n, 1)?, SimulationParameters::new(p, t)?);
    let records = vec![
        Record::free(Coord::ORIGIN, 1.0),
        Record::get(Coord::ORIGIN),
        Record::get(Coord::new(i64::from(n / 2), 0)),
    ];
    Ok(Profile { header, records })
}

/// A `side x side` grid where every cell gets a free value derived from
/// `seed`, with one query per row.
pub fn square_profile(side: u32, p: f64, t: u64, seed: u64) -> Result<Profile, ConfigError> {
    let header = RunHeader::new(GridDims::new(side, side)?, SimulationParameters::new(p, t)?);
    let side = i64::from(side);
    let mut records = Vec::with_capacity((side * side + side) as usize);
    for x in 0..side {
        for y in 0..side {
            let i = (x * side + y) as u64 ^ seed;
            // Deterministic pseudo-random value in [0, 1).
            let v = (i.wrapping_mul(6364136223846793007) >> 11) as f64 / (1u64 << 53) as f64;
            records.push(Record::free(Coord::new(x, y), v));
        }
    }
    records.extend((0..side).map(|x| Record::get(Coord::new(x, x))));
    Ok(Profile { header, records })
}

/// Run `profile` on one worker per cell, discarding the printed answers.
pub fn run_profile(
    profile: &Profile,
    strategy: Strategy,
    transport: Transport,
) -> Result<Report, EngineError> {
    let config = EngineConfig {
        strategy,
        transport,
        progress_interval: u64::MAX,
    };
    let records: VecDeque<Record> = profile.records.iter().copied().collect();
    let session = Session::new(profile.header, records, io::sink());
    run(&config, profile.header.dims.cell_count(), session)
}
