//! The per-worker relaxation rule.

use toroid_comm::{CommError, Communicator};
use toroid_core::{Cell, Coord, RunHeader, SimulationParameters, WorkerId};
use toroid_space::{ExchangePair, SpaceError, Torus};
use tracing::info;

use crate::config::EngineConfig;

/// One worker's view of the relaxation operator.
///
/// A round performs exactly four exchanges, one per cardinal direction,
/// then mixes the cell's value with the mean of the four reads:
///
/// ```text
/// v' = (1 - p) * v + p * (up + down + left + right) / 4
/// ```
///
/// Fixed cells join every exchange but keep their value.
#[derive(Clone, Debug)]
pub struct Relaxation {
    torus: Torus,
    coord: Coord,
    pairs: [ExchangePair; 4],
    params: SimulationParameters,
}

impl Relaxation {
    /// Operator for the worker `rank` of a run described by `header`.
    pub fn new(rank: WorkerId, header: &RunHeader) -> Result<Self, SpaceError> {
        let torus = Torus::new(header.dims);
        let coord = torus.coordinate_of(rank)?;
        Ok(Self {
            torus,
            coord,
            pairs: torus.cardinal_pairs(coord),
            params: header.params,
        })
    }

    /// This worker's coordinate.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Grid topology.
    pub fn torus(&self) -> &Torus {
        &self.torus
    }

    /// Run parameters.
    pub fn params(&self) -> SimulationParameters {
        self.params
    }

    /// Publish `value` and read the four cardinal neighbours, in
    /// up, down, left, right order.
    pub fn neighbour_values<C: Communicator>(
        &self,
        comm: &mut C,
        value: f64,
    ) -> Result<[f64; 4], CommError> {
        let mut reads = [0.0; 4];
        for (slot, pair) in reads.iter_mut().zip(self.pairs) {
            *slot = comm.exchange(pair.send_to, pair.recv_from, value)?;
        }
        Ok(reads)
    }

    /// One application of the rule to a free value.
    pub fn relax_value<C: Communicator>(&self, comm: &mut C, value: f64) -> Result<f64, CommError> {
        let reads = self.neighbour_values(comm, value)?;
        Ok(self.params.mix(value, reads))
    }

    /// One round on `cell`, honouring its kind.
    pub fn step<C: Communicator>(&self, comm: &mut C, cell: &mut Cell) -> Result<(), CommError> {
        let relaxed = self.relax_value(comm, cell.value)?;
        cell.commit(relaxed);
        Ok(())
    }

    /// `rounds` rounds on `cell`. The coordinator logs progress every
    /// `config.progress_interval` rounds.
    pub fn run<C: Communicator>(
        &self,
        comm: &mut C,
        cell: &mut Cell,
        rounds: u64,
        config: &EngineConfig,
    ) -> Result<(), CommError> {
        let reporter = comm.rank().is_coordinator();
        for round in 1..=rounds {
            self.step(comm, cell)?;
            if reporter && config.reports_progress(round) {
                info!(round, rounds, "relaxation progress");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toroid_comm::{launch, Transport};
    use toroid_core::GridDims;

    fn header(x: u32, y: u32, p: f64, t: u64) -> RunHeader {
        RunHeader::new(
            GridDims::new(x, y).unwrap(),
            SimulationParameters::new(p, t).unwrap(),
        )
    }

    /// Relax `cells` (rank order) on real workers and return final values.
    fn relax_all(h: RunHeader, cells: Vec<Cell>, transport: Transport) -> Vec<f64> {
        let cfg = EngineConfig::default();
        launch(cells.len(), transport, |mut comm| {
            let engine = Relaxation::new(comm.rank(), &h).unwrap();
            let mut cell = cells[comm.rank().index()];
            engine
                .run(&mut comm, &mut cell, h.params.iterations(), &cfg)
                .unwrap();
            cell.value
        })
        .unwrap()
    }

    #[test]
    fn coordinate_follows_rank() {
        let h = header(3, 4, 0.5, 1);
        let r = Relaxation::new(WorkerId(5), &h).unwrap();
        assert_eq!(r.coord(), Coord::new(1, 1));
        assert!(Relaxation::new(WorkerId(12), &h).is_err());
    }

    #[test]
    fn ring_single_step() {
        let h = header(4, 1, 0.5, 1);
        let cells = vec![
            Cell::free(1.0),
            Cell::free(0.0),
            Cell::free(0.0),
            Cell::free(0.0),
        ];
        for transport in [Transport::Unbounded, Transport::RENDEZVOUS] {
            let out = relax_all(h, cells.clone(), transport);
            assert_eq!(out, vec![0.75, 0.125, 0.0, 0.125]);
        }
    }

    #[test]
    fn neighbour_reads_are_cardinal() {
        // 3x3 with value = rank; the centre reads up, down, left, right.
        let h = header(3, 3, 0.5, 1);
        let reads = launch(9, Transport::RENDEZVOUS, |mut comm| {
            let engine = Relaxation::new(comm.rank(), &h).unwrap();
            let own = comm.rank().index() as f64;
            engine.neighbour_values(&mut comm, own).unwrap()
        })
        .unwrap();
        // Centre (1,1) is rank 4: up (0,1)=1, down (2,1)=7, left (1,0)=3, right (1,2)=5.
        assert_eq!(reads[4], [1.0, 7.0, 3.0, 5.0]);
        // Corner (0,0) wraps: up (2,0)=6, down (1,0)=3, left (0,2)=2, right (0,1)=1.
        assert_eq!(reads[0], [6.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn fixed_cell_holds_value() {
        let h = header(3, 3, 1.0, 25);
        let mut cells = vec![Cell::free(0.0); 9];
        cells[4] = Cell::fixed(10.0);
        let out = relax_all(h, cells, Transport::Unbounded);
        assert_eq!(out[4], 10.0);
        assert!(out.iter().all(|v| (0.0..=10.0).contains(v)));
    }

    #[test]
    fn zero_coefficient_is_identity() {
        let h = header(2, 3, 0.0, 9);
        let cells: Vec<Cell> = (0..6).map(|i| Cell::free(i as f64 * 1.5)).collect();
        let out = relax_all(h, cells.clone(), Transport::RENDEZVOUS);
        let expected: Vec<f64> = cells.iter().map(|c| c.value).collect();
        assert_eq!(out, expected);
    }
}
