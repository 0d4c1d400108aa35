//! Operator power by distributed repeated squaring.
//!
//! Every worker holds one coefficient `z(c)` of the kernel `A^k δ₀`, where
//! `A` is the relaxation operator and `δ₀` the unit impulse at the origin.
//! Because `A` commutes with every shift of the torus, the field after
//! `t` steps of any free initial state is the superposition of shifted
//! copies of `A^t δ₀`.
//!
//! Squaring convolves the kernel with itself:
//!
//! ```text
//! z'(c) = Σ_d z(d) · z(c - d)
//! ```
//!
//! For each offset `d` the owner of `d` broadcasts `z(d)` and every worker
//! reads `z(c - d)` through one exchange. Offsets whose broadcast weight
//! is zero are skipped by every worker alike.

use toroid_comm::{CommError, Communicator};
use toroid_core::Coord;
use tracing::debug;

use crate::relax::Relaxation;

/// One worker's coefficient of the kernel `A^k δ₀`.
#[derive(Clone, Debug)]
pub struct OperatorPower {
    relax: Relaxation,
    coefficient: f64,
    exponent: u64,
    squarings: u64,
    steps: u64,
}

impl OperatorPower {
    /// The identity kernel: 1 at the origin, 0 elsewhere.
    pub fn identity(relax: Relaxation) -> Self {
        let coefficient = if relax.torus().normalize(relax.coord()) == Coord::ORIGIN {
            1.0
        } else {
            0.0
        };
        Self {
            relax,
            coefficient,
            exponent: 0,
            squarings: 0,
            steps: 0,
        }
    }

    /// This worker's coefficient `z(c)`.
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Current power `k`.
    pub fn exponent(&self) -> u64 {
        self.exponent
    }

    /// Squarings plus single steps applied so far.
    pub fn rounds(&self) -> u64 {
        self.squarings + self.steps
    }

    /// The underlying single-step operator.
    pub fn relaxation(&self) -> &Relaxation {
        &self.relax
    }

    /// `A^k δ₀` becomes `A^2k δ₀`.
    ///
    /// Squaring the identity is a no-op and joins no communication.
    pub fn square<C: Communicator>(&mut self, comm: &mut C) -> Result<(), CommError> {
        if self.exponent == 0 {
            return Ok(());
        }
        let torus = *self.relax.torus();
        let coord = self.relax.coord();
        let mut next = 0.0;
        for offset in torus.canonical_ordering() {
            let root = torus.worker_of(offset);
            let own = comm.is_root(root).then_some(self.coefficient);
            let weight = comm.broadcast(root, own)?;
            if weight == 0.0 {
                continue;
            }
            let pair = torus.exchange_pair(coord, -offset);
            let shifted = comm.exchange(pair.send_to, pair.recv_from, self.coefficient)?;
            next += weight * shifted;
        }
        self.coefficient = next;
        self.exponent *= 2;
        self.squarings += 1;
        Ok(())
    }

    /// `A^k δ₀` becomes `A^(k+1) δ₀`.
    pub fn step<C: Communicator>(&mut self, comm: &mut C) -> Result<(), CommError> {
        self.coefficient = self.relax.relax_value(comm, self.coefficient)?;
        self.exponent += 1;
        self.steps += 1;
        Ok(())
    }

    /// Binary exponentiation, most significant bit first: square, then
    /// step when the bit is set. Starting from the identity this leaves
    /// `exponent() == t` after at most `2 * log2(t)` rounds.
    pub fn raise<C: Communicator>(&mut self, comm: &mut C, t: u64) -> Result<(), CommError> {
        let reporter = comm.rank().is_coordinator();
        for bit in (0..u64::BITS - t.leading_zeros()).rev() {
            self.square(comm)?;
            if (t >> bit) & 1 == 1 {
                self.step(comm)?;
            }
            if reporter {
                debug!(exponent = self.exponent, target = t, "operator power doubled");
            }
        }
        Ok(())
    }

    /// Value at this worker of the kernel shifted to `target`, that is
    /// `z(c - target)`. One exchange; every worker must call it with the
    /// same target.
    pub fn impulse_response<C: Communicator>(
        &self,
        comm: &mut C,
        target: Coord,
    ) -> Result<f64, CommError> {
        let torus = self.relax.torus();
        let pair = torus.exchange_pair(self.relax.coord(), -torus.normalize(target));
        comm.exchange(pair.send_to, pair.recv_from, self.coefficient)
    }
}

/// Running sum of impulse responses at one worker.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Superposition {
    value: f64,
}

impl Superposition {
    /// Empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated value at this worker.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Add `magnitude` times the kernel shifted to `target`.
    pub fn inject<C: Communicator>(
        &mut self,
        power: &OperatorPower,
        comm: &mut C,
        target: Coord,
        magnitude: f64,
    ) -> Result<(), CommError> {
        self.value += magnitude * power.impulse_response(comm, target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use toroid_comm::{launch, Transport};
    use toroid_core::{Cell, GridDims, RunHeader, SimulationParameters};

    fn header(x: u32, y: u32, p: f64, t: u64) -> RunHeader {
        RunHeader::new(
            GridDims::new(x, y).unwrap(),
            SimulationParameters::new(p, t).unwrap(),
        )
    }

    /// Kernel `A^t δ₀` in rank order, computed by operator power.
    fn kernel(h: RunHeader, transport: Transport) -> Vec<(f64, u64)> {
        launch(h.dims.cell_count(), transport, |mut comm| {
            let relax = Relaxation::new(comm.rank(), &h).unwrap();
            let mut power = OperatorPower::identity(relax);
            power.raise(&mut comm, h.params.iterations()).unwrap();
            (power.coefficient(), power.exponent())
        })
        .unwrap()
    }

    /// Kernel `A^t δ₀` in rank order, computed by `t` single rounds.
    fn stepped(h: RunHeader) -> Vec<f64> {
        let cfg = EngineConfig::default();
        launch(h.dims.cell_count(), Transport::Unbounded, |mut comm| {
            let relax = Relaxation::new(comm.rank(), &h).unwrap();
            let mut cell = Cell::free(if comm.rank().index() == 0 { 1.0 } else { 0.0 });
            relax
                .run(&mut comm, &mut cell, h.params.iterations(), &cfg)
                .unwrap();
            cell.value
        })
        .unwrap()
    }

    #[test]
    fn identity_at_origin_only() {
        let out = kernel(header(3, 2, 0.5, 0), Transport::Unbounded);
        let coeffs: Vec<f64> = out.iter().map(|o| o.0).collect();
        assert_eq!(coeffs, vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(out.iter().all(|o| o.1 == 0));
    }

    #[test]
    fn ring_single_power() {
        let out = kernel(header(4, 1, 0.5, 1), Transport::RENDEZVOUS);
        let coeffs: Vec<f64> = out.iter().map(|o| o.0).collect();
        assert_eq!(coeffs, vec![0.75, 0.125, 0.0, 0.125]);
    }

    #[test]
    fn exponent_reaches_target() {
        for t in [1, 2, 3, 5, 6, 13] {
            let out = kernel(header(2, 2, 0.5, t), Transport::Unbounded);
            assert!(out.iter().all(|o| o.1 == t), "t = {t}");
        }
    }

    #[test]
    fn matches_single_steps() {
        for transport in [Transport::Unbounded, Transport::RENDEZVOUS] {
            for t in 1..=8 {
                let h = header(3, 3, 0.3, t);
                let fast: Vec<f64> = kernel(h, transport).into_iter().map(|o| o.0).collect();
                let slow = stepped(h);
                for (a, b) in fast.iter().zip(&slow) {
                    assert!((a - b).abs() < 1e-12, "t = {t}: {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn kernel_mass_is_one() {
        let out = kernel(header(3, 4, 0.7, 11), Transport::Unbounded);
        let total: f64 = out.iter().map(|o| o.0).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn superposed_impulses() {
        // Two impulses on a 4x1 ring after one step.
        let h = header(4, 1, 0.5, 1);
        let out = launch(4, Transport::RENDEZVOUS, |mut comm| {
            let relax = Relaxation::new(comm.rank(), &h).unwrap();
            let mut power = OperatorPower::identity(relax);
            power.raise(&mut comm, 1).unwrap();
            let mut field = Superposition::new();
            field
                .inject(&power, &mut comm, Coord::new(1, 0), 2.0)
                .unwrap();
            field
                .inject(&power, &mut comm, Coord::new(-1, 0), 1.0)
                .unwrap();
            field.value()
        })
        .unwrap();
        // 2 * [0.125, 0.75, 0.125, 0] + [0.125, 0, 0.125, 0.75]
        assert_eq!(out, vec![0.375, 1.5, 0.375, 0.75]);
    }

    #[test]
    fn extreme_targets_wrap() {
        // On a 3x1 ring both i64::MAX and i64::MIN sit at x = 1.
        let h = header(3, 1, 0.5, 1);
        let out = launch(3, Transport::RENDEZVOUS, |mut comm| {
            let relax = Relaxation::new(comm.rank(), &h).unwrap();
            let mut power = OperatorPower::identity(relax);
            power.raise(&mut comm, 1).unwrap();
            let mut field = Superposition::new();
            field
                .inject(&power, &mut comm, Coord::new(i64::MAX, 0), 2.0)
                .unwrap();
            field
                .inject(&power, &mut comm, Coord::new(i64::MIN, 0), 1.0)
                .unwrap();
            field.value()
        })
        .unwrap();
        assert_eq!(out, vec![0.375, 2.25, 0.375]);
    }
}
