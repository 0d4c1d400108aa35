//! Global run parameters broadcast once by the coordinator.

use crate::error::ConfigError;
use crate::id::GridDims;

/// Diffusion coefficient and iteration count.
///
/// Broadcast once before any relaxation and immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    p: f64,
    t: u64,
}

impl SimulationParameters {
    /// Create parameters, rejecting a coefficient outside `[0, 1]`.
    pub fn new(p: f64, t: u64) -> Result<Self, ConfigError> {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidCoefficient { value: p });
        }
        Ok(Self { p, t })
    }

    /// Weight given to the neighbour average each round.
    pub fn coefficient(&self) -> f64 {
        self.p
    }

    /// Number of relaxation rounds (or operator exponent).
    pub fn iterations(&self) -> u64 {
        self.t
    }

    /// One application of the relaxation rule to `value` given its four
    /// directional neighbour reads.
    ///
    /// ```
    /// use toroid_core::SimulationParameters;
    ///
    /// let params = SimulationParameters::new(0.5, 1).unwrap();
    /// assert_eq!(params.mix(1.0, [0.0, 0.0, 1.0, 1.0]), 0.75);
    /// ```
    pub fn mix(&self, value: f64, neighbours: [f64; 4]) -> f64 {
        let [up, down, left, right] = neighbours;
        (1.0 - self.p) * value + self.p * (up + down + left + right) / 4.0
    }
}

/// Everything the coordinator broadcasts at startup: grid shape and
/// simulation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunHeader {
    /// Grid extent.
    pub dims: GridDims,
    /// Diffusion coefficient and iteration count.
    pub params: SimulationParameters,
}

impl RunHeader {
    /// Bundle validated dimensions and parameters.
    pub fn new(dims: GridDims, params: SimulationParameters) -> Self {
        Self { dims, params }
    }
}
