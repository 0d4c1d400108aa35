//! Engine configuration and validation.
//!
//! [`EngineConfig`] selects the solving [`Strategy`], the message
//! [`Transport`], and how often the coordinator reports progress.
//! [`validate()`](EngineConfig::validate) runs before any worker starts.

use std::fmt;

use toroid_comm::Transport;
use toroid_core::ConfigError;

// ── Strategy ───────────────────────────────────────────────────────

/// How the engine computes the field after `t` steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `t` rounds of the 4-neighbour rule. Honours fixed cells.
    #[default]
    Relaxation,
    /// Distributed repeated squaring of the relaxation operator, then
    /// impulse superposition. Every cell is treated as free.
    OperatorPower,
}

impl Strategy {
    /// Short name used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Relaxation => "relaxation",
            Self::OperatorPower => "operator-power",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Run-wide settings that do not come from the input stream.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Solving strategy. Default: [`Strategy::Relaxation`].
    pub strategy: Strategy,
    /// Inbox buffering between workers. Default: unbounded.
    pub transport: Transport,
    /// Rounds between coordinator progress events. Default: 100.
    pub progress_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Relaxation,
            transport: Transport::Unbounded,
            progress_interval: 100,
        }
    }
}

impl EngineConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progress_interval == 0 {
            return Err(ConfigError::ZeroProgressInterval);
        }
        Ok(())
    }

    /// Whether round `completed` (1-based) should emit a progress event.
    pub(crate) fn reports_progress(&self, completed: u64) -> bool {
        self.progress_interval != 0 && completed % self.progress_interval == 0
    }
}
