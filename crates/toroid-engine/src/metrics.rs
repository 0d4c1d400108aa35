//! Per-run counters reported by the coordinator.

use toroid_comm::CommStats;

/// Work done by a run, as seen from the coordinator.
///
/// Communication counts are the coordinator's own; every worker joins the
/// same collectives and the same number of exchanges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Relaxation rounds applied: `t` for relaxation, single steps plus
    /// squarings for operator power.
    pub rounds: u64,
    /// Point-to-point exchanges joined.
    pub exchanges: u64,
    /// Broadcasts joined.
    pub broadcasts: u64,
    /// Gathers joined.
    pub gathers: u64,
    /// Wall-clock time from startup broadcast to the last answer, in
    /// microseconds.
    pub elapsed_us: u64,
}

impl RunMetrics {
    pub(crate) fn from_stats(rounds: u64, stats: CommStats, elapsed_us: u64) -> Self {
        Self {
            rounds,
            exchanges: stats.exchanges,
            broadcasts: stats.broadcasts,
            gathers: stats.gathers,
            elapsed_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.rounds, 0);
        assert_eq!(m.exchanges, 0);
        assert_eq!(m.elapsed_us, 0);
    }

    #[test]
    fn copies_comm_counters() {
        let stats = CommStats {
            exchanges: 40,
            broadcasts: 2,
            scatters: 1,
            gathers: 1,
            messages_sent: 50,
        };
        let m = RunMetrics::from_stats(10, stats, 7);
        assert_eq!(m.rounds, 10);
        assert_eq!(m.exchanges, 40);
        assert_eq!(m.broadcasts, 2);
        assert_eq!(m.gathers, 1);
        assert_eq!(m.elapsed_us, 7);
    }
}
