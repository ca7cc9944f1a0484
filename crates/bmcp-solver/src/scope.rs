//! Solver-level scope.

use std::time::{Duration, Instant};

use bmcp_config::SolverConfig;
use bmcp_core::Instance;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bandit::Bandit;
use crate::ledger::CoverageLedger;
use crate::statistics::{PhaseStats, SolverStatistics};

/// Top-level scope for one solve: the ledger, the bandit, the random
/// stream, the clock and the running statistics.
pub struct SolverScope<'a> {
    ledger: CoverageLedger<'a>,
    bandit: Bandit,
    rng: ChaCha8Rng,
    start_time: Option<Instant>,
    total_iterations: u64,
    statistics: SolverStatistics,
}

impl<'a> SolverScope<'a> {
    /// Creates a scope seeded from the OS.
    pub fn new(instance: &'a Instance) -> Self {
        Self::with_rng(instance, ChaCha8Rng::from_os_rng())
    }

    pub fn with_seed(instance: &'a Instance, seed: u64) -> Self {
        Self::with_rng(instance, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a scope seeded the way `config` asks for.
    ///
    /// An explicit `random_seed` always wins; reproducible modes fall back
    /// to seed 0.
    pub fn from_config(instance: &'a Instance, config: &SolverConfig) -> Self {
        match config.random_seed {
            Some(seed) => Self::with_seed(instance, seed),
            None if config.environment_mode.is_reproducible() => Self::with_seed(instance, 0),
            None => Self::new(instance),
        }
    }

    fn with_rng(instance: &'a Instance, rng: ChaCha8Rng) -> Self {
        Self {
            ledger: CoverageLedger::new(instance),
            bandit: Bandit::new(instance.item_count()),
            rng,
            start_time: None,
            total_iterations: 0,
            statistics: SolverStatistics::default(),
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.ledger.instance()
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_iterations = 0;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn ledger(&self) -> &CoverageLedger<'a> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut CoverageLedger<'a> {
        &mut self.ledger
    }

    pub fn bandit(&self) -> &Bandit {
        &self.bandit
    }

    pub fn bandit_mut(&mut self) -> &mut Bandit {
        &mut self.bandit
    }

    /// Reseeds the bandit statistics from the live solution.
    pub fn reset_bandit(&mut self) {
        self.bandit.reset_from(self.ledger.current());
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Draws a jittered threshold around `base`.
    pub fn jitter(&mut self, base: u64) -> i64 {
        jittered(&mut self.rng, base)
    }

    pub fn increment_iteration(&mut self) -> u64 {
        self.total_iterations += 1;
        self.total_iterations
    }

    pub fn total_iterations(&self) -> u64 {
        self.total_iterations
    }

    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut SolverStatistics {
        &mut self.statistics
    }

    /// Folds a finished phase run into the solve statistics.
    pub fn record_phase(&mut self, stats: PhaseStats) {
        self.statistics.record_phase(stats);
    }
}

impl std::fmt::Debug for SolverScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("items", &self.instance().item_count())
            .field("profit", &self.ledger.current().profit_sum())
            .field("star_profit", &self.ledger.star().profit_sum())
            .field("total_iterations", &self.total_iterations)
            .finish()
    }
}

/// `base` plus a uniform draw from `[0, floor(0.3 * base))`, or `base`
/// itself when that range is empty.
///
/// Saturates at `i64::MAX`.
pub fn jittered<R: Rng + ?Sized>(rng: &mut R, base: u64) -> i64 {
    let spread = (base as f64 * 0.3) as u64;
    let extra = if spread > 0 {
        rng.random_range(0..spread)
    } else {
        0
    };
    i64::try_from(base.saturating_add(extra)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmcp_config::EnvironmentMode;
    use bmcp_test::fixtures::three_item_instance;

    #[test]
    fn test_jitter_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let value = jittered(&mut rng, 10);
            assert!((10..13).contains(&value), "{value}");
        }
        // floor(0.3 * 3) == 0
        assert_eq!(jittered(&mut rng, 3), 3);
        assert_eq!(jittered(&mut rng, 0), 0);
    }

    #[test]
    fn test_jitter_saturates_for_huge_bases() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(jittered(&mut rng, u64::MAX), i64::MAX);
        assert_eq!(jittered(&mut rng, i64::MAX as u64 + 1), i64::MAX);
        assert!(jittered(&mut rng, 1 << 40) >= 1 << 40);
    }

    #[test]
    fn test_seeded_scopes_share_a_stream() {
        let instance = three_item_instance();
        let config = SolverConfig::new().with_random_seed(42);
        let mut a = SolverScope::from_config(&instance, &config);
        let mut b = SolverScope::with_seed(&instance, 42);
        let xs: Vec<i64> = (0..20).map(|_| a.jitter(100)).collect();
        let ys: Vec<i64> = (0..20).map(|_| b.jitter(100)).collect();
        assert_eq!(xs, ys);

        let config = SolverConfig::new().with_environment_mode(EnvironmentMode::Reproducible);
        let mut c = SolverScope::from_config(&instance, &config);
        let mut d = SolverScope::with_seed(&instance, 0);
        assert_eq!(c.jitter(100), d.jitter(100));
    }

    #[test]
    fn test_clock_and_counters() {
        let instance = three_item_instance();
        let mut scope = SolverScope::with_seed(&instance, 0);
        assert!(scope.elapsed().is_none());
        scope.start_solving();
        assert!(scope.elapsed().is_some());
        assert_eq!(scope.increment_iteration(), 1);
        assert_eq!(scope.total_iterations(), 1);
    }
}
