//! Solver statistics.
//!
//! Phases fill a [`PhaseStats`] per run; the scope folds each run into
//! [`SolverStatistics`], which aggregates by phase type so the totals stay
//! small however many outer iterations run.

use std::time::{Duration, Instant};

use crate::event::ProgressRecord;

/// Counters for one phase run.
///
/// # Example
///
/// ```
/// use bmcp_solver::statistics::PhaseStats;
///
/// let mut stats = PhaseStats::new(1, "CcSearch");
/// stats.record_step();
/// stats.record_addition();
/// stats.record_removal();
///
/// assert_eq!(stats.phase_type, "CcSearch");
/// assert_eq!(stats.step_count, 1);
/// assert_eq!(stats.toggles(), 2);
/// ```
#[derive(Debug)]
pub struct PhaseStats {
    /// Position of the phase in the solve sequence (0-based).
    pub phase_index: usize,
    /// Type name of the phase.
    pub phase_type: &'static str,
    start_time: Instant,
    pub step_count: u64,
    pub additions: u64,
    pub removals: u64,
    /// Strict improvements of the phase's best snapshot.
    pub improvements: u64,
}

impl PhaseStats {
    pub fn new(phase_index: usize, phase_type: &'static str) -> Self {
        Self {
            phase_index,
            phase_type,
            start_time: Instant::now(),
            step_count: 0,
            additions: 0,
            removals: 0,
            improvements: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    pub fn record_addition(&mut self) {
        self.additions += 1;
    }

    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Records a best-snapshot update if `improved`.
    pub fn record_best(&mut self, improved: bool) {
        if improved {
            self.improvements += 1;
        }
    }

    pub fn toggles(&self) -> u64 {
        self.additions + self.removals
    }
}

/// Totals for every run of one phase type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTotals {
    pub phase_type: &'static str,
    pub runs: u64,
    pub steps: u64,
    pub additions: u64,
    pub removals: u64,
    pub improvements: u64,
    pub duration: Duration,
}

impl PhaseTotals {
    fn new(phase_type: &'static str) -> Self {
        Self {
            phase_type,
            runs: 0,
            steps: 0,
            additions: 0,
            removals: 0,
            improvements: 0,
            duration: Duration::ZERO,
        }
    }
}

/// Statistics for a whole solve.
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub total_duration: Duration,
    /// Outer driver iterations.
    pub total_iterations: u64,
    /// Profit of the constructed solution.
    pub construction_profit: i64,
    /// Per phase type, in first-seen order.
    pub phases: Vec<PhaseTotals>,
    /// Every star improvement, in order.
    pub progress: Vec<ProgressRecord>,
}

impl SolverStatistics {
    pub fn record_phase(&mut self, stats: PhaseStats) {
        let duration = stats.elapsed();
        let position = match self
            .phases
            .iter()
            .position(|t| t.phase_type == stats.phase_type)
        {
            Some(position) => position,
            None => {
                self.phases.push(PhaseTotals::new(stats.phase_type));
                self.phases.len() - 1
            }
        };
        let totals = &mut self.phases[position];
        totals.runs += 1;
        totals.steps += stats.step_count;
        totals.additions += stats.additions;
        totals.removals += stats.removals;
        totals.improvements += stats.improvements;
        totals.duration += duration;
    }

    pub fn record_progress(&mut self, record: ProgressRecord) {
        self.progress.push(record);
    }

    /// Totals for one phase type, if it ever ran.
    pub fn phase(&self, phase_type: &str) -> Option<&PhaseTotals> {
        self.phases.iter().find(|t| t.phase_type == phase_type)
    }

    /// Profit of the last star improvement.
    pub fn final_profit(&self) -> Option<i64> {
        self.progress.last().map(|r| r.profit)
    }

    pub fn toggles_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs > 0.0 {
            let toggles: u64 = self.phases.iter().map(|t| t.additions + t.removals).sum();
            toggles as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_phase_aggregates_by_type() {
        let mut statistics = SolverStatistics::default();

        let mut run = PhaseStats::new(1, "CcSearch");
        run.record_step();
        run.record_addition();
        run.record_best(true);
        statistics.record_phase(run);

        let mut run = PhaseStats::new(2, "DeepOptimize");
        run.record_removal();
        run.record_best(false);
        statistics.record_phase(run);

        let mut run = PhaseStats::new(1, "CcSearch");
        run.record_step();
        run.record_step();
        statistics.record_phase(run);

        assert_eq!(statistics.phases.len(), 2);
        let cc = statistics.phase("CcSearch").unwrap();
        assert_eq!(cc.runs, 2);
        assert_eq!(cc.steps, 3);
        assert_eq!(cc.additions, 1);
        assert_eq!(cc.improvements, 1);
        assert_eq!(statistics.phase("DeepOptimize").unwrap().removals, 1);
        assert!(statistics.phase("Construction").is_none());
    }

    #[test]
    fn test_final_profit() {
        let mut statistics = SolverStatistics::default();
        assert_eq!(statistics.final_profit(), None);
        statistics.record_progress(ProgressRecord::new(0.1, 0, 4));
        statistics.record_progress(ProgressRecord::new(0.2, 3, 9));
        assert_eq!(statistics.final_profit(), Some(9));
        assert_eq!(statistics.toggles_per_second(), 0.0);
    }
}
