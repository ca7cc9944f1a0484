//! Upper-confidence-bound statistics for escaping local optima.

use bmcp_core::ItemId;

use crate::state::SolutionState;

/// Per-item reward totals and pick counts.
///
/// Persists across phase runs within one solve; only the constructor resets
/// it.
#[derive(Debug, Clone, Default)]
pub struct Bandit {
    select_times: Vec<u64>,
    reward_sum: Vec<f64>,
}

impl Bandit {
    pub fn new(item_count: usize) -> Self {
        Self {
            select_times: vec![0; item_count],
            reward_sum: vec![0.0; item_count],
        }
    }

    /// Seeds the statistics from a constructed solution: selected items count
    /// as picked once and every item starts with its contribution as reward.
    pub fn reset_from(&mut self, state: &SolutionState) {
        for (item, (times, reward)) in self
            .select_times
            .iter_mut()
            .zip(self.reward_sum.iter_mut())
            .enumerate()
        {
            *times = u64::from(state.is_selected(item));
            *reward = state.contribution(item) as f64;
        }
    }

    /// Mean reward of an item. Never-picked items divide by one.
    pub fn ucb(&self, item: ItemId) -> f64 {
        self.reward_sum[item] / self.select_times[item].max(1) as f64
    }

    pub fn record(&mut self, item: ItemId, reward: f64) {
        self.reward_sum[item] += reward;
        self.select_times[item] += 1;
    }

    pub fn select_times(&self, item: ItemId) -> u64 {
        self.select_times[item]
    }

    pub fn reward_sum(&self, item: ItemId) -> f64 {
        self.reward_sum[item]
    }
}

/// Reward for adding an item that overshoots the capacity: its contribution
/// per unit of overshoot.
///
/// A zero overshoot counts as one. An item that still fits has a negative
/// overshoot and earns a negative reward.
pub fn overshoot_reward(contribution: i64, weight_sum: i64, weight: i64, capacity: i64) -> f64 {
    let overshoot = match weight_sum + weight - capacity {
        0 => 1,
        overshoot => overshoot,
    };
    contribution as f64 / overshoot as f64
}
