//! Final solution summary.

use std::fmt;

use crate::instance::{Instance, ItemId};

/// Selected items together with their total weight and covered profit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionSummary {
    /// Selected item ids, ascending.
    pub items: Vec<ItemId>,
    /// Total weight of the selected items.
    pub weight: i64,
    /// Sum of profits of covered elements.
    pub profit: i64,
}

impl SolutionSummary {
    pub fn new(items: Vec<ItemId>, weight: i64, profit: i64) -> Self {
        Self {
            items,
            weight,
            profit,
        }
    }

    /// Number of selected items.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the weight fits the instance's capacity.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        self.weight <= instance.capacity()
    }
}

/// Formats as `profit weight size`.
impl fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.profit, self.weight, self.size())
    }
}
