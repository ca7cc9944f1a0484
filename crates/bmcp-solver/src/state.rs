//! Incremental solution state.

use bmcp_core::{ElementId, Instance, ItemId, SolutionSummary};

use crate::ledger::LedgerInconsistency;

/// Selection vector plus the coverage and contribution caches derived from it.
///
/// For a selected item, `contribution` is the profit it alone covers (what
/// removing it would lose). For an unselected item it is the profit of its
/// uncovered elements (what adding it would gain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionState {
    pub(crate) selected: Vec<bool>,
    pub(crate) coverage: Vec<u32>,
    pub(crate) contribution: Vec<i64>,
    pub(crate) weight_sum: i64,
    pub(crate) profit_sum: i64,
    pub(crate) size: usize,
}

impl SolutionState {
    /// Creates the all-unselected state for an instance.
    pub fn empty(instance: &Instance) -> Self {
        let contribution = instance
            .items()
            .map(|item| {
                instance
                    .item_neighbors(item)
                    .iter()
                    .map(|&e| instance.profit(e))
                    .sum()
            })
            .collect();
        Self {
            selected: vec![false; instance.item_count()],
            coverage: vec![0; instance.element_count()],
            contribution,
            weight_sum: 0,
            profit_sum: 0,
            size: 0,
        }
    }

    /// Recomputes every cache from a selection vector.
    pub fn from_selection(instance: &Instance, selected: &[bool]) -> Self {
        let mut coverage = vec![0u32; instance.element_count()];
        let mut weight_sum = 0;
        let mut size = 0;
        for item in instance.items().filter(|&i| selected[i]) {
            weight_sum += instance.weight(item);
            size += 1;
            for &e in instance.item_neighbors(item) {
                coverage[e] += 1;
            }
        }

        let profit_sum = instance
            .elements()
            .filter(|&e| coverage[e] > 0)
            .map(|e| instance.profit(e))
            .sum();

        let contribution = instance
            .items()
            .map(|item| {
                let wanted = if selected[item] { 1 } else { 0 };
                instance
                    .item_neighbors(item)
                    .iter()
                    .filter(|&&e| coverage[e] == wanted)
                    .map(|&e| instance.profit(e))
                    .sum()
            })
            .collect();

        Self {
            selected: selected.to_vec(),
            coverage,
            contribution,
            weight_sum,
            profit_sum,
            size,
        }
    }

    /// Overwrites this state with `other` without reallocating.
    pub fn copy_from(&mut self, other: &SolutionState) {
        self.selected.copy_from_slice(&other.selected);
        self.coverage.copy_from_slice(&other.coverage);
        self.contribution.copy_from_slice(&other.contribution);
        self.weight_sum = other.weight_sum;
        self.profit_sum = other.profit_sum;
        self.size = other.size;
    }

    #[inline]
    pub fn is_selected(&self, item: ItemId) -> bool {
        self.selected[item]
    }

    #[inline]
    pub fn coverage(&self, element: ElementId) -> u32 {
        self.coverage[element]
    }

    #[inline]
    pub fn contribution(&self, item: ItemId) -> i64 {
        self.contribution[item]
    }

    #[inline]
    pub fn weight_sum(&self) -> i64 {
        self.weight_sum
    }

    #[inline]
    pub fn profit_sum(&self) -> i64 {
        self.profit_sum
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the selected weight fits the capacity.
    #[inline]
    pub fn is_feasible(&self, capacity: i64) -> bool {
        self.weight_sum <= capacity
    }

    /// Iterates the selected items in index order.
    pub fn selected_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(item, &on)| on.then_some(item))
    }

    pub fn to_summary(&self) -> SolutionSummary {
        SolutionSummary::new(
            self.selected_items().collect(),
            self.weight_sum,
            self.profit_sum,
        )
    }

    /// Compares every cache against a recomputation from `selected`.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch found.
    pub fn audit(&self, instance: &Instance) -> Result<(), LedgerInconsistency> {
        let expected = Self::from_selection(instance, &self.selected);

        if let Some(element) = instance
            .elements()
            .find(|&e| self.coverage[e] != expected.coverage[e])
        {
            return Err(LedgerInconsistency::Coverage {
                element,
                actual: self.coverage[element],
                expected: expected.coverage[element],
            });
        }
        if let Some(item) = instance
            .items()
            .find(|&i| self.contribution[i] != expected.contribution[i])
        {
            return Err(LedgerInconsistency::Contribution {
                item,
                actual: self.contribution[item],
                expected: expected.contribution[item],
            });
        }
        if self.weight_sum != expected.weight_sum {
            return Err(LedgerInconsistency::WeightSum {
                actual: self.weight_sum,
                expected: expected.weight_sum,
            });
        }
        if self.profit_sum != expected.profit_sum {
            return Err(LedgerInconsistency::ProfitSum {
                actual: self.profit_sum,
                expected: expected.profit_sum,
            });
        }
        if self.size != expected.size {
            return Err(LedgerInconsistency::Size {
                actual: self.size,
                expected: expected.size,
            });
        }
        Ok(())
    }
}
