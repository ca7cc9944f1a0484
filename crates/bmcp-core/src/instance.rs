//! Immutable BMCP instance.
//!
//! An instance is a bipartite graph between *items* (weighted, subject to
//! the capacity budget) and *elements* (carrying a profit that is credited
//! once when any adjacent item is selected). Both adjacency views are kept
//! sorted and duplicate-free, and are mutual inverses.

use std::ops::Range;

use crate::error::{BmcpError, Result};
use crate::summary::SolutionSummary;

/// Handle of an item, an index into the item arrays.
pub type ItemId = usize;

/// Handle of an element, an index into the element arrays.
pub type ElementId = usize;

/// A Budgeted Maximum Coverage instance.
///
/// # Examples
///
/// ```
/// use bmcp_core::Instance;
///
/// // item 0 covers element 0, item 1 covers both, item 2 covers element 1
/// let instance = Instance::from_adjacency(
///     5,
///     vec![2, 3, 4],
///     vec![5, 5],
///     vec![vec![0], vec![0, 1], vec![1]],
/// ).unwrap();
///
/// assert_eq!(instance.item_count(), 3);
/// assert_eq!(instance.element_neighbors(1), &[1, 2]);
/// assert_eq!(instance.evaluate(&[1]).unwrap().profit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Instance {
    capacity: i64,
    weight: Vec<i64>,
    profit: Vec<i64>,
    item_neighbor: Vec<Vec<ElementId>>,
    element_neighbor: Vec<Vec<ItemId>>,
}

impl Instance {
    /// Builds an instance from per-item adjacency lists.
    ///
    /// `item_neighbor[i]` lists the elements covered by item `i`; the
    /// inverse view is derived.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative capacity, weight or profit, or an
    /// element id out of range.
    pub fn from_adjacency(
        capacity: i64,
        weight: Vec<i64>,
        profit: Vec<i64>,
        item_neighbor: Vec<Vec<ElementId>>,
    ) -> Result<Self> {
        let mut builder = InstanceBuilder::new(capacity);
        for w in weight {
            builder.add_item(w);
        }
        for p in profit {
            builder.add_element(p);
        }
        for (item, elements) in item_neighbor.into_iter().enumerate() {
            for element in elements {
                builder.cover(item, element);
            }
        }
        builder.build()
    }

    /// Returns the number of items (`m`).
    pub fn item_count(&self) -> usize {
        self.weight.len()
    }

    /// Returns the number of elements (`n`).
    pub fn element_count(&self) -> usize {
        self.profit.len()
    }

    /// Returns the capacity bound `C`.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    #[inline]
    pub fn weight(&self, item: ItemId) -> i64 {
        self.weight[item]
    }

    #[inline]
    pub fn profit(&self, element: ElementId) -> i64 {
        self.profit[element]
    }

    /// Elements covered by `item`, ascending.
    #[inline]
    pub fn item_neighbors(&self, item: ItemId) -> &[ElementId] {
        &self.item_neighbor[item]
    }

    /// Items covering `element`, ascending.
    #[inline]
    pub fn element_neighbors(&self, element: ElementId) -> &[ItemId] {
        &self.element_neighbor[element]
    }

    pub fn items(&self) -> Range<ItemId> {
        0..self.item_count()
    }

    pub fn elements(&self) -> Range<ElementId> {
        0..self.element_count()
    }

    /// Sum of all element profits, an upper bound on any solution.
    pub fn total_profit(&self) -> i64 {
        self.profit.iter().sum()
    }

    /// Sum of all item weights.
    pub fn total_weight(&self) -> i64 {
        self.weight.iter().sum()
    }

    /// Number of item/element incidences.
    pub fn edge_count(&self) -> usize {
        self.item_neighbor.iter().map(Vec::len).sum()
    }

    /// Evaluates a set of selected items from scratch.
    ///
    /// The summary's `items` are sorted. Feasibility is not checked here;
    /// compare `weight` against [`capacity`](Self::capacity) or use
    /// [`SolutionSummary::is_feasible`].
    ///
    /// # Errors
    ///
    /// Returns an error for an item out of range or listed twice.
    pub fn evaluate(&self, items: &[ItemId]) -> Result<SolutionSummary> {
        let mut selected = vec![false; self.item_count()];
        let mut covered = vec![false; self.element_count()];
        let mut weight = 0;
        for &item in items {
            if item >= self.item_count() {
                return Err(BmcpError::ItemOutOfRange {
                    item,
                    count: self.item_count(),
                });
            }
            if selected[item] {
                return Err(BmcpError::DuplicateItem(item));
            }
            selected[item] = true;
            weight += self.weight[item];
            for &element in &self.item_neighbor[item] {
                covered[element] = true;
            }
        }
        let profit = self
            .elements()
            .filter(|&e| covered[e])
            .map(|e| self.profit[e])
            .sum();
        let items = self.items().filter(|&i| selected[i]).collect();
        Ok(SolutionSummary::new(items, weight, profit))
    }
}

/// Incremental builder for [`Instance`].
///
/// # Examples
///
/// ```
/// use bmcp_core::InstanceBuilder;
///
/// let mut builder = InstanceBuilder::new(4);
/// let item = builder.add_item(4);
/// let element = builder.add_element(7);
/// builder.cover(item, element);
///
/// let instance = builder.build().unwrap();
/// assert_eq!(instance.item_neighbors(item), &[element]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    capacity: i64,
    weight: Vec<i64>,
    profit: Vec<i64>,
    edges: Vec<(ItemId, ElementId)>,
}

impl InstanceBuilder {
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Adds an item and returns its id.
    pub fn add_item(&mut self, weight: i64) -> ItemId {
        self.weight.push(weight);
        self.weight.len() - 1
    }

    /// Adds an element and returns its id.
    pub fn add_element(&mut self, profit: i64) -> ElementId {
        self.profit.push(profit);
        self.profit.len() - 1
    }

    /// Records that `item` covers `element`. Duplicates are ignored.
    pub fn cover(&mut self, item: ItemId, element: ElementId) -> &mut Self {
        self.edges.push((item, element));
        self
    }

    /// Validates and freezes the instance.
    pub fn build(self) -> Result<Instance> {
        if self.capacity < 0 {
            return Err(BmcpError::NegativeCapacity(self.capacity));
        }
        if let Some((item, &weight)) = self.weight.iter().enumerate().find(|(_, w)| **w < 0) {
            return Err(BmcpError::NegativeWeight { item, weight });
        }
        if let Some((element, &profit)) = self.profit.iter().enumerate().find(|(_, p)| **p < 0) {
            return Err(BmcpError::NegativeProfit { element, profit });
        }

        let m = self.weight.len();
        let n = self.profit.len();
        let mut item_neighbor = vec![Vec::new(); m];
        let mut element_neighbor = vec![Vec::new(); n];
        for (item, element) in self.edges {
            if item >= m {
                return Err(BmcpError::ItemOutOfRange { item, count: m });
            }
            if element >= n {
                return Err(BmcpError::ElementOutOfRange { element, count: n });
            }
            item_neighbor[item].push(element);
            element_neighbor[element].push(item);
        }
        for list in item_neighbor.iter_mut().chain(element_neighbor.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        Ok(Instance {
            capacity: self.capacity,
            weight: self.weight,
            profit: self.profit,
            item_neighbor,
            element_neighbor,
        })
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
