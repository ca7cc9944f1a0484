//! Working set of selected items.

use bmcp_core::ItemId;

use crate::state::SolutionState;

/// Unordered list of the selected items with O(1) removal by position.
///
/// Removal moves the last entry into the freed slot, so positions are only
/// stable until the next removal.
#[derive(Debug, Clone, Default)]
pub struct InSolutionSet {
    items: Vec<ItemId>,
}

impl InSolutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refills the set with the selected items of `state`, in index order.
    pub fn rebuild_from(&mut self, state: &SolutionState) {
        self.items.clear();
        self.items.extend(state.selected_items());
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn insert(&mut self, item: ItemId) {
        self.items.push(item);
    }

    /// Removes the entry at `index` and returns it.
    pub fn swap_remove(&mut self, index: usize) -> ItemId {
        self.items.swap_remove(index)
    }

    #[inline]
    pub fn get(&self, index: usize) -> ItemId {
        self.items[index]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmcp_test::fixtures::three_item_instance;

    #[test]
    fn test_swap_remove_moves_last_entry() {
        let mut set = InSolutionSet::new();
        set.insert(4);
        set.insert(7);
        set.insert(9);

        assert_eq!(set.swap_remove(0), 4);
        assert_eq!(set.as_slice(), &[9, 7]);
        assert_eq!(set.swap_remove(1), 7);
        assert_eq!(set.as_slice(), &[9]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_rebuild_from_state() {
        let instance = three_item_instance();
        let state = SolutionState::from_selection(&instance, &[true, false, true]);
        let mut set = InSolutionSet::new();
        set.insert(1);
        set.rebuild_from(&state);
        assert_eq!(set.as_slice(), &[0, 2]);

        set.clear();
        assert!(set.is_empty());
    }
}
