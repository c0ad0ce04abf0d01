//! Batch-action selection
//!
//! Tracks which todos are marked for a batch share. Membership is keyed
//! by id, never by reference, so a selection stays meaningful when the
//! mirror it was drawn from is replaced wholesale.

use std::collections::BTreeSet;

use crate::models::Todo;

/// The set of todos currently marked for a batch action
///
/// Invariant: always a subset of the current mirror's ids. The empty set
/// is a valid, common state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: BTreeSet<i64>,
}

impl Selection {
    /// Mark the id if unmarked, unmark it if marked
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.ids.insert(id) {
            return true;
        }
        self.ids.remove(&id);
        false
    }

    /// Whether the id is currently selected
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Drop every member whose id no longer appears in the mirror
    ///
    /// Members disappear silently: a todo deleted elsewhere is simply no
    /// longer selected. Must run after the mirror swap, not before.
    pub fn retain_present(&mut self, todos: &[Todo]) {
        self.ids.retain(|id| todos.iter().any(|t| t.id == *id));
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }

    /// Number of selected todos
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unmark everything
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
