//! Selection state: an ordered, duplicate-free set of stroke ids.

use crate::stroke::StrokeId;

/// The current selection. Order is insertion order, which the UI uses to
/// pick the "last selected" stroke for the floating toolbar.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: Vec<StrokeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection wholesale.
    pub fn set(&mut self, ids: Vec<StrokeId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Add an id if not already selected.
    pub fn add(&mut self, id: StrokeId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Remove an id if present.
    pub fn remove(&mut self, id: StrokeId) {
        self.ids.retain(|&sid| sid != id);
    }

    /// Toggle membership without touching the rest of the selection.
    pub fn toggle(&mut self, id: StrokeId) {
        if self.ids.contains(&id) {
            self.remove(id);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: StrokeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[StrokeId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
