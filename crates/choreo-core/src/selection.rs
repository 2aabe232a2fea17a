//! Selection set for dancers on the stage.

use crate::scene::{EntityId, EntityStore};

/// Ordered set of selected entity ids.
///
/// Ids are unique and kept in insertion order. Every mutation updates the
/// entity's selected look through [`EntityStore::set_selected_visual`], so
/// membership and the visual flag never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<EntityId>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the selection.
    /// Returns true if the selection changed.
    pub fn add(&mut self, id: EntityId, store: &mut dyn EntityStore) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        store.set_selected_visual(id, true);
        true
    }

    /// Remove an entity from the selection.
    /// Returns true if the selection changed.
    pub fn remove(&mut self, id: EntityId, store: &mut dyn EntityStore) -> bool {
        let Some(index) = self.ids.iter().position(|&selected| selected == id) else {
            return false;
        };
        self.ids.remove(index);
        store.set_selected_visual(id, false);
        true
    }

    /// Remove the entity if selected, add it otherwise.
    pub fn toggle(&mut self, id: EntityId, store: &mut dyn EntityStore) {
        if !self.remove(id, store) {
            self.add(id, store);
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self, store: &mut dyn EntityStore) {
        for id in self.ids.drain(..) {
            store.set_selected_visual(id, false);
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    /// The earliest selected entity still in the set.
    pub fn first(&self) -> Option<EntityId> {
        self.ids.first().copied()
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in insertion order.
    pub fn all(&self) -> impl Iterator<Item = EntityId> + Clone + '_ {
        self.ids.iter().copied()
    }
}
