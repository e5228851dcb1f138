//! Selected-item set.
//!
//! The selection stores item ids only, never items or other selections, so an item
//! collection can never end up containing itself.

use crate::items::{Item, ItemId};
use crate::scene::Scene;
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Drag-start snapshot of one selected item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedItem {
    pub ref_id: ItemId,
    pub original_position: Point,
    pub original_angle: f64,
    pub original_scale: Vec2,
}

impl SelectedItem {
    pub fn capture(item: &Item) -> Self {
        let placement = item.placement();
        Self {
            ref_id: item.id(),
            original_position: placement.position,
            original_angle: placement.angle,
            original_scale: placement.scale,
        }
    }
}

/// The current selection, in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    entries: HashMap<ItemId, SelectedItem>,
    order: Vec<ItemId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    pub fn get(&self, id: ItemId) -> Option<&SelectedItem> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedItem> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Add an item. Ids missing from the scene and already-selected ids are ignored.
    pub fn add(&mut self, scene: &Scene, id: ItemId) -> bool {
        if self.contains(id) {
            return false;
        }
        let Some(item) = scene.get(id) else {
            log::debug!("cannot select missing item {id}");
            return false;
        };
        self.entries.insert(id, SelectedItem::capture(item));
        self.order.push(id);
        true
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        if self.entries.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|&selected| selected != id);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Replace the selection with the given ids.
    pub fn replace(&mut self, scene: &Scene, ids: impl IntoIterator<Item = ItemId>) {
        self.clear();
        for id in ids {
            self.add(scene, id);
        }
    }

    /// Apply the pointer-down selection rules for a hit-test result.
    ///
    /// - no hit, no shift: clear
    /// - hit on an unselected item: replace, or add with shift
    /// - hit on a selected item: unchanged
    ///
    /// Returns whether the selection changed.
    pub fn apply_click(&mut self, scene: &Scene, hit: Option<ItemId>, shift: bool) -> bool {
        match hit {
            None if shift => false,
            None => {
                let changed = !self.is_empty();
                self.clear();
                changed
            }
            Some(id) if self.contains(id) => false,
            Some(id) if shift => self.add(scene, id),
            Some(id) => {
                if !scene.contains(id) {
                    return false;
                }
                self.clear();
                self.add(scene, id)
            }
        }
    }

    /// Refresh every snapshot from the committed item state and drop ids that no
    /// longer exist.
    pub fn resnapshot(&mut self, scene: &Scene) {
        self.order.retain(|id| scene.contains(*id));
        self.entries.retain(|id, _| scene.contains(*id));
        for (id, entry) in self.entries.iter_mut() {
            if let Some(item) = scene.get(*id) {
                *entry = SelectedItem::capture(item);
            }
        }
    }
}
