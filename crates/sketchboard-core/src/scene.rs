//! Item collection and hit-testing.

use crate::items::{Item, ItemId, PropsPatch, UNSET_Z_ORDER};
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// All items on the board, keyed by id.
///
/// Paint order is insertion order, stably re-sorted by `z_order`; items with an
/// unset z-order (`-1`) paint below every item with an explicit one. Once any item
/// carries an explicit z-order, newly inserted items are stacked on top of it.
#[derive(Debug, Default)]
pub struct Scene {
    items: HashMap<ItemId, Item>,
    /// Insertion order (back to front among equal z-orders).
    order: Vec<ItemId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. An item with the same id is replaced in place.
    pub fn insert(&mut self, mut item: Item) -> ItemId {
        let id = item.id();
        if item.z_order() == UNSET_Z_ORDER && !self.items.contains_key(&id) {
            if let Some(top) = self.top_z_order() {
                item.set_props(&PropsPatch {
                    z_order: Some(top + 1),
                    ..Default::default()
                });
            }
        }
        if let Some(mut previous) = self.items.insert(id, item) {
            log::debug!("replacing item {id}");
            previous.destroy();
        } else {
            self.order.push(id);
        }
        id
    }

    /// Remove and destroy an item. Missing ids are ignored.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let mut item = self.items.remove(&id)?;
        self.order.retain(|&item_id| item_id != id);
        item.destroy();
        Some(item)
    }

    pub fn clear(&mut self) {
        for item in self.items.values_mut() {
            item.destroy();
        }
        self.items.clear();
        self.order.clear();
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Highest explicit z-order, if any item has one.
    fn top_z_order(&self) -> Option<i32> {
        self.items
            .values()
            .map(Item::z_order)
            .filter(|&z| z != UNSET_Z_ORDER)
            .max()
    }

    /// Ids in paint order (back to front).
    pub fn paint_order(&self) -> Vec<ItemId> {
        let mut ids = self.order.clone();
        ids.sort_by_key(|id| self.items.get(id).map_or(UNSET_Z_ORDER, Item::z_order));
        ids
    }

    /// Items in paint order (back to front).
    pub fn items_ordered(&self) -> impl Iterator<Item = &Item> {
        self.paint_order()
            .into_iter()
            .filter_map(|id| self.items.get(&id))
    }

    /// Topmost interactive item under a world point.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<ItemId> {
        self.hit_test_filtered(point, tolerance, |_| true)
    }

    /// Topmost interactive item under a world point that also passes `filter`.
    pub fn hit_test_filtered(
        &self,
        point: Point,
        tolerance: f64,
        filter: impl Fn(&Item) -> bool,
    ) -> Option<ItemId> {
        self.paint_order().into_iter().rev().find(|id| {
            self.items.get(id).is_some_and(|item| {
                item.is_interactive() && filter(item) && item.hit_test(point, tolerance)
            })
        })
    }

    /// Interactive items whose bounds intersect `rect`, in paint order.
    pub fn items_in_rect(&self, rect: Rect) -> Vec<ItemId> {
        self.paint_order()
            .into_iter()
            .filter(|id| {
                self.items.get(id).is_some_and(|item| {
                    // Check if item bounds intersect with the query rect
                    item.is_interactive() && rect.intersect(item.bounds()).area() > 0.0
                })
            })
            .collect()
    }

    /// Union of the bounds of the given items. Unknown ids are skipped.
    pub fn bounds_of(&self, ids: impl IntoIterator<Item = ItemId>) -> Option<Rect> {
        ids.into_iter()
            .filter_map(|id| self.items.get(&id))
            .map(Item::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Move an item to the top of the paint order.
    ///
    /// Every item gets an explicit z-order; returns the ids whose z-order changed.
    pub fn bring_to_front(&mut self, id: ItemId) -> Vec<ItemId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut ids = self.paint_order();
        ids.retain(|&item_id| item_id != id);
        ids.push(id);
        self.renumber(ids)
    }

    /// Move an item to the bottom of the paint order.
    ///
    /// Every item gets an explicit z-order; returns the ids whose z-order changed.
    pub fn send_to_back(&mut self, id: ItemId) -> Vec<ItemId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut ids = self.paint_order();
        ids.retain(|&item_id| item_id != id);
        ids.insert(0, id);
        self.renumber(ids)
    }

    fn renumber(&mut self, ids: Vec<ItemId>) -> Vec<ItemId> {
        let mut changed = Vec::new();
        for (z, id) in ids.iter().enumerate() {
            let z = z as i32;
            let Some(item) = self.items.get_mut(id) else {
                continue;
            };
            if item.z_order() != z {
                item.set_props(&PropsPatch {
                    z_order: Some(z),
                    ..Default::default()
                });
                changed.push(*id);
            }
        }
        self.order = ids;
        changed
    }
}
