//! Eraser: dim items under the pointer while dragging, delete them on release.

use super::{Gesture, Tool, ToolKind, ToolState};
use crate::board::BoardState;
use crate::input::PointerEvent;
use crate::items::ItemId;

#[derive(Debug)]
pub struct EraseTool {
    active: bool,
    /// Items marked for deletion, in hit order.
    queue: Vec<ItemId>,
    gesture: Gesture,
    throttle_ms: f64,
}

impl EraseTool {
    pub fn new(throttle_ms: f64) -> Self {
        Self {
            active: false,
            queue: Vec::new(),
            gesture: Gesture::new(throttle_ms),
            throttle_ms,
        }
    }

    pub fn queued(&self) -> &[ItemId] {
        &self.queue
    }

    fn erase_at(&mut self, state: &mut BoardState, event: &PointerEvent) {
        let world = state.viewport.screen_to_world(event.screen_point);
        let tolerance = state.world_tolerance();
        let Some(id) = state
            .scene
            .hit_test_filtered(world, tolerance, |item| !item.is_dimmed())
        else {
            return;
        };
        if let Some(item) = state.scene.get_mut(id) {
            item.set_dimmed(true);
            self.queue.push(id);
        }
    }
}

impl Tool for EraseTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Erase
    }

    fn state(&self) -> ToolState {
        if self.active {
            ToolState::Active
        } else {
            ToolState::Idle
        }
    }

    fn pointer_down(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if !event.starts_gesture() || self.active {
            return;
        }
        self.active = true;
        self.gesture = Gesture::new(self.throttle_ms);
        self.queue.clear();
        self.erase_at(state, event);
    }

    fn pointer_move(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if self.active && self.gesture.accept_move(event) {
            self.erase_at(state, event);
        }
    }

    fn pointer_up(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if !self.active {
            return;
        }
        if self.gesture.accepts_final_update() {
            self.erase_at(state, event);
        }
        let queue = std::mem::take(&mut self.queue);
        if !queue.is_empty() {
            log::debug!("erasing {} item(s)", queue.len());
        }
        for id in queue {
            state.delete_item(id);
        }
        self.active = false;
    }

    fn long_press(&mut self) {
        if self.active {
            self.gesture.mark_long_press();
        }
    }

    /// Un-dim everything queued; nothing is deleted.
    fn cancel(&mut self, state: &mut BoardState) {
        for id in self.queue.drain(..) {
            if let Some(item) = state.scene.get_mut(id) {
                item.set_dimmed(false);
            }
        }
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::items::{Item, Paint};
    use crate::storage::MemoryStore;
    use kurbo::{Point, Size};

    fn pointer(x: f64, y: f64, t: f64) -> PointerEvent {
        PointerEvent::new(Point::new(x, y)).at(t)
    }

    fn setup() -> (BoardState, MemoryStore, ItemId, ItemId) {
        let store = MemoryStore::new();
        let mut state = BoardState::new(BoardConfig::default(), Box::new(store.clone()));
        state.viewport.resize(Size::new(800.0, 600.0));
        let mut ids = Vec::new();
        for x in [0.0, 100.0] {
            let mut item = Item::rectangle(Point::new(x, 0.0), 20.0, 20.0, Paint::default());
            item.finalize();
            let id = state.scene.insert(item);
            state.persist(id);
            ids.push(id);
        }
        (state, store, ids[0], ids[1])
    }

    #[test]
    fn test_items_are_dimmed_then_erased_on_release() {
        let (mut state, store, a, b) = setup();
        let mut tool = EraseTool::new(20.0);
        tool.pointer_down(&mut state, &pointer(0.0, 10.0, 0.0));
        assert!(state.scene.get(a).unwrap().is_dimmed());
        tool.pointer_move(&mut state, &pointer(100.0, 10.0, 50.0));
        assert!(state.scene.get(b).unwrap().is_dimmed());
        assert_eq!(tool.queued(), &[a, b]);
        assert_eq!(state.scene.len(), 2);

        tool.pointer_up(&mut state, &pointer(100.0, 10.0, 60.0));
        assert!(state.scene.is_empty());
        assert!(store.is_empty());
        assert!(tool.queued().is_empty());
    }

    #[test]
    fn test_an_item_is_queued_once() {
        let (mut state, _, a, _) = setup();
        let mut tool = EraseTool::new(0.0);
        tool.pointer_down(&mut state, &pointer(0.0, 10.0, 0.0));
        tool.pointer_move(&mut state, &pointer(1.0, 10.0, 10.0));
        tool.pointer_move(&mut state, &pointer(2.0, 10.0, 20.0));
        assert_eq!(tool.queued(), &[a]);
    }

    #[test]
    fn test_abort_undims_without_deleting() {
        let (mut state, store, a, _) = setup();
        let mut tool = EraseTool::new(20.0);
        tool.pointer_down(&mut state, &pointer(0.0, 10.0, 0.0));
        tool.cancel(&mut state);
        assert!(!state.scene.get(a).unwrap().is_dimmed());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_erasing_drops_selection() {
        let (mut state, _, a, b) = setup();
        state.transformer.set_selection(&state.scene, [a, b]);
        let mut tool = EraseTool::new(20.0);
        tool.pointer_down(&mut state, &pointer(0.0, 10.0, 0.0));
        tool.pointer_up(&mut state, &pointer(0.0, 10.0, 10.0));
        assert_eq!(state.transformer.selected_ids(), vec![b]);
    }
}
