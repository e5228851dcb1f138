//! Freehand brush tool.

use super::{Gesture, Tool, ToolKind, ToolState};
use crate::board::BoardState;
use crate::input::PointerEvent;
use crate::items::{Item, ItemId};

#[derive(Debug)]
pub struct DrawTool {
    /// Stroke being drawn.
    current: Option<ItemId>,
    gesture: Gesture,
    throttle_ms: f64,
}

impl DrawTool {
    pub fn new(throttle_ms: f64) -> Self {
        Self {
            current: None,
            gesture: Gesture::new(throttle_ms),
            throttle_ms,
        }
    }

    pub fn current(&self) -> Option<ItemId> {
        self.current
    }

    fn sample(&self, state: &mut BoardState, event: &PointerEvent) {
        let Some(id) = self.current else {
            return;
        };
        let world = state.viewport.screen_to_world(event.screen_point);
        if let Some(item) = state.scene.get_mut(id) {
            item.push_sample(world);
        }
    }
}

impl Tool for DrawTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Draw
    }

    fn state(&self) -> ToolState {
        if self.current.is_some() {
            ToolState::Active
        } else {
            ToolState::Idle
        }
    }

    fn pointer_down(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if !event.starts_gesture() || self.is_active() {
            return;
        }
        let world = state.viewport.screen_to_world(event.screen_point);
        let item = Item::brush(world, state.config.default_style.clone());
        let id = state.scene.insert(item);
        log::debug!("brush stroke {id} started at ({:.1}, {:.1})", world.x, world.y);
        self.gesture = Gesture::new(self.throttle_ms);
        self.current = Some(id);
    }

    fn pointer_move(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if self.is_active() && self.gesture.accept_move(event) {
            self.sample(state, event);
        }
    }

    fn pointer_up(&mut self, state: &mut BoardState, event: &PointerEvent) {
        let Some(id) = self.current else {
            return;
        };
        if self.gesture.accepts_final_update() {
            self.sample(state, event);
        }
        if let Some(item) = state.scene.get_mut(id) {
            item.finalize();
        }
        state.persist(id);
        self.current = None;
    }

    fn long_press(&mut self) {
        if self.is_active() {
            self.gesture.mark_long_press();
        }
    }

    fn cancel(&mut self, state: &mut BoardState) {
        if let Some(id) = self.current.take() {
            state.scene.remove(id);
            log::debug!("brush stroke {id} discarded");
        }
    }
}
