//! Rectangle and ellipse drag-to-size tools.

use super::{Gesture, Tool, ToolKind, ToolState};
use crate::board::BoardState;
use crate::input::PointerEvent;
use crate::items::{Item, ItemId, ItemKind, PropsPatch, StylePatch};
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy)]
struct Drawing {
    id: ItemId,
    /// World position of pointer-down.
    anchor: Point,
}

#[derive(Debug)]
pub struct ShapeTool {
    shape: ItemKind,
    drawing: Option<Drawing>,
    gesture: Gesture,
    throttle_ms: f64,
}

impl ShapeTool {
    pub fn rectangle(throttle_ms: f64) -> Self {
        Self::new(ItemKind::Rectangle, throttle_ms)
    }

    pub fn ellipse(throttle_ms: f64) -> Self {
        Self::new(ItemKind::Ellipse, throttle_ms)
    }

    fn new(shape: ItemKind, throttle_ms: f64) -> Self {
        Self {
            shape,
            drawing: None,
            gesture: Gesture::new(throttle_ms),
            throttle_ms,
        }
    }

    pub fn current(&self) -> Option<ItemId> {
        self.drawing.map(|d| d.id)
    }

    /// Fit the shape to the box spanned by the anchor and the pointer. The origin is
    /// always the min corner, so width and height never go negative.
    fn resize_to(&self, state: &mut BoardState, event: &PointerEvent) {
        let Some(drawing) = self.drawing else {
            return;
        };
        let current = state.viewport.screen_to_world(event.screen_point);
        let span = Rect::from_points(drawing.anchor, current);
        let style = match self.shape {
            ItemKind::Ellipse => StylePatch {
                radius_x: Some(span.width() / 2.0),
                radius_y: Some(span.height() / 2.0),
                ..Default::default()
            },
            _ => StylePatch {
                width: Some(span.width()),
                height: Some(span.height()),
                ..Default::default()
            },
        };
        if let Some(item) = state.scene.get_mut(drawing.id) {
            item.set_props(&PropsPatch {
                position: Some(span.origin()),
                style: Some(style),
                ..Default::default()
            });
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        match self.shape {
            ItemKind::Ellipse => ToolKind::Ellipse,
            _ => ToolKind::Rectangle,
        }
    }

    fn state(&self) -> ToolState {
        if self.drawing.is_some() {
            ToolState::Active
        } else {
            ToolState::Idle
        }
    }

    fn pointer_down(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if !event.starts_gesture() || self.is_active() {
            return;
        }
        let anchor = state.viewport.screen_to_world(event.screen_point);
        let paint = state.config.default_style.clone();
        let item = match self.shape {
            ItemKind::Ellipse => Item::ellipse(anchor, 0.0, 0.0, paint),
            _ => Item::rectangle(anchor, 0.0, 0.0, paint),
        };
        let id = state.scene.insert(item);
        self.gesture = Gesture::new(self.throttle_ms);
        self.drawing = Some(Drawing { id, anchor });
    }

    fn pointer_move(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if self.is_active() && self.gesture.accept_move(event) {
            self.resize_to(state, event);
        }
    }

    fn pointer_up(&mut self, state: &mut BoardState, event: &PointerEvent) {
        let Some(drawing) = self.drawing else {
            return;
        };
        if self.gesture.accepts_final_update() {
            self.resize_to(state, event);
        }
        if let Some(item) = state.scene.get_mut(drawing.id) {
            item.finalize();
        }
        state.persist(drawing.id);
        log::debug!("{:?} {} committed", self.shape, drawing.id);
        self.drawing = None;
    }

    fn long_press(&mut self) {
        if self.is_active() {
            self.gesture.mark_long_press();
        }
    }

    fn cancel(&mut self, state: &mut BoardState) {
        if let Some(drawing) = self.drawing.take() {
            state.scene.remove(drawing.id);
        }
    }
}
