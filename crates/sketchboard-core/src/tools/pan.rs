//! Pan tool: drag the viewport.

use super::{Gesture, Tool, ToolKind, ToolState};
use crate::board::BoardState;
use crate::input::PointerEvent;
use kurbo::Point;

#[derive(Debug)]
pub struct PanTool {
    /// Last applied screen position while dragging.
    last: Option<Point>,
    gesture: Gesture,
    throttle_ms: f64,
}

impl PanTool {
    pub fn new(throttle_ms: f64) -> Self {
        Self {
            last: None,
            gesture: Gesture::new(throttle_ms),
            throttle_ms,
        }
    }

    fn pan_to(&mut self, state: &mut BoardState, screen: Point) {
        if let Some(last) = self.last {
            state.pan(screen - last);
            self.last = Some(screen);
        }
    }
}

impl Tool for PanTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pan
    }

    fn state(&self) -> ToolState {
        if self.last.is_some() {
            ToolState::Active
        } else {
            ToolState::Idle
        }
    }

    fn pointer_down(&mut self, _state: &mut BoardState, event: &PointerEvent) {
        if !event.starts_gesture() || self.is_active() {
            return;
        }
        self.gesture = Gesture::new(self.throttle_ms);
        self.last = Some(event.screen_point);
    }

    fn pointer_move(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if self.is_active() && self.gesture.accept_move(event) {
            self.pan_to(state, event.screen_point);
        }
    }

    fn pointer_up(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if self.gesture.accepts_final_update() {
            self.pan_to(state, event.screen_point);
        }
        self.last = None;
    }

    fn long_press(&mut self) {
        if self.is_active() {
            self.gesture.mark_long_press();
        }
    }

    fn cancel(&mut self, _state: &mut BoardState) {
        self.last = None;
    }
}
