//! Select tool: pick, move, rotate and resize the selection, or pan on empty space.

use super::{Gesture, Tool, ToolKind, ToolState};
use crate::board::BoardState;
use crate::input::PointerEvent;
use crate::items::ItemId;
use crate::transformer::HandleKind;
use kurbo::Point;

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Dragging the selection; `anchor` is the world pointer-down position.
    /// `collapse_to` is set when a plain click landed on one member of a larger
    /// selection: if the pointer comes up without moving anything, the selection
    /// shrinks to that item.
    Moving {
        anchor: Point,
        collapse_to: Option<ItemId>,
    },
    Rotating,
    Resizing { handle: HandleKind },
    /// Dragging empty space; `last` is the last applied screen position.
    Panning { last: Point },
}

#[derive(Debug, Clone, Copy)]
enum SelectState {
    Idle,
    Active { mode: Mode, gesture: Gesture },
}

#[derive(Debug)]
pub struct SelectTool {
    state: SelectState,
    throttle_ms: f64,
    /// False while a gesture on an item or handle is in progress.
    panning_enabled: bool,
}

impl SelectTool {
    pub fn new(throttle_ms: f64) -> Self {
        Self {
            state: SelectState::Idle,
            throttle_ms,
            panning_enabled: true,
        }
    }

    pub fn panning_enabled(&self) -> bool {
        self.panning_enabled
    }

    fn update(mode: &mut Mode, state: &mut BoardState, screen: Point) {
        let world = state.viewport.screen_to_world(screen);
        match mode {
            Mode::Moving { anchor, .. } => {
                state.transformer.translate(&mut state.scene, world, *anchor)
            }
            Mode::Rotating => {
                state.transformer.rotate(&mut state.scene, world);
            }
            Mode::Resizing { handle } => state.transformer.resize(&mut state.scene, *handle, world),
            Mode::Panning { last } => {
                state.pan(screen - *last);
                *last = screen;
            }
        }
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn state(&self) -> ToolState {
        match self.state {
            SelectState::Idle => ToolState::Idle,
            SelectState::Active { .. } => ToolState::Active,
        }
    }

    fn pointer_down(&mut self, state: &mut BoardState, event: &PointerEvent) {
        if !event.starts_gesture() || self.is_active() {
            return;
        }
        let screen = event.screen_point;
        let mode = if let Some(handle) = state.transformer.hit_handle(&state.viewport, screen) {
            state.transformer.begin(&state.scene);
            match handle {
                HandleKind::Rotate => Mode::Rotating,
                handle => Mode::Resizing { handle },
            }
        } else {
            let world = state.viewport.screen_to_world(screen);
            let hit = state.scene.hit_test(world, state.world_tolerance());
            let shift = event.modifiers.shift;
            let collapse_to = hit.filter(|id| {
                !shift && state.transformer.contains(*id) && state.transformer.selection().len() > 1
            });
            state.transformer.apply_click(&state.scene, hit, shift);
            if hit.is_some() {
                state.transformer.begin(&state.scene);
                Mode::Moving {
                    anchor: world,
                    collapse_to,
                }
            } else {
                Mode::Panning { last: screen }
            }
        };
        self.panning_enabled = matches!(mode, Mode::Panning { .. });
        self.state = SelectState::Active {
            mode,
            gesture: Gesture::new(self.throttle_ms),
        };
    }

    fn pointer_move(&mut self, state: &mut BoardState, event: &PointerEvent) {
        let SelectState::Active { mode, gesture } = &mut self.state else {
            return;
        };
        if gesture.accept_move(event) {
            Self::update(mode, state, event.screen_point);
        }
    }

    fn pointer_up(&mut self, state: &mut BoardState, event: &PointerEvent) {
        let SelectState::Active { mut mode, gesture } = self.state else {
            return;
        };
        if gesture.accepts_final_update() {
            Self::update(&mut mode, state, event.screen_point);
        }
        if !matches!(mode, Mode::Panning { .. }) {
            let changed = state.transformer.commit(&state.scene);
            if let (true, Mode::Moving { collapse_to: Some(id), .. }) = (changed.is_empty(), mode) {
                state.transformer.set_selection(&state.scene, [id]);
            }
            for id in changed {
                state.persist(id);
            }
        }
        self.panning_enabled = true;
        self.state = SelectState::Idle;
    }

    fn long_press(&mut self) {
        if let SelectState::Active { gesture, .. } = &mut self.state {
            gesture.mark_long_press();
        }
    }

    fn cancel(&mut self, state: &mut BoardState) {
        let dragging_items = match self.state {
            SelectState::Active { mode, .. } => !matches!(mode, Mode::Panning { .. }),
            SelectState::Idle => false,
        };
        if dragging_items {
            state.transformer.restore(&mut state.scene);
        }
        self.panning_enabled = true;
        self.state = SelectState::Idle;
    }
}
