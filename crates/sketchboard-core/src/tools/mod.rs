//! Tool system for the whiteboard.
//!
//! Every tool is a small state machine, idle until a primary single-touch
//! pointer-down and active until pointer-up. Exactly one tool is attached to the
//! [`InputRouter`] at a time; [`ToolBox::set_tool`] detaches the previous tool
//! (cancelling any gesture and removing all its listeners) before attaching the
//! next one.

mod draw;
mod erase;
mod pan;
mod router;
mod select;
mod shape;

pub use draw::DrawTool;
pub use erase::EraseTool;
pub use pan::PanTool;
pub use router::InputRouter;
pub use select::SelectTool;
pub use shape::ShapeTool;

use crate::board::BoardState;
use crate::input::{InputEvent, PointerEvent};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    /// Freehand brush.
    Draw,
    Erase,
    Rectangle,
    Ellipse,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::Pan,
        ToolKind::Draw,
        ToolKind::Erase,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
    ];
}

/// State of a tool interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// Pointer is down and the tool is engaged.
    Active,
}

/// Event kinds a tool can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerUpOutside,
    LongPress,
}

impl EventKind {
    pub const POINTER: [EventKind; 5] = [
        EventKind::PointerDown,
        EventKind::PointerMove,
        EventKind::PointerUp,
        EventKind::PointerUpOutside,
        EventKind::LongPress,
    ];

    /// Kind of a routed event; wheel, pinch and key events are handled by the board.
    pub fn of(event: &InputEvent) -> Option<Self> {
        match event {
            InputEvent::PointerDown(_) => Some(EventKind::PointerDown),
            InputEvent::PointerMove(_) => Some(EventKind::PointerMove),
            InputEvent::PointerUp(_) => Some(EventKind::PointerUp),
            InputEvent::PointerUpOutside(_) => Some(EventKind::PointerUpOutside),
            InputEvent::LongPress { .. } => Some(EventKind::LongPress),
            InputEvent::Wheel(_) | InputEvent::Pinch { .. } | InputEvent::Key(_) => None,
        }
    }
}

/// Leading-edge time throttle.
///
/// The first sample of a window is accepted and starts the window; samples inside
/// it are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    interval_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last: None,
        }
    }

    /// Whether a sample at `timestamp_ms` passes.
    pub fn accept(&mut self, timestamp_ms: f64) -> bool {
        match self.last {
            Some(last) if timestamp_ms - last < self.interval_ms && timestamp_ms >= last => false,
            _ => {
                self.last = Some(timestamp_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Per-gesture move gate shared by all tools: throttling and the long-press guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    throttle: Throttle,
    long_pressed: bool,
}

impl Gesture {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            throttle: Throttle::new(interval_ms),
            long_pressed: false,
        }
    }

    /// Whether a pointer-move should update the gesture.
    pub fn accept_move(&mut self, event: &PointerEvent) -> bool {
        !self.long_pressed && !event.is_multi_touch() && self.throttle.accept(event.timestamp_ms)
    }

    /// Whether pointer-up should apply a final update before committing.
    pub fn accepts_final_update(&self) -> bool {
        !self.long_pressed
    }

    pub fn mark_long_press(&mut self) {
        self.long_pressed = true;
    }
}

/// A tool state machine.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn state(&self) -> ToolState;

    fn is_active(&self) -> bool {
        self.state() == ToolState::Active
    }

    /// Events this tool listens to while attached.
    fn events(&self) -> &'static [EventKind] {
        &EventKind::POINTER
    }

    /// Install this tool's listeners.
    fn attach(&mut self, router: &mut InputRouter) {
        for event in self.events() {
            router.subscribe(self.kind(), *event);
        }
        log::debug!("attached {:?} ({} listeners)", self.kind(), router.listener_count());
    }

    /// Abort any gesture and remove every listener of this tool.
    fn detach(&mut self, state: &mut BoardState, router: &mut InputRouter) {
        if self.is_active() {
            self.cancel(state);
        }
        let removed = router.unsubscribe_all(self.kind());
        log::debug!("detached {:?} ({removed} listeners removed)", self.kind());
    }

    fn pointer_down(&mut self, state: &mut BoardState, event: &PointerEvent);

    fn pointer_move(&mut self, state: &mut BoardState, event: &PointerEvent);

    /// Finish the gesture. Also used for pointer-up outside the surface.
    fn pointer_up(&mut self, state: &mut BoardState, event: &PointerEvent);

    fn long_press(&mut self) {}

    /// Abort the gesture: discard in-progress items and return to idle.
    fn cancel(&mut self, state: &mut BoardState);
}

/// Owns one instance of every tool plus the listener registry.
pub struct ToolBox {
    tools: Vec<Box<dyn Tool>>,
    router: InputRouter,
    active: ToolKind,
}

impl std::fmt::Debug for ToolBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBox")
            .field("active", &self.active)
            .field("router", &self.router)
            .finish()
    }
}

impl ToolBox {
    /// Create every tool and attach the select tool.
    pub fn new(move_throttle_ms: f64) -> Self {
        let tools: Vec<Box<dyn Tool>> = vec![
            Box::new(SelectTool::new(move_throttle_ms)),
            Box::new(PanTool::new(move_throttle_ms)),
            Box::new(DrawTool::new(move_throttle_ms)),
            Box::new(EraseTool::new(move_throttle_ms)),
            Box::new(ShapeTool::rectangle(move_throttle_ms)),
            Box::new(ShapeTool::ellipse(move_throttle_ms)),
        ];
        let mut toolbox = Self {
            tools,
            router: InputRouter::new(),
            active: ToolKind::Select,
        };
        if let Some(tool) = toolbox.tools.iter_mut().find(|t| t.kind() == ToolKind::Select) {
            tool.attach(&mut toolbox.router);
        }
        toolbox
    }

    pub fn active(&self) -> ToolKind {
        self.active
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn tool(&self, kind: ToolKind) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.kind() == kind).map(|t| t.as_ref())
    }

    /// Whether the active tool is in the middle of a gesture.
    pub fn is_gesture_active(&self) -> bool {
        self.tool(self.active).is_some_and(|t| t.is_active())
    }

    /// Switch tools: the previous tool is fully detached before the new one attaches.
    pub fn set_tool(&mut self, kind: ToolKind, state: &mut BoardState) {
        if kind == self.active {
            return;
        }
        let previous = self.active;
        if let Some(tool) = self.tools.iter_mut().find(|t| t.kind() == previous) {
            tool.detach(state, &mut self.router);
        }
        if let Some(tool) = self.tools.iter_mut().find(|t| t.kind() == kind) {
            tool.attach(&mut self.router);
        }
        self.active = kind;
        log::debug!("switched tool {previous:?} -> {kind:?}");
    }

    /// Abort the active tool's gesture, if any.
    pub fn cancel_active(&mut self, state: &mut BoardState) {
        let active = self.active;
        let tool = self.tools.iter_mut().find(|t| t.kind() == active && t.is_active());
        if let Some(tool) = tool {
            log::debug!("aborting {active:?} gesture");
            tool.cancel(state);
        }
    }

    /// Deliver a pointer event to every tool listening to it.
    pub fn dispatch(&mut self, state: &mut BoardState, event: &InputEvent) {
        let Some(kind) = EventKind::of(event) else {
            return;
        };
        for owner in self.router.listeners_for(kind) {
            let Some(tool) = self.tools.iter_mut().find(|t| t.kind() == owner) else {
                continue;
            };
            match event {
                InputEvent::PointerDown(pointer) => tool.pointer_down(state, pointer),
                InputEvent::PointerMove(pointer) => tool.pointer_move(state, pointer),
                InputEvent::PointerUp(pointer) | InputEvent::PointerUpOutside(pointer) => {
                    tool.pointer_up(state, pointer)
                }
                InputEvent::LongPress { .. } => tool.long_press(),
                InputEvent::Wheel(_) | InputEvent::Pinch { .. } | InputEvent::Key(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_leading_edge() {
        let mut throttle = Throttle::new(20.0);
        assert!(throttle.accept(100.0));
        assert!(!throttle.accept(105.0));
        assert!(!throttle.accept(119.9));
        assert!(throttle.accept(120.0));
        throttle.reset();
        assert!(throttle.accept(121.0));
    }

    #[test]
    fn test_throttle_accepts_clock_going_backwards() {
        let mut throttle = Throttle::new(20.0);
        assert!(throttle.accept(100.0));
        assert!(throttle.accept(50.0));
    }

    #[test]
    fn test_long_press_blocks_moves() {
        let mut gesture = Gesture::new(0.0);
        let event = PointerEvent::new(kurbo::Point::ZERO).at(1.0);
        assert!(gesture.accept_move(&event));
        gesture.mark_long_press();
        assert!(!gesture.accept_move(&event.at(100.0)));
        assert!(!gesture.accepts_final_update());
    }

    fn state() -> BoardState {
        BoardState::new(
            crate::config::BoardConfig::default(),
            Box::new(crate::storage::MemoryStore::new()),
        )
    }

    #[test]
    fn test_switching_tools_never_accumulates_listeners() {
        let mut state = state();
        let mut toolbox = ToolBox::new(20.0);
        let baseline = toolbox.router().listener_count();
        assert_eq!(baseline, EventKind::POINTER.len());

        for _ in 0..3 {
            for kind in ToolKind::ALL {
                toolbox.set_tool(kind, &mut state);
                assert_eq!(toolbox.router().listener_count(), baseline);
                assert_eq!(toolbox.router().owners(), vec![kind]);
            }
        }
    }

    #[test]
    fn test_switching_mid_gesture_aborts_it() {
        let mut state = state();
        let mut toolbox = ToolBox::new(20.0);
        toolbox.set_tool(ToolKind::Rectangle, &mut state);
        let down = PointerEvent::new(kurbo::Point::new(10.0, 10.0)).at(0.0);
        toolbox.dispatch(&mut state, &InputEvent::PointerDown(down));
        assert!(toolbox.is_gesture_active());
        assert_eq!(state.scene.len(), 1);

        toolbox.set_tool(ToolKind::Select, &mut state);
        assert!(!toolbox.is_gesture_active());
        assert!(state.scene.is_empty());
    }

    #[test]
    fn test_detached_tool_receives_nothing() {
        let mut state = state();
        let mut toolbox = ToolBox::new(20.0);
        toolbox.set_tool(ToolKind::Draw, &mut state);
        toolbox.set_tool(ToolKind::Pan, &mut state);
        let down = PointerEvent::new(kurbo::Point::new(10.0, 10.0)).at(0.0);
        toolbox.dispatch(&mut state, &InputEvent::PointerDown(down));
        assert!(state.scene.is_empty());
        assert!(toolbox.tool(ToolKind::Pan).is_some_and(|t| t.is_active()));
    }
}
