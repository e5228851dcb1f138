//! Normalized input events.
//!
//! Hosts translate their native mouse, touch and keyboard events into these types
//! and feed them to [`crate::board::Board::handle_event`].

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Milliseconds since the first call, on a monotonic clock.
pub fn now_ms() -> f64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Mouse button identifiers, numbered like DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    /// Button 0: left click, pen contact or touch.
    #[default]
    Primary,
    /// Button 1.
    Middle,
    /// Button 2.
    Secondary,
    Other(u16),
}

impl MouseButton {
    pub fn from_index(index: u16) -> Self {
        match index {
            0 => MouseButton::Primary,
            1 => MouseButton::Middle,
            2 => MouseButton::Secondary,
            other => MouseButton::Other(other),
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }
}

/// A pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub screen_point: Point,
    pub button: MouseButton,
    /// Number of active touch points; 1 for mouse and pen.
    pub touches: u8,
    pub modifiers: Modifiers,
    /// Event time in milliseconds, used for move throttling.
    pub timestamp_ms: f64,
}

impl PointerEvent {
    /// Primary-button, single-touch event stamped with the current time.
    pub fn new(screen_point: Point) -> Self {
        Self {
            screen_point,
            button: MouseButton::Primary,
            touches: 1,
            modifiers: Modifiers::default(),
            timestamp_ms: now_ms(),
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_touches(mut self, touches: u8) -> Self {
        self.touches = touches;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp_ms: f64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Whether this event may start a single-pointer gesture.
    pub fn starts_gesture(&self) -> bool {
        self.button == MouseButton::Primary && self.touches == 1
    }

    pub fn is_multi_touch(&self) -> bool {
        self.touches > 1
    }
}

/// Mouse wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Positive scrolls down (zooms out).
    pub delta_y: f64,
    pub screen_point: Point,
}

/// Key press, with DOM-style key names (`"Delete"`, `"Escape"`, `"a"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }
}

/// Everything the board reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// Pointer released outside the drawing surface.
    PointerUpOutside(PointerEvent),
    Wheel(WheelEvent),
    /// Two-finger pinch: `scale` is the ratio to the previous pinch sample.
    Pinch { center: Point, scale: f64 },
    /// The pointer has been held still long enough to count as a long press.
    LongPress { screen_point: Point },
    Key(KeyEvent),
}
