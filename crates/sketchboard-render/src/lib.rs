//! Sketchboard Render Library
//!
//! Renderer implementations for the Sketchboard scene engine.
//! The display list records draw calls per layer for replay into a real backend.

mod display_list;

pub use display_list::{pattern_marks, DisplayList, DrawCommand, PatternTexture};
