//! Sketchboard Core Library
//!
//! Platform-agnostic scene and interaction engine for the Sketchboard whiteboard:
//! items, viewport, selection, group transforms and the tool state machines.
//! Rendering, persistence and input are reached through small collaborator traits.

pub mod background;
pub mod board;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod items;
pub mod render;
pub mod scene;
pub mod selection;
pub mod storage;
pub mod tools;
pub mod transformer;

pub use background::{Background, BackgroundConfig, PatternStyle};
pub use board::{Board, BoardState};
pub use camera::{ViewState, Viewport};
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult};
pub use input::{InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use items::{Item, ItemId, ItemKind, ItemProps, Paint, PropsPatch, SerializableColor, StylePatch};
pub use render::{Layer, PatternTile, Renderer, StrokeSpec, TextureId};
pub use scene::Scene;
pub use selection::{SelectedItem, Selection};
pub use storage::{ItemStore, MemoryStore, StorageError, StorageResult};
pub use tools::{Tool, ToolBox, ToolKind, ToolState};
pub use transformer::{HandleKind, Transformer, TransformerConfig};
