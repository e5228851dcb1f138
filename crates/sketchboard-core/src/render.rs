//! Rendering collaborator contract.
//!
//! The engine never talks to a graphics API directly. It issues the calls below
//! against whatever backend the host supplies (immediate-mode canvas, retained scene
//! graph, SVG, GPU). Hit-testing and screen/world conversion are done by the engine
//! itself (see [`crate::scene::Scene::hit_test`] and [`crate::camera::Viewport`]),
//! so a backend only has to draw.

use crate::background::PatternStyle;
use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;

/// Draw layers, painted back to front.
///
/// Only [`Layer::Items`] takes part in item hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Tiled background pattern.
    Background,
    /// Drawable items.
    Items,
    /// Selection outline and transform handles.
    Handles,
}

/// Stroke parameters for [`Renderer::stroke_path`].
#[derive(Debug, Clone, Copy)]
pub struct StrokeSpec {
    pub color: Color,
    pub width: f64,
    /// Round joins and caps (freehand strokes); square otherwise.
    pub round: bool,
}

impl StrokeSpec {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width, round: false }
    }

    pub fn rounded(mut self) -> Self {
        self.round = true;
        self
    }
}

/// Handle to a texture created by the backend.
pub type TextureId = u64;

/// Description of one background tile, rendered once into a reusable texture.
#[derive(Debug, Clone, Copy)]
pub struct PatternTile {
    pub style: PatternStyle,
    /// Tile edge length in world units.
    pub size: f64,
    pub color: Color,
    /// Dot radius or grid line width in world units.
    pub mark_size: f64,
}

/// Backend capability surface consumed by the engine.
pub trait Renderer {
    /// Resize the drawing surface to the screen size in pixels.
    fn resize(&mut self, size: Size);

    /// Start a new frame, discarding the previous frame's draw calls.
    fn begin_frame(&mut self);

    /// Fill a closed path. `transform` maps path space to screen space.
    fn fill_path(&mut self, layer: Layer, path: &BezPath, transform: Affine, color: Color);

    /// Stroke a path. `transform` maps path space to screen space.
    fn stroke_path(&mut self, layer: Layer, path: &BezPath, transform: Affine, stroke: &StrokeSpec);

    /// Render a tile into a reusable texture.
    fn create_pattern_texture(&mut self, tile: &PatternTile) -> TextureId;

    /// Repeat a texture over `area` (world space) with tile origin `origin`.
    fn draw_tiled(
        &mut self,
        layer: Layer,
        texture: TextureId,
        area: Rect,
        origin: Point,
        transform: Affine,
    );

    /// Release a texture previously returned by [`Renderer::create_pattern_texture`].
    fn release_texture(&mut self, texture: TextureId);
}
