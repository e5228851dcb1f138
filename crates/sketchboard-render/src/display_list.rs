//! Retained display list renderer.
//!
//! Records every draw call of a frame per layer, in paint order. A host replays the
//! list into its real backend; tests inspect it directly.

use kurbo::{Affine, BezPath, Point, Rect, Size};
use peniko::Color;
use sketchboard_core::background::PatternStyle;
use sketchboard_core::render::{Layer, PatternTile, Renderer, StrokeSpec, TextureId};
use std::collections::HashMap;

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill {
        layer: Layer,
        path: BezPath,
        transform: Affine,
        color: Color,
    },
    Stroke {
        layer: Layer,
        path: BezPath,
        transform: Affine,
        stroke: StrokeSpec,
    },
    Tiled {
        layer: Layer,
        texture: TextureId,
        area: Rect,
        origin: Point,
        transform: Affine,
    },
}

impl DrawCommand {
    pub fn layer(&self) -> Layer {
        match self {
            DrawCommand::Fill { layer, .. }
            | DrawCommand::Stroke { layer, .. }
            | DrawCommand::Tiled { layer, .. } => *layer,
        }
    }

    /// Screen-space bounds of what this command covers.
    pub fn screen_bounds(&self) -> Rect {
        match self {
            DrawCommand::Fill { path, transform, .. } => transform.transform_rect_bbox(path_bounds(path)),
            DrawCommand::Stroke {
                path,
                transform,
                stroke,
                ..
            } => {
                let half = stroke.width / 2.0;
                transform.transform_rect_bbox(path_bounds(path).inflate(half, half))
            }
            DrawCommand::Tiled { area, transform, .. } => transform.transform_rect_bbox(*area),
        }
    }
}

fn path_bounds(path: &BezPath) -> Rect {
    kurbo::Shape::bounding_box(path)
}

/// A texture registered by [`Renderer::create_pattern_texture`].
#[derive(Debug, Clone)]
pub struct PatternTexture {
    pub tile: PatternTile,
    /// Marks of one tile, in tile-local coordinates `0..size`.
    pub marks: BezPath,
}

/// Build the marks of one background tile.
///
/// Dots are small squares on the tile corner (cheaper than circles); the grid is the
/// tile's top and left edge, so repeating it draws every line once.
pub fn pattern_marks(tile: &PatternTile) -> BezPath {
    let mut path = BezPath::new();
    let size = tile.size;
    let mark = tile.mark_size.max(0.0);
    match tile.style {
        PatternStyle::None => {}
        PatternStyle::Dots => {
            let dot = Rect::new(-mark, -mark, mark, mark);
            path.move_to(Point::new(dot.x0, dot.y0));
            path.line_to(Point::new(dot.x1, dot.y0));
            path.line_to(Point::new(dot.x1, dot.y1));
            path.line_to(Point::new(dot.x0, dot.y1));
            path.close_path();
        }
        PatternStyle::Grid => {
            // Vertical line
            path.move_to(Point::new(0.0, 0.0));
            path.line_to(Point::new(0.0, size));
            // Horizontal line
            path.move_to(Point::new(0.0, 0.0));
            path.line_to(Point::new(size, 0.0));
        }
    }
    path
}

/// Renderer that records draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    textures: HashMap<TextureId, PatternTexture>,
    next_texture: TextureId,
    size: Size,
    frames: u64,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the current frame, in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn commands_in(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.layer() == layer)
    }

    pub fn texture(&self, texture: TextureId) -> Option<&PatternTexture> {
        self.textures.get(&texture)
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Number of frames begun so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether every command is in back-to-front layer order.
    pub fn is_layer_ordered(&self) -> bool {
        let rank = |layer: Layer| match layer {
            Layer::Background => 0,
            Layer::Items => 1,
            Layer::Handles => 2,
        };
        self.commands
            .windows(2)
            .all(|pair| rank(pair[0].layer()) <= rank(pair[1].layer()))
    }
}

impl Renderer for DisplayList {
    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn fill_path(&mut self, layer: Layer, path: &BezPath, transform: Affine, color: Color) {
        self.commands.push(DrawCommand::Fill {
            layer,
            path: path.clone(),
            transform,
            color,
        });
    }

    fn stroke_path(&mut self, layer: Layer, path: &BezPath, transform: Affine, stroke: &StrokeSpec) {
        self.commands.push(DrawCommand::Stroke {
            layer,
            path: path.clone(),
            transform,
            stroke: *stroke,
        });
    }

    fn create_pattern_texture(&mut self, tile: &PatternTile) -> TextureId {
        self.next_texture += 1;
        let id = self.next_texture;
        self.textures.insert(
            id,
            PatternTexture {
                tile: *tile,
                marks: pattern_marks(tile),
            },
        );
        log::debug!("registered pattern texture {id} ({:?}, {})", tile.style, tile.size);
        id
    }

    fn draw_tiled(&mut self, layer: Layer, texture: TextureId, area: Rect, origin: Point, transform: Affine) {
        if !self.textures.contains_key(&texture) {
            log::warn!("draw_tiled with unknown texture {texture}");
            return;
        }
        self.commands.push(DrawCommand::Tiled {
            layer,
            texture,
            area,
            origin,
            transform,
        });
    }

    fn release_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_none() {
            log::debug!("release of unknown texture {texture}");
        }
    }
}
