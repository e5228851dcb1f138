//! Tiled background pattern.
//!
//! A single tile is rendered once into a texture; on every view change the tiled
//! area is recomputed from the visible world bounds, padded by at least one tile and
//! aligned to the tile grid so the pattern stays put while panning.

use crate::camera::{ViewState, Viewport};
use crate::items::SerializableColor;
use crate::render::{Layer, PatternTile, Renderer, TextureId};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Pattern drawn inside each tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStyle {
    None,
    #[default]
    Dots,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub style: PatternStyle,
    /// Tile edge length in world units.
    pub tile_size: f64,
    pub color: SerializableColor,
    /// Dot radius or grid line width in world units.
    pub mark_size: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            style: PatternStyle::Dots,
            tile_size: 40.0,
            color: SerializableColor::new(200, 200, 200, 255),
            mark_size: 1.5,
        }
    }
}

/// Background pattern generator bound to the viewport.
#[derive(Debug)]
pub struct Background {
    config: BackgroundConfig,
    texture: Option<TextureId>,
    last_view: Option<ViewState>,
    /// Tiled world-space area, aligned to the tile grid.
    area: Rect,
    regenerations: u64,
}

impl Background {
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            texture: None,
            last_view: None,
            area: Rect::ZERO,
            regenerations: 0,
        }
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Number of times the tiled area was recomputed.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    fn tile_size(&self) -> f64 {
        self.config.tile_size.max(1.0)
    }

    /// Recompute the tiled area if the view changed since the last call.
    ///
    /// Returns whether anything was recomputed.
    pub fn regenerate(&mut self, viewport: &Viewport) -> bool {
        let view = viewport.view_state();
        if self.last_view == Some(view) {
            return false;
        }
        let tile = self.tile_size();
        let visible = viewport.visible_world_bounds();
        self.area = Rect::new(
            ((visible.x0 - tile) / tile).floor() * tile,
            ((visible.y0 - tile) / tile).floor() * tile,
            ((visible.x1 + tile) / tile).ceil() * tile,
            ((visible.y1 + tile) / tile).ceil() * tile,
        );
        self.last_view = Some(view);
        self.regenerations += 1;
        true
    }

    /// Swap the pattern, releasing the current tile texture.
    pub fn set_config(&mut self, config: BackgroundConfig, renderer: &mut dyn Renderer) {
        self.release(renderer);
        self.config = config;
        self.last_view = None;
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer, view: Affine) {
        if self.config.style == PatternStyle::None || self.area.is_zero_area() {
            return;
        }
        let texture = match self.texture {
            Some(texture) => texture,
            None => {
                let tile = PatternTile {
                    style: self.config.style,
                    size: self.tile_size(),
                    color: self.config.color.into(),
                    mark_size: self.config.mark_size,
                };
                let texture = renderer.create_pattern_texture(&tile);
                log::debug!("created background texture {texture}");
                self.texture = Some(texture);
                texture
            }
        };
        let origin = Point::new(self.area.x0, self.area.y0);
        renderer.draw_tiled(Layer::Background, texture, self.area, origin, view);
    }

    /// Release the tile texture.
    pub fn release(&mut self, renderer: &mut dyn Renderer) {
        if let Some(texture) = self.texture.take() {
            renderer.release_texture(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};

    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(0.3, 10.0);
        viewport.resize(Size::new(800.0, 600.0));
        viewport
    }

    #[test]
    fn test_area_is_padded_and_aligned() {
        let mut background = Background::new(BackgroundConfig::default());
        let mut viewport = viewport();
        viewport.pan(Vec2::new(-13.0, 7.0));
        assert!(background.regenerate(&viewport));

        let visible = viewport.visible_world_bounds();
        let area = background.area();
        assert!(area.x0 <= visible.x0 - 40.0);
        assert!(area.y0 <= visible.y0 - 40.0);
        assert!(area.x1 >= visible.x1 + 40.0);
        assert!(area.y1 >= visible.y1 + 40.0);
        assert_eq!(area.x0 % 40.0, 0.0);
        assert_eq!(area.y0 % 40.0, 0.0);
    }

    #[test]
    fn test_padding_is_a_full_tile_just_past_a_grid_line() {
        let mut background = Background::new(BackgroundConfig::default());
        let mut viewport = viewport();
        // visible.x0 lands at -19, which rounds toward the view
        viewport.pan(Vec2::new(19.0, 19.0));
        background.regenerate(&viewport);

        let visible = viewport.visible_world_bounds();
        let area = background.area();
        assert!(visible.x0 - area.x0 >= 40.0, "left pad {}", visible.x0 - area.x0);
        assert!(visible.y0 - area.y0 >= 40.0, "top pad {}", visible.y0 - area.y0);
        assert!(area.x1 - visible.x1 >= 40.0);
        assert!(area.y1 - visible.y1 >= 40.0);
        assert_eq!(area.x0, -80.0);
    }

    #[test]
    fn test_regenerate_only_on_change() {
        let mut background = Background::new(BackgroundConfig::default());
        let mut viewport = viewport();
        assert!(background.regenerate(&viewport));
        assert!(!background.regenerate(&viewport));

        viewport.zoom_at(-1.0, Point::new(10.0, 10.0), 0.1);
        assert!(background.regenerate(&viewport));
        assert_eq!(background.regenerations(), 2);
    }
}
