//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Consistent `{pan, zoom}` snapshot, read in one piece by the background generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub offset: Vec2,
    pub zoom: f64,
    pub screen_size: Size,
}

/// Viewport manages the view transform for the board.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
/// `screen = world * zoom + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan), in screen pixels
    pub offset: Vec2,
    /// Current zoom level, always inside `[min_zoom, max_zoom]`
    zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub screen_size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.3, 10.0)
    }
}

impl Viewport {
    /// Create a viewport with the given zoom range at 100%.
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            log::warn!("zoom range {min_zoom}..{max_zoom} is inverted; swapping");
            (max_zoom, min_zoom)
        };
        let min_zoom = min_zoom.max(f64::EPSILON);
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            screen_size: Size::ZERO,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level directly, clamped into range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            offset: self.offset,
            zoom: self.zoom,
            screen_size: self.screen_size,
        }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Wheel zoom: one `step` in the direction of `-wheel_delta`, keeping the pivot fixed.
    pub fn zoom_at(&mut self, wheel_delta: f64, screen_pivot: Point, step: f64) {
        let direction = if wheel_delta < 0.0 {
            1.0
        } else if wheel_delta > 0.0 {
            -1.0
        } else {
            return;
        };
        self.zoom_by(1.0 + direction * step, screen_pivot);
    }

    /// Multiply the zoom by `factor`, keeping the given screen point fixed.
    pub fn zoom_by(&mut self, factor: f64, screen_point: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("ignoring zoom factor {factor}");
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to world before zoom
        let world_point = self.screen_to_world(screen_point);

        // Apply new zoom
        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
    }

    /// World-space rectangle currently covered by the screen.
    pub fn visible_world_bounds(&self) -> Rect {
        let top_left = self.screen_to_world(Point::ZERO);
        let bottom_right =
            self.screen_to_world(Point::new(self.screen_size.width, self.screen_size.height));
        Rect::from_points(top_left, bottom_right)
    }

    pub fn resize(&mut self, screen_size: Size) {
        self.screen_size = Size::new(screen_size.width.max(0.0), screen_size.height.max(0.0));
    }

    /// Reset viewport to the origin at 100%.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.set_zoom(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn viewport() -> Viewport {
        Viewport::new(0.3, 10.0)
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_offset() {
        let mut viewport = viewport();
        viewport.offset = Vec2::new(50.0, 100.0);
        let world = viewport.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_zoom() {
        let mut viewport = viewport();
        viewport.set_zoom(2.0);
        let world = viewport.screen_to_world(Point::new(100.0, 200.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = viewport();
        for (offset, zoom) in [
            (Vec2::new(30.0, -20.0), 1.5),
            (Vec2::new(-400.0, 12.5), 0.3),
            (Vec2::new(7.0, 7.0), 9.7),
        ] {
            viewport.offset = offset;
            viewport.set_zoom(zoom);
            for original in [Point::new(123.0, 456.0), Point::ZERO, Point::new(-5.5, 1e4)] {
                let back = viewport.world_to_screen(viewport.screen_to_world(original));
                assert!((back.x - original.x).abs() < 1e-8);
                assert!((back.y - original.y).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn test_zoom_at_keeps_pivot_fixed() {
        let mut viewport = viewport();
        viewport.offset = Vec2::new(40.0, -30.0);
        let pivot = Point::new(320.0, 240.0);
        let before = viewport.screen_to_world(pivot);

        viewport.zoom_at(-120.0, pivot, 0.1);
        assert!((viewport.zoom() - 1.1).abs() < EPS);
        let after = viewport.screen_to_world(pivot);
        assert!((after.x - before.x).abs() < EPS);
        assert!((after.y - before.y).abs() < EPS);

        viewport.zoom_at(120.0, pivot, 0.1);
        assert!((viewport.zoom() - 0.99).abs() < EPS);
        let after = viewport.screen_to_world(pivot);
        assert!((after.x - before.x).abs() < EPS);
        assert!((after.y - before.y).abs() < EPS);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = viewport();
        for _ in 0..100 {
            viewport.zoom_at(1.0, Point::new(10.0, 10.0), 0.1);
        }
        assert!((viewport.zoom() - 0.3).abs() < f64::EPSILON);

        for _ in 0..100 {
            viewport.zoom_at(-1.0, Point::new(10.0, 10.0), 0.1);
        }
        assert!((viewport.zoom() - 10.0).abs() < f64::EPSILON);

        viewport.zoom_by(0.0, Point::ZERO);
        assert!((viewport.zoom() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_wheel_delta_is_ignored() {
        let mut viewport = viewport();
        viewport.zoom_at(0.0, Point::ZERO, 0.1);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan() {
        let mut viewport = viewport();
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!((viewport.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((viewport.offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_visible_world_bounds() {
        let mut viewport = viewport();
        viewport.resize(Size::new(800.0, 600.0));
        viewport.offset = Vec2::new(100.0, 50.0);
        viewport.set_zoom(2.0);
        let bounds = viewport.visible_world_bounds();
        assert!((bounds.x0 + 50.0).abs() < EPS);
        assert!((bounds.y0 + 25.0).abs() < EPS);
        assert!((bounds.x1 - 350.0).abs() < EPS);
        assert!((bounds.y1 - 275.0).abs() < EPS);
    }
}
