//! Rectangle item.

use super::{ItemBase, ItemId, ItemKind, ItemStyle, ItemTrait, ItemVisual, Paint, Placement, RectangleStyle, StylePatch};
use kurbo::{Point, Rect, RoundedRect, Shape};

/// A rectangle with optional rounded corners, spanning `(0, 0)..(width, height)` locally.
#[derive(Debug, Clone)]
pub struct Rectangle {
    base: ItemBase,
    style: RectangleStyle,
}

impl Rectangle {
    pub(crate) fn new(id: ItemId, position: Point, width: f64, height: f64, paint: Paint) -> Self {
        Self {
            base: ItemBase::new(id, Placement::at(position)),
            style: RectangleStyle {
                paint,
                width: width.max(0.0),
                height: height.max(0.0),
                corner_radius: 0.0,
            },
        }
    }

    pub(crate) fn from_style(id: ItemId, placement: Placement, style: RectangleStyle) -> Self {
        Self {
            base: ItemBase::new(id, placement),
            style,
        }
    }

    pub fn width(&self) -> f64 {
        self.style.width
    }

    pub fn height(&self) -> f64 {
        self.style.height
    }

    /// The local rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.style.width, self.style.height)
    }

    fn is_degenerate(&self) -> bool {
        self.style.width < f64::EPSILON && self.style.height < f64::EPSILON
    }
}

impl ItemTrait for Rectangle {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Rectangle
    }

    fn paint(&self) -> &Paint {
        &self.style.paint
    }

    fn local_bounds(&self) -> Rect {
        let half = self.style.paint.half_stroke().max(0.5);
        self.as_rect().inflate(half, half)
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        let reach = tolerance + self.style.paint.half_stroke().max(0.5);
        if self.style.paint.fill_color.is_some() {
            // Filled: hit anywhere inside
            return rect.inflate(reach, reach).contains(point);
        }
        // Outline only: hit on the border
        let outer = rect.inflate(reach, reach);
        let inner = rect.inflate(-reach, -reach);
        let inner_empty = inner.width() <= 0.0 || inner.height() <= 0.0;
        outer.contains(point) && (inner_empty || !inner.contains(point))
    }

    fn style_props(&self) -> ItemStyle {
        ItemStyle::Rectangle(self.style.clone())
    }

    fn apply_style(&mut self, patch: &StylePatch) {
        self.style.paint.apply(patch);
        if let Some(width) = patch.width {
            self.style.width = width.max(0.0);
        }
        if let Some(height) = patch.height {
            self.style.height = height.max(0.0);
        }
        if let Some(radius) = patch.corner_radius {
            self.style.corner_radius = radius.max(0.0);
        }
    }

    fn build_visual(&self) -> ItemVisual {
        let transform = self.base.placement.affine();
        let dimmed = self.base.is_dimmed();
        if self.is_degenerate() {
            return self.style.paint.dot_visual(Point::ZERO, transform, dimmed);
        }
        let rect = self.as_rect();
        let max_radius = rect.width().min(rect.height()) / 2.0;
        let radius = self.style.corner_radius.min(max_radius);
        let path = if radius > 0.0 {
            RoundedRect::from_rect(rect, radius).to_path(0.1)
        } else {
            rect.to_path(0.1)
        };
        ItemVisual {
            path,
            transform,
            fill: self.style.paint.visual_fill(dimmed),
            stroke: self.style.paint.visual_stroke(dimmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Item, SerializableColor};

    #[test]
    fn test_bounds() {
        let item = Item::rectangle(Point::new(10.0, 20.0), 100.0, 50.0, Paint {
            stroke_size: 2.0,
            ..Default::default()
        });
        let bounds = item.bounds();
        assert!((bounds.x0 - 9.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 19.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 111.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 71.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_outline_hit_test() {
        let item = Item::rectangle(Point::ZERO, 100.0, 100.0, Paint::default());
        assert!(item.hit_test(Point::new(0.0, 50.0), 0.0));
        assert!(item.hit_test(Point::new(105.0, 50.0), 4.0));
        assert!(!item.hit_test(Point::new(50.0, 50.0), 4.0));
        assert!(!item.hit_test(Point::new(150.0, 50.0), 4.0));
    }

    #[test]
    fn test_filled_hit_test() {
        let paint = Paint {
            fill_color: Some(SerializableColor::white()),
            ..Default::default()
        };
        let item = Item::rectangle(Point::ZERO, 100.0, 100.0, paint);
        assert!(item.hit_test(Point::new(50.0, 50.0), 0.0));
    }

    #[test]
    fn test_rotated_hit_test() {
        let mut item = Item::rectangle(Point::ZERO, 100.0, 10.0, Paint::default());
        item.set_props(&crate::items::PropsPatch {
            angle: Some(90.0),
            ..Default::default()
        });
        // the long edge now runs down the y axis
        assert!(item.hit_test(Point::new(0.0, 50.0), 1.0));
        assert!(!item.hit_test(Point::new(50.0, 0.0), 1.0));
    }

    #[test]
    fn test_zero_size_renders_a_dot() {
        let item = Item::rectangle(Point::new(5.0, 5.0), 0.0, 0.0, Paint::default());
        let visual = item.visual().unwrap();
        assert!(visual.fill.is_some());
        assert!(!visual.path.elements().is_empty());
    }

    #[test]
    fn test_corner_radius_is_clamped() {
        let mut item = Item::rectangle(Point::ZERO, 10.0, 10.0, Paint::default());
        item.set_props(&crate::items::PropsPatch::style(StylePatch {
            corner_radius: Some(50.0),
            ..Default::default()
        }));
        let bbox = item.visual().unwrap().path.bounding_box();
        assert!((bbox.width() - 10.0).abs() < 1e-6);
    }
}
