//! Freehand brush stroke.

use super::{BrushStyle, ItemBase, ItemId, ItemKind, ItemStyle, ItemTrait, ItemVisual, Paint, Placement, StylePatch};
use crate::geometry::{midpoint, point_to_polyline_dist, polygon_path, stroke_outline};
use kurbo::{BezPath, Point, Rect, Shape};

/// A freehand stroke: an ordered sequence of samples in item-local space.
#[derive(Debug, Clone)]
pub struct BrushPath {
    base: ItemBase,
    style: BrushStyle,
    /// Hit-test polygon, computed once when the stroke is committed.
    outline: Vec<Point>,
}

impl BrushPath {
    pub(crate) fn new(id: ItemId, origin: Point, paint: Paint) -> Self {
        Self {
            base: ItemBase::new(id, Placement::at(origin)),
            style: BrushStyle {
                paint,
                points: vec![Point::ZERO],
            },
            outline: Vec::new(),
        }
    }

    pub(crate) fn from_style(id: ItemId, placement: Placement, mut style: BrushStyle) -> Self {
        if style.points.is_empty() {
            style.points.push(Point::ZERO);
        }
        Self {
            base: ItemBase::new(id, placement),
            style,
            outline: Vec::new(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.style.points
    }

    /// Committed hit-test polygon; empty until the stroke is finalized.
    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    /// Append a world-space sample. Repeated samples are skipped.
    pub(crate) fn push_sample(&mut self, world_point: Point) -> bool {
        let local = self.base.placement.affine().inverse() * world_point;
        if self.style.points.last() == Some(&local) {
            return false;
        }
        self.style.points.push(local);
        true
    }

    /// True when every sample sits on the first one.
    fn is_degenerate(&self) -> bool {
        let first = self.style.points[0];
        self.style.points.iter().all(|p| (*p - first).hypot() < f64::EPSILON)
    }

    /// Quadratic curves through the midpoints of consecutive samples.
    fn smooth_path(&self) -> BezPath {
        let points = &self.style.points;
        let mut path = BezPath::new();
        path.move_to(points[0]);
        if points.len() == 2 {
            path.line_to(points[1]);
            return path;
        }
        for pair in points[1..].windows(2) {
            path.quad_to(pair[0], midpoint(pair[0], pair[1]));
        }
        if let Some(last) = points.last() {
            path.line_to(*last);
        }
        path
    }
}

impl ItemTrait for BrushPath {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Brush
    }

    fn paint(&self) -> &Paint {
        &self.style.paint
    }

    fn local_bounds(&self) -> Rect {
        let first = self.style.points[0];
        let bounds = self
            .style
            .points
            .iter()
            .fold(Rect::from_points(first, first), |acc, p| acc.union_pt(*p));
        let half = self.style.paint.half_stroke().max(0.5);
        bounds.inflate(half, half)
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        if self.outline.len() >= 3 && polygon_path(&self.outline).contains(point) {
            return true;
        }
        let reach = self.style.paint.half_stroke().max(0.5) + tolerance;
        point_to_polyline_dist(point, &self.style.points) <= reach
    }

    fn style_props(&self) -> ItemStyle {
        ItemStyle::Brush(self.style.clone())
    }

    fn apply_style(&mut self, patch: &StylePatch) {
        self.style.paint.apply(patch);
        if let Some(points) = &patch.points {
            self.style.points = if points.is_empty() {
                vec![Point::ZERO]
            } else {
                points.clone()
            };
        }
        if !self.outline.is_empty() {
            self.finalize_geometry();
        }
    }

    fn build_visual(&self) -> ItemVisual {
        let transform = self.base.placement.affine();
        let dimmed = self.base.is_dimmed();
        if self.is_degenerate() {
            return self.style.paint.dot_visual(self.style.points[0], transform, dimmed);
        }
        ItemVisual {
            path: self.smooth_path(),
            transform,
            fill: None,
            stroke: self.style.paint.visual_stroke(dimmed).map(|mut stroke| {
                stroke.round = true;
                stroke
            }),
        }
    }

    fn finalize_geometry(&mut self) {
        self.outline = stroke_outline(&self.style.points, self.style.paint.stroke_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Item, SerializableColor};
    use kurbo::PathEl;

    const EPS: f64 = 1e-9;

    fn paint(size: f64) -> Paint {
        Paint {
            stroke_size: size,
            ..Default::default()
        }
    }

    #[test]
    fn test_samples_are_local_to_origin() {
        let mut item = Item::brush(Point::new(100.0, 50.0), paint(4.0));
        assert!(item.push_sample(Point::new(110.0, 55.0)));
        assert!(!item.push_sample(Point::new(110.0, 55.0)));
        let Item::Brush(brush) = &item else {
            panic!("expected a brush");
        };
        assert_eq!(brush.points(), &[Point::ZERO, Point::new(10.0, 5.0)]);
        assert_eq!(item.placement().position, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_single_point_stroke_is_a_dot() {
        let mut item = Item::brush(Point::new(20.0, 20.0), paint(6.0));
        item.finalize();

        let visual = item.visual().unwrap();
        assert!(visual.stroke.is_none());
        assert_eq!(visual.fill, Some(SerializableColor::black()));
        let bbox = visual.path.bounding_box();
        assert!((bbox.width() - 6.0).abs() < EPS);
        assert!((bbox.height() - 6.0).abs() < EPS);

        let Item::Brush(brush) = &item else {
            panic!("expected a brush");
        };
        assert!(!brush.outline().is_empty());
        assert!(item.hit_test(Point::new(21.0, 20.0), 0.0));
        assert!(!item.hit_test(Point::new(30.0, 20.0), 0.0));
    }

    #[test]
    fn test_outline_only_computed_at_finalize() {
        let mut item = Item::brush(Point::ZERO, paint(4.0));
        item.push_sample(Point::new(10.0, 0.0));
        item.push_sample(Point::new(20.0, 10.0));
        let Item::Brush(brush) = &item else {
            panic!("expected a brush");
        };
        assert!(brush.outline().is_empty());
        assert!(!item.is_interactive());

        item.finalize();
        let Item::Brush(brush) = &item else {
            panic!("expected a brush");
        };
        assert!(brush.outline().len() > 4);
        assert!(item.is_interactive());
    }

    #[test]
    fn test_smooth_path_uses_midpoint_quads() {
        let mut item = Item::brush(Point::ZERO, paint(2.0));
        item.push_sample(Point::new(10.0, 0.0));
        item.push_sample(Point::new(20.0, 10.0));
        item.push_sample(Point::new(30.0, 10.0));
        let visual = item.visual().unwrap();
        let quads: Vec<_> = visual
            .path
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::QuadTo(ctrl, end) => Some((*ctrl, *end)),
                _ => None,
            })
            .collect();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0], (Point::new(10.0, 0.0), Point::new(15.0, 5.0)));
        assert!(visual.stroke.is_some_and(|s| s.round));
    }

    #[test]
    fn test_hit_test_near_stroke() {
        let mut item = Item::brush(Point::new(0.0, 0.0), paint(4.0));
        item.push_sample(Point::new(50.0, 0.0));
        item.finalize();
        assert!(item.hit_test(Point::new(25.0, 1.5), 0.0));
        assert!(item.hit_test(Point::new(25.0, 5.0), 4.0));
        assert!(!item.hit_test(Point::new(25.0, 12.0), 4.0));
    }
}
