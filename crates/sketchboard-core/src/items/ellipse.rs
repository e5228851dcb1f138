//! Ellipse item.

use super::{EllipseStyle, ItemBase, ItemId, ItemKind, ItemStyle, ItemTrait, ItemVisual, Paint, Placement, StylePatch};
use kurbo::{Ellipse as KurboEllipse, Point, Rect, Shape};

/// An axis-aligned ellipse inscribed in the local box `(0, 0)..(2 * radius_x, 2 * radius_y)`.
///
/// Keeping the local origin on the box corner makes a drawn ellipse behave like a
/// drawn rectangle under the shape tool and the transformer.
#[derive(Debug, Clone)]
pub struct Ellipse {
    base: ItemBase,
    style: EllipseStyle,
}

impl Ellipse {
    pub(crate) fn new(id: ItemId, position: Point, radius_x: f64, radius_y: f64, paint: Paint) -> Self {
        Self {
            base: ItemBase::new(id, Placement::at(position)),
            style: EllipseStyle {
                paint,
                radius_x: radius_x.max(0.0),
                radius_y: radius_y.max(0.0),
            },
        }
    }

    pub(crate) fn from_style(id: ItemId, placement: Placement, style: EllipseStyle) -> Self {
        Self {
            base: ItemBase::new(id, placement),
            style,
        }
    }

    pub fn radii(&self) -> (f64, f64) {
        (self.style.radius_x, self.style.radius_y)
    }

    /// Local center.
    pub fn center(&self) -> Point {
        Point::new(self.style.radius_x, self.style.radius_y)
    }

    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center(), (self.style.radius_x, self.style.radius_y), 0.0)
    }

    fn is_degenerate(&self) -> bool {
        self.style.radius_x < f64::EPSILON && self.style.radius_y < f64::EPSILON
    }
}

impl ItemTrait for Ellipse {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Ellipse
    }

    fn paint(&self) -> &Paint {
        &self.style.paint
    }

    fn local_bounds(&self) -> Rect {
        let half = self.style.paint.half_stroke().max(0.5);
        Rect::new(0.0, 0.0, self.style.radius_x * 2.0, self.style.radius_y * 2.0).inflate(half, half)
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        let center = self.center();
        let reach = tolerance + self.style.paint.half_stroke().max(0.5);
        let dx_outer = (point.x - center.x) / (self.style.radius_x + reach);
        let dy_outer = (point.y - center.y) / (self.style.radius_y + reach);
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        if self.style.paint.fill_color.is_some() {
            return true;
        }
        // Outline only: reject if inside inner ellipse
        let inner_rx = self.style.radius_x - reach;
        let inner_ry = self.style.radius_y - reach;
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dx_inner = (point.x - center.x) / inner_rx;
        let dy_inner = (point.y - center.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner > 1.0
    }

    fn style_props(&self) -> ItemStyle {
        ItemStyle::Ellipse(self.style.clone())
    }

    fn apply_style(&mut self, patch: &StylePatch) {
        self.style.paint.apply(patch);
        if let Some(rx) = patch.radius_x {
            self.style.radius_x = rx.max(0.0);
        }
        if let Some(ry) = patch.radius_y {
            self.style.radius_y = ry.max(0.0);
        }
    }

    fn build_visual(&self) -> ItemVisual {
        let transform = self.base.placement.affine();
        let dimmed = self.base.is_dimmed();
        if self.is_degenerate() {
            return self.style.paint.dot_visual(Point::ZERO, transform, dimmed);
        }
        ItemVisual {
            path: self.as_kurbo().to_path(0.1),
            transform,
            fill: self.style.paint.visual_fill(dimmed),
            stroke: self.style.paint.visual_stroke(dimmed),
        }
    }
}
