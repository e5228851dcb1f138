//! Drawable items: brush strokes, rectangles and ellipses.
//!
//! An item owns its placement (position, scale, angle) and a kind-specific style.
//! Its visual geometry is expressed in item-local space and recomputed by
//! [`Item::redraw`]; the renderer only ever sees the resulting [`ItemVisual`].

mod brush;
mod ellipse;
mod rectangle;

pub use brush::BrushPath;
pub use ellipse::Ellipse;
pub use rectangle::Rectangle;

use crate::render::{Layer, Renderer, StrokeSpec};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for items.
pub type ItemId = Uuid;

/// Alpha multiplier applied to items queued for erasing.
pub const DIMMED_ALPHA: f64 = 0.3;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn with_alpha_factor(self, factor: f64) -> Self {
        let a = (self.a as f64 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Discriminant of an item, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Brush,
    Rectangle,
    Ellipse,
}

/// Fill and stroke shared by every item kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Fill opacity multiplier.
    #[serde(default = "default_alpha")]
    pub fill_alpha: f64,
    pub stroke_color: SerializableColor,
    /// Stroke width in item-local units.
    pub stroke_size: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill_color: None,
            fill_alpha: 1.0,
            stroke_color: SerializableColor::black(),
            stroke_size: 4.0,
        }
    }
}

impl Paint {
    fn apply(&mut self, patch: &StylePatch) {
        if let Some(fill) = patch.fill_color {
            self.fill_color = fill;
        }
        if let Some(alpha) = patch.fill_alpha {
            self.fill_alpha = alpha;
        }
        if let Some(color) = patch.stroke_color {
            self.stroke_color = color;
        }
        if let Some(size) = patch.stroke_size {
            self.stroke_size = size.max(0.0);
        }
    }

    fn half_stroke(&self) -> f64 {
        self.stroke_size / 2.0
    }

    fn visual_fill(&self, dimmed: bool) -> Option<SerializableColor> {
        self.fill_color
            .map(|c| c.with_alpha_factor(self.fill_alpha * dim_factor(dimmed)))
    }

    fn visual_stroke(&self, dimmed: bool) -> Option<VisualStroke> {
        (self.stroke_size > 0.0).then(|| VisualStroke {
            color: self.stroke_color.with_alpha_factor(dim_factor(dimmed)),
            width: self.stroke_size,
            round: false,
        })
    }

    /// Filled dot of diameter `stroke_size`, used for degenerate geometry.
    fn dot_visual(&self, center: Point, transform: Affine, dimmed: bool) -> ItemVisual {
        let radius = self.half_stroke().max(0.5);
        ItemVisual {
            path: crate::geometry::polygon_path(&crate::geometry::circle_polygon(center, radius)),
            transform,
            fill: Some(self.stroke_color.with_alpha_factor(dim_factor(dimmed))),
            stroke: None,
        }
    }
}

fn dim_factor(dimmed: bool) -> f64 {
    if dimmed { DIMMED_ALPHA } else { 1.0 }
}

/// Affine placement of an item's local frame in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// World-space origin of the local frame.
    pub position: Point,
    pub scale: Vec2,
    /// Rotation in degrees about `position`.
    pub angle: f64,
}

impl Placement {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            scale: Vec2::new(1.0, 1.0),
            angle: 0.0,
        }
    }

    /// Local-to-world transform.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    /// Average absolute scale, used to convert world tolerances to local ones.
    fn mean_scale(&self) -> f64 {
        ((self.scale.x.abs() + self.scale.y.abs()) / 2.0).max(f64::EPSILON)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(Point::ZERO)
    }
}

/// Kind-specific style, the `style` field of [`ItemProps`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStyle {
    Brush(BrushStyle),
    Rectangle(RectangleStyle),
    Ellipse(EllipseStyle),
}

impl ItemStyle {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemStyle::Brush(_) => ItemKind::Brush,
            ItemStyle::Rectangle(_) => ItemKind::Rectangle,
            ItemStyle::Ellipse(_) => ItemKind::Ellipse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushStyle {
    #[serde(flatten)]
    pub paint: Paint,
    /// Samples in item-local space; the first one is the local origin.
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleStyle {
    #[serde(flatten)]
    pub paint: Paint,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseStyle {
    #[serde(flatten)]
    pub paint: Paint,
    pub radius_x: f64,
    pub radius_y: f64,
}

/// Plain record handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProps {
    pub id: ItemId,
    pub kind: ItemKind,
    pub position: Point,
    pub scale: Vec2,
    pub angle: f64,
    #[serde(default = "default_z_order")]
    pub z_order: i32,
    pub style: ItemStyle,
}

fn default_z_order() -> i32 {
    UNSET_Z_ORDER
}

/// `z_order` of an item whose paint order follows insertion order.
pub const UNSET_Z_ORDER: i32 = -1;

/// Partial update of the style. Keys that do not apply to the item's kind are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    /// `Some(None)` removes the fill.
    pub fill_color: Option<Option<SerializableColor>>,
    pub fill_alpha: Option<f64>,
    pub stroke_color: Option<SerializableColor>,
    pub stroke_size: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub corner_radius: Option<f64>,
    pub radius_x: Option<f64>,
    pub radius_y: Option<f64>,
}

/// Partial update of an item, see [`Item::set_props`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropsPatch {
    pub position: Option<Point>,
    pub scale: Option<Vec2>,
    pub angle: Option<f64>,
    pub z_order: Option<i32>,
    pub style: Option<StylePatch>,
}

impl PropsPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn style(style: StylePatch) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }
}

/// Stroke part of an [`ItemVisual`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualStroke {
    pub color: SerializableColor,
    pub width: f64,
    pub round: bool,
}

/// Render-ready geometry of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemVisual {
    /// Path in item-local space.
    pub path: BezPath,
    /// Local-to-world transform at the time of the redraw.
    pub transform: Affine,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<VisualStroke>,
}

/// State shared by every item kind.
#[derive(Debug, Clone)]
pub struct ItemBase {
    pub(crate) id: ItemId,
    pub placement: Placement,
    pub z_order: i32,
    destroyed: bool,
    dimmed: bool,
    interactive: bool,
    visual: Option<ItemVisual>,
}

impl ItemBase {
    fn new(id: ItemId, placement: Placement) -> Self {
        Self {
            id,
            placement,
            z_order: UNSET_Z_ORDER,
            destroyed: false,
            dimmed: false,
            interactive: false,
            visual: None,
        }
    }

    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }
}

/// Common behaviour of the item kinds.
pub trait ItemTrait {
    fn base(&self) -> &ItemBase;

    fn base_mut(&mut self) -> &mut ItemBase;

    fn kind(&self) -> ItemKind;

    fn paint(&self) -> &Paint;

    /// Bounding box in item-local space, stroke included.
    fn local_bounds(&self) -> Rect;

    /// Check if a point in item-local space hits this item.
    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool;

    fn style_props(&self) -> ItemStyle;

    /// Merge a style patch into the current style.
    fn apply_style(&mut self, patch: &StylePatch);

    /// Compute the visual geometry from the current style and placement.
    fn build_visual(&self) -> ItemVisual;

    /// Compute committed hit-test geometry. Called once, when the gesture ends.
    fn finalize_geometry(&mut self) {}
}

/// A drawable item.
#[derive(Debug, Clone)]
pub enum Item {
    Brush(BrushPath),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
}

impl Item {
    /// New brush stroke whose local origin and first sample sit at `origin`.
    pub fn brush(origin: Point, paint: Paint) -> Self {
        Self::built(Item::Brush(BrushPath::new(Uuid::new_v4(), origin, paint)))
    }

    pub fn rectangle(position: Point, width: f64, height: f64, paint: Paint) -> Self {
        Self::built(Item::Rectangle(Rectangle::new(
            Uuid::new_v4(),
            position,
            width,
            height,
            paint,
        )))
    }

    /// New ellipse inscribed in the box `position .. position + 2 * radii`.
    pub fn ellipse(position: Point, radius_x: f64, radius_y: f64, paint: Paint) -> Self {
        Self::built(Item::Ellipse(Ellipse::new(
            Uuid::new_v4(),
            position,
            radius_x,
            radius_y,
            paint,
        )))
    }

    /// Rebuild a committed item from persisted props.
    pub fn from_props(props: &ItemProps) -> Self {
        if props.kind != props.style.kind() {
            log::warn!(
                "item {} declares kind {:?} but carries {:?} style; using the style",
                props.id,
                props.kind,
                props.style.kind()
            );
        }
        let placement = Placement {
            position: props.position,
            scale: props.scale,
            angle: props.angle,
        };
        let mut item = match &props.style {
            ItemStyle::Brush(style) => Item::Brush(BrushPath::from_style(props.id, placement, style.clone())),
            ItemStyle::Rectangle(style) => {
                Item::Rectangle(Rectangle::from_style(props.id, placement, style.clone()))
            }
            ItemStyle::Ellipse(style) => Item::Ellipse(Ellipse::from_style(props.id, placement, style.clone())),
        };
        item.inner_mut().base_mut().z_order = props.z_order;
        item.finalize();
        item
    }

    fn built(mut item: Item) -> Self {
        item.redraw();
        item
    }

    fn inner(&self) -> &dyn ItemTrait {
        match self {
            Item::Brush(b) => b,
            Item::Rectangle(r) => r,
            Item::Ellipse(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ItemTrait {
        match self {
            Item::Brush(b) => b,
            Item::Rectangle(r) => r,
            Item::Ellipse(e) => e,
        }
    }

    pub fn id(&self) -> ItemId {
        self.inner().base().id
    }

    pub fn kind(&self) -> ItemKind {
        self.inner().kind()
    }

    pub fn placement(&self) -> Placement {
        self.inner().base().placement
    }

    pub fn z_order(&self) -> i32 {
        self.inner().base().z_order
    }

    pub fn paint(&self) -> &Paint {
        self.inner().paint()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner().base().destroyed
    }

    /// Whether the item has been committed and takes part in hit-testing.
    pub fn is_interactive(&self) -> bool {
        let base = self.inner().base();
        base.interactive && !base.destroyed
    }

    pub fn is_dimmed(&self) -> bool {
        self.inner().base().dimmed
    }

    /// Last computed visual, `None` once destroyed.
    pub fn visual(&self) -> Option<&ItemVisual> {
        self.inner().base().visual.as_ref()
    }

    /// Axis-aligned bounding box in world space.
    pub fn bounds(&self) -> Rect {
        let inner = self.inner();
        inner.base().placement.affine().transform_rect_bbox(inner.local_bounds())
    }

    /// Check if a world-space point hits this item.
    ///
    /// The bounding box rejects most misses before the precise test runs.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.is_destroyed() {
            return false;
        }
        if !self.bounds().inflate(tolerance, tolerance).contains(point) {
            return false;
        }
        let placement = self.placement();
        let local = placement.affine().inverse() * point;
        self.inner().hit_test_local(local, tolerance / placement.mean_scale())
    }

    /// Snapshot of the placement, style and z-order.
    pub fn get_props(&self) -> ItemProps {
        let inner = self.inner();
        let base = inner.base();
        ItemProps {
            id: base.id,
            kind: inner.kind(),
            position: base.placement.position,
            scale: base.placement.scale,
            angle: base.placement.angle,
            z_order: base.z_order,
            style: inner.style_props(),
        }
    }

    /// Shallow-merge a partial update and redraw.
    ///
    /// Top-level fields replace the current ones; a style patch replaces only the
    /// style keys it carries. Destroyed items ignore the call.
    pub fn set_props(&mut self, patch: &PropsPatch) {
        if self.is_destroyed() {
            log::debug!("ignoring set_props on destroyed item {}", self.id());
            return;
        }
        let inner = self.inner_mut();
        let base = inner.base_mut();
        if let Some(position) = patch.position {
            base.placement.position = position;
        }
        if let Some(scale) = patch.scale {
            base.placement.scale = scale;
        }
        if let Some(angle) = patch.angle {
            base.placement.angle = angle;
        }
        if let Some(z_order) = patch.z_order {
            base.z_order = z_order;
        }
        if let Some(style) = &patch.style {
            inner.apply_style(style);
        }
        self.redraw();
    }

    /// Recompute the visual geometry. Idempotent; a no-op once destroyed.
    pub fn redraw(&mut self) {
        if self.is_destroyed() {
            return;
        }
        let visual = self.inner().build_visual();
        self.inner_mut().base_mut().visual = Some(visual);
    }

    /// Commit the gesture that created this item: compute hit geometry once and
    /// make the item interactive.
    pub fn finalize(&mut self) {
        if self.is_destroyed() {
            return;
        }
        let inner = self.inner_mut();
        inner.finalize_geometry();
        inner.base_mut().interactive = true;
        self.redraw();
    }

    /// Mark the item as about to be erased (drawn translucent).
    pub fn set_dimmed(&mut self, dimmed: bool) {
        if self.is_destroyed() || self.is_dimmed() == dimmed {
            return;
        }
        self.inner_mut().base_mut().dimmed = dimmed;
        self.redraw();
    }

    /// Append a brush sample given in world space. Other kinds ignore it.
    ///
    /// Returns whether a sample was added.
    pub fn push_sample(&mut self, world_point: Point) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let added = match self {
            Item::Brush(brush) => brush.push_sample(world_point),
            _ => false,
        };
        if added {
            self.redraw();
        }
        added
    }

    /// Release the visual and stop reacting to mutations.
    pub fn destroy(&mut self) {
        let base = self.inner_mut().base_mut();
        base.destroyed = true;
        base.interactive = false;
        base.visual = None;
    }

    /// Issue draw calls for the current visual. `view` maps world to screen.
    pub fn draw(&self, renderer: &mut dyn Renderer, view: Affine) {
        let Some(visual) = self.visual() else {
            return;
        };
        let transform = view * visual.transform;
        if let Some(fill) = visual.fill {
            renderer.fill_path(Layer::Items, &visual.path, transform, fill.into());
        }
        if let Some(stroke) = visual.stroke {
            let mut spec = StrokeSpec::new(stroke.color.into(), stroke.width);
            if stroke.round {
                spec = spec.rounded();
            }
            renderer.stroke_path(Layer::Items, &visual.path, transform, &spec);
        }
    }
}
