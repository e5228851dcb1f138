//! Group transform of the selection.
//!
//! The transformer owns the selection and its drag-start snapshots. Every drag
//! update is computed from those snapshots, never from the previous update, so
//! many small pointer moves cannot accumulate drift. The group bounding box taken
//! at the start of a gesture is the pivot and resize base for the whole gesture.

mod handles;

pub use handles::{layout, Corner, Edge, Handle, HandleKind, HandleMetrics, EDGE_THICKNESS};

use crate::camera::Viewport;
use crate::geometry::{angle_between, normalize_degrees, rotate_around, round_point, round_to_precision};
use crate::items::{ItemId, PropsPatch, SerializableColor};
use crate::render::{Layer, Renderer, StrokeSpec};
use crate::scene::Scene;
use crate::selection::Selection;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape, Vec2};

/// Angle added to the pivot→cursor direction so that a cursor straight above the
/// pivot (where the rotate knob rests) means no rotation.
pub const ROTATE_HANDLE_REST_OFFSET: f64 = 90.0;

/// Smallest scale factor a resize can produce.
pub const MIN_RESIZE_SCALE: f64 = 0.05;

/// Outline and handle border color.
const SELECTION_COLOR: SerializableColor = SerializableColor { r: 59, g: 130, b: 246, a: 255 };

/// Transformer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformerConfig {
    pub handles: HandleMetrics,
    /// Rounding step for positions and angles.
    pub precision: f64,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            handles: HandleMetrics {
                size: 8.0,
                hit_padding: 8.0,
                rotate_offset: 30.0,
            },
            precision: 0.1,
        }
    }
}

/// Owns the selection and manipulates it as one rigid group.
#[derive(Debug)]
pub struct Transformer {
    config: TransformerConfig,
    selection: Selection,
    /// Group bounds at the start of the current gesture.
    origin_bounds: Option<Rect>,
    /// Live group bounds.
    bounds: Option<Rect>,
    visible: bool,
    /// Bumped every time the handles are torn down and rebuilt for a new selection.
    generation: u64,
}

impl Transformer {
    pub fn new(config: TransformerConfig) -> Self {
        Self {
            config,
            selection: Selection::new(),
            origin_bounds: None,
            bounds: None,
            visible: true,
            generation: 0,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.selection.ids().to_vec()
    }

    /// Live aggregate bounding box of the selection.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Centroid of the aggregate bounding box.
    pub fn center(&self) -> Option<Point> {
        self.bounds.map(|b| b.center())
    }

    /// Pivot used by rotations in the current gesture.
    pub fn pivot(&self) -> Option<Point> {
        self.origin_bounds.map(|b| b.center())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the handles without touching the selection.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Replace the selection with the given items.
    pub fn set_selection(&mut self, scene: &Scene, ids: impl IntoIterator<Item = ItemId>) {
        self.selection.replace(scene, ids);
        self.rebuild(scene);
    }

    /// Apply the pointer-down selection rules. Returns whether the selection changed.
    pub fn apply_click(&mut self, scene: &Scene, hit: Option<ItemId>, shift: bool) -> bool {
        let changed = self.selection.apply_click(scene, hit, shift);
        if changed {
            self.rebuild(scene);
        }
        changed
    }

    pub fn clear(&mut self) {
        if self.selection.is_empty() && self.bounds.is_none() {
            return;
        }
        self.selection.clear();
        self.origin_bounds = None;
        self.bounds = None;
        self.generation += 1;
    }

    /// Drop an item from the selection, e.g. after it was erased.
    pub fn remove(&mut self, scene: &Scene, id: ItemId) {
        if self.selection.remove(id) {
            self.rebuild(scene);
        }
    }

    /// Tear down and rebuild snapshots and bounds for the current selection.
    fn rebuild(&mut self, scene: &Scene) {
        self.selection.resnapshot(scene);
        self.bounds = scene.bounds_of(self.selection.ids().iter().copied());
        self.origin_bounds = self.bounds;
        self.generation += 1;
        log::debug!("selection now holds {} item(s)", self.selection.len());
    }

    /// Start a drag gesture: snapshot the committed state of every selected item.
    pub fn begin(&mut self, scene: &Scene) {
        self.selection.resnapshot(scene);
        self.bounds = scene.bounds_of(self.selection.ids().iter().copied());
        self.origin_bounds = self.bounds;
    }

    fn refresh_bounds(&mut self, scene: &Scene) {
        self.bounds = scene.bounds_of(self.selection.ids().iter().copied());
    }

    /// Move every selected item so it keeps its offset from the drag anchor.
    pub fn translate(&mut self, scene: &mut Scene, cursor: Point, pointer_down: Point) {
        let precision = self.config.precision;
        for entry in self.selection.iter() {
            let Some(item) = scene.get_mut(entry.ref_id) else {
                continue;
            };
            let position = cursor + (entry.original_position - pointer_down);
            item.set_props(&PropsPatch::position(round_point(position, precision)));
        }
        self.refresh_bounds(scene);
    }

    /// Rotate the group about the gesture pivot so that the rotate knob follows the
    /// cursor. Returns the group angle in degrees.
    pub fn rotate(&mut self, scene: &mut Scene, cursor: Point) -> Option<f64> {
        let pivot = self.pivot()?;
        let angle = normalize_degrees(angle_between(pivot, cursor) + ROTATE_HANDLE_REST_OFFSET);
        self.rotate_by(scene, pivot, angle);
        Some(angle)
    }

    /// Rotate every selected item rigidly about `pivot` by `angle` degrees from
    /// its drag-start placement.
    pub fn rotate_by(&mut self, scene: &mut Scene, pivot: Point, angle: f64) {
        let precision = self.config.precision;
        for entry in self.selection.iter() {
            let Some(item) = scene.get_mut(entry.ref_id) else {
                continue;
            };
            let position = rotate_around(pivot, entry.original_position, angle);
            let item_angle = normalize_degrees(round_to_precision(
                normalize_degrees(entry.original_angle + angle),
                precision,
            ));
            item.set_props(&PropsPatch {
                position: Some(round_point(position, precision)),
                angle: Some(item_angle),
                ..Default::default()
            });
        }
        self.refresh_bounds(scene);
    }

    /// Scale the group against the corner or edge opposite to `handle`.
    pub fn resize(&mut self, scene: &mut Scene, handle: HandleKind, cursor: Point) {
        let Some(base) = self.origin_bounds else {
            return;
        };
        let (anchor, grabbed, axes) = match handle {
            HandleKind::Corner(corner) => {
                (corner.opposite().point(base), corner.point(base), (true, true))
            }
            HandleKind::Edge(edge) => {
                let horizontal = matches!(edge, Edge::Left | Edge::Right);
                (edge.opposite().point(base), edge.point(base), (horizontal, !horizontal))
            }
            HandleKind::Rotate => return,
        };
        let factor = |enabled: bool, cursor: f64, grabbed: f64, anchor: f64| {
            let extent = grabbed - anchor;
            if !enabled || extent.abs() < f64::EPSILON {
                return 1.0;
            }
            ((cursor - anchor) / extent).max(MIN_RESIZE_SCALE)
        };
        let sx = factor(axes.0, cursor.x, grabbed.x, anchor.x);
        let sy = factor(axes.1, cursor.y, grabbed.y, anchor.y);

        let precision = self.config.precision;
        for entry in self.selection.iter() {
            let Some(item) = scene.get_mut(entry.ref_id) else {
                continue;
            };
            let offset = entry.original_position - anchor;
            let position = anchor + Vec2::new(offset.x * sx, offset.y * sy);
            let local = local_factors(entry.original_angle, sx, sy);
            let scale = Vec2::new(entry.original_scale.x * local.x, entry.original_scale.y * local.y);
            item.set_props(&PropsPatch {
                position: Some(round_point(position, precision)),
                scale: Some(scale),
                ..Default::default()
            });
        }
        self.refresh_bounds(scene);
    }

    /// End a gesture: returns the ids whose placement changed and takes new snapshots.
    pub fn commit(&mut self, scene: &Scene) -> Vec<ItemId> {
        let changed = self
            .selection
            .iter()
            .filter(|entry| {
                scene.get(entry.ref_id).is_some_and(|item| {
                    let placement = item.placement();
                    placement.position != entry.original_position
                        || placement.angle != entry.original_angle
                        || placement.scale != entry.original_scale
                })
            })
            .map(|entry| entry.ref_id)
            .collect();
        self.begin(scene);
        changed
    }

    /// Abort a gesture: put every selected item back at its drag-start placement.
    pub fn restore(&mut self, scene: &mut Scene) {
        for entry in self.selection.iter() {
            if let Some(item) = scene.get_mut(entry.ref_id) {
                item.set_props(&PropsPatch {
                    position: Some(entry.original_position),
                    angle: Some(entry.original_angle),
                    scale: Some(entry.original_scale),
                    ..Default::default()
                });
            }
        }
        self.begin(scene);
    }

    /// Handles around the live bounds, in screen space.
    pub fn handles(&self, viewport: &Viewport) -> Vec<Handle> {
        match (self.visible, self.bounds) {
            (true, Some(bounds)) => {
                layout(viewport.transform().transform_rect_bbox(bounds), &self.config.handles)
            }
            _ => Vec::new(),
        }
    }

    /// Handle under a screen point, if any.
    pub fn hit_handle(&self, viewport: &Viewport, screen_point: Point) -> Option<HandleKind> {
        self.handles(viewport)
            .into_iter()
            .find(|handle| handle.hit_test(screen_point))
            .map(|handle| handle.kind)
    }

    /// Draw the outline and handles on the handle layer.
    pub fn draw(&self, renderer: &mut dyn Renderer, viewport: &Viewport) {
        let (true, Some(bounds)) = (self.visible, self.bounds) else {
            return;
        };
        let screen_bounds = viewport.transform().transform_rect_bbox(bounds);
        let outline = StrokeSpec::new(SELECTION_COLOR.into(), 1.0);
        renderer.stroke_path(Layer::Handles, &screen_bounds.to_path(0.1), Affine::IDENTITY, &outline);

        for handle in layout(screen_bounds, &self.config.handles) {
            match handle.kind {
                HandleKind::Rotate => {
                    let mut stem = BezPath::new();
                    stem.move_to(Point::new(handle.position.x, screen_bounds.y0));
                    stem.line_to(handle.position);
                    renderer.stroke_path(Layer::Handles, &stem, Affine::IDENTITY, &outline);
                    let knob = Circle::new(handle.position, self.config.handles.size / 2.0).to_path(0.1);
                    renderer.fill_path(Layer::Handles, &knob, Affine::IDENTITY, SerializableColor::white().into());
                    renderer.stroke_path(Layer::Handles, &knob, Affine::IDENTITY, &outline);
                }
                HandleKind::Corner(_) => {
                    let square = handle.visible.to_path(0.1);
                    renderer.fill_path(Layer::Handles, &square, Affine::IDENTITY, SerializableColor::white().into());
                    renderer.stroke_path(Layer::Handles, &square, Affine::IDENTITY, &outline);
                }
                HandleKind::Edge(_) => {
                    renderer.fill_path(
                        Layer::Handles,
                        &handle.visible.to_path(0.1),
                        Affine::IDENTITY,
                        SELECTION_COLOR.into(),
                    );
                }
            }
        }
    }
}

/// Stretch of each local item axis under the world-axis scale `(sx, sy)`.
///
/// Exact for right-angle rotations, where the factors swap at 90 and 270 degrees.
/// Other angles keep the item rectangular, so the result only approximates the
/// sheared shape a true world-axis stretch would produce.
fn local_factors(angle: f64, sx: f64, sy: f64) -> Vec2 {
    let (sin, cos) = angle.to_radians().sin_cos();
    let along_x = Vec2::new(cos * sx, sin * sy).hypot();
    let along_y = Vec2::new(-sin * sx, cos * sy).hypot();
    Vec2::new(along_x, along_y)
}
