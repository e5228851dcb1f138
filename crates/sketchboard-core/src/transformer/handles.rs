//! Handle layout and hit regions.
//!
//! Handles live in screen space so they keep a constant size at every zoom level.

use kurbo::{Point, Rect};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn point(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Midpoint of the edge.
    pub fn point(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            Edge::Top => Point::new(center.x, rect.y0),
            Edge::Right => Point::new(rect.x1, center.y),
            Edge::Bottom => Point::new(center.x, rect.y1),
            Edge::Left => Point::new(rect.x0, center.y),
        }
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    /// Edge segment as a zero-thickness rect.
    fn segment(self, rect: Rect) -> Rect {
        match self {
            Edge::Top => Rect::new(rect.x0, rect.y0, rect.x1, rect.y0),
            Edge::Right => Rect::new(rect.x1, rect.y0, rect.x1, rect.y1),
            Edge::Bottom => Rect::new(rect.x0, rect.y1, rect.x1, rect.y1),
            Edge::Left => Rect::new(rect.x0, rect.y0, rect.x0, rect.y1),
        }
    }
}

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Resize against the opposite corner.
    Corner(Corner),
    /// Resize one axis against the opposite edge.
    Edge(Edge),
    /// Rotation knob above the top edge.
    Rotate,
}

/// Handle sizes in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    /// Visible corner square edge length.
    pub size: f64,
    /// Invisible padding added around every hit region.
    pub hit_padding: f64,
    /// Distance of the rotate knob above the top edge.
    pub rotate_offset: f64,
}

/// Visible thickness of edge handles.
pub const EDGE_THICKNESS: f64 = 2.0;

/// A manipulation handle, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Anchor point of the handle.
    pub position: Point,
    /// Drawn area.
    pub visible: Rect,
    /// Pointer target, larger than the drawn area.
    pub hit: Rect,
}

impl Handle {
    pub fn hit_test(&self, point: Point) -> bool {
        let hit = self.hit;
        point.x >= hit.x0 && point.x <= hit.x1 && point.y >= hit.y0 && point.y <= hit.y1
    }
}

/// Lay out the handles around a screen-space box, in hit-test priority order:
/// rotate knob, then corners, then edges.
pub fn layout(bounds: Rect, metrics: &HandleMetrics) -> Vec<Handle> {
    let half = metrics.size / 2.0;
    let pad = metrics.hit_padding;
    let mut handles = Vec::with_capacity(9);

    let knob = Point::new(bounds.center().x, bounds.y0 - metrics.rotate_offset);
    let knob_rect = Rect::from_center_size(knob, (metrics.size, metrics.size));
    handles.push(Handle {
        kind: HandleKind::Rotate,
        position: knob,
        visible: knob_rect,
        hit: knob_rect.inflate(pad, pad),
    });

    for corner in Corner::ALL {
        let position = corner.point(bounds);
        let visible = Rect::new(position.x - half, position.y - half, position.x + half, position.y + half);
        handles.push(Handle {
            kind: HandleKind::Corner(corner),
            position,
            visible,
            hit: visible.inflate(pad, pad),
        });
    }

    let thickness = EDGE_THICKNESS / 2.0;
    for edge in Edge::ALL {
        let visible = edge.segment(bounds).inflate(thickness, thickness);
        handles.push(Handle {
            kind: HandleKind::Edge(edge),
            position: edge.point(bounds),
            visible,
            hit: visible.inflate(pad, pad),
        });
    }
    handles
}
