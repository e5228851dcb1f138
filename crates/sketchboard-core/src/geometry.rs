//! Point and vector helpers shared by items, the transformer and the background.
//!
//! Angles are in degrees throughout the engine; screen and world space both have
//! the y axis pointing down, so a positive angle turns clockwise on screen.

use kurbo::{BezPath, Point, Vec2};

/// Rotate `point` around `pivot` by `angle_degrees`.
pub fn rotate_around(pivot: Point, point: Point, angle_degrees: f64) -> Point {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

/// Direction of the vector `a -> b` in degrees, normalized to `[0, 360)`.
pub fn angle_between(a: Point, b: Point) -> f64 {
    normalize_degrees((b.y - a.y).atan2(b.x - a.x).to_degrees())
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Midpoint of the segment `a -> b`.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Clamp `value` into `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Round `value` to the nearest multiple of `step`.
///
/// A non-positive step returns the value unchanged.
pub fn round_to_nearest_multiple(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Round `value` to a decimal precision such as `0.1` or `0.01`.
///
/// When `1 / precision` is an integer the division is done by that integer, which
/// keeps whole numbers exact (`15.0` stays `15.0` instead of `15.000000000000002`).
pub fn round_to_precision(value: f64, precision: f64) -> f64 {
    if precision <= 0.0 {
        return value;
    }
    let inverse = 1.0 / precision;
    if (inverse - inverse.round()).abs() < 1e-9 {
        let factor = inverse.round();
        (value * factor).round() / factor
    } else {
        round_to_nearest_multiple(value, precision)
    }
}

/// Round both coordinates of a point with [`round_to_precision`].
pub fn round_point(point: Point, precision: f64) -> Point {
    Point::new(
        round_to_precision(point.x, precision),
        round_to_precision(point.y, precision),
    )
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Minimum distance from a point to a polyline.
///
/// A single-point polyline measures the distance to that point.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => (point - *only).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Number of segments used to approximate a round dot.
const DOT_SEGMENTS: usize = 16;

/// Polygon approximating a circle of the given radius.
pub fn circle_polygon(center: Point, radius: f64) -> Vec<Point> {
    (0..DOT_SEGMENTS)
        .map(|i| {
            let theta = i as f64 / DOT_SEGMENTS as f64 * std::f64::consts::TAU;
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

/// Build the outline polygon of a stroke with the given width.
///
/// Each segment contributes two points offset by half the width along its normal,
/// forming a left and a right rail. The rails are joined by caps extrapolated half
/// a width beyond the first and last points along the end segment directions.
/// Strokes with no usable segment (one sample, or all samples coincident) become
/// a circle of diameter `width`, so the outline is never empty.
pub fn stroke_outline(points: &[Point], width: f64) -> Vec<Point> {
    let half = (width / 2.0).max(0.5);

    let segments: Vec<(Point, Point, Vec2)> = points
        .windows(2)
        .filter_map(|w| {
            let dir = w[1] - w[0];
            let len = dir.hypot();
            (len > f64::EPSILON).then(|| (w[0], w[1], dir / len))
        })
        .collect();

    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        let center = points.first().copied().unwrap_or(Point::ZERO);
        return circle_polygon(center, half);
    };

    let mut left = Vec::with_capacity(segments.len() * 2);
    let mut right = Vec::with_capacity(segments.len() * 2);
    for &(a, b, dir) in &segments {
        let normal = Vec2::new(-dir.y, dir.x) * half;
        left.push(a + normal);
        left.push(b + normal);
        right.push(a - normal);
        right.push(b - normal);
    }

    let start_cap = first.0 - first.2 * half;
    let end_cap = last.1 + last.2 * half;

    let mut outline = Vec::with_capacity(left.len() + right.len() + 2);
    outline.push(start_cap);
    outline.extend(left);
    outline.push(end_cap);
    outline.extend(right.into_iter().rev());
    outline
}

/// Closed path through the polygon's vertices.
pub fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for point in rest {
        path.line_to(*point);
    }
    path.close_path();
    path
}
