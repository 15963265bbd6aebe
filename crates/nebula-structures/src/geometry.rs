//! Distance primitives over the horizontal plane.

use glam::{IVec2, Vec2};
use nebula_facet::Rect2;

/// Euclidean distance from `p` to the closed segment `a..b`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Distance from `p` to the nearest column of `rect`, zero inside it.
pub fn distance_to_rect(p: Vec2, rect: Rect2) -> f32 {
    let min = rect.min.as_vec2();
    let max = rect.max().as_vec2();
    let clamped = p.clamp(min, max);
    p.distance(clamped)
}

/// Whether a disc of `radius` around `center` reaches any column of `rect`.
pub fn disc_touches_rect(center: IVec2, radius: f32, rect: Rect2) -> bool {
    !rect.is_empty() && distance_to_rect(center.as_vec2(), rect) <= radius
}

/// Smallest rectangle holding every column within `reach` of segment `a..b`.
pub fn segment_bounds(a: Vec2, b: Vec2, reach: f32) -> Rect2 {
    let min = (a.min(b) - Vec2::splat(reach)).floor().as_ivec2();
    let max = (a.max(b) + Vec2::splat(reach)).ceil().as_ivec2();
    Rect2::from_min_max(min, max)
}
