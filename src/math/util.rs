use super::{Point2d, Vector2d};

/// Rotates a vector 90 degrees anti-clockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// The bearing of `to` as seen from `from`, in radians.
pub fn bearing(from: Point2d, to: Point2d) -> f64 {
    let v = to - from;
    v.y.atan2(v.x)
}
