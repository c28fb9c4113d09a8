use super::{Point2d, Vector2d};
use cgmath::prelude::*;

/// A local coordinate frame defined by an origin and a rotation.
///
/// The same sine and cosine pair drives both directions of the transform,
/// so `to_world` is the exact floating-point inverse of `to_local`.
#[derive(Clone, Copy, Debug)]
pub struct LocalFrame {
    origin: Point2d,
    cos: f64,
    sin: f64,
}

impl LocalFrame {
    /// Creates a frame at `origin` whose x-axis points along `angle` radians.
    pub fn new(origin: Point2d, angle: f64) -> Self {
        Self {
            origin,
            cos: angle.cos(),
            sin: angle.sin(),
        }
    }

    /// Creates the frame with origin `b` whose x-axis points from `a` towards `b`.
    pub fn from_points(a: Point2d, b: Point2d) -> Self {
        let dir = (b - a).normalize();
        Self {
            origin: b,
            cos: dir.x,
            sin: dir.y,
        }
    }

    /// The bearing of the frame's x-axis, in radians.
    pub fn angle(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    /// Maps a world-space point into the frame.
    pub fn to_local(&self, point: Point2d) -> Point2d {
        let p = point - self.origin;
        Point2d::new(p.x * self.cos + p.y * self.sin, -p.x * self.sin + p.y * self.cos)
    }

    /// Maps a point in the frame back to world space.
    pub fn to_world(&self, point: Point2d) -> Point2d {
        let v = Vector2d::new(
            point.x * self.cos - point.y * self.sin,
            point.x * self.sin + point.y * self.cos,
        );
        self.origin + v
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    #[test]
    fn from_points_aligns_x_axis() {
        let a = Point2d::new(3.0, 4.0);
        let b = Point2d::new(6.0, 8.0);
        let frame = LocalFrame::from_points(a, b);

        let local_b = frame.to_local(b);
        assert_approx_eq!(local_b.x, 0.0);
        assert_approx_eq!(local_b.y, 0.0);

        let local_a = frame.to_local(a);
        assert_approx_eq!(local_a.x, -5.0);
        assert_approx_eq!(local_a.y, 0.0);
    }

    #[test]
    fn round_trip() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"highway planner highway planner!");
        for _i in 0..100 {
            let frame = LocalFrame::new(
                Point2d::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)),
                rng.gen_range(-10.0..10.0),
            );
            let p = Point2d::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
            let q = frame.to_world(frame.to_local(p));
            assert_approx_eq!(p.x, q.x, 1e-9);
            assert_approx_eq!(p.y, q.y, 1e-9);
        }
    }
}
