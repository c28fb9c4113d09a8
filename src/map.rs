//! The static waypoint table and the road-relative coordinate transforms.

use crate::math::{bearing, rot90, Point2d, Vector2d};
use cgmath::prelude::*;
use itertools::Itertools;
use std::f64::consts::{FRAC_PI_4, PI};
use std::path::Path;
use thiserror::Error;

/// The total arc length of the standard highway track, in m.
pub const HIGHWAY_TRACK_LENGTH: f64 = 6945.554;

/// The fixed off-track reference point used to resolve the sign of `d`.
const D_SIGN_REF: Point2d = Point2d {
    x: 1000.0,
    y: 2000.0,
};

/// A single row of the waypoint table.
#[derive(Clone, Copy, Debug)]
pub struct Waypoint {
    /// The waypoint position in map coordinates.
    pub pos: Point2d,
    /// The arc length from the start of the track, in m.
    pub s: f64,
    /// The lateral unit vector, pointing away from the road centre line.
    pub normal: Vector2d,
}

/// Road-relative coordinates: `s` is arc length along the centre line and
/// `d` is the signed lateral offset from it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frenet {
    pub s: f64,
    pub d: f64,
}

/// An error loading a waypoint table.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read waypoint table")]
    Io(#[from] std::io::Error),
    #[error("malformed waypoint record on line {0}")]
    Malformed(usize),
}

/// The road centre line as an ordered, immutable table of waypoints.
///
/// Loaded once at startup; all of the planner's coordinate transforms run
/// against this table.
#[derive(Clone, Debug)]
pub struct WaypointMap {
    waypoints: Vec<Waypoint>,
    /// Cumulative polyline length up to each waypoint, in m.
    arc: Vec<f64>,
    /// The s value at which the track wraps back to 0.
    max_s: f64,
}

impl WaypointMap {
    /// Loads a waypoint table from a text file with one whitespace-separated
    /// `x y s dx dy` record per line.
    pub fn from_file(path: impl AsRef<Path>, max_s: f64) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path)?;
        let waypoints = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                let fields = line
                    .split_whitespace()
                    .map(str::parse)
                    .collect::<Result<Vec<f64>, _>>()
                    .map_err(|_| MapError::Malformed(idx + 1))?;
                let [x, y, s, dx, dy]: [f64; 5] =
                    fields.try_into().map_err(|_| MapError::Malformed(idx + 1))?;
                Ok(Waypoint {
                    pos: Point2d::new(x, y),
                    s,
                    normal: Vector2d::new(dx, dy),
                })
            })
            .collect::<Result<Vec<_>, MapError>>()?;
        Ok(Self::from_waypoints(waypoints, max_s))
    }

    /// Builds a map directly from a waypoint table.
    ///
    /// The waypoints must be ordered with non-decreasing `s`.
    pub fn from_waypoints(waypoints: Vec<Waypoint>, max_s: f64) -> Self {
        let arc = std::iter::once(0.0)
            .chain(waypoints.iter().tuple_windows().scan(0.0, |acc, (a, b)| {
                *acc += (b.pos - a.pos).magnitude();
                Some(*acc)
            }))
            .collect();
        Self {
            waypoints,
            arc,
            max_s,
        }
    }

    /// The number of waypoints in the table.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The s value at which the track wraps back to 0.
    pub fn max_s(&self) -> f64 {
        self.max_s
    }

    /// Finds the index of the waypoint nearest to `point`.
    /// Ties resolve to the earlier index.
    pub fn closest_waypoint(&self, point: Point2d) -> usize {
        let mut closest = 0;
        let mut closest_dist = f64::INFINITY;
        for (idx, wp) in self.waypoints.iter().enumerate() {
            let dist = wp.pos.distance2(point);
            if dist < closest_dist {
                closest_dist = dist;
                closest = idx;
            }
        }
        closest
    }

    /// Finds the waypoint ahead of a vehicle at `point` heading along `yaw`.
    ///
    /// Starts from the closest waypoint and skips it when it lies more than
    /// 45 degrees off the vehicle's heading, wrapping past the table end.
    pub fn next_waypoint(&self, point: Point2d, yaw: f64) -> usize {
        let closest = self.closest_waypoint(point);
        let heading = bearing(point, self.waypoints[closest].pos);

        let angle = (yaw - heading).abs();
        let angle = f64::min(2.0 * PI - angle, angle);

        if angle > FRAC_PI_4 {
            (closest + 1) % self.waypoints.len()
        } else {
            closest
        }
    }

    /// Converts a map-frame pose to Frenet coordinates.
    pub fn to_frenet(&self, point: Point2d, yaw: f64) -> Frenet {
        let next = self.next_waypoint(point, yaw);
        let prev = if next == 0 {
            self.waypoints.len() - 1
        } else {
            next - 1
        };

        // Project the vehicle's offset from `prev` onto the segment
        let seg = self.waypoints[next].pos - self.waypoints[prev].pos;
        let offset = point - self.waypoints[prev].pos;
        let proj = (offset.dot(seg) / seg.magnitude2()) * seg;

        let mut d = (offset - proj).magnitude();

        // The residual being closer to the fixed reference point than the
        // projection means the vehicle is on the negative-d side
        let centre = D_SIGN_REF - self.waypoints[prev].pos;
        if (centre - offset).magnitude() <= (centre - proj).magnitude() {
            d = -d;
        }

        Frenet {
            s: self.arc[prev] + proj.magnitude(),
            d,
        }
    }

    /// Converts Frenet coordinates back to a map-frame point.
    ///
    /// `s` values past the end of the track wrap back around to the start.
    pub fn from_frenet(&self, frenet: Frenet) -> Point2d {
        let s = frenet.s.rem_euclid(self.max_s);

        let prev = self
            .waypoints
            .partition_point(|wp| wp.s <= s)
            .saturating_sub(1);
        let next = (prev + 1) % self.waypoints.len();

        let dir = (self.waypoints[next].pos - self.waypoints[prev].pos).normalize();
        let seg_s = s - self.waypoints[prev].s;
        let centre = self.waypoints[prev].pos + seg_s * dir;

        centre - frenet.d * rot90(dir)
    }
}
