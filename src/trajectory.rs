//! Spline-based path synthesis with acceleration-bounded sampling.

use crate::behavior::SpeedChange;
use crate::map::{Frenet, WaypointMap};
use crate::math::{CubicSpline, LocalFrame, Point2d, Vector2d};
use crate::planner::PlannerConfig;
use crate::telemetry::Telemetry;
use arrayvec::ArrayVec;
use cgmath::prelude::*;
use cgmath::{Deg, Rad};
use serde::Serialize;

/// Tail points closer together than this carry no usable heading, in m.
const MIN_SEED_DIST: f64 = 1e-6;

/// A planned trajectory: parallel sequences of map-frame coordinates, one
/// point per time step, consumed front to back by the executor.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Trajectory {
    pub next_x: Vec<f64>,
    pub next_y: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            next_x: Vec::with_capacity(capacity),
            next_y: Vec::with_capacity(capacity),
        }
    }

    /// The number of points in the trajectory.
    pub fn len(&self) -> usize {
        self.next_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next_x.is_empty()
    }

    /// Appends a point.
    pub fn push(&mut self, point: Point2d) {
        self.next_x.push(point.x);
        self.next_y.push(point.y);
    }

    /// Iterates over the trajectory's points.
    pub fn points(&self) -> impl Iterator<Item = Point2d> + '_ {
        self.next_x
            .iter()
            .zip(&self.next_y)
            .map(|(x, y)| Point2d::new(*x, *y))
    }
}

/// Generates this cycle's trajectory.
///
/// The unconsumed tail of the previous trajectory is emitted verbatim, and
/// new samples are appended along a spline fitted through the tail's end
/// and three lane-centre anchors, so consecutive outputs join without a
/// kink. `ref_vel` is adjusted once per appended sample, which bounds the
/// acceleration between consecutive points.
pub(crate) fn generate(
    map: &WaypointMap,
    telemetry: &Telemetry,
    anchor_s: f64,
    lane: usize,
    ref_vel: &mut f64,
    speed: SpeedChange,
    config: &PlannerConfig,
) -> Trajectory {
    let tail_x = &telemetry.previous_path_x;
    let tail_y = &telemetry.previous_path_y;
    let tail_len = tail_x.len();

    // Seed the anchor list with two points tangent to the path's end, so
    // the spline continues smoothly from whatever was already emitted.
    // A tail ending in coincident points (a vehicle planned to a stop)
    // carries no usable heading and seeds from the live pose instead.
    let mut anchors: ArrayVec<Point2d, 5> = ArrayVec::new();
    let tail_end = (tail_len >= 2)
        .then(|| {
            let last = Point2d::new(tail_x[tail_len - 1], tail_y[tail_len - 1]);
            let second_last = Point2d::new(tail_x[tail_len - 2], tail_y[tail_len - 2]);
            (second_last, last)
        })
        .filter(|(a, b)| a.distance2(*b) > MIN_SEED_DIST * MIN_SEED_DIST);
    let frame = match tail_end {
        Some((second_last, last)) => {
            anchors.push(second_last);
            anchors.push(last);
            LocalFrame::from_points(second_last, last)
        }
        None => {
            let ego = Point2d::new(telemetry.x, telemetry.y);
            let yaw = Rad::from(Deg(telemetry.yaw)).0;
            anchors.push(ego - Vector2d::new(yaw.cos(), yaw.sin()));
            anchors.push(ego);
            LocalFrame::new(ego, yaw)
        }
    };

    // Three more anchors spaced down the target lane's centre line
    let lane_centre = config.lane_width * (lane as f64 + 0.5);
    for i in 1..=3 {
        let s = anchor_s + i as f64 * config.anchor_spacing;
        anchors.push(map.from_frenet(Frenet { s, d: lane_centre }));
    }

    // Fit the spline in the vehicle-aligned frame, where the anchors are
    // monotonic in x
    let (xs, ys): (Vec<f64>, Vec<f64>) = anchors
        .iter()
        .map(|p| {
            let p = frame.to_local(*p);
            (p.x, p.y)
        })
        .unzip();
    let spline = CubicSpline::fit(&xs, &ys);

    // The previous tail is reused verbatim
    let mut out = Trajectory::with_capacity(config.horizon);
    for (x, y) in tail_x.iter().zip(tail_y) {
        out.push(Point2d::new(*x, *y));
    }

    // March along the spline so that consecutive samples are one time step
    // apart at the current reference speed. The chord to the lookahead
    // point relates distance along the curve to distance along x.
    let target_x = config.lookahead;
    let target_dist = target_x.hypot(spline.y(target_x));
    let mut x = 0.0;

    for _ in tail_len..config.horizon {
        *ref_vel = speed.apply(*ref_vel, config);

        // A trajectory cannot advance at zero speed; stop emitting rather
        // than stacking coincident points
        if *ref_vel <= 0.0 {
            break;
        }

        let steps = target_dist / (config.time_step * *ref_vel);
        x += target_x / steps;
        out.push(frame.to_world(Point2d::new(x, spline.y(x))));
    }

    out
}
