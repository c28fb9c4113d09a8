//! End-to-end tests of the planning cycle on a synthetic straight highway.

use highway_planner::cgmath::prelude::*;
use highway_planner::math::{bearing, Point2d, Vector2d};
use highway_planner::{
    Planner, PlannerConfig, SensorReading, Telemetry, Trajectory, Waypoint, WaypointMap,
};

/// A straight track along the positive x-axis with `s` equal to `x`.
/// Lane centres sit at y = -2, -6 and -10 for lanes 0, 1 and 2.
fn straight_map(length: f64) -> WaypointMap {
    let spacing = 30.0;
    let count = (length / spacing) as usize + 1;
    let waypoints = (0..count)
        .map(|i| Waypoint {
            pos: Point2d::new(i as f64 * spacing, 0.0),
            s: i as f64 * spacing,
            normal: Vector2d::new(0.0, -1.0),
        })
        .collect();
    WaypointMap::from_waypoints(waypoints, length)
}

/// Ego at rest at the start of the track, centred in lane 1, no previous
/// trajectory and an empty road.
fn telemetry_at_rest() -> Telemetry {
    Telemetry {
        x: 0.0,
        y: -6.0,
        s: 0.0,
        d: 6.0,
        yaw: 0.0,
        speed: 0.0,
        previous_path_x: vec![],
        previous_path_y: vec![],
        end_path_s: 0.0,
        end_path_d: 0.0,
        sensor_fusion: vec![],
    }
}

/// Builds the next cycle's telemetry from the previous output, as the
/// executor would after consuming the first `consumed` points.
fn advance(planner: &Planner, out: &Trajectory, consumed: usize) -> Telemetry {
    let points: Vec<Point2d> = out.points().collect();
    let map = planner.map();

    let ego = points[consumed - 1];
    let ego_yaw = bearing(points[consumed - 2], ego);
    let ego_f = map.to_frenet(ego, ego_yaw);

    let last = points[points.len() - 1];
    let end_yaw = bearing(points[points.len() - 2], last);
    let end_f = map.to_frenet(last, end_yaw);

    Telemetry {
        x: ego.x,
        y: ego.y,
        s: ego_f.s,
        d: ego_f.d,
        yaw: ego_yaw.to_degrees(),
        speed: 0.0,
        previous_path_x: out.next_x[consumed..].to_vec(),
        previous_path_y: out.next_y[consumed..].to_vec(),
        end_path_s: end_f.s,
        end_path_d: end_f.d,
        sensor_fusion: vec![],
    }
}

#[test]
fn pulls_away_from_rest() {
    let mut planner = Planner::new(straight_map(600.0), PlannerConfig::default());
    let out = planner.plan(&telemetry_at_rest());

    assert_eq!(out.len(), 50);

    // Every point advances along the road
    for pair in out.next_x.windows(2) {
        assert!(pair[1] > pair[0]);
    }

    // One full horizon of unobstructed samples ramps the reference speed
    // by exactly one increment per sample
    let config = planner.config();
    assert!((planner.ref_vel() - 50.0 * config.accel).abs() < 1e-9);
}

#[test]
fn speed_ramp_clamps_at_max() {
    let config = PlannerConfig::default();
    let mut planner = Planner::new(straight_map(600.0), config);

    for _ in 0..10 {
        planner.plan(&telemetry_at_rest());
        assert!(planner.ref_vel() <= config.max_speed);
    }
    assert_eq!(planner.ref_vel(), config.max_speed);
}

#[test]
fn full_tail_is_returned_verbatim() {
    let mut planner = Planner::new(straight_map(600.0), PlannerConfig::default());
    let out = planner.plan(&telemetry_at_rest());
    let next = advance(&planner, &out, 3);

    let out2 = planner.plan(&next);
    assert_eq!(out2.len(), 50);
    assert_eq!(out2.next_x[..47], next.previous_path_x[..]);
    assert_eq!(out2.next_y[..47], next.previous_path_y[..]);
}

#[test]
fn stitch_has_no_kink() {
    let mut planner = Planner::new(straight_map(600.0), PlannerConfig::default());

    // A short tail angled slightly out of the lane centre
    let tail = [
        Point2d::new(10.0, -6.0),
        Point2d::new(10.5, -5.95),
    ];
    let tail_yaw = bearing(tail[0], tail[1]);
    let end_f = planner.map().to_frenet(tail[1], tail_yaw);
    let telemetry = Telemetry {
        x: 10.5,
        y: -5.95,
        s: end_f.s,
        d: end_f.d,
        yaw: tail_yaw.to_degrees(),
        speed: 0.0,
        previous_path_x: tail.iter().map(|p| p.x).collect(),
        previous_path_y: tail.iter().map(|p| p.y).collect(),
        end_path_s: end_f.s,
        end_path_d: end_f.d,
        sensor_fusion: vec![],
    };

    let out = planner.plan(&telemetry);
    let points: Vec<Point2d> = out.points().collect();

    // The tail is reused verbatim and the first generated point continues
    // along the tail's bearing
    assert_eq!(points[0], tail[0]);
    assert_eq!(points[1], tail[1]);
    let stitch_yaw = bearing(points[1], points[2]);
    assert!((stitch_yaw - tail_yaw).abs() < 0.05);
}

#[test]
fn settles_in_lane_centre_at_max_speed() {
    let config = PlannerConfig::default();
    let mut planner = Planner::new(straight_map(600.0), config);

    let mut telemetry = telemetry_at_rest();
    for _ in 0..200 {
        let out = planner.plan(&telemetry);
        telemetry = advance(&planner, &out, 3);
    }
    let out = planner.plan(&telemetry);
    let points: Vec<Point2d> = out.points().collect();

    assert_eq!(planner.lane(), 1);
    assert_eq!(planner.ref_vel(), config.max_speed);

    // The path has converged onto the centre of lane 1 and the spacing of
    // consecutive points implies one time step at max speed
    let last = points[points.len() - 1];
    let second_last = points[points.len() - 2];
    assert!((last.y + 6.0).abs() < 0.05, "off centre: {:?}", last);

    let spacing = (last - second_last).magnitude();
    assert!(
        (spacing - config.max_speed * config.time_step).abs() < 0.01,
        "spacing {} at max speed",
        spacing
    );
}

#[test]
fn changes_lane_left_when_blocked() {
    let config = PlannerConfig::default();
    let mut planner = Planner::new(straight_map(600.0), config);

    // Get up to speed on an empty road first
    for _ in 0..5 {
        planner.plan(&telemetry_at_rest());
    }
    assert_eq!(planner.lane(), 1);

    // A slow vehicle ahead in the ego lane, both adjacent lanes free
    let mut telemetry = telemetry_at_rest();
    telemetry.sensor_fusion = vec![SensorReading {
        id: 7,
        x: 20.0,
        y: -6.0,
        vx: 5.0,
        vy: 0.0,
        s: 20.0,
        d: 6.0,
    }];

    let out = planner.plan(&telemetry);
    assert_eq!(planner.lane(), 0);

    // The generated path bends out of lane 1 towards lane 0
    let last_y = *out.next_y.last().unwrap();
    assert!(last_y > -5.9, "still in lane 1: {}", last_y);
}

#[test]
fn stops_cleanly_when_boxed_in() {
    let config = PlannerConfig::default();
    let mut planner = Planner::new(straight_map(600.0), config);

    // Pick up some speed first
    planner.plan(&telemetry_at_rest());
    assert!(planner.ref_vel() > 0.0);

    let block = |s: f64, d: f64| SensorReading {
        id: 0,
        x: 0.0,
        y: 0.0,
        vx: 0.0,
        vy: 0.0,
        s,
        d,
    };
    let mut telemetry = telemetry_at_rest();
    telemetry.sensor_fusion = vec![block(20.0, 6.0), block(10.0, 2.0), block(10.0, 10.0)];

    // Decelerate through the zero-speed bound and stay stopped; every
    // cycle must keep the reference speed in bounds and every emitted
    // coordinate finite
    for _ in 0..5 {
        let out = planner.plan(&telemetry);
        assert!(out.len() <= 50);
        assert!(out.points().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert!(planner.ref_vel() >= 0.0);
    }
    assert_eq!(planner.ref_vel(), 0.0);
}

#[test]
fn recovers_from_a_stalled_tail() {
    // A stopped vehicle can hand back a tail that ends in coincident
    // points, which carries no heading; planning must stay finite and
    // pull away from the live pose again
    let mut planner = Planner::new(straight_map(600.0), PlannerConfig::default());
    let telemetry = Telemetry {
        x: 30.0,
        y: -6.0,
        s: 30.0,
        d: 6.0,
        yaw: 0.0,
        speed: 0.0,
        previous_path_x: vec![30.0, 30.0],
        previous_path_y: vec![-6.0, -6.0],
        end_path_s: 30.0,
        end_path_d: 6.0,
        sensor_fusion: vec![],
    };

    let out = planner.plan(&telemetry);
    assert_eq!(out.len(), 50);
    assert!(out.points().all(|p| p.x.is_finite() && p.y.is_finite()));

    // The appended samples advance along the road again
    assert!(out.next_x[49] > out.next_x[2]);
}

#[test]
fn keeps_lane_and_decelerates_when_boxed_in() {
    let config = PlannerConfig::default();
    let mut planner = Planner::new(straight_map(600.0), config);

    for _ in 0..5 {
        planner.plan(&telemetry_at_rest());
    }
    let vel_before = planner.ref_vel();

    // Blocked ahead, and both adjacent lanes occupied alongside
    let block = |s: f64, d: f64| SensorReading {
        id: 0,
        x: 0.0,
        y: 0.0,
        vx: 0.0,
        vy: 0.0,
        s,
        d,
    };
    let mut telemetry = telemetry_at_rest();
    telemetry.sensor_fusion = vec![block(20.0, 6.0), block(10.0, 2.0), block(10.0, 10.0)];

    let out = planner.plan(&telemetry);
    assert_eq!(planner.lane(), 1);
    assert!(planner.ref_vel() < vel_before);
    assert_eq!(out.len(), 50);
}
