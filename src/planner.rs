//! The per-cycle planning driver and its persistent state.

use crate::map::WaypointMap;
use crate::telemetry::Telemetry;
use crate::trajectory::Trajectory;
use crate::{behavior, perception, trajectory};
use log::{debug, trace};

/// Conversion factor from miles per hour to metres per second.
///
/// The planner is SI end-to-end; the legacy mph tunables cross over here,
/// in [PlannerConfig::default], and nowhere else.
pub const MPH_TO_MPS: f64 = 0.44704;

/// The fixed tunables of the planner.
#[derive(Clone, Copy, Debug)]
pub struct PlannerConfig {
    /// The ceiling for the reference speed, in m/s.
    pub max_speed: f64,
    /// The change in reference speed per generated sample, in m/s.
    pub accel: f64,
    /// The time between consecutive trajectory points, in s.
    pub time_step: f64,
    /// The number of lanes on this side of the road.
    pub lane_count: usize,
    /// The width of each lane, in m.
    pub lane_width: f64,
    /// The minimum longitudinal separation judged safe, in m.
    pub safety_gap: f64,
    /// The x-distance of the chord used to pace samples along the spline, in m.
    pub lookahead: f64,
    /// The spacing between consecutive lane-centre anchors, in m.
    pub anchor_spacing: f64,
    /// The maximum number of points in an emitted trajectory.
    pub horizon: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_speed: 49.5 * MPH_TO_MPS,
            accel: 0.224 * MPH_TO_MPS,
            time_step: 0.02,
            lane_count: 3,
            lane_width: 4.0,
            safety_gap: 30.0,
            lookahead: 30.0,
            anchor_spacing: 30.0,
            horizon: 50,
        }
    }
}

/// The trajectory planner.
///
/// Owns the map and the only state carried between cycles: the target lane
/// and the reference speed. One [plan](Self::plan) call is one complete
/// perception, decision and generation pass; taking `&mut self` keeps
/// cycles strictly serial.
pub struct Planner {
    map: WaypointMap,
    config: PlannerConfig,
    /// The lane currently driven towards, in `[0, lane_count)`.
    lane: usize,
    /// The commanded speed, ramped towards `config.max_speed`, in m/s.
    ref_vel: f64,
}

impl Planner {
    /// Creates a planner starting in the middle lane, at rest.
    pub fn new(map: WaypointMap, config: PlannerConfig) -> Self {
        Self {
            map,
            lane: config.lane_count / 2,
            ref_vel: 0.0,
            config,
        }
    }

    /// The lane currently targeted.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// The current reference speed, in m/s.
    pub fn ref_vel(&self) -> f64 {
        self.ref_vel
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn map(&self) -> &WaypointMap {
        &self.map
    }

    /// Runs one planning cycle over a telemetry update.
    pub fn plan(&mut self, telemetry: &Telemetry) -> Trajectory {
        let tail_len = telemetry.previous_path_x.len();

        // Plan from where the previous trajectory ends, not from where the
        // vehicle is right now
        let ego_s = if tail_len > 0 {
            telemetry.end_path_s
        } else {
            telemetry.s
        };

        let traffic = perception::assess(
            &telemetry.sensor_fusion,
            ego_s,
            tail_len,
            self.lane,
            &self.config,
        );
        let decision = behavior::decide(&traffic, self.lane, self.ref_vel, &self.config);

        if decision.lane != self.lane {
            debug!("lane change {} -> {}: {:?}", self.lane, decision.lane, traffic);
        }
        self.lane = decision.lane;

        let out = trajectory::generate(
            &self.map,
            telemetry,
            ego_s,
            self.lane,
            &mut self.ref_vel,
            decision.speed,
            &self.config,
        );
        trace!(
            "cycle done: lane={} ref_vel={:.2} m/s, {} points",
            self.lane,
            self.ref_vel,
            out.len()
        );
        out
    }
}
