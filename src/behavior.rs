//! The reactive lane and speed decision policy.

use crate::perception::TrafficAssessment;
use crate::planner::PlannerConfig;

/// The per-sample speed adjustment decided for a planning cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedChange {
    Accelerate,
    Decelerate,
    Hold,
}

impl SpeedChange {
    /// Applies one increment of this adjustment to a reference speed,
    /// keeping it within `[0, max_speed]`.
    pub fn apply(self, vel: f64, config: &PlannerConfig) -> f64 {
        match self {
            SpeedChange::Accelerate => f64::min(vel + config.accel, config.max_speed),
            SpeedChange::Decelerate => f64::max(vel - config.accel, 0.0),
            SpeedChange::Hold => vel,
        }
    }
}

/// The outcome of one evaluation of the behaviour policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// The lane to drive towards from this cycle on.
    pub lane: usize,
    /// The speed adjustment to apply once per newly generated sample.
    pub speed: SpeedChange,
}

/// Decides the lane and speed adjustment for one planning cycle.
///
/// A greedy single-step policy: prefer a left lane change over a right one,
/// and either over slowing down behind the blocking vehicle. The lane shift
/// takes effect once per cycle; the speed adjustment once per sample.
pub fn decide(
    traffic: &TrafficAssessment,
    lane: usize,
    ref_vel: f64,
    config: &PlannerConfig,
) -> Decision {
    if traffic.too_close && traffic.clear_left && lane > 0 {
        Decision {
            lane: lane - 1,
            speed: SpeedChange::Hold,
        }
    } else if traffic.too_close && traffic.clear_right && lane + 1 < config.lane_count {
        Decision {
            lane: lane + 1,
            speed: SpeedChange::Hold,
        }
    } else if traffic.too_close {
        Decision {
            lane,
            speed: SpeedChange::Decelerate,
        }
    } else if ref_vel < config.max_speed {
        Decision {
            lane,
            speed: SpeedChange::Accelerate,
        }
    } else {
        Decision {
            lane,
            speed: SpeedChange::Hold,
        }
    }
}
