//! Converts raw sensor readings into a lane-relative traffic assessment.

use crate::planner::PlannerConfig;
use crate::telemetry::SensorReading;
use log::debug;
use smallvec::SmallVec;

/// A single observed vehicle, derived from a raw reading.
/// Lives for one planning cycle only.
#[derive(Clone, Copy, Debug)]
pub struct Observation {
    pub id: u64,
    /// Speed magnitude, in m/s.
    pub speed: f64,
    /// The lane the vehicle occupies, or `None` if it is off the roadway.
    pub lane: Option<usize>,
    /// Longitudinal position extrapolated to the planning horizon, in m.
    pub s: f64,
}

impl Observation {
    /// Derives an observation from a raw reading.
    ///
    /// The vehicle is extrapolated at constant velocity by `horizon_steps`
    /// time steps, the span of the previously planned trajectory, so that
    /// all separations are measured at the same future instant.
    pub fn new(reading: &SensorReading, horizon_steps: usize, config: &PlannerConfig) -> Self {
        let speed = reading.vx.hypot(reading.vy);
        Self {
            id: reading.id,
            speed,
            lane: lane_for_offset(reading.d, config),
            s: reading.s + horizon_steps as f64 * config.time_step * speed,
        }
    }
}

/// Classifies a lateral offset into a lane index, or `None` if the offset
/// falls outside the roadway.
pub fn lane_for_offset(d: f64, config: &PlannerConfig) -> Option<usize> {
    let lane = (d / config.lane_width).floor();
    if lane >= 0.0 && lane < config.lane_count as f64 {
        Some(lane as usize)
    } else {
        None
    }
}

/// The traffic situation around the ego vehicle, horizon-aligned to the
/// end of the previously planned trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrafficAssessment {
    /// A vehicle ahead in the ego lane is within the safety gap.
    pub too_close: bool,
    /// Every vehicle in the lane to the left keeps the safety gap.
    pub clear_left: bool,
    /// Every vehicle in the lane to the right keeps the safety gap.
    pub clear_right: bool,
}

/// Assesses the traffic around the ego vehicle.
///
/// `ego_s` must already be horizon-aligned (the end of the previous
/// trajectory) and `horizon_steps` the number of time steps it spans.
pub fn assess(
    readings: &[SensorReading],
    ego_s: f64,
    horizon_steps: usize,
    lane: usize,
    config: &PlannerConfig,
) -> TrafficAssessment {
    let mut too_close = false;
    let mut left: SmallVec<[bool; 8]> = SmallVec::new();
    let mut right: SmallVec<[bool; 8]> = SmallVec::new();

    for reading in readings {
        let obs = Observation::new(reading, horizon_steps, config);
        let obs_lane = match obs.lane {
            Some(lane) => lane,
            None => continue,
        };

        let gap = obs.s - ego_s;
        let keeps_gap = gap.abs() > config.safety_gap;

        if obs_lane == lane {
            // Only a vehicle ahead of us forces a reaction
            if gap > 0.0 && gap < config.safety_gap {
                debug!("vehicle {} ahead at {:.1} m", obs.id, gap);
                too_close = true;
            }
        } else if obs_lane + 1 == lane {
            left.push(keeps_gap);
        } else if obs_lane == lane + 1 {
            right.push(keeps_gap);
        }
    }

    // A lane change needs agreement from every vehicle in that lane,
    // however far behind it is; an empty lane trivially agrees.
    TrafficAssessment {
        too_close,
        clear_left: left.iter().all(|clear| *clear),
        clear_right: right.iter().all(|clear| *clear),
    }
}
