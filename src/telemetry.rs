//! Wire types exchanged with the driving simulator.
//!
//! The planner consumes one [Telemetry] update per cycle and emits one
//! [Trajectory](crate::Trajectory) in response; the transport carrying the
//! messages lives outside this crate.

use serde::Deserialize;

/// One telemetry update: the ego pose, the unconsumed tail of the
/// previously emitted trajectory, and all tracked vehicles.
#[derive(Clone, Debug, Deserialize)]
pub struct Telemetry {
    /// Ego x position in map coordinates, in m.
    pub x: f64,
    /// Ego y position in map coordinates, in m.
    pub y: f64,
    /// Ego longitudinal Frenet coordinate, in m.
    pub s: f64,
    /// Ego lateral Frenet coordinate, in m.
    pub d: f64,
    /// Ego heading, in degrees.
    pub yaw: f64,
    /// Ego speed, in mph. Carried on the wire but unused by the planner,
    /// which ramps its own reference speed instead.
    pub speed: f64,
    /// The x coordinates of the previous trajectory's unconsumed tail.
    pub previous_path_x: Vec<f64>,
    /// The y coordinates of the previous trajectory's unconsumed tail.
    pub previous_path_y: Vec<f64>,
    /// The Frenet s of the previous trajectory's final point.
    pub end_path_s: f64,
    /// The Frenet d of the previous trajectory's final point.
    pub end_path_d: f64,
    /// All other vehicles tracked on this side of the road.
    pub sensor_fusion: Vec<SensorReading>,
}

/// A raw per-vehicle observation, received on the wire as the array
/// `[id, x, y, vx, vy, s, d]`.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(from = "(u64, f64, f64, f64, f64, f64, f64)")]
pub struct SensorReading {
    pub id: u64,
    /// Position in map coordinates, in m.
    pub x: f64,
    pub y: f64,
    /// Velocity components in m/s.
    pub vx: f64,
    pub vy: f64,
    /// Frenet coordinates, in m.
    pub s: f64,
    pub d: f64,
}

impl From<(u64, f64, f64, f64, f64, f64, f64)> for SensorReading {
    fn from((id, x, y, vx, vy, s, d): (u64, f64, f64, f64, f64, f64, f64)) -> Self {
        Self {
            id,
            x,
            y,
            vx,
            vy,
            s,
            d,
        }
    }
}
