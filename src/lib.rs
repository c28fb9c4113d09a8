//! A reactive trajectory planner for a fixed three-lane highway.
//!
//! Once per telemetry update the planner assesses nearby traffic in
//! road-relative (Frenet) coordinates, makes a greedy lane and speed
//! decision, and extends the previously emitted path with spline-smoothed,
//! acceleration-bounded samples.

pub use behavior::{decide, Decision, SpeedChange};
pub use cgmath;
pub use map::{Frenet, MapError, Waypoint, WaypointMap, HIGHWAY_TRACK_LENGTH};
pub use perception::{assess, lane_for_offset, Observation, TrafficAssessment};
pub use planner::{Planner, PlannerConfig, MPH_TO_MPS};
pub use telemetry::{SensorReading, Telemetry};
pub use trajectory::Trajectory;

mod behavior;
mod map;
pub mod math;
mod perception;
mod planner;
mod telemetry;
mod trajectory;
