//! A line-oriented harness around the planner: reads the waypoint table
//! once, then consumes one JSON telemetry object per stdin line and prints
//! one JSON trajectory per line.

use highway_planner::{Planner, PlannerConfig, Telemetry, WaypointMap, HIGHWAY_TRACK_LENGTH};
use std::io::BufRead;

fn main() {
    let map_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/highway_map.csv".into());
    let map = WaypointMap::from_file(&map_path, HIGHWAY_TRACK_LENGTH).unwrap();
    let mut planner = Planner::new(map, PlannerConfig::default());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let telemetry: Telemetry = serde_json::from_str(&line.unwrap()).unwrap();
        let trajectory = planner.plan(&telemetry);
        println!("{}", serde_json::to_string(&trajectory).unwrap());
    }
}
