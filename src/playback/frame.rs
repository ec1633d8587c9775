use serde::Serialize;
use std::fmt;
use crate::core::Coordinate;
use crate::playback::{PlaybackStatus, SpeedMultiplier};

/// Status readout values, already rounded for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    pub elapsed: String,
    pub battery_percent: u32,
    pub progress_percent: u32,
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4}, {:.4} | {:.1} km/h | {} | battery {}% | progress {}%",
            self.latitude,
            self.longitude,
            self.speed_kmh,
            self.elapsed,
            self.battery_percent,
            self.progress_percent
        )
    }
}

/// Snapshot of engine output for a renderer
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub status: PlaybackStatus,
    pub is_playing: bool,
    pub speed_multiplier: SpeedMultiplier,
    pub current_index: usize,
    pub segment_progress: f64,
    pub position: Coordinate,
    pub traveled_path: Vec<Coordinate>,
    pub readout: Readout,
}

/// Percentage of waypoints reached; 0 for a route with a single waypoint
pub fn progress_percent(current_index: usize, len: usize) -> f64 {
    if len < 2 {
        return 0.0;
    }
    current_index as f64 / (len - 1) as f64 * 100.0
}
