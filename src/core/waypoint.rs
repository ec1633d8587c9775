use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A single recorded GPS sample along the route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// Time the sample was recorded (ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Seconds elapsed from this sample to `next`
    pub fn seconds_until(&self, next: &Waypoint) -> f64 {
        (next.timestamp - self.timestamp).num_milliseconds() as f64 / 1000.0
    }
}
