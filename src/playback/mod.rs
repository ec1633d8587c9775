pub mod battery;
pub mod elapsed;
pub mod engine;
pub mod frame;

pub use battery::BatterySimulator;
pub use elapsed::{ElapsedMode, ElapsedTracker};
pub use engine::{reduce, PlaybackEngine};
pub use frame::{Frame, Readout};

use crate::core::{Coordinate, Route};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Not playing; the vehicle may be anywhere along the route
    Stopped,
    /// Tick loop active
    Playing,
    /// Vehicle reached the last waypoint
    Finished,
}

/// Playback rate factor. Only 1x, 2x and 4x exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SpeedMultiplier {
    #[default]
    X1,
    X2,
    X4,
}

impl SpeedMultiplier {
    pub fn factor(self) -> f64 {
        match self {
            SpeedMultiplier::X1 => 1.0,
            SpeedMultiplier::X2 => 2.0,
            SpeedMultiplier::X4 => 4.0,
        }
    }
}

impl TryFrom<u32> for SpeedMultiplier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SpeedMultiplier::X1),
            2 => Ok(SpeedMultiplier::X2),
            4 => Ok(SpeedMultiplier::X4),
            other => Err(format!("Unsupported speed multiplier: {}", other)),
        }
    }
}

impl From<SpeedMultiplier> for u32 {
    fn from(m: SpeedMultiplier) -> Self {
        match m {
            SpeedMultiplier::X1 => 1,
            SpeedMultiplier::X2 => 2,
            SpeedMultiplier::X4 => 4,
        }
    }
}

impl FromStr for SpeedMultiplier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches(['x', 'X', '×']);
        let value = digits
            .parse::<u32>()
            .map_err(|_| format!("Unsupported speed multiplier: {}", s.trim()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", u32::from(*self))
    }
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Wall-clock interval between playback ticks, independent of speed
    pub tick_interval: Duration,
    /// Time to cross one segment at 1x
    pub segment_duration: Duration,
    /// Interval between elapsed-time refreshes
    pub clock_interval: Duration,
    /// Ceiling for the derived speed, absorbs noisy timestamps
    pub max_speed_kmh: f64,
    /// Battery percentage drained per waypoint transition
    pub battery_step: f64,
    pub elapsed_mode: ElapsedMode,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            segment_duration: Duration::from_millis(2000),
            clock_interval: Duration::from_millis(1000),
            max_speed_kmh: 120.0,
            battery_step: 0.3,
            elapsed_mode: ElapsedMode::default(),
        }
    }
}

impl PlaybackConfig {
    /// Segment progress gained per tick at the given multiplier
    pub fn progress_increment(&self, multiplier: SpeedMultiplier) -> f64 {
        let step = self.segment_duration.as_secs_f64() / multiplier.factor();
        if step <= 0.0 {
            return 1.0;
        }
        self.tick_interval.as_secs_f64() / step
    }
}

/// Inputs to the playback state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    Restart,
    SetSpeed(SpeedMultiplier),
    /// Fixed-interval playback tick
    Tick,
    /// Elapsed-time refresh
    ClockTick,
}

/// Mutable playback state, owned by the engine
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub current_index: usize,
    /// Fraction of the current segment covered, in [0, 1)
    pub segment_progress: f64,
    pub status: PlaybackStatus,
    pub speed_multiplier: SpeedMultiplier,
    pub traveled_path: Vec<Coordinate>,
    pub current_position: Coordinate,
    pub current_speed_kmh: f64,
    pub battery: BatterySimulator,
    pub elapsed: ElapsedTracker,
}

impl PlaybackState {
    /// State at the first waypoint, ready to play
    pub fn initial(route: &Route, config: &PlaybackConfig, speed_multiplier: SpeedMultiplier) -> Self {
        let start = route.first().coordinate();
        Self {
            current_index: 0,
            segment_progress: 0.0,
            status: PlaybackStatus::Stopped,
            speed_multiplier,
            traveled_path: vec![start],
            current_position: start,
            current_speed_kmh: 0.0,
            battery: BatterySimulator::new(config.battery_step),
            elapsed: ElapsedTracker::new(config.elapsed_mode),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}
