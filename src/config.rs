use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use crate::playback::{ElapsedMode, PlaybackConfig};

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Primary route file; the bundled route is used when it cannot be read
    pub route_path: PathBuf,
    pub tick_interval_ms: u64,
    pub segment_duration_ms: u64,
    pub clock_interval_ms: u64,
    pub max_speed_kmh: f64,
    pub battery_step: f64,
    pub elapsed_mode: ElapsedMode,
}

impl Default for Settings {
    fn default() -> Self {
        let playback = PlaybackConfig::default();
        Self {
            route_path: PathBuf::from("data/route.json"),
            tick_interval_ms: playback.tick_interval.as_millis() as u64,
            segment_duration_ms: playback.segment_duration.as_millis() as u64,
            clock_interval_ms: playback.clock_interval.as_millis() as u64,
            max_speed_kmh: playback.max_speed_kmh,
            battery_step: playback.battery_step,
            elapsed_mode: playback.elapsed_mode,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("route-replay").join("settings.json"))
    }

    /// Load settings from the user config directory, or defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`. A missing or malformed file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                debug!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().context("No config directory on this platform")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Engine configuration; zero intervals fall back to the defaults
    pub fn playback_config(&self) -> PlaybackConfig {
        let defaults = PlaybackConfig::default();
        let millis_or = |ms: u64, fallback: Duration| {
            if ms == 0 {
                fallback
            } else {
                Duration::from_millis(ms)
            }
        };

        PlaybackConfig {
            tick_interval: millis_or(self.tick_interval_ms, defaults.tick_interval),
            segment_duration: millis_or(self.segment_duration_ms, defaults.segment_duration),
            clock_interval: millis_or(self.clock_interval_ms, defaults.clock_interval),
            max_speed_kmh: self.max_speed_kmh.max(0.0),
            battery_step: self.battery_step.max(0.0),
            elapsed_mode: self.elapsed_mode,
        }
    }
}
