use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How the elapsed-time reference behaves across pauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElapsedMode {
    /// Reference is taken on the first play and kept across pauses.
    /// Time spent paused is included once playback resumes.
    #[default]
    Session,
    /// Reference is re-taken on every resume, so the readout restarts
    /// from zero after each pause.
    Resume,
}

/// Wall-clock timer shown in the status readout
///
/// The displayed value only changes on `refresh`, which the host calls
/// once per second while playing.
#[derive(Debug, Clone)]
pub struct ElapsedTracker {
    mode: ElapsedMode,
    reference: Option<Instant>,
    displayed: Duration,
}

impl ElapsedTracker {
    pub fn new(mode: ElapsedMode) -> Self {
        Self {
            mode,
            reference: None,
            displayed: Duration::ZERO,
        }
    }

    /// Playback entered `Playing` at `now`
    pub fn start(&mut self, now: Instant) {
        match self.mode {
            ElapsedMode::Session => {
                self.reference.get_or_insert(now);
            }
            ElapsedMode::Resume => self.reference = Some(now),
        }
    }

    /// Update the displayed value from the reference
    pub fn refresh(&mut self, now: Instant) {
        if let Some(reference) = self.reference {
            self.displayed = now.saturating_duration_since(reference);
        }
    }

    pub fn reset(&mut self) {
        self.reference = None;
        self.displayed = Duration::ZERO;
    }

    pub fn is_tracking(&self) -> bool {
        self.reference.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.displayed
    }

    pub fn formatted(&self) -> String {
        format_hms(self.elapsed())
    }
}

/// Format a duration as `HH:MM:SS`, truncating sub-second parts
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
