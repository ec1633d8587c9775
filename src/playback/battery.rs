use serde::Serialize;

pub const FULL_CHARGE: f64 = 100.0;

/// Simulated battery, drained once per waypoint transition
#[derive(Debug, Clone, Serialize)]
pub struct BatterySimulator {
    level: f64,
    step: f64,
}

impl BatterySimulator {
    pub fn new(step: f64) -> Self {
        Self {
            level: FULL_CHARGE,
            step: step.max(0.0),
        }
    }

    /// Current level in percent, within [0, 100]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Drain one step. Floored at 0 and kept to one decimal so repeated
    /// subtraction does not accumulate float error.
    pub fn drain(&mut self) -> f64 {
        let next = (self.level - self.step).max(0.0);
        self.level = (next * 10.0).round() / 10.0;
        self.level
    }

    pub fn reset(&mut self) {
        self.level = FULL_CHARGE;
    }
}
