use std::time::Duration;

use crate::session::Sample;

/// Connaught Place, New Delhi.
pub const SIMULATED_START: (f64, f64) = (28.6139, 77.2090);
pub const SIMULATED_STEP_DEG: f64 = 0.0001;
pub const SIMULATED_SPEED_MPS: f64 = 1.0;
pub const SIMULATED_INTERVAL: Duration = Duration::from_secs(2);

/// Synthetic walk heading north-east by a fixed step per sample.
///
/// Stops once the next step would leave the valid coordinate range.
#[derive(Debug, Clone)]
pub struct SimulatedWalk {
    lat: f64,
    lng: f64,
    step_deg: f64,
}

impl Default for SimulatedWalk {
    fn default() -> Self {
        Self::new(SIMULATED_START.0, SIMULATED_START.1, SIMULATED_STEP_DEG)
    }
}

impl SimulatedWalk {
    pub fn new(lat: f64, lng: f64, step_deg: f64) -> Self {
        Self { lat, lng, step_deg }
    }
}

impl Iterator for SimulatedWalk {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.lat += self.step_deg;
        self.lng += self.step_deg;
        Sample::from_raw(self.lat, self.lng, Some(SIMULATED_SPEED_MPS)).ok()
    }
}
