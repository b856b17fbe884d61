use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    export::{self, ExportError},
    geo::{self, CoordinateError, GeoPoint},
    projection::{self, CanvasSize, PixelPoint},
};

/// No sample for this long raises an inactivity alert.
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(60);
/// How often the inactivity check runs.
pub const INACTIVITY_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// A validated position sample from a location source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub point: GeoPoint,
    /// Instantaneous speed in m/s, when the source reports one.
    pub speed_mps: Option<f64>,
}

impl Sample {
    /// Validate a raw device reading. A negative or non-finite speed is
    /// treated as unknown rather than rejecting the whole sample.
    pub fn from_raw(lat: f64, lng: f64, speed_mps: Option<f64>) -> Result<Self, CoordinateError> {
        let point = GeoPoint::new(lat, lng)?;
        let speed_mps = speed_mps.filter(|s| s.is_finite() && *s >= 0.0);
        Ok(Self { point, speed_mps })
    }
}

/// What a location source pushes to its handler.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Sample(Sample),
    /// Delivery failed; reported to the user, the session keeps going.
    Error(String),
    /// The source has nothing more to deliver.
    Ended,
}

/// State of one tracking session.
///
/// Timestamps are milliseconds on whatever clock the caller uses
/// (`Date.now()` in the browser, elapsed run time natively).
#[derive(Debug, Clone, Default)]
pub struct Session {
    points: Vec<GeoPoint>,
    total_distance_m: f64,
    last_speed_mps: Option<f64>,
    last_update_ms: u64,
}

impl Session {
    pub fn start(now_ms: u64) -> Self {
        Self {
            last_update_ms: now_ms,
            ..Default::default()
        }
    }

    /// Append a sample and return the distance it added.
    pub fn record(&mut self, sample: Sample, now_ms: u64) -> f64 {
        let increment = self
            .points
            .last()
            .map(|prev| geo::distance(*prev, sample.point))
            .unwrap_or(0.0);
        self.total_distance_m += increment;
        self.last_speed_mps = sample.speed_mps;
        self.last_update_ms = now_ms;
        self.points.push(sample.point);
        increment
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_distance_m
    }

    pub fn last_speed_mps(&self) -> Option<f64> {
        self.last_speed_mps
    }

    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    pub fn is_inactive(&self, now_ms: u64, timeout: Duration) -> bool {
        now_ms.saturating_sub(self.last_update_ms) > timeout.as_millis() as u64
    }

    /// Project the whole path onto `canvas`.
    pub fn project(&self, canvas: CanvasSize) -> Vec<PixelPoint> {
        projection::project_onto(&self.points, canvas)
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        export::route_to_json(&self.points)
    }
}
