use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use shared::{distance, route_from_json, GeoPoint, Sample, SourceEvent};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    error::SourceError,
    source::{spawn_feed, LocationSource},
};

/// Plays back a recorded route at a fixed cadence.
///
/// Speed is derived from the leg length and the cadence, so a replay reports
/// what a runner covering that route at that pace would.
pub struct ReplaySource {
    origin: PathBuf,
    samples: Vec<Sample>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl ReplaySource {
    /// Load a route exported by the tracker (`.json`) or any GPX track (`.gpx`).
    pub fn from_path(path: impl AsRef<Path>, interval: Duration) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let points = match extension.as_deref() {
            Some("json") => route_from_json(&fs::read_to_string(path)?)?,
            Some("gpx") => read_gpx_points(path)?,
            _ => return Err(SourceError::UnsupportedFormat(path.to_path_buf())),
        };
        if points.is_empty() {
            return Err(SourceError::EmptyReplay(path.to_path_buf()));
        }

        tracing::info!("loaded {} points from {:?}", points.len(), path);
        Ok(Self::from_points(path, points, interval))
    }

    pub fn from_points(
        origin: impl Into<PathBuf>,
        points: Vec<GeoPoint>,
        interval: Duration,
    ) -> Self {
        Self {
            origin: origin.into(),
            samples: samples_with_speed(&points, interval),
            interval,
            task: None,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl LocationSource for ReplaySource {
    fn start(&mut self, events: mpsc::Sender<SourceEvent>) -> Result<(), SourceError> {
        self.stop();
        tracing::info!(
            "replaying {} points from {:?}, one every {:?}",
            self.samples.len(),
            self.origin,
            self.interval
        );
        self.task = Some(spawn_feed(self.samples.clone(), self.interval, events)?);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn samples_with_speed(points: &[GeoPoint], interval: Duration) -> Vec<Sample> {
    let secs = interval.as_secs_f64();
    let mut previous: Option<GeoPoint> = None;

    points
        .iter()
        .map(|&point| {
            let speed_mps = previous
                .filter(|_| secs > 0.0)
                .map(|prev| distance(prev, point) / secs);
            previous = Some(point);
            Sample { point, speed_mps }
        })
        .collect()
}

/// Every track point of every segment, in file order. Points outside the
/// valid coordinate range are skipped.
fn read_gpx_points(path: &Path) -> Result<Vec<GeoPoint>, SourceError> {
    let gpx = gpx::read(BufReader::new(File::open(path)?))?;
    let mut skipped = 0usize;

    let points: Vec<GeoPoint> = gpx
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .filter_map(|waypoint| {
            let p = waypoint.point();
            match GeoPoint::new(p.y(), p.x()) {
                Ok(point) => Some(point),
                Err(err) => {
                    skipped += 1;
                    tracing::warn!("skipping GPX point: {err}");
                    None
                }
            }
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("read_gpx_points: skipped {skipped} invalid points in {:?}", path);
    }
    Ok(points)
}
