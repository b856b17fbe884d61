use std::{path::PathBuf, time::Duration};

use shared::{
    simulate::SIMULATED_INTERVAL, CanvasSize, INACTIVITY_POLL_INTERVAL, INACTIVITY_TIMEOUT,
};

pub const DATA_DIR_ENV: &str = "SAFE_RUNNER_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".safe-runner";

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Drawing area for the rendered route.
    pub canvas: CanvasSize,
    /// Delay between samples for simulated and replayed sources.
    pub sample_interval: Duration,
    /// Stop on our own after this long; `None` runs until Ctrl-C or the source ends.
    pub max_duration: Option<Duration>,
    pub inactivity_timeout: Duration,
    pub inactivity_poll: Duration,
    /// Where the route JSON, SVG and optional GPX are written.
    pub out_dir: PathBuf,
    /// Backing directory of the last-run store.
    pub data_dir: PathBuf,
    pub export_gpx: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            sample_interval: SIMULATED_INTERVAL,
            max_duration: None,
            inactivity_timeout: INACTIVITY_TIMEOUT,
            inactivity_poll: INACTIVITY_POLL_INTERVAL,
            out_dir: PathBuf::from("."),
            data_dir: default_data_dir(),
            export_gpx: false,
        }
    }
}

/// `SAFE_RUNNER_DATA_DIR` if set, `.safe-runner` otherwise.
pub fn default_data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}
