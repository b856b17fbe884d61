use std::future::{pending, Future};

use serde::Serialize;
use shared::{
    display::{format_distance, format_speed},
    PixelPoint, Session, SourceEvent,
};
use tokio::{
    sync::mpsc,
    time::{self, Instant, MissedTickBehavior},
};

use crate::{
    config::TrackerConfig,
    error::TrackerError,
    export::{write_exports, ExportPaths},
    source::LocationSource,
    store::FileStore,
};

const EVENT_BUFFER: usize = 64;

/// Outcome of one tracking session.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub points: usize,
    pub total_distance_m: f64,
    pub inactivity_alerts: u32,
    pub delivery_errors: u32,
    pub exports: ExportPaths,
}

/// Drive `source` until it ends, `stop` resolves or `config.max_duration` elapses,
/// then persist the route to `store` and write the export files.
///
/// Every event is handled to completion before the next is read, so points are
/// appended in delivery order and every redraw sees the newest point.
pub async fn run_session<S, F>(
    config: &TrackerConfig,
    source: &mut S,
    store: &FileStore,
    stop: F,
) -> Result<RunSummary, TrackerError>
where
    S: LocationSource + ?Sized,
    F: Future<Output = ()>,
{
    if config.inactivity_poll.is_zero() {
        return Err(TrackerError::ZeroPollInterval);
    }

    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    source.start(tx)?;

    let clock = Instant::now();
    let elapsed_ms = || clock.elapsed().as_millis() as u64;
    let mut session = Session::start(0);
    let mut frame: Vec<PixelPoint> = Vec::new();
    let mut inactivity_alerts = 0u32;
    let mut delivery_errors = 0u32;

    let mut monitor = time::interval_at(clock + config.inactivity_poll, config.inactivity_poll);
    monitor.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let max_duration = config.max_duration;
    let deadline = async move {
        match max_duration {
            Some(limit) => time::sleep(limit).await,
            None => pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    tokio::pin!(stop);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(SourceEvent::Sample(sample)) => {
                    let added = session.record(sample, elapsed_ms());
                    frame = session.project(config.canvas);
                    tracing::info!(
                        "location update {:.6},{:.6}: distance {} m, speed {} m/s",
                        sample.point.lat(),
                        sample.point.lng(),
                        format_distance(session.total_distance_m()),
                        format_speed(sample.speed_mps)
                    );
                    tracing::debug!("leg {:.2} m, redrew {} points", added, frame.len());
                }
                Some(SourceEvent::Error(message)) => {
                    delivery_errors += 1;
                    tracing::error!("location error: {message}");
                }
                Some(SourceEvent::Ended) | None => {
                    tracing::info!("location source finished");
                    break;
                }
            },
            _ = monitor.tick() => {
                if session.is_inactive(elapsed_ms(), config.inactivity_timeout) {
                    inactivity_alerts += 1;
                    tracing::warn!(
                        "no movement detected for over {}s, notify your emergency contact",
                        config.inactivity_timeout.as_secs()
                    );
                }
            }
            _ = &mut deadline => {
                tracing::info!("session time limit reached");
                break;
            }
            _ = &mut stop => {
                tracing::info!("stop requested");
                break;
            }
        }
    }

    source.stop();

    store.save_last_run(session.points())?;
    let exports = write_exports(
        &config.out_dir,
        session.points(),
        config.canvas,
        config.export_gpx,
    )?;

    tracing::info!(
        "session over: {} points, {} m, {} drawn",
        session.points().len(),
        format_distance(session.total_distance_m()),
        frame.len()
    );

    Ok(RunSummary {
        points: session.points().len(),
        total_distance_m: session.total_distance_m(),
        inactivity_alerts,
        delivery_errors,
        exports,
    })
}
