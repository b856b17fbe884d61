use std::time::Duration;

use shared::{Sample, SimulatedWalk, SourceEvent};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant},
};

use crate::error::SourceError;

/// Something that can be started and stopped and pushes location events while running.
///
/// Real and synthetic feeds implement the same trait so the run loop never
/// needs to know which one it drives.
pub trait LocationSource: Send {
    /// Begin delivering events. Fails only when the source cannot run at all.
    fn start(&mut self, events: mpsc::Sender<SourceEvent>) -> Result<(), SourceError>;

    /// Stop delivering. Calling it on a stopped source is a no-op.
    fn stop(&mut self);
}

/// Emits `samples` one per `interval`, the first one an interval after start,
/// then reports [`SourceEvent::Ended`] if the sequence runs out.
pub(crate) fn spawn_feed<I>(
    samples: I,
    interval: Duration,
    events: mpsc::Sender<SourceEvent>,
) -> Result<JoinHandle<()>, SourceError>
where
    I: IntoIterator<Item = Sample> + Send + 'static,
    I::IntoIter: Send,
{
    if interval.is_zero() {
        return Err(SourceError::ZeroInterval);
    }
    Ok(tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        for sample in samples {
            ticker.tick().await;
            if events.send(SourceEvent::Sample(sample)).await.is_err() {
                return;
            }
        }
        let _ = events.send(SourceEvent::Ended).await;
    }))
}

/// Synthetic walk for trying the tracker without a GPS fix.
pub struct SimulatedSource {
    walk: SimulatedWalk,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl SimulatedSource {
    pub fn new(walk: SimulatedWalk, interval: Duration) -> Self {
        Self {
            walk,
            interval,
            task: None,
        }
    }
}

impl LocationSource for SimulatedSource {
    fn start(&mut self, events: mpsc::Sender<SourceEvent>) -> Result<(), SourceError> {
        self.stop();
        tracing::info!("starting simulated walk, one sample every {:?}", self.interval);
        self.task = Some(spawn_feed(self.walk.clone(), self.interval, events)?);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_source_delivers_on_interval() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut source = SimulatedSource::new(SimulatedWalk::default(), Duration::from_secs(2));
        let started = Instant::now();
        source.start(tx).unwrap();

        for expected in [2, 4, 6] {
            let event = rx.recv().await.expect("event");
            assert!(matches!(event, SourceEvent::Sample(_)));
            assert_eq!(started.elapsed().as_secs(), expected);
        }

        source.stop();
        assert!(rx.recv().await.is_none(), "channel closes once the feed is aborted");
    }

    #[tokio::test(start_paused = true)]
    async fn finite_feed_reports_end() {
        let (tx, mut rx) = mpsc::channel(8);
        let samples: Vec<Sample> = SimulatedWalk::default().take(2).collect();
        spawn_feed(samples, Duration::from_millis(500), tx).unwrap();

        assert!(matches!(rx.recv().await, Some(SourceEvent::Sample(_))));
        assert!(matches!(rx.recv().await, Some(SourceEvent::Sample(_))));
        assert_eq!(rx.recv().await, Some(SourceEvent::Ended));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_rejected() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut source = SimulatedSource::new(SimulatedWalk::default(), Duration::ZERO);

        assert!(matches!(source.start(tx), Err(SourceError::ZeroInterval)));
        assert!(rx.recv().await.is_none());
    }
}
