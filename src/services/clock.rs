use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// The instant timeline views are computed against.
///
/// Cloned handles share one value. It only moves when a [`Ticker`] (or a
/// test) advances it, so every view computed between two ticks agrees on `now`.
#[derive(Clone)]
pub struct Clock {
    current: Arc<watch::Sender<DateTime<Utc>>>,
}

impl Clock {
    pub fn fixed(now: DateTime<Utc>) -> Self {
        let (tx, _rx) = watch::channel(now);
        Self {
            current: Arc::new(tx),
        }
    }

    pub fn starting_now() -> Self {
        Self::fixed(Utc::now())
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.current.borrow()
    }

    pub fn advance_to(&self, instant: DateTime<Utc>) {
        self.current.send_replace(instant);
    }
}

pub struct Ticker;

impl Ticker {
    /// Advances `clock` to wall-clock time every `period` until the returned
    /// handle is cancelled or dropped.
    pub fn spawn(clock: Clock, period: Duration) -> TickerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now = Utc::now();
                        clock.advance_to(now);
                        tracing::debug!("Timeline clock advanced to {}", now);
                    }
                    _ = &mut stop_rx => {
                        tracing::debug!("Timeline ticker stopped");
                        break;
                    }
                }
            }
        });

        TickerHandle {
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

pub struct TickerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stops the ticker and waits for its task to exit.
    pub async fn cancel(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!("Timeline ticker exited abnormally: {}", err);
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
