//! Periodic tick source.
//!
//! A tokio task samples the wall clock at a fixed cadence and sends each
//! instant down a bounded channel. Consumers pull with [`Ticker::next`] and
//! feed the instants to controllers. Cancellation is immediate: once
//! [`Ticker::cancel`] returns, `next` never yields again, including instants
//! already sitting in the channel.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default cadence; fine enough for a seconds display.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

const CHANNEL_CAPACITY: usize = 16;

pub struct Ticker {
    rx: mpsc::Receiver<DateTime<Local>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a ticker on the current tokio runtime. The first instant is
    /// delivered immediately.
    pub fn schedule(interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut cadence = tokio::time::interval(interval);
            cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = cadence.tick() => {
                        if tx.send(Local::now()).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("ticker stopped");
        });
        Self {
            rx,
            cancel,
            task,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Next instant, or `None` once cancelled.
    pub async fn next(&mut self) -> Option<DateTime<Local>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            instant = self.rx.recv() => instant,
        }
    }

    /// Stop the cadence and discard anything queued.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }

    /// A handle that cancels this ticker from elsewhere (e.g. a signal task).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}
