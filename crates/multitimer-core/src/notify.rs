//! Notification seam.
//!
//! The core raises one alert per completion and never deals with permission
//! prompts or delivery; hosts plug in whatever facility they have.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerId;

/// A one-shot completion alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    /// Unique per completion so alerts from different timers never replace
    /// each other.
    pub dedupe_tag: String,
}

impl Notification {
    pub fn for_completion(title: &str, id: TimerId, at: DateTime<Utc>) -> Self {
        Self {
            title: format!("{title} alert!"),
            dedupe_tag: format!("{title}-{}-{}", id.short(), at.timestamp_millis()),
        }
    }
}

/// Fire-and-forget notification facility.
pub trait Notifier: Send {
    fn notify(&self, title: &str, dedupe_tag: &str);
}

/// Writes alerts to the `tracing` log instead of the desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, dedupe_tag: &str) {
        tracing::info!(tag = dedupe_tag, "{title}");
    }
}

/// Keeps every alert in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, dedupe_tag: &str) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(Notification {
                title: title.to_string(),
                dedupe_tag: dedupe_tag.to_string(),
            });
        }
    }
}

impl<N: Notifier + Sync + ?Sized> Notifier for Arc<N> {
    fn notify(&self, title: &str, dedupe_tag: &str) {
        (**self).notify(title, dedupe_tag)
    }
}
