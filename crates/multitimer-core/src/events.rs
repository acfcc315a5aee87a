use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerId, TimerPhase, TimerSnapshot};

/// Every state change in the system produces an Event.
/// Hosts render them; the CLI can print them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerCreated {
        id: TimerId,
        title: String,
        at: DateTime<Utc>,
    },
    TimerStarted {
        id: TimerId,
        target: DateTime<Utc>,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    },
    TimerResumed {
        id: TimerId,
        target: DateTime<Utc>,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        id: TimerId,
        remaining_ms: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    TimerTick {
        id: TimerId,
        remaining_ms: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        id: TimerId,
        title: String,
        dedupe_tag: String,
        at: DateTime<Utc>,
    },
    TimerReset {
        id: TimerId,
        from: TimerPhase,
        at: DateTime<Utc>,
    },
    TimerDeleted {
        id: TimerId,
        at: DateTime<Utc>,
    },
    /// Config written to the store. `can_start` is the re-evaluated start gate.
    ConfigEdited {
        id: TimerId,
        timing_changed: bool,
        phase: TimerPhase,
        can_start: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<String>,
        at: DateTime<Utc>,
    },
    TitleEditStarted {
        id: TimerId,
        draft: String,
        at: DateTime<Utc>,
    },
    TitleEditCommitted {
        id: TimerId,
        title: String,
        at: DateTime<Utc>,
    },
    TitleEditCancelled {
        id: TimerId,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        #[serde(flatten)]
        snapshot: TimerSnapshot,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn timer_id(&self) -> TimerId {
        match self {
            Event::TimerCreated { id, .. }
            | Event::TimerStarted { id, .. }
            | Event::TimerResumed { id, .. }
            | Event::TimerPaused { id, .. }
            | Event::TimerTick { id, .. }
            | Event::TimerCompleted { id, .. }
            | Event::TimerReset { id, .. }
            | Event::TimerDeleted { id, .. }
            | Event::ConfigEdited { id, .. }
            | Event::TitleEditStarted { id, .. }
            | Event::TitleEditCommitted { id, .. }
            | Event::TitleEditCancelled { id, .. } => *id,
            Event::StateSnapshot { snapshot, .. } => snapshot.id,
        }
    }
}
