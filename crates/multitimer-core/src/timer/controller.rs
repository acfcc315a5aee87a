//! Timer controller: the per-timer phase machine.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!                    |
//!                    +--(engine completion)--> Completed --reset/edit--> Idle
//! ```
//!
//! The controller owns runtime state only. Configuration lives in the store
//! and is passed in by reference; every method takes `now` explicitly so the
//! caller's tick source decides the cadence.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::{TimerConfig, TimerId};
use super::countdown::{CountdownEngine, Observation, Signal};
use super::target::{compute_target, validate_target};
use crate::error::TimerError;
use crate::events::Event;
use crate::notify::{Notification, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Completed => "completed",
        };
        f.pad(s)
    }
}

/// Presentation projection of one timer at an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub id: TimerId,
    pub title: String,
    /// Configured target, e.g. `in 25m` or `at 08:00`.
    pub target_summary: String,
    pub phase: TimerPhase,
    pub remaining_ms: u64,
    pub progress_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<DateTime<Utc>>,
    pub can_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_draft: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerController {
    id: TimerId,
    phase: TimerPhase,
    engine: CountdownEngine,
    target: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    /// Uncommitted title edit.
    #[serde(default)]
    title_draft: Option<String>,
}

impl TimerController {
    pub fn new(id: TimerId) -> Self {
        Self {
            id,
            phase: TimerPhase::Idle,
            engine: CountdownEngine::new(),
            target: None,
            started_at: None,
            title_draft: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn title_draft(&self) -> Option<&str> {
        self.title_draft.as_deref()
    }

    /// Start-control gate, re-evaluated against the current config on demand.
    pub fn can_start<Tz: TimeZone>(&self, config: &TimerConfig, now: &DateTime<Tz>) -> bool {
        if self.title_draft.is_some() {
            return false;
        }
        match self.phase {
            TimerPhase::Idle => validate_target(config, now).is_ok(),
            TimerPhase::Paused => true,
            TimerPhase::Running | TimerPhase::Completed => false,
        }
    }

    /// Validation indicator for an idle timer whose target is not startable.
    pub fn validation_message<Tz: TimeZone>(
        &self,
        config: &TimerConfig,
        now: &DateTime<Tz>,
    ) -> Option<String> {
        if self.phase != TimerPhase::Idle {
            return None;
        }
        validate_target(config, now)
            .err()
            .map(|e| e.indicator().to_string())
    }

    pub fn snapshot<Tz: TimeZone>(&self, config: &TimerConfig, now: &DateTime<Tz>) -> TimerSnapshot {
        let now_utc = now.with_timezone(&Utc);
        let (remaining_ms, progress_pct) = match self.phase {
            TimerPhase::Running => self
                .engine
                .peek(now_utc)
                .map(|o| (o.remaining_ms, o.progress_pct))
                .unwrap_or((0, 0.0)),
            TimerPhase::Paused => self
                .engine
                .last_observation()
                .map(|o| (o.remaining_ms, o.progress_pct))
                .or_else(|| {
                    self.engine
                        .peek(self.started_at.unwrap_or(now_utc))
                        .map(|o| (o.remaining_ms, o.progress_pct))
                })
                .unwrap_or((0, 0.0)),
            TimerPhase::Completed => (0, 100.0),
            TimerPhase::Idle => {
                let preview = compute_target(config, now)
                    .map(|t| super::countdown::remaining_ms(t, now_utc))
                    .unwrap_or(0);
                (preview, 0.0)
            }
        };
        TimerSnapshot {
            id: self.id,
            title: config.title.clone(),
            target_summary: config.describe_target(),
            phase: self.phase,
            remaining_ms,
            progress_pct,
            target: self.target,
            can_start: self.can_start(config, now),
            validation: self.validation_message(config, now),
            title_draft: self.title_draft.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start from Idle (computing the target) or resume from Paused.
    ///
    /// Returns `Ok(None)` when already running. A rejected start leaves the
    /// controller untouched.
    pub fn start<Tz: TimeZone>(
        &mut self,
        config: &TimerConfig,
        now: &DateTime<Tz>,
    ) -> Result<Option<Event>, TimerError> {
        if self.title_draft.is_some() {
            return Err(TimerError::TitleEditInProgress(self.id));
        }
        let now_utc = now.with_timezone(&Utc);
        match self.phase {
            TimerPhase::Running => Ok(None),
            TimerPhase::Completed => Err(TimerError::InvalidTransition {
                phase: self.phase,
                action: "start",
            }),
            TimerPhase::Paused => {
                let (target, started_at) = self
                    .target
                    .zip(self.started_at)
                    .ok_or(TimerError::InvalidTransition {
                        phase: self.phase,
                        action: "resume",
                    })?;
                self.engine.start(target, started_at);
                self.phase = TimerPhase::Running;
                debug!(id = %self.id, %target, "timer resumed");
                Ok(Some(Event::TimerResumed {
                    id: self.id,
                    target,
                    remaining_ms: super::countdown::remaining_ms(target, now_utc),
                    at: now_utc,
                }))
            }
            TimerPhase::Idle => {
                let target = validate_target(config, now).inspect_err(|e| {
                    debug!(id = %self.id, "start rejected: {e}");
                })?;
                self.engine.start(target, now_utc);
                self.target = Some(target);
                self.started_at = Some(now_utc);
                self.phase = TimerPhase::Running;
                debug!(id = %self.id, %target, "timer started");
                Ok(Some(Event::TimerStarted {
                    id: self.id,
                    target,
                    started_at: now_utc,
                    duration_ms: super::countdown::remaining_ms(target, now_utc),
                }))
            }
        }
    }

    /// Pause a running timer.
    ///
    /// The clock is observed first: if the target has already been reached
    /// the result is the completion, not a pause.
    pub fn pause<Tz: TimeZone>(
        &mut self,
        config: &TimerConfig,
        now: &DateTime<Tz>,
        notifier: &dyn Notifier,
    ) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        match self.engine.observe(now.with_timezone(&Utc)) {
            Some(Signal::Completed(obs)) => Some(self.complete(config, obs, notifier)),
            Some(Signal::Tick(obs)) => {
                self.engine.pause();
                self.phase = TimerPhase::Paused;
                debug!(id = %self.id, remaining_ms = obs.remaining_ms, "timer paused");
                Some(Event::TimerPaused {
                    id: self.id,
                    remaining_ms: obs.remaining_ms,
                    progress_pct: obs.progress_pct,
                    at: obs.at,
                })
            }
            None => None,
        }
    }

    /// Deliver one instant from the tick source.
    pub fn tick<Tz: TimeZone>(
        &mut self,
        config: &TimerConfig,
        now: &DateTime<Tz>,
        notifier: &dyn Notifier,
    ) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        match self.engine.observe(now.with_timezone(&Utc))? {
            Signal::Tick(obs) => Some(Event::TimerTick {
                id: self.id,
                remaining_ms: obs.remaining_ms,
                progress_pct: obs.progress_pct,
                at: obs.at,
            }),
            Signal::Completed(obs) => Some(self.complete(config, obs, notifier)),
        }
    }

    /// Return to Idle from any phase, discarding target and draft.
    pub fn reset<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Option<Event> {
        let from = self.phase;
        if from == TimerPhase::Idle && self.target.is_none() {
            return None;
        }
        self.clear();
        debug!(id = %self.id, %from, "timer reset");
        Some(Event::TimerReset {
            id: self.id,
            from,
            at: now.with_timezone(&Utc),
        })
    }

    /// Reject config edits while the countdown runs.
    pub fn ensure_editable(&self) -> Result<(), TimerError> {
        if self.phase == TimerPhase::Running {
            return Err(TimerError::EditWhileRunning(self.id));
        }
        Ok(())
    }

    /// React to a committed config edit.
    ///
    /// A completed timer returns to Idle on any reconfiguration. A timing
    /// change discards the computed target, so a paused timer also returns
    /// to Idle. Title-only edits leave a paused timer paused.
    pub fn config_edited(&mut self, timing_changed: bool) {
        let reset = match self.phase {
            TimerPhase::Completed => true,
            TimerPhase::Paused | TimerPhase::Idle => timing_changed,
            TimerPhase::Running => false,
        };
        if reset {
            let draft = self.title_draft.take();
            self.clear();
            self.title_draft = draft;
        }
    }

    /// Stop ticking for good. Used when the timer is deleted.
    pub fn cancel(&mut self) {
        self.engine.stop();
        self.target = None;
        self.started_at = None;
    }

    // ── Title drafts ─────────────────────────────────────────────────

    pub fn begin_title_edit(&mut self, current: &str) -> Result<&str, TimerError> {
        self.ensure_editable()?;
        let draft = self.title_draft.get_or_insert_with(|| current.to_string());
        Ok(draft.as_str())
    }

    pub fn update_title_draft(&mut self, text: impl Into<String>) -> Result<(), TimerError> {
        let draft = self
            .title_draft
            .as_mut()
            .ok_or(TimerError::NoTitleEdit(self.id))?;
        *draft = text.into();
        Ok(())
    }

    /// Close the draft and hand its value back for writing to the store.
    pub fn commit_title_edit(&mut self) -> Result<String, TimerError> {
        self.ensure_editable()?;
        self.title_draft.take().ok_or(TimerError::NoTitleEdit(self.id))
    }

    pub fn cancel_title_edit(&mut self) -> Result<(), TimerError> {
        self.title_draft
            .take()
            .map(|_| ())
            .ok_or(TimerError::NoTitleEdit(self.id))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, config: &TimerConfig, obs: Observation, notifier: &dyn Notifier) -> Event {
        self.engine.stop();
        self.phase = TimerPhase::Completed;
        let alert = Notification::for_completion(&config.title, self.id, obs.at);
        info!(id = %self.id, title = %config.title, "timer completed");
        notifier.notify(&alert.title, &alert.dedupe_tag);
        Event::TimerCompleted {
            id: self.id,
            title: config.title.clone(),
            dedupe_tag: alert.dedupe_tag,
            at: obs.at,
        }
    }

    fn clear(&mut self) {
        self.engine.stop();
        self.phase = TimerPhase::Idle;
        self.target = None;
        self.started_at = None;
        self.title_draft = None;
    }
}
