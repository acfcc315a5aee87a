//! Countdown engine.
//!
//! Like the rest of the timer code this is a wall-clock state machine with no
//! internal thread: the caller feeds it instants through [`CountdownEngine::observe`]
//! at whatever cadence its tick source provides.
//!
//! ```text
//! Stopped -> Ticking <-> Paused
//!               |
//!               v
//!           Finished (auto-stop after the single completion signal)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// No target, or stopped explicitly.
    Stopped,
    /// Observations are produced on every `observe`.
    Ticking,
    /// Target kept; `observe` yields nothing until resumed.
    Paused,
    /// The completion signal has been emitted.
    Finished,
}

/// One `{remaining, progress}` reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Distinguishes running episodes; bumped on every fresh `start`.
    pub episode: u64,
    pub at: DateTime<Utc>,
    pub remaining_ms: u64,
    pub progress_pct: f64,
}

/// What one `observe` call produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Signal {
    Tick(Observation),
    /// Always the last signal of an episode.
    Completed(Observation),
}

impl Signal {
    /// The reading carried by either variant.
    pub fn observation(&self) -> &Observation {
        match self {
            Signal::Tick(o) | Signal::Completed(o) => o,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Signal::Completed(_))
    }
}

/// `max(0, target - now)` in milliseconds.
pub fn remaining_ms(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((target - now).num_milliseconds()).unwrap_or(0)
}

/// Elapsed share of `[started_at, target]`, clamped to `0.0..=100.0`.
///
/// A zero-length or inverted interval counts as fully elapsed.
pub fn progress_pct(started_at: DateTime<Utc>, target: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let span = (target - started_at).num_milliseconds();
    if span <= 0 {
        return 100.0;
    }
    let elapsed = (now - started_at).num_milliseconds();
    (elapsed as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
}

/// Countdown toward one target timestamp.
///
/// Emits a [`Signal::Tick`] per observed instant and exactly one
/// [`Signal::Completed`] per episode, then stops on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    state: EngineState,
    target: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    episode: u64,
    #[serde(default)]
    last: Option<Observation>,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Stopped,
            target: None,
            started_at: None,
            episode: 0,
            last: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Target of the current episode; cleared by `stop`.
    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    /// Start instant the progress percentage is measured from.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Counter bumped on every fresh start.
    pub fn episode(&self) -> u64 {
        self.episode
    }

    /// Most recent observation delivered by `observe`.
    pub fn last_observation(&self) -> Option<&Observation> {
        self.last.as_ref()
    }

    /// Read the countdown at `now` without advancing state or firing completion.
    pub fn peek(&self, now: DateTime<Utc>) -> Option<Observation> {
        let (target, started_at) = self.target.zip(self.started_at)?;
        Some(Observation {
            episode: self.episode,
            at: now,
            remaining_ms: remaining_ms(target, now),
            progress_pct: progress_pct(started_at, target, now),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) ticking toward `target`.
    ///
    /// Returns `false` when already ticking toward the same target. Resuming a
    /// paused engine with its own target keeps the episode; anything else
    /// opens a new one.
    pub fn start(&mut self, target: DateTime<Utc>, started_at: DateTime<Utc>) -> bool {
        let same = self.target == Some(target) && self.started_at == Some(started_at);
        match self.state {
            EngineState::Ticking if same => return false,
            EngineState::Paused if same => {}
            _ => {
                self.episode += 1;
                self.last = None;
            }
        }
        self.target = Some(target);
        self.started_at = Some(started_at);
        self.state = EngineState::Ticking;
        true
    }

    /// Stop ticking, keeping target and origin. No-op unless ticking.
    pub fn pause(&mut self) -> bool {
        if self.state != EngineState::Ticking {
            return false;
        }
        self.state = EngineState::Paused;
        true
    }

    /// Terminate the episode. Safe to call in any state.
    pub fn stop(&mut self) {
        if self.state != EngineState::Finished {
            self.state = EngineState::Stopped;
        }
        self.target = None;
        self.started_at = None;
    }

    /// Feed one instant from the tick source.
    ///
    /// Returns `None` unless ticking. The first instant at or past the target
    /// yields `Signal::Completed` and moves the engine to `Finished`, so a
    /// delayed host that skipped several cadences still sees one completion.
    pub fn observe(&mut self, now: DateTime<Utc>) -> Option<Signal> {
        if self.state != EngineState::Ticking {
            return None;
        }
        let (target, started_at) = self.target.zip(self.started_at)?;
        // Readings never go backwards within an episode.
        let now = match self.last {
            Some(last) if last.at > now => last.at,
            _ => now,
        };
        if now >= target || target <= started_at {
            let done = Observation {
                episode: self.episode,
                at: now,
                remaining_ms: 0,
                progress_pct: 100.0,
            };
            self.state = EngineState::Finished;
            self.last = Some(done);
            return Some(Signal::Completed(done));
        }
        let obs = Observation {
            episode: self.episode,
            at: now,
            remaining_ms: remaining_ms(target, now),
            progress_pct: progress_pct(started_at, target, now),
        };
        self.last = Some(obs);
        Some(Signal::Tick(obs))
    }
}
