//! # Multitimer Core Library
//!
//! Business logic for a board of independent, named countdown timers. The
//! library knows nothing about its host: a CLI, a GUI, or a test drives it by
//! passing in wall-clock instants and user actions.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: wall-clock state machine turning `(target, now)` into
//!   remaining time, a clamped 0-100 progress value, and exactly one completion
//! - **Timer Controller**: Idle/Running/Paused/Completed phase machine that
//!   computes the target from the timer's config and guards transitions
//! - **Store**: CRUD over timer configs, the single source of truth
//! - **Board**: one controller per stored timer plus a notifier
//! - **Ticker**: tokio-based periodic tick source with deterministic cancel
//! - **Storage**: TOML-based application configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: per-episode countdown
//! - [`TimerController`]: per-timer state machine
//! - [`TimerBoard`]: multi-timer orchestration
//! - [`Ticker`]: interval-driven instants on a channel
//! - [`Config`]: application configuration management

pub mod board;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod store;
pub mod ticker;
pub mod timer;

pub use board::TimerBoard;
pub use error::{ConfigError, CoreError, TimerError, ValidationError};
pub use events::Event;
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier};
pub use storage::Config;
pub use store::{MemoryStore, TimerStore};
pub use ticker::Ticker;
pub use timer::{
    compute_target, is_target_in_future, validate_edit, ClockTime, CountdownEngine, DurationUnit,
    InputMode, RelativeDuration, TimerConfig, TimerController, TimerDefaults, TimerId,
    TimerPatch, TimerPhase, TimerSnapshot,
};
