//! Core error types for multitimer-core.
//!
//! Every failure in this crate is locally recoverable: a rejected start, an
//! edit attempted while running, an unknown timer id. Nothing here is fatal.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::{TimerId, TimerPhase};

/// Core error type for multitimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer state machine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors raised by the timer controller and board.
#[derive(Error, Debug)]
pub enum TimerError {
    /// No timer with this id exists in the store
    #[error("No timer with id {0}")]
    NotFound(TimerId),

    /// A lookup token matched nothing, or more than one timer
    #[error("Cannot resolve timer '{token}': {reason}")]
    Unresolved { token: String, reason: String },

    /// The configured target is not after now
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// Config fields cannot change while the countdown runs
    #[error("Timer {0} is running; pause it before editing")]
    EditWhileRunning(TimerId),

    /// A title draft is open so the start control is disabled
    #[error("Timer {0} has an unsaved title edit")]
    TitleEditInProgress(TimerId),

    /// No title draft is open
    #[error("Timer {0} has no title edit in progress")]
    NoTitleEdit(TimerId),

    /// The action is not permitted from the current phase
    #[error("Cannot {action} a timer that is {phase}")]
    InvalidTransition {
        phase: TimerPhase,
        action: &'static str,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(#[from] std::io::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Start guard: the computed target is at or before now
    #[error("choose a time later than now (target {target} is not after {now})")]
    TargetNotInFuture {
        target: chrono::DateTime<chrono::Utc>,
        now: chrono::DateTime<chrono::Utc>,
    },

    /// Hour/minute outside of a 24h clock
    #[error("Invalid clock time {hour:02}:{minute:02}")]
    InvalidClockTime { hour: u32, minute: u32 },

    /// Local wall-clock time does not exist today (DST gap)
    #[error("{hour:02}:{minute:02} does not exist today in the local timezone")]
    NonexistentLocalTime { hour: u32, minute: u32 },

    /// Duration too large to add to a timestamp
    #[error("Duration {0} is out of range")]
    DurationOutOfRange(String),

    /// Unparseable textual input
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Short user-facing indicator shown next to a disabled start control.
    pub fn indicator(&self) -> &'static str {
        match self {
            ValidationError::TargetNotInFuture { .. } => "choose a time later than now",
            ValidationError::InvalidClockTime { .. }
            | ValidationError::NonexistentLocalTime { .. } => "choose a valid time of day",
            ValidationError::DurationOutOfRange(_) => "choose a shorter duration",
            ValidationError::InvalidValue { .. } => "invalid value",
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
