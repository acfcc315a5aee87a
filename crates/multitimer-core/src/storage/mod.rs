mod config;

pub use config::{Config, DisplayConfig, NotificationsConfig, TimerSection};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/multitimer[-dev]/` based on MULTITIMER_ENV.
///
/// Set MULTITIMER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MULTITIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("multitimer-dev")
    } else {
        base_dir.join("multitimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
