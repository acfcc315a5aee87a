pub mod config;
pub mod countdown;
pub mod session;

use std::time::Duration;

use clap::Args;
use multitimer_core::{Config, MemoryStore, TimerBoard};

use crate::display::Output;
use crate::notifier::CliNotifier;

/// Options shared by the commands that run timers.
#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// Tick interval in milliseconds (overrides timer.tick_interval_ms)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub tick_ms: Option<u64>,
    /// Log alerts instead of showing desktop notifications
    #[arg(long)]
    pub no_notify: bool,
    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl RunOptions {
    pub fn interval(&self, config: &Config) -> Duration {
        self.tick_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.tick_interval())
    }

    pub fn board(&self, config: &Config) -> TimerBoard<MemoryStore> {
        TimerBoard::new(
            MemoryStore::with_defaults(config.timer_defaults()),
            CliNotifier::from_config(config, self.no_notify),
        )
    }

    pub fn output(&self, config: &Config) -> Output {
        Output::new(self.json, config.display.clone())
    }
}

/// Current-thread runtime: every timer transition happens on one thread.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
