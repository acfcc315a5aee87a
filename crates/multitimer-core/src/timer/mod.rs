mod config;
mod controller;
mod countdown;
mod target;

pub use config::{
    ClockTime, DurationUnit, InputMode, RelativeDuration, TimerConfig, TimerDefaults, TimerId,
    TimerPatch,
};
pub use controller::{TimerController, TimerPhase, TimerSnapshot};
pub use countdown::{progress_pct, remaining_ms, CountdownEngine, EngineState, Observation, Signal};
pub use target::{compute_target, is_target_in_future, validate_edit};
