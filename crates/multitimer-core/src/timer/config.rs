//! Timer configuration: identity, title, and how the target is chosen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Opaque, immutable timer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(Uuid);

impl TimerId {
    pub const SHORT_LEN: usize = 8;

    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First [`TimerId::SHORT_LEN`] hex digits, enough to tell timers apart on a board.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..Self::SHORT_LEN].to_string()
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TimerId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ValidationError::InvalidValue {
                field: "id".into(),
                message: e.to_string(),
            })
    }
}

/// Which of the target fields is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    AbsoluteTime,
    RelativeDuration,
}

impl FromStr for InputMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" | "absolute_time" | "at" | "time" => Ok(Self::AbsoluteTime),
            "relative" | "relative_duration" | "in" | "duration" => Ok(Self::RelativeDuration),
            other => Err(ValidationError::InvalidValue {
                field: "input_mode".into(),
                message: format!("unknown mode '{other}' (expected 'at' or 'in')"),
            }),
        }
    }
}

/// Wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        let time = Self { hour, minute };
        time.validate()?;
        Ok(time)
    }

    /// Fields are public (and deserializable), so range is re-checked on use.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hour > 23 || self.minute > 59 {
            return Err(ValidationError::InvalidClockTime {
                hour: self.hour,
                minute: self.minute,
            });
        }
        Ok(())
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self { hour: 0, minute: 0 }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidValue {
            field: "absolute_target".into(),
            message: format!("expected HH:MM, got '{s}'"),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = h.parse::<u32>().map_err(|_| invalid())?;
        let minute = m.parse::<u32>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl DurationUnit {
    pub fn seconds(&self) -> i64 {
        match self {
            DurationUnit::Second => 1,
            DurationUnit::Minute => 60,
            DurationUnit::Hour => 3_600,
            DurationUnit::Day => 86_400,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            DurationUnit::Second => "s",
            DurationUnit::Minute => "m",
            DurationUnit::Hour => "h",
            DurationUnit::Day => "d",
        }
    }
}

impl FromStr for DurationUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(Self::Second),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(Self::Minute),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(Self::Hour),
            "d" | "day" | "days" => Ok(Self::Day),
            other => Err(ValidationError::InvalidValue {
                field: "unit".into(),
                message: format!("unknown duration unit '{other}'"),
            }),
        }
    }
}

/// `{amount, unit}` countdown length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDuration {
    pub amount: u32,
    pub unit: DurationUnit,
}

impl RelativeDuration {
    pub fn new(amount: u32, unit: DurationUnit) -> Self {
        Self { amount, unit }
    }

    pub fn as_delta(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(i64::from(self.amount) * self.unit.seconds())
    }
}

impl Default for RelativeDuration {
    fn default() -> Self {
        Self::new(1, DurationUnit::Hour)
    }
}

impl fmt::Display for RelativeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for RelativeDuration {
    type Err = ValidationError;

    /// Accepts `90s`, `25m`, `1h`, `2 days`. A bare number means minutes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);
        let amount = digits
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidValue {
                field: "relative_duration".into(),
                message: format!("expected <amount><unit>, got '{s}'"),
            })?;
        let unit = match unit.trim() {
            "" => DurationUnit::Minute,
            u => u.parse()?,
        };
        Ok(Self::new(amount, unit))
    }
}

/// Values a freshly created timer starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDefaults {
    pub title: String,
    pub duration: RelativeDuration,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            title: "timer".into(),
            duration: RelativeDuration::default(),
        }
    }
}

/// The persistent description of one timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub id: TimerId,
    pub title: String,
    pub input_mode: InputMode,
    pub absolute_target: ClockTime,
    pub relative_duration: RelativeDuration,
}

impl TimerConfig {
    pub fn new(defaults: &TimerDefaults) -> Self {
        Self {
            id: TimerId::new(),
            title: defaults.title.clone(),
            input_mode: InputMode::RelativeDuration,
            absolute_target: ClockTime::default(),
            relative_duration: defaults.duration,
        }
    }

    /// Human summary of the authoritative target field.
    pub fn describe_target(&self) -> String {
        match self.input_mode {
            InputMode::AbsoluteTime => format!("at {}", self.absolute_target),
            InputMode::RelativeDuration => format!("in {}", self.relative_duration),
        }
    }
}

/// Partial update to a [`TimerConfig`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<InputMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_target: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_duration: Option<RelativeDuration>,
}

impl TimerPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Switch to absolute mode targeting `time`.
    pub fn at(time: ClockTime) -> Self {
        Self {
            input_mode: Some(InputMode::AbsoluteTime),
            absolute_target: Some(time),
            ..Self::default()
        }
    }

    /// Switch to relative mode with `duration`.
    pub fn after(duration: RelativeDuration) -> Self {
        Self {
            input_mode: Some(InputMode::RelativeDuration),
            relative_duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn mode(mode: InputMode) -> Self {
        Self {
            input_mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.input_mode.is_none()
            && self.absolute_target.is_none()
            && self.relative_duration.is_none()
    }

    /// Apply to `config`. Returns whether mode/target fields actually changed.
    pub fn apply_to(&self, config: &mut TimerConfig) -> bool {
        let before = (
            config.input_mode,
            config.absolute_target,
            config.relative_duration,
        );
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(mode) = self.input_mode {
            config.input_mode = mode;
        }
        if let Some(time) = self.absolute_target {
            config.absolute_target = time;
        }
        if let Some(duration) = self.relative_duration {
            config.relative_duration = duration;
        }
        before
            != (
                config.input_mode,
                config.absolute_target,
                config.relative_duration,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_uses_defaults() {
        let config = TimerConfig::new(&TimerDefaults::default());
        assert_eq!(config.title, "timer");
        assert_eq!(config.input_mode, InputMode::RelativeDuration);
        assert_eq!(config.relative_duration, RelativeDuration::new(1, DurationUnit::Hour));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(TimerId::new(), TimerId::new());
    }

    #[test]
    fn clock_time_rejects_out_of_range() {
        assert!(ClockTime::new(23, 59).is_ok());
        assert!(ClockTime::new(24, 0).is_err());
        assert!(ClockTime::new(8, 60).is_err());
    }

    #[test]
    fn clock_time_parses_hh_mm() {
        assert_eq!("08:05".parse::<ClockTime>().unwrap(), ClockTime::new(8, 5).unwrap());
        assert!("8".parse::<ClockTime>().is_err());
        assert!("25:00".parse::<ClockTime>().is_err());
    }

    #[test]
    fn relative_duration_parses_units() {
        assert_eq!(
            "90s".parse::<RelativeDuration>().unwrap(),
            RelativeDuration::new(90, DurationUnit::Second)
        );
        assert_eq!(
            "2 hours".parse::<RelativeDuration>().unwrap(),
            RelativeDuration::new(2, DurationUnit::Hour)
        );
        assert_eq!(
            "25".parse::<RelativeDuration>().unwrap(),
            RelativeDuration::new(25, DurationUnit::Minute)
        );
        assert!("h".parse::<RelativeDuration>().is_err());
        assert!("3 fortnights".parse::<RelativeDuration>().is_err());
    }

    #[test]
    fn relative_duration_display_roundtrips() {
        let d = RelativeDuration::new(45, DurationUnit::Minute);
        assert_eq!(d.to_string(), "45m");
        assert_eq!(d.to_string().parse::<RelativeDuration>().unwrap(), d);
    }

    #[test]
    fn title_patch_does_not_touch_timing() {
        let mut config = TimerConfig::new(&TimerDefaults::default());
        assert!(!TimerPatch::title("tea").apply_to(&mut config));
        assert_eq!(config.title, "tea");
    }

    #[test]
    fn patch_with_same_values_reports_no_timing_change() {
        let mut config = TimerConfig::new(&TimerDefaults::default());
        let same = TimerPatch::after(config.relative_duration);
        assert!(!same.apply_to(&mut config));
    }

    #[test]
    fn mode_switch_reports_timing_change() {
        let mut config = TimerConfig::new(&TimerDefaults::default());
        let patch = TimerPatch::at(ClockTime::new(8, 0).unwrap());
        assert!(patch.apply_to(&mut config));
        assert_eq!(config.input_mode, InputMode::AbsoluteTime);
        assert_eq!(config.describe_target(), "at 08:00");
    }
}
