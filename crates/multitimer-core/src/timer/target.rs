//! Pure target-timestamp helpers.
//!
//! `AbsoluteTime` resolves to *today* at `hour:minute` in the timezone of
//! `now`, with seconds zeroed. It never rolls over to tomorrow: a time that
//! already passed today yields a past target, which the start guard rejects.
//!
//! The seconds are zeroed on purpose rather than carried over from `now`:
//! `08:00` fires at 08:00:00, not at 08:00 plus whatever seconds and
//! milliseconds the clock showed when the timer was started.

use chrono::{DateTime, TimeZone, Utc};

use super::config::{InputMode, TimerConfig};
use crate::error::ValidationError;

/// Compute the absolute timestamp `config` counts down to, relative to `now`.
pub fn compute_target<Tz: TimeZone>(
    config: &TimerConfig,
    now: &DateTime<Tz>,
) -> Result<DateTime<Utc>, ValidationError> {
    match config.input_mode {
        InputMode::AbsoluteTime => {
            let time = config.absolute_target;
            time.validate()?;
            let local = now
                .date_naive()
                .and_hms_opt(time.hour, time.minute, 0)
                .ok_or(ValidationError::InvalidClockTime {
                    hour: time.hour,
                    minute: time.minute,
                })?;
            now.timezone()
                .from_local_datetime(&local)
                .earliest()
                .map(|t| t.with_timezone(&Utc))
                .ok_or(ValidationError::NonexistentLocalTime {
                    hour: time.hour,
                    minute: time.minute,
                })
        }
        InputMode::RelativeDuration => now
            .with_timezone(&Utc)
            .checked_add_signed(config.relative_duration.as_delta())
            .ok_or_else(|| ValidationError::DurationOutOfRange(config.relative_duration.to_string())),
    }
}

/// Whether starting now would count down to a strictly later instant.
pub fn is_target_in_future<Tz: TimeZone>(config: &TimerConfig, now: &DateTime<Tz>) -> bool {
    validate_target(config, now).is_ok()
}

/// Check the start guard. Title has no format constraint.
pub fn validate_edit<Tz: TimeZone>(
    config: &TimerConfig,
    now: &DateTime<Tz>,
) -> Result<(), ValidationError> {
    validate_target(config, now).map(|_| ())
}

/// Compute the target and require it to be strictly after `now`.
pub(crate) fn validate_target<Tz: TimeZone>(
    config: &TimerConfig,
    now: &DateTime<Tz>,
) -> Result<DateTime<Utc>, ValidationError> {
    let target = compute_target(config, now)?;
    let now = now.with_timezone(&Utc);
    if target <= now {
        return Err(ValidationError::TargetNotInFuture { target, now });
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::config::{ClockTime, DurationUnit, RelativeDuration, TimerDefaults};
    use chrono::FixedOffset;
    use proptest::prelude::*;

    fn relative(amount: u32, unit: DurationUnit) -> TimerConfig {
        let mut config = TimerConfig::new(&TimerDefaults::default());
        config.relative_duration = RelativeDuration::new(amount, unit);
        config
    }

    fn absolute(hour: u32, minute: u32) -> TimerConfig {
        let mut config = TimerConfig::new(&TimerDefaults::default());
        config.input_mode = InputMode::AbsoluteTime;
        config.absolute_target = ClockTime { hour, minute };
        config
    }

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn one_hour_relative_target() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let target = compute_target(&relative(1, DurationUnit::Hour), &now).unwrap();
        assert_eq!((target - now).num_milliseconds(), 3_600_000);
    }

    #[test]
    fn absolute_target_uses_today_in_local_offset() {
        let now = tokyo().with_ymd_and_hms(2026, 10, 14, 7, 30, 45).unwrap();
        let target = compute_target(&absolute(8, 0), &now).unwrap();
        assert_eq!(target, tokyo().with_ymd_and_hms(2026, 10, 14, 8, 0, 0).unwrap());
        assert!(is_target_in_future(&absolute(8, 0), &now));
    }

    #[test]
    fn past_absolute_time_does_not_roll_over() {
        let now = tokyo().with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        let target = compute_target(&absolute(8, 0), &now).unwrap();
        assert!(target < now.with_timezone(&Utc));
        assert!(!is_target_in_future(&absolute(8, 0), &now));
        assert!(matches!(
            validate_edit(&absolute(8, 0), &now),
            Err(ValidationError::TargetNotInFuture { .. })
        ));
    }

    #[test]
    fn current_minute_is_not_in_future() {
        let now = tokyo().with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        assert!(!is_target_in_future(&absolute(9, 0), &now));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let now = Utc::now();
        assert!(!is_target_in_future(&relative(0, DurationUnit::Minute), &now));
    }

    #[test]
    fn out_of_range_clock_time_is_an_error() {
        let now = Utc::now();
        assert!(matches!(
            compute_target(&absolute(25, 0), &now),
            Err(ValidationError::InvalidClockTime { hour: 25, .. })
        ));
    }

    proptest! {
        #[test]
        fn nonzero_relative_target_is_after_now(
            amount in 1u32..10_000,
            unit in prop_oneof![
                Just(DurationUnit::Second),
                Just(DurationUnit::Minute),
                Just(DurationUnit::Hour),
                Just(DurationUnit::Day),
            ],
            offset_secs in 0i64..2_000_000_000,
        ) {
            let now = Utc.timestamp_opt(offset_secs, 0).unwrap();
            let target = compute_target(&relative(amount, unit), &now).unwrap();
            prop_assert!(target > now);
        }
    }
}
