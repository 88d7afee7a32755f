use crate::error::MonitorError;
use chrono::{DateTime, Duration, Utc};
use driftwatch_settings::MonitorSettings;

/// Maps a tick index to the timestamp its record is stored under
pub trait TickClock: Send + Sync {
    fn timestamp(&self, tick: usize) -> Result<DateTime<Utc>, MonitorError>;
}

/// `epoch + step * tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStepClock {
    pub epoch: DateTime<Utc>,
    pub step: Duration,
}

impl FixedStepClock {
    pub fn new(epoch: DateTime<Utc>, step: Duration) -> Self {
        Self { epoch, step }
    }

    pub fn from_settings(settings: &MonitorSettings) -> Self {
        Self::new(settings.epoch, settings.tick_step())
    }
}

impl TickClock for FixedStepClock {
    fn timestamp(&self, tick: usize) -> Result<DateTime<Utc>, MonitorError> {
        i32::try_from(tick)
            .ok()
            .and_then(|factor| self.step.checked_mul(factor))
            .and_then(|offset| self.epoch.checked_add_signed(offset))
            .ok_or(MonitorError::TimestampOverflowError { tick })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_step_clock() {
        let epoch = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();
        let clock = FixedStepClock::new(epoch, Duration::days(1));

        assert_eq!(clock.timestamp(0).unwrap(), epoch);
        assert_eq!(
            clock.timestamp(4).unwrap(),
            Utc.with_ymd_and_hms(2023, 12, 5, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_clock_from_settings() {
        let settings = MonitorSettings {
            tick_step_seconds: 3600,
            ..MonitorSettings::default()
        };
        let clock = FixedStepClock::from_settings(&settings);

        assert_eq!(
            clock.timestamp(2).unwrap() - clock.timestamp(0).unwrap(),
            Duration::hours(2)
        );
    }

    #[test]
    fn test_timestamp_overflow() {
        let epoch = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();

        // past the largest representable date
        let clock = FixedStepClock::new(epoch, Duration::seconds(10_000_000_000_000));
        assert!(clock.timestamp(0).is_ok());
        assert!(matches!(
            clock.timestamp(1),
            Err(MonitorError::TimestampOverflowError { tick: 1 })
        ));

        // tick counts beyond the step multiplier range
        let clock = FixedStepClock::new(epoch, Duration::seconds(1));
        let tick = i32::MAX as usize + 1;
        assert!(matches!(
            clock.timestamp(tick),
            Err(MonitorError::TimestampOverflowError { tick: t }) if t == tick
        ));
    }
}
