//! Compiled configuration of the firmware.
//!
//! There is exactly one run mode. Change the constants below to rewire the board.

use std::convert::TryFrom;
use std::time::Duration;
use thiserror::Error;

use crate::pin_map::Id;
use crate::sensor::Address;

/// LED driven by the toggle loop.
pub const BLINK_LED: Id = Id::Blue;
/// LED acquired at startup and held untouched.
pub const IDLE_LED: Id = Id::Red;
/// Bus the temperature/humidity sensor is attached to.
pub const SENSOR_BUS: Id = Id::I2c1;
pub const SENSOR_ADDRESS: Address = Address::Low;
pub const BLINK_INTERVAL_MS: i64 = 100;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("blink interval must be positive, got {0} ms")]
    NonPositiveInterval(i64),
    #[error("blink interval must be a whole number of milliseconds, got {0:?}")]
    SubMillisecondInterval(Duration),
    #[error("blink interval of {0:?} does not fit the delay provider")]
    IntervalTooLong(Duration),
}

/// Period between two toggles. Always a whole, nonzero number of milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlinkInterval(u32);

impl BlinkInterval {
    /// Validates `duration`. Fractions of a millisecond are rejected rather than rounded.
    pub fn new(duration: Duration) -> Result<Self, ConfigError> {
        if duration == Duration::from_secs(0) {
            return Err(ConfigError::NonPositiveInterval(0));
        }
        if duration.subsec_nanos() % 1_000_000 != 0 {
            return Err(ConfigError::SubMillisecondInterval(duration));
        }

        u32::try_from(duration.as_millis())
            .map(BlinkInterval)
            .map_err(|_| ConfigError::IntervalTooLong(duration))
    }

    /// Validates a signed millisecond count, as written in configuration.
    pub fn from_millis(ms: i64) -> Result<Self, ConfigError> {
        if ms <= 0 {
            return Err(ConfigError::NonPositiveInterval(ms));
        }
        Self::new(Duration::from_millis(ms as u64))
    }

    /// Milliseconds, as handed to the delay provider.
    pub fn as_millis(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(u64::from(self.0))
    }
}

/// Wiring and timing of the firmware.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub blink_led: Id,
    pub idle_led: Id,
    pub sensor_bus: Id,
    pub sensor_address: Address,
    pub interval: BlinkInterval,
}

impl Config {
    /// The compiled configuration, validated.
    pub fn compiled() -> Result<Self, ConfigError> {
        Ok(Self {
            blink_led: BLINK_LED,
            idle_led: IDLE_LED,
            sensor_bus: SENSOR_BUS,
            sensor_address: SENSOR_ADDRESS,
            interval: BlinkInterval::from_millis(BLINK_INTERVAL_MS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_config_blinks_every_100ms() {
        let config = Config::compiled().unwrap();
        assert_eq!(config.interval.as_millis(), 100);
        assert_eq!(config.blink_led, Id::Blue);
        assert_eq!(config.sensor_bus, Id::I2c1);
    }

    #[test]
    fn zero_and_negative_intervals_are_rejected() {
        assert_eq!(
            BlinkInterval::from_millis(0),
            Err(ConfigError::NonPositiveInterval(0))
        );
        assert_eq!(
            BlinkInterval::from_millis(-5),
            Err(ConfigError::NonPositiveInterval(-5))
        );
        assert_eq!(
            BlinkInterval::new(Duration::from_secs(0)),
            Err(ConfigError::NonPositiveInterval(0))
        );
    }

    #[test]
    fn sub_millisecond_interval_is_rejected() {
        let duration = Duration::from_micros(500);
        assert_eq!(
            BlinkInterval::new(duration),
            Err(ConfigError::SubMillisecondInterval(duration))
        );
    }

    #[test]
    fn oversized_interval_is_rejected() {
        let duration = Duration::from_millis(u64::from(u32::MAX) + 1);
        assert_eq!(
            BlinkInterval::new(duration),
            Err(ConfigError::IntervalTooLong(duration))
        );
    }

    #[test]
    fn fractional_millisecond_interval_is_rejected() {
        let duration = Duration::from_micros(1_500);
        assert_eq!(
            BlinkInterval::new(duration),
            Err(ConfigError::SubMillisecondInterval(duration))
        );
    }

    #[test]
    fn accepted_interval_is_never_shorter_than_requested() {
        for duration in [Duration::from_millis(1), Duration::from_millis(100), Duration::from_secs(2)]
            .iter()
            .copied()
        {
            let interval = BlinkInterval::new(duration).unwrap();
            assert_eq!(interval.as_duration(), duration);
        }
    }
}
