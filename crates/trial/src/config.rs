// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, MaxTries, Strategy};

/// Serializable form of a [`Strategy`].
///
/// Delays are expressed in whole milliseconds and the delayed-phase bound uses the integer form
/// where [`UNBOUNDED_TRIES`][crate::constants::UNBOUNDED_TRIES] (`-1`) means unbounded. Omitted
/// fields take the [`Strategy`] defaults; unknown fields are rejected.
///
/// # Examples
///
/// ```
/// use trial::{MaxTries, Strategy, StrategyConfig};
///
/// let config: StrategyConfig = serde_json::from_str(
///     r#"{ "delay_between_tries_millis": 10, "delay_threshold_millis": 500, "max_tries_with_delay": 8 }"#,
/// )?;
///
/// let strategy = Strategy::from_config(&config)?;
/// assert_eq!(strategy.max_tries_with_delay(), MaxTries::Bounded(8));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    /// Base wait of the delayed phase, in milliseconds.
    pub delay_between_tries_millis: u64,

    /// Ceiling of the escalating wait, in milliseconds.
    pub delay_threshold_millis: u64,

    /// Delayed retries between two doublings of the wait.
    pub tries_until_delay_increase: u32,

    /// Delayed retries allowed before giving up, `-1` for unbounded.
    pub max_tries_with_delay: i64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Strategy::default().to_config()
    }
}

impl Strategy {
    /// Validates `config` and creates the strategy it describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as [`StrategyBuilder::build`][crate::StrategyBuilder::build].
    pub fn from_config(config: &StrategyConfig) -> Result<Self, ConfigError> {
        Self::builder()
            .delay_between_tries_millis(config.delay_between_tries_millis)
            .delay_threshold_millis(config.delay_threshold_millis)
            .tries_until_delay_increase(config.tries_until_delay_increase)
            .max_tries_with_delay_raw(config.max_tries_with_delay)
            .build()
    }

    /// Returns the serializable form of this strategy.
    ///
    /// Sub-millisecond precision is truncated and delays beyond [`u64::MAX`] milliseconds saturate.
    #[must_use]
    pub fn to_config(&self) -> StrategyConfig {
        StrategyConfig {
            delay_between_tries_millis: saturating_millis(self.delay_between_tries()),
            delay_threshold_millis: saturating_millis(self.delay_threshold()),
            tries_until_delay_increase: self.tries_until_delay_increase(),
            max_tries_with_delay: self.max_tries_with_delay().as_raw(),
        }
    }
}

impl TryFrom<StrategyConfig> for Strategy {
    type Error = ConfigError;

    fn try_from(config: StrategyConfig) -> Result<Self, Self::Error> {
        Self::from_config(&config)
    }
}

impl From<Strategy> for StrategyConfig {
    fn from(strategy: Strategy) -> Self {
        strategy.to_config()
    }
}

impl Serialize for MaxTries {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_raw())
    }
}

impl<'de> Deserialize<'de> for MaxTries {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

fn saturating_millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn default_matches_strategy_default() {
        let config = StrategyConfig::default();

        assert_eq!(config.delay_between_tries_millis, 1);
        assert_eq!(config.delay_threshold_millis, 1000);
        assert_eq!(config.tries_until_delay_increase, 1);
        assert_eq!(config.max_tries_with_delay, -1);
        assert_eq!(Strategy::from_config(&config).unwrap(), Strategy::default());
    }

    #[test]
    fn deserialize_partial_config() {
        let config: StrategyConfig = serde_json::from_str(r#"{ "max_tries_with_delay": 3 }"#).unwrap();
        let strategy = Strategy::try_from(config).unwrap();

        assert_eq!(strategy.max_tries_with_delay(), MaxTries::Bounded(3));
        assert_eq!(strategy.delay_between_tries(), Duration::from_millis(1));
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let result = serde_json::from_str::<StrategyConfig>(r#"{ "jitter": true }"#);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = StrategyConfig {
            delay_between_tries_millis: 10,
            delay_threshold_millis: 1,
            ..StrategyConfig::default()
        };

        let error = Strategy::from_config(&config).unwrap_err();
        assert_eq!(error.field(), "delay_threshold");

        let config = StrategyConfig {
            max_tries_with_delay: -7,
            ..StrategyConfig::default()
        };

        let error = Strategy::from_config(&config).unwrap_err();
        assert_eq!(error.field(), "max_tries_with_delay");
    }

    #[test]
    fn strategy_to_config_and_back() {
        let strategy = Strategy::builder()
            .delay_between_tries_millis(2)
            .delay_threshold_millis(64)
            .tries_until_delay_increase(4)
            .max_tries_with_delay(9)
            .build()
            .unwrap();

        let json = serde_json::to_string(&StrategyConfig::from(strategy)).unwrap();
        assert_eq!(
            json,
            r#"{"delay_between_tries_millis":2,"delay_threshold_millis":64,"tries_until_delay_increase":4,"max_tries_with_delay":9}"#
        );

        let config: StrategyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(Strategy::try_from(config).unwrap(), strategy);
    }

    #[test]
    fn max_tries_serde_uses_sentinel() {
        assert_eq!(serde_json::to_string(&MaxTries::Unbounded).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&MaxTries::Bounded(5)).unwrap(), "5");
        assert_eq!(serde_json::from_str::<MaxTries>("-1").unwrap(), MaxTries::Unbounded);
        assert!(serde_json::from_str::<MaxTries>("-2").is_err());
    }

    #[test]
    fn to_config_saturates_huge_delays() {
        let strategy = Strategy::builder()
            .delay_between_tries(Duration::MAX)
            .delay_threshold(Duration::MAX)
            .build()
            .unwrap();

        assert_eq!(strategy.to_config().delay_threshold_millis, u64::MAX);
    }
}
