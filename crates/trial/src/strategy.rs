// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use crate::constants::{DEFAULT_DELAY_BETWEEN_TRIES, DEFAULT_DELAY_THRESHOLD, DEFAULT_TRIES_UNTIL_DELAY_INCREASE};
use crate::{ConfigError, MaxTries};

/// Immutable retry configuration shared by any number of [`Trial`][crate::Trial] instances.
///
/// A strategy describes the delayed phase of a trial:
///
/// | Option | Default | Effect |
/// |--------|---------|--------|
/// | [`delay_between_tries`][StrategyBuilder::delay_between_tries] | `1ms` | Wait before the first delayed retry. |
/// | [`delay_threshold`][StrategyBuilder::delay_threshold] | `1s` | Ceiling the escalating wait never exceeds. |
/// | [`tries_until_delay_increase`][StrategyBuilder::tries_until_delay_increase] | `1` | Delayed retries between two doublings of the wait. |
/// | [`max_tries_with_delay`][StrategyBuilder::max_tries_with_delay] | unbounded (`-1`) | Delayed retries allowed before giving up. |
///
/// The strategy is validated once by [`StrategyBuilder::build`] and cannot be modified
/// afterwards. It is cheap to clone and safe to share across threads.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use trial::{MaxTries, Strategy};
///
/// let strategy = Strategy::builder()
///     .delay_between_tries(Duration::from_millis(10))
///     .delay_threshold(Duration::from_secs(1))
///     .tries_until_delay_increase(5)
///     .max_tries_with_delay(20)
///     .build()?;
///
/// assert_eq!(strategy.max_tries_with_delay(), MaxTries::Bounded(20));
/// # Ok::<(), trial::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strategy {
    delay_between_tries: Duration,
    delay_threshold: Duration,
    tries_until_delay_increase: u32,
    max_tries_with_delay: MaxTries,
}

impl Strategy {
    /// Starts configuring a new strategy with default values.
    #[must_use]
    pub fn builder() -> StrategyBuilder {
        StrategyBuilder::default()
    }

    /// Base wait applied once the trial enters the delayed phase.
    #[must_use]
    pub fn delay_between_tries(&self) -> Duration {
        self.delay_between_tries
    }

    /// Ceiling of the escalating wait.
    #[must_use]
    pub fn delay_threshold(&self) -> Duration {
        self.delay_threshold
    }

    /// Number of delayed retries after which the wait doubles.
    #[must_use]
    pub fn tries_until_delay_increase(&self) -> u32 {
        self.tries_until_delay_increase
    }

    /// Upper bound on retries made in the delayed phase.
    #[must_use]
    pub fn max_tries_with_delay(&self) -> MaxTries {
        self.max_tries_with_delay
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            delay_between_tries: DEFAULT_DELAY_BETWEEN_TRIES,
            delay_threshold: DEFAULT_DELAY_THRESHOLD,
            tries_until_delay_increase: DEFAULT_TRIES_UNTIL_DELAY_INCREASE,
            max_tries_with_delay: MaxTries::Unbounded,
        }
    }
}

/// Builder for [`Strategy`].
///
/// Every setter records its value as-is; the invariants are checked together by
/// [`build`][Self::build] so that the order of the calls does not matter.
#[derive(Debug)]
#[must_use]
pub struct StrategyBuilder {
    delay_between_tries: Duration,
    delay_threshold: Duration,
    tries_until_delay_increase: u32,
    max_tries_with_delay: Result<MaxTries, ConfigError>,
}

impl Default for StrategyBuilder {
    fn default() -> Self {
        let defaults = Strategy::default();

        Self {
            delay_between_tries: defaults.delay_between_tries,
            delay_threshold: defaults.delay_threshold,
            tries_until_delay_increase: defaults.tries_until_delay_increase,
            max_tries_with_delay: Ok(defaults.max_tries_with_delay),
        }
    }
}

impl StrategyBuilder {
    /// Sets the base wait of the delayed phase.
    ///
    /// **Default**: `1ms`
    pub fn delay_between_tries(mut self, delay: Duration) -> Self {
        self.delay_between_tries = delay;
        self
    }

    /// Sets the base wait of the delayed phase in milliseconds.
    pub fn delay_between_tries_millis(self, millis: u64) -> Self {
        self.delay_between_tries(Duration::from_millis(millis))
    }

    /// Sets the ceiling of the escalating wait. Must not be below
    /// [`delay_between_tries`][Self::delay_between_tries].
    ///
    /// **Default**: `1s`
    pub fn delay_threshold(mut self, threshold: Duration) -> Self {
        self.delay_threshold = threshold;
        self
    }

    /// Sets the ceiling of the escalating wait in milliseconds.
    pub fn delay_threshold_millis(self, millis: u64) -> Self {
        self.delay_threshold(Duration::from_millis(millis))
    }

    /// Sets how many delayed retries elapse before the wait doubles. Must be at least `1`.
    ///
    /// **Default**: `1`
    pub fn tries_until_delay_increase(mut self, tries: u32) -> Self {
        self.tries_until_delay_increase = tries;
        self
    }

    /// Bounds the number of delayed retries. `0` disables the delayed phase entirely, leaving
    /// only the fast phase.
    ///
    /// **Default**: unbounded
    pub fn max_tries_with_delay(mut self, tries: u32) -> Self {
        self.max_tries_with_delay = Ok(MaxTries::Bounded(tries));
        self
    }

    /// Lets the delayed phase retry until the operation succeeds.
    pub fn unbounded_tries_with_delay(mut self) -> Self {
        self.max_tries_with_delay = Ok(MaxTries::Unbounded);
        self
    }

    /// Sets the delayed-phase bound from its integer form, where
    /// [`UNBOUNDED_TRIES`][crate::constants::UNBOUNDED_TRIES] (`-1`) means unbounded.
    ///
    /// Invalid values are reported by [`build`][Self::build].
    pub fn max_tries_with_delay_raw(mut self, raw: i64) -> Self {
        self.max_tries_with_delay = MaxTries::from_raw(raw);
        self
    }

    /// Validates the options and creates the strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when:
    ///
    /// - the delay threshold is below the delay between tries,
    /// - the number of tries until the delay increases is `0`,
    /// - the raw delayed-phase bound is negative and not `-1`.
    pub fn build(self) -> Result<Strategy, ConfigError> {
        if self.delay_threshold < self.delay_between_tries {
            return Err(ConfigError::new(
                "delay_threshold",
                format!(
                    "{}ms is below the delay between tries of {}ms",
                    self.delay_threshold.as_millis(),
                    self.delay_between_tries.as_millis()
                ),
            ));
        }

        if self.tries_until_delay_increase == 0 {
            return Err(ConfigError::new("tries_until_delay_increase", "must be at least 1"));
        }

        Ok(Strategy {
            delay_between_tries: self.delay_between_tries,
            delay_threshold: self.delay_threshold,
            tries_until_delay_increase: self.tries_until_delay_increase,
            max_tries_with_delay: self.max_tries_with_delay?,
        })
    }
}
