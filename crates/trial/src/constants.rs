// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Well-known values shared by the trial configuration surface.

use std::time::Duration;

/// Sentinel accepted and emitted at the configuration boundary for an unbounded number of
/// delayed tries.
///
/// Inside the crate the bound is modelled as [`MaxTries::Unbounded`][crate::MaxTries::Unbounded];
/// this value only exists for configuration formats that carry the bound as a plain integer.
///
/// # Examples
///
/// ```
/// use trial::MaxTries;
/// use trial::constants::UNBOUNDED_TRIES;
///
/// assert_eq!(UNBOUNDED_TRIES, -1);
/// assert_eq!(MaxTries::from_raw(UNBOUNDED_TRIES)?, MaxTries::Unbounded);
/// # Ok::<(), trial::ConfigError>(())
/// ```
pub const UNBOUNDED_TRIES: i64 = -1;

/// Number of retries that yield to the executor before the trial starts sleeping.
///
/// The fast phase is not configurable. A single yield lets work that is already in flight
/// (another task finishing a write, a channel being filled) settle before any timer is armed.
pub(crate) const FAST_PHASE_TRIES: u32 = 1;

/// Default base delay of the delayed phase.
pub(crate) const DEFAULT_DELAY_BETWEEN_TRIES: Duration = Duration::from_millis(1);

/// Default saturation ceiling of the delayed phase.
pub(crate) const DEFAULT_DELAY_THRESHOLD: Duration = Duration::from_secs(1);

/// Default escalation interval: the delay doubles after every delayed try.
pub(crate) const DEFAULT_TRIES_UNTIL_DELAY_INCREASE: u32 = 1;

/// Default telemetry name of a trial.
pub(crate) const DEFAULT_TRIAL_NAME: &str = "trial";
