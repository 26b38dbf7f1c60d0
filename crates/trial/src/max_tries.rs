// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Display;

use crate::ConfigError;
use crate::constants::UNBOUNDED_TRIES;

/// Upper bound on the number of retries made in the delayed phase.
///
/// A bounded trial gives up once the bound is reached. An unbounded trial keeps retrying until the
/// operation succeeds; its delay still grows and saturates, but its attempt counters are never
/// incremented so that they cannot overflow.
///
/// # Examples
///
/// ```
/// use trial::MaxTries;
///
/// let bounded = MaxTries::from_raw(5)?;
/// assert_eq!(bounded, MaxTries::Bounded(5));
/// assert_eq!(bounded.as_raw(), 5);
///
/// let unbounded = MaxTries::from_raw(-1)?;
/// assert!(unbounded.is_unbounded());
/// assert_eq!(unbounded.as_raw(), -1);
///
/// assert!(MaxTries::from_raw(-2).is_err());
/// # Ok::<(), trial::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaxTries {
    /// At most this many delayed retries.
    Bounded(u32),

    /// Delayed retries continue until the operation succeeds.
    #[default]
    Unbounded,
}

impl MaxTries {
    /// Converts the integer form used by configuration formats, where [`UNBOUNDED_TRIES`]
    /// (`-1`) stands for [`MaxTries::Unbounded`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for negative values other than `-1` and for values above
    /// [`u32::MAX`].
    pub fn from_raw(raw: i64) -> Result<Self, ConfigError> {
        if raw == UNBOUNDED_TRIES {
            return Ok(Self::Unbounded);
        }

        u32::try_from(raw).map(Self::Bounded).map_err(|e| {
            ConfigError::caused_by(
                "max_tries_with_delay",
                format!("expected {UNBOUNDED_TRIES} or a count between 0 and {}, got {raw}", u32::MAX),
                e,
            )
        })
    }

    /// Returns the integer form of this bound, [`UNBOUNDED_TRIES`] for [`MaxTries::Unbounded`].
    #[must_use]
    pub fn as_raw(self) -> i64 {
        match self {
            Self::Bounded(tries) => i64::from(tries),
            Self::Unbounded => UNBOUNDED_TRIES,
        }
    }

    /// Returns `true` for [`MaxTries::Unbounded`].
    #[must_use]
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Returns `true` when `attempted` delayed retries leave no room for another one.
    pub(crate) fn is_exhausted_by(self, attempted: u64) -> bool {
        match self {
            Self::Bounded(max) => attempted >= u64::from(max),
            Self::Unbounded => false,
        }
    }
}

impl From<u32> for MaxTries {
    fn from(value: u32) -> Self {
        Self::Bounded(value)
    }
}

impl TryFrom<i64> for MaxTries {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl Display for MaxTries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounded(tries) => tries.fmt(f),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}
