// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// A [`Strategy`][crate::Strategy] option holds a value that violates its invariants.
///
/// Configuration errors are raised while building a strategy and are never retried; the
/// configuration has to be fixed by the caller. Running out of attempts is not an error and
/// is reported through the result of [`Trial::execute`][crate::Trial::execute] instead.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use trial::Strategy;
///
/// let error = Strategy::builder()
///     .delay_between_tries(Duration::from_millis(10))
///     .delay_threshold(Duration::from_millis(5))
///     .build()
///     .unwrap_err();
///
/// assert_eq!(error.field(), "delay_threshold");
/// ```
#[ohno::error]
#[display("invalid strategy option '{field}': {reason}")]
pub struct ConfigError {
    field: &'static str,
    reason: String,
}

impl ConfigError {
    /// Name of the offending option.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Why the value was rejected.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A specialized [`Result`] type for trial configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
