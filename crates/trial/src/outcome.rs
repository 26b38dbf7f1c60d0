// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// How a single [`Trial`][crate::Trial] invocation ended.
///
/// Both variants carry the value returned by the last call of the operation; an exhausted trial
/// keeps it for diagnostics only.
///
/// # Examples
///
/// ```
/// use trial::Outcome;
///
/// let success = Outcome::Success(3);
/// assert!(success.is_success());
/// assert_eq!(success.into_success(), Some(3));
///
/// let exhausted = Outcome::Exhausted(2);
/// assert_eq!(exhausted.last_value(), &2);
/// assert_eq!(exhausted.into_success(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    /// The success predicate accepted the value.
    Success(T),

    /// The delayed phase ran out of tries; the value is the last one rejected by the predicate.
    Exhausted(T),
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the value of the last attempt, successful or not.
    #[must_use]
    pub fn last_value(&self) -> &T {
        match self {
            Self::Success(value) | Self::Exhausted(value) => value,
        }
    }

    /// Returns the value of the last attempt, successful or not.
    #[must_use]
    pub fn into_last_value(self) -> T {
        match self {
            Self::Success(value) | Self::Exhausted(value) => value,
        }
    }

    /// Returns the successful value, or `None` when the trial was exhausted.
    #[must_use]
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Exhausted(_) => None,
        }
    }
}

impl<T> From<Outcome<T>> for Option<T> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_success()
    }
}
