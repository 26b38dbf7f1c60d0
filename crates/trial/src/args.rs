// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Display;
use std::time::Duration;

/// The phase a retry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The retry yields to the executor and does not sleep.
    Yield,

    /// The retry sleeps for the current delay first.
    Delay,
}

impl Phase {
    /// Returns the lowercase name of the phase, as used in telemetry.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yield => "yield",
            Self::Delay => "delay",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments for the [`on_retry`][crate::Trial::on_retry] callback function.
///
/// Provides context for retry notifications. The callback runs after an unsuccessful attempt,
/// right before the trial yields or sleeps.
#[derive(Debug)]
pub struct OnRetryArgs {
    pub(crate) phase: Phase,
    pub(crate) retry_delay: Duration,
}

impl OnRetryArgs {
    /// Returns the phase of the upcoming retry.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the wait before the upcoming retry; [`Duration::ZERO`] in the yield phase.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}
