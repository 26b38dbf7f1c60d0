// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured log events emitted by [`Trial`][crate::Trial] when the `logs` feature is enabled.

use std::time::Duration;

use crate::Phase;

/// Event emitted before every retry.
#[cfg(any(feature = "logs", test))]
pub(crate) const RETRY_EVENT: &str = "trial.retry";

/// Event emitted when a bounded trial gives up.
#[cfg(any(feature = "logs", test))]
pub(crate) const EXHAUSTED_EVENT: &str = "trial.exhausted";

#[cfg_attr(
    not(any(feature = "logs", test)),
    expect(unused_variables, reason = "unused when logs feature not used")
)]
pub(crate) fn emit_retry(name: &str, phase: Phase, retry_delay: Duration, tries_with_yield: u64, tries_with_delay: u64) {
    #[cfg(any(feature = "logs", test))]
    tracing::event!(
        name: RETRY_EVENT,
        tracing::Level::DEBUG,
        trial.name = %name,
        trial.phase = %phase,
        trial.delay = retry_delay.as_secs_f32(),
        trial.tries_with_yield = tries_with_yield,
        trial.tries_with_delay = tries_with_delay,
    );
}

#[cfg_attr(
    not(any(feature = "logs", test)),
    expect(unused_variables, reason = "unused when logs feature not used")
)]
pub(crate) fn emit_exhausted(name: &str, tries_with_yield: u64, tries_with_delay: u64, current_delay: Duration) {
    #[cfg(any(feature = "logs", test))]
    tracing::event!(
        name: EXHAUSTED_EVENT,
        tracing::Level::WARN,
        trial.name = %name,
        trial.tries_with_yield = tries_with_yield,
        trial.tries_with_delay = tries_with_delay,
        trial.delay = current_delay.as_secs_f32(),
    );
}
