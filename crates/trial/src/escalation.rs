// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::min;
use std::time::Duration;

/// Factor applied to the delay at the end of every escalation interval.
const ESCALATION_FACTOR: u32 = 2;

/// Tracks delayed tries within the current escalation interval and grows the delay once the
/// interval elapses.
///
/// The tracker only counts up to the interval length and then wraps, so it stays bounded even
/// when the trial retries forever.
#[derive(Debug, Clone)]
pub(crate) struct Escalation {
    interval: u32,
    elapsed: u32,
    threshold: Duration,
}

impl Escalation {
    pub fn new(interval: u32, threshold: Duration) -> Self {
        Self {
            interval: interval.max(1),
            elapsed: 0,
            threshold,
        }
    }

    /// Records one delayed try and returns the delay to use for the following one.
    pub fn record(&mut self, current: Duration) -> Duration {
        self.elapsed += 1;

        if self.elapsed < self.interval {
            return clamp_to_threshold(current, self.threshold);
        }

        self.elapsed = 0;
        escalate(current, self.threshold)
    }
}

/// Doubles `delay` and clamps the result to `threshold`.
///
/// Saturates instead of overflowing. As long as `delay <= threshold` the result is never smaller
/// than `delay`, so a delay that reached the threshold stays there.
pub(crate) fn escalate(delay: Duration, threshold: Duration) -> Duration {
    clamp_to_threshold(delay.saturating_mul(ESCALATION_FACTOR), threshold)
}

fn clamp_to_threshold(delay: Duration, threshold: Duration) -> Duration {
    min(delay, threshold)
}
