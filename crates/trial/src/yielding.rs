// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::pin::Pin;
use std::task::{Context, Poll};

/// Suspension point of a fast-phase retry.
///
/// A value rejected by the success predicate is often about to change, for example when another
/// task is finishing the work the operation polls. Instead of arming a timer, the fast phase
/// reschedules the trial behind whatever is already queued on the executor and calls the
/// operation again right after. Whether other tasks actually run in between is up to the
/// executor.
#[derive(Debug)]
pub(crate) enum FastPhaseYield {
    Pending,
    Rescheduled,
}

impl FastPhaseYield {
    pub(crate) const fn new() -> Self {
        Self::Pending
    }
}

impl Future for FastPhaseYield {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match *self {
            Self::Rescheduled => Poll::Ready(()),
            Self::Pending => {
                // Wake right away so the trial is queued again without any timer.
                *self = Self::Rescheduled;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }
}
