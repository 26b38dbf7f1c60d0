// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;
use std::mem;

/// Accumulates elements until a threshold over their combined measure is reached.
///
/// Every element pushed into the aggregator is measured, and the measure is added to a running
/// total. As soon as `is_complete(total)` returns `true` the pending elements, including the one
/// just pushed, are handed out as a batch and the aggregator starts over with an empty batch and
/// a zero total.
///
/// The total saturates at [`u64::MAX`] instead of overflowing.
///
/// # Examples
///
/// Batches of strings that together hold at least 8 bytes:
///
/// ```
/// use aggregator::Aggregator;
///
/// let mut aggregator = Aggregator::new(|s: &&str| s.len() as u64, |bytes| bytes >= 8);
///
/// assert_eq!(aggregator.push("abc"), None);
/// assert_eq!(aggregator.push("defg"), None);
/// assert_eq!(aggregator.push("hi"), Some(vec!["abc", "defg", "hi"]));
/// assert_eq!(aggregator.push("jk"), None);
/// assert_eq!(aggregator.flush(), Some(vec!["jk"]));
/// ```
///
/// Since [`push`][Self::push] returns an `Option`, an aggregator can act as the mapping
/// function of an iterator:
///
/// ```
/// use aggregator::Aggregator;
///
/// let mut aggregator = Aggregator::new(|n: &u64| *n, |sum| sum >= 10);
/// let batches: Vec<Vec<u64>> = (1..=10).filter_map(|n| aggregator.push(n)).collect();
///
/// assert_eq!(batches, vec![vec![1, 2, 3, 4], vec![5, 6], vec![7, 8], vec![9, 10]]);
/// ```
pub struct Aggregator<T, M, P> {
    measure: M,
    is_complete: P,
    batch: Vec<T>,
    accumulated: u64,
}

impl<T, M, P> Aggregator<T, M, P>
where
    M: FnMut(&T) -> u64,
    P: FnMut(u64) -> bool,
{
    /// Creates an aggregator that measures elements with `measure` and completes a batch once
    /// `is_complete` accepts the accumulated measure.
    #[must_use]
    pub fn new(measure: M, is_complete: P) -> Self {
        Self {
            measure,
            is_complete,
            batch: Vec::new(),
            accumulated: 0,
        }
    }

    /// Adds `item` to the pending batch.
    ///
    /// Returns `None` while the batch is still accumulating and `Some` with the complete batch
    /// when the threshold is reached.
    pub fn push(&mut self, item: T) -> Option<Vec<T>> {
        self.accumulated = self.accumulated.saturating_add((self.measure)(&item));
        self.batch.push(item);

        if (self.is_complete)(self.accumulated) {
            return Some(self.take_batch());
        }

        None
    }

    /// Hands out the pending elements even though the threshold was not reached.
    ///
    /// Returns `None` when nothing is pending. Call this once the input is exhausted to avoid
    /// losing the trailing elements.
    pub fn flush(&mut self) -> Option<Vec<T>> {
        if self.batch.is_empty() {
            return None;
        }

        Some(self.take_batch())
    }

    fn take_batch(&mut self) -> Vec<T> {
        self.accumulated = 0;
        mem::take(&mut self.batch)
    }
}

impl<T, M, P> Aggregator<T, M, P> {
    /// The accumulated measure of the pending elements.
    #[must_use]
    pub fn accumulated(&self) -> u64 {
        self.accumulated
    }

    /// The elements of the batch being accumulated.
    #[must_use]
    pub fn pending(&self) -> &[T] {
        &self.batch
    }
}

impl<T: Debug, M, P> Debug for Aggregator<T, M, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("batch", &self.batch)
            .field("accumulated", &self.accumulated)
            .finish_non_exhaustive()
    }
}
