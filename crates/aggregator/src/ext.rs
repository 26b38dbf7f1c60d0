// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;
use std::iter::FusedIterator;

use crate::Aggregator;

/// Extension trait that groups the elements of an iterator into batches.
pub trait AggregateExt: Iterator + Sized {
    /// Groups the elements into batches whose combined measure satisfies `is_complete`.
    ///
    /// Complete batches are yielded as soon as they are reached. When the underlying iterator
    /// ends, the remaining elements are yielded as a final, possibly incomplete batch.
    ///
    /// # Examples
    ///
    /// ```
    /// use aggregator::AggregateExt;
    ///
    /// let batches: Vec<Vec<u32>> = [4, 4, 4, 1, 1].into_iter().aggregate(|n| u64::from(*n), |sum| sum >= 8).collect();
    ///
    /// assert_eq!(batches, vec![vec![4, 4], vec![4, 1, 1]]);
    /// ```
    fn aggregate<M, P>(self, measure: M, is_complete: P) -> Aggregate<Self, M, P>
    where
        M: FnMut(&Self::Item) -> u64,
        P: FnMut(u64) -> bool,
    {
        Aggregate {
            iter: self,
            aggregator: Aggregator::new(measure, is_complete),
            done: false,
        }
    }
}

impl<I: Iterator> AggregateExt for I {}

/// Iterator returned by [`AggregateExt::aggregate`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Aggregate<I: Iterator, M, P> {
    iter: I,
    aggregator: Aggregator<I::Item, M, P>,
    done: bool,
}

impl<I, M, P> Iterator for Aggregate<I, M, P>
where
    I: Iterator,
    M: FnMut(&I::Item) -> u64,
    P: FnMut(u64) -> bool,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for item in self.iter.by_ref() {
            if let Some(batch) = self.aggregator.push(item) {
                return Some(batch);
            }
        }

        self.done = true;
        self.aggregator.flush()
    }
}

impl<I, M, P> FusedIterator for Aggregate<I, M, P>
where
    I: Iterator,
    M: FnMut(&I::Item) -> u64,
    P: FnMut(u64) -> bool,
{
}

impl<I, M, P> Debug for Aggregate<I, M, P>
where
    I: Iterator + Debug,
    I::Item: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregate")
            .field("iter", &self.iter)
            .field("aggregator", &self.aggregator)
            .field("done", &self.done)
            .finish()
    }
}
