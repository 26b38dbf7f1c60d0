// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Group a stream of elements into batches by a measure of their size.
//!
//! An [`Aggregator`] measures every element it receives and adds the measure to a running
//! total. Once a predicate accepts the total, the pending elements are handed out as one batch
//! and accumulation starts over. Typical uses are chunking records by their encoded size or
//! collecting enough work items before dispatching them.
//!
//! For plain iterators, [`AggregateExt::aggregate`] does the same as an adapter and also yields
//! the trailing partial batch once the input ends.
//!
//! # Examples
//!
//! ```
//! use aggregator::{AggregateExt, Aggregator};
//!
//! // Push-based.
//! let mut aggregator = Aggregator::new(|line: &String| line.len() as u64, |bytes| bytes >= 10);
//! assert_eq!(aggregator.push("hello".to_string()), None);
//! assert_eq!(aggregator.push("world".to_string()), Some(vec!["hello".to_string(), "world".to_string()]));
//!
//! // Iterator-based.
//! let batches: Vec<Vec<u32>> = (1..=5).aggregate(|n| u64::from(*n), |sum| sum >= 6).collect();
//! assert_eq!(batches, vec![vec![1, 2, 3], vec![4, 5]]);
//! ```

mod aggregator;
mod ext;

pub use aggregator::Aggregator;
pub use ext::{Aggregate, AggregateExt};
