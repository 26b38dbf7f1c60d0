// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Retry an operation until its result is good enough, with deterministic, saturating backoff.
//!
//! A [`Trial`] repeatedly calls an operation and checks each result with a success predicate.
//! Retries go through two phases:
//!
//! - **Fast phase**: one retry that merely yields to the executor. Results that settle almost
//!   immediately are picked up without arming a timer.
//! - **Delayed phase**: retries that wait first. The wait starts at
//!   [`Strategy::delay_between_tries`], doubles every
//!   [`Strategy::tries_until_delay_increase`] retries and never exceeds
//!   [`Strategy::delay_threshold`].
//!
//! The delayed phase is either bounded by [`Strategy::max_tries_with_delay`] or unbounded. A
//! bounded trial that runs out of tries returns `None`; this is a regular outcome, not an error.
//! There is no jitter: the same strategy always produces the same sequence of waits.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! use tick::Clock;
//! use trial::{Strategy, Trial};
//!
//! # async fn example(clock: &Clock) -> Result<(), trial::ConfigError> {
//! let strategy = Strategy::builder()
//!     .delay_between_tries_millis(5)
//!     .delay_threshold_millis(200)
//!     .tries_until_delay_increase(2)
//!     .max_tries_with_delay(10)
//!     .build()?;
//!
//! let ready = Arc::new(AtomicBool::new(false));
//! let ready_clone = Arc::clone(&ready);
//!
//! let mut trial = Trial::new(clock, strategy, move || ready_clone.load(Ordering::Acquire), |ready: &bool| *ready);
//!
//! match trial.execute().await {
//!     Some(_) => println!("ready after {} delayed tries", trial.attempted_tries_with_delay()),
//!     None => println!("gave up, last delay {:?}", trial.current_delay_between_tries()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! > **Note**: The waits of the delayed phase use [`Clock`][tick::Clock] from the [`tick`] crate.
//! > In tests, a clock from `tick::ClockControl` with auto-advancing timers makes every wait
//! > complete instantly.
//!
//! # Configuration
//!
//! A [`Strategy`] is built with [`Strategy::builder`], which validates all options at once and
//! fails with [`ConfigError`] on invalid input. With the `serde` feature, [`StrategyConfig`]
//! provides a serializable form that uses milliseconds and the [`constants::UNBOUNDED_TRIES`]
//! sentinel (`-1`).
//!
//! # Features
//!
//! - `serde`: Enables `StrategyConfig` and serde support for [`MaxTries`].
//! - `logs`: Emits `trial.retry` (debug) and `trial.exhausted` (warn) events through `tracing`.

pub mod constants;

mod args;
mod callbacks;
#[cfg(any(feature = "serde", test))]
mod config;
mod define_fn_wrapper;
mod error;
mod escalation;
mod max_tries;
mod outcome;
mod strategy;
mod telemetry;
mod trial;
mod yielding;

pub use args::{OnRetryArgs, Phase};
#[cfg(any(feature = "serde", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use config::StrategyConfig;
pub use error::{ConfigError, Result};
pub use max_tries::MaxTries;
pub use outcome::Outcome;
pub use strategy::{Strategy, StrategyBuilder};
pub use trial::Trial;
