// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::time::Duration;

use tick::Clock;

use crate::callbacks::{IsSuccess, OnRetry, Operation};
use crate::constants::{DEFAULT_TRIAL_NAME, FAST_PHASE_TRIES};
use crate::escalation::Escalation;
use crate::telemetry::{emit_exhausted, emit_retry};
use crate::yielding::FastPhaseYield;
use crate::{OnRetryArgs, Outcome, Phase, Strategy};

/// Repeatedly calls an operation until its result satisfies a success predicate.
///
/// A trial is bound to one operation, one success predicate and one [`Strategy`]. Every call to
/// [`execute`][Self::execute] starts from scratch and runs through two phases:
///
/// 1. **Fast phase**: a single retry that only yields to the executor, for results that are
///    expected to settle almost immediately.
/// 2. **Delayed phase**: retries that first wait for the current delay. The delay starts at
///    [`Strategy::delay_between_tries`], doubles after every
///    [`Strategy::tries_until_delay_increase`] delayed retries and saturates at
///    [`Strategy::delay_threshold`].
///
/// The trial gives up once [`Strategy::max_tries_with_delay`] delayed retries were made. Giving
/// up is not an error: [`execute`][Self::execute] returns `None`.
///
/// # Diagnostics
///
/// After an invocation returns, [`attempted_tries_with_yield`][Self::attempted_tries_with_yield],
/// [`attempted_tries_with_delay`][Self::attempted_tries_with_delay] and
/// [`current_delay_between_tries`][Self::current_delay_between_tries] describe how much work was
/// spent. The first call of the operation is not a retry and is never counted. When the delayed
/// phase is unbounded the counters are never incremented, so they cannot overflow.
///
/// # Concurrency
///
/// The counters belong to the trial; [`execute`][Self::execute] takes `&mut self`, so a single
/// trial cannot run concurrent invocations. Clone the trial to get an independent engine for
/// another call site; clones share the operation and predicate but not the counters.
///
/// # Cancellation
///
/// Dropping the future returned by [`execute`][Self::execute] aborts the invocation without a
/// result. The counters keep the progress made up to that point until the next invocation
/// resets them.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// use tick::Clock;
/// use trial::{Strategy, Trial};
///
/// # async fn example(clock: &Clock) -> Result<(), trial::ConfigError> {
/// let strategy = Strategy::builder()
///     .delay_between_tries_millis(10)
///     .delay_threshold_millis(100)
///     .max_tries_with_delay(5)
///     .build()?;
///
/// let polls = Arc::new(AtomicU32::new(0));
/// let polls_clone = Arc::clone(&polls);
///
/// let mut trial = Trial::new(
///     clock,
///     strategy,
///     move || polls_clone.fetch_add(1, Ordering::SeqCst) + 1,
///     |polls: &u32| *polls >= 3,
/// );
///
/// assert_eq!(trial.execute().await, Some(3));
/// assert_eq!(trial.attempted_tries_with_yield() + trial.attempted_tries_with_delay(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Trial<T> {
    name: Cow<'static, str>,
    clock: Clock,
    strategy: Strategy,
    operation: Operation<T>,
    is_success: IsSuccess<T>,
    on_retry: Option<OnRetry<T>>,
    attempted_tries_with_yield: u64,
    attempted_tries_with_delay: u64,
    current_delay_between_tries: Duration,
}

impl<T> Clone for Trial<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            clock: self.clock.clone(),
            strategy: self.strategy,
            operation: self.operation.clone(),
            is_success: self.is_success.clone(),
            on_retry: self.on_retry.clone(),
            attempted_tries_with_yield: 0,
            attempted_tries_with_delay: 0,
            current_delay_between_tries: self.strategy.delay_between_tries(),
        }
    }
}

impl<T> Trial<T> {
    /// Binds `strategy`, `operation` and `is_success` into a reusable trial.
    ///
    /// The `clock` drives the waits of the delayed phase.
    #[must_use]
    pub fn new(
        clock: &Clock,
        strategy: Strategy,
        operation: impl Fn() -> T + Send + Sync + 'static,
        is_success: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Cow::Borrowed(DEFAULT_TRIAL_NAME),
            clock: clock.clone(),
            strategy,
            operation: Operation::new(operation),
            is_success: IsSuccess::new(is_success),
            on_retry: None,
            attempted_tries_with_yield: 0,
            attempted_tries_with_delay: 0,
            current_delay_between_tries: strategy.delay_between_tries(),
        }
    }

    /// Sets the name reported in log events. Use `snake_case`.
    ///
    /// **Default**: `trial`
    #[must_use]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked with the rejected value right before every retry.
    #[must_use]
    pub fn on_retry(mut self, on_retry: impl Fn(&T, OnRetryArgs) + Send + Sync + 'static) -> Self {
        self.on_retry = Some(OnRetry::new(on_retry));
        self
    }

    /// Returns the strategy this trial was bound to.
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Number of fast-phase retries made by the last invocation.
    #[must_use]
    pub fn attempted_tries_with_yield(&self) -> u64 {
        self.attempted_tries_with_yield
    }

    /// Number of delayed-phase retries made by the last invocation.
    #[must_use]
    pub fn attempted_tries_with_delay(&self) -> u64 {
        self.attempted_tries_with_delay
    }

    /// The delay applied to the last delayed retry, or the one the next delayed retry would
    /// use. Never exceeds [`Strategy::delay_threshold`].
    #[must_use]
    pub fn current_delay_between_tries(&self) -> Duration {
        self.current_delay_between_tries
    }

    /// Runs the operation until it succeeds or the delayed phase is exhausted.
    ///
    /// Returns the successful value, or `None` when the trial gave up. Use
    /// [`execute_detailed`][Self::execute_detailed] to also see the last rejected value.
    pub async fn execute(&mut self) -> Option<T> {
        self.execute_detailed().await.into_success()
    }

    /// Runs the operation until it succeeds or the delayed phase is exhausted, keeping the value
    /// of the last attempt either way.
    #[cfg_attr(test, mutants::skip)] // mutating the exhaustion check causes infinite loops
    pub async fn execute_detailed(&mut self) -> Outcome<T> {
        self.reset();

        let max_tries = self.strategy.max_tries_with_delay();
        let mut escalation = Escalation::new(self.strategy.tries_until_delay_increase(), self.strategy.delay_threshold());
        let mut fast_tries = 0;
        let mut value = self.operation.call();

        loop {
            if self.is_success.call(&value) {
                return Outcome::Success(value);
            }

            if fast_tries < FAST_PHASE_TRIES {
                fast_tries += 1;
                if !max_tries.is_unbounded() {
                    self.attempted_tries_with_yield += 1;
                }

                self.notify_retry(&value, Phase::Yield, Duration::ZERO);
                FastPhaseYield::new().await;
            } else {
                if max_tries.is_exhausted_by(self.attempted_tries_with_delay) {
                    emit_exhausted(
                        &self.name,
                        self.attempted_tries_with_yield,
                        self.attempted_tries_with_delay,
                        self.current_delay_between_tries,
                    );
                    return Outcome::Exhausted(value);
                }

                if !max_tries.is_unbounded() {
                    self.attempted_tries_with_delay += 1;
                }

                let delay = self.current_delay_between_tries;
                self.notify_retry(&value, Phase::Delay, delay);
                self.clock.delay(delay).await;
                self.current_delay_between_tries = escalation.record(delay);
            }

            value = self.operation.call();
        }
    }

    fn reset(&mut self) {
        self.attempted_tries_with_yield = 0;
        self.attempted_tries_with_delay = 0;
        self.current_delay_between_tries = self.strategy.delay_between_tries();
    }

    fn notify_retry(&self, value: &T, phase: Phase, retry_delay: Duration) {
        emit_retry(
            &self.name,
            phase,
            retry_delay,
            self.attempted_tries_with_yield,
            self.attempted_tries_with_delay,
        );

        if let Some(on_retry) = &self.on_retry {
            on_retry.call(value, OnRetryArgs { phase, retry_delay });
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use tick::ClockControl;

    use super::*;
    use crate::MaxTries;

    fn counting_trial(clock: &Clock, strategy: Strategy, succeed_at: u32) -> (Trial<u32>, Arc<AtomicU32>) {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);
        let trial = Trial::new(
            clock,
            strategy,
            move || counter_clone.fetch_add(1, Ordering::SeqCst) + 1,
            move |value: &u32| *value == succeed_at,
        );

        (trial, counter)
    }

    fn auto_clock() -> Clock {
        ClockControl::new().auto_advance_timers(true).to_clock()
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(Trial<u32>: Send, Sync, Clone, std::fmt::Debug);
    }

    #[tokio::test]
    async fn first_success_counts_nothing() {
        let clock = Clock::new_frozen();
        let (mut trial, counter) = counting_trial(&clock, Strategy::default(), 1);

        assert_eq!(trial.execute().await, Some(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(trial.attempted_tries_with_yield(), 0);
        assert_eq!(trial.attempted_tries_with_delay(), 0);
        assert_eq!(trial.current_delay_between_tries(), Duration::from_millis(1));
    }

    #[tokio::test]
    async fn fast_phase_does_not_sleep() {
        // A frozen clock never fires timers, so reaching the second call proves no delay was armed.
        let clock = Clock::new_frozen();
        let strategy = Strategy::builder().max_tries_with_delay(3).build().unwrap();
        let (mut trial, counter) = counting_trial(&clock, strategy, 2);

        assert_eq!(trial.execute().await, Some(2));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(trial.attempted_tries_with_yield(), 1);
        assert_eq!(trial.attempted_tries_with_delay(), 0);
    }

    #[tokio::test]
    async fn zero_delayed_tries_only_uses_fast_phase() {
        let clock = Clock::new_frozen();
        let strategy = Strategy::builder().max_tries_with_delay(0).build().unwrap();
        let (mut trial, counter) = counting_trial(&clock, strategy, u32::MAX);

        let outcome = trial.execute_detailed().await;

        assert_eq!(outcome, Outcome::Exhausted(2));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(trial.attempted_tries_with_yield(), u64::from(FAST_PHASE_TRIES));
        assert_eq!(trial.attempted_tries_with_delay(), 0);
    }

    #[tokio::test]
    async fn exhausted_keeps_last_value() {
        let clock = auto_clock();
        let strategy = Strategy::builder().max_tries_with_delay(3).build().unwrap();
        let (mut trial, _counter) = counting_trial(&clock, strategy, u32::MAX);

        let outcome = trial.execute_detailed().await;

        assert_eq!(outcome, Outcome::Exhausted(5));
        assert_eq!(trial.attempted_tries_with_yield(), 1);
        assert_eq!(trial.attempted_tries_with_delay(), 3);
    }

    #[tokio::test]
    async fn delays_escalate_and_saturate() {
        let clock = auto_clock();
        let strategy = Strategy::builder()
            .delay_between_tries_millis(1)
            .delay_threshold_millis(4)
            .tries_until_delay_increase(2)
            .max_tries_with_delay(8)
            .build()
            .unwrap();

        let delays = Arc::new(Mutex::new(Vec::new()));
        let delays_clone = Arc::clone(&delays);
        let (trial, _counter) = counting_trial(&clock, strategy, u32::MAX);
        let mut trial = trial.on_retry(move |_, args| {
            if args.phase() == Phase::Delay {
                delays_clone.lock().unwrap().push(args.retry_delay().as_millis());
            }
        });

        assert_eq!(trial.execute().await, None);
        assert_eq!(*delays.lock().unwrap(), vec![1, 1, 2, 2, 4, 4, 4, 4]);
        assert_eq!(trial.current_delay_between_tries(), Duration::from_millis(4));
    }

    #[tokio::test]
    async fn on_retry_sees_rejected_values_and_phases() {
        let clock = auto_clock();
        let strategy = Strategy::builder().max_tries_with_delay(2).build().unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let (trial, _counter) = counting_trial(&clock, strategy, 3);
        let mut trial = trial.on_retry(move |value, args| seen_clone.lock().unwrap().push((*value, args.phase())));

        assert_eq!(trial.execute().await, Some(3));
        assert_eq!(*seen.lock().unwrap(), vec![(1, Phase::Yield), (2, Phase::Delay)]);
    }

    #[tokio::test]
    async fn unbounded_never_counts() {
        let clock = auto_clock();
        let strategy = Strategy::builder()
            .delay_between_tries_millis(1)
            .delay_threshold_millis(8)
            .build()
            .unwrap();
        assert_eq!(strategy.max_tries_with_delay(), MaxTries::Unbounded);

        let (mut trial, counter) = counting_trial(&clock, strategy, 50);

        assert_eq!(trial.execute().await, Some(50));
        assert_eq!(counter.load(Ordering::SeqCst), 50);
        assert_eq!(trial.attempted_tries_with_yield(), 0);
        assert_eq!(trial.attempted_tries_with_delay(), 0);
        assert_eq!(trial.current_delay_between_tries(), Duration::from_millis(8));
    }

    #[tokio::test]
    async fn zero_delay_strategy_never_waits() {
        let clock = Clock::new_frozen();
        let strategy = Strategy::builder()
            .delay_between_tries(Duration::ZERO)
            .delay_threshold(Duration::ZERO)
            .max_tries_with_delay(10)
            .build()
            .unwrap();
        let (mut trial, _counter) = counting_trial(&clock, strategy, 6);

        assert_eq!(trial.execute().await, Some(6));
        assert_eq!(trial.attempted_tries_with_delay(), 4);
        assert_eq!(trial.current_delay_between_tries(), Duration::ZERO);
    }

    #[tokio::test]
    async fn clone_starts_with_fresh_counters() {
        let clock = auto_clock();
        let strategy = Strategy::builder().max_tries_with_delay(4).build().unwrap();
        let (mut trial, counter) = counting_trial(&clock, strategy, u32::MAX);

        assert_eq!(trial.execute().await, None);
        assert_eq!(trial.attempted_tries_with_delay(), 4);

        let clone = trial.clone();
        assert_eq!(clone.attempted_tries_with_yield(), 0);
        assert_eq!(clone.attempted_tries_with_delay(), 0);
        assert_eq!(clone.current_delay_between_tries(), strategy.delay_between_tries());

        // the operation is shared
        counter.store(0, Ordering::SeqCst);
        let mut clone = clone;
        assert_eq!(clone.execute().await, None);
        assert_eq!(counter.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn dropped_invocation_is_reset_by_next_one() {
        let control = ClockControl::new();
        let clock = control.to_clock();
        let strategy = Strategy::builder()
            .delay_between_tries_millis(10)
            .delay_threshold_millis(10)
            .max_tries_with_delay(3)
            .build()
            .unwrap();
        let (mut trial, counter) = counting_trial(&clock, strategy, 2);

        {
            // start past the success point so the invocation keeps retrying
            counter.store(10, Ordering::SeqCst);
            let future = trial.execute();
            futures::pin_mut!(future);
            let waker = futures::task::noop_waker();
            let mut cx = std::task::Context::from_waker(&waker);

            // first poll yields, second poll arms the delay which never fires on a frozen clock
            assert!(future.as_mut().poll(&mut cx).is_pending());
            assert!(future.as_mut().poll(&mut cx).is_pending());
        }

        assert_eq!(trial.attempted_tries_with_yield(), 1);
        assert_eq!(trial.attempted_tries_with_delay(), 1);

        counter.store(0, Ordering::SeqCst);
        assert_eq!(trial.execute().await, Some(2));
        assert_eq!(trial.attempted_tries_with_yield(), 1);
        assert_eq!(trial.attempted_tries_with_delay(), 0);
    }

    #[test]
    fn name_defaults_and_overrides() {
        let clock = Clock::new_frozen();
        let (trial, _counter) = counting_trial(&clock, Strategy::default(), 1);
        assert_eq!(trial.name, "trial");

        let trial = trial.name("orders_ready");
        assert_eq!(trial.name, "orders_ready");
        assert_eq!(*trial.strategy(), Strategy::default());
    }
}
