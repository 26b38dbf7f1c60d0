// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Polls a background job until it reports completion, logging every retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tick::Clock;
use trial::{ConfigError, Strategy, Trial};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let clock = Clock::new_tokio();

    // The job needs a few polls before it is done.
    let progress = Arc::new(AtomicU32::new(0));
    let progress_clone = Arc::clone(&progress);

    let strategy = Strategy::builder()
        .delay_between_tries(Duration::from_millis(20))
        .delay_threshold(Duration::from_millis(160))
        .tries_until_delay_increase(2)
        .max_tries_with_delay(12)
        .build()?;

    let mut trial = Trial::new(
        &clock,
        strategy,
        move || progress_clone.fetch_add(25, Ordering::SeqCst) + 25,
        |percent: &u32| *percent >= 100,
    )
    .name("job_status");

    let stopwatch = clock.stopwatch();
    match trial.execute().await {
        Some(percent) => println!(
            "job finished at {percent}% after {}ms ({} yielding, {} delayed tries)",
            stopwatch.elapsed().as_millis(),
            trial.attempted_tries_with_yield(),
            trial.attempted_tries_with_delay(),
        ),
        None => println!(
            "job did not finish, last delay {}ms",
            trial.current_delay_between_tries().as_millis()
        ),
    }

    Ok(())
}
