// ABOUTME: Integration tests for the optimization poller.
// ABOUTME: Check counts, fixed interval, cancellation, and fatal status errors.

mod support;

use hoist::deploy::{CancelReason, CancelSignal, DeployError, DeployErrorKind, Optimizer};
use proptest::prelude::*;
use std::time::Duration;
use support::{FakePlatform, Journal};

const IMAGE: &str = "registry.test/app-name:deployment-1";

#[tokio::test(start_paused = true)]
async fn done_on_first_check_never_waits() {
    let journal = Journal::default();
    let platform = FakePlatform::new(&journal);
    let optimizer = Optimizer::new(&platform);

    let started = tokio::time::Instant::now();
    optimizer
        .run(&support::app(), IMAGE, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(journal.count("optimization_status"), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn custom_interval_is_used_between_checks() {
    let journal = Journal::default();
    let platform = FakePlatform::new(&journal).in_progress_times(3);
    let optimizer = Optimizer::new(&platform).with_interval(Duration::from_millis(250));

    let started = tokio::time::Instant::now();
    optimizer
        .run(&support::app(), IMAGE, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(journal.count("optimization_status"), 4);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(750), "waited {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(800), "waited {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_wait_returns_cancelled() {
    let journal = Journal::default();
    let platform = FakePlatform::new(&journal).in_progress_times(100);
    let optimizer = Optimizer::new(&platform);
    let cancel = CancelSignal::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        trigger.cancel();
    });

    let err = optimizer
        .run(&support::app(), IMAGE, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Cancelled(CancelReason::Interrupted)));
    // checks at 0s, 1s, 2s; cancelled during the third wait
    assert_eq!(journal.count("optimization_status"), 3);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_first_check_returns_makes_at_most_one_check() {
    let journal = Journal::default();
    let platform = FakePlatform::new(&journal)
        .in_progress_times(100)
        .with_status_delay(Duration::from_secs(10));
    let optimizer = Optimizer::new(&platform);
    let cancel = CancelSignal::with_timeout(Duration::from_secs(1));

    let err = optimizer
        .run(&support::app(), IMAGE, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Cancelled);
    assert!(matches!(
        err,
        DeployError::Cancelled(CancelReason::DeadlineExceeded)
    ));
    assert!(journal.count("optimization_status") <= 1);
}

#[tokio::test]
async fn already_cancelled_signal_short_circuits() {
    let journal = Journal::default();
    let platform = FakePlatform::new(&journal).in_progress_times(100);
    let optimizer = Optimizer::new(&platform);
    let cancel = CancelSignal::new();
    cancel.cancel();

    let err = optimizer
        .run(&support::app(), IMAGE, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Cancelled);
    assert!(journal.count("optimization_status") <= 1);
}

#[tokio::test(start_paused = true)]
async fn status_error_is_fatal_and_not_retried() {
    let journal = Journal::default();
    let platform = FakePlatform::new(&journal).failing_status();
    let optimizer = Optimizer::new(&platform);

    let err = optimizer
        .run(&support::app(), IMAGE, &CancelSignal::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Optimization);
    assert_eq!(journal.count("optimization_status"), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_status_counts_as_done() {
    let journal = Journal::default();
    let platform = FakePlatform::new(&journal).with_statuses([
        hoist::platform::OptimizationStatus::InProgress,
        hoist::platform::OptimizationStatus::from("skipped"),
    ]);
    let optimizer = Optimizer::new(&platform);

    optimizer
        .run(&support::app(), IMAGE, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(journal.count("optimization_status"), 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// N in_progress answers followed by done take exactly N+1 checks.
    #[test]
    fn n_in_progress_then_done_takes_n_plus_one_checks(n in 0usize..20) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let journal = Journal::default();
        let platform = FakePlatform::new(&journal).in_progress_times(n);

        let elapsed = runtime.block_on(async {
            let started = tokio::time::Instant::now();
            Optimizer::new(&platform)
                .run(&support::app(), IMAGE, &CancelSignal::new())
                .await
                .unwrap();
            started.elapsed()
        });

        prop_assert_eq!(journal.count("optimization_status"), n + 1);
        let expected = Duration::from_secs(n as u64);
        prop_assert!(elapsed >= expected);
        prop_assert!(elapsed < expected + Duration::from_millis(100));
    }
}
