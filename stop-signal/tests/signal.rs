#![cfg(feature = "test-utils")]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use stop_signal::StopSignal;
use stop_signal::test_utils::wait::TimedSignal;
use stop_signal::test_utils::waiters::WaiterGroup;
use stop_signal_telemetry::tracing::init_test_tracing;
use tokio::time::{Instant, sleep, timeout};

const RELEASE_BOUND: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread")]
async fn three_waiters_are_released_by_a_single_trigger() {
    init_test_tracing();

    let signal = StopSignal::with_name("scenario");
    assert!(!signal.is_triggered());

    let waiters = WaiterGroup::spawn(&signal, 3);
    assert_eq!(waiters.len(), 3);
    assert!(!waiters.is_empty());

    sleep(Duration::from_millis(50)).await;
    assert_eq!(waiters.released(), 0);

    assert!(signal.trigger());
    assert_eq!(waiters.join_within(RELEASE_BOUND).await, 3);
    assert!(signal.is_triggered());

    // A second trigger is a no-op and leaves the state unchanged.
    assert!(!signal.trigger());
    assert!(signal.is_triggered());
}

#[tokio::test(flavor = "multi_thread")]
async fn no_wakeup_is_lost_for_many_waiters() {
    init_test_tracing();

    let signal = StopSignal::new();
    let waiters = WaiterGroup::spawn(&signal, 256);

    TimedSignal::new(signal.clone())
        .assert_pending_for(Duration::from_millis(50))
        .await;
    assert_eq!(waiters.released(), 0);

    signal.trigger();

    assert_eq!(waiters.join_within(RELEASE_BOUND).await, 256);
}

#[tokio::test(flavor = "multi_thread")]
async fn late_waiters_return_immediately() {
    init_test_tracing();

    let signal = StopSignal::new();
    signal.trigger();

    let started = Instant::now();
    let waiters = WaiterGroup::spawn(&signal, 16);
    assert_eq!(
        waiters.join_within(Duration::from_millis(500)).await,
        16
    );
    assert!(started.elapsed() < Duration::from_millis(500));

    timeout(Duration::from_millis(100), signal.wait())
        .await
        .expect("wait after trigger must not block");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_trigger_race_releases_exactly_once() {
    init_test_tracing();

    let signal = StopSignal::new();
    let waiters = WaiterGroup::spawn(&signal, 32);
    let releases = Arc::new(AtomicUsize::new(0));

    let triggers: Vec<_> = (0..200)
        .map(|_| {
            let signal = signal.clone();
            let releases = releases.clone();
            tokio::spawn(async move {
                if signal.trigger() {
                    releases.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for trigger in triggers {
        trigger.await.unwrap();
    }

    assert_eq!(releases.load(Ordering::SeqCst), 1);
    assert!(signal.is_triggered());
    assert_eq!(waiters.join_within(RELEASE_BOUND).await, 32);
}

#[test]
fn concurrent_trigger_race_across_threads() {
    init_test_tracing();

    let signal = StopSignal::new();
    let releases = Arc::new(AtomicUsize::new(0));

    let threads: Vec<_> = (0..128)
        .map(|_| {
            let signal = signal.clone();
            let releases = releases.clone();
            std::thread::spawn(move || {
                if signal.trigger() {
                    releases.fetch_add(1, Ordering::SeqCst);
                }
                signal.blocking_wait();
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(releases.load(Ordering::SeqCst), 1);
    assert!(signal.is_triggered());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn is_triggered_never_goes_back_to_false() {
    init_test_tracing();

    let signal = StopSignal::new();
    let done = Arc::new(AtomicBool::new(false));

    let observers: Vec<_> = (0..4)
        .map(|_| {
            let signal = signal.clone();
            let done = done.clone();
            tokio::spawn(async move {
                let mut seen_triggered = false;
                while !done.load(Ordering::SeqCst) {
                    let triggered = signal.is_triggered();
                    assert!(
                        !(seen_triggered && !triggered),
                        "is_triggered went from true to false"
                    );
                    seen_triggered |= triggered;
                    tokio::task::yield_now().await;
                }

                assert!(signal.is_triggered());
            })
        })
        .collect();

    sleep(Duration::from_millis(20)).await;
    signal.trigger();
    sleep(Duration::from_millis(20)).await;
    done.store(true, Ordering::SeqCst);

    for observer in observers {
        observer.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn any_worker_can_trigger_the_signal() {
    init_test_tracing();

    let signal = StopSignal::with_name("workers");
    let waiters = WaiterGroup::spawn(&signal, 8);

    // One worker decides everybody should exit.
    let deciding_worker = tokio::spawn({
        let signal = signal.clone();
        async move {
            sleep(Duration::from_millis(10)).await;
            signal.trigger()
        }
    });

    let timed = TimedSignal::new(signal.clone());
    timed.stopped().await;
    assert!(timed.inner().is_triggered());

    assert!(deciding_worker.await.unwrap());
    assert_eq!(waiters.join_within(RELEASE_BOUND).await, 8);
}

#[tokio::test]
async fn empty_waiter_group_joins_immediately() {
    init_test_tracing();

    let signal = StopSignal::new();
    let waiters = WaiterGroup::spawn(&signal, 0);

    assert!(waiters.is_empty());
    assert_eq!(waiters.join_within(RELEASE_BOUND).await, 0);
    assert!(!signal.is_triggered());
}
