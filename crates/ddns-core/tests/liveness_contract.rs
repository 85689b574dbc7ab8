//! Contract Test: Poll Loop Liveness
//!
//! These tests run on a paused tokio clock so intervals are exact.
//!
//! Constraints verified:
//! - The first check happens immediately on start
//! - Exactly one sleep per cycle, whatever the outcome
//! - Failures of either call never stall the loop
//! - Cycles never overlap: the next check waits for a slow update to settle
//!
//! If this test fails, the loop can stall or pile up concurrent polls.

mod common;

use common::*;
use ddns_core::{DdnsEngine, Error, PollState};
use std::time::Duration;
use tokio::time::{Instant, sleep};

const INTERVAL: Duration = Duration::from_secs(10);

fn engine_with(source: &ScriptedIpSource, provider: &RecordingProvider) -> DdnsEngine {
    DdnsEngine::new(
        Box::new(source.clone()),
        Box::new(provider.clone()),
        &minimal_config(INTERVAL),
    )
}

fn assert_spacing(times: &[Instant], at_least: Duration) {
    for pair in times.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            gap >= at_least && gap < at_least + Duration::from_millis(5),
            "Expected cycles {:?} apart, got {:?}",
            at_least,
            gap
        );
    }
}

#[tokio::test(start_paused = true)]
async fn polls_immediately_then_once_per_interval() {
    let source = ScriptedIpSource::fixed(ip("192.0.2.1"));
    let provider = RecordingProvider::new();
    let mut engine = engine_with(&source, &provider);

    engine
        .run_until(sleep(INTERVAL * 3 + Duration::from_millis(1)))
        .await;

    // Cycles at t=0, 10s, 20s, 30s
    assert_eq!(source.call_count(), 4);
    assert_spacing(&source.call_times(), INTERVAL);
    assert_eq!(provider.update_count(), 1);
    assert_eq!(engine.state(), PollState::Idle);
}

#[tokio::test(start_paused = true)]
async fn check_failures_do_not_stall_the_loop() {
    let source = ScriptedIpSource::new(vec![Err(Error::network("timed out"))]);
    let provider = RecordingProvider::new();
    let mut engine = engine_with(&source, &provider);

    engine
        .run_until(sleep(INTERVAL * 3 + Duration::from_millis(1)))
        .await;

    assert_eq!(source.call_count(), 4);
    assert_spacing(&source.call_times(), INTERVAL);
    assert_eq!(provider.update_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn update_failures_do_not_stall_the_loop() {
    let source = ScriptedIpSource::fixed(ip("192.0.2.1"));
    let provider = RecordingProvider::failing(100);
    let mut engine = engine_with(&source, &provider);

    engine
        .run_until(sleep(INTERVAL * 3 + Duration::from_millis(1)))
        .await;

    assert_eq!(source.call_count(), 4);
    assert_eq!(provider.update_count(), 4, "One retry per cycle, no more");
    assert_eq!(engine.last_known_ip(), None);
}

#[tokio::test(start_paused = true)]
async fn slow_update_delays_next_cycle_instead_of_overlapping() {
    let slow = Duration::from_secs(25);
    let source = ScriptedIpSource::new(vec![
        Ok(ip("192.0.2.1")),
        Ok(ip("192.0.2.2")),
        Ok(ip("192.0.2.1")),
    ]);
    let provider = RecordingProvider::new().with_delay(slow);
    let mut engine = engine_with(&source, &provider);

    // Cycles at t=0, 35s, 70s (update 25s + interval 10s each)
    engine
        .run_until(sleep((slow + INTERVAL) * 2 + Duration::from_millis(1)))
        .await;

    assert_eq!(source.call_count(), 3);
    assert_spacing(&source.call_times(), slow + INTERVAL);
    assert_eq!(provider.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_first_sleep_ends_after_one_check() {
    let source = ScriptedIpSource::fixed(ip("192.0.2.1"));
    let provider = RecordingProvider::new();
    let mut engine = engine_with(&source, &provider);

    engine.run_until(sleep(Duration::from_millis(1))).await;

    assert_eq!(source.call_count(), 1);
    assert_eq!(engine.last_known_ip(), Some(ip("192.0.2.1")));
}
