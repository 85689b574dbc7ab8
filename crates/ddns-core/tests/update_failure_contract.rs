//! Contract Test: Update Failure Does Not Commit
//!
//! Constraints verified:
//! - A failed update leaves the last known address unchanged
//! - The next cycle observing the same address tries the update again
//! - The poll interval is the only retry mechanism (one call per cycle)
//!
//! If this test fails, the record can silently stay stale after a provider outage.

mod common;

use common::*;
use ddns_core::{CycleOutcome, DdnsEngine};
use std::time::Duration;

fn engine_with(source: &ScriptedIpSource, provider: &RecordingProvider) -> DdnsEngine {
    DdnsEngine::new(
        Box::new(source.clone()),
        Box::new(provider.clone()),
        &minimal_config(Duration::from_secs(10)),
    )
}

#[tokio::test]
async fn failed_update_does_not_commit() {
    let source = ScriptedIpSource::fixed(ip("198.51.100.7"));
    let provider = RecordingProvider::failing(1);
    let mut engine = engine_with(&source, &provider);

    let outcome = engine.run_cycle().await;

    assert_eq!(
        outcome,
        CycleOutcome::UpdateFailed {
            candidate: ip("198.51.100.7")
        }
    );
    assert_eq!(engine.last_known_ip(), None);
    assert_eq!(provider.update_count(), 1, "No retry within the cycle");
}

#[tokio::test]
async fn next_cycle_retries_same_address() {
    let source = ScriptedIpSource::new(vec![Ok(ip("192.0.2.1")), Ok(ip("192.0.2.2"))]);
    let provider = RecordingProvider::with_script(vec![
        Ok(()),
        Err(ddns_core::Error::update("recording", "500 Internal Server Error")),
        Ok(()),
    ]);
    let mut engine = engine_with(&source, &provider);

    engine.run_cycle().await;
    let failed = engine.run_cycle().await;
    assert_eq!(
        failed,
        CycleOutcome::UpdateFailed {
            candidate: ip("192.0.2.2")
        }
    );
    assert_eq!(engine.last_known_ip(), Some(ip("192.0.2.1")));

    let retried = engine.run_cycle().await;
    assert_eq!(
        retried,
        CycleOutcome::Updated {
            previous: Some(ip("192.0.2.1")),
            current: ip("192.0.2.2"),
        }
    );
    assert_eq!(
        provider.updates(),
        vec![ip("192.0.2.1"), ip("192.0.2.2"), ip("192.0.2.2")]
    );
}

#[tokio::test]
async fn persistent_failure_retries_every_cycle() {
    let source = ScriptedIpSource::fixed(ip("203.0.113.5"));
    let provider = RecordingProvider::failing(5);
    let mut engine = engine_with(&source, &provider);

    for _ in 0..5 {
        assert!(matches!(
            engine.run_cycle().await,
            CycleOutcome::UpdateFailed { .. }
        ));
    }

    assert_eq!(provider.update_count(), 5);
    assert_eq!(engine.last_known_ip(), None);

    // Provider recovers
    assert!(matches!(
        engine.run_cycle().await,
        CycleOutcome::Updated { .. }
    ));
    assert_eq!(engine.last_known_ip(), Some(ip("203.0.113.5")));
}
