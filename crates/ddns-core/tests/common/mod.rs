//! Test doubles and common utilities for poll loop contract tests
//!
//! The doubles are cheap to clone; clones share their scripts and counters,
//! so a test can hand one clone to the engine and inspect the other.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource};
use ddns_core::{DdnsConfig, Ipv4Address};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Parse an address literal for tests
pub fn ip(text: &str) -> Ipv4Address {
    Ipv4Address::parse(text).expect("test address is valid")
}

/// An IpSource that replays a script of results
///
/// Once the script runs out the last entry repeats forever.
#[derive(Clone)]
pub struct ScriptedIpSource {
    script: Arc<Mutex<VecDeque<Result<Ipv4Address>>>>,
    last: Arc<Mutex<Option<Result<Ipv4Address>>>>,
    calls: Arc<Mutex<Vec<Instant>>>,
}

impl ScriptedIpSource {
    pub fn new(script: Vec<Result<Ipv4Address>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A source that always reports the same address
    pub fn fixed(addr: Ipv4Address) -> Self {
        Self::new(vec![Ok(addr)])
    }

    /// Number of times current() was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Instants at which current() was called
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<Ipv4Address> {
        self.calls.lock().unwrap().push(Instant::now());

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(result) = next {
            *last = Some(result);
        }
        last.clone()
            .unwrap_or_else(|| Err(Error::network("script is empty")))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A DnsProvider that records every call and replays scripted results
///
/// Once the script runs out every call succeeds.
#[derive(Clone)]
pub struct RecordingProvider {
    script: Arc<Mutex<VecDeque<Result<()>>>>,
    updates: Arc<Mutex<Vec<Ipv4Address>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Duration,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    pub fn with_script(script: Vec<Result<()>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            updates: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    /// Make every call take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// A provider whose every call fails
    pub fn failing(times: usize) -> Self {
        Self::with_script(
            (0..times)
                .map(|_| Err(Error::update("recording", "503 Service Unavailable")))
                .collect(),
        )
    }

    /// Addresses passed to update_record(), in call order
    pub fn updates(&self) -> Vec<Ipv4Address> {
        self.updates.lock().unwrap().clone()
    }

    /// Number of times update_record() was called
    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Highest number of concurrently outstanding update calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn update_record(&self, new_ip: Ipv4Address) -> Result<()> {
        self.updates.lock().unwrap().push(new_ip);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(interval: Duration) -> DdnsConfig {
    let mut config = DdnsConfig::new("test-token", "zone-1", "home.example.com", "rec-1");
    config.interval = interval;
    config
}
