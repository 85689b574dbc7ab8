//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Asking the IpSource for the current address once per cycle
//! - Comparing it with the last known address
//! - Updating the DNS record via DnsProvider when it changed
//! - Committing the new address only after the provider confirmed
//! - Sleeping for the poll interval, then starting over
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────────────────────────────────┐
//!            │                                          │
//!            ▼                                          │
//!       ┌─────────┐  current()  ┌─────────────┐         │
//!       │  Idle   │────────────▶│  Checking   │         │
//!       └─────────┘             └─────────────┘         │
//!            ▲                    │         │           │
//!            │   failed/unchanged │         │ changed   │
//!            │◀───────────────────┘         ▼           │
//!            │                       ┌─────────────┐    │
//!            │◀──────────────────────│  Updating   │    │
//!            │   ok: commit / err    └─────────────┘    │
//!            │                                          │
//!            └──────────── sleep(interval) ─────────────┘
//! ```
//!
//! ## Cycle Rules
//!
//! 1. A cycle starts immediately on `run()`, then once per interval
//! 2. A failed check is logged; no update is attempted
//! 3. An address equal to the last known one is a no-op
//! 4. A different address (always the case on the first successful check)
//!    triggers exactly one update
//! 5. On update success the address is committed as last known
//! 6. On update failure nothing is committed, so the next cycle sees the
//!    same "change" and tries again
//! 7. The sleep happens exactly once per cycle, after all of the cycle's
//!    network work has settled; cycles never overlap
//!
//! The engine is driven by a single task. `last_ip` is a plain field behind
//! `&mut self` and needs no lock.

use crate::address::Ipv4Address;
use crate::config::DdnsConfig;
use crate::error::Error;
use crate::traits::{DnsProvider, IpSource};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

/// Where the engine is within a poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// Waiting for the next timer fire
    #[default]
    Idle,
    /// IP source call outstanding
    Checking,
    /// DNS provider call outstanding
    Updating,
}

/// What a single poll cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The IP source failed (malformed body or network error)
    CheckFailed,

    /// The observed address equals the last known one; no update issued
    Unchanged(Ipv4Address),

    /// The record was updated and the address committed
    Updated {
        /// Last known address before this cycle
        previous: Option<Ipv4Address>,
        /// The newly committed address
        current: Ipv4Address,
    },

    /// The provider rejected the update; last known address kept
    UpdateFailed {
        /// The address that failed to apply
        candidate: Ipv4Address,
    },
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`] (or [`DdnsEngine::run_until()`])
/// 3. The loop runs until the process ends or the shutdown future resolves
///
/// The last known address lives only in memory and starts as unknown on
/// every process start.
pub struct DdnsEngine {
    /// IP source for checking the public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for updating the record
    provider: Box<dyn DnsProvider>,

    /// Delay between cycles
    interval: Duration,

    /// Provider only logs updates (`DRY_RUN`)
    dry_run: bool,

    /// Last address the provider confirmed
    last_ip: Option<Ipv4Address>,

    /// Current position within the cycle
    state: PollState,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Validated configuration (interval and dry-run flag are used here)
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: &DdnsConfig,
    ) -> Self {
        Self {
            ip_source,
            provider,
            interval: config.interval,
            dry_run: config.dry_run,
            last_ip: None,
            state: PollState::Idle,
        }
    }

    /// Last address the provider confirmed, `None` until the first success
    pub fn last_known_ip(&self) -> Option<Ipv4Address> {
        self.last_ip
    }

    /// Current position within the cycle
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Configured delay between cycles
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether updates are only logged by the provider
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run the poll loop forever
    pub async fn run(&mut self) {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run the poll loop until `shutdown` resolves
    ///
    /// The shutdown future is only a way to leave the loop; it does not
    /// wait for or cancel in-flight network calls gracefully.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting poll loop (source={}, provider={}, interval={:?})",
            self.ip_source.source_name(),
            self.provider.provider_name(),
            self.interval
        );

        tokio::select! {
            _ = self.poll_forever() => {}
            _ = shutdown => {
                info!("Shutdown signal received, poll loop stopped");
            }
        }

        self.state = PollState::Idle;
    }

    async fn poll_forever(&mut self) {
        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run exactly one poll cycle without sleeping afterwards
    ///
    /// Never fails: every error is logged and folded into the outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = PollState::Checking;
        debug!("Checking IP address...");

        let observed = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                self.log_check_failure(&e);
                self.state = PollState::Idle;
                return CycleOutcome::CheckFailed;
            }
        };

        if self.last_ip == Some(observed) {
            debug!("IP address unchanged: {}", observed);
            self.state = PollState::Idle;
            return CycleOutcome::Unchanged(observed);
        }

        let previous = self.last_ip;
        info!(
            "IP address has changed from {} to {}",
            previous.map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".to_string()),
            observed
        );

        self.state = PollState::Updating;
        let outcome = match self.provider.update_record(observed).await {
            Ok(()) => {
                self.last_ip = Some(observed);
                info!("{}", updated_message(observed, self.dry_run));
                CycleOutcome::Updated {
                    previous,
                    current: observed,
                }
            }
            Err(e) => {
                error!("Failed to update DNS record to {}: {}", observed, e);
                CycleOutcome::UpdateFailed { candidate: observed }
            }
        };

        self.state = PollState::Idle;
        outcome
    }

    fn log_check_failure(&self, err: &Error) {
        match err {
            Error::MalformedResponse(_) => {
                error!("Received malformed response from IP address check: {}", err);
            }
            _ => {
                error!("Failed to determine IP address: {}", err);
            }
        }
    }
}

fn updated_message(ip: Ipv4Address, dry_run: bool) -> String {
    if dry_run {
        format!("[DRY-RUN] DNS record has been updated to {}", ip)
    } else {
        format!("DNS record has been updated to {}", ip)
    }
}
