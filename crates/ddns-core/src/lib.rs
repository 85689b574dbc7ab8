// # ddns-core
//
// Core library for the polling DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping one DNS `A`
// record pointed at the caller's public IPv4 address:
// - **IpSource**: Trait for asking an external service for the current address
// - **DnsProvider**: Trait for replacing the DNS record via a provider API
// - **DdnsEngine**: The poll loop that owns the last known address and
//   orchestrates check → compare → update → sleep
// - **DdnsConfig**: Validated configuration, built once at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Network plumbing lives in the source/provider crates
// 2. **Single Owner**: The last known address belongs to the engine alone
// 3. **Non-Overlapping Cycles**: The next check is scheduled only after the
//    current cycle's network work has settled
// 4. **Self-Healing**: A failed update leaves the old address in place, so the
//    next cycle retries it

pub mod address;
pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use address::Ipv4Address;
pub use config::DdnsConfig;
pub use engine::{CycleOutcome, DdnsEngine, PollState};
pub use error::{Error, Result};
pub use record::DnsRecord;
pub use traits::{DnsProvider, IpSource};
