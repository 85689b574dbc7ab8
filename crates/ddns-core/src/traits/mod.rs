//! Core traits for the DDNS system
//!
//! This module defines the two network capabilities the engine depends on.
//!
//! - [`IpSource`]: Report the caller's current public IPv4 address
//! - [`DnsProvider`]: Replace the managed DNS record with a new address

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::DnsProvider;
pub use ip_source::IpSource;
