// # IP Source Trait
//
// Defines the interface for discovering the caller's public IPv4 address.
//
// ## Implementations
//
// - HTTP check service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("Public address: {}", current_ip);
//
//     Ok(())
// }
// ```

use crate::address::Ipv4Address;
use async_trait::async_trait;

/// Trait for IP source implementations
///
/// # Contract
///
/// - `current()` performs exactly one read-only lookup per call
/// - A body that fails the dotted-quad check is reported as
///   [`crate::Error::MalformedResponse`]
/// - Transport failures, timeouts and non-2xx answers are reported as
///   [`crate::Error::Network`]
/// - Implementations hold no view of the last known address; change
///   detection belongs to `DdnsEngine`
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Ask for the current public address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Address)`: A validated address
    /// - `Err(Error)`: `MalformedResponse` or `Network`
    async fn current(&self) -> Result<Ipv4Address, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
