// # DNS Provider Trait
//
// Defines the interface for replacing the managed DNS record via a provider API.
//
// ## Implementations
//
// - Hetzner DNS: `ddns-provider-hetzner` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, Ipv4Address};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     provider.update_record(Ipv4Address::parse("192.0.2.1")?).await?;
//
//     Ok(())
// }
// ```

use crate::address::Ipv4Address;
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// The provider is configured with a single record (name, identifier, zone,
/// TTL) and knows how to overwrite its value.
///
/// # Contract
///
/// - **Single-shot**: one API call per invocation, no internal retry
/// - **Idempotent**: setting the same address twice leaves the record as-is
/// - **Stateless**: the provider never tracks which address was last applied;
///   the engine commits its state only after `Ok(())`
/// - **No re-validation**: the address was already accepted by the IP source
///
/// ## Examples
///
/// ✅ **CORRECT**: Report the failure and let the next poll retry
/// ```rust,ignore
/// async fn update_record(&self, ip: Ipv4Address) -> Result<()> {
///     let response = self.client.put(&self.url).json(&record).send().await
///         .map_err(|e| Error::update("example", e.to_string()))?;
///
///     if response.status().is_success() {
///         Ok(())
///     } else {
///         Err(Error::update("example", response.status().to_string()))
///     }
/// }
/// ```
///
/// ❌ **WRONG**: Looping until the provider answers. The poll interval is
/// the only retry interval.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Set the managed record to `new_ip`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider confirmed the update (any 2xx)
    /// - `Err(Error)`: `Update` on any failure
    async fn update_record(&self, new_ip: Ipv4Address) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "hetzner")
    fn provider_name(&self) -> &'static str;
}
