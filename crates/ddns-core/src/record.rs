//! DNS record payload
//!
//! A [`DnsRecord`] is built fresh for every update call and serialized as the
//! JSON body of the provider request.

use crate::address::Ipv4Address;
use serde::Serialize;

/// The record body sent to the provider
///
/// Field order matches the wire form:
/// `{"type":"A","name":..,"value":..,"zone_id":..,"ttl":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    /// Record type, always `A`
    #[serde(rename = "type")]
    pub record_type: &'static str,
    /// Record name (e.g. "home.example.com")
    pub name: String,
    /// The address the record should resolve to
    pub value: Ipv4Address,
    /// Provider zone identifier
    pub zone_id: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl DnsRecord {
    /// Build an `A` record
    pub fn a(
        name: impl Into<String>,
        value: Ipv4Address,
        zone_id: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            record_type: "A",
            name: name.into(),
            value,
            zone_id: zone_id.into(),
            ttl,
        }
    }
}
