// # HTTP IP Source
//
// This crate provides the IP source used by the poll loop: a plain-text
// "what is my IP" service such as `https://checkip.amazonaws.com/`.
//
// ## Behavior
//
// - One GET per `current()` call, bounded by the configured timeout
// - Non-2xx answers, transport errors and timeouts → `Error::Network`
// - The body is trimmed and must be a dotted-quad IPv4 address,
//   otherwise → `Error::MalformedResponse`
// - No caching: change detection is owned by `DdnsEngine`

use async_trait::async_trait;
use ddns_core::traits::IpSource;
use ddns_core::{DdnsConfig, Error, Ipv4Address, Result};
use std::time::Duration;

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client (carries the timeout)
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://checkip.amazonaws.com/")
    /// - `timeout`: Upper bound for the whole request
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from the updater configuration (`CHECK_IP_URL`, `TIMEOUT`)
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(config.check_ip_url.clone(), config.timeout)
    }

    /// The URL being queried
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw response body
    async fn fetch_body(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| network_error("Request failed", e))?;

        let response = response
            .error_for_status()
            .map_err(|e| network_error("IP check service error", e))?;

        response
            .text()
            .await
            .map_err(|e| network_error("Failed to read response", e))
    }
}

fn network_error(context: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::network(format!("{}: timed out ({})", context, err))
    } else {
        Error::network(format!("{}: {}", context, err))
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Address> {
        tracing::trace!("Fetching IP address from {}", self.url);
        let body = self.fetch_body().await?;
        Ipv4Address::parse(&body)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
