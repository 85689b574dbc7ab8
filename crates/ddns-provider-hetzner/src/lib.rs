// # Hetzner DNS Provider
//
// This crate provides the Hetzner DNS provider implementation for the DDNS
// updater.
//
// ## Behavior
//
// - ✅ Exactly one PUT per engine update, replacing the configured record
// - ✅ HTTP timeout from configuration (`TIMEOUT`)
// - ✅ Specific error messages for HTTP status codes (401/403, 404, 422, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (the next poll cycle is the retry)
// - ❌ NO record lookup: the record identifier is configured up front
// - ❌ NO caching of the applied address (owned by DdnsEngine)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Hetzner DNS API v1: https://dns.hetzner.com/api-docs
// - Update Record: PUT `/records/:record_id`
//   with header `Auth-API-Token: <token>` and body
//   `{"type":"A","name":..,"value":..,"zone_id":..,"ttl":..}`

use async_trait::async_trait;
use ddns_core::traits::DnsProvider;
use ddns_core::{DdnsConfig, DnsRecord, Error, Ipv4Address, Result};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Header carrying the API token
pub const AUTH_HEADER: &str = "Auth-API-Token";

const PROVIDER: &str = "hetzner";

/// Hetzner DNS provider
///
/// Stateless and single-shot. Holds the one record it manages.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Build the PUT request exactly as in live mode
/// - Log the intended URL and payload
/// - **NOT** send it, and report success
#[derive(Clone)]
pub struct HetznerProvider {
    /// Hetzner DNS API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Full URL of the managed record (`{api_url}/records/{record_id}`)
    record_url: String,

    /// Zone the record belongs to
    zone_id: String,

    /// Record name (e.g. "home.example.com")
    record_name: String,

    /// TTL written with every update
    ttl: u32,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, log the PUT instead of sending it
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for HetznerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HetznerProvider")
            .field("api_token", &"<REDACTED>")
            .field("record_url", &self.record_url)
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .field("ttl", &self.ttl)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl HetznerProvider {
    /// Create a new Hetzner provider
    ///
    /// # Parameters
    ///
    /// - `api_url`: API root, with or without trailing slash
    /// - `api_token`: Hetzner DNS API token
    /// - `record_id`, `zone_id`, `record_name`, `ttl`: The managed record
    /// - `timeout`: Upper bound for each request
    ///
    /// # Security
    ///
    /// The API token will NEVER be logged or displayed in error messages.
    pub fn new(
        api_url: &str,
        api_token: impl Into<String>,
        record_id: &str,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
        ttl: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Hetzner API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            record_url: join_record_url(api_url, record_id),
            zone_id: zone_id.into(),
            record_name: record_name.into(),
            ttl,
            client,
            dry_run: false,
        })
    }

    /// Create from the updater configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        let provider = Self::new(
            &config.api_url,
            config.api_token.clone(),
            &config.record_id,
            config.zone_id.clone(),
            config.record_name.clone(),
            config.ttl,
            config.timeout,
        )?;

        if config.dry_run {
            tracing::warn!("Hetzner provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(provider.with_dry_run(config.dry_run))
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// URL of the managed record
    pub fn record_url(&self) -> &str {
        &self.record_url
    }

    /// The record body for `ip`
    pub fn record_for(&self, ip: Ipv4Address) -> DnsRecord {
        DnsRecord::a(self.record_name.clone(), ip, self.zone_id.clone(), self.ttl)
    }

    /// Build the PUT request for `ip` without sending it
    ///
    /// ```http
    /// PUT /records/:record_id
    /// Content-Type: application/json
    /// Auth-API-Token: <token>
    ///
    /// {"type":"A","name":"home.example.com","value":"1.2.3.4","zone_id":"..","ttl":60}
    /// ```
    pub fn build_request(&self, ip: Ipv4Address) -> Result<reqwest::Request> {
        self.client
            .put(&self.record_url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTH_HEADER, &self.api_token)
            .json(&self.record_for(ip))
            .build()
            .map_err(|e| Error::update(PROVIDER, format!("Failed to build request: {}", e)))
    }
}

fn join_record_url(api_url: &str, record_id: &str) -> String {
    format!("{}/records/{}", api_url.trim_end_matches('/'), record_id)
}

/// Map a non-2xx status to an update failure
fn status_error(status: reqwest::StatusCode, body: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
            status
        ),
        404 => format!("DNS record not found. Status: {}", status),
        422 => format!("Record rejected by API: {} - {}", status, body),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!("Hetzner server error (transient): {} - {}", status, body),
        _ => format!("Failed to update record: {} - {}", status, body),
    };
    Error::update(PROVIDER, message)
}

#[async_trait]
impl DnsProvider for HetznerProvider {
    /// Replace the managed record with `new_ip`
    ///
    /// Any 2xx is success. Everything else, including transport errors and
    /// timeouts, is `Error::Update`.
    async fn update_record(&self, new_ip: Ipv4Address) -> Result<()> {
        let request = self.build_request(new_ip)?;

        tracing::debug!(
            "Updating Hetzner DNS record: {} -> {} [mode: {}]",
            self.record_name,
            new_ip,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        if self.dry_run {
            let payload = serde_json::to_string(&self.record_for(new_ip))
                .unwrap_or_else(|e| format!("<unserializable: {}>", e));
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                self.record_url,
                payload
            );
            return Ok(());
        }

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                Error::update(PROVIDER, format!("HTTP request timed out: {}", e))
            } else {
                Error::update(PROVIDER, format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, &error_text));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
