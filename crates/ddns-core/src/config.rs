//! Configuration types for the DDNS system
//!
//! The configuration is read once at startup from environment variables and
//! is immutable afterwards. Anything missing or unusable is reported as
//! [`Error::Config`] before the poll loop starts.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default IP check service
pub const DEFAULT_CHECK_IP_URL: &str = "https://checkip.amazonaws.com/";

/// Default DNS API root (Hetzner DNS v1)
pub const DEFAULT_API_URL: &str = "https://dns.hetzner.com/api/v1/";

/// Default poll interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10_000);

/// Default record TTL in seconds
pub const DEFAULT_TTL: u32 = 60;

/// Default timeout for each HTTP call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Keys that must be present and non-empty
const REQUIRED_KEYS: [&str; 4] = ["API_TOKEN", "ZONE_ID", "RECORD_NAME", "RECORD_ID"];

/// Main DDNS configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS API token
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Provider zone identifier
    pub zone_id: String,

    /// DNS record name (e.g. "home.example.com")
    pub record_name: String,

    /// Provider record identifier
    pub record_id: String,

    /// URL of the plain-text "what is my IP" service
    #[serde(default = "default_check_ip_url")]
    pub check_ip_url: String,

    /// DNS API root
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Delay between the end of one poll cycle and the start of the next
    #[serde(default = "default_interval", with = "millis")]
    pub interval: Duration,

    /// TTL written to the record
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Timeout bounding each HTTP call (check and update)
    #[serde(default = "default_timeout", with = "millis")]
    pub timeout: Duration,

    /// Log the update request instead of sending it
    #[serde(default)]
    pub dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .field("record_id", &self.record_id)
            .field("check_ip_url", &self.check_ip_url)
            .field("api_url", &self.api_url)
            .field("interval", &self.interval)
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DdnsConfig {
    /// Create a configuration with defaults for everything optional
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            record_name: record_name.into(),
            record_id: record_id.into(),
            check_ip_url: default_check_ip_url(),
            api_url: default_api_url(),
            interval: DEFAULT_INTERVAL,
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
            dry_run: false,
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as absent. The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        for key in REQUIRED_KEYS {
            if get(key).is_none() {
                return Err(Error::config(format!(
                    "Missing required environment variable: {}",
                    key
                )));
            }
        }

        let mut config = Self::new(
            get("API_TOKEN").unwrap_or_default(),
            get("ZONE_ID").unwrap_or_default(),
            get("RECORD_NAME").unwrap_or_default(),
            get("RECORD_ID").unwrap_or_default(),
        );

        if let Some(url) = get("CHECK_IP_URL") {
            config.check_ip_url = url;
        }
        if let Some(url) = get("API_URL") {
            config.api_url = url;
        }
        if let Some(value) = get("INTERVAL") {
            config.interval = Duration::from_millis(parse_number("INTERVAL", &value)?);
        }
        if let Some(value) = get("TTL") {
            config.ttl = parse_number("TTL", &value)?;
        }
        if let Some(value) = get("TIMEOUT") {
            config.timeout = Duration::from_millis(parse_number("TIMEOUT", &value)?);
        }
        if let Some(value) = get("DRY_RUN") {
            config.dry_run = parse_flag("DRY_RUN", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("API_TOKEN", &self.api_token),
            ("ZONE_ID", &self.zone_id),
            ("RECORD_NAME", &self.record_name),
            ("RECORD_ID", &self.record_id),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{} cannot be empty", key)));
            }
        }

        validate_url("CHECK_IP_URL", &self.check_ip_url)?;
        validate_url("API_URL", &self.api_url)?;

        if self.interval.is_zero() {
            return Err(Error::config("INTERVAL must be > 0"));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("TIMEOUT must be > 0"));
        }

        Ok(())
    }
}

fn validate_url(key: &str, url: &str) -> Result<()> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            key, url
        )));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::config(format!(
            "{} must be a non-negative integer. Got: {}",
            key, value
        ))
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!(
            "{} must be true or false. Got: {}",
            key, value
        ))),
    }
}

fn default_check_ip_url() -> String {
    DEFAULT_CHECK_IP_URL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_interval() -> Duration {
    DEFAULT_INTERVAL
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// Durations are written as integer milliseconds, matching `INTERVAL`/`TIMEOUT`
mod millis {
    use serde::{Deserialize, Deserializer, Serializer, ser};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis())
            .map_err(|_| <S::Error as ser::Error>::custom(format!("duration {:?} does not fit in u64 milliseconds", value)))?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
