//! Validated IPv4 address value
//!
//! The check service speaks plain text, so every observed address enters the
//! system through [`Ipv4Address::parse`]. The grammar is the dotted quad
//! `[0-9]{1,3}(\.[0-9]{1,3}){3}`; on top of that each octet must fit in a
//! `u8`, so `999.999.999.999` is rejected even though it is syntactically
//! dotted.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$")
        .expect("dotted quad pattern is valid")
});

/// An IPv4 address that passed the dotted-quad check
///
/// Equality is by value; two independently parsed responses with the same
/// text compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Ipv4Address(Ipv4Addr);

impl Ipv4Address {
    /// Validate a response body
    ///
    /// Surrounding whitespace is trimmed first. Anything else that does not
    /// match the grammar yields [`Error::MalformedResponse`] carrying the
    /// untrimmed body.
    pub fn parse(body: &str) -> Result<Self> {
        let caps = DOTTED_QUAD
            .captures(body.trim())
            .ok_or_else(|| Error::malformed(body))?;

        let mut octets = [0u8; 4];
        for (slot, group) in octets.iter_mut().zip(caps.iter().skip(1)) {
            let text = group.map(|m| m.as_str()).unwrap_or_default();
            *slot = text.parse().map_err(|_| Error::malformed(body))?;
        }

        Ok(Self(Ipv4Addr::from(octets)))
    }

    /// The underlying std address
    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }
}

impl From<Ipv4Address> for String {
    fn from(addr: Ipv4Address) -> Self {
        addr.to_string()
    }
}

impl TryFrom<String> for Ipv4Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
