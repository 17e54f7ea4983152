//! Newtypes for values that cross the interception boundary
//!
//! These keep raw strings out of the core: a target address is always a
//! parsed absolute URL, a user agent is never empty.

use derive_more::Display;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Ambient user agent sent on relays and probes
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 1000),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct UserAgent(String);

/// Correlation id for one intercepted call, used only in logs
#[nutype(derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize, AsRef))]
pub struct CallId(Uuid);

impl CallId {
    /// Create a fresh time-ordered id
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Raised when an operator-supplied address is not an absolute http(s) URL
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid target address '{address}': {reason}")]
pub struct InvalidTargetAddress {
    pub address: String,
    pub reason: String,
}

/// A parsed, absolute `http`/`https` URL with a host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetAddress(Url);

impl TargetAddress {
    pub fn parse(raw: &str) -> Result<Self, InvalidTargetAddress> {
        let invalid = |reason: String| InvalidTargetAddress {
            address: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Same scheme, host, port and query, with the path swapped out
    pub fn with_path(&self, path: &str) -> Url {
        let mut url = self.0.clone();
        url.set_path(path);
        url
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TargetAddress> for Url {
    fn from(value: TargetAddress) -> Self {
        value.0
    }
}

/// Severity of an operator notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[display("info")]
    Info,
    #[display("success")]
    Success,
    #[display("error")]
    Error,
}
