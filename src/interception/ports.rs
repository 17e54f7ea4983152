//! Ports consumed by the interception core
//!
//! The core never reaches into ambient state. Configuration, operator
//! notifications and the cross-origin transport are injected through these
//! traits so the engine can run headless in tests.

use crate::domain::{RedirectConfig, Severity};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by configuration persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Source of the operator's redirect configuration.
///
/// `get` is a plain synchronous read with no caching; implementations fall
/// back to [`RedirectConfig::default`] when nothing is stored.
pub trait ConfigProvider: Send + Sync {
    fn get(&self) -> RedirectConfig;

    fn set(&self, config: RedirectConfig) -> Result<(), StoreError>;
}

/// Fire-and-forget operator notification side-channel
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// A request for the privileged transport
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    pub fn get(url: Url, headers: HeaderMap, timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            url,
            headers,
            body: None,
            timeout: Some(timeout),
        }
    }
}

/// Payload of a transport reply: text when the bytes are UTF-8, raw otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayBody {
    Text(String),
    Raw(Bytes),
}

impl RelayBody {
    pub fn from_bytes(bytes: Bytes) -> Self {
        match std::str::from_utf8(&bytes) {
            Ok(text) => Self::Text(text.to_string()),
            Err(_) => Self::Raw(bytes),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Raw(_) => None,
        }
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Text(text) => Bytes::from(text),
            Self::Raw(bytes) => bytes,
        }
    }
}

/// A completed transport exchange (the `onLoad` outcome)
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: RelayBody,
}

/// The `onError` and `onTimeout` outcomes
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failure: {cause}")]
    Network { cause: String },

    #[error("transport timed out after {0:?}")]
    Timeout(Duration),
}

/// Cross-origin capable HTTP transport.
///
/// Must reach origins other than the host's own and expose full response
/// headers and body. Reports exactly one outcome per request; the only
/// cancellation is the request's own timeout.
#[async_trait]
pub trait PrivilegedTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
