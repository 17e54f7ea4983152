//! Errors surfaced to the original caller of an intercepted request

use crate::domain::InvalidTargetAddress;
use crate::interception::ports::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Failures of the redirection path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RedirectError {
    #[error("malformed target address '{address}': {reason}")]
    MalformedTarget { address: String, reason: String },

    #[error("relay to {target} failed: {cause}")]
    Relay { target: String, cause: String },

    #[error("relay to {target} timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },
}

impl RedirectError {
    pub(crate) fn from_transport(target: &str, error: TransportError) -> Self {
        match error {
            TransportError::Network { cause } => Self::Relay {
                target: target.to_string(),
                cause,
            },
            TransportError::Timeout(timeout) => Self::Timeout {
                target: target.to_string(),
                timeout,
            },
        }
    }
}

impl From<InvalidTargetAddress> for RedirectError {
    fn from(value: InvalidTargetAddress) -> Self {
        Self::MalformedTarget {
            address: value.address,
            reason: value.reason,
        }
    }
}

/// Error type shared by both host request APIs.
///
/// A failed redirect is reported through the same channel as a failed native
/// request so the host's own error handling sees it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostRequestError {
    #[error("request failed: {0}")]
    Host(String),

    #[error("request state error: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Redirect(#[from] RedirectError),
}
