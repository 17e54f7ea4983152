//! Health probe results

use chrono::{DateTime, Utc};
use derive_more::Display;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Why a probe did not reach a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    #[display("network")]
    Network,
    #[display("timeout")]
    Timeout,
    #[display("malformed target")]
    MalformedTarget,
}

/// Outcome of one readiness probe.
///
/// `failure_kind` is only set when no HTTP response came back; a non-200
/// response is unsuccessful but carries its status code instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub succeeded: bool,
    pub status_code: Option<StatusCode>,
    pub excerpt: Option<String>,
    pub failure_kind: Option<FailureKind>,
    pub ready_url: Option<Url>,
    pub checked_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn responded(ready_url: Url, status: StatusCode, excerpt: String) -> Self {
        Self {
            succeeded: status == StatusCode::OK,
            status_code: Some(status),
            excerpt: Some(excerpt),
            failure_kind: None,
            ready_url: Some(ready_url),
            checked_at: Utc::now(),
        }
    }

    pub fn failed(kind: FailureKind, ready_url: Option<Url>) -> Self {
        Self {
            succeeded: false,
            status_code: None,
            excerpt: None,
            failure_kind: Some(kind),
            ready_url,
            checked_at: Utc::now(),
        }
    }
}

/// First `max_chars` characters of a body, never splitting a character
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
