//! Source endpoint matching

use crate::domain::constants::WELL_KNOWN_SOURCE_ADDRESS;
use std::borrow::Cow;

/// Decides whether an outgoing call targets the well-known source endpoint.
///
/// Exact, case-sensitive string equality: no trailing-slash, query or case
/// normalisation. Callers must pass the literal canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMatcher {
    source: Cow<'static, str>,
}

impl EndpointMatcher {
    pub fn new(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        url == self.source
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for EndpointMatcher {
    fn default() -> Self {
        Self::new(WELL_KNOWN_SOURCE_ADDRESS)
    }
}
