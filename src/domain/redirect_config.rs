//! Operator redirect configuration

use crate::domain::constants::WELL_KNOWN_SOURCE_ADDRESS;
use crate::domain::types::{InvalidTargetAddress, TargetAddress};
use serde::{Deserialize, Serialize};

/// Where intercepted prover calls should go.
///
/// Read fresh on every intercepted call; a saved change applies to the next
/// request without reinstalling hooks. An empty target means "no redirect".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectConfig {
    #[serde(default, alias = "proverAddress")]
    pub target_address: String,
}

impl RedirectConfig {
    pub fn new(target_address: impl Into<String>) -> Self {
        Self {
            target_address: target_address.into(),
        }
    }

    /// The address calls are sent to, with empty input meaning the source
    pub fn effective_target(&self) -> &str {
        self.effective_target_for(WELL_KNOWN_SOURCE_ADDRESS)
    }

    pub fn effective_target_for<'a>(&'a self, source: &'a str) -> &'a str {
        if self.target_address.trim().is_empty() {
            source
        } else {
            &self.target_address
        }
    }

    /// True when no redirection is configured
    pub fn is_passthrough(&self) -> bool {
        self.is_passthrough_for(WELL_KNOWN_SOURCE_ADDRESS)
    }

    pub fn is_passthrough_for(&self, source: &str) -> bool {
        self.effective_target_for(source) == source
    }

    pub fn target(&self) -> Result<TargetAddress, InvalidTargetAddress> {
        TargetAddress::parse(self.effective_target())
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self::new(WELL_KNOWN_SOURCE_ADDRESS)
    }
}
