//! Log and notification message constants
//!
//! Every text the crate logs or shows to the operator lives here so the
//! wording stays consistent across the hooks, the prober and the binary.
//! Values that vary are attached as structured `tracing` fields rather than
//! formatted into the message.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting prover relay";
    pub const HOOKS_INSTALLED: &str = "Request hooks installed";
    pub const STARTUP_PROBE_SCHEDULED: &str = "Startup readiness probe scheduled";
    pub const CONFIG_SAVED: &str = "Redirect configuration saved";
    pub const CONFIG_SAVE_FAILED: &str = "Failed to save redirect configuration";
    pub const PROBE_TASK_FAILED: &str = "Readiness probe task did not complete";
    pub const FINISHED: &str = "Prover relay finished";
}

/// Configuration loading messages
pub mod configuration {
    pub const CONFIG_LOADED: &str = "Settings loaded successfully";
    pub const INVALID_USER_AGENT: &str = "Configured user agent is not a valid header value";
}

/// Decisions taken on intercepted calls
pub mod interception {
    pub const MATCHED: &str = "Call matched the proving endpoint";
    pub const PASSTHROUGH: &str = "No alternate target configured, passing call through";
    pub const RELAYING: &str = "Relaying call to alternate target";
    pub const RELAY_SUCCEEDED: &str = "Relay completed";
    pub const RELAY_FAILED: &str = "Relay failed";
    pub const MALFORMED_TARGET: &str = "Configured target address is malformed";
    pub const URL_SUBSTITUTED: &str = "Substituted target URL on open";
}

/// Hook installation messages
pub mod installer {
    pub const INSTALLED: &str = "Redirect hooks installed on both request APIs";
    pub const ALREADY_INSTALLED: &str = "Redirect hooks already installed, reusing them";
    pub const ALREADY_WRAPPED: &str = "Request API already carries a redirect hook";
    pub const UNINSTALLED: &str = "Redirect hooks removed, original APIs restored";
}

/// Readiness probe messages
pub mod probe {
    pub const SCHEDULED: &str = "Readiness probe scheduled";
    pub const SKIPPED_DEFAULT_TARGET: &str = "Default target configured, skipping readiness probe";
    pub const STARTING: &str = "Probing target readiness";
    pub const READY_URL_FAILED: &str = "Could not derive readiness URL from target";
    pub const READY: &str = "Target reported ready";
    pub const NOT_READY: &str = "Target readiness check returned non-200 status";
    pub const NETWORK_FAILURE: &str = "Readiness probe could not reach target";
    pub const TIMED_OUT: &str = "Readiness probe timed out";
}

/// Configuration store messages
pub mod store {
    pub const LOADED: &str = "Loaded stored redirect configuration";
    pub const MISSING: &str = "No stored redirect configuration, using defaults";
    pub const UNREADABLE: &str = "Stored redirect configuration unreadable, using defaults";
    pub const WRITTEN: &str = "Stored redirect configuration";
}

/// Privileged transport messages
pub mod transport {
    pub const SENDING: &str = "Sending privileged request";
    pub const RECEIVED: &str = "Privileged request completed";
    pub const FAILED: &str = "Privileged request failed";
}

/// Operator-facing notification texts
pub mod notifications {
    pub const MALFORMED_TARGET: &str = "Prover address format error, check configuration";
    pub const CONFIG_SAVED: &str = "Configuration saved";
    pub const SERVICE_UNAVAILABLE: &str = "Prover service unavailable, check configuration";
    pub const SERVICE_TIMEOUT: &str = "Prover service connection timed out";

    pub fn service_healthy(status: u16) -> String {
        format!("Prover service is running normally ({status})")
    }

    pub fn service_unhealthy(status: u16) -> String {
        format!("Prover service returned an error status ({status})")
    }
}
