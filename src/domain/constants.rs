//! Well-known addresses and timing defaults

/// The single literal endpoint the host application calls for proving.
pub const WELL_KNOWN_SOURCE_ADDRESS: &str = "https://v7.charms.dev/spells/prove";

/// Path that replaces the target's path when building the readiness URL.
pub const HEALTH_PATH: &str = "/ready";

/// Delay before the first probe once hooks are installed.
pub const STARTUP_PROBE_DELAY_MS: u64 = 1000;

/// Delay before the probe that follows a configuration save.
pub const POST_SAVE_PROBE_DELAY_MS: u64 = 500;

/// Upper bound for a single readiness probe.
pub const PROBE_TIMEOUT_MS: u64 = 10_000;

/// Number of characters of the readiness body kept for diagnostics.
pub const PROBE_EXCERPT_CHARS: usize = 200;

/// `Accept` value sent on relays and probes.
pub const ACCEPT_ANY: &str = "*/*";
