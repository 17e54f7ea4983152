use crate::domain::constants::{
    HEALTH_PATH, POST_SAVE_PROBE_DELAY_MS, PROBE_EXCERPT_CHARS, PROBE_TIMEOUT_MS,
    STARTUP_PROBE_DELAY_MS,
};
use crate::domain::UserAgent;
use crate::error::Error;
use crate::interception::prober::ProbeOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use http::HeaderValue;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub use config::ConfigError;

pub const ENV_PREFIX: &str = "PROVER_RELAY";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub relay: RelaySettings,
    pub probe: ProbeSettings,
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelaySettings {
    pub user_agent: String,
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProbeSettings {
    pub health_path: String,
    pub timeout_ms: u64,
    pub startup_delay_ms: u64,
    pub post_save_delay_ms: u64,
    pub excerpt_chars: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub path: PathBuf,
    pub key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

pub fn default_user_agent() -> String {
    format!("prover-relay/{}", env!("CARGO_PKG_VERSION"))
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Self::defaults(&environment)?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Settings from built-in defaults only, ignoring files and environment
    pub fn from_defaults(environment: &str) -> Result<Self, ConfigError> {
        Self::defaults(environment)?.build()?.try_deserialize()
    }

    /// Builder preloaded with every default, before files and environment
    pub fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.environment", environment)?
            .set_default("relay.user_agent", default_user_agent())?
            .set_default("probe.health_path", HEALTH_PATH)?
            .set_default("probe.timeout_ms", PROBE_TIMEOUT_MS)?
            .set_default("probe.startup_delay_ms", STARTUP_PROBE_DELAY_MS)?
            .set_default("probe.post_save_delay_ms", POST_SAVE_PROBE_DELAY_MS)?
            .set_default("probe.excerpt_chars", PROBE_EXCERPT_CHARS as u64)?
            .set_default("store.path", "prover-relay.json")?
            .set_default("store.key", "prover-relay-config")?
            .set_default("logging.level", "info")
    }

    /// Validated user agent; it must be non-empty and usable as a header value
    pub fn user_agent(&self) -> Result<UserAgent, Error> {
        let user_agent = UserAgent::try_new(self.relay.user_agent.clone())
            .map_err(|e| Error::invalid_input("relay.user_agent", e))?;
        HeaderValue::from_str(user_agent.as_ref())
            .map_err(|e| Error::invalid_input("relay.user_agent", e))?;
        Ok(user_agent)
    }

    pub fn relay_timeout(&self) -> Option<Duration> {
        self.relay.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe.timeout_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.probe.startup_delay_ms)
    }

    pub fn post_save_delay(&self) -> Duration {
        Duration::from_millis(self.probe.post_save_delay_ms)
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            health_path: self.probe.health_path.clone(),
            timeout: self.probe_timeout(),
            excerpt_chars: self.probe.excerpt_chars,
        }
    }
}
