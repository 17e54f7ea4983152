//! Delayed probe triggers
//!
//! The startup probe waits for the host to settle and the post-save probe
//! gives the store a moment to commit before the new target is exercised.

use crate::domain::constants::{POST_SAVE_PROBE_DELAY_MS, STARTUP_PROBE_DELAY_MS};
use crate::domain::ProbeResult;
use crate::infrastructure::log_messages::probe;
use crate::interception::prober::HealthProber;
use derive_more::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ProbeTrigger {
    #[display("startup")]
    Startup,
    #[display("config saved")]
    ConfigSaved,
}

pub struct ProbeScheduler {
    prober: Arc<HealthProber>,
    startup_delay: Duration,
    post_save_delay: Duration,
}

impl ProbeScheduler {
    pub fn new(prober: Arc<HealthProber>) -> Self {
        Self {
            prober,
            startup_delay: Duration::from_millis(STARTUP_PROBE_DELAY_MS),
            post_save_delay: Duration::from_millis(POST_SAVE_PROBE_DELAY_MS),
        }
    }

    pub fn with_delays(mut self, startup_delay: Duration, post_save_delay: Duration) -> Self {
        self.startup_delay = startup_delay;
        self.post_save_delay = post_save_delay;
        self
    }

    pub fn delay_for(&self, trigger: ProbeTrigger) -> Duration {
        match trigger {
            ProbeTrigger::Startup => self.startup_delay,
            ProbeTrigger::ConfigSaved => self.post_save_delay,
        }
    }

    pub fn after_startup(&self) -> JoinHandle<Option<ProbeResult>> {
        self.schedule(ProbeTrigger::Startup)
    }

    pub fn after_save(&self) -> JoinHandle<Option<ProbeResult>> {
        self.schedule(ProbeTrigger::ConfigSaved)
    }

    /// Spawn a single probe that runs once `trigger`'s delay has elapsed.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, trigger: ProbeTrigger) -> JoinHandle<Option<ProbeResult>> {
        let prober = Arc::clone(&self.prober);
        let delay = self.delay_for(trigger);

        debug!(trigger = %trigger, delay_ms = delay.as_millis() as u64, "{}", probe::SCHEDULED);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            prober.probe().await
        })
    }
}
