use crate::config::Settings;
use crate::domain::{ProbeResult, RedirectConfig, Severity};
use crate::infrastructure::config_store::{JsonFileKeyValueStore, StoredConfigProvider};
use crate::infrastructure::log_messages::{application, configuration, notifications};
use crate::infrastructure::notifier::TracingNotifier;
use crate::infrastructure::transport::ReqwestTransport;
use crate::interception::installer::{DualHookInstaller, HostApis, UninstallHandle};
use crate::interception::matcher::EndpointMatcher;
use crate::interception::ports::{ConfigProvider, Notifier, PrivilegedTransport};
use crate::interception::prober::HealthProber;
use crate::interception::redirector::RequestRedirector;
use crate::interception::scheduler::ProbeScheduler;
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

type ProbeHandle = JoinHandle<Option<ProbeResult>>;

/// Wires the interception engine to its ports and owns the probe lifecycle
pub struct Application {
    settings: Settings,
    config: Arc<dyn ConfigProvider>,
    notifier: Arc<dyn Notifier>,
    installer: DualHookInstaller,
    prober: Arc<HealthProber>,
    scheduler: ProbeScheduler,
    startup_probe: Mutex<Option<ProbeHandle>>,
}

impl Application {
    /// Production wiring: JSON file store, `reqwest` transport, log notifications
    #[instrument(skip(settings))]
    pub fn new(settings: Settings) -> Result<Self> {
        let store = JsonFileKeyValueStore::new(settings.store.path.clone());
        let config = Arc::new(StoredConfigProvider::new(store, settings.store.key.clone()));

        Self::with_ports(
            settings,
            config,
            Arc::new(ReqwestTransport::new()),
            Arc::new(TracingNotifier),
        )
    }

    pub fn with_ports(
        settings: Settings,
        config: Arc<dyn ConfigProvider>,
        transport: Arc<dyn PrivilegedTransport>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let user_agent = settings.user_agent()?;
        let matcher = EndpointMatcher::default();

        let redirector = RequestRedirector::new(
            matcher.clone(),
            Arc::clone(&config),
            Arc::clone(&transport),
            Arc::clone(&notifier),
            &user_agent,
        )
        .map_err(|e| {
            error!("{}", configuration::INVALID_USER_AGENT);
            Error::invalid_input("relay.user_agent", e)
        })?
        .with_default_timeout(settings.relay_timeout());

        let prober = HealthProber::new(
            matcher,
            Arc::clone(&config),
            transport,
            Arc::clone(&notifier),
            &user_agent,
        )
        .map_err(|e| Error::invalid_input("relay.user_agent", e))?
        .with_options(settings.probe_options());
        let prober = Arc::new(prober);

        let scheduler = ProbeScheduler::new(Arc::clone(&prober))
            .with_delays(settings.startup_delay(), settings.post_save_delay());

        Ok(Self {
            settings,
            config,
            notifier,
            installer: DualHookInstaller::new(Arc::new(redirector)),
            prober,
            scheduler,
            startup_probe: Mutex::new(None),
        })
    }

    /// Install both hooks on the host's request APIs.
    ///
    /// The first installation also schedules the startup probe. Must be called
    /// from within a tokio runtime.
    #[instrument(skip(self, host))]
    pub fn install(&self, host: HostApis) -> UninstallHandle {
        let handle = self.installer.install(host);

        if handle.newly_installed() {
            info!("{}", application::HOOKS_INSTALLED);
            self.schedule_startup_probe();
        }
        handle
    }

    /// Persist a new configuration and probe it shortly afterwards.
    ///
    /// The next intercepted call already sees the new target; the returned
    /// handle resolves with the follow-up probe.
    #[instrument(skip(self), fields(target_address = %config.target_address))]
    pub fn save_config(&self, config: RedirectConfig) -> Result<ProbeHandle> {
        if let Err(e) = self.config.set(config) {
            error!(error = %e, "{}", application::CONFIG_SAVE_FAILED);
            return Err(e.into());
        }

        info!("{}", application::CONFIG_SAVED);
        self.notifier
            .notify(notifications::CONFIG_SAVED, Severity::Success);
        Ok(self.scheduler.after_save())
    }

    pub fn current_config(&self) -> RedirectConfig {
        self.config.get()
    }

    /// Probe the configured target right away
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> Option<ProbeResult> {
        self.prober.probe().await
    }

    /// Wait for the startup probe scheduled by [`install`](Self::install) or
    /// [`run`](Self::run). `None` if none is pending or it was skipped.
    pub async fn startup_probe(&self) -> Option<ProbeResult> {
        let handle = self.startup_probe.lock().take()?;
        match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "{}", application::PROBE_TASK_FAILED);
                None
            }
        }
    }

    /// Headless run: schedule the startup probe unless hooks already did,
    /// wait for it and return its outcome
    #[instrument(skip(self))]
    pub async fn run(self) -> Result<Option<ProbeResult>> {
        info!(
            environment = %self.settings.application.environment,
            target_address = %self.current_config().target_address,
            "{}",
            application::STARTING
        );

        self.schedule_startup_probe();
        let result = self.startup_probe().await;

        info!(
            succeeded = ?result.as_ref().map(|r| r.succeeded),
            "{}",
            application::FINISHED
        );
        Ok(result)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn installer(&self) -> &DualHookInstaller {
        &self.installer
    }

    fn schedule_startup_probe(&self) {
        let mut slot = self.startup_probe.lock();
        if slot.is_none() {
            info!(
                delay_ms = self.settings.startup_delay().as_millis() as u64,
                "{}",
                application::STARTUP_PROBE_SCHEDULED
            );
            *slot = Some(self.scheduler.after_startup());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config_store::MemoryConfigProvider;
    use crate::infrastructure::notifier::MemoryNotifier;
    use crate::interception::hooks::{FetchApi, FetchRequest};
    use crate::test_utils::{ok_transport_reply, MockFetch, MockRequestFactory, MockTransport};
    use http::Method;
    use std::time::Duration;

    const SOURCE: &str = "https://v7.charms.dev/spells/prove";
    const TARGET: &str = "http://127.0.0.1:9000/spells/prove";

    struct Fixture {
        app: Application,
        transport: Arc<MockTransport>,
        notifier: Arc<MemoryNotifier>,
    }

    fn fixture(config: RedirectConfig) -> Fixture {
        let transport = Arc::new(MockTransport::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let app = Application::with_ports(
            Settings::from_defaults("test").unwrap(),
            Arc::new(MemoryConfigProvider::new(config)),
            transport.clone(),
            notifier.clone(),
        )
        .unwrap();
        Fixture {
            app,
            transport,
            notifier,
        }
    }

    fn host() -> HostApis {
        HostApis::new(
            Arc::new(MockFetch::new()),
            Arc::new(MockRequestFactory::new()),
        )
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let mut settings = Settings::from_defaults("test").unwrap();
        settings.relay.user_agent = String::new();

        let result = Application::with_ports(
            settings,
            Arc::new(MemoryConfigProvider::default()),
            Arc::new(MockTransport::new()),
            Arc::new(MemoryNotifier::new()),
        );
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_config_notifies_then_probes() {
        let f = fixture(RedirectConfig::default());
        f.transport.push_response(Ok(ok_transport_reply("OK")));

        let start = tokio::time::Instant::now();
        let handle = f.app.save_config(RedirectConfig::new(TARGET)).unwrap();

        assert_eq!(f.app.current_config().target_address, TARGET);
        let notes = f.notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, notifications::CONFIG_SAVED);
        assert_eq!(notes[0].severity, Severity::Success);
        assert!(f.transport.requests().is_empty());

        let result = handle.await.unwrap().unwrap();
        assert!(result.succeeded);
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(
            f.transport.requests()[0].url.as_str(),
            "http://127.0.0.1:9000/ready"
        );
    }

    #[tokio::test]
    async fn test_saved_config_applies_to_next_call() {
        let f = fixture(RedirectConfig::default());
        let handle = f.app.install(host());

        let native = handle.fetch();
        native
            .fetch(FetchRequest::new(SOURCE).with_method(Method::POST))
            .await
            .unwrap();
        assert!(f.transport.requests().is_empty());

        f.transport.push_response(Ok(ok_transport_reply("relayed")));
        f.app.save_config(RedirectConfig::new(TARGET)).unwrap();

        let response = native.fetch(FetchRequest::new(SOURCE)).await.unwrap();
        assert_eq!(response.text(), "relayed");
        assert_eq!(f.transport.requests()[0].url.as_str(), TARGET);
    }

    #[tokio::test(start_paused = true)]
    async fn test_install_schedules_startup_probe_once() {
        let f = fixture(RedirectConfig::new(TARGET));
        f.transport.push_response(Ok(ok_transport_reply("OK")));

        let first = f.app.install(host());
        let second = f.app.install(host());
        assert!(first.newly_installed());
        assert!(!second.newly_installed());

        let result = f.app.startup_probe().await.unwrap();
        assert!(result.succeeded);
        assert_eq!(f.transport.requests().len(), 1);
        assert_eq!(f.app.startup_probe().await, None);
    }

    #[tokio::test]
    async fn test_test_connection_is_immediate() {
        let f = fixture(RedirectConfig::new(TARGET));
        f.transport.push_response(Ok(ok_transport_reply("OK")));

        let result = f.app.test_connection().await.unwrap();
        assert!(result.succeeded);
        assert_eq!(f.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_test_connection_skips_default_target() {
        let f = fixture(RedirectConfig::default());
        assert_eq!(f.app.test_connection().await, None);
        assert!(f.notifier.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_startup_probe() {
        let f = fixture(RedirectConfig::new(TARGET));
        f.transport.push_response(Ok(ok_transport_reply("OK")));

        let result = f.app.run().await.unwrap().unwrap();
        assert!(result.succeeded);
        assert_eq!(f.transport.requests().len(), 1);
    }
}
