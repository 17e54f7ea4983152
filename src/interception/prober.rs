//! Readiness probing of the configured target
//!
//! The prober has no caller to report to: every outcome, including failures,
//! ends up in a [`ProbeResult`] and an operator notification.

use crate::domain::constants::{ACCEPT_ANY, HEALTH_PATH, PROBE_EXCERPT_CHARS, PROBE_TIMEOUT_MS};
use crate::domain::{excerpt, FailureKind, ProbeResult, Severity, TargetAddress, UserAgent};
use crate::infrastructure::log_messages::{notifications, probe};
use crate::interception::error::RedirectError;
use crate::interception::matcher::EndpointMatcher;
use crate::interception::ports::{
    ConfigProvider, Notifier, PrivilegedTransport, RelayBody, TransportError, TransportRequest,
};
use http::header::{InvalidHeaderValue, ACCEPT, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Derive the readiness URL by replacing the target's path with `/ready`
pub fn generate_ready_url(target: &str) -> Result<Url, RedirectError> {
    ready_url_with_path(target, HEALTH_PATH)
}

pub fn ready_url_with_path(target: &str, health_path: &str) -> Result<Url, RedirectError> {
    let target = TargetAddress::parse(target)?;
    Ok(target.with_path(health_path))
}

/// Tunables for a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub health_path: String,
    pub timeout: Duration,
    pub excerpt_chars: usize,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            health_path: HEALTH_PATH.to_string(),
            timeout: Duration::from_millis(PROBE_TIMEOUT_MS),
            excerpt_chars: PROBE_EXCERPT_CHARS,
        }
    }
}

pub struct HealthProber {
    matcher: EndpointMatcher,
    config: Arc<dyn ConfigProvider>,
    transport: Arc<dyn PrivilegedTransport>,
    notifier: Arc<dyn Notifier>,
    user_agent: HeaderValue,
    options: ProbeOptions,
}

impl HealthProber {
    pub fn new(
        matcher: EndpointMatcher,
        config: Arc<dyn ConfigProvider>,
        transport: Arc<dyn PrivilegedTransport>,
        notifier: Arc<dyn Notifier>,
        user_agent: &UserAgent,
    ) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            matcher,
            config,
            transport,
            notifier,
            user_agent: HeaderValue::from_str(user_agent.as_ref())?,
            options: ProbeOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ProbeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Probe the configured target once.
    ///
    /// Returns `None` without touching the network or notifying when no
    /// redirection is configured.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Option<ProbeResult> {
        let config = self.config.get();
        let source = self.matcher.source();

        if config.is_passthrough_for(source) {
            info!("{}", probe::SKIPPED_DEFAULT_TARGET);
            return None;
        }

        let target = config.effective_target_for(source);
        info!(target_address = %target, "{}", probe::STARTING);

        let ready_url = match ready_url_with_path(target, &self.options.health_path) {
            Ok(url) => url,
            Err(error) => {
                error!(target_address = %target, error = %error, "{}", probe::READY_URL_FAILED);
                self.notifier
                    .notify(notifications::MALFORMED_TARGET, Severity::Error);
                return Some(ProbeResult::failed(FailureKind::MalformedTarget, None));
            }
        };

        let request = TransportRequest::get(
            ready_url.clone(),
            self.probe_headers(),
            self.options.timeout,
        );

        let result = match self.transport.send(request).await {
            Ok(response) => {
                let body = match &response.body {
                    RelayBody::Text(text) => excerpt(text, self.options.excerpt_chars),
                    RelayBody::Raw(bytes) => {
                        excerpt(&String::from_utf8_lossy(bytes), self.options.excerpt_chars)
                    }
                };
                let status = response.status.as_u16();
                let result = ProbeResult::responded(ready_url, response.status, body);

                if result.succeeded {
                    info!(
                        status,
                        ready_url = ?result.ready_url,
                        excerpt = ?result.excerpt,
                        "{}",
                        probe::READY
                    );
                    self.notifier
                        .notify(&notifications::service_healthy(status), Severity::Success);
                } else {
                    warn!(status, excerpt = ?result.excerpt, "{}", probe::NOT_READY);
                    self.notifier
                        .notify(&notifications::service_unhealthy(status), Severity::Error);
                }
                result
            }
            Err(TransportError::Network { cause }) => {
                error!(ready_url = %ready_url, cause = %cause, "{}", probe::NETWORK_FAILURE);
                self.notifier
                    .notify(notifications::SERVICE_UNAVAILABLE, Severity::Error);
                ProbeResult::failed(FailureKind::Network, Some(ready_url))
            }
            Err(TransportError::Timeout(after)) => {
                error!(ready_url = %ready_url, timeout = ?after, "{}", probe::TIMED_OUT);
                self.notifier
                    .notify(notifications::SERVICE_TIMEOUT, Severity::Error);
                ProbeResult::failed(FailureKind::Timeout, Some(ready_url))
            }
        };

        Some(result)
    }

    fn probe_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
        headers
    }
}
