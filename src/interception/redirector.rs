//! Redirection of matched calls
//!
//! A matched call takes one of two paths. When the operator has not
//! configured an alternate target the call goes through the host's own
//! mechanism untouched, keeping native cookies, credentials and streaming.
//! Otherwise it is relayed over the privileged transport and the reply is
//! synthesized into the shape the host API promised its caller.

use crate::domain::constants::ACCEPT_ANY;
use crate::domain::{HostResponse, InterceptedCall, Severity, TargetAddress, UserAgent};
use crate::infrastructure::log_messages::{interception, notifications};
use crate::interception::error::{HostRequestError, RedirectError};
use crate::interception::hooks::{FetchApi, FetchRequest};
use crate::interception::matcher::EndpointMatcher;
use crate::interception::ports::{
    ConfigProvider, Notifier, PrivilegedTransport, TransportRequest, TransportResponse,
};
use http::header::{InvalidHeaderValue, ACCEPT, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where a matched call should go, decided from the configuration read at
/// dispatch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Passthrough,
    Relay(TargetAddress),
}

pub struct RequestRedirector {
    matcher: EndpointMatcher,
    config: Arc<dyn ConfigProvider>,
    transport: Arc<dyn PrivilegedTransport>,
    notifier: Arc<dyn Notifier>,
    user_agent: HeaderValue,
    default_timeout: Option<Duration>,
}

impl RequestRedirector {
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
            default_timeout: None,
        })
    }

    /// Timeout applied to relays whose caller did not specify one
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn matcher(&self) -> &EndpointMatcher {
        &self.matcher
    }

    /// Decide passthrough or relay from a fresh configuration read.
    ///
    /// A target that does not parse is reported to the operator and returned
    /// to the caller as [`RedirectError::MalformedTarget`].
    pub fn route(&self) -> Result<Route, RedirectError> {
        let config = self.config.get();
        let source = self.matcher.source();

        if config.is_passthrough_for(source) {
            return Ok(Route::Passthrough);
        }

        TargetAddress::parse(config.effective_target_for(source))
            .map(Route::Relay)
            .map_err(|invalid| {
                warn!(
                    target_address = %invalid.address,
                    reason = %invalid.reason,
                    "{}",
                    interception::MALFORMED_TARGET
                );
                self.notifier
                    .notify(notifications::MALFORMED_TARGET, Severity::Error);
                invalid.into()
            })
    }

    /// Handle a promise-style call that already matched the source endpoint
    pub async fn redirect(
        &self,
        request: FetchRequest,
        native: &dyn FetchApi,
    ) -> Result<HostResponse, HostRequestError> {
        match self.route()? {
            Route::Passthrough => {
                debug!(url = %request.url, "{}", interception::PASSTHROUGH);
                native.fetch(request).await
            }
            Route::Relay(target) => {
                let call = request.into_call();
                Ok(self.relay(call, &target).await?)
            }
        }
    }

    /// Relay `call` to `target` over the privileged transport
    pub async fn relay(
        &self,
        call: InterceptedCall,
        target: &TargetAddress,
    ) -> Result<HostResponse, RedirectError> {
        let call_id = call.id;
        let request = TransportRequest {
            method: call.method,
            url: target.as_url().clone(),
            headers: self.relay_headers(&call.headers),
            body: call.body,
            timeout: call.timeout.or(self.default_timeout),
        };

        info!(
            call_id = %call_id,
            method = %request.method,
            source = %call.url,
            target_address = %target,
            "{}",
            interception::RELAYING
        );

        let start = Instant::now();
        match self.transport.send(request).await {
            Ok(response) => {
                info!(
                    call_id = %call_id,
                    status = response.status.as_u16(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "{}",
                    interception::RELAY_SUCCEEDED
                );
                Ok(synthesize_response(response))
            }
            Err(error) => {
                warn!(
                    call_id = %call_id,
                    error = %error,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "{}",
                    interception::RELAY_FAILED
                );
                Err(RedirectError::from_transport(target.as_str(), error))
            }
        }
    }

    /// `{User-Agent, Accept: */*}` overridden by the caller's own headers
    pub fn relay_headers(&self, original: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(original.len() + 2);
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
        headers.extend(original.clone());
        headers
    }
}

/// Build the caller-facing response from a relay reply.
///
/// Status and headers are copied as-is. An empty status text falls back to
/// the canonical reason phrase, then to `OK`.
pub fn synthesize_response(response: TransportResponse) -> HostResponse {
    let status_text = if response.status_text.is_empty() {
        response
            .status
            .canonical_reason()
            .unwrap_or("OK")
            .to_string()
    } else {
        response.status_text
    };

    HostResponse {
        status: response.status,
        status_text,
        headers: response.headers,
        body: response.body.into_bytes(),
    }
}
