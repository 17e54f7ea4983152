//! Imperative open/send hook
//!
//! Only the URL passed to `open` can be redirected. Headers set afterwards
//! and the body given to `send` travel to the substituted URL exactly as the
//! host wrote them, with no `User-Agent`/`Accept` defaults and no relay over
//! the privileged transport.

use crate::domain::HostResponse;
use crate::infrastructure::log_messages::interception;
use crate::interception::error::HostRequestError;
use crate::interception::redirector::{RequestRedirector, Route};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method};
use std::sync::Arc;
use tracing::{debug, info};

/// Trailing arguments of `open` after method and URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenArgs {
    pub asynchronous: bool,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Default for OpenArgs {
    fn default() -> Self {
        Self {
            asynchronous: true,
            user: None,
            password: None,
        }
    }
}

/// A request object driven step by step: `open`, header setup, `send`
#[async_trait]
pub trait OpenSendRequest: Send {
    fn open(&mut self, method: Method, url: String, args: OpenArgs)
        -> Result<(), HostRequestError>;

    fn set_request_header(
        &mut self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Result<(), HostRequestError>;

    async fn send(&mut self, body: Option<Bytes>) -> Result<HostResponse, HostRequestError>;
}

/// Creates request objects for the host
pub trait RequestFactory: Send + Sync {
    fn create(&self) -> Box<dyn OpenSendRequest>;

    /// Marker checked by the installer so a hooked factory is never wrapped twice
    fn is_redirect_hook(&self) -> bool {
        false
    }
}

/// Request object whose `open` step may swap the URL for the configured target
pub struct RedirectingRequest {
    inner: Box<dyn OpenSendRequest>,
    redirector: Arc<RequestRedirector>,
    original_method: Option<Method>,
    original_url: Option<String>,
}

impl RedirectingRequest {
    pub fn new(inner: Box<dyn OpenSendRequest>, redirector: Arc<RequestRedirector>) -> Self {
        Self {
            inner,
            redirector,
            original_method: None,
            original_url: None,
        }
    }

    /// Method passed to the last `open`
    pub fn original_method(&self) -> Option<&Method> {
        self.original_method.as_ref()
    }

    /// URL passed to the last `open`, before any substitution
    pub fn original_url(&self) -> Option<&str> {
        self.original_url.as_deref()
    }

    fn resolve_url(&self, url: String) -> Result<String, HostRequestError> {
        if !self.redirector.matcher().matches(&url) {
            return Ok(url);
        }

        debug!(url = %url, hook = "open", "{}", interception::MATCHED);
        match self.redirector.route()? {
            Route::Passthrough => Ok(url),
            Route::Relay(target) => {
                info!(source = %url, target_address = %target, "{}", interception::URL_SUBSTITUTED);
                Ok(target.as_str().to_string())
            }
        }
    }
}

#[async_trait]
impl OpenSendRequest for RedirectingRequest {
    fn open(
        &mut self,
        method: Method,
        url: String,
        args: OpenArgs,
    ) -> Result<(), HostRequestError> {
        self.original_method = Some(method.clone());
        self.original_url = Some(url.clone());

        let url = self.resolve_url(url)?;
        self.inner.open(method, url, args)
    }

    fn set_request_header(
        &mut self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Result<(), HostRequestError> {
        self.inner.set_request_header(name, value)
    }

    async fn send(&mut self, body: Option<Bytes>) -> Result<HostResponse, HostRequestError> {
        self.inner.send(body).await
    }
}

/// Wraps the original factory so every created object is a [`RedirectingRequest`]
pub struct RedirectingFactory {
    original: Arc<dyn RequestFactory>,
    redirector: Arc<RequestRedirector>,
}

impl RedirectingFactory {
    pub fn new(original: Arc<dyn RequestFactory>, redirector: Arc<RequestRedirector>) -> Self {
        Self {
            original,
            redirector,
        }
    }

    pub fn original(&self) -> &Arc<dyn RequestFactory> {
        &self.original
    }
}

impl RequestFactory for RedirectingFactory {
    fn create(&self) -> Box<dyn OpenSendRequest> {
        Box::new(RedirectingRequest::new(
            self.original.create(),
            Arc::clone(&self.redirector),
        ))
    }

    fn is_redirect_hook(&self) -> bool {
        true
    }
}
