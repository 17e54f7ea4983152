//! Promise-style hook

use crate::domain::{HostResponse, InterceptedCall};
use crate::infrastructure::log_messages::interception;
use crate::interception::error::HostRequestError;
use crate::interception::redirector::RequestRedirector;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Options accepted alongside the URL
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

/// Arguments of one promise-style call: `(url, options)`
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub options: FetchOptions,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: FetchOptions::default(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.options.method = Some(method);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.options.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.options.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Method the call will use; `GET` when the caller gave none
    pub fn method(&self) -> Method {
        self.options.method.clone().unwrap_or(Method::GET)
    }

    pub fn into_call(self) -> InterceptedCall {
        let method = self.method();
        InterceptedCall::new(method, self.url)
            .with_headers(self.options.headers)
            .with_body(self.options.body)
            .with_timeout(self.options.timeout)
    }
}

/// A promise-returning request function
#[async_trait]
pub trait FetchApi: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<HostResponse, HostRequestError>;

    /// Marker checked by the installer so a hooked API is never wrapped twice
    fn is_redirect_hook(&self) -> bool {
        false
    }
}

/// Wraps the original [`FetchApi`]; matched calls go through the redirector,
/// everything else is delegated untouched.
pub struct RedirectFetch {
    original: Arc<dyn FetchApi>,
    redirector: Arc<RequestRedirector>,
}

impl RedirectFetch {
    pub fn new(original: Arc<dyn FetchApi>, redirector: Arc<RequestRedirector>) -> Self {
        Self {
            original,
            redirector,
        }
    }

    pub fn original(&self) -> &Arc<dyn FetchApi> {
        &self.original
    }
}

#[async_trait]
impl FetchApi for RedirectFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<HostResponse, HostRequestError> {
        if !self.redirector.matcher().matches(&request.url) {
            return self.original.fetch(request).await;
        }

        debug!(url = %request.url, hook = "fetch", "{}", interception::MATCHED);
        self.redirector
            .redirect(request, self.original.as_ref())
            .await
    }

    fn is_redirect_hook(&self) -> bool {
        true
    }
}
