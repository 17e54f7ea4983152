//! Test utilities shared by the unit tests
//!
//! Scripted and recording stand-ins for the host request APIs and the
//! privileged transport, plus helpers to assemble a redirector around them.

use crate::domain::{HostResponse, RedirectConfig, UserAgent};
use crate::infrastructure::config_store::MemoryConfigProvider;
use crate::infrastructure::notifier::MemoryNotifier;
use crate::interception::error::HostRequestError;
use crate::interception::hooks::{
    FetchApi, FetchRequest, OpenArgs, OpenSendRequest, RequestFactory,
};
use crate::interception::matcher::EndpointMatcher;
use crate::interception::ports::{
    PrivilegedTransport, RelayBody, TransportError, TransportRequest, TransportResponse,
};
use crate::interception::redirector::RequestRedirector;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

pub fn test_user_agent() -> UserAgent {
    UserAgent::try_new("prover-relay-test/1.0".to_string()).expect("test user agent is valid")
}

/// A 200 reply carrying `body` as text
pub fn ok_transport_reply(body: &str) -> TransportResponse {
    TransportResponse {
        status: StatusCode::OK,
        status_text: "OK".to_string(),
        headers: HeaderMap::new(),
        body: RelayBody::Text(body.to_string()),
    }
}

pub fn test_redirector(
    config: RedirectConfig,
    transport: Arc<MockTransport>,
) -> Arc<RequestRedirector> {
    Arc::new(
        RequestRedirector::new(
            EndpointMatcher::default(),
            Arc::new(MemoryConfigProvider::new(config)),
            transport,
            Arc::new(MemoryNotifier::new()),
            &test_user_agent(),
        )
        .expect("test user agent is a valid header value"),
    )
}

/// Transport that replays queued outcomes and records every request.
///
/// With nothing queued it reports a network failure.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, outcome: Result<TransportResponse, TransportError>) {
        self.responses.lock().push_back(outcome);
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PrivilegedTransport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Network {
                    cause: "no scripted response".to_string(),
                })
            })
    }
}

/// Native promise-style API: records calls and answers 200 `native`
#[derive(Default)]
pub struct MockFetch {
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl FetchApi for MockFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<HostResponse, HostRequestError> {
        self.requests.lock().push(request);
        Ok(HostResponse::new(StatusCode::OK, "native"))
    }
}

/// What one imperative request object went through
#[derive(Debug, Clone, Default)]
pub struct OpenSendRecord {
    pub method: Option<Method>,
    pub url: Option<String>,
    pub args: Option<OpenArgs>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Native imperative API; every created object appends one record to the log
#[derive(Default)]
pub struct MockRequestFactory {
    log: Arc<Mutex<Vec<OpenSendRecord>>>,
}

impl MockRequestFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Vec<OpenSendRecord> {
        self.log.lock().clone()
    }
}

impl RequestFactory for MockRequestFactory {
    fn create(&self) -> Box<dyn OpenSendRequest> {
        let mut log = self.log.lock();
        log.push(OpenSendRecord::default());
        Box::new(MockOpenSend {
            index: log.len() - 1,
            log: Arc::clone(&self.log),
        })
    }
}

pub struct MockOpenSend {
    index: usize,
    log: Arc<Mutex<Vec<OpenSendRecord>>>,
}

impl MockOpenSend {
    fn with_record<T>(&self, f: impl FnOnce(&mut OpenSendRecord) -> T) -> T {
        f(&mut self.log.lock()[self.index])
    }
}

#[async_trait]
impl OpenSendRequest for MockOpenSend {
    fn open(
        &mut self,
        method: Method,
        url: String,
        args: OpenArgs,
    ) -> Result<(), HostRequestError> {
        self.with_record(|record| {
            record.method = Some(method);
            record.url = Some(url);
            record.args = Some(args);
        });
        Ok(())
    }

    fn set_request_header(
        &mut self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Result<(), HostRequestError> {
        self.with_record(|record| {
            if record.url.is_none() {
                return Err(HostRequestError::InvalidState(
                    "header set before open".to_string(),
                ));
            }
            record.headers.append(name, value);
            Ok(())
        })
    }

    async fn send(&mut self, body: Option<Bytes>) -> Result<HostResponse, HostRequestError> {
        self.with_record(|record| {
            if record.url.is_none() {
                return Err(HostRequestError::InvalidState(
                    "send before open".to_string(),
                ));
            }
            record.body = body;
            Ok(HostResponse::new(StatusCode::OK, "opened"))
        })
    }
}
