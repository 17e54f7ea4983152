//! Privileged transport over `reqwest`
//!
//! Runs outside any host sandbox, so it can reach any origin and sees every
//! response header. The request's own timeout covers both the exchange and
//! reading the body.

use crate::infrastructure::log_messages::transport;
use crate::interception::ports::{
    PrivilegedTransport, RelayBody, TransportError, TransportRequest, TransportResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn exchange(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: RelayBody::from_bytes(body),
        })
    }
}

#[async_trait]
impl PrivilegedTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let start = Instant::now();
        let method = request.method.clone();
        let url = request.url.clone();
        let timeout = request.timeout;

        debug!(method = %method, url = %url, timeout = ?timeout, "{}", transport::SENDING);

        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request))
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => self.exchange(request).await,
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(response) => {
                debug!(
                    url = %url,
                    status = response.status.as_u16(),
                    duration_ms,
                    "{}",
                    transport::RECEIVED
                );
                Ok(response)
            }
            Err(error) => {
                warn!(url = %url, error = %error, duration_ms, "{}", transport::FAILED);
                match (error.is_timeout(), timeout) {
                    (true, Some(limit)) => Err(TransportError::Timeout(limit)),
                    _ => Err(TransportError::Network {
                        cause: error.to_string(),
                    }),
                }
            }
        }
    }
}
