//! Host transport: one GET per call, decoded into an [`Envelope`].
//!
//! [`HttpTransport`] performs no retries and imposes no timeout of its own.
//! Callers that want a deadline go through [`fetch_with_timeout`].

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, USER_AGENT};
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use rconsole_core::{Endpoint, Envelope};

use crate::error::TransportError;

/// Issues a single request to a host endpoint.
pub trait Transport: Send + Sync + 'static {
    fn fetch_json(
        &self,
        endpoint: Endpoint,
    ) -> impl Future<Output = Result<Envelope, TransportError>> + Send;
}

/// [`Transport`] over plain HTTP/1.1 using a pooled hyper client.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpTransport {
    /// `base_url` is the host root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl Transport for HttpTransport {
    async fn fetch_json(&self, endpoint: Endpoint) -> Result<Envelope, TransportError> {
        let uri = self.url_for(endpoint);

        let req = http::Request::builder()
            .method(http::Method::GET)
            .uri(&uri)
            .header(USER_AGENT, concat!("rconsole/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| TransportError::new(endpoint, format!("invalid request: {e}")))?;

        let resp = self.client.request(req).await.map_err(|e| {
            debug!(error = %e, %uri, "host request failed");
            TransportError::new(endpoint, error_chain(&e))
        })?;

        let status = resp.status();
        if !status.is_success() {
            debug!(%status, %uri, "host returned non-2xx");
            return Err(TransportError::new(endpoint, format!("HTTP {status}")));
        }

        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::new(endpoint, format!("failed to read body: {e}")))?
            .to_bytes();

        let envelope: Envelope = serde_json::from_slice(&body).map_err(|e| {
            debug!(error = %e, %uri, "host returned malformed body");
            TransportError::new(endpoint, format!("malformed response body: {e}"))
        })?;

        debug!(%status, %uri, bytes = body.len(), "host request completed");
        Ok(envelope)
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Run one transport call, failing it if `timeout` elapses first.
///
/// With `timeout = None` the call waits as long as the underlying socket does.
pub async fn fetch_with_timeout<T: Transport>(
    transport: &T,
    endpoint: Endpoint,
    timeout: Option<Duration>,
) -> Result<Envelope, TransportError> {
    match timeout {
        None => transport.fetch_json(endpoint).await,
        Some(limit) => tokio::time::timeout(limit, transport.fetch_json(endpoint))
            .await
            .unwrap_or_else(|_| Err(TransportError::timed_out(endpoint, limit))),
    }
}
