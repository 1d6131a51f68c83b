//! Error type for host requests.

use std::time::Duration;

use rconsole_core::Endpoint;
use thiserror::Error;

/// A request to the host did not produce a usable envelope.
///
/// Connection failures, non-2xx responses, unreadable bodies and bodies that
/// are not a JSON envelope all end up here. Callers react to every one of
/// them the same way, so there is no public discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {endpoint} failed: {detail}")]
pub struct TransportError {
    endpoint: Endpoint,
    detail: String,
}

impl TransportError {
    pub fn new(endpoint: Endpoint, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            detail: detail.into(),
        }
    }

    pub(crate) fn timed_out(endpoint: Endpoint, after: Duration) -> Self {
        Self::new(endpoint, format!("timed out after {}ms", after.as_millis()))
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}
