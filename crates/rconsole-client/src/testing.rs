//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rconsole_core::{Endpoint, Envelope};

use crate::error::TransportError;
use crate::transport::Transport;

type Reply = Result<Envelope, TransportError>;

/// Replays queued replies in call order, each after an optional delay.
/// Once the queue is empty every call gets the fallback reply immediately.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<(Duration, Reply)>>,
    fallback: Reply,
    calls: AtomicUsize,
    seen: Mutex<Vec<Endpoint>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(Envelope::new("true")),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn then(self, reply: Reply) -> Self {
        self.then_after(Duration::ZERO, reply)
    }

    pub(crate) fn then_after(self, delay: Duration, reply: Reply) -> Self {
        self.script.lock().unwrap().push_back((delay, reply));
        self
    }

    pub(crate) fn otherwise(mut self, reply: Reply) -> Self {
        self.fallback = reply;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn endpoints(&self) -> Vec<Endpoint> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn fetch_json(&self, endpoint: Endpoint) -> Result<Envelope, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(endpoint);

        let next = self.script.lock().unwrap().pop_front();
        let (delay, reply) = next.unwrap_or_else(|| (Duration::ZERO, self.fallback.clone()));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.map_err(|e| TransportError::new(endpoint, e.detail().to_string()))
    }
}
