//! One-shot commands triggered by the user (log fetch, guest reboot).
//!
//! Every invocation is independent. There is no in-flight guard, so two
//! quick reboot triggers send two reboot requests.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use rconsole_core::{CommandOutcome, Endpoint};

use crate::transport::{Transport, fetch_with_timeout};

/// Where a command's outcome is shown. Each action owns its own surface.
pub trait DisplaySurface: Send + Sync {
    fn show(&self, text: &str);
}

/// Runs user-triggered commands against the host.
pub struct CommandInvoker<T> {
    transport: Arc<T>,
    timeout: Option<Duration>,
}

impl<T> Clone for CommandInvoker<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            timeout: self.timeout,
        }
    }
}

impl<T: Transport> CommandInvoker<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Fail requests that take longer than `timeout`. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one request and map the result to an outcome.
    pub async fn invoke(&self, endpoint: Endpoint) -> CommandOutcome {
        info!(%endpoint, "invoking host command");

        match fetch_with_timeout(self.transport.as_ref(), endpoint, self.timeout).await {
            Ok(envelope) => {
                debug!(%endpoint, bytes = envelope.data.len(), "host command succeeded");
                CommandOutcome::Success(envelope.data)
            }
            Err(e) => {
                info!(%endpoint, error = %e, "host command failed");
                CommandOutcome::Failure(e.to_string())
            }
        }
    }

    /// Invoke and write the outcome to `surface`, and nowhere else.
    pub async fn run(&self, endpoint: Endpoint, surface: &dyn DisplaySurface) -> CommandOutcome {
        let outcome = self.invoke(endpoint).await;
        surface.show(&outcome.display_text());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rconsole_core::Envelope;

    use super::*;
    use crate::error::TransportError;
    use crate::testing::ScriptedTransport;

    #[derive(Default)]
    struct Recorded(Mutex<Vec<String>>);

    impl DisplaySurface for Recorded {
        fn show(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    impl Recorded {
        fn shown(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn success_carries_data_verbatim() {
        let transport = ScriptedTransport::new().then(Ok(Envelope::new("line1\nline2")));
        let invoker = CommandInvoker::new(Arc::new(transport));

        let outcome = invoker.invoke(Endpoint::GetLog).await;
        assert_eq!(outcome, CommandOutcome::Success("line1\nline2".to_string()));
    }

    #[tokio::test]
    async fn failure_carries_error_text() {
        let transport = ScriptedTransport::new().then(Err(TransportError::new(
            Endpoint::RebootGuest,
            "HTTP 500 Internal Server Error",
        )));
        let invoker = CommandInvoker::new(Arc::new(transport));

        let outcome = invoker.invoke(Endpoint::RebootGuest).await;
        match outcome {
            CommandOutcome::Failure(reason) => {
                assert!(reason.contains("HTTP 500"), "{reason}");
                assert!(reason.contains("/api/reboot_guest"), "{reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_writes_only_to_its_own_surface() {
        let transport = ScriptedTransport::new()
            .then(Ok(Envelope::new("log text")))
            .then(Ok(Envelope::new("rebooting")));
        let invoker = CommandInvoker::new(Arc::new(transport));
        let log_panel = Recorded::default();
        let reboot_panel = Recorded::default();

        invoker.run(Endpoint::GetLog, &log_panel).await;
        invoker.run(Endpoint::RebootGuest, &reboot_panel).await;

        assert_eq!(log_panel.shown(), vec!["log text"]);
        assert_eq!(reboot_panel.shown(), vec!["rebooting"]);
    }

    #[tokio::test]
    async fn run_in_reverse_order_keeps_surfaces_separate() {
        let transport = ScriptedTransport::new()
            .then(Ok(Envelope::new("rebooting")))
            .then(Err(TransportError::new(Endpoint::GetLog, "connection reset")));
        let invoker = CommandInvoker::new(Arc::new(transport));
        let log_panel = Recorded::default();
        let reboot_panel = Recorded::default();

        invoker.run(Endpoint::RebootGuest, &reboot_panel).await;
        invoker.run(Endpoint::GetLog, &log_panel).await;

        assert_eq!(reboot_panel.shown(), vec!["rebooting"]);
        assert_eq!(log_panel.shown().len(), 1);
        assert!(log_panel.shown()[0].starts_with("Error: "), "{:?}", log_panel.shown());
    }

    #[tokio::test]
    async fn failure_is_rendered_with_error_prefix() {
        let transport = ScriptedTransport::new()
            .then(Err(TransportError::new(Endpoint::GetLog, "connection refused")));
        let invoker = CommandInvoker::new(Arc::new(transport));
        let panel = Recorded::default();

        invoker.run(Endpoint::GetLog, &panel).await;

        assert_eq!(
            panel.shown(),
            vec!["Error: request to /api/get_log failed: connection refused"]
        );
    }

    #[tokio::test]
    async fn overlapping_invocations_all_reach_the_host() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .then_after(Duration::from_millis(30), Ok(Envelope::new("first")))
                .then(Ok(Envelope::new("second"))),
        );
        let invoker = CommandInvoker::new(Arc::clone(&transport));

        let (a, b) = tokio::join!(
            invoker.invoke(Endpoint::RebootGuest),
            invoker.invoke(Endpoint::RebootGuest)
        );

        assert_eq!(transport.calls(), 2);
        assert_eq!(transport.endpoints(), vec![Endpoint::RebootGuest; 2]);
        assert!(a.is_success() && b.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_becomes_failure() {
        let transport = ScriptedTransport::new()
            .then_after(Duration::from_secs(30), Ok(Envelope::new("too late")));
        let invoker =
            CommandInvoker::new(Arc::new(transport)).with_timeout(Some(Duration::from_secs(5)));

        let outcome = invoker.invoke(Endpoint::GetLog).await;
        assert_eq!(
            outcome,
            CommandOutcome::Failure("request to /api/get_log failed: timed out after 5000ms".to_string())
        );
    }
}
