pub mod console;
pub mod oneshot;
pub mod watch;

use std::sync::Arc;

use rconsole_client::{CommandInvoker, HealthMonitor, HttpTransport};
use rconsole_core::ConsoleConfig;

/// Client components wired to one shared transport, as configured.
pub struct Session {
    pub invoker: CommandInvoker<HttpTransport>,
    pub monitor: HealthMonitor<HttpTransport>,
}

impl Session {
    pub fn connect(config: &ConsoleConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(config.host_url()));
        tracing::debug!(host = %transport.base_url(), "using host");

        Self {
            invoker: CommandInvoker::new(Arc::clone(&transport))
                .with_timeout(config.request_timeout()),
            monitor: HealthMonitor::new(transport, config.monitor_interval())
                .with_timeout(config.request_timeout()),
        }
    }
}
