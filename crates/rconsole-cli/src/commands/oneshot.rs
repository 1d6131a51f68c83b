//! `rconsole log`, `rconsole reboot`, `rconsole status`.

use std::process::ExitCode;
use std::sync::Arc;

use rconsole_core::{ConsoleConfig, Endpoint, HealthState};

use super::Session;
use crate::panel::{ResultPanel, StatusIndicator, Terminal};

/// Run one command and show its outcome on the matching panel.
pub async fn command(config: &ConsoleConfig, endpoint: Endpoint) -> anyhow::Result<ExitCode> {
    let session = Session::connect(config);
    let panel = ResultPanel::new(panel_label(endpoint), Arc::new(Terminal::stdout()));

    let outcome = session.invoker.run(endpoint, &panel).await;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Probe the host once and print the indicator.
pub async fn status(config: &ConsoleConfig) -> anyhow::Result<ExitCode> {
    let session = Session::connect(config);
    let indicator = StatusIndicator::new(Arc::new(Terminal::stdout()));

    let state = session.monitor.tick().await;
    indicator.render(state);
    Ok(if state == HealthState::Up {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn panel_label(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::GetLog => "log",
        Endpoint::RebootGuest => "reboot",
        Endpoint::HealthCheck => "health",
    }
}
