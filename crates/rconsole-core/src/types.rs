//! Shared types used across rconsole crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of host API endpoints the console talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Retrieve the host log.
    GetLog,
    /// Ask the host to reboot its guest.
    RebootGuest,
    /// Liveness probe.
    HealthCheck,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::GetLog => "/api/get_log",
            Endpoint::RebootGuest => "/api/reboot_guest",
            Endpoint::HealthCheck => "/api/health_check",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Response body shared by every host endpoint: `{ "data": "<text>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: String,
}

impl Envelope {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Connection health of the remote host as seen by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthState {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// The last completed probe reported `"true"`.
    Up,
    /// The last completed probe failed or reported anything but `"true"`.
    Down,
}

impl HealthState {
    /// Transition for one completed liveness probe.
    ///
    /// Only the exact string `"true"` counts as healthy. Transport failures
    /// and any other payload are indistinguishable here.
    pub fn from_probe<E>(probe: &Result<Envelope, E>) -> Self {
        match probe {
            Ok(envelope) if envelope.data == "true" => HealthState::Up,
            _ => HealthState::Down,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthState::Unknown => "UNKNOWN",
            HealthState::Up => "UP",
            HealthState::Down => "DOWN",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visual state of the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Neither healthy nor unhealthy; shown before the first probe completes.
    Neutral,
    Green,
    Red,
}

impl Indicator {
    pub fn for_state(state: HealthState) -> Self {
        match state {
            HealthState::Unknown => Indicator::Neutral,
            HealthState::Up => Indicator::Green,
            HealthState::Down => Indicator::Red,
        }
    }
}

/// Result of a one-shot command, consumed by its display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The host answered; carries `data` verbatim.
    Success(String),
    /// The request failed; carries the error description.
    Failure(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success(_))
    }

    /// Text to put on the action's result panel.
    pub fn display_text(&self) -> String {
        match self {
            CommandOutcome::Success(text) => text.clone(),
            CommandOutcome::Failure(reason) => format!("Error: {reason}"),
        }
    }
}
