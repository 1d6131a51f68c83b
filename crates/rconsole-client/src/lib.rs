//! rconsole-client — talks to the remote host's JSON API.
//!
//! Three pieces share one [`Transport`]:
//!
//! ```text
//! Transport (one GET → Envelope | TransportError)
//!   ├── CommandInvoker — user-triggered log fetch / guest reboot
//!   │     └── CommandOutcome → the action's DisplaySurface
//!   └── HealthMonitor — fixed-period liveness probe
//!         └── HealthState (Unknown → Up | Down) via a watch channel
//! ```
//!
//! Nothing here is fatal. Transport failures become a `Failure` outcome for
//! commands and a `Down` state for the monitor, and the monitor keeps
//! ticking regardless.

pub mod error;
pub mod invoker;
pub mod monitor;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use error::TransportError;
pub use invoker::{CommandInvoker, DisplaySurface};
pub use monitor::{HealthMonitor, MonitorHandle};
pub use transport::{HttpTransport, Transport, fetch_with_timeout};
