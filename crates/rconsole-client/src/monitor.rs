//! Health monitor — periodic liveness probe driving a single [`HealthState`].
//!
//! The monitor owns the state cell (a `watch` channel). Each tick probes
//! `/api/health_check` on its own task, so a slow probe never delays the
//! next tick; whichever probe completes last decides the state. Re-entering
//! the current state does not notify subscribers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use rconsole_core::{Endpoint, HealthState};

use crate::transport::{Transport, fetch_with_timeout};

/// Polls the host's liveness endpoint and tracks its health.
pub struct HealthMonitor<T> {
    transport: Arc<T>,
    interval: Duration,
    timeout: Option<Duration>,
    state: Arc<watch::Sender<HealthState>>,
}

impl<T: Transport> HealthMonitor<T> {
    /// Create a monitor in the `Unknown` state. Nothing runs until [`start`](Self::start).
    pub fn new(transport: Arc<T>, interval: Duration) -> Self {
        let (state, _) = watch::channel(HealthState::Unknown);
        Self {
            transport,
            interval,
            timeout: None,
            state: Arc::new(state),
        }
    }

    /// Count a probe that takes longer than `timeout` as failed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current health state.
    pub fn state(&self) -> HealthState {
        *self.state.borrow()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.state.subscribe()
    }

    /// Run a single probe-and-transition cycle inline.
    pub async fn tick(&self) -> HealthState {
        probe_once(self.transport.as_ref(), self.timeout, &self.state).await
    }

    /// Spawn the repeating probe loop. The first tick fires immediately.
    pub fn start(self) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::clone(&self.state);

        info!(interval = ?self.interval, "health monitor started");
        let task = tokio::spawn(run_monitor_loop(self, shutdown_rx));

        MonitorHandle {
            state,
            shutdown_tx,
            task,
        }
    }
}

/// Handle to a running monitor.
///
/// Dropping the handle leaves the monitor running for the rest of the
/// process; [`stop`](Self::stop) tears it down.
pub struct MonitorHandle {
    state: Arc<watch::Sender<HealthState>>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn state(&self) -> HealthState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop ticking and abandon any probe still in flight.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "health monitor task ended abnormally");
        }
        info!("health monitor stopped");
    }
}

async fn run_monitor_loop<T: Transport>(
    monitor: HealthMonitor<T>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(monitor.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut probes = JoinSet::new();
    let mut attached = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let transport = Arc::clone(&monitor.transport);
                let state = Arc::clone(&monitor.state);
                let timeout = monitor.timeout;
                probes.spawn(async move {
                    probe_once(transport.as_ref(), timeout, &state).await;
                });
                debug!(in_flight = probes.len(), "health tick");
            }
            Some(joined) = probes.join_next(), if !probes.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "health probe task failed");
                }
            }
            changed = shutdown.changed(), if attached => {
                match changed {
                    Ok(()) if *shutdown.borrow() => break,
                    Ok(()) => {}
                    // Handle dropped: keep polling for the life of the process.
                    Err(_) => attached = false,
                }
            }
        }
    }

    probes.shutdown().await;
    debug!("health loop exited");
}

/// Probe once and record the transition. Returns the state this probe produced.
async fn probe_once<T: Transport>(
    transport: &T,
    timeout: Option<Duration>,
    state: &watch::Sender<HealthState>,
) -> HealthState {
    let probe = fetch_with_timeout(transport, Endpoint::HealthCheck, timeout).await;
    if let Err(e) = &probe {
        debug!(error = %e, "liveness probe failed");
    }

    let next = HealthState::from_probe(&probe);
    let changed = state.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });

    if changed {
        match next {
            HealthState::Up => info!("host reachable"),
            HealthState::Down => warn!("host unreachable or unhealthy"),
            HealthState::Unknown => {}
        }
    }

    next
}
