//! `rconsole console` — interactive console.
//!
//! Runs the health monitor in the background and reads one command per line
//! from stdin. Each `log` / `reboot` runs on its own task and writes only
//! to its own panel; a new command never waits for an earlier one.
//!
//! On `quit` or end of input the console waits for commands already in
//! flight to show their outcome before exiting. Ctrl-C exits at once and
//! abandons them.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use rconsole_client::{CommandInvoker, HttpTransport};
use rconsole_core::{ConsoleConfig, Endpoint};

use super::Session;
use super::oneshot::panel_label;
use crate::panel::{ResultPanel, StatusIndicator, Terminal};

const HELP: &str = "commands: log, reboot, status, help, quit";

/// A line typed at the console prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Log,
    Reboot,
    Status,
    Help,
    Quit,
}

impl Action {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "log" | "get_log" => Some(Action::Log),
            "reboot" | "reboot_guest" => Some(Action::Reboot),
            "status" => Some(Action::Status),
            "help" | "?" => Some(Action::Help),
            "quit" | "exit" | "q" => Some(Action::Quit),
            _ => None,
        }
    }
}

pub async fn console(config: &ConsoleConfig) -> anyhow::Result<()> {
    let session = Session::connect(config);
    let terminal = Arc::new(Terminal::stdout());
    let indicator = StatusIndicator::new(Arc::clone(&terminal));
    let log_panel = Arc::new(ResultPanel::new(
        panel_label(Endpoint::GetLog),
        Arc::clone(&terminal),
    ));
    let reboot_panel = Arc::new(ResultPanel::new(
        panel_label(Endpoint::RebootGuest),
        Arc::clone(&terminal),
    ));

    info!(host = %config.host_url(), "console started");
    terminal.print(HELP);

    let handle = session.monitor.start();
    let mut health = handle.subscribe();
    indicator.render(*health.borrow_and_update());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut commands = JoinSet::new();
    let mut interrupted = false;

    loop {
        tokio::select! {
            changed = health.changed() => {
                if changed.is_err() {
                    break;
                }
                indicator.render(*health.borrow_and_update());
            }
            Some(joined) = commands.join_next(), if !commands.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "command task failed");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match Action::parse(&line) {
                    Some(Action::Log) => {
                        spawn_command(&mut commands, &session.invoker, Endpoint::GetLog, &log_panel)
                    }
                    Some(Action::Reboot) => spawn_command(
                        &mut commands,
                        &session.invoker,
                        Endpoint::RebootGuest,
                        &reboot_panel,
                    ),
                    Some(Action::Status) => indicator.repaint(handle.state()),
                    Some(Action::Help) => terminal.print(HELP),
                    Some(Action::Quit) => break,
                    None => terminal.print(&format!("unknown command {:?}; {HELP}", line.trim())),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                info!("interrupted");
                interrupted = true;
                break;
            }
        }
    }

    if interrupted {
        commands.abort_all();
    } else if !commands.is_empty() {
        debug!(in_flight = commands.len(), "waiting for running commands");
        while let Some(joined) = commands.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "command task failed");
            }
        }
    }

    handle.stop().await;
    Ok(())
}

/// Fire a command on its own task; overlapping runs are allowed.
fn spawn_command(
    commands: &mut JoinSet<()>,
    invoker: &CommandInvoker<HttpTransport>,
    endpoint: Endpoint,
    panel: &Arc<ResultPanel>,
) {
    let invoker = invoker.clone();
    let panel = Arc::clone(panel);
    commands.spawn(async move {
        invoker.run(endpoint, panel.as_ref()).await;
    });
}
