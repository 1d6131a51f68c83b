//! `rconsole watch` — run the health monitor and repaint the indicator on change.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use rconsole_core::ConsoleConfig;

use super::Session;
use crate::panel::{StatusIndicator, Terminal};

pub async fn watch(config: &ConsoleConfig) -> anyhow::Result<()> {
    let session = Session::connect(config);
    let indicator = StatusIndicator::new(Arc::new(Terminal::stdout()));

    let handle = session.monitor.start();
    let mut health = handle.subscribe();
    indicator.render(*health.borrow_and_update());

    loop {
        tokio::select! {
            changed = health.changed() => {
                if changed.is_err() {
                    break;
                }
                indicator.render(*health.borrow_and_update());
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                info!("interrupted");
                break;
            }
        }
    }

    handle.stop().await;
    Ok(())
}
