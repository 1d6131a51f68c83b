//! Terminal display surfaces: one result panel per action plus the status
//! indicator. All of them print through a shared [`Terminal`] so lines
//! from concurrent tasks never interleave mid-line.

use std::io::Write;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use rconsole_client::DisplaySurface;
use rconsole_core::{HealthState, Indicator};

/// Line-oriented output shared by every surface.
pub struct Terminal {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Terminal {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Write `text` as one block; a poisoned or closed writer drops it.
    pub fn print(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }
}

/// Result area for a single action (`log`, `reboot`).
pub struct ResultPanel {
    label: &'static str,
    terminal: Arc<Terminal>,
    last: Mutex<Option<String>>,
}

impl ResultPanel {
    pub fn new(label: &'static str, terminal: Arc<Terminal>) -> Self {
        Self {
            label,
            terminal,
            last: Mutex::new(None),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Text most recently shown on this panel.
    pub fn last_text(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

impl DisplaySurface for ResultPanel {
    fn show(&self, text: &str) {
        if let Ok(mut last) = self.last.lock() {
            *last = Some(text.to_string());
        }
        let header = format!("── {} ──", self.label).bold();
        self.terminal.print(&format!("{header}\n{text}"));
    }
}

/// Coloured dot reflecting the monitor's [`HealthState`].
pub struct StatusIndicator {
    terminal: Arc<Terminal>,
    shown: Mutex<Option<Indicator>>,
}

impl StatusIndicator {
    pub fn new(terminal: Arc<Terminal>) -> Self {
        Self {
            terminal,
            shown: Mutex::new(None),
        }
    }

    /// Repaint if the visual differs from what is on screen. Returns whether it repainted.
    pub fn render(&self, state: HealthState) -> bool {
        let indicator = Indicator::for_state(state);
        let Ok(mut shown) = self.shown.lock() else {
            return false;
        };
        if *shown == Some(indicator) {
            return false;
        }
        *shown = Some(indicator);
        drop(shown);

        self.terminal.print(&format_indicator(state));
        true
    }

    /// Repaint unconditionally (the `status` command).
    pub fn repaint(&self, state: HealthState) {
        if let Ok(mut shown) = self.shown.lock() {
            *shown = Some(Indicator::for_state(state));
        }
        self.terminal.print(&format_indicator(state));
    }

    pub fn shown(&self) -> Option<Indicator> {
        self.shown.lock().ok().and_then(|shown| *shown)
    }
}

pub fn format_indicator(state: HealthState) -> String {
    let dot = match Indicator::for_state(state) {
        Indicator::Neutral => "●".dimmed(),
        Indicator::Green => "●".green().bold(),
        Indicator::Red => "●".red().bold(),
    };
    format!("{dot} host {}", state.label())
}
