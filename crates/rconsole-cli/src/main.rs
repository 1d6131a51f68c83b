use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use rconsole_core::{ConsoleConfig, Endpoint};

mod commands;
mod panel;

const DEFAULT_CONFIG_FILE: &str = "rconsole.toml";

#[derive(Parser)]
#[command(
    name = "rconsole",
    about = "Remote console — fetch the host log, reboot the guest, watch host health",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Config file (default: ./rconsole.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Host base URL, e.g. http://127.0.0.1:3000
    #[arg(long, global = true)]
    host: Option<String>,

    /// Health poll period (e.g. 1s, 500ms)
    #[arg(long, global = true)]
    interval: Option<String>,

    /// Give up on a request after this long (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console: live health indicator plus log/reboot commands
    Console,
    /// Show the health indicator and update it as the host comes and goes
    Watch,
    /// Fetch the host log
    Log,
    /// Reboot the guest
    Reboot,
    /// Probe host health once (exit code 0 when up)
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "warn,rconsole=debug"
    } else {
        "warn,rconsole=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = load_config(cli.config.as_deref())?
        .with_overrides(cli.host, cli.interval, cli.timeout)
        .context("invalid command-line option")?;

    match cli.command {
        Commands::Console => commands::console::console(&config).await.map(|()| ExitCode::SUCCESS),
        Commands::Watch => commands::watch::watch(&config).await.map(|()| ExitCode::SUCCESS),
        Commands::Log => commands::oneshot::command(&config, Endpoint::GetLog).await,
        Commands::Reboot => commands::oneshot::command(&config, Endpoint::RebootGuest).await,
        Commands::Status => commands::oneshot::status(&config).await,
    }
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConsoleConfig> {
    match explicit {
        Some(path) => ConsoleConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                ConsoleConfig::from_file(default)
                    .with_context(|| format!("failed to load config {DEFAULT_CONFIG_FILE}"))
            } else {
                Ok(ConsoleConfig::default())
            }
        }
    }
}
