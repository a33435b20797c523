//! `propdesk-tui` — terminal kanban board and reports for the property desk.
//!
//! Built on [ratatui](https://ratatui.rs). Two screens, switched with `1`/`2`
//! or Tab: the task board (keyboard drag and drop) and the report view
//! (tickets, tasks, or service requests with a related-items popup).
//!
//! Logs go to a file under the platform data directory so the terminal is
//! never corrupted. The session comes from `propdesk login`; this binary
//! never prompts for credentials.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use propdesk_config::{Connection, Profile};
use propdesk_core::Desk;

use crate::app::App;

/// Terminal kanban board and reports for the property desk service.
#[derive(Parser, Debug)]
#[command(name = "propdesk-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short, long, env = "PROPDESK_PROFILE")]
    profile: Option<String>,

    /// API base URL (overrides the profile)
    #[arg(long, env = "PROPDESK_API_URL")]
    api_url: Option<String>,

    /// Property to scope the board and reports to
    #[arg(short = 'P', long, env = "PROPDESK_PROPERTY")]
    property: Option<i64>,

    /// Request timeout in seconds
    #[arg(long, env = "PROPDESK_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path (defaults to the propdesk log directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Logging to stdout/stderr would corrupt the UI.
/// The returned guard flushes the writer when dropped.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "propdesk_tui={log_level},propdesk_core={log_level},propdesk_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| propdesk_config::log_dir().join("propdesk-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .map_or_else(|| "propdesk-tui.log".into(), std::ffi::OsStr::to_os_string);

    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the profile, overlay flags, and open the persisted session.
fn build_desk(cli: &Cli) -> Result<(Desk, Connection)> {
    let cfg = propdesk_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());

    let profile = match (cfg.profiles.get(&profile_name), cli.api_url.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(url)) => Profile {
            api_url: url.into(),
            ..Profile::default()
        },
        (None, None) => {
            return Err(eyre!(
                "no profile '{profile_name}' in {}; run `propdesk config init` or pass --api-url",
                propdesk_config::config_path().display()
            ));
        }
    };

    let mut connection = Connection::from_profile(&profile, &profile_name, &cfg.defaults)
        .wrap_err("invalid profile")?;
    if let Some(url) = cli.api_url.as_deref() {
        connection.api_url = propdesk_config::parse_api_url(url)?;
    }
    if let Some(secs) = cli.timeout {
        connection.timeout = Duration::from_secs(secs);
    }
    if cli.property.is_some() {
        connection.property = cli.property;
    }

    let desk = Desk::new(
        connection.api_url.clone(),
        &connection.transport(),
        Arc::new(connection.session_store()),
    )?;

    if !desk.auth().is_authenticated() {
        return Err(eyre!(
            "not logged in on profile '{profile_name}'; run `propdesk login` first"
        ));
    }

    Ok((desk, connection))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first, so a panic during setup still restores the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let (desk, connection) = build_desk(&cli)?;
    info!(
        profile = %connection.profile_name,
        api_url = %connection.api_url,
        property = ?connection.property,
        "starting propdesk-tui"
    );

    let mut app = App::new(desk, connection.property);
    app.run().await?;

    Ok(())
}
