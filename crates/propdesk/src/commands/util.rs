//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;

use propdesk_core::models::{Id, Priority, TaskStatus};

use crate::cli::{GlobalOpts, PriorityArg, TaskStatusArg};
use crate::config::Resolved;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read a secret from the terminal without echo.
pub fn prompt_secret(label: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// The property a scoped command works on.
pub fn require_property(resolved: &Resolved) -> Result<Id, CliError> {
    resolved.property().ok_or_else(|| CliError::Validation {
        field: "property".into(),
        reason: "pass --property or set `property` on the profile".into(),
    })
}

pub fn priority(arg: PriorityArg) -> Priority {
    match arg {
        PriorityArg::Low => Priority::Low,
        PriorityArg::Medium => Priority::Medium,
        PriorityArg::High => Priority::High,
        PriorityArg::Critical => Priority::Critical,
    }
}

pub fn task_status(arg: TaskStatusArg) -> TaskStatus {
    match arg {
        TaskStatusArg::Pending => TaskStatus::Pending,
        TaskStatusArg::InProgress => TaskStatus::InProgress,
        TaskStatusArg::Completed => TaskStatus::Completed,
    }
}

// ── Spinner ─────────────────────────────────────────────────────────

fn spinner(global: &GlobalOpts, message: &str) -> Option<ProgressBar> {
    if global.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

/// Await `fut` behind a spinner on interactive terminals.
pub async fn with_spinner<F, T>(global: &GlobalOpts, message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let bar = spinner(global, message);
    let out = fut.await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    out
}
