//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use propdesk_core::models::{Id, Priority, Role, Task, TaskStatus};
use propdesk_core::{LoadToken, ReportData, ReportQuery};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { id: Id, title: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteTask { title, .. } => write!(f, "Delete task \"{title}\"?"),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Session ───────────────────────────────────────────────────
    SessionVerified { username: String, role: Option<Role> },
    SessionLost(String),

    // ── Loading ───────────────────────────────────────────────────
    /// Ask the active screen to reload.
    Refresh,
    FetchTasks(LoadToken),
    TasksLoaded {
        token: LoadToken,
        result: Result<Vec<Task>, String>,
    },
    FetchReport {
        token: LoadToken,
        query: ReportQuery,
    },
    ReportLoaded {
        token: LoadToken,
        result: Result<Arc<ReportData>, String>,
    },

    // ── Task commands ─────────────────────────────────────────────
    MoveTask { task_id: Id, status: TaskStatus },
    TaskMoved {
        task_id: Id,
        result: Result<Task, String>,
    },
    CreateTask { title: String, status: TaskStatus },
    TaskCreated(Result<Task, String>),
    SetTaskPriority { task: Box<Task>, priority: Priority },
    TaskUpdated(Result<Task, String>),
    TaskDeleted(Result<Id, String>),

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
