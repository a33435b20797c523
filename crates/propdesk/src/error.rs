//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use propdesk_config::ConfigError;
use propdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(propdesk::connection_failed),
        help(
            "Check that the API server is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(
        code(propdesk::not_logged_in),
        help("Run: propdesk login --profile {profile}")
    )]
    NotLoggedIn { profile: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(propdesk::auth_failed),
        help(
            "Check the username and password.\n\
             Store a password with: propdesk config set-password --profile {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(propdesk::no_credentials),
        help(
            "Configure credentials with: propdesk config init\n\
             Or set the PROPDESK_USERNAME / PROPDESK_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(propdesk::not_found),
        help("Run: propdesk {list_command} to see what exists")
    )]
    NotFound {
        message: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(propdesk::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(propdesk::server_error),
        help("The server failed after retrying. Try again later or check the server logs.")
    )]
    ServerFailure { message: String },

    #[error("You don't have permission to {action}")]
    #[diagnostic(
        code(propdesk::permission),
        help("Ask a manager or administrator to do this for you.")
    )]
    Permission { action: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(propdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(propdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: propdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(propdesk::no_config),
        help(
            "Create one with: propdesk config init\n\
             Or pass --api-url. Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(propdesk::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(propdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(propdesk::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(propdesk::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(propdesk::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotLoggedIn { .. } | Self::AuthFailed { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to auth errors.
    pub fn for_profile(self, profile: &str) -> Self {
        match self {
            Self::NotLoggedIn { .. } => Self::NotLoggedIn {
                profile: profile.into(),
            },
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: profile.into(),
            },
            other => other,
        }
    }

    /// A not-found error pointing at the matching list command.
    pub fn not_found(err: CoreError, list_command: &str) -> Self {
        match err {
            CoreError::NotFound { message } => Self::NotFound {
                message,
                list_command: list_command.into(),
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => CliError::NotLoggedIn {
                profile: "default".into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound { message } => CliError::NotFound {
                message,
                list_command: "--help".into(),
            },
            CoreError::Validation { field, reason } => CliError::Validation { field, reason },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::ServerFailure { message } => CliError::ServerFailure { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: "(see `propdesk config profiles`)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::from(CoreError::NotAuthenticated).exit_code(), exit_code::AUTH);
        assert_eq!(
            CliError::from(CoreError::Timeout { timeout_secs: 5 }).exit_code(),
            exit_code::TIMEOUT
        );
        assert_eq!(
            CliError::from(CoreError::ConnectionFailed {
                url: "http://x".into(),
                reason: "refused".into(),
            })
            .exit_code(),
            exit_code::CONNECTION
        );
        assert_eq!(
            CliError::from(CoreError::validation("title", "is required")).exit_code(),
            exit_code::USAGE
        );
        assert_eq!(
            CliError::not_found(
                CoreError::NotFound {
                    message: "ticket not found".into()
                },
                "tickets list"
            )
            .exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(CoreError::Rejected {
                message: "nope".into()
            })
            .exit_code(),
            exit_code::GENERAL
        );
        assert_eq!(exit_code::SUCCESS, 0);
    }

    #[test]
    fn profile_is_attached_to_auth_errors() {
        let err = CliError::from(CoreError::NotAuthenticated).for_profile("staging");
        assert!(matches!(err, CliError::NotLoggedIn { ref profile } if profile == "staging"));
    }
}
