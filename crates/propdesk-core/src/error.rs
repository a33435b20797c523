// ── Core error types ──
//
// User-facing errors from propdesk-core. Consumers never see raw HTTP
// statuses or JSON parse failures; `CoreError::from_api` translates
// transport-layer errors, filling in a "Failed to <verb> <entity>"
// message when the server didn't supply one. Server faults (5xx) always
// get that generic message; whatever the server said goes to the log.

use thiserror::Error;
use tracing::debug;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Not logged in -- run `propdesk login` first")]
    NotAuthenticated,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{message}")]
    NotFound { message: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{message}")]
    Rejected { message: String },

    #[error("{message} (server error)")]
    ServerFailure { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

/// What was being attempted when a request failed, e.g. `("create", "ticket")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub verb: &'static str,
    pub entity: &'static str,
}

impl Operation {
    pub const fn new(verb: &'static str, entity: &'static str) -> Self {
        Self { verb, entity }
    }

    /// Message shown when the server gave no reason.
    pub fn fallback_message(self) -> String {
        format!("Failed to {} {}", self.verb, self.entity)
    }
}

impl CoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Translate an API error in the context of `op`.
    pub fn from_api(err: propdesk_api::Error, op: Operation) -> Self {
        use propdesk_api::Error as Api;

        match err {
            Api::AuthenticationRequired => Self::NotAuthenticated,
            Api::Authentication { message } => Self::AuthenticationFailed { message },
            Api::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            Api::Connectivity { url, reason } => Self::ConnectionFailed { url, reason },
            Api::Transport(e) => Self::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                reason: e.to_string(),
            },
            Api::InvalidUrl(e) => Self::Internal(format!("Invalid URL: {e}")),
            Api::Server { status, message } => {
                if let Some(detail) = message {
                    debug!(status, %detail, "server fault detail");
                }
                Self::ServerFailure {
                    message: op.fallback_message(),
                }
            }
            Api::Api {
                status: 404,
                message,
            } => Self::NotFound {
                message: message.unwrap_or_else(|| format!("{} not found", op.entity)),
            },
            Api::Api { message, .. } => Self::Rejected {
                message: message.unwrap_or_else(|| op.fallback_message()),
            },
            Api::Deserialization { message, .. } => {
                Self::Internal(format!("Unexpected response: {message}"))
            }
            Api::Session(message) => Self::Internal(format!("Session storage: {message}")),
        }
    }

    /// Returns `true` when the user must log in again.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::AuthenticationFailed { .. }
        )
    }
}

impl From<propdesk_api::Error> for CoreError {
    fn from(err: propdesk_api::Error) -> Self {
        Self::from_api(err, Operation::new("complete", "request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = CoreError::from_api(
            propdesk_api::Error::Api {
                status: 400,
                message: Some("Title already used".into()),
            },
            Operation::new("create", "ticket"),
        );
        assert_eq!(err.to_string(), "Title already used");
    }

    #[test]
    fn fallback_names_verb_and_entity() {
        let err = CoreError::from_api(
            propdesk_api::Error::Server {
                status: 500,
                message: None,
            },
            Operation::new("delete", "room"),
        );
        assert!(matches!(err, CoreError::ServerFailure { .. }));
        assert!(err.to_string().starts_with("Failed to delete room"));

        let err = CoreError::from_api(
            propdesk_api::Error::Api {
                status: 400,
                message: None,
            },
            Operation::new("update", "task"),
        );
        assert_eq!(err.to_string(), "Failed to update task");
    }

    #[test]
    fn server_fault_detail_is_not_shown() {
        let err = CoreError::from_api(
            propdesk_api::Error::Server {
                status: 502,
                message: Some("upstream psycopg2.OperationalError".into()),
            },
            Operation::new("create", "ticket"),
        );
        assert_eq!(err.to_string(), "Failed to create ticket (server error)");
    }

    #[test]
    fn expired_session_maps_to_not_authenticated() {
        let err = CoreError::from(propdesk_api::Error::AuthenticationRequired);
        assert!(err.is_auth());
    }
}
