use thiserror::Error;

/// Top-level error type for the `propdesk-api` crate.
///
/// Covers every failure mode of the HTTP wrapper: session handling,
/// transport, server-side rejections, and payload decoding.
/// `propdesk-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server rejected the bearer token (HTTP 401 / 422). The persisted
    /// session has already been cleared when this is returned.
    #[error("Authentication required -- session expired or invalid")]
    AuthenticationRequired,

    /// Login or registration was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// No response was received (connection refused, DNS failure, reset).
    #[error("Cannot reach {url}: {reason}")]
    Connectivity { url: String, reason: String },

    /// Any other HTTP transport error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Server responses ────────────────────────────────────────────
    /// HTTP 5xx that survived every retry.
    #[error("Server error (HTTP {status}): {}", message.as_deref().unwrap_or("no details"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// Any other non-success status, carrying the server's `msg` / `message`
    /// when the body had one.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no details"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The session store could not be read or written.
    #[error("Session storage error: {0}")]
    Session(String),
}

impl Error {
    /// Returns `true` if this error means the user has to log in again.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::Connectivity { .. } | Self::Server { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } | Self::Api { message, .. } => message.as_deref(),
            Self::Authentication { message } => Some(message),
            _ => None,
        }
    }

    /// The HTTP status behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationRequired => Some(401),
            Self::Server { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
