// Property desk HTTP client
//
// Wraps `reqwest::Client` with bearer-token injection, 5xx retries,
// session invalidation on 401/422, and envelope unwrapping. Endpoint
// modules (tickets, tasks, etc.) add inherent methods in separate files
// so this module stays focused on transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::session::{SessionListener, SessionStore};
use crate::transport::{RetryPolicy, TransportConfig};

/// Query parameters as `(name, value)` pairs.
pub type Query<'a> = [(&'a str, String)];

/// How a 401/422 response is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthMode {
    /// Normal request: a rejection invalidates the session.
    Session,
    /// Login-flow request: a rejection is a credential error.
    Exempt,
}

/// Async client for the property desk REST API.
///
/// Every method returns the unwrapped payload: `{ "tickets": [...] }` and
/// bare arrays decode identically, as do `{ "ticket": {...} }` and bare
/// records.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    retry: RetryPolicy,
    session: Arc<dyn SessionStore>,
    listener: Option<Arc<dyn SessionListener>>,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `https://desk.example.com/api`).
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
            retry: transport.retry,
            session,
            listener: None,
        })
    }

    /// Register the hook called after a rejected session has been cleared.
    pub fn with_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session store this client reads its token from.
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL: `{base}/{path}`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a collection, accepting a bare array or `{ plural: [...] }`.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
        plural: &str,
    ) -> Result<Vec<T>, Error> {
        let body = self
            .execute(Method::GET, path, query, None, AuthMode::Session)
            .await?;
        decode_list(&body, plural)
    }

    /// GET a single record, accepting a bare record or `{ singular: {...} }`.
    pub(crate) async fn get_one<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
        singular: &str,
    ) -> Result<T, Error> {
        let body = self
            .execute(Method::GET, path, query, None, AuthMode::Session)
            .await?;
        decode_one(&body, singular)
    }

    /// GET an untyped JSON document.
    pub(crate) async fn get_value(&self, path: &str, query: &Query<'_>) -> Result<Value, Error> {
        let body = self
            .execute(Method::GET, path, query, None, AuthMode::Session)
            .await?;
        parse_value(&body)
    }

    /// Send a JSON body and decode the returned record.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &(impl Serialize + Sync),
        singular: &str,
    ) -> Result<T, Error> {
        let json = to_value(body)?;
        let text = self
            .execute(method, path, &[], Some(&json), AuthMode::Session)
            .await?;
        decode_one(&text, singular)
    }

    /// Send a JSON body and return the raw JSON response.
    pub(crate) async fn send_value(
        &self,
        method: Method,
        path: &str,
        body: &(impl Serialize + Sync),
        mode: AuthMode,
    ) -> Result<Value, Error> {
        let json = to_value(body)?;
        let text = self.execute(method, path, &[], Some(&json), mode).await?;
        parse_value(&text)
    }

    /// DELETE a resource, discarding any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        self.execute(Method::DELETE, path, &[], None, AuthMode::Session)
            .await?;
        Ok(())
    }

    /// Send a request, retrying 5xx responses per the retry policy.
    ///
    /// Returns the raw response body of the first non-5xx success.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &Query<'_>,
        body: Option<&Value>,
        mode: AuthMode,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        let mut attempt = 0;
        loop {
            match self.send_once(&method, &url, query, body, mode).await {
                Err(Error::Server { status, .. }) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        %method, %url, status, attempt, ?delay,
                        "server error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        query: &Query<'_>,
        body: Option<&Value>,
        mode: AuthMode,
    ) -> Result<String, Error> {
        debug!("{method} {url}");

        let mut builder = self.http.request(method.clone(), url.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(json) = body {
            builder = builder.json(json);
        }
        if let Some(session) = self.session.load()? {
            builder = builder.bearer_auth(&session.token);
        }

        let resp = builder.send().await.map_err(|e| self.map_send_error(url, e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_send_error(url, e))?;
        trace!(status = status.as_u16(), len = text.len(), "response received");

        if status.is_success() {
            return Ok(text);
        }

        let message = server_message(&text);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(match mode {
                AuthMode::Exempt => Error::Authentication {
                    message: message.unwrap_or_else(|| fallback_message(status)),
                },
                AuthMode::Session => {
                    self.invalidate_session();
                    Error::AuthenticationRequired
                }
            });
        }

        if status.is_server_error() {
            return Err(Error::Server {
                status: status.as_u16(),
                message,
            });
        }

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn map_send_error(&self, url: &Url, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_connect() || err.is_request() {
            Error::Connectivity {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Clear the stored session and notify the listener.
    fn invalidate_session(&self) {
        warn!("session rejected by server, clearing stored token");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "failed to clear session store");
        }
        if let Some(listener) = &self.listener {
            listener.session_invalidated();
        }
    }
}

// ── Envelope handling ────────────────────────────────────────────────

fn to_value(body: &(impl Serialize + Sync)) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::Deserialization {
        message: format!("failed to encode request body: {e}"),
        body: String::new(),
    })
}

fn parse_value(body: &str) -> Result<Value, Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| deserialization_error(&e, body))
}

fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

/// Decode a list response: either `[...]` or `{ "<plural>": [...] }`.
pub(crate) fn decode_list<T: DeserializeOwned>(body: &str, plural: &str) -> Result<Vec<T>, Error> {
    let value = match parse_value(body)? {
        Value::Object(mut map) if map.get(plural).is_some_and(Value::is_array) => {
            map.remove(plural).unwrap_or(Value::Null)
        }
        Value::Null => Value::Array(Vec::new()),
        other => other,
    };
    serde_json::from_value(value).map_err(|e| deserialization_error(&e, body))
}

/// Decode a single-record response: either `{...}` or `{ "<singular>": {...} }`.
pub(crate) fn decode_one<T: DeserializeOwned>(body: &str, singular: &str) -> Result<T, Error> {
    let value = match parse_value(body)? {
        Value::Object(mut map) if map.get(singular).is_some_and(Value::is_object) => {
            map.remove(singular).unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| deserialization_error(&e, body))
}

/// Extract `msg` or `message` from an error body.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn fallback_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[test]
    fn decode_list_accepts_bare_and_wrapped_arrays() {
        let bare: Vec<Item> = decode_list(r#"[{"id":1},{"id":2}]"#, "items").unwrap();
        let wrapped: Vec<Item> = decode_list(r#"{"items":[{"id":1},{"id":2}]}"#, "items").unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 2);
    }

    #[test]
    fn decode_list_treats_empty_body_as_empty() {
        let items: Vec<Item> = decode_list("", "items").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn decode_one_accepts_bare_and_wrapped_records() {
        let bare: Item = decode_one(r#"{"id":7}"#, "item").unwrap();
        let wrapped: Item = decode_one(r#"{"item":{"id":7}}"#, "item").unwrap();
        assert_eq!(bare, Item { id: 7 });
        assert_eq!(wrapped, Item { id: 7 });
    }

    #[test]
    fn decode_reports_body_on_failure() {
        let err = decode_one::<Item>("not json", "item").unwrap_err();
        match err {
            Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn server_message_prefers_msg_then_message() {
        assert_eq!(server_message(r#"{"msg":"bad"}"#).as_deref(), Some("bad"));
        assert_eq!(
            server_message(r#"{"message":"worse"}"#).as_deref(),
            Some("worse")
        );
        assert_eq!(server_message("<html>"), None);
    }
}
