// Session persistence seam
//
// The HTTP client never owns the auth token. It reads it from a
// `SessionStore` on every request, and reports invalidation to an
// optional `SessionListener`. The config crate provides a file-backed
// store; `MemorySessionStore` serves tests and ephemeral use.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// The persisted auth record: bearer token plus the username it belongs to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(alias = "user", deserialize_with = "name_or_user_record")]
    pub username: String,
}

/// `user` may be stored as a bare name or as the user record itself.
fn name_or_user_record<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UserField {
        Name(String),
        Record { username: String },
    }

    Ok(match UserField::deserialize(deserializer)? {
        UserField::Name(name) | UserField::Record { username: name } => name,
    })
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[redacted]")
            .field("username", &self.username)
            .finish()
    }
}

/// Storage for the single session record.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, Error>;
    fn save(&self, session: &Session) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// Hook invoked after the client has cleared a rejected session.
pub trait SessionListener: Send + Sync {
    fn session_invalidated(&self);
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, Error> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| Error::Session("session lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<(), Error> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::Session("session lock poisoned".into()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::Session("session lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn memory_store_round_trips_and_clears() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&Session::new("abc", "demo")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "abc");
        assert_eq!(loaded.username, "demo");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn user_may_be_a_name_or_a_record() {
        let named: Session = serde_json::from_str(r#"{"token":"abc","user":"demo"}"#).unwrap();
        let record: Session =
            serde_json::from_str(r#"{"token":"abc","user":{"id":7,"username":"demo"}}"#).unwrap();
        let canonical: Session =
            serde_json::from_str(r#"{"token":"abc","username":"demo"}"#).unwrap();
        assert_eq!(named, Session::new("abc", "demo"));
        assert_eq!(record, named);
        assert_eq!(canonical, named);
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", Session::new("secret-token", "demo"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("demo"));
    }
}
