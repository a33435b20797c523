// ── Auth context ──
//
// The single piece of cross-view state. Holds the current session in a
// watch channel so views can react to login / logout, and plugs into the
// API client as its `SessionListener` so a rejected token tears the
// in-memory state down along with the persisted record.

use std::sync::Arc;

use propdesk_api::{Session, SessionListener, SessionStore};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::CoreError;

/// Shared authentication state. Cheaply cloneable.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<Option<Session>>,
}

impl AuthContext {
    /// Build the context, reading the persisted session once.
    pub fn load(store: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let initial = store.load()?;
        let (state, _) = watch::channel(initial);
        Ok(Self {
            inner: Arc::new(AuthInner { store, state }),
        })
    }

    /// Persist `session` and publish it.
    pub fn login(&self, session: Session) -> Result<(), CoreError> {
        self.inner.store.save(&session)?;
        info!(username = %session.username, "logged in");
        self.inner.state.send_replace(Some(session));
        Ok(())
    }

    /// Forget the session, both persisted and in memory.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.inner.store.clear()?;
        if self.inner.state.send_replace(None).is_some() {
            info!("logged out");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .map(|s| s.username.clone())
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.state.subscribe()
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.inner.store)
    }
}

impl SessionListener for AuthContext {
    fn session_invalidated(&self) {
        warn!("session invalidated by server");
        self.inner.state.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use propdesk_api::MemorySessionStore;

    use super::*;

    #[test]
    fn starts_from_persisted_session() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", "demo")));
        let auth = AuthContext::load(store).unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.username().as_deref(), Some("demo"));
    }

    #[test]
    fn login_and_logout_update_store_and_subscribers() {
        let store = Arc::new(MemorySessionStore::new());
        let auth = AuthContext::load(store.clone()).unwrap();
        let mut rx = auth.subscribe();
        assert!(!auth.is_authenticated());

        auth.login(Session::new("tok", "maria")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().token, "tok");
        assert_eq!(store.load().unwrap().unwrap().username, "maria");

        auth.logout().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn invalidation_clears_memory_state() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", "demo")));
        let auth = AuthContext::load(store).unwrap();
        auth.session_invalidated();
        assert!(auth.current().is_none());
    }
}
