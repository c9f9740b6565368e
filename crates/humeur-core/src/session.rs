//! Session state machine and token ownership.
//!
//! The session token is exclusively owned by a [`TokenStore`]; the rest of
//! the application only ever sees it through the [`SessionService`], which is
//! the single source of truth for "is there a valid session". Screens react
//! to teardown through a watch subscription instead of polling the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::Result;

/// Whether the client currently holds a session.
///
/// Modeled as an explicit tagged variant rather than a boolean flag so the
/// teardown transition is visible to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionState {
    /// No token is stored; only the login screen is reachable.
    Unauthenticated,
    /// A token is stored and attached to every protected request.
    Authenticated { token: String },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The session token, when authenticated.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token } => Some(token),
            Self::Unauthenticated => None,
        }
    }
}

/// Persistent storage for the session token.
///
/// At most one token value is stored at a time. Implementations must make
/// `store` visible to any subsequent `load` before returning, and `clear`
/// must be idempotent.
pub trait TokenStore: Send + Sync {
    /// Reads the stored token. An absent or empty token reads as `None`.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored token.
    fn store(&self, token: &str) -> Result<()>;

    /// Deletes any stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// The session-state service shared by every screen.
///
/// Wraps the token store with an explicit read/write/clear contract and a
/// watch channel so controllers observe teardown without re-reading the
/// store.
pub struct SessionService {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

impl SessionService {
    /// Creates a service over the given store. The initial state is
    /// `Unauthenticated` until [`mount`](Self::mount) consults the store.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self { store, state }
    }

    /// The session guard check: reads the token store exactly once and
    /// publishes the resulting state.
    ///
    /// Called on protected-screen mount only; expiry after mount is detected
    /// reactively by request failures, never by polling.
    pub fn mount(&self) -> Result<SessionState> {
        let state = match self.store.load()? {
            Some(token) => SessionState::Authenticated { token },
            None => SessionState::Unauthenticated,
        };
        debug!(authenticated = state.is_authenticated(), "session mount check");
        self.state.send_replace(state.clone());
        Ok(state)
    }

    /// Persists a freshly issued token and flips to `Authenticated`.
    ///
    /// The store write completes before the state transition is published, so
    /// a screen reacting to the transition always finds the token present.
    pub fn establish(&self, token: &str) -> Result<()> {
        self.store.store(token)?;
        info!("session established");
        self.state.send_replace(SessionState::Authenticated {
            token: token.to_string(),
        });
        Ok(())
    }

    /// Clears the stored token and flips to `Unauthenticated`. Idempotent:
    /// tearing down an already-empty session is a no-op with the same end
    /// state.
    pub fn teardown(&self) -> Result<()> {
        self.store.clear()?;
        info!("session torn down");
        self.state.send_replace(SessionState::Unauthenticated);
        Ok(())
    }

    /// The current in-memory state, as last published.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Re-reads the token from the store, bypassing the in-memory state.
    ///
    /// Protected requests use this instead of [`current`](Self::current): the
    /// store is the source of truth and may have expired since mount.
    pub fn stored_token(&self) -> Result<Option<String>> {
        self.store.load()
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory store for exercising the service without touching disk.
    struct MemoryStore {
        token: Mutex<Option<String>>,
    }

    impl MemoryStore {
        fn new(token: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                token: Mutex::new(token.map(String::from)),
            })
        }
    }

    impl TokenStore for MemoryStore {
        fn load(&self) -> Result<Option<String>> {
            Ok(self.token.lock().unwrap().clone())
        }

        fn store(&self, token: &str) -> Result<()> {
            *self.token.lock().unwrap() = Some(token.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            *self.token.lock().unwrap() = None;
            Ok(())
        }
    }

    #[test]
    fn test_mount_without_token() {
        let service = SessionService::new(MemoryStore::new(None));
        let state = service.mount().unwrap();
        assert_eq!(state, SessionState::Unauthenticated);
        assert!(!service.current().is_authenticated());
    }

    #[test]
    fn test_mount_with_token() {
        let service = SessionService::new(MemoryStore::new(Some("abc123")));
        let state = service.mount().unwrap();
        assert_eq!(state.token(), Some("abc123"));
        assert!(service.current().is_authenticated());
    }

    #[test]
    fn test_establish_then_mount() {
        let store = MemoryStore::new(None);
        let service = SessionService::new(store.clone());
        service.establish("abc123").unwrap();

        // the protected screen is reachable on next mount
        assert!(service.mount().unwrap().is_authenticated());
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let store = MemoryStore::new(Some("abc123"));
        let service = SessionService::new(store.clone());
        service.mount().unwrap();

        service.teardown().unwrap();
        service.teardown().unwrap();

        assert_eq!(service.current(), SessionState::Unauthenticated);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_subscriber_sees_teardown() {
        let service = SessionService::new(MemoryStore::new(Some("abc123")));
        service.mount().unwrap();

        let rx = service.subscribe();
        service.teardown().unwrap();
        assert_eq!(*rx.borrow(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_stored_token_bypasses_state() {
        let store = MemoryStore::new(Some("abc123"));
        let service = SessionService::new(store.clone());
        service.mount().unwrap();

        // token vanishes behind the service's back (expiry between mount and
        // request)
        store.clear().unwrap();
        assert!(service.stored_token().unwrap().is_none());
        assert!(service.current().is_authenticated());
    }
}
