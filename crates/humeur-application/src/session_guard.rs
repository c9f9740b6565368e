//! The check gating access to the protected screen.

use std::sync::Arc;

use tracing::info;

use humeur_core::error::Result;
use humeur_core::session::{SessionService, SessionState};

/// Gates the protected screen on token presence.
///
/// Runs once per screen mount; the token store is never polled afterwards.
/// Session expiry after mount is reported by the sentiment flow's own request
/// failures.
pub struct SessionGuard {
    session: Arc<SessionService>,
}

impl SessionGuard {
    pub fn new(session: Arc<SessionService>) -> Self {
        Self { session }
    }

    /// Reads the token store exactly once and returns the resulting state.
    pub fn check(&self) -> Result<SessionState> {
        let state = self.session.mount()?;
        if !state.is_authenticated() {
            info!("no stored session, showing unauthenticated view");
        }
        Ok(state)
    }

    /// The "re-login" action of the unauthenticated placeholder: clears any
    /// stale stored state before returning to the entry point.
    pub fn relogin(&self) -> Result<()> {
        self.session.teardown()
    }
}
