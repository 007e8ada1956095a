//! Session types and the identity collaborator contract.
//!
//! Ember does not negotiate authentication itself; a signed-in session is
//! handed to it. Everything that needs an identity or a token receives a
//! [`SessionProvider`] explicitly rather than reading ambient global state,
//! which keeps the sync engine deterministic and unit-testable without a
//! signed-in user.

use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

const EXPIRY_SKEW_SECONDS: i64 = 60;

/// A signed-in user session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable user identifier; scopes every store operation
    pub user_id: String,
    /// Bearer token presented to the remote store
    pub access_token: String,
    /// Unix seconds the token expires at; `None` means no known expiry
    pub expires_at: Option<i64>,
}

impl Session {
    /// Create a session with no known expiry
    #[must_use]
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            expires_at: None,
        }
    }

    /// Whether the token is expired (with a small skew so near-expired
    /// tokens are not presented)
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| at <= chrono::Utc::now().timestamp() + EXPIRY_SKEW_SECONDS)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Supplies the current session, if any.
pub trait SessionProvider: Send + Sync {
    /// The current session, expired or not; callers decide how to treat
    /// expiry
    fn current(&self) -> Option<Session>;

    /// The current non-expired session
    fn active(&self) -> Option<Session> {
        self.current().filter(|session| !session.is_expired())
    }
}

/// Thread-safe in-process session holder.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Create a store holding the given session
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }

    /// Install or replace the session
    pub fn set(&self, session: Session) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(session);
        }
    }

    /// Drop the session (sign-out)
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

impl SessionProvider for SessionStore {
    fn current(&self) -> Option<Session> {
        self.inner.read().map(|guard| guard.clone()).unwrap_or(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug_redacts_token() {
        let session = Session::new("user-1", "secret-token");
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn session_without_expiry_never_expires() {
        let session = Session::new("user-1", "token");
        assert!(!session.is_expired());
    }

    #[test]
    fn session_expiry_applies_skew() {
        let mut session = Session::new("user-1", "token");
        session.expires_at = Some(chrono::Utc::now().timestamp() + 10);
        assert!(session.is_expired());

        session.expires_at = Some(chrono::Utc::now().timestamp() + 600);
        assert!(!session.is_expired());
    }

    #[test]
    fn store_set_and_clear() {
        let store = SessionStore::default();
        assert_eq!(store.current(), None);

        store.set(Session::new("user-1", "token"));
        assert_eq!(store.current().unwrap().user_id, "user-1");

        store.clear();
        assert_eq!(store.current(), None);
    }

    #[test]
    fn active_filters_expired_sessions() {
        let mut session = Session::new("user-1", "token");
        session.expires_at = Some(0);
        let store = SessionStore::with_session(session);

        assert!(store.current().is_some());
        assert!(store.active().is_none());
    }
}
