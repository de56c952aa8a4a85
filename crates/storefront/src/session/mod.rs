//! Client session state.
//!
//! The session holds the shopper's token and the identity read from it. It
//! is the only mutable state shared between views, so access is split:
//!
//! - [`SessionReader`] is handed to every view; it can look but not touch
//! - [`SessionWriter`] is held by the login/logout actions (and the router,
//!   which invalidates the session after an authorization failure)
//!
//! Both sit on a `tokio::sync::watch` channel, so anything interested in
//! sign-in changes (the nav bar, a background task) can `subscribe()`.
//!
//! The token is persisted under [`keys::TOKEN`] so that a restart restores
//! the session without signing in again. Nothing here checks whether the
//! token is still valid; an expired token is discovered when a backend
//! rejects it.

pub mod token;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use multivendor_core::{Email, Role};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::storage::{SharedStorage, keys};

pub use token::{TokenClaims, TokenError, decode_claims};

/// Identity of the signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: Email,
    pub role: Role,
    /// Expiry claimed by the token, for display only.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Snapshot of the session.
///
/// `is_authenticated()` is derived from the token, so the two can never
/// disagree.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
    user: Option<SessionUser>,
}

impl Session {
    /// A signed-out session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A signed-in session for `token`.
    ///
    /// The user is read from the token payload; a token whose payload lacks
    /// an email or a known role still signs the shopper in, without a user.
    #[must_use]
    pub fn signed_in(token: SecretString) -> Self {
        let user = match decode_claims(token.expose_secret()) {
            Ok(TokenClaims {
                email: Some(email),
                role: Some(role),
                expires_at,
            }) => Some(SessionUser {
                email,
                role,
                expires_at,
            }),
            Ok(_) => {
                tracing::warn!("Session token has no usable email/role claims");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session token payload could not be read");
                None
            }
        };

        Self {
            token: Some(token),
            user,
        }
    }

    /// Whether a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// The signed-in user, if the token identified one.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// The signed-in user's role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Owner of the session channel. Hands out readers and writers.
pub struct SessionStore {
    sender: Arc<watch::Sender<Session>>,
    storage: SharedStorage,
}

impl SessionStore {
    /// Build the store from whatever token was persisted last.
    ///
    /// A storage read failure starts the shopper signed out.
    #[must_use]
    pub fn restore(storage: SharedStorage) -> Self {
        let session = match storage.get(keys::TOKEN) {
            Ok(Some(token)) if !token.trim().is_empty() => {
                tracing::info!("Restored persisted session");
                Session::signed_in(SecretString::from(token))
            }
            Ok(_) => Session::signed_out(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session, starting signed out");
                Session::signed_out()
            }
        };

        let (sender, _) = watch::channel(session);
        Self {
            sender: Arc::new(sender),
            storage,
        }
    }

    /// Read-only handle for views.
    #[must_use]
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            sender: Arc::clone(&self.sender),
        }
    }

    /// Write handle for the login/logout actions.
    #[must_use]
    pub fn writer(&self) -> SessionWriter {
        SessionWriter {
            sender: Arc::clone(&self.sender),
            storage: Arc::clone(&self.storage),
        }
    }
}

/// Read-only view of the session.
#[derive(Clone)]
pub struct SessionReader {
    sender: Arc<watch::Sender<Session>>,
}

impl SessionReader {
    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.sender.borrow().clone()
    }

    /// Current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.sender.borrow().token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_authenticated()
    }

    #[must_use]
    pub fn user(&self) -> Option<SessionUser> {
        self.sender.borrow().user.clone()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.sender.borrow().role()
    }

    /// Receiver that wakes on every later login, logout or invalidation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }
}

/// Write access to the session.
#[derive(Clone)]
pub struct SessionWriter {
    sender: Arc<watch::Sender<Session>>,
    storage: SharedStorage,
}

impl SessionWriter {
    /// Sign in with `token`, persist it, and notify subscribers.
    ///
    /// Returns the new session. A persistence failure is logged and does not
    /// undo the sign-in.
    pub fn login(&self, token: SecretString) -> Session {
        if let Err(e) = self.storage.set(keys::TOKEN, token.expose_secret()) {
            tracing::warn!(error = %e, "Failed to persist session token");
        }

        let session = Session::signed_in(token);
        match session.user() {
            Some(user) => {
                crate::error::set_sentry_user(&user.email, user.role);
                tracing::info!(email = %user.email, role = %user.role, "Signed in");
            }
            None => tracing::info!("Signed in without identity claims"),
        }

        self.sender.send_replace(session.clone());
        session
    }

    /// Sign out: clear the session and every per-shopper storage key.
    pub fn logout(&self) {
        self.clear();
        tracing::info!("Signed out");
    }

    /// Drop a session the backend refused. Same effect as [`logout`](Self::logout).
    pub fn invalidate(&self) {
        if self.sender.borrow().is_authenticated() {
            self.clear();
            tracing::warn!("Session invalidated after an authorization failure");
        }
    }

    fn clear(&self) {
        for key in [keys::TOKEN, keys::WISHLIST, keys::CART] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(error = %e, key, "Failed to clear persisted session data");
            }
        }
        crate::error::clear_sentry_user();
        self.sender.send_replace(Session::signed_out());
    }
}
