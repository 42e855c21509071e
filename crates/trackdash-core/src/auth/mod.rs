// ── Auth gate ──
//
// Authenticated/loading flags for the dashboard, backed by a persisted
// session marker. Persistence is best-effort: storage failures are
// logged and never block login or logout.

mod credentials;
mod store;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

pub use credentials::{CredentialPolicy, StaticCredentials};
pub use store::{FileSessionStore, MemorySessionStore, PersistedAuth, SessionStore};

/// Markers older than this are discarded.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Observable auth flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    /// True until the first [`AuthGate::check_session`] completes.
    pub loading: bool,
    pub username: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            authenticated: false,
            loading: true,
            username: None,
        }
    }
}

/// Guards the dashboard behind a login.
pub struct AuthGate {
    store: Box<dyn SessionStore>,
    credentials: Box<dyn CredentialPolicy>,
    state: watch::Sender<AuthState>,
}

impl AuthGate {
    pub fn new(
        store: impl SessionStore + 'static,
        credentials: impl CredentialPolicy + 'static,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            store: Box::new(store),
            credentials: Box::new(credentials),
            state,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().authenticated
    }

    /// Fail with [`CoreError::NotAuthenticated`] unless logged in.
    pub fn require(&self) -> Result<(), CoreError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    // ── Session restore ──────────────────────────────────────────────

    /// Restore auth from the persisted marker.
    pub fn check_session(&self) -> AuthState {
        self.check_session_at(Utc::now())
    }

    /// [`check_session`](Self::check_session) against an explicit clock.
    pub fn check_session_at(&self, now: DateTime<Utc>) -> AuthState {
        let restored = match self.store.load() {
            Ok(None) => None,
            Ok(Some(marker)) if !marker.is_authenticated => {
                debug!("session marker is not authenticated, discarding");
                self.discard_marker();
                None
            }
            Ok(Some(marker)) if marker.timestamp > now => {
                warn!(since = %marker.timestamp, "session marker dated in the future, discarding");
                self.discard_marker();
                None
            }
            Ok(Some(marker)) if now - marker.timestamp >= TimeDelta::hours(SESSION_TTL_HOURS) => {
                info!(since = %marker.timestamp, "session expired");
                self.discard_marker();
                None
            }
            Ok(Some(marker)) => Some(marker),
            Err(e) => {
                warn!(error = %e, "unreadable session marker, discarding");
                self.discard_marker();
                None
            }
        };

        self.state.send_modify(|s| {
            s.loading = false;
            s.authenticated = restored.is_some();
            s.username = restored.and_then(|m| m.username);
        });
        self.state()
    }

    // ── Login / logout ───────────────────────────────────────────────

    /// Check credentials and, on success, persist a fresh marker.
    pub fn login(&self, username: &str, password: &SecretString) -> bool {
        self.login_at(username, password, Utc::now())
    }

    /// [`login`](Self::login) against an explicit clock.
    pub fn login_at(&self, username: &str, password: &SecretString, now: DateTime<Utc>) -> bool {
        if !self.credentials.verify(username, password) {
            info!(username, "login rejected");
            return false;
        }

        let marker = PersistedAuth {
            is_authenticated: true,
            timestamp: now,
            username: Some(username.to_owned()),
        };
        if let Err(e) = self.store.save(&marker) {
            warn!(error = %e, "failed to persist session marker");
        }

        self.state.send_modify(|s| {
            s.authenticated = true;
            s.loading = false;
            s.username = Some(username.to_owned());
        });
        info!(username, "logged in");
        true
    }

    /// Log out and delete the marker. Safe to call when logged out.
    pub fn logout(&self) {
        self.state.send_modify(|s| {
            s.authenticated = false;
            s.loading = false;
            s.username = None;
        });
        self.discard_marker();
        info!("logged out");
    }

    fn discard_marker(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to remove session marker");
        }
    }
}
