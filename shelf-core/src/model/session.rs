//! ``src/model/session.rs``
//! ============================================================================
//! # `Session`: shared handle over the auth state and the stored token
//!
//! The HTTP backend reads the token from here for every request, and any
//! store that sees an authorization failure calls [`Session::expire`]. Expiry
//! is idempotent: only the first call after a sign-in reports a transition.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::api::token_store::TokenStore;
use crate::model::auth_state::AuthState;

#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<RwLock<AuthState>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState::default())),
            store,
        }
    }

    /// Pick up a token persisted by an earlier run. Returns whether the
    /// session is now authenticated.
    pub fn restore(&self) -> bool {
        let Some(token) = self.store.load() else {
            return false;
        };
        info!("Restored session token from storage");
        *self.state.write() = AuthState::signed_in(token);
        true
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut AuthState),
    {
        f(&mut self.state.write());
    }

    /// Install a token from a successful login or registration.
    pub fn establish(&self, token: String) {
        if let Err(e) = self.store.save(&token) {
            warn!("Failed to persist session token: {}", e);
        }
        *self.state.write() = AuthState::signed_in(token);
    }

    /// Drop the session after an authorization failure.
    ///
    /// Returns `true` only for the call that actually signed the user out;
    /// repeated failures from requests already in flight return `false`.
    pub fn expire(&self) -> bool {
        let state = self.state.write();
        if !state.is_authenticated && state.token.is_none() {
            return false;
        }
        self.sign_out_expired(state)
    }

    /// Like [`Session::expire`], for a request sent with `issued_with`.
    /// A rejection of a token that has since been replaced leaves the
    /// current session alone.
    pub fn expire_issued(&self, issued_with: Option<&str>) -> bool {
        let state = self.state.write();
        if !state.is_authenticated && state.token.is_none() {
            return false;
        }
        if state.token.as_deref() != issued_with {
            debug!("401 for a replaced token; session kept");
            return false;
        }
        self.sign_out_expired(state)
    }

    /// A signed-in session now holds a different token than `issued_with`.
    pub fn is_replaced(&self, issued_with: Option<&str>) -> bool {
        self.state
            .read()
            .token
            .as_deref()
            .is_some_and(|current| Some(current) != issued_with)
    }

    fn sign_out_expired(&self, mut state: RwLockWriteGuard<'_, AuthState>) -> bool {
        *state = AuthState {
            expired: true,
            ..AuthState::default()
        };
        drop(state);

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored token: {}", e);
        }
        info!("Session expired; signed out");
        true
    }

    /// User-initiated sign out.
    pub fn logout(&self) {
        *self.state.write() = AuthState::default();
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored token: {}", e);
        }
    }
}
