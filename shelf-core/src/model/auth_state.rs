//! ``src/model/auth_state.rs``
//! Authentication flags shown by the auth view and used to gate the UI.

use crate::error::OpError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Opaque bearer token, sent on every movie request.
    pub token: Option<String>,

    pub is_authenticated: bool,

    /// A login or register request is in flight.
    pub loading: bool,

    pub error: Option<OpError>,

    /// Set when the last sign-out was forced by an authorization failure.
    pub expired: bool,
}

impl AuthState {
    /// Authenticated state for a freshly issued token.
    pub fn signed_in(token: String) -> Self {
        Self {
            token: Some(token),
            is_authenticated: true,
            ..Self::default()
        }
    }
}
