//! ``src/controller/auth_store.rs``
//! Login, registration and logout on top of the shared [`Session`].

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::api::backend::{LoginRequest, MovieBackend, RegisterRequest};
use crate::controller::movie_store::MovieStore;
use crate::error::OpError;
use crate::model::auth_state::AuthState;
use crate::model::session::Session;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const NAME_REQUIRED: &str = "Name is required";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

#[derive(Debug, Clone)]
pub struct AuthStore {
    backend: Arc<dyn MovieBackend>,
    session: Session,
    movies: MovieStore,
}

impl AuthStore {
    pub const fn new(backend: Arc<dyn MovieBackend>, session: Session, movies: MovieStore) -> Self {
        Self {
            backend,
            session,
            movies,
        }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> AuthState {
        self.session.snapshot()
    }

    /// Pick up a token saved by a previous run.
    pub fn restore(&self) -> bool {
        self.session.restore()
    }

    #[instrument(level = "info", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(), OpError> {
        let mut problems = Vec::new();
        if email.trim().is_empty() {
            problems.push(EMAIL_REQUIRED);
        }
        if password.is_empty() {
            problems.push(PASSWORD_REQUIRED);
        }
        if !problems.is_empty() {
            return Err(self.reject(OpError::validation(problems)));
        }

        let request = LoginRequest {
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };
        self.begin();
        match self.backend.login(&request).await {
            Ok(token) => {
                info!("logged in");
                self.session.establish(token);
                Ok(())
            }
            Err(e) => Err(self.reject(e.into())),
        }
    }

    /// Password confirmation is checked here and never sent unless it matches.
    #[instrument(level = "info", skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<(), OpError> {
        let problems = register_problems(&request);
        if !problems.is_empty() {
            return Err(self.reject(OpError::validation(problems)));
        }

        self.begin();
        match self.backend.register(&request).await {
            Ok(token) => {
                info!("registered and logged in");
                self.session.establish(token);
                Ok(())
            }
            Err(e) => Err(self.reject(e.into())),
        }
    }

    /// Drop the token and everything loaded under it.
    pub fn logout(&self) {
        self.session.logout();
        self.movies.reset();
        info!("logged out");
    }

    pub fn clear_error(&self) {
        self.session.update(|s| s.error = None);
    }

    fn begin(&self) {
        self.session.update(|s| {
            s.loading = true;
            s.error = None;
            s.expired = false;
        });
    }

    fn reject(&self, err: OpError) -> OpError {
        warn!(error = %err, "authentication failed");
        let recorded = err.clone();
        self.session.update(|s| {
            s.loading = false;
            s.error = Some(recorded);
        });
        err
    }
}

pub fn register_problems(request: &RegisterRequest) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if request.name.trim().is_empty() {
        problems.push(NAME_REQUIRED);
    }
    if request.email.trim().is_empty() {
        problems.push(EMAIL_REQUIRED);
    }
    if request.password.is_empty() {
        problems.push(PASSWORD_REQUIRED);
    } else if request.password != request.confirm_password {
        problems.push(PASSWORD_MISMATCH);
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            email: "a@b.c".into(),
            name: "Ann".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn mismatch_is_reported() {
        assert_eq!(register_problems(&request("x1", "x2")), vec![PASSWORD_MISMATCH]);
        assert!(register_problems(&request("same", "same")).is_empty());
    }

    #[test]
    fn blank_fields_are_reported() {
        let blank = RegisterRequest {
            email: " ".into(),
            name: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        };
        assert_eq!(
            register_problems(&blank),
            vec![NAME_REQUIRED, EMAIL_REQUIRED, PASSWORD_REQUIRED]
        );
    }
}
