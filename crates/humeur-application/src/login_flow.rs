//! Login screen controller.
//!
//! Holds the transient form state, runs the submit-time validation and, when
//! the form passes, performs the single token-exchange request. The token is
//! persisted through the session service before the caller is told to
//! navigate, so the protected screen always finds it on mount.

use std::sync::Arc;

use tracing::warn;

use humeur_core::credentials::{Credentials, Field, FieldErrors};
use humeur_core::error::Result;
use humeur_core::session::SessionService;
use humeur_interaction::SentimentApi;

/// What a submit attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; per-field messages are set and no request
    /// was sent.
    Rejected,
    /// The token was issued and persisted; the caller may navigate.
    LoggedIn,
    /// The request failed; the form stays populated for retry.
    Failed { message: String },
}

/// The login form controller.
pub struct LoginFlow {
    api: Arc<dyn SentimentApi>,
    session: Arc<SessionService>,
    credentials: Credentials,
    errors: FieldErrors,
    busy: bool,
}

impl LoginFlow {
    pub fn new(api: Arc<dyn SentimentApi>, session: Arc<SessionService>) -> Self {
        Self {
            api,
            session,
            credentials: Credentials::default(),
            errors: FieldErrors::default(),
            busy: false,
        }
    }

    /// Writes into the form; a stale validation message on that field is
    /// cleared, but nothing is re-validated until the next submit.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.credentials.set(field, value);
        self.errors.clear(field);
    }

    /// Validates and, when the form passes, issues exactly one login request.
    ///
    /// `Err` is reserved for local failures (the token store); every backend
    /// answer maps to a [`SubmitOutcome`].
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        self.errors = self.credentials.validate();
        if !self.errors.is_clear() {
            return Ok(SubmitOutcome::Rejected);
        }

        // The busy flag spans the request; the UI keeps the submit control
        // disabled for its duration, which is what prevents double
        // submission.
        self.busy = true;
        let login = self.api.login(&self.credentials).await;
        self.busy = false;

        match login {
            Ok(token) => {
                // Store before navigate: establish returns only once the
                // write is visible to the next load.
                self.session.establish(&token)?;
                Ok(SubmitOutcome::LoggedIn)
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                Ok(SubmitOutcome::Failed {
                    message: err.to_string(),
                })
            }
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
