//! Sentiment screen controller.
//!
//! Owns the render state of the protected screen: the latest analysis result
//! and the in-flight flag. Attaches the stored token to every request and is
//! the one place that tears a session down automatically, on an
//! authentication rejection from the prediction endpoint.

use std::sync::Arc;

use tracing::{error, warn};

use humeur_core::error::Result;
use humeur_core::sentiment::SentimentResult;
use humeur_core::session::SessionService;
use humeur_interaction::SentimentApi;

/// What an analysis attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// The text was empty or whitespace-only; no request was sent.
    Rejected { message: String },
    /// The stored token disappeared since mount; the session was flipped to
    /// unauthenticated without a network call.
    SessionExpired,
    /// The analysis succeeded; [`SentimentFlow::result`] holds the response.
    Analyzed,
    /// The backend rejected the token (401/422); the session was torn down.
    AuthRejected,
    /// Any other failure; the session stays intact and retry is allowed.
    Failed { message: String },
}

/// The sentiment analysis controller.
pub struct SentimentFlow {
    api: Arc<dyn SentimentApi>,
    session: Arc<SessionService>,
    result: Option<SentimentResult>,
    busy: bool,
}

impl SentimentFlow {
    pub fn new(api: Arc<dyn SentimentApi>, session: Arc<SessionService>) -> Self {
        Self {
            api,
            session,
            result: None,
            busy: false,
        }
    }

    /// Submits text to the prediction endpoint.
    ///
    /// The token is re-read from storage on every call; its absence here
    /// means the session expired since the screen mounted.
    pub async fn analyze(&mut self, text: &str) -> Result<AnalyzeOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(AnalyzeOutcome::Rejected {
                message: "please enter some text to analyze".to_string(),
            });
        }

        let token = match self.session.stored_token()? {
            Some(token) => token,
            None => {
                warn!("token missing at request time, session expired");
                self.result = None;
                self.session.teardown()?;
                return Ok(AnalyzeOutcome::SessionExpired);
            }
        };

        // The previous result is cleared the moment a new analysis begins.
        self.result = None;
        self.busy = true;
        let predict = self.api.predict(trimmed, &token).await;
        self.busy = false;

        match predict {
            Ok(result) => {
                self.result = Some(result);
                Ok(AnalyzeOutcome::Analyzed)
            }
            Err(err) if err.is_auth_rejection() => {
                // The only path that tears down a session automatically.
                error!("prediction endpoint rejected the token, logging out");
                self.session.teardown()?;
                Ok(AnalyzeOutcome::AuthRejected)
            }
            Err(err) => {
                warn!(error = %err, "analysis failed");
                Ok(AnalyzeOutcome::Failed {
                    message: err.to_string(),
                })
            }
        }
    }

    /// Explicit user logout: clears the token store and the render state.
    /// Idempotent.
    pub fn logout(&mut self) -> Result<()> {
        self.result = None;
        self.session.teardown()
    }

    /// The latest analysis result, if the last attempt succeeded.
    pub fn result(&self) -> Option<&SentimentResult> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
