//! HTTP client for the sentiment backend.
//!
//! Both endpoints take `application/x-www-form-urlencoded` bodies; the
//! prediction endpoint additionally wants the session token twice, as a
//! standard `Authorization: Bearer` header and as a raw `token` header the
//! backend reads directly.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use humeur_core::credentials::Credentials;
use humeur_core::error::{HumeurError, Result};
use humeur_core::sentiment::SentimentResult;

const LOGIN_PATH: &str = "/login";
const PREDICT_PATH: &str = "/predict";

/// The remote sentiment backend, seen from the client.
///
/// Implemented over HTTP by [`HttpSentimentApi`]; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait SentimentApi: Send + Sync {
    /// Exchanges credentials for a session token.
    ///
    /// Exactly one request per call; the returned token is the extracted
    /// `access_token` value and is guaranteed non-empty.
    async fn login(&self, credentials: &Credentials) -> Result<String>;

    /// Submits text for analysis under the given session token.
    ///
    /// A 401 or 422 response maps to [`HumeurError::AuthRejected`]; any other
    /// failure leaves the session usable.
    async fn predict(&self, text: &str, token: &str) -> Result<SentimentResult>;
}

/// Client implementation that talks to the backend over HTTP.
#[derive(Clone)]
pub struct HttpSentimentApi {
    client: Client,
    base_url: String,
}

impl HttpSentimentApi {
    /// Creates a client for the given base address (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SentimentApi for HttpSentimentApi {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        debug!(username = %credentials.username, "login attempt");

        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await
            .map_err(|err| HumeurError::transport(format!("login request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| HumeurError::transport(format!("failed to read login body: {err}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "login rejected by backend");
            return Err(map_login_error(status, &body));
        }

        extract_token(&body)
    }

    async fn predict(&self, text: &str, token: &str) -> Result<SentimentResult> {
        let response = self
            .client
            .post(self.url(PREDICT_PATH))
            .header("Authorization", format!("Bearer {token}"))
            .header("token", token)
            .form(&[("text", text)])
            .send()
            .await
            .map_err(|err| HumeurError::transport(format!("predict request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| HumeurError::transport(format!("failed to read predict body: {err}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "predict rejected by backend");
            return Err(map_predict_error(status, &body));
        }

        parse_result(&body)
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Pulls the `detail` field out of an error body, when the body is JSON of
/// the expected shape.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|e| e.detail)
}

/// Extracts the `access_token` value from a successful login body.
///
/// The backend historically also echoed other fields; only the extracted
/// token is ever kept. A success body without a non-empty token is treated
/// as a malformed response, not a token.
fn extract_token(body: &str) -> Result<String> {
    let parsed: LoginResponse = serde_json::from_str(body)
        .map_err(|err| HumeurError::UnexpectedResponse(format!("login body: {err}")))?;

    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(HumeurError::UnexpectedResponse(
            "login response carried no access_token".to_string(),
        )),
    }
}

fn parse_result(body: &str) -> Result<SentimentResult> {
    serde_json::from_str(body)
        .map_err(|err| HumeurError::UnexpectedResponse(format!("predict body: {err}")))
}

fn map_login_error(status: StatusCode, body: &str) -> HumeurError {
    let message = extract_detail(body).unwrap_or_else(|| "login failed".to_string());
    HumeurError::api(status.as_u16(), message)
}

fn map_predict_error(status: StatusCode, body: &str) -> HumeurError {
    // 401 and 422 both mean the token was rejected: fatal to the session.
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
        return HumeurError::AuthRejected;
    }

    let message =
        extract_detail(body).unwrap_or_else(|| format!("error {}", status.as_u16()));
    HumeurError::api(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail() {
        assert_eq!(
            extract_detail(r#"{"detail": "bad password"}"#).as_deref(),
            Some("bad password")
        );
        assert_eq!(extract_detail("not json"), None);
        assert_eq!(extract_detail(r#"{"message": "nope"}"#), None);
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(
            extract_token(r#"{"access_token": "abc123"}"#).unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_extract_token_ignores_extra_fields() {
        // Only the extracted token is kept, never the whole body.
        let body = r#"{"access_token": "abc123", "token_type": "bearer", "user": "alice"}"#;
        assert_eq!(extract_token(body).unwrap(), "abc123");
    }

    #[test]
    fn test_extract_token_missing_or_empty() {
        assert!(matches!(
            extract_token(r#"{"token_type": "bearer"}"#),
            Err(HumeurError::UnexpectedResponse(_))
        ));
        assert!(matches!(
            extract_token(r#"{"access_token": ""}"#),
            Err(HumeurError::UnexpectedResponse(_))
        ));
        assert!(matches!(
            extract_token("not json"),
            Err(HumeurError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_map_login_error_uses_detail() {
        let err = map_login_error(StatusCode::BAD_REQUEST, r#"{"detail": "unknown user"}"#);
        assert_eq!(err.to_string(), "unknown user");
    }

    #[test]
    fn test_map_login_error_fallback() {
        let err = map_login_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "login failed");
    }

    #[test]
    fn test_login_401_is_not_a_session_teardown() {
        // Only the protected endpoint tears down the session.
        let err = map_login_error(StatusCode::UNAUTHORIZED, r#"{"detail": "bad password"}"#);
        assert!(!err.is_auth_rejection());
    }

    #[test]
    fn test_map_predict_auth_rejection() {
        assert!(map_predict_error(StatusCode::UNAUTHORIZED, "{}").is_auth_rejection());
        assert!(map_predict_error(StatusCode::UNPROCESSABLE_ENTITY, "{}").is_auth_rejection());
    }

    #[test]
    fn test_map_predict_other_failure_keeps_session() {
        let err = map_predict_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert!(!err.is_auth_rejection());
        assert_eq!(err.to_string(), "error 503");

        let err = map_predict_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "model unavailable"}"#,
        );
        assert_eq!(err.to_string(), "model unavailable");
    }

    #[test]
    fn test_parse_result() {
        let result = parse_result(r#"{"score": 4.5, "sentiment": "positif"}"#).unwrap();
        assert_eq!(result.score, 4.5);
        assert_eq!(result.sentiment, "positif");
    }

    #[test]
    fn test_parse_result_bad_shape() {
        assert!(matches!(
            parse_result(r#"{"mood": "great"}"#),
            Err(HumeurError::UnexpectedResponse(_))
        ));
    }
}
