//! Error types for the Moodify backend.
//!
//! Each concern owns a `thiserror` enum. [`ApiError`] is the only one that
//! reaches HTTP clients; its bodies carry a short message and never any
//! credential or token material.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned for every rejected authenticated request.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Please login again.";

/// Failure of a single call against Spotify.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("access token rejected by provider")]
    Unauthorized,

    #[error("rate limited by provider (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("provider responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected provider response: {0}")]
    Decode(String),
}

/// Reasons a request cannot be bound to a valid user token.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("no refresh token stored for session")]
    MissingRefreshToken,

    #[error("token refresh failed: {0}")]
    RefreshFailed(#[source] ProviderError),

    #[error("session store failure: {0}")]
    Session(#[from] SessionError),
}

#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("no genres available to recommend from")]
    NoGenresAvailable,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Error surfaced by an HTTP handler.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Spotify API error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Server error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Session(e) => ApiError::Internal(e.to_string()),
            _ => ApiError::Unauthorized(UNAUTHORIZED_MESSAGE),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Provider(ProviderError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Provider(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, "request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
