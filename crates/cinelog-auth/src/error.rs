//! Authentication error types

use axum::http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Inactive account")]
    InactiveAccount,

    #[error("Forbidden")]
    Forbidden,

    #[error("Username already registered")]
    DuplicateUsername,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid token lifetime: {0} minutes")]
    InvalidTokenLifetime(i64),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Credential store error: {0}")]
    Store(#[from] cinelog_db::DbError),
}

impl AuthError {
    /// HTTP status and client-facing detail for this error
    pub fn status_and_detail(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect username or password")
            }
            AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials")
            }
            AuthError::InactiveAccount => (StatusCode::BAD_REQUEST, "Inactive user"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Not enough permissions"),
            AuthError::DuplicateUsername => (StatusCode::CONFLICT, "Username already registered"),
            AuthError::UnsupportedAlgorithm(_)
            | AuthError::InvalidTokenLifetime(_)
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_)
            | AuthError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Authentication failure: {}", self);
        }

        let body = axum::Json(json!({
            "detail": detail
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
