//! Authentication errors.
//!
//! Denials (wrong password, expired token, identity not allow-listed) are
//! ordinary `false` results and never show up here.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::provider::ProviderError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Session token failed signature or structural checks.
    #[error("malformed session token: {0}")]
    MalformedToken(String),

    /// Identity provider call failed.
    #[error("identity provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The caller gave up before the provider answered.
    #[error("authentication cancelled")]
    Cancelled,

    /// Internal error.
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable code for response bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken(_) => "malformed_token",
            AuthError::Provider(_) => "provider_error",
            AuthError::Cancelled => "cancelled",
            AuthError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            AuthError::MalformedToken(_) | AuthError::Provider(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorResponse {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::Cancelled;
        assert_eq!(err.to_string(), "authentication cancelled");

        let err = AuthError::MalformedToken("InvalidSignature".to_string());
        assert_eq!(err.to_string(), "malformed session token: InvalidSignature");
    }

    #[test]
    fn test_auth_error_status() {
        assert_eq!(
            AuthError::MalformedToken("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::Provider(ProviderError::MissingAccessToken).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AuthError::Cancelled.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }
}
