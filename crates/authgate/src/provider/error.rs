//! Identity provider error types.

use thiserror::Error;

/// Result type for identity provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("provider returned {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Provider reported an OAuth error in-band (e.g. `bad_verification_code`).
    #[error("OAuth error: {code}{}", description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    OAuth {
        code: String,
        description: Option<String>,
    },

    /// Token response carried no access token.
    #[error("token response did not include an access token")]
    MissingAccessToken,

    /// Failed to parse response.
    #[error("failed to parse response: {0}")]
    ParseError(String),
}
