//! Wire types exchanged with the identity provider.

use serde::{Deserialize, Serialize};

/// Body posted to the token endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
}

/// Token endpoint response.
///
/// GitHub answers `200 OK` even for a rejected code and reports the
/// failure through `error` / `error_description`, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,

    #[serde(default)]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub refresh_token_expires_in: Option<u64>,

    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenResponse {
    /// Build a successful response carrying only an access token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            token_type: Some("bearer".to_string()),
            ..Self::default()
        }
    }
}

/// Identity returned by the user endpoint.
///
/// Only the numeric ID takes part in the allow-list decision; `login` is
/// kept for log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub id: u64,

    #[serde(default)]
    pub login: Option<String>,
}

impl ExternalIdentity {
    pub fn new(id: u64) -> Self {
        Self { id, login: None }
    }
}
