//! Session token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// Field order is the serialized order: `{"exp":..,"iss":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Expiration time (as Unix timestamp).
    pub exp: i64,

    /// Issuer. Tokens without one never validate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl SessionClaims {
    pub fn new(issuer: impl Into<String>, exp: i64) -> Self {
        Self {
            exp,
            iss: Some(issuer.into()),
        }
    }

    /// A token stays valid through the second named by `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }

    pub fn issued_by(&self, issuer: &str) -> bool {
        self.iss.as_deref() == Some(issuer)
    }
}
