//! Basic-Auth credential verification.

use std::sync::Arc;

use tracing::warn;

use super::store::CredentialStore;

/// Valid bcrypt hash compared against when the username is unknown, so a
/// miss costs about as much as a wrong password.
const DUMMY_HASH: &str = "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

/// Verifies submitted username/password pairs against a [`CredentialStore`].
#[derive(Debug, Clone)]
pub struct BasicAuthVerifier {
    store: Arc<CredentialStore>,
}

impl BasicAuthVerifier {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    /// Returns `true` only when `username` exists and `password` matches its hash.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let (hash, known) = match self.store.password_hash(username) {
            Some(hash) => (hash, true),
            None => (DUMMY_HASH, false),
        };

        // A malformed stored hash is a deny, not an error.
        let matched = bcrypt::verify(password, hash).unwrap_or(false);
        if known && matched {
            return true;
        }

        warn!(user = %username, "basic auth rejected");
        false
    }
}
