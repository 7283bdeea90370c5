//! Authentication decision surface consumed by the HTTP layer.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::AuthError;
use super::basic::BasicAuthVerifier;
use super::clock::Clock;
use super::delegated::DelegatedIdentityExchange;
use super::store::{AllowList, CredentialStore};
use super::token::SessionTokenCodec;
use crate::provider::IdentityProvider;

/// Immutable settings an [`Authenticator`] is built from.
#[derive(Clone)]
pub struct AuthenticatorConfig {
    pub issuer: String,
    pub secret: String,
    pub credentials: CredentialStore,
    pub allow_list: AllowList,
}

impl std::fmt::Debug for AuthenticatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatorConfig")
            .field("issuer", &self.issuer)
            .field("secret", &"<redacted>")
            .field("credentials", &self.credentials.len())
            .field("allow_list", &self.allow_list.len())
            .finish()
    }
}

/// Composes Basic-Auth, session token and delegated identity checks.
///
/// Cheap to clone; every clone shares the same read-only stores.
#[derive(Clone, Debug)]
pub struct Authenticator {
    inner: Arc<Inner>,
}

struct Inner {
    basic: BasicAuthVerifier,
    codec: SessionTokenCodec,
    delegated: DelegatedIdentityExchange,
}

impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("basic", &self.basic)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(
        config: AuthenticatorConfig,
        provider: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let AuthenticatorConfig {
            issuer,
            secret,
            credentials,
            allow_list,
        } = config;

        Self {
            inner: Arc::new(Inner {
                basic: BasicAuthVerifier::new(Arc::new(credentials)),
                codec: SessionTokenCodec::new(issuer, secret.as_bytes(), clock),
                delegated: DelegatedIdentityExchange::new(provider, Arc::new(allow_list)),
            }),
        }
    }

    /// Basic-Auth check. Unknown user and wrong password both yield `false`.
    pub fn check_basic(&self, username: &str, password: &str) -> bool {
        self.inner.basic.verify(username, password)
    }

    /// Session token check; see [`SessionTokenCodec::validate`].
    pub fn check_session(&self, token: Option<&str>) -> Result<bool, AuthError> {
        self.inner.codec.validate(token)
    }

    /// OAuth callback check; see [`DelegatedIdentityExchange::authorize`].
    pub async fn check_delegated(
        &self,
        code: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, AuthError> {
        self.inner.delegated.authorize(code, cancel).await
    }

    /// Mint a session token valid for `lifetime_secs`.
    pub fn issue_session(&self, lifetime_secs: u64) -> Result<String, AuthError> {
        self.inner.codec.issue(lifetime_secs)
    }

    pub fn issuer(&self) -> &str {
        self.inner.codec.issuer()
    }
}
