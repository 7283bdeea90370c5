//! External identity provider module.
//!
//! The OAuth2 authorization-code flow is split into two capabilities so the
//! delegated-identity check can run against a substitute implementation.

mod error;
pub mod github;
mod types;

use async_trait::async_trait;

pub use error::{ProviderError, ProviderResult};
pub use github::{GitHubClient, GitHubConfig};
pub use types::{ExternalIdentity, TokenRequest, TokenResponse};

/// OAuth2 identity provider abstraction for testability.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> ProviderResult<TokenResponse>;

    /// Resolve the identity that owns `access_token`.
    async fn fetch_identity(&self, access_token: &str) -> ProviderResult<ExternalIdentity>;
}
