//! GitHub OAuth2 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ProviderError, ProviderResult};
use super::types::{ExternalIdentity, TokenRequest, TokenResponse};
use super::IdentityProvider;

pub const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const DEFAULT_USER_URL: &str = "https://api.github.com/user";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

const USER_AGENT: &str = concat!("authgate/", env!("CARGO_PKG_VERSION"));

/// GitHub OAuth application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// OAuth application client ID. Supports `env:VAR_NAME`.
    pub client_id: String,
    /// OAuth application client secret. Supports `env:VAR_NAME`.
    pub client_secret: String,
    /// Token endpoint (code -> access token).
    pub token_url: String,
    /// User endpoint (access token -> identity).
    pub user_url: String,
    /// Browser-facing authorization page.
    pub authorize_url: String,
    /// Requested OAuth scope.
    pub scope: String,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            client_id: "env:GITHUB_CLIENT_ID".to_string(),
            client_secret: "env:GITHUB_CLIENT_SECRET".to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            user_url: DEFAULT_USER_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            scope: "read:user".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Client for the GitHub OAuth2 code exchange and user lookup.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
}

impl GitHubClient {
    /// Create a new client. `config` must already have `env:` values resolved.
    pub fn new(config: GitHubConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    /// URL the browser is redirected to in order to start the login flow.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&scope={}",
            self.config.authorize_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.scope)
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn get_access_token(&self, code: &str) -> ProviderResult<TokenResponse> {
        let url = &self.config.token_url;
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(&TokenRequest {
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                code,
            })
            .send()
            .await?;

        let token: TokenResponse = self.handle_response(url, response).await?;

        if let Some(code) = token.error.clone() {
            return Err(ProviderError::OAuth {
                code,
                description: token.error_description.clone(),
            });
        }
        if token.access_token.as_deref().is_none_or(str::is_empty) {
            return Err(ProviderError::MissingAccessToken);
        }

        debug!(token_type = ?token.token_type, "exchanged authorization code");
        Ok(token)
    }

    /// Fetch the user owning `access_token`.
    pub async fn get_user(&self, access_token: &str) -> ProviderResult<ExternalIdentity> {
        let url = &self.config.user_url;
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        self.handle_response(url, response).await
    }

    /// Handle response and parse JSON or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> ProviderResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ProviderError::ParseError(format!("{url}: {e}")))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl IdentityProvider for GitHubClient {
    async fn exchange_code(&self, code: &str) -> ProviderResult<TokenResponse> {
        self.get_access_token(code).await
    }

    async fn fetch_identity(&self, access_token: &str) -> ProviderResult<ExternalIdentity> {
        self.get_user(access_token).await
    }
}
