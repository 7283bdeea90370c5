//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::auth::{Authenticator, SystemClock};
use crate::config::AppConfig;
use crate::provider::GitHubClient;

/// Session cookie settings.
#[derive(Clone, Debug)]
pub struct CookieSettings {
    /// Token lifetime and cookie `Max-Age`, in seconds.
    pub lifetime_secs: u64,
    /// Emit the `Secure` attribute.
    pub secure: bool,
}

/// Application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Authenticator,
    pub cookie: CookieSettings,
    /// Provider authorization page the login route redirects to.
    pub login_url: String,
    /// Redirect target after a successful OAuth callback.
    pub base_path: String,
    /// Deadline for the OAuth callback's provider calls.
    pub provider_timeout: Duration,
}

impl AppState {
    /// Wire the production authenticator (GitHub provider, wall clock) from config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let settings = config.auth.build()?;
        let github = GitHubClient::new(config.resolve_github()?)
            .context("creating GitHub HTTP client")?;
        let login_url = github.authorize_url();
        let auth = Authenticator::new(settings, Arc::new(github), Arc::new(SystemClock));

        Ok(Self {
            auth,
            cookie: CookieSettings {
                lifetime_secs: config.auth.token_lifetime,
                secure: config.server.secure_cookie,
            },
            login_url,
            base_path: config.server.base_path.clone(),
            provider_timeout: Duration::from_secs(config.server.provider_timeout_secs),
        })
    }
}
