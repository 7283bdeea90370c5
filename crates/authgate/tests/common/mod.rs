//! Test utilities and common setup.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use authgate::api::{self, AppState, CookieSettings};
use authgate::auth::{AllowList, Authenticator, AuthenticatorConfig, CredentialStore, FixedClock};
use authgate::provider::{
    ExternalIdentity, IdentityProvider, ProviderError, ProviderResult, TokenResponse,
};

pub const ISSUER: &str = "testprogram";
pub const SECRET: &str = "test-secret-for-integration-tests";
pub const NOW: i64 = 1_700_000_000;
pub const LIFETIME: u64 = 3600;
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "pass";
pub const LOGIN_URL: &str = "https://github.example/login/oauth/authorize?client_id=abc";
pub const ALLOWED_ID: u64 = 42;
pub const PROVIDER_TIMEOUT: Duration = Duration::from_millis(200);

/// bcrypt hash of `pass`.
pub const PASS_HASH: &str = "$2a$10$etIpH1oxl4Ky5koV2AzyYe42caqi/tvtme/UTwxA7lHlB2loLDOte";

/// Provider whose behaviour is picked by the authorization code:
/// `allowed` and `stranger` resolve to an allowed and an unknown account,
/// `broken` fails the exchange, `hang` never answers.
pub struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn exchange_code(&self, code: &str) -> ProviderResult<TokenResponse> {
        match code {
            "allowed" | "stranger" => Ok(TokenResponse::bearer(format!("token-{code}"))),
            "hang" => std::future::pending().await,
            _ => Err(ProviderError::OAuth {
                code: "bad_verification_code".to_string(),
                description: None,
            }),
        }
    }

    async fn fetch_identity(&self, access_token: &str) -> ProviderResult<ExternalIdentity> {
        match access_token {
            "token-allowed" => Ok(ExternalIdentity::new(ALLOWED_ID)),
            "token-stranger" => Ok(ExternalIdentity::new(7)),
            _ => Err(ProviderError::MissingAccessToken),
        }
    }
}

/// Authenticator with the test user and allow-list, frozen at `now`.
pub fn test_authenticator(now: i64) -> Authenticator {
    let config = AuthenticatorConfig {
        issuer: ISSUER.to_string(),
        secret: SECRET.to_string(),
        credentials: CredentialStore::new([(USERNAME, PASS_HASH)])
            .expect("valid credential store"),
        allow_list: [ALLOWED_ID].into_iter().collect::<AllowList>(),
    };
    Authenticator::new(
        config,
        Arc::new(FakeProvider),
        Arc::new(FixedClock::at_timestamp(now)),
    )
}

/// Session token as the gateway would have issued it at `issued_at`.
pub fn token_issued_at(issued_at: i64, lifetime: u64) -> String {
    test_authenticator(issued_at)
        .issue_session(lifetime)
        .expect("issue session token")
}

pub fn test_state() -> AppState {
    AppState {
        auth: test_authenticator(NOW),
        cookie: CookieSettings {
            lifetime_secs: LIFETIME,
            secure: false,
        },
        login_url: LOGIN_URL.to_string(),
        base_path: "/".to_string(),
        provider_timeout: PROVIDER_TIMEOUT,
    }
}

/// Create a test router backed by the fake provider and a fixed clock.
pub fn test_app() -> Router {
    api::create_router(test_state())
}
