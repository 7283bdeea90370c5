//! Delegated identity check through an OAuth2 identity provider.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::AuthError;
use super::store::AllowList;
use crate::provider::{IdentityProvider, ProviderError, ProviderResult};

/// Runs the code -> access token -> identity exchange and checks the result
/// against the allow-list.
#[derive(Clone)]
pub struct DelegatedIdentityExchange {
    provider: Arc<dyn IdentityProvider>,
    allow_list: Arc<AllowList>,
}

impl DelegatedIdentityExchange {
    pub fn new(provider: Arc<dyn IdentityProvider>, allow_list: Arc<AllowList>) -> Self {
        Self {
            provider,
            allow_list,
        }
    }

    /// Decide whether the identity behind `code` may sign in.
    ///
    /// Provider failures in either phase are errors, never a partial allow.
    /// Cancelling `cancel` drops the in-flight call and yields
    /// [`AuthError::Cancelled`].
    pub async fn authorize(&self, code: &str, cancel: &CancellationToken) -> Result<bool, AuthError> {
        let token = until_cancelled(cancel, self.provider.exchange_code(code))
            .await?
            .inspect_err(|e| error!(error = %e, "failed to fetch access token"))?;

        // `exchange_code` implementations reject responses without a token;
        // an empty one here still must not reach the user endpoint.
        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::MissingAccessToken)?;
        debug!("fetched access token from code");

        let identity = until_cancelled(cancel, self.provider.fetch_identity(&access_token))
            .await?
            .inspect_err(|e| error!(error = %e, "failed to get user id"))?;

        if !self.allow_list.contains(identity.id) {
            warn!(id = identity.id, login = ?identity.login, "user is not allowed by config");
            return Ok(false);
        }

        info!(id = identity.id, login = ?identity.login, "user is authorized");
        Ok(true)
    }
}

/// Race `fut` against cancellation; cancellation wins ties.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = ProviderResult<T>>,
) -> Result<ProviderResult<T>, AuthError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!("delegated identity check cancelled");
            Err(AuthError::Cancelled)
        }
        result = fut => Ok(result),
    }
}
