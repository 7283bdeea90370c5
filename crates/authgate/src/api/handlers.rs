//! HTTP handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::credentials::{basic_credentials, session_cookie, session_token};
use super::state::AppState;
use crate::auth::AuthError;

const BASIC_REALM: &str = r#"Basic realm="SECRET AREA""#;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn root() -> &'static str {
    "OK"
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Forward-auth check: 200 when the `jwt` cookie holds a valid session.
pub async fn check_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AuthError> {
    if state.auth.check_session(session_token(&headers))? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::UNAUTHORIZED)
    }
}

/// Basic-Auth login; sets the session cookie on success.
pub async fn basic_login(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let allowed = match basic_credentials(&headers) {
        Some(creds) => {
            let auth = state.auth.clone();
            // bcrypt is deliberately slow; keep it off the async workers.
            tokio::task::spawn_blocking(move || auth.check_basic(&creds.username, &creds.password))
                .await
                .unwrap_or(false)
        }
        None => false,
    };

    if !allowed {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, BASIC_REALM)],
        )
            .into_response();
    }

    match issue_cookie(&state) {
        Ok(cookie) => {
            info!("basic login succeeded, session cookie set");
            (StatusCode::OK, AppendHeaders([(header::SET_COOKIE, cookie)])).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Send the browser to the identity provider's authorization page.
pub async fn login_page(State(state): State<AppState>) -> Response {
    info!(url = %state.login_url, "redirecting to identity provider");
    found(&state.login_url)
}

/// Query string of the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
}

/// OAuth callback: exchange the code, check the allow-list, set the cookie.
#[instrument(skip_all)]
pub async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        warn!("callback received without code");
        return StatusCode::BAD_REQUEST.into_response();
    };

    // The deadline lives inside this future, so a client disconnect drops
    // it together with the in-flight provider call.
    let cancel = CancellationToken::new();
    let check = state.auth.check_delegated(&code, &cancel);
    tokio::pin!(check);

    let decision = tokio::select! {
        decision = &mut check => decision,
        () = tokio::time::sleep(state.provider_timeout) => {
            warn!(timeout = ?state.provider_timeout, "identity provider deadline elapsed");
            cancel.cancel();
            check.await
        }
    };

    match decision {
        Ok(true) => {}
        Ok(false) => {
            warn!("user is not authorized");
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Err(e) => return e.into_response(),
    }

    match issue_cookie(&state) {
        Ok(cookie) => {
            info!(redirect = %state.base_path, "oauth login succeeded, session cookie set");
            (AppendHeaders([(header::SET_COOKIE, cookie)]), found(&state.base_path))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn issue_cookie(state: &AppState) -> Result<String, AuthError> {
    let token = state.auth.issue_session(state.cookie.lifetime_secs)?;
    Ok(session_cookie(
        &token,
        state.cookie.lifetime_secs,
        state.cookie.secure,
    ))
}
