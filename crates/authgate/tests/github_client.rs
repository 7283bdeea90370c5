//! GitHub client against a local stand-in for the OAuth endpoints.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use authgate::provider::{GitHubClient, GitHubConfig, IdentityProvider, ProviderError};

const GOOD_CODE: &str = "good-code";
const ACCESS_TOKEN: &str = "gho_test_token";

async fn access_token(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(headers[header::ACCEPT], "application/json");
    assert_eq!(body["client_id"], "client");
    assert_eq!(body["client_secret"], "secret");

    if body["code"] == GOOD_CODE {
        Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "bearer",
            "scope": "read:user",
        }))
    } else {
        // GitHub reports a bad code with 200 and an error body.
        Json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        }))
    }
}

async fn user(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    if headers
        .get(header::AUTHORIZATION)
        .is_some_and(|v| v.as_bytes() == expected.as_bytes())
    {
        (
            StatusCode::OK,
            Json(json!({ "id": 1_234_567, "login": "octocat", "type": "User" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Bad credentials" })),
        )
    }
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new()
        .route("/login/oauth/access_token", post(access_token))
        .route("/user", get(user));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> GitHubClient {
    GitHubClient::new(GitHubConfig {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        token_url: format!("http://{addr}/login/oauth/access_token"),
        user_url: format!("http://{addr}/user"),
        request_timeout_secs: 5,
        ..GitHubConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_code_exchange_and_identity_lookup() {
    let client = client(spawn_stub().await);

    let token = client.exchange_code(GOOD_CODE).await.unwrap();
    assert_eq!(token.access_token.as_deref(), Some(ACCESS_TOKEN));
    assert_eq!(token.scope.as_deref(), Some("read:user"));

    let identity = client.fetch_identity(ACCESS_TOKEN).await.unwrap();
    assert_eq!(identity.id, 1_234_567);
    assert_eq!(identity.login.as_deref(), Some("octocat"));
}

#[tokio::test]
async fn test_bad_verification_code() {
    let client = client(spawn_stub().await);

    let err = client.exchange_code("stale-code").await.unwrap_err();
    match err {
        ProviderError::OAuth { code, description } => {
            assert_eq!(code, "bad_verification_code");
            assert!(description.unwrap().contains("incorrect or expired"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_access_token() {
    let client = client(spawn_stub().await);

    let err = client.fetch_identity("revoked").await.unwrap_err();
    match err {
        ProviderError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("Bad credentials"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_provider() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let err = client(addr).exchange_code(GOOD_CODE).await.unwrap_err();
    assert!(matches!(err, ProviderError::RequestFailed(_)));
}
