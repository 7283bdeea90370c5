//! API route definitions.

use axum::body::Body;
use axum::http::{HeaderName, Request, header::USER_AGENT};
use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use super::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    // Access log; the span carries the x-request-id set by the outer layer.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let header = |name: HeaderName| {
                request
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-")
                    .to_owned()
            };
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri().path(),
                user_agent = %header(USER_AGENT),
                request_id = %header(REQUEST_ID_HEADER),
            )
        })
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace_layer);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/auth_jwt_request", get(handlers::check_session))
        .route("/basic_login", get(handlers::basic_login))
        .route("/login_page", get(handlers::login_page))
        .route("/callback/github", get(handlers::github_callback))
        .layer(middleware)
        .with_state(state)
}
