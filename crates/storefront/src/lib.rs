//! Ochag storefront library.
//!
//! The cart engine (`cart`), the page controls that drive it (`page`), and
//! the axum host serving both. Exposed as a library so the CLI and the
//! integration tests can reuse them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod state;

use axum::{Router, http::Request, routing::get};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Static assets bundled with the crate.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the storefront router.
///
/// Sentry layers are added by the binary, outside this router, so tests can
/// run the app without an initialized client.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = tracing::field::Empty,
                        )
                    }),
                )
                .layer(axum::middleware::from_fn(middleware::request_id_middleware))
                .layer(session_layer),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
