//! Loja BMF storefront.
//!
//! Server-rendered catalog and session cart for the Brasil Mundo Fênix MTA
//! shop. The binary in `main.rs` adds configuration, Sentry and the listener;
//! everything else lives here so it can be driven from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router with the full middleware stack, minus Sentry.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::csp_nonce_middleware))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::StatusCode};
    use loja_core::{Catalog, Locale};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::services::TicketSummaryHandoff;

    fn test_app() -> Router {
        let handoff = Arc::new(TicketSummaryHandoff::new(Locale::PtBr, String::new()));
        app(AppState::new(
            StorefrontConfig::default(),
            Catalog::builtin(),
            handoff,
        ))
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(axum::http::Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_cart_count_starts_at_zero() {
        let response = test_app()
            .oneshot(axum::http::Request::get("/cart/count").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"0");
    }
}
