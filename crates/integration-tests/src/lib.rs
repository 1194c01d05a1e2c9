//! Integration tests for Loja BMF.
//!
//! The storefront router is driven in-process with `tower::ServiceExt`; no
//! listener or browser is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p loja-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart mutations, session persistence and handoff
//! - `storefront_pages` - Catalog page rendering, filters and middleware
//! - `storefront_api` - JSON endpoints

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use loja_core::{CartHandoff, Catalog, Locale};
use loja_storefront::{
    app, config::StorefrontConfig, middleware::SESSION_COOKIE_NAME, services::TicketSummaryHandoff,
    state::AppState,
};
use tower::ServiceExt;

/// Invite used by test configurations.
pub const TEST_INVITE: &str = "discord.gg/teste";

/// Storefront configuration pointing at the real static directory.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static")),
        discord_invite: TEST_INVITE.to_string(),
        ..StorefrontConfig::default()
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Header value as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.body))
    }
}

/// In-process client that keeps the session cookie between requests, like a
/// single browser tab.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// Client over the built-in catalog and the Discord ticket handoff.
    #[must_use]
    pub fn new() -> Self {
        Self::with_handoff(Arc::new(TicketSummaryHandoff::new(
            Locale::PtBr,
            TEST_INVITE.to_string(),
        )))
    }

    /// Client over the built-in catalog and a custom handoff.
    #[must_use]
    pub fn with_handoff(handoff: Arc<dyn CartHandoff>) -> Self {
        let state = AppState::new(test_config(), Catalog::builtin(), handoff);
        Self {
            app: app(state),
            cookie: None,
        }
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// Send a form-encoded POST request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(builder, Body::from(form.to_owned())).await
    }

    /// Send a request with extra headers.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn get_with_header(&mut self, uri: &str, name: &str, value: &str) -> TestResponse {
        self.send(Request::get(uri).header(name, value), Body::empty())
            .await
    }

    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        self.remember_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        let prefix = format!("{SESSION_COOKIE_NAME}=");
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            if !value.starts_with(&prefix) {
                continue;
            }
            if value.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                self.cookie = value.split(';').next().map(str::to_owned);
            }
        }
    }
}
