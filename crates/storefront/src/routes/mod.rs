//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Catalog page (?q=&category=)
//!
//! # Cart
//! GET  /cart              - Cart page
//! POST /cart/add          - Add one unit (form: id, next), 303 to next
//! POST /cart/subtract     - Remove one unit (form: id, next)
//! POST /cart/remove       - Drop the line (form: id, next)
//! POST /cart/finalize     - Hand the cart to the Discord ticket flow
//! POST /cart/save         - Ask the handoff for a cart code
//! GET  /cart/count        - Distinct line count (plain text)
//!
//! # JSON
//! GET  /api/catalog       - Filtered products (?q=&category=)
//! GET  /api/cart          - Current cart snapshot
//! ```

pub mod api;
pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};
use loja_core::Cart;

use crate::content::StoreContent;
use crate::state::AppState;

/// Shared header and footer data for full-page templates.
#[derive(Clone)]
pub struct Chrome {
    pub content: StoreContent,
    pub discord_url: String,
    pub cart_count: usize,
    pub nonce: String,
}

impl Chrome {
    #[must_use]
    pub fn new(state: &AppState, cart: &Cart, nonce: String) -> Self {
        let content = state.content().clone();
        Self {
            discord_url: content.discord_url(),
            content,
            cart_count: cart.line_count(),
            nonce,
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/subtract", post(cart::subtract))
        .route("/remove", post(cart::remove))
        .route("/finalize", post(cart::finalize))
        .route("/save", post(cart::save))
        .route("/count", get(cart::count))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(api::catalog))
        .route("/cart", get(api::cart))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .nest("/api", api_routes())
}
