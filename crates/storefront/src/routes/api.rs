//! JSON endpoints mirroring the catalog page and the cart.

use axum::{
    Json,
    extract::{Query, State},
};
use loja_core::{CartSnapshot, CatalogFilter, Product, format_brl_in};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use super::home::CatalogQuery;
use crate::error::Result;
use crate::models::load_cart;
use crate::state::AppState;

/// Filtered catalog listing.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub filter: CatalogFilter,
    pub count: usize,
    pub products: Vec<Product>,
}

/// Current cart with display strings.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub snapshot: CartSnapshot,
    pub subtotal_formatted: String,
    pub item_count: u64,
}

/// List products. Unlike the page, a missing `category` means all categories.
#[instrument(skip(state))]
pub async fn catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogResponse> {
    let service = state.catalog();
    let filter = query.to_filter(None);
    let products: Vec<Product> = service.filter(&filter).await.into_iter().cloned().collect();

    Json(CatalogResponse {
        count: products.len(),
        filter: filter.normalized(),
        products,
    })
}

/// Snapshot of the visitor's cart.
#[instrument(skip(state, session))]
pub async fn cart(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let cart = load_cart(&session).await?;
    let summary = cart.summary(state.catalog().catalog());
    let snapshot = CartSnapshot::from(&summary);

    Ok(Json(CartResponse {
        subtotal_formatted: format_brl_in(snapshot.subtotal, &state.config().locale),
        item_count: summary.total_quantity(),
        snapshot,
    }))
}
