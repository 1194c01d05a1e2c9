//! Cart route handlers.
//!
//! The cart is stored in the session. Every mutation is a plain form POST that
//! answers with `303 See Other` back to the page the visitor came from, so the
//! site works without JavaScript.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use loja_core::{
    Cart, CartSnapshot, CartSummary, HandoffError, HandoffReceipt, Locale, format_brl_in,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::Chrome;
use crate::error::{AppError, Result, add_breadcrumb, handoff_status};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::{load_cart, store_cart};
use crate::state::AppState;

/// Where cart mutations return to when no usable `next` is given.
pub const DEFAULT_RETURN: &str = "/cart";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    #[must_use]
    pub fn new(summary: &CartSummary<'_>, locale: &Locale) -> Self {
        Self {
            lines: summary
                .lines
                .iter()
                .map(|line| CartLineView {
                    id: line.product.id.to_string(),
                    name: line.product.name.clone(),
                    description: line.product.description.clone(),
                    quantity: line.quantity,
                    unit_price: format_brl_in(line.product.price.amount, locale),
                    line_total: format_brl_in(line.line_total(), locale),
                })
                .collect(),
            subtotal: format_brl_in(summary.subtotal, locale),
            item_count: summary.total_quantity(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Form body shared by add, subtract and remove.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub id: Option<String>,
    pub next: Option<String>,
}

impl CartItemForm {
    fn product_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("missing product id".to_string()))
    }

    fn redirect(&self) -> Redirect {
        Redirect::to(return_target(self.next.as_deref()))
    }
}

/// `next` if it is a path on this site, else [`DEFAULT_RETURN`].
#[must_use]
pub fn return_target(next: Option<&str>) -> &str {
    match next {
        Some(next) if is_local_path(next) => next,
        _ => DEFAULT_RETURN,
    }
}

/// Whether `path` stays on this origin (`/x`, not `//host` or `/\host`).
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(char::is_control)
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
    pub return_to: String,
}

/// Result page for finalize and save.
#[derive(Template, WebTemplate)]
#[template(path = "cart/handoff.html")]
pub struct HandoffTemplate {
    pub chrome: Chrome,
    pub title: String,
    pub success: bool,
    pub message: String,
    pub ticket_text: Option<String>,
    pub cart_code: Option<String>,
}

/// Display cart page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;
    let view = CartView::new(
        &cart.summary(state.catalog().catalog()),
        &state.config().locale,
    );

    Ok(CartShowTemplate {
        chrome: Chrome::new(&state, &cart, nonce),
        cart: view,
        return_to: DEFAULT_RETURN.to_string(),
    })
}

/// Add one unit of a product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartItemForm>,
) -> Result<Redirect> {
    let id = form.product_id()?;
    let product = state
        .catalog()
        .catalog()
        .product(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut cart = load_cart(&session).await?;
    let quantity = cart.add(product);
    store_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id)]));
    tracing::info!(product_id = id, quantity, "Added to cart");

    Ok(form.redirect())
}

/// Remove one unit of a product; the line goes away at zero.
#[instrument(skip(session))]
pub async fn subtract(session: Session, Form(form): Form<CartItemForm>) -> Result<Redirect> {
    let id = form.product_id()?;
    let mut cart = load_cart(&session).await?;
    let quantity = cart.subtract(id);
    store_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Subtracted from cart", Some(&[("product_id", id)]));
    tracing::info!(product_id = id, quantity, "Subtracted from cart");

    Ok(form.redirect())
}

/// Drop a product's line regardless of quantity.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<CartItemForm>) -> Result<Redirect> {
    let id = form.product_id()?;
    let mut cart = load_cart(&session).await?;
    let removed = cart.remove(id);
    store_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id)]));
    tracing::info!(product_id = id, removed, "Removed from cart");

    Ok(form.redirect())
}

/// Distinct line count, as shown in the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<String> {
    let cart = load_cart(&session).await?;
    Ok(cart.line_count().to_string())
}

/// Hand the cart to the order flow. The cart is emptied on success.
#[instrument(skip(state, session, nonce))]
pub async fn finalize(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    let snapshot = CartSnapshot::from(&cart.summary(state.catalog().catalog()));

    add_breadcrumb("cart", "Finalize order", None);
    let outcome = state.handoff().finalize_order(&snapshot);
    if outcome.is_ok() {
        clear_after_handoff(&session, &mut cart).await;
    }

    let chrome = Chrome::new(&state, &cart, nonce);
    handoff_page(chrome, "Finalizar pedido", outcome)
}

/// Empty the cart once the order has gone out.
///
/// The order cannot be taken back, so a session failure here is logged and the
/// receipt is still shown.
async fn clear_after_handoff(session: &Session, cart: &mut Cart) {
    cart.clear();
    if let Err(err) = store_cart(session, cart).await {
        tracing::error!(error = %err, "Order handed off but the cart could not be cleared");
    }
}

/// Ask the handoff for a shareable cart code. The cart is kept.
#[instrument(skip(state, session, nonce))]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    let snapshot = CartSnapshot::from(&cart.summary(state.catalog().catalog()));

    add_breadcrumb("cart", "Save cart", None);
    let outcome = state.handoff().save_cart(&snapshot);

    let chrome = Chrome::new(&state, &cart, nonce);
    handoff_page(chrome, "Salvar carrinho", outcome)
}

/// Render a handoff outcome. Upstream failures become [`AppError::Handoff`].
fn handoff_page(
    chrome: Chrome,
    title: &str,
    outcome: std::result::Result<HandoffReceipt, HandoffError>,
) -> Result<Response> {
    let (status, page) = match outcome {
        Ok(receipt) => (
            StatusCode::OK,
            HandoffTemplate {
                chrome,
                title: title.to_string(),
                success: true,
                message: receipt.message,
                ticket_text: receipt.ticket_text,
                cart_code: receipt.cart_code,
            },
        ),
        Err(err @ HandoffError::Failed(_)) => return Err(err.into()),
        Err(err) => {
            tracing::warn!(error = %err, "Handoff refused");
            let message = match err {
                HandoffError::EmptyCart => "Seu carrinho está vazio.".to_string(),
                _ => format!(
                    "Esta ação ainda não está disponível. Abra um ticket no Discord ({}).",
                    chrome.content.discord_invite
                ),
            };
            (
                handoff_status(&err),
                HandoffTemplate {
                    chrome,
                    title: title.to_string(),
                    success: false,
                    message,
                    ticket_text: None,
                    cart_code: None,
                },
            )
        }
    };

    Ok((status, page).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use loja_core::Catalog;
    use tower_sessions::{
        SessionStore,
        session::{Id, Record},
        session_store,
    };

    use super::*;

    /// Store whose backend is always down.
    #[derive(Debug, Clone)]
    struct DownStore;

    #[async_trait::async_trait]
    impl SessionStore for DownStore {
        async fn save(&self, _record: &Record) -> session_store::Result<()> {
            Err(session_store::Error::Backend("down".to_string()))
        }

        async fn load(&self, _id: &Id) -> session_store::Result<Option<Record>> {
            Err(session_store::Error::Backend("down".to_string()))
        }

        async fn delete(&self, _id: &Id) -> session_store::Result<()> {
            Err(session_store::Error::Backend("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_clear_after_handoff_tolerates_session_failure() {
        let session = Session::new(Some(Id::default()), Arc::new(DownStore), None);
        assert!(store_cart(&session, &Cart::new()).await.is_err());

        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(catalog.product("vip-ouro").unwrap());

        clear_after_handoff(&session, &mut cart).await;
        assert!(cart.is_empty());
    }

    #[test]
    fn test_return_target_accepts_local_paths() {
        assert_eq!(return_target(Some("/?category=vip")), "/?category=vip");
        assert_eq!(return_target(Some("/cart")), "/cart");
    }

    #[test]
    fn test_return_target_rejects_other_origins() {
        assert_eq!(return_target(Some("https://evil.example")), DEFAULT_RETURN);
        assert_eq!(return_target(Some("//evil.example")), DEFAULT_RETURN);
        assert_eq!(return_target(Some("/\\evil.example")), DEFAULT_RETURN);
        assert_eq!(return_target(Some("")), DEFAULT_RETURN);
        assert_eq!(return_target(None), DEFAULT_RETURN);
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        for id in ["vip-bronze", "vip-bronze", "handling-drift-rwd"] {
            if let Some(product) = catalog.product(id) {
                cart.add(product);
            }
        }

        let view = CartView::new(&cart.summary(&catalog), &Locale::PtBr);
        assert_eq!(view.subtotal, "R$ 37,70");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].line_total, "R$ 29,80");
        assert_eq!(view.lines[1].unit_price, "R$ 7,90");
    }

    #[test]
    fn test_empty_cart_view() {
        let catalog = Catalog::builtin();
        let view = CartView::new(&Cart::new().summary(&catalog), &Locale::PtBr);
        assert!(view.is_empty());
        assert_eq!(view.subtotal, "R$ 0,00");
    }
}
