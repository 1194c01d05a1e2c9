//! Catalog page: hero, category tabs, search, product grid and cart sidebar.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use loja_core::{Catalog, CatalogFilter, CategoryId, Locale, Product, format_brl_in};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::Chrome;
use super::cart::CartView;
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::load_cart;
use crate::state::AppState;

/// Category value that disables the category predicate.
pub const ALL_CATEGORIES: &str = "all";

/// Query string for catalog listings.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl CatalogQuery {
    /// Build the filter for this query.
    ///
    /// The query is used whole; the search form's `maxlength` is the only
    /// length limit. A missing `category` selects `default_category`; `all`
    /// or an empty value selects every category. An unknown id is kept, so it
    /// matches nothing.
    #[must_use]
    pub fn to_filter(&self, default_category: Option<&CategoryId>) -> CatalogFilter {
        let query = self.q.clone().unwrap_or_default();

        let category = match self.category.as_deref().map(str::trim) {
            None => default_category.cloned(),
            Some("" | ALL_CATEGORIES) => None,
            Some(id) => Some(CategoryId::new(id)),
        };

        CatalogFilter::new(query, category)
    }
}

/// Product card display data.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category_label: String,
    pub badge: Option<String>,
    pub in_cart: u32,
}

impl ProductView {
    fn new(product: &Product, catalog: &Catalog, locale: &Locale, in_cart: u32) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_brl_in(product.price.amount, locale),
            category_label: catalog
                .category(product.category.as_str())
                .map_or_else(|| product.category.to_string(), |c| c.label.clone()),
            badge: product.badge.clone(),
            in_cart,
        }
    }
}

/// Category tab display data.
#[derive(Clone)]
pub struct CategoryTab {
    pub id: String,
    pub label: String,
    pub active: bool,
}

/// Path back to the catalog with the same filter applied.
#[must_use]
pub fn catalog_path(filter: &CatalogFilter) -> String {
    let category = filter
        .category
        .as_ref()
        .map_or(ALL_CATEGORIES, CategoryId::as_str);
    let query = filter.query.trim();
    if query.is_empty() {
        format!("/?category={}", urlencoding::encode(category))
    } else {
        format!(
            "/?q={}&category={}",
            urlencoding::encode(query),
            urlencoding::encode(category)
        )
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub query: String,
    pub tabs: Vec<CategoryTab>,
    pub all_active: bool,
    pub products: Vec<ProductView>,
    pub cart: CartView,
    pub return_to: String,
}

/// Display the catalog page.
#[instrument(skip(state, session, nonce))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Query(query): Query<CatalogQuery>,
) -> Result<HomeTemplate> {
    let catalog = state.catalog().catalog();
    let locale = &state.config().locale;
    let default_category = catalog.categories().first().map(|c| &c.id);
    let filter = query.to_filter(default_category);

    let cart = load_cart(&session).await?;
    let products = state
        .catalog()
        .filter(&filter)
        .await
        .into_iter()
        .map(|product| {
            let in_cart = cart.quantity(product.id.as_str());
            ProductView::new(product, catalog, locale, in_cart)
        })
        .collect();

    let tabs = catalog
        .categories()
        .iter()
        .map(|category| CategoryTab {
            id: category.id.to_string(),
            label: category.label.clone(),
            active: filter.category.as_ref() == Some(&category.id),
        })
        .collect();

    Ok(HomeTemplate {
        chrome: Chrome::new(&state, &cart, nonce),
        query: filter.query.clone(),
        tabs,
        all_active: filter.category.is_none(),
        products,
        cart: CartView::new(&cart.summary(catalog), locale),
        return_to: catalog_path(&filter),
    })
}
