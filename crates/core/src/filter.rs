//! Text and category filtering over the catalog.
//!
//! Filtering is a pure, order-preserving derivation: the result is always a
//! subsequence of [`Catalog::products`]. Both predicates are ANDed:
//!
//! - with a category set, only products in that category survive;
//! - with a non-blank query, only products whose name or description contains
//!   the trimmed, lowercased query survive.
//!
//! ```rust
//! use loja_core::{Catalog, CatalogFilter};
//!
//! let catalog = Catalog::builtin();
//! let hits = CatalogFilter::new("  TURBO ", None).apply(&catalog);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id.as_str(), "car-blista-ap");
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::CategoryId;

/// The two inputs of the filter.
///
/// Two filters that differ only in query whitespace or casing select the same
/// products; [`CatalogFilter::normalized`] gives the canonical form, which is
/// what callers should use as a memoization key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Free-text query.
    #[serde(default)]
    pub query: String,
    /// Selected category tab, `None` for all categories.
    #[serde(default)]
    pub category: Option<CategoryId>,
}

impl CatalogFilter {
    /// Create a filter from raw user input.
    #[must_use]
    pub fn new(query: impl Into<String>, category: Option<CategoryId>) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    /// Trimmed, lowercased copy of this filter.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            query: self.query.trim().to_lowercase(),
            category: self.category.clone(),
        }
    }

    /// Whether this filter lets the whole catalog through.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_none() && self.query.trim().is_empty()
    }

    /// Whether `product` passes both predicates.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.query.trim().to_lowercase();
        self.matches_normalized(product, &needle)
    }

    fn matches_normalized(&self, product: &Product, needle: &str) -> bool {
        let in_category = self
            .category
            .as_ref()
            .is_none_or(|category| &product.category == category);
        in_category && (needle.is_empty() || product.matches_text(needle))
    }

    /// Positions (into [`Catalog::products`]) of the surviving products, in
    /// catalog order.
    #[must_use]
    pub fn positions(&self, catalog: &Catalog) -> Vec<usize> {
        let needle = self.query.trim().to_lowercase();
        catalog
            .products()
            .iter()
            .enumerate()
            .filter(|(_, product)| self.matches_normalized(product, &needle))
            .map(|(position, _)| position)
            .collect()
    }

    /// The surviving products, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let needle = self.query.trim().to_lowercase();
        catalog
            .products()
            .iter()
            .filter(|product| self.matches_normalized(product, &needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_returns_full_catalog() {
        let catalog = Catalog::builtin();
        let all = CatalogFilter::default().apply(&catalog);
        assert_eq!(all.len(), catalog.products().len());
        assert!(CatalogFilter::new("   ", None).is_unfiltered());
    }

    #[test]
    fn test_category_only() {
        let catalog = Catalog::builtin();
        let vip = CatalogFilter::new("", Some(CategoryId::new("vip"))).apply(&catalog);
        assert_eq!(ids(&vip), ["vip-bronze", "vip-prata", "vip-ouro"]);
    }

    #[test]
    fn test_every_product_is_found_by_its_category() {
        let catalog = Catalog::builtin();
        for product in catalog.products() {
            let hits = CatalogFilter::new("", Some(product.category.clone())).apply(&catalog);
            assert!(hits.iter().any(|p| p.id == product.id));
        }
    }

    #[test]
    fn test_turbo_matches_only_blista() {
        let catalog = Catalog::builtin();
        let hits = CatalogFilter::new("turbo", None).apply(&catalog);
        assert_eq!(ids(&hits), ["car-blista-ap"]);
    }

    #[test]
    fn test_query_is_case_insensitive_and_trimmed() {
        let catalog = Catalog::builtin();
        let hits = CatalogFilter::new("  HANDLING ", None).apply(&catalog);
        assert_eq!(ids(&hits), ["handling-drift-rwd", "handling-carga-pesada"]);
    }

    #[test]
    fn test_query_matches_description() {
        let catalog = Catalog::builtin();
        let hits = CatalogFilter::new("garagem", None).apply(&catalog);
        assert_eq!(ids(&hits), ["vip-prata"]);
    }

    #[test]
    fn test_query_matches_accented_text() {
        let catalog = Catalog::builtin();
        let hits = CatalogFilter::new("RÁDIO", None).apply(&catalog);
        assert_eq!(ids(&hits), ["mod-radio-px"]);
    }

    #[test]
    fn test_predicates_are_anded() {
        let catalog = Catalog::builtin();
        let hits = CatalogFilter::new("turbo", Some(CategoryId::new("vip"))).apply(&catalog);
        assert!(hits.is_empty());

        let hits = CatalogFilter::new("mta", Some(CategoryId::new("veiculos"))).apply(&catalog);
        assert_eq!(ids(&hits), ["car-hustler-fusca"]);
    }

    #[test]
    fn test_unknown_category_yields_nothing() {
        let catalog = Catalog::builtin();
        let hits = CatalogFilter::new("", Some(CategoryId::new("armas"))).apply(&catalog);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_results_preserve_catalog_order() {
        let catalog = Catalog::builtin();
        let positions = CatalogFilter::new("a", None).positions(&catalog);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            positions.len(),
            CatalogFilter::new("a", None).apply(&catalog).len()
        );
    }

    #[test]
    fn test_normalized_filters_share_a_key() {
        let a = CatalogFilter::new(" Vip ", None).normalized();
        let b = CatalogFilter::new("vip", None).normalized();
        assert_eq!(a, b);
    }
}
