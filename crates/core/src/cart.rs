//! Session-local shopping cart.
//!
//! A [`Cart`] maps product ids to quantities in insertion order. Zero-quantity
//! entries are pruned when they happen, so a key is either present with a
//! quantity of at least one or absent. There is no "present with zero" state.
//!
//! All mutations are total: they never fail and never produce a negative
//! quantity.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::ProductId;

type Lines = IndexMap<ProductId, u32>;

/// Stored form of a cart: `[id, quantity]` pairs.
///
/// A JSON object would not do here, since session stores may hold values in
/// maps that sort their keys.
type Entries = Vec<(ProductId, u32)>;

/// Product id to quantity, in the order products were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Entries", into = "Entries")]
pub struct Cart {
    lines: Lines,
}

impl From<Lines> for Cart {
    fn from(mut lines: Lines) -> Self {
        lines.retain(|_, quantity| *quantity > 0);
        Self { lines }
    }
}

impl From<Entries> for Cart {
    fn from(entries: Entries) -> Self {
        let mut lines = Lines::with_capacity(entries.len());
        for (id, quantity) in entries {
            let entry = lines.entry(id).or_insert(0);
            *entry = entry.saturating_add(quantity);
        }
        Self::from(lines)
    }
}

impl From<Cart> for Entries {
    fn from(cart: Cart) -> Self {
        cart.lines.into_iter().collect()
    }
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the quantity of `product`, adding it when missing.
    ///
    /// Taking a catalog [`Product`] rather than a bare id keeps every key a
    /// valid product id. Returns the new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        let quantity = self.lines.entry(product.id.clone()).or_insert(0);
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Decrement the quantity of `id`, flooring at zero.
    ///
    /// An entry that reaches zero is removed. Returns the new quantity.
    pub fn subtract(&mut self, id: &str) -> u32 {
        let Some(quantity) = self.lines.get_mut(id) else {
            return 0;
        };
        if *quantity <= 1 {
            self.lines.shift_remove(id);
            return 0;
        }
        *quantity -= 1;
        *quantity
    }

    /// Remove `id` regardless of its quantity. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.lines.shift_remove(id).is_some()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Quantity of `id`, zero when absent.
    #[must_use]
    pub fn quantity(&self, id: &str) -> u32 {
        self.lines.get(id).copied().unwrap_or(0)
    }

    /// Whether `id` has a positive quantity.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lines.contains_key(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.values().map(|&q| u64::from(q)).sum()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.lines.iter().map(|(id, &quantity)| (id, quantity))
    }

    /// Join the cart against `catalog`.
    ///
    /// Entries whose product is no longer in the catalog are skipped.
    #[must_use]
    pub fn line_items<'a>(&self, catalog: &'a Catalog) -> Vec<LineItem<'a>> {
        self.lines
            .iter()
            .filter(|&(_, &quantity)| quantity > 0)
            .filter_map(|(id, &quantity)| {
                catalog
                    .product(id.as_str())
                    .map(|product| LineItem { product, quantity })
            })
            .collect()
    }

    /// Line items plus totals.
    #[must_use]
    pub fn summary<'a>(&self, catalog: &'a Catalog) -> CartSummary<'a> {
        let lines = self.line_items(catalog);
        let subtotal = subtotal(&lines);
        CartSummary { lines, subtotal }
    }
}

/// A cart entry joined with its product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem<'a> {
    pub product: &'a Product,
    pub quantity: u32,
}

impl LineItem<'_> {
    /// Unit price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// Sum of `unit price × quantity` over `lines`, unrounded.
#[must_use]
pub fn subtotal(lines: &[LineItem<'_>]) -> Decimal {
    lines.iter().map(LineItem::line_total).sum()
}

/// Materialized cart view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary<'a> {
    pub lines: Vec<LineItem<'a>>,
    pub subtotal: Decimal,
}

impl CartSummary<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over the materialized lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::format_brl;

    fn product<'a>(catalog: &'a Catalog, id: &str) -> &'a Product {
        catalog.product(id).unwrap()
    }

    #[test]
    fn test_add_subtract_remove_scenario() {
        let catalog = Catalog::builtin();
        let ouro = product(&catalog, "vip-ouro");
        let mut cart = Cart::new();

        assert_eq!(cart.add(ouro), 1);
        assert_eq!(cart.add(ouro), 2);
        assert_eq!(cart.subtract("vip-ouro"), 1);
        assert_eq!(cart.quantity("vip-ouro"), 1);
        assert!(cart.remove("vip-ouro"));
        assert!(!cart.contains("vip-ouro"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtract_floors_at_zero() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();

        assert_eq!(cart.subtract("vip-bronze"), 0);
        assert_eq!(cart.quantity("vip-bronze"), 0);

        cart.add(product(&catalog, "vip-bronze"));
        assert_eq!(cart.subtract("vip-bronze"), 0);
        assert_eq!(cart.subtract("vip-bronze"), 0);
        assert_eq!(cart.quantity("vip-bronze"), 0);
    }

    #[test]
    fn test_zero_quantity_entries_are_pruned() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "vip-prata"));
        cart.subtract("vip-prata");

        assert!(!cart.contains("vip-prata"));
        assert_eq!(cart.line_count(), 0);
        assert!(cart.line_items(&catalog).is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "rp-placa-custom"));
        cart.add(product(&catalog, "rp-placa-custom"));

        assert!(cart.remove("rp-placa-custom"));
        assert!(!cart.remove("rp-placa-custom"));
        assert!(
            cart.line_items(&catalog)
                .iter()
                .all(|line| line.product.id.as_str() != "rp-placa-custom")
        );
    }

    #[test]
    fn test_subtotal_is_exact() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "vip-bronze"));
        cart.add(product(&catalog, "vip-bronze"));
        cart.add(product(&catalog, "handling-drift-rwd"));

        let summary = cart.summary(&catalog);
        assert_eq!(summary.subtotal, Decimal::new(377, 1));
        assert_eq!(format_brl(summary.subtotal), "R$ 37,70");
        assert_eq!(summary.total_quantity(), 3);
    }

    #[test]
    fn test_line_items_keep_insertion_order() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "script-lojinha"));
        cart.add(product(&catalog, "vip-bronze"));
        cart.add(product(&catalog, "script-lojinha"));

        let ids: Vec<&str> = cart
            .line_items(&catalog)
            .iter()
            .map(|line| line.product.id.as_str())
            .collect();
        assert_eq!(ids, ["script-lojinha", "vip-bronze"]);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_line_items_skip_products_missing_from_catalog() {
        let mut lines = Lines::new();
        lines.insert(ProductId::new("descontinuado"), 2);
        lines.insert(ProductId::new("vip-ouro"), 1);
        let cart = Cart::from(lines);

        let catalog = Catalog::builtin();
        let summary = cart.summary(&catalog);
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.subtotal, Decimal::new(3990, 2));
    }

    #[test]
    fn test_deserialize_drops_zero_quantities() {
        let cart: Cart = serde_json::from_str(r#"[["vip-ouro", 0], ["vip-prata", 3]]"#).unwrap();
        assert!(!cart.contains("vip-ouro"));
        assert_eq!(cart.quantity("vip-prata"), 3);

        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"[["vip-prata",3]]"#);
    }

    #[test]
    fn test_json_value_keeps_insertion_order() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(product(&catalog, "vip-bronze"));
        cart.add(product(&catalog, "handling-drift-rwd"));
        cart.add(product(&catalog, "car-blista-ap"));

        // Session stores hold values as `serde_json::Value`.
        let value = serde_json::to_value(&cart).unwrap();
        let restored: Cart = serde_json::from_value(value).unwrap();

        let ids: Vec<&str> = restored.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["vip-bronze", "handling-drift-rwd", "car-blista-ap"]);
        assert_eq!(restored, cart);
    }
}
