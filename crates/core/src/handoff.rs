//! Hooks that hand the cart to an external ordering channel.
//!
//! The store never takes payment. "Finalizar pedido" and "Salvar carrinho"
//! pass an owned [`CartSnapshot`] to whatever [`CartHandoff`] the application
//! was built with. The trait is the whole contract: how a ticket is opened or
//! how a cart code is encoded belongs to the implementation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartSummary;
use crate::types::{Locale, ProductId, format_brl_in};

/// Errors reported by a [`CartHandoff`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    /// There is nothing to hand off.
    #[error("cart is empty")]
    EmptyCart,
    /// The implementation does not provide this action.
    #[error("{0} is not available")]
    Unsupported(&'static str),
    /// The external channel rejected or failed the request.
    #[error("handoff failed: {0}")]
    Failed(String),
}

/// One line of a [`CartSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Owned copy of a materialized cart, safe to send anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<SnapshotLine>,
    pub subtotal: Decimal,
}

impl CartSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text order summary, one line per product plus the subtotal.
    ///
    /// ```text
    /// 2x VIP Bronze (30 dias) — R$ 29,80
    /// Subtotal: R$ 29,80
    /// ```
    #[must_use]
    pub fn to_text(&self, locale: &Locale) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&format!(
                "{}x {} — {}\n",
                line.quantity,
                line.name,
                format_brl_in(line.line_total, locale)
            ));
        }
        out.push_str(&format!(
            "Subtotal: {}",
            format_brl_in(self.subtotal, locale)
        ));
        out
    }
}

impl From<&CartSummary<'_>> for CartSnapshot {
    fn from(summary: &CartSummary<'_>) -> Self {
        Self {
            lines: summary
                .lines
                .iter()
                .map(|line| SnapshotLine {
                    id: line.product.id.clone(),
                    name: line.product.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.product.price.amount,
                    line_total: line.line_total(),
                })
                .collect(),
            subtotal: summary.subtotal,
        }
    }
}

/// What a handoff produced, shown back to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffReceipt {
    /// Short message for the visitor.
    pub message: String,
    /// Text the visitor should paste into the ticket, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_text: Option<String>,
    /// Portable cart code, if the implementation issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_code: Option<String>,
}

/// External ordering channel.
///
/// Implementations must be cheap to call from request handlers; anything slow
/// belongs behind a queue inside the implementation.
pub trait CartHandoff: Send + Sync {
    /// Hand a finished order to the channel.
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError`] when the cart is empty or the channel fails.
    fn finalize_order(&self, snapshot: &CartSnapshot) -> Result<HandoffReceipt, HandoffError>;

    /// Produce a code from which the cart can be rebuilt later.
    ///
    /// # Errors
    ///
    /// Defaults to [`HandoffError::Unsupported`].
    fn save_cart(&self, snapshot: &CartSnapshot) -> Result<HandoffReceipt, HandoffError> {
        let _ = snapshot;
        Err(HandoffError::Unsupported("saving carts"))
    }
}
