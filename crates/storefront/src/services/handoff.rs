//! Discord ticket handoff.
//!
//! Orders are closed by staff inside a Discord ticket. Finalizing a cart here
//! only logs the order and gives the visitor a text summary to paste into the
//! ticket; nothing is sent anywhere.

use loja_core::{CartHandoff, CartSnapshot, HandoffError, HandoffReceipt, Locale, format_brl_in};
use tracing::info;

/// [`CartHandoff`] that produces a ticket summary for the visitor.
///
/// Saving carts is left to the trait default ([`HandoffError::Unsupported`]):
/// cart codes are issued by the Discord bot, not by the site.
#[derive(Debug, Clone)]
pub struct TicketSummaryHandoff {
    locale: Locale,
    discord_invite: String,
}

impl TicketSummaryHandoff {
    #[must_use]
    pub const fn new(locale: Locale, discord_invite: String) -> Self {
        Self {
            locale,
            discord_invite,
        }
    }
}

impl CartHandoff for TicketSummaryHandoff {
    fn finalize_order(&self, snapshot: &CartSnapshot) -> Result<HandoffReceipt, HandoffError> {
        if snapshot.is_empty() {
            return Err(HandoffError::EmptyCart);
        }

        info!(
            lines = snapshot.lines.len(),
            subtotal = %format_brl_in(snapshot.subtotal, &self.locale),
            "Order ready for Discord ticket"
        );

        Ok(HandoffReceipt {
            message: format!(
                "Abra um ticket no Discord ({}) e cole o resumo abaixo para combinar pagamento e entrega.",
                self.discord_invite
            ),
            ticket_text: Some(snapshot.to_text(&self.locale)),
            cart_code: None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use loja_core::{Cart, Catalog};

    use super::*;

    fn handoff() -> TicketSummaryHandoff {
        TicketSummaryHandoff::new(Locale::PtBr, "discord.gg/teste".to_string())
    }

    #[test]
    fn test_finalize_returns_ticket_text() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(catalog.product("mod-radio-px").unwrap());
        let snapshot = CartSnapshot::from(&cart.summary(&catalog));

        let receipt = handoff().finalize_order(&snapshot).unwrap();
        assert!(receipt.message.contains("discord.gg/teste"));
        let text = receipt.ticket_text.unwrap();
        assert!(text.contains("1x Rádio PX BR"));
        assert!(text.ends_with("Subtotal: R$ 9,90"));
        assert!(receipt.cart_code.is_none());
    }

    #[test]
    fn test_finalize_rejects_empty_cart() {
        let err = handoff()
            .finalize_order(&CartSnapshot::default())
            .unwrap_err();
        assert_eq!(err, HandoffError::EmptyCart);
    }

    #[test]
    fn test_save_is_unsupported() {
        let err = handoff().save_cart(&CartSnapshot::default()).unwrap_err();
        assert!(matches!(err, HandoffError::Unsupported(_)));
    }
}
