//! Session-related types.
//!
//! The cart lives in the visitor's session and nowhere else. It disappears
//! when the session expires or the process restarts.

use loja_core::Cart;
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart.
    pub const CART: &str = "cart";
}

/// Load the cart from the session, empty when none was stored.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value is corrupt.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the cart in the session. An empty cart removes the key.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn store_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    if cart.is_empty() {
        session.remove_value(keys::CART).await?;
    } else {
        session.insert(keys::CART, cart).await?;
    }
    Ok(())
}
