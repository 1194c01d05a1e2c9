//! Session models for storefront.

pub mod session;

pub use session::{keys as session_keys, load_cart, store_cart};
