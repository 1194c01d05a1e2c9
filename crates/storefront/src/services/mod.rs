//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Catalog access with memoized filter results
//! - `handoff` - Discord ticket handoff for finished carts

pub mod catalog;
pub mod handoff;

pub use catalog::CatalogService;
pub use handoff::TicketSummaryHandoff;
