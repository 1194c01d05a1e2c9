//! Loja BMF Core - Shared storefront logic.
//!
//! This crate provides the types and pure logic used by every Loja BMF component:
//! - `storefront` - Public catalog and cart site
//! - `cli` - Command-line tools for inspecting and validating catalogs
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no I/O, no
//! HTTP, no sessions. Anything that talks to the outside world (Discord
//! tickets, cart codes) is modelled as a trait in [`handoff`].
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and BRL prices
//! - [`catalog`] - The static product/category catalog
//! - [`filter`] - Text and category filtering over the catalog
//! - [`cart`] - Session-local cart reducer and line item materialization
//! - [`handoff`] - External finalize/save hooks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod filter;
pub mod handoff;
pub mod types;

pub use cart::{Cart, CartSummary, LineItem};
pub use catalog::{Catalog, CatalogError, Category, Product};
pub use filter::CatalogFilter;
pub use handoff::{CartHandoff, CartSnapshot, HandoffError, HandoffReceipt, SnapshotLine};
pub use types::*;
