//! Core types for Loja BMF.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{
    CurrencyCode, Locale, LocaleError, Price, format_brl, format_brl_in, format_fixed,
    format_localized,
};
