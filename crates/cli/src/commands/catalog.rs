//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! loja catalog list --query "carga" --category handling
//! loja catalog validate --file catalog.json
//! loja catalog export
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use loja_core::{Catalog, CatalogError, CatalogFilter, CategoryId, format_brl};
use thiserror::Error;

/// Environment variable shared with the storefront.
pub const CATALOG_PATH_VAR: &str = "STOREFRONT_CATALOG_PATH";

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// Catalog file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Catalog file is not a valid catalog.
    #[error("Invalid catalog {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    /// Category id not present in the catalog.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Catalog path from `STOREFRONT_CATALOG_PATH`, if set and non-empty.
#[must_use]
pub fn path_from_env() -> Option<PathBuf> {
    std::env::var_os(CATALOG_PATH_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Load `path`, or the built-in catalog when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogCommandError> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogCommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json(&json).map_err(|source| CatalogCommandError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Print the filtered catalog, one product per line.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the category is unknown
/// or writing fails.
pub fn list(
    out: &mut impl Write,
    path: Option<&Path>,
    query: &str,
    category: Option<&str>,
) -> Result<(), CatalogCommandError> {
    let catalog = load(path)?;

    let category = match category {
        Some(id) => Some(
            catalog
                .category(id)
                .map(|c| c.id.clone())
                .ok_or_else(|| CatalogCommandError::UnknownCategory(id.to_owned()))?,
        ),
        None => None,
    };
    let filter = CatalogFilter::new(query, category);
    let products = filter.apply(&catalog);

    tracing::debug!(filter = ?filter, matches = products.len(), "Filtered catalog");

    if products.is_empty() {
        writeln!(out, "Nada encontrado")?;
        return Ok(());
    }

    let id_width = products.iter().map(|p| p.id.as_str().len()).max().unwrap_or(0);
    for product in &products {
        let badge = product
            .badge
            .as_deref()
            .map(|badge| format!(" [{badge}]"))
            .unwrap_or_default();
        writeln!(
            out,
            "{:<id_width$}  {:<10}  {:>10}  {}{badge}",
            product.id.as_str(),
            product.category.as_str(),
            format_brl(product.price.amount),
            product.name,
        )?;
    }
    writeln!(out, "{} produto(s)", products.len())?;
    Ok(())
}

/// Validate a catalog file and print a one-line report.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn validate(out: &mut impl Write, path: &Path) -> Result<(), CatalogCommandError> {
    let catalog = load(Some(path))?;
    let category_count = |id: &CategoryId| {
        catalog
            .products()
            .iter()
            .filter(|p| &p.category == id)
            .count()
    };

    writeln!(
        out,
        "{}: {} categorias, {} produtos",
        path.display(),
        catalog.categories().len(),
        catalog.products().len()
    )?;
    for category in catalog.categories() {
        let count = category_count(&category.id);
        if count == 0 {
            tracing::warn!(category = %category.id, "Category has no products");
        }
        writeln!(out, "  {:<10} {:>3}  {}", category.id.as_str(), count, category.label)?;
    }
    Ok(())
}

/// Print the built-in catalog as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn export(out: &mut impl Write) -> Result<(), CatalogCommandError> {
    writeln!(out, "{}", Catalog::builtin().to_json_pretty()?)?;
    Ok(())
}
