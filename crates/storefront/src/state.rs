//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use loja_core::{CartHandoff, Catalog, CatalogError};

use crate::config::StorefrontConfig;
use crate::content::StoreContent;
use crate::services::{CatalogService, TicketSummaryHandoff};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the handoff hook and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogService,
    handoff: Arc<dyn CartHandoff>,
    content: StoreContent,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Validated catalog
    /// * `handoff` - Hook receiving finished and saved carts
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, handoff: Arc<dyn CartHandoff>) -> Self {
        let content = StoreContent::new(&config.discord_invite);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: CatalogService::new(catalog),
                handoff,
                content,
            }),
        }
    }

    /// Create the state used by the binary: catalog from
    /// `STOREFRONT_CATALOG_PATH` (or the built-in one) and the Discord ticket
    /// handoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = load_catalog(&config)?;
        let handoff = Arc::new(TicketSummaryHandoff::new(
            config.locale.clone(),
            config.discord_invite.clone(),
        ));
        Ok(Self::new(config, catalog, handoff))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the handoff hook.
    #[must_use]
    pub fn handoff(&self) -> &dyn CartHandoff {
        self.inner.handoff.as_ref()
    }

    /// Get a reference to the static page content.
    #[must_use]
    pub fn content(&self) -> &StoreContent {
        &self.inner.content
    }
}

/// Load the configured catalog file, or the built-in catalog.
fn load_catalog(config: &StorefrontConfig) -> Result<Catalog, StateError> {
    let Some(path) = &config.catalog_path else {
        tracing::info!("Using built-in catalog");
        return Ok(Catalog::builtin());
    };

    let json = std::fs::read_to_string(path).map_err(|source| StateError::CatalogFile {
        path: path.clone(),
        source,
    })?;
    let catalog = Catalog::from_json(&json)?;
    tracing::info!(
        path = %path.display(),
        products = catalog.products().len(),
        categories = catalog.categories().len(),
        "Loaded catalog file"
    );
    Ok(catalog)
}
