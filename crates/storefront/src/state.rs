//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError, CatalogLookup};
use crate::config::StorefrontConfig;
use crate::page::PageSettings;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds only read-only data:
/// each visitor's cart lives in their session, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    settings: PageSettings,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads the menu from `config.menu_path` when set, otherwise uses the
    /// built-in menu.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the configured menu file cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.menu_path {
            Some(path) => {
                let catalog = Catalog::from_json_file(path)?;
                tracing::info!(path = %path.display(), products = catalog.products().len(), "Menu loaded");
                catalog
            }
            None => Catalog::menu(),
        };

        Ok(Self::with_catalog(config, catalog))
    }

    /// Create application state around an existing catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let settings = config.display.page_settings();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Arc::new(catalog),
                settings,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The menu.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The menu as a shared lookup for cart stores.
    #[must_use]
    pub fn catalog_lookup(&self) -> Arc<dyn CatalogLookup> {
        self.inner.catalog.clone()
    }

    /// Cart display settings.
    #[must_use]
    pub fn page_settings(&self) -> &PageSettings {
        &self.inner.settings
    }
}
