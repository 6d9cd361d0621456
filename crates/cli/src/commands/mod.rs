//! CLI command implementations.

pub mod cart;
pub mod menu;

use ochag_core::ProductId;
use ochag_storefront::catalog::CatalogError;
use thiserror::Error;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load menu: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Product {0} is not on the menu")]
    UnknownProduct(ProductId),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
