//! Cart commands against the cart saved in the data directory.
//!
//! Each invocation is one page visit: the saved cart is restored, a single
//! control is applied, and the store writes the snapshot back before the
//! process exits.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use ochag_storefront::cart::{CartStore, FileStorage, PriceFormat};
use ochag_storefront::catalog::CatalogLookup;
use ochag_storefront::page::{self, CartAction, CheckoutOutcome, Dispatched};

use super::CliError;
use crate::surface::TextSurface;

pub type CliStore = CartStore<FileStorage, TextSurface>;

/// Restore the cart saved under `data_dir`.
pub fn open(data_dir: &Path, catalog: Arc<dyn CatalogLookup>, format: PriceFormat) -> CliStore {
    tracing::debug!(data_dir = %data_dir.display(), "Opening cart");
    CartStore::open(FileStorage::new(data_dir), TextSurface::new(), catalog, format)
}

/// Print the cart.
///
/// # Errors
///
/// Returns `CliError::Output` if `out` cannot be written.
pub fn show(store: &CliStore, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", store.surface().render())?;
    Ok(())
}

/// Apply one cart control and print the result.
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` when adding a product the menu does
/// not offer, or `CliError::Output` if `out` cannot be written.
pub fn apply(store: &mut CliStore, action: CartAction, out: &mut impl Write) -> Result<(), CliError> {
    if page::dispatch(store, action) == Dispatched::UnknownProduct {
        return Err(CliError::UnknownProduct(action.product_id()));
    }
    show(store, out)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CliError::Output` if `out` cannot be written.
pub fn clear(store: &mut CliStore, out: &mut impl Write) -> Result<(), CliError> {
    store.clear();
    show(store, out)
}

/// Place the order.
///
/// # Errors
///
/// Returns `CliError::Output` if `out` cannot be written.
pub fn checkout(store: &mut CliStore, out: &mut impl Write) -> Result<CheckoutOutcome, CliError> {
    let outcome = page::checkout(store);
    writeln!(out, "{}", outcome.message())?;
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ochag_core::{Money, ProductId};
    use ochag_storefront::catalog::Catalog;
    use tempfile::tempdir;

    use super::*;

    fn open_in(dir: &Path) -> CliStore {
        open(dir, Arc::new(Catalog::menu()), PriceFormat::default())
    }

    fn output(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cart_survives_between_invocations() {
        let dir = tempdir().unwrap();

        let mut store = open_in(dir.path());
        apply(&mut store, CartAction::Add(ProductId::new(1)), &mut Vec::new()).unwrap();
        apply(&mut store, CartAction::Add(ProductId::new(1)), &mut Vec::new()).unwrap();
        drop(store);

        let mut store = open_in(dir.path());
        assert_eq!(store.items()[0].quantity, 2);

        let text = output(|out| {
            apply(&mut store, CartAction::Increment(ProductId::new(1)), out).unwrap();
        });
        assert!(text.contains("Маргарита × 3"));
        assert!(text.contains("Итого: 1\u{a0}770 ₽"));
    }

    #[test]
    fn test_unknown_product_is_an_error() {
        let dir = tempdir().unwrap();
        let mut store = open_in(dir.path());

        let err = apply(&mut store, CartAction::Add(ProductId::new(42)), &mut Vec::new());
        assert!(matches!(err, Err(CliError::UnknownProduct(id)) if id == ProductId::new(42)));
        assert!(!dir.path().join("ochag_cart.json").exists());
    }

    #[test]
    fn test_checkout_clears_saved_cart() {
        let dir = tempdir().unwrap();
        let mut store = open_in(dir.path());
        apply(&mut store, CartAction::Add(ProductId::new(6)), &mut Vec::new()).unwrap();

        let text = output(|out| {
            assert_eq!(checkout(&mut store, out).unwrap(), CheckoutOutcome::Placed);
        });
        assert!(text.starts_with("Спасибо за заказ!"));

        let store = open_in(dir.path());
        assert!(store.is_empty());
        assert_eq!(store.total(), Money::ZERO);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let dir = tempdir().unwrap();
        let mut store = open_in(dir.path());

        let text = output(|out| {
            assert_eq!(checkout(&mut store, out).unwrap(), CheckoutOutcome::EmptyCart);
        });
        assert_eq!(text, "Добавьте пиццу в корзину\n");
    }
}
