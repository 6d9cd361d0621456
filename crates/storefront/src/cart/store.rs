//! The cart store.
//!
//! [`CartStore`] owns the cart state for the lifetime of a page session and
//! drives its two collaborators: a [`Storage`] backend holding the persisted
//! snapshot and a [`RenderTarget`] showing the cart. Every mutation runs the
//! same fixed sequence before returning:
//!
//! ```text
//! mutate -> recompute total -> persist snapshot -> render
//! ```
//!
//! None of the operations fail. Unknown ids are no-ops, quantity underflow
//! removes the line, and storage problems are logged and swallowed.

use std::sync::Arc;

use ochag_core::{Adjustment, CartState, LineItem, Money, Product, ProductId};
use tracing::instrument;

use super::format::PriceFormat;
use super::render::{CartView, RenderTarget};
use super::snapshot::{STORAGE_KEY, Snapshot};
use super::storage::Storage;
use crate::catalog::CatalogLookup;

/// Single owned cart instance.
pub struct CartStore<S, R> {
    state: CartState,
    storage: S,
    surface: R,
    catalog: Arc<dyn CatalogLookup>,
    format: PriceFormat,
    key: String,
}

impl<S: Storage, R: RenderTarget> CartStore<S, R> {
    /// Create a store with an empty cart. Nothing is loaded or rendered.
    pub fn new(storage: S, surface: R, catalog: Arc<dyn CatalogLookup>) -> Self {
        Self {
            state: CartState::new(),
            storage,
            surface,
            catalog,
            format: PriceFormat::default(),
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Create a store, restore the saved cart and render it.
    ///
    /// This is the page-startup sequence.
    pub fn open(
        storage: S,
        surface: R,
        catalog: Arc<dyn CatalogLookup>,
        format: PriceFormat,
    ) -> Self {
        let mut store = Self::new(storage, surface, catalog).with_format(format);
        store.load_from_storage();
        store.update_ui();
        store
    }

    /// Use `format` for prices and totals.
    #[must_use]
    pub fn with_format(mut self, format: PriceFormat) -> Self {
        self.format = format;
        self
    }

    /// Persist under `key` instead of the default storage key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of `product`.
    ///
    /// A product already in the cart only gains quantity; its stored name,
    /// price and image are not updated from `product`.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&mut self, product: Product) {
        self.state.add(product);
        self.commit();
    }

    /// Remove the line for `id`, if there is one.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: ProductId) {
        if !self.state.remove(id) {
            tracing::debug!("Remove for product not in cart");
        }
        self.commit();
    }

    /// Change the quantity of `id` by `delta`.
    ///
    /// Unknown ids are ignored. A quantity that would drop to zero or below
    /// removes the line.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) {
        match self.state.adjust(id, delta) {
            Adjustment::Missing => {
                tracing::debug!("Quantity change for product not in cart");
            }
            Adjustment::Removed => {
                tracing::debug!("Quantity dropped to zero, line removed");
                self.commit();
            }
            Adjustment::Updated(quantity) => {
                tracing::debug!(quantity, "Quantity updated");
                self.commit();
            }
        }
    }

    /// Empty the cart, persist and render.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.state.clear();
        self.commit();
    }

    /// Re-derive the cached total from the lines.
    pub fn calculate_total(&mut self) {
        self.state.recalculate_total();
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the current snapshot to storage.
    pub fn save_to_storage(&mut self) {
        let raw = match Snapshot::capture(&self.state).encode() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.key, &raw) {
            tracing::warn!(error = %e, key = %self.key, "Failed to save cart");
        }
    }

    /// Replace the cart with the saved snapshot.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart.
    pub fn load_from_storage(&mut self) {
        self.state = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => match Snapshot::decode(&raw) {
                Ok(snapshot) => {
                    tracing::debug!(
                        items = snapshot.items.len(),
                        saved_at = ?snapshot.saved_at,
                        "Restored saved cart"
                    );
                    snapshot.into_state()
                }
                Err(e) => {
                    tracing::warn!(error = %e, key = %self.key, "Ignoring malformed saved cart");
                    CartState::new()
                }
            },
            Ok(None) => CartState::new(),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Failed to read saved cart");
                CartState::new()
            }
        };
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// The current state as displayed.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::project(&self.state, self.catalog.as_ref(), &self.format)
    }

    /// Push the badge, list and total to the render target.
    pub fn update_ui(&mut self) {
        let view = self.view();
        self.surface.update_ui(&view);
    }

    fn commit(&mut self) {
        self.calculate_total();
        self.save_to_storage();
        self.update_ui();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    #[must_use]
    pub const fn total(&self) -> Money {
        self.state.total
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogLookup {
        self.catalog.as_ref()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn surface(&self) -> &R {
        &self.surface
    }

    /// Give back the storage backend and render target.
    pub fn into_parts(self) -> (S, R) {
        (self.storage, self.surface)
    }
}
