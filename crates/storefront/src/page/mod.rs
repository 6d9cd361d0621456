//! Page session: the cart plus the page controls wired to it.
//!
//! [`CartPage`] is what a storefront page holds for its lifetime: the cart
//! store rendering into HTML fragments, the toast, and whether the cart
//! sidebar is open. Page controls reach the cart only through
//! [`CartPage::dispatch`] and [`CartPage::checkout`].

pub mod controls;
pub mod toast;

use std::sync::Arc;
use std::time::Duration;

pub use controls::{CartAction, CheckoutOutcome, Dispatched, checkout, dispatch, parse_id};
pub use toast::{ADDED_MESSAGE, Toast, ToastState};

use crate::cart::{CartStore, Fragments, HtmlSurface, PriceFormat, Storage};
use crate::catalog::CatalogLookup;
use crate::effects::EffectScheduler;

/// Page-level display settings.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub format: PriceFormat,
    pub pulse: Duration,
    pub toast: Duration,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            format: PriceFormat::default(),
            pulse: crate::cart::render::DEFAULT_PULSE,
            toast: toast::DEFAULT_TOAST,
        }
    }
}

/// A storefront page session.
///
/// The sidebar flag is the in-process model of the cart panel. The HTTP
/// host renders every page with the panel closed and the browser keeps its
/// own copy of the flag in the page script, so only library callers read
/// [`CartPage::is_sidebar_open`].
pub struct CartPage<S> {
    store: CartStore<S, HtmlSurface>,
    toast: Toast,
    sidebar_open: bool,
}

impl<S: Storage> CartPage<S> {
    /// Restore the saved cart from `storage` and render it.
    pub fn open(
        storage: S,
        catalog: Arc<dyn CatalogLookup>,
        settings: &PageSettings,
        effects: &EffectScheduler,
    ) -> Self {
        let surface = HtmlSurface::new(effects.clone(), settings.pulse);
        let store = CartStore::open(storage, surface, catalog, settings.format.clone());

        Self {
            store,
            toast: Toast::new(effects.clone(), settings.toast),
            sidebar_open: false,
        }
    }

    /// Handle a delegated cart control.
    pub fn dispatch(&mut self, action: CartAction) -> Dispatched {
        let outcome = controls::dispatch(&mut self.store, action);
        if outcome == Dispatched::Added {
            self.toast.show(ADDED_MESSAGE);
        }
        outcome
    }

    /// Handle the checkout button.
    ///
    /// A placed order closes the sidebar; an empty cart only shows a prompt.
    pub fn checkout(&mut self) -> CheckoutOutcome {
        let outcome = controls::checkout(&mut self.store);
        match outcome {
            CheckoutOutcome::Placed => self.close_cart(),
            CheckoutOutcome::EmptyCart => self.toast.show(outcome.message()),
        }
        outcome
    }

    pub const fn toggle_cart(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub const fn close_cart(&mut self) {
        self.sidebar_open = false;
    }

    /// Keyboard shortcut handling: Escape closes the sidebar.
    pub fn handle_key(&mut self, key: &str) {
        if key == "Escape" {
            self.close_cart();
        }
    }

    #[must_use]
    pub const fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    #[must_use]
    pub fn fragments(&self) -> Fragments {
        self.store.surface().fragments()
    }

    #[must_use]
    pub fn toast(&self) -> ToastState {
        self.toast.current()
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S, HtmlSurface> {
        &self.store
    }

    /// Close the page, handing back its storage.
    pub fn into_storage(self) -> S {
        self.store.into_parts().0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ochag_core::{Money, ProductId};

    use super::*;
    use crate::cart::{MemoryStorage, STORAGE_KEY, Snapshot};
    use crate::catalog::Catalog;

    fn open(storage: MemoryStorage) -> CartPage<MemoryStorage> {
        CartPage::open(
            storage,
            Arc::new(Catalog::menu()),
            &PageSettings::default(),
            &EffectScheduler::disabled(),
        )
    }

    #[test]
    fn test_add_shows_toast_and_updates_fragments() {
        let mut page = open(MemoryStorage::new());
        page.dispatch(CartAction::Add(ProductId::new(1)));

        assert_eq!(page.toast().message, ADDED_MESSAGE);
        assert!(page.toast().active);
        assert!(page.fragments().items.contains("Маргарита"));
        assert_eq!(page.fragments().total, "590 ₽");
    }

    #[test]
    fn test_unknown_product_shows_no_toast() {
        let mut page = open(MemoryStorage::new());
        page.dispatch(CartAction::Add(ProductId::new(77)));
        assert!(!page.toast().active);
    }

    #[test]
    fn test_reload_restores_cart() {
        let mut page = open(MemoryStorage::new());
        page.dispatch(CartAction::Add(ProductId::new(3)));
        page.dispatch(CartAction::Add(ProductId::new(3)));
        page.dispatch(CartAction::Add(ProductId::new(4)));
        let before = page.store().state().clone();

        let reloaded = open(page.into_storage());
        assert_eq!(reloaded.store().state(), &before);
        assert_eq!(reloaded.store().total(), Money::new(750 * 2 + 720));
    }

    #[test]
    fn test_checkout_flow() {
        let mut page = open(MemoryStorage::new());
        page.toggle_cart();
        assert!(page.is_sidebar_open());

        assert_eq!(page.checkout(), CheckoutOutcome::EmptyCart);
        assert_eq!(page.toast().message, controls::EMPTY_CART_MESSAGE);
        assert!(page.is_sidebar_open());

        page.dispatch(CartAction::Add(ProductId::new(2)));
        assert_eq!(page.checkout(), CheckoutOutcome::Placed);
        assert!(!page.is_sidebar_open());
        assert!(page.fragments().items.contains("Корзина пуста"));

        let storage = page.into_storage();
        let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        let snapshot = Snapshot::decode(&raw).unwrap();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total, Money::ZERO);
    }

    #[test]
    fn test_escape_closes_sidebar() {
        let mut page = open(MemoryStorage::new());
        page.toggle_cart();
        page.handle_key("Enter");
        assert!(page.is_sidebar_open());
        page.handle_key("Escape");
        assert!(!page.is_sidebar_open());
        page.toggle_cart();
        page.toggle_cart();
        assert!(!page.is_sidebar_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_effects_expire_without_touching_the_cart() {
        let mut page = CartPage::open(
            MemoryStorage::new(),
            Arc::new(Catalog::menu()),
            &PageSettings::default(),
            &EffectScheduler::current(),
        );
        page.dispatch(CartAction::Add(ProductId::new(5)));
        let state = page.store().state().clone();
        assert!(page.fragments().count.contains("pulse"));

        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(!page.toast().active);
        assert!(!page.fragments().count.contains("pulse"));
        assert_eq!(page.store().state(), &state);
    }
}
