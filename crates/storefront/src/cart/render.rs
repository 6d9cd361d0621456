//! Cart projections and render targets.
//!
//! Rendering is a pure projection of [`CartState`] into a [`CartView`]
//! (badge, rows, total), pushed to a [`RenderTarget`]. Projecting the same
//! state twice gives the same view, and a target fed the same view twice
//! shows the same output.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use askama::Template;
use ochag_core::{CartState, ProductId};

use super::format::PriceFormat;
use crate::catalog::CatalogLookup;
use crate::effects::{EffectHandle, EffectScheduler};

/// Default time the badge keeps its pulse class after a change.
pub const DEFAULT_PULSE: Duration = Duration::from_millis(500);

// =============================================================================
// Views
// =============================================================================

/// Count badge state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    /// Sum of quantities.
    pub count: u64,
    /// The badge is shown only for a non-empty cart.
    pub active: bool,
    /// Ask the surface to play the pulse animation.
    pub pulse: bool,
}

impl BadgeView {
    #[must_use]
    pub const fn from_count(count: u64) -> Self {
        Self {
            count,
            active: count > 0,
            pulse: count > 0,
        }
    }
}

/// One cart row as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub image: String,
}

/// Everything the page shows about the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub badge: BadgeView,
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl CartView {
    /// Project `state` for display.
    ///
    /// Lines without an embedded image get the catalog's image for their id.
    #[must_use]
    pub fn project(state: &CartState, catalog: &dyn CatalogLookup, format: &PriceFormat) -> Self {
        let items = state
            .items
            .iter()
            .map(|line| CartItemView {
                id: line.id,
                name: line.name.clone(),
                price: format.unit_price(line.price),
                quantity: line.quantity,
                image: line
                    .image
                    .clone()
                    .unwrap_or_else(|| catalog.image_for(line.id).to_string()),
            })
            .collect();

        Self {
            badge: BadgeView::from_count(state.item_count()),
            items,
            total: format.total(state.total),
        }
    }
}

// =============================================================================
// Render target
// =============================================================================

/// A surface showing the cart: count badge, itemized list and total.
pub trait RenderTarget {
    fn update_count(&mut self, badge: &BadgeView);

    fn render_items(&mut self, items: &[CartItemView]);

    fn update_total(&mut self, total: &str);

    /// Refresh all three projections, in page order.
    fn update_ui(&mut self, view: &CartView) {
        self.update_count(&view.badge);
        self.render_items(&view.items);
        self.update_total(&view.total);
    }
}

// =============================================================================
// HTML surface
// =============================================================================

/// Count badge fragment.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate<'a> {
    pub badge: &'a BadgeView,
    /// Length of the pulse animation, in milliseconds.
    pub pulse_ms: u128,
}

/// Cart rows fragment (or the empty-cart message).
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate<'a> {
    pub items: &'a [CartItemView],
}

/// The last rendered HTML for each cart surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    /// `<span id="cartCount">` badge element.
    pub count: String,
    /// Inner HTML of the `#cartItems` container.
    pub items: String,
    /// Text of the `#totalPrice` element.
    pub total: String,
}

/// Render target producing HTML fragments.
///
/// The badge pulse is undone by a scheduled effect after `pulse` has
/// elapsed; a newer badge render cancels the pending one.
#[derive(Debug)]
pub struct HtmlSurface {
    fragments: Arc<Mutex<Fragments>>,
    effects: EffectScheduler,
    pulse: Duration,
    pending_pulse: Option<EffectHandle>,
}

impl Default for HtmlSurface {
    fn default() -> Self {
        Self::new(EffectScheduler::disabled(), DEFAULT_PULSE)
    }
}

impl HtmlSurface {
    #[must_use]
    pub fn new(effects: EffectScheduler, pulse: Duration) -> Self {
        Self {
            fragments: Arc::new(Mutex::new(Fragments::default())),
            effects,
            pulse,
            pending_pulse: None,
        }
    }

    /// Snapshot of the current fragments.
    #[must_use]
    pub fn fragments(&self) -> Fragments {
        lock(&self.fragments).clone()
    }
}

impl RenderTarget for HtmlSurface {
    fn update_count(&mut self, badge: &BadgeView) {
        if let Some(pending) = self.pending_pulse.take() {
            pending.cancel();
        }

        lock(&self.fragments).count = render_badge(badge, self.pulse);

        if badge.pulse {
            let settled = BadgeView {
                pulse: false,
                ..badge.clone()
            };
            let fragments = Arc::clone(&self.fragments);
            let pulse = self.pulse;
            self.pending_pulse = self.effects.schedule(pulse, move || {
                lock(&fragments).count = render_badge(&settled, pulse);
            });
        }
    }

    fn render_items(&mut self, items: &[CartItemView]) {
        let html = CartItemsTemplate { items }
            .render()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to render cart items");
                String::new()
            });
        lock(&self.fragments).items = html;
    }

    fn update_total(&mut self, total: &str) {
        lock(&self.fragments).total = total.to_string();
    }
}

fn render_badge(badge: &BadgeView, pulse: Duration) -> String {
    let template = CartCountTemplate {
        badge,
        pulse_ms: pulse.as_millis(),
    };
    template.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to render cart count");
        String::new()
    })
}

fn lock(fragments: &Mutex<Fragments>) -> MutexGuard<'_, Fragments> {
    fragments.lock().unwrap_or_else(PoisonError::into_inner)
}
