//! Cart state aggregate.
//!
//! [`CartState`] is the in-memory cart: an ordered list of [`LineItem`]s plus
//! a cached total. Every method here is a pure state transition; storing the
//! result and refreshing the page is the caller's job.
//!
//! Two invariants hold for every state reachable through this API:
//! - `total == Σ price * quantity` once [`CartState::recalculate_total`] has run
//! - no line is ever stored with a quantity of zero

use serde::{Deserialize, Serialize};

use super::{Money, ProductId};

/// A product as offered by a catalog "add to cart" control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Create a product without an embedded image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// One product entry in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    /// Always at least 1 while the line is in the cart.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

impl From<Product> for LineItem {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: 1,
            image: product.image,
        }
    }
}

/// Result of applying a quantity delta to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// No line with that id exists; nothing changed.
    Missing,
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
    /// The line now has this quantity.
    Updated(u32),
}

/// The full set of line items plus the derived total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Lines in first-added order.
    pub items: Vec<LineItem>,
    /// Cached `Σ price * quantity`.
    pub total: Money,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            total: Money::ZERO,
        }
    }

    /// Add one unit of `product`.
    ///
    /// An existing line only gains quantity: its name, price and image stay
    /// as they were when first added, even if `product` carries different
    /// values. A new product is appended at the end with quantity 1.
    pub fn add(&mut self, product: Product) {
        match self.find_mut(product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.items.push(LineItem::from(product)),
        }
    }

    /// Remove the line with `id`. Returns `true` if a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.id != id);
        self.items.len() != before
    }

    /// Add `delta` to the quantity of the line with `id`.
    ///
    /// A resulting quantity of zero or less removes the line entirely rather
    /// than clamping it.
    pub fn adjust(&mut self, id: ProductId, delta: i64) -> Adjustment {
        let Some(line) = self.find_mut(id) else {
            return Adjustment::Missing;
        };

        let next = i64::from(line.quantity).saturating_add(delta);
        if next <= 0 {
            self.remove(id);
            return Adjustment::Removed;
        }

        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Adjustment::Updated(line.quantity)
    }

    /// Re-derive the cached total from the lines.
    pub fn recalculate_total(&mut self) {
        self.total = self.computed_total();
    }

    /// `Σ price * quantity` over the current lines, ignoring the cache.
    #[must_use]
    pub fn computed_total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Money::ZERO;
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|line| line.id == id)
    }
}
