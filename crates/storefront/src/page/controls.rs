//! Delegated cart controls.
//!
//! Buttons on the page do not call into the cart directly. Each carries two
//! data attributes, an action name and a product id, and a single delegated
//! handler turns those into a [`CartAction`] and dispatches it to the
//! store's typed operations.

use core::fmt;

use ochag_core::ProductId;

use crate::cart::{CartStore, RenderTarget, Storage};

/// A cart control activated on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// Catalog "add to cart" button.
    Add(ProductId),
    /// Row "+" stepper.
    Increment(ProductId),
    /// Row "−" stepper.
    Decrement(ProductId),
    /// Row remove button.
    Remove(ProductId),
}

impl CartAction {
    /// Build an action from a control's `data-cart-action` and `data-id`
    /// values. Unknown action names or unparsable ids yield `None`.
    #[must_use]
    pub fn from_attributes(action: &str, id: &str) -> Option<Self> {
        let id = parse_id(id)?;
        match action.trim() {
            "add" => Some(Self::Add(id)),
            "increment" => Some(Self::Increment(id)),
            "decrement" => Some(Self::Decrement(id)),
            "remove" => Some(Self::Remove(id)),
            _ => None,
        }
    }

    /// The product the action targets.
    #[must_use]
    pub const fn product_id(self) -> ProductId {
        match self {
            Self::Add(id) | Self::Increment(id) | Self::Decrement(id) | Self::Remove(id) => id,
        }
    }

    /// The attribute value naming this action.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Increment(_) => "increment",
            Self::Decrement(_) => "decrement",
            Self::Remove(_) => "remove",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.product_id())
    }
}

/// Parse an id attribute the way browsers parse integers out of markup:
/// leading whitespace, an optional sign, then as many digits as follow.
/// `" 12px"` is 12; `"abc"` is nothing.
#[must_use]
pub fn parse_id(raw: &str) -> Option<ProductId> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..)?),
        Some(b'+') => (false, trimmed.get(1..)?),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let digits = rest.get(..digits_len).filter(|d| !d.is_empty())?;
    let value: i32 = digits.parse().ok()?;
    Some(ProductId::new(if negative { -value } else { value }))
}

/// What a dispatched action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A catalog product went into the cart.
    Added,
    /// A row quantity or removal was applied.
    Updated,
    /// The action named a product the catalog does not offer.
    UnknownProduct,
}

/// Route `action` to the matching store operation.
pub fn dispatch<S, R>(store: &mut CartStore<S, R>, action: CartAction) -> Dispatched
where
    S: Storage,
    R: RenderTarget,
{
    tracing::debug!(%action, "Dispatching cart action");
    match action {
        CartAction::Add(id) => {
            let Some(product) = store.catalog().product(id).cloned() else {
                tracing::debug!(product_id = %id, "Add for product not in catalog");
                return Dispatched::UnknownProduct;
            };
            store.add_item(product);
            Dispatched::Added
        }
        CartAction::Increment(id) => {
            store.update_quantity(id, 1);
            Dispatched::Updated
        }
        CartAction::Decrement(id) => {
            store.update_quantity(id, -1);
            Dispatched::Updated
        }
        CartAction::Remove(id) => {
            store.remove_item(id);
            Dispatched::Updated
        }
    }
}

/// Order confirmation shown after a successful checkout.
pub const ORDER_PLACED_MESSAGE: &str = "Спасибо за заказ! Мы свяжемся с вами в ближайшее время для подтверждения.\n\nОЧАГЪ — традиции дровяного очага";

/// Prompt shown when checkout is attempted on an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Добавьте пиццу в корзину";

/// Result of the checkout control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The order was accepted and the cart cleared.
    Placed,
    /// Nothing to order; the cart was left as is.
    EmptyCart,
}

impl CheckoutOutcome {
    /// Message to show the visitor.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Placed => ORDER_PLACED_MESSAGE,
            Self::EmptyCart => EMPTY_CART_MESSAGE,
        }
    }
}

/// Confirm the order: clear a non-empty cart, leave an empty one untouched.
pub fn checkout<S, R>(store: &mut CartStore<S, R>) -> CheckoutOutcome
where
    S: Storage,
    R: RenderTarget,
{
    if store.is_empty() {
        return CheckoutOutcome::EmptyCart;
    }

    tracing::info!(
        items = store.item_count(),
        total = %store.total(),
        "Order placed"
    );
    store.clear();
    CheckoutOutcome::Placed
}
