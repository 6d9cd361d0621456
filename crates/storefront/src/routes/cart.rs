//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each visitor's cart snapshot is kept in their session: a request restores
//! it into page-local storage, runs the cart synchronously, and writes the
//! resulting snapshot back. Concurrent requests from two tabs resolve as
//! last-write-wins.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{Fragments, MemoryStorage, STORAGE_KEY};
use crate::effects::EffectScheduler;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::page::{CartAction, CartPage, CheckoutOutcome, Dispatched};
use crate::state::AppState;

/// HTMX event fired after any cart change.
const CART_UPDATED_EVENT: &str = "cart-updated";

/// HTMX event fired after a placed order; carries the confirmation message.
const ORDER_PLACED_EVENT: &str = "order-placed";

/// Delegated cart control form data.
///
/// Carries the clicked control's `data-cart-action` and `data-id` values.
#[derive(Debug, Deserialize)]
pub struct CartActionForm {
    pub action: String,
    pub id: String,
}

/// Cart fragments response (for HTMX).
///
/// The item list is the primary swap target; badge, total and toast are
/// swapped out-of-band.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_update.html")]
pub struct CartUpdateTemplate {
    pub fragments: Fragments,
    pub toast: Option<String>,
    pub toast_ms: u128,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Restore the visitor's cart page from the session.
pub async fn open_page(state: &AppState, session: &Session) -> Result<CartPage<MemoryStorage>> {
    let storage = session
        .get::<String>(STORAGE_KEY)
        .await?
        .map_or_else(MemoryStorage::new, |raw| {
            MemoryStorage::with_item(STORAGE_KEY, raw)
        });

    // Nothing outlives the request, so there is nothing to run effects on.
    Ok(CartPage::open(
        storage,
        state.catalog_lookup(),
        state.page_settings(),
        &EffectScheduler::disabled(),
    ))
}

/// Write the page's cart snapshot back to the session.
async fn save_page(session: &Session, page: CartPage<MemoryStorage>) -> Result<()> {
    let mut storage = page.into_storage();
    if let Some(raw) = storage.take_item(STORAGE_KEY) {
        session.insert(STORAGE_KEY, raw).await?;
    }
    Ok(())
}

fn update_response(state: &AppState, page: &CartPage<MemoryStorage>) -> CartUpdateTemplate {
    let toast = page.toast();
    CartUpdateTemplate {
        fragments: page.fragments(),
        toast: toast.active.then_some(toast.message),
        toast_ms: state.page_settings().toast.as_millis(),
    }
}

/// Serialize `value` with every non-ASCII character escaped.
///
/// Browsers decode response headers as Latin-1, so Cyrillic text in an
/// `HX-Trigger` payload has to travel as `\uXXXX` escapes.
fn ascii_json(value: &serde_json::Value) -> String {
    let raw = value.to_string();
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
        } else {
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart fragments (HTMX).
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let page = open_page(&state, &session).await?;
    Ok(update_response(&state, &page))
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let page = open_page(&state, &session).await?;
    Ok(Html(page.fragments().count))
}

/// Delegated cart control (HTMX).
///
/// Add buttons on the menu and the steppers/remove buttons on cart rows all
/// post here with their action name and product id.
#[instrument(skip(state, session))]
pub async fn action(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartActionForm>,
) -> Result<Response> {
    let action = CartAction::from_attributes(&form.action, &form.id).ok_or_else(|| {
        AppError::BadRequest(format!(
            "unknown cart control {:?} for id {:?}",
            form.action, form.id
        ))
    })?;

    let mut page = open_page(&state, &session).await?;
    if page.dispatch(action) == Dispatched::UnknownProduct {
        return Err(AppError::NotFound(format!("product {}", action.product_id())));
    }

    add_breadcrumb(
        "cart",
        action.name(),
        Some(&[("product_id", &action.product_id().to_string())]),
    );

    let response = update_response(&state, &page);
    save_page(&session, page).await?;

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        response,
    )
        .into_response())
}

/// Checkout (HTMX).
///
/// A non-empty cart is cleared and the page is told to show the order
/// confirmation; an empty cart only gets a toast prompt.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut page = open_page(&state, &session).await?;
    let outcome = page.checkout();

    let response = update_response(&state, &page);
    save_page(&session, page).await?;

    match outcome {
        CheckoutOutcome::Placed => {
            let trigger = serde_json::json!({
                CART_UPDATED_EVENT: null,
                ORDER_PLACED_EVENT: { "message": outcome.message() },
            });
            Ok((
                AppendHeaders([("HX-Trigger", ascii_json(&trigger))]),
                response,
            )
                .into_response())
        }
        CheckoutOutcome::EmptyCart => Ok(response.into_response()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_json_escapes_cyrillic() {
        let value = serde_json::json!({ "message": "Спасибо\n🍕" });
        let header = ascii_json(&value);

        assert!(header.is_ascii());
        assert!(header.starts_with(r#"{"message":"\u0421"#));
        let decoded: serde_json::Value = serde_json::from_str(&header).unwrap();
        assert_eq!(decoded, value);
    }
}
