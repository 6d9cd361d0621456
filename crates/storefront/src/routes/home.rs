//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use ochag_core::{Product, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::open_page;
use crate::cart::{Fragments, PriceFormat};
use crate::catalog::CatalogLookup;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Menu card display data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl MenuItemView {
    fn new(product: &Product, catalog: &dyn CatalogLookup, format: &PriceFormat) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: format.unit_price(product.price),
            image: product
                .image
                .clone()
                .unwrap_or_else(|| catalog.image_for(product.id).to_string()),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Pizzas on the menu grid.
    pub menu: Vec<MenuItemView>,
    /// The visitor's cart as rendered at page load.
    pub cart: Fragments,
}

/// Display the menu with the visitor's cart.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let page = open_page(&state, &session).await?;
    let format = &state.page_settings().format;
    let catalog = state.catalog();

    let menu = catalog
        .products()
        .iter()
        .map(|product| MenuItemView::new(product, catalog, format))
        .collect();

    Ok(HomeTemplate {
        menu,
        cart: page.fragments(),
    })
}
