//! Product catalog lookup.
//!
//! The catalog is the source of truth for what the menu offers. The cart
//! consults it in two places: resolving an "add to cart" control to a
//! [`Product`], and finding an image for a line that was stored without one.

use std::fs;
use std::path::Path;

use ochag_core::{Money, Product, ProductId};
use serde::Deserialize;
use thiserror::Error;

/// Image shown for products the catalog does not know.
pub const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1513104890138-7c749659a591?w=400&h=300&fit=crop";

/// Errors loading a catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read menu file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse menu file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("menu is empty")]
    Empty,
}

/// Resolves product ids to display data.
pub trait CatalogLookup: Send + Sync {
    /// The product with `id`, if the catalog offers it.
    fn product(&self, id: ProductId) -> Option<&Product>;

    /// Image URL for `id`, falling back to a default picture.
    fn image_for(&self, id: ProductId) -> &str;
}

/// The pizzeria menu.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    default_image: String,
}

#[derive(Deserialize)]
struct MenuFile {
    #[serde(default)]
    default_image: Option<String>,
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a product list.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }

    /// The built-in wood-fired menu.
    #[must_use]
    pub fn menu() -> Self {
        let item = |id: i32, name: &str, price: i64, photo: &str| {
            Product::new(ProductId::new(id), name, Money::new(price)).with_image(format!(
                "https://images.unsplash.com/photo-{photo}?w=400&h=300&fit=crop"
            ))
        };

        Self::new(vec![
            item(1, "Маргарита", 590, "1628840042765-356cda07504e"),
            item(2, "Пепперони", 690, "1593560708920-61dd98c46a4e"),
            item(3, "Четыре сыра", 750, "1574071318508-1cdbab80d002"),
            item(4, "Дьябола", 720, "1565299624946-b28f40a0ae38"),
            item(5, "Грибная с трюфелем", 790, "1604382354936-07c5d9983bd3"),
            item(6, "Очагъ", 890, "1513104890138-7c749659a591"),
        ])
    }

    /// Load a menu from a JSON file:
    ///
    /// ```json
    /// {"default_image": "https://…", "products": [{"id": 1, "name": "…", "price": 590, "image": "…"}]}
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or lists
    /// no products.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let menu: MenuFile = serde_json::from_str(&raw)?;
        if menu.products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut catalog = Self::new(menu.products);
        if let Some(image) = menu.default_image {
            catalog.default_image = image;
        }
        Ok(catalog)
    }

    /// All products in menu order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::menu()
    }
}

impl CatalogLookup for Catalog {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    fn image_for(&self, id: ProductId) -> &str {
        self.product(id)
            .and_then(|product| product.image.as_deref())
            .unwrap_or(&self.default_image)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_menu_has_six_pizzas() {
        let catalog = Catalog::menu();
        assert_eq!(catalog.products().len(), 6);
        assert_eq!(
            catalog.product(ProductId::new(1)).map(|p| p.name.as_str()),
            Some("Маргарита")
        );
    }

    #[test]
    fn test_image_falls_back_to_default() {
        let catalog = Catalog::menu();
        assert!(catalog.image_for(ProductId::new(2)).contains("1593560708920"));
        assert_eq!(catalog.image_for(ProductId::new(99)), DEFAULT_IMAGE);
    }

    #[test]
    fn test_product_without_image_uses_default() {
        let catalog = Catalog::new(vec![Product::new(
            ProductId::new(1),
            "Plain",
            Money::new(100),
        )]);
        assert_eq!(catalog.image_for(ProductId::new(1)), DEFAULT_IMAGE);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.json");
        fs::write(
            &path,
            r#"{"default_image":"/static/pizza.jpg","products":[{"id":7,"name":"Кальцоне","price":810}]}"#,
        )
        .unwrap();

        let catalog = Catalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.image_for(ProductId::new(7)), "/static/pizza.jpg");
    }

    #[test]
    fn test_from_json_file_rejects_empty_menu() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.json");
        fs::write(&path, r#"{"products":[]}"#).unwrap();

        assert!(matches!(
            Catalog::from_json_file(&path),
            Err(CatalogError::Empty)
        ));
    }
}
