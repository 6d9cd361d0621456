//! Plain-text cart surface for the terminal.

use ochag_storefront::cart::{BadgeView, CartItemView, RenderTarget};

/// Renders the cart as lines of text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextSurface {
    count: String,
    items: Vec<String>,
    total: String,
}

impl TextSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The whole cart, one line per row, badge first and total last.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.items.len() + 2);
        lines.push(self.count.clone());
        lines.extend(self.items.iter().cloned());
        lines.push(self.total.clone());
        lines.join("\n")
    }
}

impl RenderTarget for TextSurface {
    fn update_count(&mut self, badge: &BadgeView) {
        self.count = if badge.active {
            format!("Корзина: {} шт.", badge.count)
        } else {
            "Корзина".to_string()
        };
    }

    fn render_items(&mut self, items: &[CartItemView]) {
        self.items = if items.is_empty() {
            vec!["  Корзина пуста".to_string()]
        } else {
            items
                .iter()
                .map(|item| {
                    format!(
                        "  [{}] {} × {}  {}",
                        item.id, item.name, item.quantity, item.price
                    )
                })
                .collect()
        };
    }

    fn update_total(&mut self, total: &str) {
        self.total = format!("Итого: {total}");
    }
}

#[cfg(test)]
mod tests {
    use ochag_core::ProductId;
    use ochag_storefront::cart::CartView;

    use super::*;

    #[test]
    fn test_empty_cart() {
        let mut surface = TextSurface::new();
        surface.update_ui(&CartView {
            badge: BadgeView::from_count(0),
            items: Vec::new(),
            total: "0 ₽".to_string(),
        });

        assert_eq!(surface.render(), "Корзина\n  Корзина пуста\nИтого: 0 ₽");
    }

    #[test]
    fn test_rows_and_total() {
        let mut surface = TextSurface::new();
        surface.update_ui(&CartView {
            badge: BadgeView::from_count(3),
            items: vec![CartItemView {
                id: ProductId::new(3),
                name: "Четыре сыра".to_string(),
                price: "750 ₽".to_string(),
                quantity: 3,
                image: String::new(),
            }],
            total: "2\u{a0}250 ₽".to_string(),
        });

        let text = surface.render();
        assert!(text.starts_with("Корзина: 3 шт."));
        assert!(text.contains("[3] Четыре сыра × 3  750 ₽"));
        assert!(text.ends_with("Итого: 2\u{a0}250 ₽"));
    }
}
