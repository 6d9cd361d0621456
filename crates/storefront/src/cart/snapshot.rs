//! Persisted cart snapshot.
//!
//! The snapshot is the JSON written to storage after every mutation:
//!
//! ```json
//! {"items":[{"id":1,"name":"Маргарита","price":590,"quantity":2}],"total":1180,"saved_at":"2026-10-18T12:00:00Z"}
//! ```
//!
//! Readers tolerate missing fields (`items` defaults to empty, `total` to
//! zero, `saved_at` to absent) and ignore unknown ones.

use chrono::{DateTime, Utc};
use ochag_core::{CartState, LineItem, Money};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key the cart snapshot lives under.
pub const STORAGE_KEY: &str = "ochag_cart";

/// Errors decoding or encoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed cart snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Capture `state` as of now.
    #[must_use]
    pub fn capture(state: &CartState) -> Self {
        Self {
            items: state.items.clone(),
            total: state.total,
            saved_at: Some(Utc::now()),
        }
    }

    /// Parse a snapshot from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if the text is not a snapshot object.
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize to JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Turn the snapshot back into a valid cart state.
    ///
    /// Lines stored with quantity 0 are dropped and the total is re-derived
    /// from the remaining lines, so a hand-edited or foreign snapshot can
    /// never produce a state that breaks the cart invariants.
    #[must_use]
    pub fn into_state(self) -> CartState {
        let dropped = self.items.iter().filter(|line| line.quantity == 0).count();
        if dropped > 0 {
            tracing::warn!(dropped, "Dropping zero-quantity lines from cart snapshot");
        }

        let mut state = CartState {
            items: self
                .items
                .into_iter()
                .filter(|line| line.quantity > 0)
                .collect(),
            total: self.total,
        };

        let stored_total = state.total;
        state.recalculate_total();
        if state.total != stored_total {
            tracing::warn!(
                stored = %stored_total,
                computed = %state.total,
                "Cart snapshot total was stale, using recomputed total"
            );
        }

        state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ochag_core::{Product, ProductId};

    fn sample_state() -> CartState {
        let mut state = CartState::new();
        state.add(Product::new(ProductId::new(1), "Маргарита", Money::new(590)));
        state.add(Product::new(ProductId::new(1), "Маргарита", Money::new(590)));
        state.add(
            Product::new(ProductId::new(5), "Грибная", Money::new(650))
                .with_image("https://example.test/5.jpg"),
        );
        state.recalculate_total();
        state
    }

    #[test]
    fn test_encode_decode_preserves_items_and_total() {
        let state = sample_state();
        let raw = Snapshot::capture(&state).encode().unwrap();
        let restored = Snapshot::decode(&raw).unwrap().into_state();

        assert_eq!(restored, state);
    }

    #[test]
    fn test_encoded_shape() {
        let mut state = CartState::new();
        state.add(Product::new(ProductId::new(2), "Пепперони", Money::new(690)));
        state.recalculate_total();

        let mut snapshot = Snapshot::capture(&state);
        snapshot.saved_at = None;

        assert_eq!(
            snapshot.encode().unwrap(),
            r#"{"items":[{"id":2,"name":"Пепперони","price":690,"quantity":1}],"total":690}"#
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let snapshot = Snapshot::decode("{}").unwrap();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total, Money::ZERO);
        assert_eq!(snapshot.saved_at, None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = r#"{"items":[],"total":0,"currency":"RUB","version":7}"#;
        assert!(Snapshot::decode(raw).is_ok());
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        for raw in ["", "not json", "[1,2,3]", r#"{"items":"nope"}"#] {
            assert!(matches!(Snapshot::decode(raw), Err(SnapshotError::Json(_))));
        }
    }

    #[test]
    fn test_into_state_repairs_total_and_zero_quantities() {
        let raw = r#"{"items":[
            {"id":1,"name":"A","price":100,"quantity":0},
            {"id":2,"name":"B","price":250,"quantity":2}
        ],"total":99999}"#;

        let state = Snapshot::decode(raw).unwrap().into_state();

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, ProductId::new(2));
        assert_eq!(state.total, Money::new(500));
    }
}
