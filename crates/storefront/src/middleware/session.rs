//! Session middleware configuration.
//!
//! The session stands in for the visitor's page storage: the cart snapshot
//! is kept in it under the same key the cart store persists to.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ochag_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Bounded in-process session store.
///
/// Entries are dropped once their expiry date passes, and the least
/// recently used ones are evicted when `capacity` sessions are held. A
/// restart empties every cart, the same as a visitor clearing their browser
/// storage.
#[must_use]
pub fn create_session_store(capacity: u64) -> MokaStore {
    MokaStore::new(Some(capacity))
}

/// Create the session layer.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    let is_secure = config.base_url.scheme() == "https";

    SessionManagerLayer::new(create_session_store(config.session_capacity))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::from([(
                crate::cart::STORAGE_KEY.to_string(),
                serde_json::Value::String(r#"{"items":[],"total":0}"#.to_string()),
            )]),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_active_session_is_kept() {
        let store = create_session_store(16);
        let record = record(Duration::days(1));
        store.save(&record).await.unwrap();

        let loaded = store.load(&record.id).await.unwrap();
        assert_eq!(loaded.map(|r| r.data), Some(record.data));
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let store = create_session_store(16);
        let record = record(Duration::seconds(-1));
        store.save(&record).await.unwrap();

        assert!(store.load(&record.id).await.unwrap().is_none());
    }
}
