//! Integration tests for the Ochag storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ochag-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port, so no external
//! server or configuration is needed.

use std::net::{Ipv4Addr, SocketAddr};

use ochag_storefront::catalog::Catalog;
use ochag_storefront::config::{DEFAULT_SESSION_CAPACITY, DisplayConfig, StorefrontConfig};
use ochag_storefront::state::AppState;
use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Storefront configuration for a server bound to `addr`.
#[must_use]
pub fn test_config(addr: SocketAddr) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: Url::parse(&format!("http://{addr}")).expect("valid base URL"),
        menu_path: None,
        display: DisplayConfig::default(),
        session_capacity: DEFAULT_SESSION_CAPACITY,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A running storefront and a cookie-keeping client (one visitor).
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a storefront with the built-in menu.
    pub async fn start() -> Self {
        Self::with_catalog(Catalog::menu()).await
    }

    /// Start a storefront serving `catalog`.
    pub async fn with_catalog(catalog: Catalog) -> Self {
        Self::spawn(catalog, DisplayConfig::default()).await
    }

    /// Start a storefront with the built-in menu and custom display settings.
    pub async fn with_display(display: DisplayConfig) -> Self {
        Self::spawn(Catalog::menu(), display).await
    }

    async fn spawn(catalog: Catalog, display: DisplayConfig) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let config = StorefrontConfig {
            display,
            ..test_config(addr)
        };
        let state = AppState::with_catalog(config, catalog);
        let server = tokio::spawn(async move {
            axum::serve(listener, ochag_storefront::app(state))
                .await
                .expect("Test server failed");
        });

        Self {
            client: Self::visitor(),
            base_url: format!("http://{addr}"),
            server,
        }
    }

    /// A fresh client with its own cookie jar (a second visitor).
    #[must_use]
    pub fn visitor() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Press a cart control as this context's visitor.
    pub async fn cart_action(&self, action: &str, id: &str) -> Response {
        self.client
            .post(self.url("/cart/action"))
            .form(&[("action", action), ("id", id)])
            .send()
            .await
            .expect("Failed to send cart action")
    }

    /// The visitor's cart fragments as HTML.
    pub async fn cart_html(&self) -> String {
        self.client
            .get(self.url("/cart"))
            .send()
            .await
            .expect("Failed to fetch cart")
            .text()
            .await
            .expect("Failed to read cart body")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}
