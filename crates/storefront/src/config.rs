//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `OCHAG_HOST` - Bind address (default: 127.0.0.1)
//! - `OCHAG_PORT` - Listen port (default: 3000)
//! - `OCHAG_BASE_URL` - Public URL for the storefront (default: `http://localhost:3000`)
//! - `OCHAG_MENU_PATH` - JSON menu file replacing the built-in menu
//! - `OCHAG_CURRENCY_SYMBOL` - Symbol appended to prices (default: ₽)
//! - `OCHAG_PULSE_MS` - Cart badge pulse duration (default: 500)
//! - `OCHAG_TOAST_MS` - Toast display duration (default: 2500)
//! - `OCHAG_SESSION_CAPACITY` - Most visitor sessions held in memory (default: 100000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::cart::PriceFormat;
use crate::cart::format::{DEFAULT_CURRENCY_SYMBOL, RU_GROUP_SEPARATOR};
use crate::cart::render::DEFAULT_PULSE;
use crate::page::PageSettings;
use crate::page::toast::DEFAULT_TOAST;

/// Default bound on in-memory sessions.
pub const DEFAULT_SESSION_CAPACITY: u64 = 100_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Optional JSON menu replacing the built-in one
    pub menu_path: Option<PathBuf>,
    /// Cart display settings
    pub display: DisplayConfig,
    /// Most sessions (and so carts) held at once
    pub session_capacity: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// How the cart is shown on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Currency symbol placed after amounts
    pub currency_symbol: String,
    /// How long the badge pulses after a change
    pub pulse: Duration,
    /// How long a toast stays visible
    pub toast: Duration,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            pulse: DEFAULT_PULSE,
            toast: DEFAULT_TOAST,
        }
    }
}

impl DisplayConfig {
    /// Page settings derived from this configuration.
    #[must_use]
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            format: PriceFormat {
                currency_symbol: self.currency_symbol.clone(),
                group_separator: RU_GROUP_SEPARATOR,
            },
            pulse: self.pulse,
            toast: self.toast,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_or("OCHAG_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = get_parsed_or("OCHAG_PORT", 3000_u16)?;
        let base_url = get_env_or_default("OCHAG_BASE_URL", &format!("http://localhost:{port}"));
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("OCHAG_BASE_URL".to_string(), e.to_string()))?;

        let defaults = DisplayConfig::default();
        let display = DisplayConfig {
            currency_symbol: get_env_or_default(
                "OCHAG_CURRENCY_SYMBOL",
                &defaults.currency_symbol,
            ),
            pulse: get_millis("OCHAG_PULSE_MS", defaults.pulse)?,
            toast: get_millis("OCHAG_TOAST_MS", defaults.toast)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            menu_path: get_optional_env("OCHAG_MENU_PATH").map(PathBuf::from),
            display,
            session_capacity: get_parsed_or("OCHAG_SESSION_CAPACITY", DEFAULT_SESSION_CAPACITY)?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_parsed_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, or use `default` when it is unset.
fn get_parsed_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a duration given in milliseconds.
fn get_millis(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    get_parsed_or(key, u64::try_from(default.as_millis()).unwrap_or(u64::MAX))
        .map(Duration::from_millis)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", " 8080 ").unwrap(), 8080);
        assert!(matches!(
            parse_value::<u16>("PORT", "eighty"),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "PORT"
        ));
    }

    #[test]
    fn test_display_defaults() {
        let display = DisplayConfig::default();
        assert_eq!(display.currency_symbol, "₽");
        assert_eq!(display.pulse, Duration::from_millis(500));
        assert_eq!(display.toast, Duration::from_millis(2500));
    }

    #[test]
    fn test_default_display_matches_page_defaults() {
        let settings = DisplayConfig::default().page_settings();
        let defaults = PageSettings::default();

        assert_eq!(settings.pulse, defaults.pulse);
        assert_eq!(settings.toast, defaults.toast);
        assert_eq!(settings.format, defaults.format);
    }

    #[test]
    fn test_page_settings_use_display_config() {
        let display = DisplayConfig {
            currency_symbol: "руб.".to_string(),
            pulse: Duration::from_millis(100),
            toast: Duration::from_millis(900),
        };
        let settings = display.page_settings();

        assert_eq!(settings.format.currency_symbol, "руб.");
        assert_eq!(settings.format.group_separator, RU_GROUP_SEPARATOR);
        assert_eq!(settings.pulse, Duration::from_millis(100));
        assert_eq!(settings.toast, Duration::from_millis(900));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: Url::parse("http://localhost:3000").unwrap(),
            menu_path: None,
            display: DisplayConfig::default(),
            session_capacity: DEFAULT_SESSION_CAPACITY,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
