//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults suit local development.
//!
//! - `STORE_DATABASE_URL` - SQLite connection string (falls back to `DATABASE_URL`,
//!   then `sqlite://shop.db?mode=rwc`)
//! - `STORE_HOST` - Bind address (default: 127.0.0.1)
//! - `STORE_PORT` - Listen port (default: 5000)
//! - `STORE_BASE_URL` - Public URL (default: `http://localhost:5000`)
//! - `STORE_STATIC_DIR` - Directory served under `/static` (default: `static`)
//! - `STORE_UPLOAD_DIR` - Product image directory (default: `<static>/images`)
//! - `STORE_MAX_UPLOAD_BYTES` - Body limit for admin uploads (default: 5 MiB)
//! - `STORE_RATE_LIMIT` - Rate-limit login/registration (default: true)
//! - `STORE_TRUST_PROXY` - Key rate limits on `X-Forwarded-For`/`X-Real-IP`
//!   instead of the peer address; enable only behind a proxy that sets them
//!   (default: false)
//! - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://shop.db?mode=rwc";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Store application configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the store
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Directory uploaded product images are written to
    pub upload_dir: PathBuf,
    /// Maximum request body size for admin product forms
    pub max_upload_bytes: usize,
    /// Whether login and registration are rate limited
    pub rate_limit: bool,
    /// Whether client IPs are taken from proxy headers
    pub trust_proxy_headers: bool,
    /// Tracing output format
    pub log_format: LogFormat,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry DSN; Sentry stays disabled when unset
    pub dsn: Option<String>,
    /// Environment tag (e.g. "production")
    pub environment: Option<String>,
    /// Error event sample rate
    pub sample_rate: f32,
    /// Performance transaction sample rate
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STORE_DATABASE_URL");
        let host = parse_env_or_default("STORE_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env_or_default("STORE_PORT", 5000_u16)?;
        let base_url = get_env_or_default("STORE_BASE_URL", &format!("http://localhost:{port}"));
        let static_dir = PathBuf::from(get_env_or_default("STORE_STATIC_DIR", "static"));
        let upload_dir = get_optional_env("STORE_UPLOAD_DIR")
            .map_or_else(|| static_dir.join("images"), PathBuf::from);
        let max_upload_bytes =
            parse_env_or_default("STORE_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let rate_limit = parse_env_or_default("STORE_RATE_LIMIT", true)?;
        let trust_proxy_headers = parse_env_or_default("STORE_TRUST_PROXY", false)?;
        let log_format = parse_env_or_default("LOG_FORMAT", LogFormat::Pretty)?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            upload_dir,
            max_upload_bytes,
            rate_limit,
            trust_proxy_headers,
            log_format,
            sentry,
        })
    }

    /// Configuration for tests and tools: in-memory database, no rate limiting.
    #[must_use]
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Self {
            database_url: SecretString::from("sqlite::memory:"),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://localhost".to_owned(),
            static_dir: PathBuf::from("static"),
            upload_dir,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            rate_limit: false,
            trust_proxy_headers: false,
            log_format: LogFormat::Pretty,
            sentry: SentryConfig::default(),
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", 1.0_f32)?,
            traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> SecretString {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map_or_else(
            || SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, using `default` when it is unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_port() {
        let port: u16 = parse_value("STORE_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_invalid_reports_variable() {
        let err = parse_value::<u16>("STORE_PORT", "eighty").unwrap_err();
        let ConfigError::InvalidEnvVar(name, _) = err;
        assert_eq!(name, "STORE_PORT");
    }

    #[test]
    fn test_parse_value_bool() {
        assert!(!parse_value::<bool>("STORE_RATE_LIMIT", "false").unwrap());
        assert!(parse_value::<bool>("STORE_RATE_LIMIT", "maybe").is_err());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let mut config = StoreConfig::for_tests(PathBuf::from("/tmp"));
        config.port = 5000;

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = StoreConfig::for_tests(PathBuf::from("/tmp"));
        assert!(!config.is_secure());
        config.base_url = "https://shop.example".to_owned();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let mut config = StoreConfig::for_tests(PathBuf::from("/tmp"));
        config.database_url = SecretString::from("sqlite://very-private.db");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("very-private"));
    }
}
