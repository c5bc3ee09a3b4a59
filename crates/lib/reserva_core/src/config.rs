//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when `BACKEND_URL` is not set.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Institutional domain appended to bare usernames.
pub const DEFAULT_EMAIL_DOMAIN: &str = "udea.edu.co";

/// Request timeout: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("Invalid timeout '{0}': expected whole seconds")]
    InvalidTimeout(String),
}

/// Configuration for the API client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash.
    pub backend_url: String,
    /// File holding the persisted key-value store (token lives here).
    pub store_path: PathBuf,
    /// Domain appended to usernames that carry no `@`.
    pub email_domain: String,
    /// Optional HS256 secret. When set, session claims are only trusted
    /// after the token signature verifies.
    pub jwt_secret: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config for `backend_url` with every other field defaulted.
    pub fn new(backend_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: normalize_backend_url(backend_url)?,
            store_path: default_store_path(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            jwt_secret: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `BACKEND_URL`          | `http://localhost:8080`              |
    /// | `RESERVA_STORE_PATH`   | `<data_dir>/reserva/storage.json`    |
    /// | `RESERVA_EMAIL_DOMAIN` | `udea.edu.co`                        |
    /// | `RESERVA_JWT_SECRET`   | unset (claims are not verified)      |
    /// | `RESERVA_TIMEOUT_SECS` | `30`                                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());
        let mut config = Self::new(&backend_url)?;

        if let Ok(path) = std::env::var("RESERVA_STORE_PATH")
            && !path.is_empty()
        {
            config.store_path = PathBuf::from(path);
        }
        if let Ok(domain) = std::env::var("RESERVA_EMAIL_DOMAIN")
            && !domain.is_empty()
        {
            config.email_domain = domain;
        }
        config.jwt_secret = std::env::var("RESERVA_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        if let Ok(raw) = std::env::var("RESERVA_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Replace the backend URL, validating it.
    pub fn with_backend_url(mut self, backend_url: &str) -> Result<Self, ConfigError> {
        self.backend_url = normalize_backend_url(backend_url)?;
        Ok(self)
    }

    /// Full URL for an API path such as `/espacio/3`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}

/// Default location of the persisted store.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reserva")
        .join("storage.json")
}

fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBackendUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBackendUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
