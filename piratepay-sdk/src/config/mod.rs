//! Gateway configuration.
//!
//! [`GatewayConfig`] is built once by whoever owns the merchant settings and
//! is never mutated afterwards. Loading it from a file is the binary's job.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default upper bound for a single round trip to the payment API.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors raised while building a [`GatewayConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid api base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("api base url must use http or https, got `{0}`")]
    UnsupportedScheme(String),

    #[error("api base url `{0}` cannot be used as a base")]
    NotABase(String),

    #[error("api token must not be empty")]
    EmptyToken,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Connection settings for the PiratePay API.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    api_base_url: Url,
    api_token: String,
    timeout: Duration,
}

impl GatewayConfig {
    /// Create a new `GatewayConfig` with the default timeout.
    ///
    /// * `api_base_url` – absolute URL of the merchant's PiratePay API, as
    ///   shown in the PiratePay dashboard.
    /// * `api_token` – the bearer token generated in the dashboard.
    pub fn new(api_base_url: &str, api_token: impl Into<String>) -> Result<Self, ConfigError> {
        let api_base_url = Url::parse(api_base_url.trim())?;
        match api_base_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_owned())),
        }
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::NotABase(api_base_url.to_string()));
        }

        let api_token = api_token.into().trim().to_owned();
        if api_token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        Ok(Self {
            api_base_url,
            api_token,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL of the `initiate` endpoint.
    ///
    /// Any path already present on the base URL is kept, so
    /// `https://host/api/v1` becomes `https://host/api/v1/initiate`.
    pub fn initiate_url(&self) -> Url {
        let mut url = self.api_base_url.clone();
        // `cannot_be_a_base` is rejected in `new`, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("initiate");
        }
        url
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
