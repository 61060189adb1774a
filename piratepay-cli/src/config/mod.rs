//! Configuration module for the piratepay CLI.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use piratepay_core::config::GatewaySettings;
use piratepay_sdk::GatewayConfig;
use piratepay_sdk::config::ConfigError as GatewayConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable consulted when the config file has no API token.
pub const API_TOKEN_ENV: &str = "PIRATEPAY_API_TOKEN";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(#[from] GatewayConfigError),

    #[error("no API token in config file and PIRATEPAY_API_TOKEN is not set")]
    MissingApiToken,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub gateway: GatewayConfig,
    pub settings: GatewaySettings,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    api_url_override: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, api_url_override: Option<String>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            api_url_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Fill the API token from the environment if the file has none
    /// 4. Validate and build the runtime configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigLoadError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content, get_api_token_from_env())
    }

    fn load_str(
        &self,
        config_content: &str,
        env_token: Option<String>,
    ) -> Result<LoadedConfig, ConfigLoadError> {
        let mut file_config: FileConfig = toml::from_str(config_content)?;

        // Apply CLI overrides
        if let Some(api_url) = &self.api_url_override {
            file_config.gateway.api_url = api_url.clone();
        }

        let api_token = file_config
            .gateway
            .api_token
            .take()
            .filter(|token| !token.trim().is_empty())
            .or(env_token)
            .ok_or(ConfigLoadError::MissingApiToken)?;

        let gateway = GatewayConfig::new(&file_config.gateway.api_url, api_token)?
            .with_timeout(Duration::from_secs(file_config.gateway.timeout_secs))?;

        Ok(LoadedConfig {
            gateway,
            settings: file_config.storefront,
        })
    }
}

/// Get the API token from the environment, if set and non-empty.
pub fn get_api_token_from_env() -> Option<String> {
    std::env::var(API_TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
[gateway]
api_url = "https://piratepay.example.com/api"
timeout_secs = 5
"#;

    #[test]
    fn test_token_from_env_fallback() {
        let loader = ConfigLoader::new("unused.toml", None);
        let loaded = loader
            .load_str(BASE, Some("env-token".to_string()))
            .unwrap();
        assert_eq!(loaded.gateway.api_token(), "env-token");
        assert_eq!(loaded.gateway.timeout(), Duration::from_secs(5));
        assert!(loaded.settings.enabled);
    }

    #[test]
    fn test_file_token_wins_over_env() {
        let content = format!("{BASE}api_token = \"file-token\"\n");
        let loader = ConfigLoader::new("unused.toml", None);
        let loaded = loader
            .load_str(&content, Some("env-token".to_string()))
            .unwrap();
        assert_eq!(loaded.gateway.api_token(), "file-token");
    }

    #[test]
    fn test_missing_token() {
        let loader = ConfigLoader::new("unused.toml", None);
        assert!(matches!(
            loader.load_str(BASE, None),
            Err(ConfigLoadError::MissingApiToken)
        ));
    }

    #[test]
    fn test_api_url_override_and_validation() {
        let loader = ConfigLoader::new("unused.toml", Some("http://127.0.0.1:9000".to_string()));
        let loaded = loader.load_str(BASE, Some("t".to_string())).unwrap();
        assert_eq!(
            loaded.gateway.initiate_url().as_str(),
            "http://127.0.0.1:9000/initiate"
        );

        let loader = ConfigLoader::new("unused.toml", Some("not a url".to_string()));
        assert!(matches!(
            loader.load_str(BASE, Some("t".to_string())),
            Err(ConfigLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let content = r#"
[gateway]
api_url = "https://piratepay.example.com/api"
api_token = "t"
timeout_secs = 0
"#;
        let loader = ConfigLoader::new("unused.toml", None);
        assert!(matches!(
            loader.load_str(content, None),
            Err(ConfigLoadError::ValidationError(GatewayConfigError::ZeroTimeout))
        ));
    }
}
