//! TOML file configuration structures.
//!
//! These structs directly map to the `piratepay-config.toml` file format.

use piratepay_core::config::GatewaySettings;
use serde::{Deserialize, Serialize};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub gateway: GatewaySection,
    #[serde(default)]
    pub storefront: GatewaySettings,
}

/// Connection to the PiratePay API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySection {
    /// API link from the PiratePay dashboard settings page.
    pub api_url: String,
    /// API token from the PiratePay dashboard. May be left out when the
    /// `PIRATEPAY_API_TOKEN` environment variable is set.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    20
}
