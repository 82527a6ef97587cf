//! Configuration loading and management
//!
//! One immutable [`Config`] is loaded at process start and handed to every
//! component that needs it. Nothing reads the environment at call time.

mod io;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query gateway connection settings
    #[serde(default)]
    pub gateway: GatewaySettings,

    /// GUI settings
    #[serde(default)]
    pub gui: GuiSettings,
}

/// Query gateway connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Base URL of the query gateway (API Gateway stage root)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds. A gateway that stops responding surfaces
    /// as a per-source fetch error after this long, not a stuck view.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

/// GUI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiSettings {
    /// Rows per page in the bug table
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Automatic re-fetch interval in seconds (0 disables)
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8808".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    50
}

fn default_refresh_secs() -> u64 {
    0
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.gateway.connect_timeout_secs, 5);
        assert_eq!(config.gui.page_size, 50);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [gateway]
            base_url = "https://api.example.com/prod"
            "#,
        )
        .unwrap();
        assert_eq!(config.gateway.base_url, "https://api.example.com/prod");
        assert_eq!(config.gateway.read_timeout_secs, 30);
    }
}
