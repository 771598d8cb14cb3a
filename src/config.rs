//! Configuration for the OneNote MCP server.
//!
//! Handles loading configuration from TOML files, with CLI flags and
//! environment variables taking precedence over file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::CACHE_FILE_NAME;
use crate::graph::GRAPH_BASE_URL;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Authentication settings
    pub auth: AuthConfig,

    /// Microsoft Graph settings
    pub graph: GraphConfig,
}

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Azure application (client) id. Fallback when AZURE_CLIENT_ID is not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Path of the credential cache file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,

    /// Device-code flow deadline in seconds
    pub timeout_secs: u64,
}

/// Microsoft Graph settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Graph API base URL
    pub base_url: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. The file named by `ONENOTE_MCP_CONFIG`, if set
    /// 2. `.onenote-mcp.toml` in the current directory
    /// 3. `~/.config/onenote-mcp/config.toml`
    /// 4. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var("ONENOTE_MCP_CONFIG") {
            return Self::load_from_file(Path::new(&path));
        }

        // Try local config first
        let local_config = PathBuf::from(".onenote-mcp.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(config_dir) = dirs::config_dir() {
            let global_config = config_dir.join("onenote-mcp").join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        // Return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("onenote-mcp"))
    }

    /// Get the data directory path (credential cache lives here).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("onenote-mcp"))
    }

    /// Resolve the client id: CLI flag / environment beats the config file.
    pub fn resolve_client_id(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.auth.client_id.clone())
    }

    /// Resolve the credential cache path: CLI flag beats the config file
    /// beats the default under the data directory.
    pub fn resolve_cache_file(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.auth.cache_file.clone()).unwrap_or_else(|| {
            Self::data_dir()
                .map_or_else(|| PathBuf::from(CACHE_FILE_NAME), |d| d.join(CACHE_FILE_NAME))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { auth: AuthConfig::default(), graph: GraphConfig::default() }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { client_id: None, cache_file: None, timeout_secs: 300 }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { base_url: GRAPH_BASE_URL.to_string() }
    }
}
