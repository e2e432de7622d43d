//! Configuration loading and data folder resolution
//!
//! Resolution priority for the data folder:
//! 1. Command-line argument (highest priority)
//! 2. `SPOTTER_DATA_FOLDER` environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data folder location
pub const DATA_FOLDER_ENV: &str = "SPOTTER_DATA_FOLDER";

/// Environment variable carrying the sports-data provider API key
pub const API_KEY_ENV: &str = "SPOTTER_API_KEY";

/// Logging section of the TOML config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug"); defaults to "info"
    pub level: Option<String>,
}

/// On-disk TOML configuration. Every field is optional; a missing file
/// yields defaults and a warning, never termination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data folder holding the SQLite database
    pub data_folder: Option<String>,
    /// Sports-data provider API key
    pub api_key: Option<String>,
    /// Override for the provider base URL (staging, mock servers)
    pub provider_base_url: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a TOML config file from an explicit path
    pub fn load(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
    }

    /// Load from the default platform location, falling back to defaults
    /// when the file is missing or unreadable
    pub fn load_or_default() -> TomlConfig {
        let Some(path) = default_config_path() else {
            tracing::warn!("Could not determine config directory; using defaults");
            return TomlConfig::default();
        };

        if !path.exists() {
            tracing::debug!("No config file at {}; using defaults", path.display());
            return TomlConfig::default();
        }

        match TomlConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config file: {}", e);
                TomlConfig::default()
            }
        }
    }
}

/// Default configuration file path for the platform
/// (e.g. `~/.config/spotter/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spotter").join("config.toml"))
}

/// Resolve the data folder following the documented priority order
pub fn resolve_data_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.data_folder {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_data_folder()
}

/// OS-dependent default data folder (e.g. `~/.local/share/spotter`)
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("spotter"))
        .unwrap_or_else(|| PathBuf::from("./spotter_data"))
}

/// Create the data folder if missing
pub fn ensure_data_folder(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Path of the SQLite database inside the data folder
pub fn database_path(data_folder: &Path) -> PathBuf {
    data_folder.join("spotter.db")
}

/// Resolve the provider API key with ENV → TOML priority.
///
/// Warns when both sources carry a key (potential misconfiguration) and
/// fails with a message naming both sources when neither does.
pub fn resolve_api_key(config: &TomlConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty());
    let toml_key = config.api_key.clone().filter(|k| !k.trim().is_empty());

    if env_key.is_some() && toml_key.is_some() {
        tracing::warn!(
            "Provider API key found in both {} and config file. Using environment (highest priority).",
            API_KEY_ENV
        );
    }

    env_key.or(toml_key).ok_or_else(|| {
        Error::Config(format!(
            "Provider API key not configured. Set the {} environment variable \
             or api_key in the config file.",
            API_KEY_ENV
        ))
    })
}
