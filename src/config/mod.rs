//! This module handles the user's settings, including loading and saving
//! the persisted language choice to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use page_i18n::config::{self, Config};
//!
//! let mut config = config::load().unwrap_or_default();
//! config.language = Some("pl".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use defaults::{DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Last language successfully activated.
    #[serde(default)]
    pub language: Option<String>,
    /// Base URL bundles are fetched from (`<bundle_url>/<code>.json`).
    #[serde(default)]
    pub bundle_url: Option<String>,
    /// Page origin; bundles are fetched from `<origin>/assets/locales/`.
    #[serde(default)]
    pub bundle_origin: Option<String>,
    /// Local directory holding `<code>.json` bundles.
    #[serde(default)]
    pub bundle_dir: Option<PathBuf>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(defaults::DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Resolves the settings file location.
///
/// `PAGE_I18N_CONFIG_DIR` wins over the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(defaults::ENV_CONFIG_DIR) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join(defaults::CONFIG_FILE));
        }
    }
    dirs::config_dir().map(|mut path| {
        path.push(defaults::APP_NAME);
        path.push(defaults::CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads a settings file. A file that fails to parse yields defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
