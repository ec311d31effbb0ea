// SPDX-License-Identifier: MPL-2.0
//! Persisted language preference.

use crate::config::{self, Config};
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Mutex;

/// A single persisted language code.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored code, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored code.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, language: &str) -> Result<()>;
}

/// Stores the preference as the `language` field of `settings.toml`.
///
/// Other settings in the file are preserved on save.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Uses the default settings location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit settings file, e.g. for tests or portable setups.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn read(&self) -> Result<Config> {
        match &self.path {
            Some(path) if path.exists() => config::load_from_path(path),
            Some(_) => Ok(Config::default()),
            None => config::load(),
        }
    }

    fn write(&self, config: &Config) -> Result<()> {
        match &self.path {
            Some(path) => config::save_to_path(config, path),
            None => config::save(config),
        }
    }
}

impl PreferenceStore for SettingsStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read()?.language)
    }

    fn save(&self, language: &str) -> Result<()> {
        let mut config = self.read()?;
        config.language = Some(language.to_string());
        self.write(&config)
    }
}

/// Keeps the preference for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    language: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: Mutex::new(Some(language.into())),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self
            .language
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn save(&self, language: &str) -> Result<()> {
        *self
            .language
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(language.to_string());
        Ok(())
    }
}
