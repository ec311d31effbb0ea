// SPDX-License-Identifier: MPL-2.0
//! Where translation bundles come from.
//!
//! Every source maps a [`LanguageCode`] to one `<code>.json` document and
//! parses it into a [`TranslationTree`]. Sources never fall back on their
//! own; retrying with the default language is the translator's job.

use super::language::LanguageCode;
use super::tree::TranslationTree;
use crate::config::defaults::{DEFAULT_BUNDLE_PATH, MAX_BUNDLE_BYTES};
use crate::error::{Error, LoadError, Result};
use async_trait::async_trait;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[async_trait]
pub trait BundleSource: Send + Sync {
    /// Fetches and parses the bundle for `language`.
    async fn fetch(&self, language: &LanguageCode) -> Result<TranslationTree>;
}

fn bundle_file_name(language: &LanguageCode) -> String {
    format!("{}.json", language)
}

// =============================================================================
// HTTP
// =============================================================================

/// Fetches `<base_url>/<code>.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// # Errors
    ///
    /// Returns [`LoadError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("page_i18n/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetches from `<origin>/assets/locales/<code>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Network`] if the HTTP client cannot be built.
    pub fn from_origin(origin: &str, timeout: Duration) -> Result<Self> {
        Self::new(
            format!("{}/{}", origin.trim_end_matches('/'), DEFAULT_BUNDLE_PATH),
            timeout,
        )
    }

    #[must_use]
    pub fn bundle_url(&self, language: &LanguageCode) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            bundle_file_name(language)
        )
    }
}

#[async_trait]
impl BundleSource for HttpSource {
    async fn fetch(&self, language: &LanguageCode) -> Result<TranslationTree> {
        use futures_util::StreamExt;

        let url = self.bundle_url(language);
        tracing::debug!(%url, "fetching bundle");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LoadError::Status(response.status().as_u16()).into());
        }

        if response
            .content_length()
            .is_some_and(|len| len > MAX_BUNDLE_BYTES)
        {
            return Err(LoadError::Parse("bundle exceeds size limit".to_string()).into());
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| LoadError::Network(e.to_string()))?;
            body.extend_from_slice(&chunk);
            if body.len() as u64 > MAX_BUNDLE_BYTES {
                return Err(LoadError::Parse("bundle exceeds size limit".to_string()).into());
            }
        }

        TranslationTree::from_slice(&body)
    }
}

// =============================================================================
// Directory
// =============================================================================

/// Reads `<dir>/<code>.json` from the local filesystem.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl BundleSource for DirSource {
    async fn fetch(&self, language: &LanguageCode) -> Result<TranslationTree> {
        let path = self.dir.join(bundle_file_name(language));
        tracing::debug!(path = %path.display(), "reading bundle");

        let bytes = tokio::fs::read(&path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::Load(LoadError::NotFound(language.to_string()))
            } else {
                Error::from(err)
            }
        })?;
        TranslationTree::from_slice(&bytes)
    }
}

// =============================================================================
// Embedded
// =============================================================================

#[derive(RustEmbed)]
#[folder = "assets/locales/"]
struct Bundles;

/// Bundles compiled into the binary from `assets/locales/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

#[async_trait]
impl BundleSource for EmbeddedSource {
    async fn fetch(&self, language: &LanguageCode) -> Result<TranslationTree> {
        let file = Bundles::get(&bundle_file_name(language))
            .ok_or_else(|| LoadError::NotFound(language.to_string()))?;
        TranslationTree::from_slice(file.data.as_ref())
    }
}

// =============================================================================
// Memory
// =============================================================================

/// Pre-parsed bundles held in memory. Missing languages fail to load.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bundles: HashMap<String, TranslationTree>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bundle(mut self, code: impl Into<String>, tree: TranslationTree) -> Self {
        self.bundles.insert(code.into(), tree);
        self
    }
}

#[async_trait]
impl BundleSource for MemorySource {
    async fn fetch(&self, language: &LanguageCode) -> Result<TranslationTree> {
        self.bundles
            .get(language.as_str())
            .cloned()
            .ok_or_else(|| LoadError::NotFound(language.to_string()).into())
    }
}
