// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration constants.
//!
//! # Categories
//!
//! - **Languages**: The supported set and its fallback
//! - **Bundles**: Where translation bundles are fetched from
//! - **Storage**: Settings file naming

// ==========================================================================
// Language Defaults
// ==========================================================================

/// Language codes the page ships bundles for.
pub const SUPPORTED_LANGUAGES: &[&str] = &["de", "pl"];

/// Language used when nothing else matches or a load fails.
pub const DEFAULT_LANGUAGE: &str = "de";

// ==========================================================================
// Bundle Defaults
// ==========================================================================

/// Path, relative to the page origin, under which `<code>.json` bundles live.
pub const DEFAULT_BUNDLE_PATH: &str = "assets/locales";

/// Request timeout for remote bundles (in seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Upper bound on a bundle body; larger responses are rejected as malformed.
pub const MAX_BUNDLE_BYTES: u64 = 4 * 1024 * 1024;

// ==========================================================================
// Storage Defaults
// ==========================================================================

/// Directory name under the platform config dir.
pub const APP_NAME: &str = "PageI18n";

/// Settings file name.
pub const CONFIG_FILE: &str = "settings.toml";

/// Environment variable overriding the config directory.
pub const ENV_CONFIG_DIR: &str = "PAGE_I18N_CONFIG_DIR";
