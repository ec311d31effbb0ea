// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for static pages.
//!
//! This module detects a preferred language, loads the matching JSON
//! bundle and writes translated strings into page elements.
//!
//! # Features
//!
//! - Language detection from the saved preference, the system locale, or a default
//! - Bundles loaded over HTTP, from a directory, or compiled in
//! - Dotted keys (`nav.home`) resolved against nested bundles
//! - Runtime language switching with change notifications
//! - Fallback to the default language when a bundle fails to load

pub mod binding;
pub mod language;
pub mod page;
pub mod preference;
pub mod source;
pub mod translator;
pub mod tree;

pub use binding::{ApplyMode, Binding, BindingTarget};
pub use language::{LanguageCode, SupportedLanguages};
pub use page::{Element, Page};
pub use preference::{MemoryStore, PreferenceStore, SettingsStore};
pub use source::{BundleSource, DirSource, EmbeddedSource, HttpSource, MemorySource};
pub use translator::{LanguageChanged, Translator};
pub use tree::TranslationTree;
