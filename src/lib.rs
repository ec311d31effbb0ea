// SPDX-License-Identifier: MPL-2.0
//! `page_i18n` localizes static pages from JSON translation bundles.
//!
//! It picks a language, loads its bundle with a single fallback to the
//! default language, and writes translated strings into page elements
//! through explicit bindings.

pub mod config;
pub mod error;
pub mod i18n;
