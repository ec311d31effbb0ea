// SPDX-License-Identifier: MPL-2.0
//! Supported language set and language detection.

use crate::config::defaults::{DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
use crate::error::{Error, Result};
use std::fmt;
use unic_langid::LanguageIdentifier;

/// A language code known to be in a [`SupportedLanguages`] set.
///
/// Only obtainable through the set, so holding one proves membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Closed, ordered set of language codes with a designated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages {
    codes: Vec<LanguageCode>,
    default_index: usize,
}

impl Default for SupportedLanguages {
    fn default() -> Self {
        Self {
            codes: SUPPORTED_LANGUAGES
                .iter()
                .map(|code| LanguageCode((*code).to_string()))
                .collect(),
            default_index: SUPPORTED_LANGUAGES
                .iter()
                .position(|code| *code == DEFAULT_LANGUAGE)
                .unwrap_or(0),
        }
    }
}

/// Parses `code` as a bare language subtag and lowercases it.
fn parse_subtag(code: &str) -> Result<LanguageCode> {
    let langid: LanguageIdentifier = code
        .parse()
        .map_err(|_| Error::Config(format!("invalid language code '{}'", code)))?;
    let subtag = langid.language.as_str();
    if langid.region.is_some()
        || langid.script.is_some()
        || langid.variants().next().is_some()
        || subtag == "und"
    {
        return Err(Error::Config(format!(
            "'{}' is not a bare language subtag",
            code
        )));
    }
    Ok(LanguageCode(subtag.to_string()))
}

impl SupportedLanguages {
    /// Builds a set from bare language subtags such as `"de"` or `"pl"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the set is empty, a code is not a bare
    /// language subtag, or `default` is not one of the codes.
    pub fn new<I, S>(codes: I, default: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed: Vec<LanguageCode> = Vec::new();
        for code in codes {
            let normalized = parse_subtag(code.as_ref())?;
            if !parsed.contains(&normalized) {
                parsed.push(normalized);
            }
        }

        let default = parse_subtag(default)?;
        let default_index = parsed
            .iter()
            .position(|code| *code == default)
            .ok_or_else(|| {
                Error::Config(format!("default language '{}' is not supported", default))
            })?;

        Ok(Self {
            codes: parsed,
            default_index,
        })
    }

    #[must_use]
    pub fn default_language(&self) -> &LanguageCode {
        &self.codes[self.default_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.codes.iter()
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Exact-match lookup.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&LanguageCode> {
        self.codes.iter().find(|supported| *supported == code)
    }

    /// Returns the matching code, or the default with a warning.
    #[must_use]
    pub fn coerce(&self, code: &str) -> LanguageCode {
        match self.get(code) {
            Some(supported) => supported.clone(),
            None => {
                let fallback = self.default_language();
                tracing::warn!(
                    requested = code,
                    fallback = %fallback,
                    "language is not supported, using default"
                );
                fallback.clone()
            }
        }
    }

    /// Picks the language to start with.
    ///
    /// Precedence: persisted choice, then the environment locale's primary
    /// subtag, then the default. Unsupported candidates are skipped.
    #[must_use]
    pub fn detect(&self, persisted: Option<&str>, environment: Option<&str>) -> LanguageCode {
        if let Some(code) = persisted.and_then(|saved| self.get(saved)) {
            return code.clone();
        }

        if let Some(code) = environment
            .map(environment_prefix)
            .and_then(|prefix| self.get(&prefix).cloned())
        {
            return code;
        }

        self.default_language().clone()
    }
}

/// Primary subtag of an environment locale: `"en-US"` becomes `"en"`.
#[must_use]
pub fn environment_prefix(locale: &str) -> String {
    locale
        .split('-')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Locale reported by the operating system, if any.
#[must_use]
pub fn system_locale() -> Option<String> {
    sys_locale::get_locale()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn de_pl() -> SupportedLanguages {
        SupportedLanguages::new(["de", "pl"], "de").expect("valid set")
    }

    #[test]
    fn default_set_matches_constants() {
        let langs = SupportedLanguages::default();
        assert_eq!(langs.default_language().as_str(), DEFAULT_LANGUAGE);
        assert_eq!(langs.iter().count(), SUPPORTED_LANGUAGES.len());
    }

    #[test]
    fn new_rejects_default_outside_set() {
        let result = SupportedLanguages::new(["de", "pl"], "fr");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn new_rejects_region_tags() {
        let result = SupportedLanguages::new(["de-AT"], "de-AT");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn new_rejects_variant_tags() {
        let result = SupportedLanguages::new(["de-1996"], "de");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn new_normalizes_default_like_codes() {
        let languages = SupportedLanguages::new(["DE", "pl"], "DE").expect("valid set");
        assert_eq!(languages.default_language(), "de");
        assert!(languages.contains("de"));
    }

    #[test]
    fn new_rejects_empty_set() {
        let result = SupportedLanguages::new(Vec::<&str>::new(), "de");
        assert!(result.is_err());
    }

    #[test]
    fn coerce_unknown_returns_default() {
        let langs = de_pl();
        assert_eq!(langs.coerce("fr"), "de");
        assert_eq!(langs.coerce(""), "de");
        assert_eq!(langs.coerce("pl"), "pl");
    }

    #[test]
    fn detect_prefers_persisted_choice() {
        let langs = de_pl();
        for code in ["de", "pl"] {
            assert_eq!(langs.detect(Some(code), Some("de-DE")), code);
        }
    }

    #[test]
    fn detect_skips_unsupported_persisted_choice() {
        let langs = de_pl();
        assert_eq!(langs.detect(Some("fr"), Some("pl-PL")), "pl");
    }

    #[test]
    fn detect_uses_environment_prefix() {
        let langs = de_pl();
        assert_eq!(langs.detect(None, Some("PL-pl")), "pl");
        assert_eq!(langs.detect(None, Some("pl")), "pl");
    }

    #[test]
    fn detect_falls_back_to_default() {
        let langs = de_pl();
        assert_eq!(langs.detect(None, Some("fr-FR")), "de");
        assert_eq!(langs.detect(None, None), "de");
    }

    #[test]
    fn environment_prefix_only_splits_on_hyphen() {
        assert_eq!(environment_prefix("en-US"), "en");
        assert_eq!(environment_prefix("pl_PL"), "pl_pl");
        assert_eq!(environment_prefix(""), "");
    }
}
