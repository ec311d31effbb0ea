// SPDX-License-Identifier: MPL-2.0
//! In-memory page model.
//!
//! A flat list of elements with just enough state to be localized: the
//! marker attributes that declare bindings, the fields bindings write to,
//! and a class list for highlighting the active language button.

use super::binding::{self, BindingTarget, Marked};
use super::language::LanguageCode;
use super::tree::TranslationTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute naming the language a toggle button switches to.
pub const LANG_ATTRIBUTE: &str = "data-lang";
/// Class carried by the toggle button of the active language.
pub const ACTIVE_CLASS: &str = "active";

/// Rendered content of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Html(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub content: Option<Content>,
    pub value: Option<String>,
    pub classes: Vec<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn html(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Html(html)) => Some(html),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn set_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        } else {
            self.classes.retain(|c| c != class);
        }
    }
}

impl Marked for Element {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl BindingTarget for Element {
    fn set_text(&mut self, text: &str) {
        self.content = Some(Content::Text(text.to_string()));
    }

    fn set_html(&mut self, html: &str) {
        self.content = Some(Content::Html(html.to_string()));
    }

    fn set_value(&mut self, value: &str) {
        self.value = Some(value.to_string());
    }

    fn set_placeholder(&mut self, placeholder: &str) {
        self.attributes
            .insert("placeholder".to_string(), placeholder.to_string());
    }

    fn set_href(&mut self, href: &str) {
        self.attributes.insert("href".to_string(), href.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Writes every marked element from `tree` and highlights the toggle
    /// button for `active`.
    pub fn localize(&mut self, tree: &TranslationTree, active: &LanguageCode) {
        for element in &mut self.elements {
            for (key, mode) in binding::bindings_for(&*element) {
                binding::apply_one(tree, &key, mode, element);
            }
        }
        self.highlight_language(active);
    }

    /// Adds [`ACTIVE_CLASS`] to toggle buttons for `active`, removes it elsewhere.
    pub fn highlight_language(&mut self, active: &LanguageCode) {
        for element in &mut self.elements {
            if !element.tag.eq_ignore_ascii_case("button") {
                continue;
            }
            let Some(lang) = element.attribute(LANG_ATTRIBUTE) else {
                continue;
            };
            let is_active = active == lang;
            element.set_class(ACTIVE_CLASS, is_active);
        }
    }
}
