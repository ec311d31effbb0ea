// SPDX-License-Identifier: MPL-2.0
//! Bindings between dotted keys and page elements.
//!
//! The host UI layer owns its elements; it describes which key goes where
//! through [`Binding`]s and calls [`apply`] after every successful load.

use super::tree::TranslationTree;

/// Marker attribute holding the key of a translated element.
pub const KEY_ATTRIBUTE: &str = "data-i18n";
/// Presence routes the translation to the placeholder.
pub const PLACEHOLDER_ATTRIBUTE: &str = "data-i18n-placeholder";
/// Presence routes the translation to the element's markup.
pub const HTML_ATTRIBUTE: &str = "data-i18n-html";
/// Key whose translation becomes the element's link target.
pub const HREF_ATTRIBUTE: &str = "data-i18n-href";

/// Where a resolved string is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    #[default]
    Text,
    /// Rendered as markup. The bundle must be trusted.
    Html,
    /// Form-control value, e.g. a submit button label.
    Value,
    Placeholder,
    /// Link target. Left untouched when the key does not resolve.
    Href,
}

/// Something translated text can be written into.
pub trait BindingTarget {
    fn set_text(&mut self, text: &str);
    fn set_html(&mut self, html: &str);
    fn set_value(&mut self, value: &str);
    fn set_placeholder(&mut self, placeholder: &str);
    fn set_href(&mut self, href: &str);
}

/// A dotted key, the mode to apply it with, and a handle to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding<T> {
    pub key: String,
    pub mode: ApplyMode,
    pub target: T,
}

impl<T> Binding<T> {
    pub fn new(key: impl Into<String>, mode: ApplyMode, target: T) -> Self {
        Self {
            key: key.into(),
            mode,
            target,
        }
    }

    pub fn text(key: impl Into<String>, target: T) -> Self {
        Self::new(key, ApplyMode::Text, target)
    }
}

/// Attribute view of an element, enough to derive its bindings.
pub trait Marked {
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// Mode for an element carrying [`KEY_ATTRIBUTE`].
///
/// Submit inputs take the value, then placeholder and html markers are
/// honored, in that order. Everything else gets plain text.
pub fn mode_for<E: Marked + ?Sized>(element: &E) -> ApplyMode {
    let is_submit = element.tag_name().eq_ignore_ascii_case("input")
        && element
            .attribute("type")
            .is_some_and(|kind| kind.eq_ignore_ascii_case("submit"));

    if is_submit {
        ApplyMode::Value
    } else if element.has_attribute(PLACEHOLDER_ATTRIBUTE) {
        ApplyMode::Placeholder
    } else if element.has_attribute(HTML_ATTRIBUTE) {
        ApplyMode::Html
    } else {
        ApplyMode::Text
    }
}

/// Derives `(key, mode)` pairs from an element's marker attributes.
pub fn bindings_for<E: Marked + ?Sized>(element: &E) -> Vec<(String, ApplyMode)> {
    let mut found = Vec::new();
    if let Some(key) = element.attribute(KEY_ATTRIBUTE) {
        found.push((key.to_string(), mode_for(element)));
    }
    if let Some(key) = element.attribute(HREF_ATTRIBUTE) {
        found.push((key.to_string(), ApplyMode::Href));
    }
    found
}

/// Writes one resolved key into `target`.
pub fn apply_one<T: BindingTarget + ?Sized>(
    tree: &TranslationTree,
    key: &str,
    mode: ApplyMode,
    target: &mut T,
) {
    let Some(resolved) = tree.lookup(key) else {
        if mode != ApplyMode::Href {
            tracing::warn!(key, "translation key not found");
            target_write(target, mode, key);
        }
        return;
    };
    target_write(target, mode, resolved);
}

fn target_write<T: BindingTarget + ?Sized>(target: &mut T, mode: ApplyMode, text: &str) {
    match mode {
        ApplyMode::Text => target.set_text(text),
        ApplyMode::Html => target.set_html(text),
        ApplyMode::Value => target.set_value(text),
        ApplyMode::Placeholder => target.set_placeholder(text),
        ApplyMode::Href => target.set_href(text),
    }
}

/// Resolves every binding against `tree` and writes the results.
pub fn apply<T: BindingTarget>(tree: &TranslationTree, bindings: &mut [Binding<T>]) {
    for binding in bindings.iter_mut() {
        apply_one(tree, &binding.key, binding.mode, &mut binding.target);
    }
}
