// SPDX-License-Identifier: MPL-2.0
//! Translation trees and dotted-key resolution.
//!
//! A bundle is a JSON object whose values are either strings or further
//! objects. Anything else (numbers, arrays, booleans, null) is kept as
//! [`Node::Other`] so that looking it up falls back like a missing key.

use crate::error::{LoadError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// A single node of a translation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Branch(HashMap<String, Node>),
    Other,
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Node::Text(text),
            Value::Object(map) => Node::Branch(
                map.into_iter()
                    .map(|(key, child)| (key, Node::from(child)))
                    .collect(),
            ),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => Node::Other,
        }
    }
}

/// The full key/value tree for one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTree {
    root: HashMap<String, Node>,
}

impl TranslationTree {
    /// Parses a bundle body.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the bytes are not JSON or the
    /// top-level value is not an object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Builds a tree from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] unless `value` is an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match Node::from(value) {
            Node::Branch(root) => Ok(Self { root }),
            Node::Text(_) | Node::Other => Err(LoadError::Parse(
                "bundle root must be a JSON object".to_string(),
            )
            .into()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walks `key` segment by segment, returning the string leaf it names.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut node = self.root.get(first)?;

        for segment in segments {
            node = match node {
                Node::Branch(children) => children.get(segment)?,
                Node::Text(_) | Node::Other => return None,
            };
        }

        match node {
            Node::Text(text) => Some(text),
            Node::Branch(_) | Node::Other => None,
        }
    }

    /// Resolves `key`, returning the key itself when there is no string leaf.
    #[must_use]
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }
}
