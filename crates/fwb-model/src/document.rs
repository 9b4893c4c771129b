//! The document set: service name -> raw document text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from service name to raw document text.
///
/// Keys are trimmed and never empty. Insertion order is kept for display
/// only; it carries no meaning for composition. Writing an existing name
/// replaces its text in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSet {
    documents: IndexMap<String, String>,
}

impl DocumentSet {
    /// Create an empty document set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim a candidate service name, rejecting blank names.
    pub fn normalize_name(name: &str) -> Option<&str> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Insert an empty document under the trimmed name.
    ///
    /// Returns the key that was written, or `None` for a blank name.
    /// An existing document with the same name is reset to empty text.
    pub fn add(&mut self, name: &str) -> Option<String> {
        let key = Self::normalize_name(name)?.to_string();
        self.documents.insert(key.clone(), String::new());
        Some(key)
    }

    /// Replace the text stored for `name`, inserting it if absent.
    ///
    /// Returns `false` (and stores nothing) for a blank name.
    pub fn update(&mut self, name: &str, text: impl Into<String>) -> bool {
        match Self::normalize_name(name) {
            Some(key) => {
                self.documents.insert(key.to_string(), text.into());
                true
            }
            None => false,
        }
    }

    /// Text of the named document.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.documents.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Service names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// `(name, text)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for DocumentSet
where
    K: AsRef<str>,
    V: Into<String>,
{
    /// Collect pairs, trimming names and skipping blank ones. Later pairs win.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, text) in iter {
            set.update(name.as_ref(), text);
        }
        set
    }
}
