//! Natural-language maps (`nameMap`, `contentMap`, ...).

use serde_json::{Map, Value};

/// Language tag to localized string.
///
/// Held beside a property's plain values and encoded under its own
/// `<name>Map` key. An empty map is still a configured map. Tags keep
/// insertion order, so a decoded map re-encodes in wire order; equality
/// ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageMap {
    entries: Map<String, Value>,
}

impl LanguageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the string for `tag`, returning the previous one.
    ///
    /// A replaced tag keeps its position.
    pub fn insert(&mut self, tag: impl Into<String>, text: impl Into<String>) -> Option<String> {
        match self.entries.insert(tag.into(), Value::String(text.into())) {
            Some(Value::String(previous)) => Some(previous),
            _ => None,
        }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries.get(tag).and_then(Value::as_str)
    }

    pub fn remove(&mut self, tag: &str) -> Option<String> {
        match self.entries.shift_remove(tag) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LanguageMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (tag, text) in iter {
            map.insert(tag, text);
        }
        map
    }
}
