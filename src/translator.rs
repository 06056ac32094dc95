//! Message translation used by record drivers.

use indexmap::IndexMap;
use std::fmt;

/// Translates message keys into display strings.
pub trait Translator: fmt::Debug + Send + Sync {
    /// Translate `key`. Implementations return the key itself when no
    /// translation is known.
    fn translate(&self, key: &str) -> String;
}

/// A translator backed by an in-memory string table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapTranslator {
    strings: IndexMap<String, String>,
}

impl MapTranslator {
    /// Create an empty translator (every key maps to itself).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapTranslator {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapTranslator {
            strings: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_keys() {
        let translator = MapTranslator::new().with("Title not available", "Titel nicht verfügbar");
        assert_eq!(
            translator.translate("Title not available"),
            "Titel nicht verfügbar"
        );
        assert_eq!(translator.translate("My Favorites"), "My Favorites");
    }

    #[test]
    fn test_from_iter() {
        let translator: MapTranslator = [("a", "b")].into_iter().collect();
        assert_eq!(translator.translate("a"), "b");
    }
}
