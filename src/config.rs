//! Configuration lookups for the search core.
//!
//! Configuration is a set of named sections holding key/value pairs, in the
//! layout of the platform's main config file (`[OpenURL]`, `[AlphaBrowse]`,
//! `[Record]`, ...). It deserializes from JSON where each top-level key is a
//! section. Values keep their JSON type; the typed accessors below apply the
//! documented defaults.
//!
//! # Examples
//!
//! ```
//! use findcore::Config;
//!
//! let config = Config::from_json_str(r#"{
//!     "AlphaBrowse": {"page_size": 50},
//!     "OpenURL": {"url": "https://resolver.example.edu/openurl", "show_in_record": true}
//! }"#).unwrap();
//!
//! assert_eq!(config.alpha_browse_page_size().unwrap(), 50);
//! assert_eq!(config.open_url_url(), Some("https://resolver.example.edu/openurl"));
//! ```

use crate::error::{Result, SearchError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Default number of headings per alphabetic browse page.
pub const DEFAULT_BROWSE_PAGE_SIZE: usize = 20;

/// Browse sources offered when the config names none, with their labels.
pub const DEFAULT_BROWSE_TYPES: [(&str, &str); 4] = [
    ("topic", "By Topic"),
    ("author", "By Author"),
    ("title", "By Title"),
    ("lcc", "By Call Number"),
];

/// One config section: ordered key/value pairs.
pub type Section = IndexMap<String, Value>;

/// Sectioned key/value configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    sections: IndexMap<String, Section>,
}

impl Config {
    /// Create an empty configuration; every accessor returns its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from a JSON object of sections.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::JsonError`] if the text is not an object of
    /// objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or a JSON error if it
    /// cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set a value, creating the section if needed.
    #[must_use]
    pub fn with_value(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// A whole section.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// A single value. JSON `null` counts as unset.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .filter(|v| !v.is_null())
    }

    /// A value as text, if it is a string.
    #[must_use]
    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).and_then(Value::as_str)
    }

    /// A value as a flag, if set. See [`is_truthy`] for the conversion.
    #[must_use]
    pub fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        self.get(section, key).map(is_truthy)
    }

    /// Labels of the alphabetic browse sources (`AlphaBrowse_Types`), falling
    /// back to topic/author/title/lcc when the section is absent or empty.
    #[must_use]
    pub fn alpha_browse_types(&self) -> IndexMap<String, String> {
        match self.section("AlphaBrowse_Types") {
            Some(types) if !types.is_empty() => types
                .iter()
                .map(|(source, label)| {
                    let label = label
                        .as_str()
                        .map_or_else(|| label.to_string(), str::to_string);
                    (source.clone(), label)
                })
                .collect(),
            _ => DEFAULT_BROWSE_TYPES
                .iter()
                .map(|(source, label)| ((*source).to_string(), (*label).to_string()))
                .collect(),
        }
    }

    /// Headings per browse page (`AlphaBrowse.page_size`, default 20).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the value is set but is not a
    /// non-negative integer.
    pub fn alpha_browse_page_size(&self) -> Result<usize> {
        match self.get("AlphaBrowse", "page_size") {
            None => Ok(DEFAULT_BROWSE_PAGE_SIZE),
            Some(value) => value
                .as_u64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    SearchError::Config(format!("AlphaBrowse.page_size is not a count: {value}"))
                }),
        }
    }

    /// Related-record plugin specs (`Record.related`), empty when unset.
    ///
    /// Accepts a list of strings or a single string.
    #[must_use]
    pub fn related_types(&self) -> Vec<String> {
        match self.get("Record", "related") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(single)) => vec![single.clone()],
            _ => Vec::new(),
        }
    }

    /// Base URL of the OpenURL link resolver, if one is configured.
    #[must_use]
    pub fn open_url_url(&self) -> Option<&str> {
        self.get_str("OpenURL", "url")
    }

    /// An `OpenURL` switch such as `show_in_record`, if set.
    #[must_use]
    pub fn open_url_flag(&self, key: &str) -> Option<bool> {
        self.get_bool("OpenURL", key)
    }
}

/// Interpret a config value as a flag the way INI-derived settings are read:
/// booleans as-is, numbers are true unless zero, strings are true unless empty,
/// `"0"`, `"false"`, `"no"` or `"off"` (case-insensitive).
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim().to_ascii_lowercase();
            !(s.is_empty() || s == "0" || s == "false" || s == "no" || s == "off")
        }
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
