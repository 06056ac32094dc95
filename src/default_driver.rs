//! Record driver for documents of the main Solr index.
//!
//! Reads the generic schema fields: `id`, `title`, `title_short`, `title_sub`,
//! `author` and `format`. Multi-valued fields yield their first value where a
//! single value is expected.

use crate::capability::{base_capability, Capability};
use crate::error::{Result, SearchError};
use crate::record_driver::{DriverContext, DriverCore, RecordDriver, DEFAULT_RESOURCE_SOURCE};
use serde_json::{json, Value};
use std::sync::Arc;

/// Generic schema-driven record.
#[derive(Debug, Clone)]
pub struct DefaultRecord {
    core: DriverCore,
}

impl DefaultRecord {
    /// Create an empty driver tagged with the default source.
    #[must_use]
    pub fn new(context: Arc<DriverContext>) -> Self {
        DefaultRecord {
            core: DriverCore::new(context, DEFAULT_RESOURCE_SOURCE),
        }
    }

    /// Full title (`title`), empty if absent.
    #[must_use]
    pub fn title(&self) -> String {
        self.string_field("title")
    }

    /// Short title (`title_short`), empty if absent.
    #[must_use]
    pub fn short_title(&self) -> String {
        self.string_field("title_short")
    }

    /// Subtitle (`title_sub`), empty if absent.
    #[must_use]
    pub fn subtitle(&self) -> String {
        self.string_field("title_sub")
    }

    /// Main author (`author`), empty if absent.
    #[must_use]
    pub fn primary_author(&self) -> String {
        self.string_field("author")
    }

    /// Format labels (`format`).
    #[must_use]
    pub fn formats(&self) -> Vec<String> {
        self.core
            .values("format")
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn string_field(&self, name: &str) -> String {
        self.core.first_value(name).unwrap_or_default().to_string()
    }
}

impl RecordDriver for DefaultRecord {
    fn core(&self) -> &DriverCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DriverCore {
        &mut self.core
    }

    fn unique_id(&self) -> Result<String> {
        match self.core.fields().get("id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(SearchError::InvalidRecord("ID not set!".to_string())),
        }
    }

    fn breadcrumb(&self) -> String {
        self.short_title()
    }

    fn citation_formats(&self) -> Vec<String> {
        vec!["APA".to_string(), "MLA".to_string()]
    }

    fn capability(&self, capability: Capability, args: &[Value]) -> Option<Value> {
        match capability {
            Capability::Title => Some(self.title().into()),
            Capability::ShortTitle => Some(self.short_title().into()),
            Capability::Subtitle => Some(self.subtitle().into()),
            Capability::PrimaryAuthor => Some(self.primary_author().into()),
            Capability::Formats => Some(json!(self.formats())),
            other => base_capability(self, other, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: Value) -> DefaultRecord {
        let mut driver = DefaultRecord::new(Arc::new(DriverContext::default()));
        driver.set_raw_data(fields);
        driver
    }

    #[test]
    fn test_fields() {
        let driver = record(json!({
            "id": "ocm123",
            "title": "The great Gatsby / F. Scott Fitzgerald.",
            "title_short": "The great Gatsby",
            "author": "Fitzgerald, F. Scott",
            "format": ["Book", "Large Print"]
        }));
        assert_eq!(driver.unique_id().unwrap(), "ocm123");
        assert_eq!(driver.breadcrumb(), "The great Gatsby");
        assert_eq!(driver.primary_author(), "Fitzgerald, F. Scott");
        assert_eq!(driver.formats(), vec!["Book", "Large Print"]);
        assert_eq!(driver.subtitle(), "");
        assert_eq!(driver.resource_source(), "VuFind");
    }

    #[test]
    fn test_missing_id() {
        let driver = record(json!({"title": "No identifier"}));
        assert!(matches!(driver.unique_id(), Err(SearchError::InvalidRecord(_))));
        assert!(driver.try_method("unique_id", &[]).is_none());
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(record(json!({"id": 42})).unique_id().unwrap(), "42");
    }

    #[test]
    fn test_sort_titles() {
        assert_eq!(
            record(json!({"title_short": "The Great Gatsby"})).sort_title(),
            "great gatsby"
        );
        assert_eq!(
            record(json!({"title_short": "A Tale of Two Cities"})).sort_title(),
            "tale of two cities"
        );
        assert_eq!(record(json!({"title_short": "Moby Dick"})).sort_title(), "moby dick");
    }

    #[test]
    fn test_schema_capabilities() {
        let driver = record(json!({"id": "1", "title": "Emma", "format": "Book"}));
        assert_eq!(driver.try_method("title", &[]), Some(json!("Emma")));
        assert_eq!(driver.try_method("formats", &[]), Some(json!(["Book"])));
        assert_eq!(
            driver.try_method("citation_formats", &[]),
            Some(json!(["APA", "MLA"]))
        );
        assert_eq!(driver.try_method("resource_source", &[]), Some(json!("VuFind")));
    }
}
