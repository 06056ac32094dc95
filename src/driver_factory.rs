//! Construction of record drivers.
//!
//! The factory owns the [`DriverContext`] shared by all drivers of a request
//! and hands out empty drivers of the requested kind, or drivers already
//! populated from raw data.

use crate::default_driver::DefaultRecord;
use crate::missing_driver::MissingRecord;
use crate::record_driver::{DriverContext, RecordDriver};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Kind of record driver to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverKind {
    /// Generic schema-driven record
    Default,
    /// Placeholder for a record gone from the index
    Missing,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::Missing => write!(f, "Missing"),
        }
    }
}

/// Builds record drivers around a shared context.
#[derive(Debug, Clone)]
pub struct RecordDriverFactory {
    context: Arc<DriverContext>,
}

impl RecordDriverFactory {
    /// Create a factory for `context`.
    #[must_use]
    pub fn new(context: Arc<DriverContext>) -> Self {
        RecordDriverFactory { context }
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<DriverContext> {
        &self.context
    }

    /// An empty driver of `kind`.
    #[must_use]
    pub fn create(&self, kind: DriverKind) -> Box<dyn RecordDriver> {
        match kind {
            DriverKind::Default => Box::new(DefaultRecord::new(Arc::clone(&self.context))),
            DriverKind::Missing => Box::new(MissingRecord::new(Arc::clone(&self.context))),
        }
    }

    /// A driver of `kind` populated with `data`.
    #[must_use]
    pub fn from_raw(&self, kind: DriverKind, data: Value) -> Box<dyn RecordDriver> {
        let mut driver = self.create(kind);
        driver.set_raw_data(data);
        driver
    }

    /// A default driver populated with one index document.
    #[must_use]
    pub fn default_record(&self, data: Value) -> Box<dyn RecordDriver> {
        self.from_raw(DriverKind::Default, data)
    }

    /// A placeholder for `id`, tagged with the source the record came from.
    #[must_use]
    pub fn missing_record(&self, id: &str, source: Option<&str>) -> MissingRecord {
        let mut record = MissingRecord::new(Arc::clone(&self.context));
        record.set_raw_data(json!({ "id": id }));
        if let Some(source) = source {
            record.set_resource_source(source);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_kinds() {
        let factory = RecordDriverFactory::new(Arc::new(DriverContext::default()));
        let default = factory.create(DriverKind::Default);
        assert_eq!(default.resource_source(), "VuFind");
        assert_eq!(default.raw_data(), &json!({}));

        let missing = factory.create(DriverKind::Missing);
        assert_eq!(missing.resource_source(), "missing");
    }

    #[test]
    fn test_from_raw() {
        let factory = RecordDriverFactory::new(Arc::new(DriverContext::default()));
        let driver = factory.from_raw(DriverKind::Default, json!({"id": "x1", "title_short": "An Essay"}));
        assert_eq!(driver.unique_id().unwrap(), "x1");
        assert_eq!(driver.sort_title(), "essay");
    }

    #[test]
    fn test_missing_record_source() {
        let factory = RecordDriverFactory::new(Arc::new(DriverContext::default()));
        let missing = factory.missing_record("old-id", Some("VuFind"));
        assert_eq!(missing.unique_id().unwrap(), "old-id");
        assert_eq!(missing.resource_source(), "VuFind");
        assert_eq!(
            factory.missing_record("old-id", None).resource_source(),
            "missing"
        );
    }
}
