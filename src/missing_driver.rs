//! Placeholder driver for records that vanished from the index.
//!
//! User data (saved lists, tags, comments) can reference IDs the index no
//! longer holds. A [`MissingRecord`] stands in for such an ID so the user data
//! can still be shown. Its title falls back in two steps: the title stored with
//! the saved resource, then a translated "Title not available" message.

use crate::capability::{base_capability, Capability};
use crate::default_driver::DefaultRecord;
use crate::error::{Result, SearchError};
use crate::record_driver::{DriverContext, DriverCore, RecordDriver};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Source tag given to missing records unless overridden.
pub const MISSING_RESOURCE_SOURCE: &str = "missing";

/// Message key of the placeholder title.
pub const TITLE_NOT_AVAILABLE: &str = "Title not available";

/// Stand-in for a record absent from the index.
#[derive(Debug, Clone)]
pub struct MissingRecord {
    base: DefaultRecord,
}

impl MissingRecord {
    /// Create an empty placeholder tagged with the `missing` source.
    #[must_use]
    pub fn new(context: Arc<DriverContext>) -> Self {
        let mut base = DefaultRecord::new(context);
        base.core_mut().set_resource_source(MISSING_RESOURCE_SOURCE);
        MissingRecord { base }
    }

    /// Tag the placeholder with the source the vanished record came from.
    pub fn set_resource_source(&mut self, source: impl Into<String>) {
        self.base.core_mut().set_resource_source(source);
    }

    /// Title for a record whose data is gone: the stored resource title if
    /// there is a non-empty one, else the translated placeholder.
    ///
    /// Without a storage gateway nothing can be stored, so the placeholder is
    /// used.
    ///
    /// # Errors
    ///
    /// Returns storage errors and [`SearchError::InvalidRecord`] when the
    /// placeholder has no ID.
    pub fn determine_missing_title(&self) -> Result<String> {
        match self.core().context().storage() {
            Ok(storage) => {
                let key = self.resource_key()?;
                if let Some(resource) = storage.find_resource(&key, false, None)? {
                    if !resource.title.is_empty() {
                        return Ok(resource.title);
                    }
                }
            }
            Err(SearchError::MissingService(_)) => {}
            Err(other) => return Err(other),
        }
        Ok(self.translate(TITLE_NOT_AVAILABLE))
    }

    /// Short title from the raw data, falling back to the missing title.
    #[must_use]
    pub fn short_title(&self) -> String {
        let title = self.base.short_title();
        if title.is_empty() {
            self.fallback_title()
        } else {
            title
        }
    }

    /// Same as [`short_title`](Self::short_title); placeholders carry no
    /// separate full title.
    #[must_use]
    pub fn title(&self) -> String {
        self.short_title()
    }

    fn fallback_title(&self) -> String {
        self.determine_missing_title().unwrap_or_else(|err| {
            warn!(error = %err, "could not look up title of missing record");
            self.translate(TITLE_NOT_AVAILABLE)
        })
    }
}

impl RecordDriver for MissingRecord {
    fn core(&self) -> &DriverCore {
        self.base.core()
    }

    fn core_mut(&mut self) -> &mut DriverCore {
        self.base.core_mut()
    }

    fn unique_id(&self) -> Result<String> {
        self.base.unique_id()
    }

    fn breadcrumb(&self) -> String {
        self.short_title()
    }

    fn citation_formats(&self) -> Vec<String> {
        self.base.citation_formats()
    }

    fn capability(&self, capability: Capability, args: &[Value]) -> Option<Value> {
        match capability {
            Capability::Title => Some(self.title().into()),
            Capability::ShortTitle => Some(self.short_title().into()),
            Capability::Subtitle
            | Capability::PrimaryAuthor
            | Capability::Formats => self.base.capability(capability, args),
            other => base_capability(self, other, args),
        }
    }
}
