//! Search engine client contract and typed browse responses.
//!
//! The core never talks HTTP itself. A [`SearchBackend`] implementation (a
//! Solr client, a test double, ...) executes searches and alphabetic browse
//! requests; [`SearchService`] turns raw search responses into
//! [`RecordCollection`]s.

use crate::error::{BackendError, Result};
use crate::query::QueryNode;
use crate::record_collection::{RecordCollection, RecordCollectionFactory};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// One heading of an alphabetic browse page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowseItem {
    /// Heading text
    pub heading: String,
    /// Number of records filed under the heading
    pub count: u64,
    /// Record IDs under the heading, when the engine includes them
    pub ids: Vec<String>,
    /// Related headings ("see also")
    pub see_also: Vec<String>,
    /// Preferred headings ("use instead")
    pub use_instead: Vec<String>,
    /// Engine-specific extra data
    pub extras: serde_json::Map<String, Value>,
}

/// Body of an alphabetic browse response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePage {
    /// Number of headings in the browse index
    pub total_count: u64,
    /// Offset of the page relative to the matched heading
    pub offset: i64,
    /// Row of the matched heading in the browse index
    pub start_row: i64,
    /// Headings of the page
    #[serde(default)]
    pub items: Vec<BrowseItem>,
}

/// Alphabetic browse response as returned by the engine (`{"Browse": {...}}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseResponse {
    /// The browse page
    #[serde(rename = "Browse")]
    pub browse: BrowsePage,
}

impl BrowseResponse {
    /// Deserialize an engine response body.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Other`] if the body does not have the browse
    /// shape.
    pub fn from_value(value: Value) -> std::result::Result<Self, BackendError> {
        serde_json::from_value(value)
            .map_err(|e| BackendError::Other(format!("malformed browse response: {e}")))
    }
}

/// Client of the external search engine.
///
/// Calls are synchronous and fallible; implementations own timeouts and
/// cancellation, and must not retry on the core's behalf.
pub trait SearchBackend: fmt::Debug + Send + Sync {
    /// Run `query` against `collection`, returning the deserialized response.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] describing the engine failure.
    fn query(
        &self,
        collection: &str,
        query: &QueryNode,
        page: usize,
        page_size: usize,
    ) -> std::result::Result<Value, BackendError>;

    /// Fetch one page of the alphabetic browse index for `source`, positioned
    /// at `from`. `page` may be negative to step before the matched heading.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingBrowseIndex`] if no browse index exists
    /// for `source`, or another [`BackendError`].
    fn alphabetic_browse(
        &self,
        source: &str,
        from: &str,
        page: i64,
        page_size: usize,
    ) -> std::result::Result<BrowseResponse, BackendError>;
}

/// Runs searches and wraps the results in record collections.
#[derive(Debug)]
pub struct SearchService<'a> {
    backend: &'a dyn SearchBackend,
    factory: &'a RecordCollectionFactory,
    identifier: String,
}

impl<'a> SearchService<'a> {
    /// Create a service tagging its collections with `identifier`.
    #[must_use]
    pub fn new(
        backend: &'a dyn SearchBackend,
        factory: &'a RecordCollectionFactory,
        identifier: impl Into<String>,
    ) -> Self {
        SearchService {
            backend,
            factory,
            identifier: identifier.into(),
        }
    }

    /// Search `collection` and build a record collection from the response.
    ///
    /// # Errors
    ///
    /// Backend failures propagate unchanged as [`SearchError::Backend`](crate::SearchError::Backend);
    /// record construction errors propagate as well.
    pub fn search(
        &self,
        collection: &str,
        query: &QueryNode,
        page: usize,
        page_size: usize,
    ) -> Result<RecordCollection> {
        debug!(collection, %query, page, page_size, "searching");
        let raw = self.backend.query(collection, query, page, page_size)?;
        let mut records = self.factory.build(raw)?;
        records.set_source_identifier(self.identifier.clone());
        Ok(records)
    }
}
