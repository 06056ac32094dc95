//! Typed, position-aware view of a deserialized search response.
//!
//! A [`RecordCollection`] wraps the raw JSON response of one search request and
//! the record drivers built from its documents. Records are keyed by their
//! position in the overall result set, so a page starting at `start = 40`
//! holds records at positions 40, 41, ... rather than 0, 1, ...
//!
//! The collection has two phases. While it is being built, [`RecordCollection::add`]
//! places each record at the cursor and advances it. Readers then call
//! [`RecordCollection::rewind`] and walk the cursor with the `valid`/`current`/
//! `next`/`key` protocol, or use the borrowing [`RecordCollection::iter`].
//!
//! # Examples
//!
//! ```ignore
//! use findcore::RecordCollection;
//! use serde_json::json;
//!
//! let mut collection = RecordCollection::new(json!({
//!     "response": {"numFound": 135, "start": 40, "docs": []}
//! }));
//! collection.add(record_a);
//! collection.add(record_b);
//!
//! assert_eq!(collection.total(), 135);
//! assert_eq!(collection.count(), 2);
//!
//! collection.rewind();
//! while collection.valid() {
//!     println!("{}: {:?}", collection.key(), collection.current().map(|r| r.breadcrumb()));
//!     collection.next();
//! }
//! ```

use crate::driver_factory::RecordDriverFactory;
use crate::error::{Result, SearchError};
use crate::facets::Facets;
use crate::record_driver::RecordRef;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Defaults merged under every raw response.
fn response_template() -> Value {
    json!({
        "responseHeader": {"QTime": 0},
        "response": {"start": 0},
        "facet_counts": {},
    })
}

/// Recursively merge `overlay` onto `base`; overlay keys win, base only fills
/// in keys the overlay lacks.
fn merge_recursive(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_recursive(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Records of one search response, keyed by result-set position.
pub struct RecordCollection {
    response: Value,
    records: BTreeMap<usize, RecordRef>,
    offset: usize,
    pointer: usize,
    source: Option<String>,
    facets: OnceLock<Facets>,
}

impl fmt::Debug for RecordCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCollection")
            .field("offset", &self.offset)
            .field("pointer", &self.pointer)
            .field("positions", &self.records.keys().collect::<Vec<_>>())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl RecordCollection {
    /// Wrap a deserialized response.
    ///
    /// The response is merged over `{responseHeader: {QTime: 0}, response:
    /// {start: 0}, facet_counts: {}}`, so those keys are always present. The
    /// offset is read from `response.start` and the cursor is rewound to it.
    #[must_use]
    pub fn new(response: Value) -> Self {
        let mut merged = response_template();
        merge_recursive(&mut merged, response);
        let offset = merged["response"]["start"]
            .as_u64()
            .and_then(|start| usize::try_from(start).ok())
            .unwrap_or(0);
        debug!(offset, "wrapping search response");

        let mut collection = RecordCollection {
            response: merged,
            records: BTreeMap::new(),
            offset,
            pointer: offset,
            source: None,
            facets: OnceLock::new(),
        };
        collection.rewind();
        collection
    }

    /// The merged raw response.
    #[must_use]
    pub fn raw_response(&self) -> &Value {
        &self.response
    }

    /// Total number of matches reported by the engine (`response.numFound`).
    ///
    /// This is the size of the whole result set, not of this page.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.response["response"]["numFound"].as_u64().unwrap_or(0)
    }

    /// Query time reported by the engine (`responseHeader.QTime`), in
    /// milliseconds.
    #[must_use]
    pub fn query_time(&self) -> f64 {
        self.response["responseHeader"]["QTime"]
            .as_f64()
            .unwrap_or(0.0)
    }

    /// Facets of the response, parsed on first access and cached.
    ///
    /// Every call on the same collection returns the same instance.
    pub fn facets(&self) -> &Facets {
        self.facets
            .get_or_init(|| Facets::new(&self.response["facet_counts"]))
    }

    /// Populated records keyed by position.
    #[must_use]
    pub fn records(&self) -> &BTreeMap<usize, RecordRef> {
        &self.records
    }

    /// Position of the first record of this page in the full result set.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The record at the page's reported start, if present.
    #[must_use]
    pub fn first(&self) -> Option<&RecordRef> {
        self.records.get(&self.offset)
    }

    /// Tag the collection with the identifier of the backend that produced it.
    pub fn set_source_identifier(&mut self, identifier: impl Into<String>) {
        self.source = Some(identifier.into());
    }

    /// Identifier of the producing backend, if set.
    #[must_use]
    pub fn source_identifier(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Place `record` at the cursor and advance.
    ///
    /// If this very record instance is already in the collection nothing
    /// happens. Records with equal content but distinct instances are both
    /// kept.
    pub fn add(&mut self, record: RecordRef) {
        if self.records.values().any(|held| Arc::ptr_eq(held, &record)) {
            return;
        }
        self.records.insert(self.pointer, record);
        self.next();
    }

    /// Number of populated positions, at most one page.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// True if a record exists at the cursor.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.records.contains_key(&self.pointer)
    }

    /// Record at the cursor, if any.
    #[must_use]
    pub fn current(&self) -> Option<&RecordRef> {
        self.records.get(&self.pointer)
    }

    /// Move the cursor back to the page offset.
    pub fn rewind(&mut self) {
        self.pointer = self.offset;
    }

    /// Advance the cursor by one, whether or not the current position is valid.
    ///
    /// The cursor stops at `usize::MAX`.
    pub fn next(&mut self) {
        self.pointer = self.pointer.saturating_add(1);
    }

    /// Position of the cursor.
    #[must_use]
    pub fn key(&self) -> usize {
        self.pointer
    }

    /// Iterate `(position, record)` from the offset while positions are
    /// populated. Independent of the cursor.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            collection: self,
            position: Some(self.offset),
        }
    }
}

/// Borrowing iterator over a [`RecordCollection`].
#[derive(Debug)]
pub struct Iter<'a> {
    collection: &'a RecordCollection,
    position: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a RecordRef);

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.position?;
        let record = self.collection.records.get(&position)?;
        self.position = position.checked_add(1);
        Some((position, record))
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = (usize, &'a RecordRef);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Callback turning one response document into a record driver.
pub type RecordBuilderFn = dyn Fn(&Value) -> Result<RecordRef> + Send + Sync;

/// Builds [`RecordCollection`]s from raw responses.
///
/// Each entry of `response.docs` is handed to the record callback and the
/// resulting drivers are added in document order.
pub struct RecordCollectionFactory {
    build_record: Box<RecordBuilderFn>,
}

impl fmt::Debug for RecordCollectionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCollectionFactory").finish_non_exhaustive()
    }
}

impl RecordCollectionFactory {
    /// Create a factory around a record callback.
    pub fn new<F>(build_record: F) -> Self
    where
        F: Fn(&Value) -> Result<RecordRef> + Send + Sync + 'static,
    {
        RecordCollectionFactory {
            build_record: Box::new(build_record),
        }
    }

    /// Create a factory that wraps every document in a default record driver.
    #[must_use]
    pub fn with_drivers(drivers: Arc<RecordDriverFactory>) -> Self {
        Self::new(move |doc| Ok(Arc::from(drivers.default_record(doc.clone()))))
    }

    /// Build a collection for `response`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidRecord`] if `response.docs` is present but
    /// not a list, or any error the record callback reports.
    pub fn build(&self, response: Value) -> Result<RecordCollection> {
        let docs = match response.pointer("/response/docs") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(docs)) => docs.clone(),
            Some(_) => {
                return Err(SearchError::InvalidRecord(
                    "response.docs is not a list".to_string(),
                ))
            }
        };

        let mut collection = RecordCollection::new(response);
        for doc in &docs {
            collection.add((self.build_record)(doc)?);
        }
        debug!(
            records = collection.count(),
            total = collection.total(),
            "built record collection"
        );
        Ok(collection)
    }
}
