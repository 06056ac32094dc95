//! Helpers called while records are imported into the index.
//!
//! These are the pieces of the import pipeline that reach into the core:
//! sort-key article stripping, SolrMarc-style translation maps, and the change
//! tracker that remembers when each record was first and last indexed.

use crate::error::{Result, SearchError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;

/// Leading articles removed from sort keys.
const ARTICLES: [&str; 3] = ["a", "an", "the"];

/// Format of index timestamps.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Build a sort key: trim, lower-case, and drop one leading article (`a`,
/// `an` or `the` followed by a space).
///
/// Only one article is removed, so "The A Team" sorts as "a team".
///
/// # Examples
///
/// ```
/// use findcore::import::strip_articles;
///
/// assert_eq!(strip_articles("The Great Gatsby"), "great gatsby");
/// assert_eq!(strip_articles("  An Essay "), "essay");
/// assert_eq!(strip_articles("Theory"), "theory");
/// ```
#[must_use]
pub fn strip_articles(input: &str) -> String {
    let text = input.trim().to_lowercase();
    for article in ARTICLES {
        if let Some(rest) = text
            .strip_prefix(article)
            .and_then(|rest| rest.strip_prefix(' '))
        {
            return rest.to_string();
        }
    }
    text
}

/// A translation map in SolrMarc properties format.
///
/// Each line `key = value` maps a code to a label; text after the first `=` is
/// the value, both sides are trimmed, and lines without `=` are ignored. A
/// later line for the same key replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMap {
    entries: IndexMap<String, String>,
}

impl TranslationMap {
    /// Parse map text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();
        TranslationMap { entries }
    }

    /// Read and parse a map file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    /// Map `input` through the table, returning it unchanged when unmapped.
    #[must_use]
    pub fn map_string<'a>(&'a self, input: &'a str) -> &'a str {
        self.entries.get(input).map_or(input, String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index history of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRow {
    /// When the record first entered the index
    pub first_indexed: DateTime<Utc>,
    /// When the record was last (re)indexed
    pub last_indexed: DateTime<Utc>,
}

/// Store of per-record index history.
pub trait ChangeTracker: fmt::Debug + Send + Sync {
    /// Register that record `id` of `core` was indexed with a record date of
    /// `date`, and return its updated history.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or written.
    fn index(&self, core: &str, id: &str, date: DateTime<Utc>) -> Result<ChangeRow>;
}

/// Parse a record date as found in import data: RFC 3339,
/// `YYYY-MM-DD HH:MM:SS` (UTC) or `YYYY-MM-DD` (midnight UTC).
///
/// # Errors
///
/// Returns [`SearchError::InvalidArgument`] if no format matches.
pub fn parse_record_date(date: &str) -> Result<DateTime<Utc>> {
    let date = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") {
        return Ok(parsed.and_utc());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| SearchError::InvalidArgument(format!("unrecognized date: {date}")))
}

/// First-indexed timestamp of a record, as ISO 8601, after registering the
/// current import with the tracker.
///
/// # Errors
///
/// Returns date parsing or tracker errors.
pub fn first_indexed(
    tracker: &dyn ChangeTracker,
    core: &str,
    id: &str,
    date: &str,
) -> Result<String> {
    let row = tracker.index(core, id, parse_record_date(date)?)?;
    Ok(row.first_indexed.format(ISO8601_FORMAT).to_string())
}

/// Last-indexed timestamp of a record, as ISO 8601, after registering the
/// current import with the tracker.
///
/// # Errors
///
/// Returns date parsing or tracker errors.
pub fn last_indexed(
    tracker: &dyn ChangeTracker,
    core: &str,
    id: &str,
    date: &str,
) -> Result<String> {
    let row = tracker.index(core, id, parse_record_date(date)?)?;
    Ok(row.last_indexed.format(ISO8601_FORMAT).to_string())
}
