//! Storage gateway contract used by record drivers.
//!
//! Comments, tags, saved lists and notes live in an external store (database,
//! ILS, ...). Drivers never implement storage themselves; they only hand the
//! gateway the [`ResourceKey`] of the record they wrap. Every identifier a
//! driver passes through here is scoped by the record's source tag, so records
//! from different backends that share an ID do not collide.

use crate::error::Result;
use crate::record_driver::RecordDriver;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite storage key of a record: unique ID plus source tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    /// Record ID within its source
    pub id: String,
    /// Source tag (e.g. `VuFind`, `missing`)
    pub source: String,
}

impl ResourceKey {
    /// Build a key from ID and source tag.
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        ResourceKey {
            id: id.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.source, self.id)
    }
}

/// An account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Storage ID of the user
    pub id: u64,
    /// Login name
    pub username: String,
}

/// A persisted reference to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Storage ID of the resource row
    pub id: u64,
    /// Record identity the resource points at
    pub key: ResourceKey,
    /// Title captured when the resource was saved
    pub title: String,
}

/// A user's list of saved records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    /// Storage ID of the list
    pub id: u64,
    /// Owner of the list
    pub user_id: u64,
    /// Display title
    pub title: String,
}

/// A comment left on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Storage ID of the comment
    pub id: u64,
    /// Author of the comment
    pub user_id: u64,
    /// Comment text
    pub text: String,
    /// Creation time
    pub created: DateTime<Utc>,
}

/// A tag and the number of times it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    /// Tag text
    pub tag: String,
    /// Number of applications
    pub count: u64,
}

/// Sort order for tag lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TagSort {
    /// Most used first
    #[default]
    Count,
    /// Alphabetical
    Tag,
}

/// Filters for a tag lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    /// Only tags applied within this list
    pub list_id: Option<u64>,
    /// Only tags applied by this user
    pub user_id: Option<u64>,
    /// Result order
    pub sort: TagSort,
}

/// One saved occurrence of a record in a user's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedData {
    /// List the record was saved to
    pub list_id: u64,
    /// Owner of the saved entry
    pub user_id: u64,
    /// Notes attached when saving (may be empty)
    pub notes: String,
}

/// Gateway to the store holding user data about records.
///
/// All lookups are keyed by [`ResourceKey`]. Implementations decide how to
/// enforce deadlines or cancellation; the core adds no retries.
pub trait Storage: fmt::Debug + Send + Sync {
    /// Comments attached to a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn comments_for_resource(&self, key: &ResourceKey) -> Result<Vec<Comment>>;

    /// Tags applied to a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn tags_for_resource(&self, key: &ResourceKey, query: &TagQuery) -> Result<Vec<TagCount>>;

    /// Look up the resource for `key`, creating it when `create` is set.
    ///
    /// When creating, `driver` may be used to capture descriptive data such as
    /// the title.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried or written.
    fn find_resource(
        &self,
        key: &ResourceKey,
        create: bool,
        driver: Option<&dyn RecordDriver>,
    ) -> Result<Option<Resource>>;

    /// Apply a tag to a resource on behalf of `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn add_tag(&self, resource: &Resource, tag: &str, user: &User) -> Result<()>;

    /// Create and persist a new list owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn create_list(&self, user: &User, title: &str) -> Result<UserList>;

    /// Load an existing list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list does not exist or the store fails.
    fn existing_list(&self, list_id: u64) -> Result<UserList>;

    /// Record `list` as the user's most recently used list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remember_last_used(&self, list: &UserList) -> Result<()>;

    /// Save `resource` into `list` for `user` with tags and notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save_resource(
        &self,
        user: &User,
        resource: &Resource,
        list: &UserList,
        tags: &[String],
        notes: &str,
    ) -> Result<()>;

    /// Saved entries for a record, optionally narrowed to one list and user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn saved_data(
        &self,
        key: &ResourceKey,
        list_id: Option<u64>,
        user_id: Option<u64>,
    ) -> Result<Vec<SavedData>>;

    /// Lists containing a record, optionally narrowed to one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn lists_containing_resource(
        &self,
        key: &ResourceKey,
        user_id: Option<u64>,
    ) -> Result<Vec<UserList>>;
}
