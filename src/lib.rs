#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # findcore: search and discovery core
//!
//! The domain core of a library discovery system: the data model and
//! orchestration between a search engine, record metadata and user data.
//!
//! ## Quick Start
//!
//! ### Building a query
//!
//! ```
//! use findcore::{Query, QueryGroup, QueryNode};
//!
//! # fn main() -> findcore::Result<()> {
//! let mut group = QueryGroup::new("AND", vec![], None)?;
//! group.add_query(Query::new("whales", Some("Title")));
//! group.add_query(Query::new("melville", Some("Author")));
//! group.set_operator("NOT")?;
//!
//! assert!(group.is_negated());
//! assert_eq!(QueryNode::from(group).leaves().len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ### Wrapping a search response
//!
//! ```ignore
//! use findcore::{DriverContext, RecordCollectionFactory, RecordDriverFactory};
//! use std::sync::Arc;
//!
//! let drivers = Arc::new(RecordDriverFactory::new(Arc::new(DriverContext::default())));
//! let factory = RecordCollectionFactory::with_drivers(drivers);
//! let records = factory.build(solr_response)?;
//!
//! println!("{} of {} hits", records.count(), records.total());
//! for (position, record) in &records {
//!     println!("{position}: {}", record.breadcrumb());
//! }
//! ```
//!
//! ### Browsing headings
//!
//! ```ignore
//! use findcore::{AlphaBrowse, BrowseRequest, Config};
//!
//! let config = Config::from_path("config.json")?;
//! let view = AlphaBrowse::new(&backend, &config)
//!     .browse(&BrowseRequest::new("author", "Melville", 0))?;
//! ```
//!
//! ## Modules
//!
//! - [`query`]: Search queries and boolean query groups
//! - [`record_collection`]: Paged search results with facets
//! - [`facets`]: Facet count parsing
//! - [`record_driver`]: The record driver contract and shared context
//! - [`default_driver`]: Schema-driven default record
//! - [`missing_driver`]: Placeholder for records gone from the index
//! - [`driver_factory`]: Construction of record drivers
//! - [`capability`]: Named capability checks on drivers
//! - [`related`]: Related-record plugins
//! - [`alpha_browse`]: Alphabetic heading browse
//! - [`backend`]: Search engine client contract
//! - [`storage`]: User data gateway contract
//! - [`translator`]: Message translation
//! - [`tags`]: User tag parsing
//! - [`import`]: Import-time helpers
//! - [`config`]: Layered configuration
//! - [`error`]: Error types and result type

pub mod alpha_browse;
pub mod backend;
pub mod capability;
pub mod config;
pub mod default_driver;
pub mod driver_factory;
pub mod error;
pub mod facets;
pub mod import;
pub mod missing_driver;
pub mod query;
pub mod record_collection;
pub mod record_driver;
pub mod related;
pub mod storage;
pub mod tags;
pub mod translator;

pub use alpha_browse::{AlphaBrowse, BrowseRequest, BrowseView};
pub use backend::{BrowseItem, BrowsePage, BrowseResponse, SearchBackend, SearchService};
pub use capability::Capability;
pub use config::Config;
pub use default_driver::DefaultRecord;
pub use driver_factory::{DriverKind, RecordDriverFactory};
pub use error::{BackendError, Result, SearchError};
pub use facets::{FacetCount, Facets};
pub use import::{ChangeRow, ChangeTracker, TranslationMap};
pub use missing_driver::MissingRecord;
pub use query::{BooleanOperator, Query, QueryGroup, QueryNode};
pub use record_collection::{RecordCollection, RecordCollectionFactory};
pub use record_driver::{DriverContext, DriverCore, FavoriteParams, RecordDriver, RecordRef};
pub use related::{RelatedPlugin, RelatedPluginManager};
pub use storage::{
    Comment, Resource, ResourceKey, SavedData, Storage, TagCount, TagQuery, TagSort, User,
    UserList,
};
pub use translator::{MapTranslator, Translator};
