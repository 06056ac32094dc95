//! Alphabetic browse orchestration.
//!
//! Walks a precomputed, alphabetically sorted heading index one page at a time.
//! A request names a browse source (`author`, `title`, ...), the heading to
//! start from and a page number relative to that heading. The orchestration
//! adds two things on top of the raw engine call:
//!
//! - if the requested page comes back empty it retries exactly once with the
//!   previous page, to recover from paging past the end of the index;
//! - it works out whether "next" and "previous" links make sense.
//!
//! # Examples
//!
//! ```ignore
//! use findcore::alpha_browse::{AlphaBrowse, BrowseRequest};
//!
//! let browse = AlphaBrowse::new(&backend, &config);
//! let view = browse.browse(&BrowseRequest::new("author", "Smith", 0))?;
//! if let Some(next) = view.next_page {
//!     println!("more headings on page {next}");
//! }
//! ```

use crate::backend::{BrowseResponse, SearchBackend};
use crate::config::Config;
use crate::error::{BackendError, Result, SearchError};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Message returned when the browse index has not been generated.
pub const MISSING_INDEX_MESSAGE: &str = "Alphabetic Browse index missing. See \
     http://vufind.org/wiki/alphabetical_heading_browse for details on generating the index.";

/// Parameters of one browse request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseRequest {
    /// Browse source (e.g. `author`); absent or empty shows the empty form
    pub source: Option<String>,
    /// Heading to start from; absent shows the empty form
    pub from: Option<String>,
    /// Page relative to the matched heading
    pub page: i64,
}

impl BrowseRequest {
    /// A request for `page` of `source` starting at `from`.
    #[must_use]
    pub fn new(source: impl Into<String>, from: impl Into<String>, page: i64) -> Self {
        BrowseRequest {
            source: Some(source.into()),
            from: Some(from.into()),
            page,
        }
    }
}

/// Outcome of a browse request, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseView {
    /// Offered browse sources and their labels
    pub types: IndexMap<String, String>,
    /// Requested source
    pub source: Option<String>,
    /// Requested starting heading
    pub from: Option<String>,
    /// Engine response; `None` when only the empty form is shown
    pub result: Option<BrowseResponse>,
    /// Page to link as "next", if any
    pub next_page: Option<i64>,
    /// Page to link as "previous", if any
    pub prev_page: Option<i64>,
}

impl BrowseView {
    /// True if no browse was run (missing source or starting heading).
    #[must_use]
    pub fn is_empty_form(&self) -> bool {
        self.result.is_none()
    }
}

/// Pages through the alphabetic browse index of a backend.
#[derive(Debug)]
pub struct AlphaBrowse<'a> {
    backend: &'a dyn SearchBackend,
    config: &'a Config,
}

impl<'a> AlphaBrowse<'a> {
    /// Create an orchestrator over `backend` using `config` for page size and
    /// browse types.
    #[must_use]
    pub fn new(backend: &'a dyn SearchBackend, config: &'a Config) -> Self {
        AlphaBrowse { backend, config }
    }

    /// Handle one browse request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingBrowseIndex`] if the backend has no
    /// browse index, [`SearchError::Config`] for an unusable page size, and
    /// any other backend error unchanged as [`SearchError::Backend`].
    pub fn browse(&self, request: &BrowseRequest) -> Result<BrowseView> {
        let types = self.config.alpha_browse_types();
        let limit = self.config.alpha_browse_page_size()?;

        let mut view = BrowseView {
            types,
            source: request.source.clone(),
            from: request.from.clone(),
            result: None,
            next_page: None,
            prev_page: None,
        };

        let (Some(source), Some(from)) = (
            request.source.as_deref().filter(|s| !s.is_empty()),
            request.from.as_deref(),
        ) else {
            return Ok(view);
        };

        let mut page = request.page;
        let mut result = self.fetch(source, from, page, limit)?;
        if result.browse.total_count == 0 {
            // Probably paged past the end of the list; step back once.
            page = page.saturating_sub(1);
            debug!(source, from, page, "empty browse page, retrying previous page");
            result = self.fetch(source, from, page, limit)?;
        }

        let limit = u64::try_from(limit).unwrap_or(u64::MAX);
        if result.browse.total_count > limit {
            view.next_page = Some(page.saturating_add(1));
        }
        if result.browse.offset.saturating_add(result.browse.start_row) > 1 {
            view.prev_page = Some(page.saturating_sub(1));
        }
        view.result = Some(result);
        Ok(view)
    }

    fn fetch(&self, source: &str, from: &str, page: i64, limit: usize) -> Result<BrowseResponse> {
        self.backend
            .alphabetic_browse(source, from, page, limit)
            .map_err(|err| match err {
                BackendError::MissingBrowseIndex(detail) => {
                    warn!(source, %detail, "alphabetic browse index missing");
                    SearchError::MissingBrowseIndex(MISSING_INDEX_MESSAGE.to_string())
                }
                other => SearchError::Backend(other),
            })
    }
}
