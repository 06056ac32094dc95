//! Optional-capability probing for record drivers.
//!
//! Renderers often want "this value if the record has it, nothing otherwise".
//! Instead of looking methods up by name at runtime, the optional behaviors
//! form the closed [`Capability`] set. A driver answers the capabilities it
//! supports through [`RecordDriver::capability`] and returns `None` for the
//! rest; [`RecordDriver::try_method`] adds name parsing on top.
//!
//! # Examples
//!
//! ```ignore
//! use findcore::{Capability, RecordDriver};
//!
//! if let Some(title) = driver.try_method("title", &[]) {
//!     println!("{title}");
//! }
//! let active = driver.capability(Capability::OpenUrlActive, &[json!("record")]);
//! ```

use crate::error::SearchError;
use crate::record_driver::RecordDriver;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// A behavior a record driver may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Unique record ID
    UniqueId,
    /// Short text for breadcrumbs
    Breadcrumb,
    /// Article-stripped, lower-cased sort title
    SortTitle,
    /// Raw field data
    RawData,
    /// Source tag of the record
    ResourceSource,
    /// Supported citation formats
    CitationFormats,
    /// Whether status can be loaded asynchronously
    SupportsAjaxStatus,
    /// Whether OpenURL links replace other URLs
    ReplaceUrlsWithOpenUrl,
    /// Whether OpenURL is active in an area (argument: area name)
    OpenUrlActive,
    /// An extra detail (argument: key)
    ExtraDetail,
    /// Full title
    Title,
    /// Short title
    ShortTitle,
    /// Subtitle
    Subtitle,
    /// Main author
    PrimaryAuthor,
    /// Format labels
    Formats,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 15] = [
        Self::UniqueId,
        Self::Breadcrumb,
        Self::SortTitle,
        Self::RawData,
        Self::ResourceSource,
        Self::CitationFormats,
        Self::SupportsAjaxStatus,
        Self::ReplaceUrlsWithOpenUrl,
        Self::OpenUrlActive,
        Self::ExtraDetail,
        Self::Title,
        Self::ShortTitle,
        Self::Subtitle,
        Self::PrimaryAuthor,
        Self::Formats,
    ];

    /// Lookup name of the capability.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UniqueId => "unique_id",
            Self::Breadcrumb => "breadcrumb",
            Self::SortTitle => "sort_title",
            Self::RawData => "raw_data",
            Self::ResourceSource => "resource_source",
            Self::CitationFormats => "citation_formats",
            Self::SupportsAjaxStatus => "supports_ajax_status",
            Self::ReplaceUrlsWithOpenUrl => "replace_urls_with_open_url",
            Self::OpenUrlActive => "open_url_active",
            Self::ExtraDetail => "extra_detail",
            Self::Title => "title",
            Self::ShortTitle => "short_title",
            Self::Subtitle => "subtitle",
            Self::PrimaryAuthor => "primary_author",
            Self::Formats => "formats",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|cap| cap.name() == s)
            .ok_or_else(|| SearchError::InvalidArgument(format!("unknown capability: {s}")))
    }
}

/// Answer the capabilities every driver supports through the base contract.
///
/// Schema-specific capabilities (titles, authors, formats) return `None` here;
/// drivers that know them answer before falling back to this function.
#[must_use]
pub fn base_capability(
    driver: &dyn RecordDriver,
    capability: Capability,
    args: &[Value],
) -> Option<Value> {
    let first_arg = || args.first().and_then(Value::as_str);
    match capability {
        Capability::UniqueId => driver.unique_id().ok().map(Value::from),
        Capability::Breadcrumb => Some(driver.breadcrumb().into()),
        Capability::SortTitle => Some(driver.sort_title().into()),
        Capability::RawData => Some(driver.raw_data().clone()),
        Capability::ResourceSource => Some(driver.resource_source().into()),
        Capability::CitationFormats => Some(json!(driver.citation_formats())),
        Capability::SupportsAjaxStatus => Some(driver.supports_ajax_status().into()),
        Capability::ReplaceUrlsWithOpenUrl => Some(driver.replace_urls_with_open_url().into()),
        Capability::OpenUrlActive => first_arg().map(|area| driver.open_url_active(area).into()),
        Capability::ExtraDetail => first_arg().and_then(|key| driver.extra_detail(key).cloned()),
        Capability::Title
        | Capability::ShortTitle
        | Capability::Subtitle
        | Capability::PrimaryAuthor
        | Capability::Formats => None,
    }
}
