//! Error types for search core operations.
//!
//! This module provides the [`SearchError`] type for all library operations,
//! the [`BackendError`] type reported by search engine clients, and the
//! [`Result`] convenience type.

use thiserror::Error;

/// Error type reported by a search engine client.
///
/// Backend errors travel through the core unchanged (wrapped in
/// [`SearchError::Backend`]) except for [`BackendError::MissingBrowseIndex`],
/// which alphabetic browse turns into an actionable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The engine has no alphabetic browse index for the requested source.
    #[error("Browse index missing: {0}")]
    MissingBrowseIndex(String),

    /// The engine answered with an HTTP error status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code returned by the engine
        status: u16,
        /// Error body or reason phrase
        message: String,
    },

    /// Any other engine failure (connection refused, malformed body, ...).
    #[error("Backend failure: {0}")]
    Other(String),
}

impl BackendError {
    /// Classify an engine error response.
    ///
    /// Solr reports a missing browse index as a server error whose body names
    /// the browse index; every other error status becomes [`BackendError::Http`].
    ///
    /// # Examples
    ///
    /// ```
    /// use findcore::BackendError;
    ///
    /// let err = BackendError::from_response(500, "couldn't find a browse index");
    /// assert!(err.is_missing_browse_index());
    ///
    /// let err = BackendError::from_response(404, "not found");
    /// assert!(!err.is_missing_browse_index());
    /// ```
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let lower = body.to_lowercase();
        if lower.contains("couldn't find a browse index")
            || lower.contains("browse index does not exist")
        {
            BackendError::MissingBrowseIndex(body.to_string())
        } else {
            BackendError::Http {
                status,
                message: body.to_string(),
            }
        }
    }

    /// Whether this error signals a missing alphabetic browse index.
    #[must_use]
    pub fn is_missing_browse_index(&self) -> bool {
        matches!(self, BackendError::MissingBrowseIndex(_))
    }
}

/// Error type for all search core operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A caller supplied an invalid argument (e.g. unknown boolean operator).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation needs a logged-in user.
    #[error("Login required: {0}")]
    LoginRequired(String),

    /// A related-record plugin name could not be resolved.
    #[error("Related module {0} does not exist.")]
    UnknownPluginType(String),

    /// The alphabetic browse index has not been generated.
    #[error("{0}")]
    MissingBrowseIndex(String),

    /// Failure reported by the search engine, propagated unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Failure reported by the storage gateway.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A record is missing data the driver requires.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A collaborator the operation needs was not wired into the driver.
    #[error("Service not available: {0}")]
    MissingService(&'static str),

    /// Configuration could not be loaded or holds an unusable value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration or translation maps.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error while deserializing configuration or responses.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`SearchError`].
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_classification() {
        let missing = BackendError::from_response(
            500,
            "java.lang.RuntimeException: couldn't find a browse index for author",
        );
        assert!(missing.is_missing_browse_index());

        let generic = BackendError::from_response(503, "Service Unavailable");
        assert_eq!(
            generic,
            BackendError::Http {
                status: 503,
                message: "Service Unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_backend_error_propagates_transparently() {
        let err: SearchError = BackendError::Other("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "Backend failure: connection refused");
        assert!(matches!(err, SearchError::Backend(BackendError::Other(_))));
    }

    #[test]
    fn test_unknown_plugin_message() {
        let err = SearchError::UnknownPluginType("Bogus".to_string());
        assert_eq!(err.to_string(), "Related module Bogus does not exist.");
    }
}
