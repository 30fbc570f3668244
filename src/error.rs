//! Error types for rs-wikirefs.
//!
//! Extraction is advisory almost everywhere: malformed URLs become a
//! `MalformedReason` on the URL value and unnamed templates are dropped.
//! Only a missing input surfaces to the caller.

/// Error type for extraction operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No wikitext was supplied (empty or whitespace-only input).
    #[error("No wikitext supplied")]
    MissingInput,

    /// A URL string could not be parsed by the URL library.
    ///
    /// Never returned from the public API; the classifier downgrades it
    /// to a malformed marker.
    #[error("Unparseable URL: {0}")]
    UnparseableUrl(String),

    /// A template node had no usable name.
    #[error("Unparseable template: {0}")]
    UnparseableTemplate(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
