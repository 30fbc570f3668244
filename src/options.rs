//! Configuration options for reference extraction.
//!
//! The `Options` struct controls which optional passes run and how
//! sections are classified.

use crate::extractor::DEFAULT_MAX_CLAIM_NODES;

/// Section headings that mark a general-reference section by default.
pub const DEFAULT_GENERAL_REFERENCE_SECTIONS: &[&str] = &[
    "references",
    "further reading",
    "external links",
    "bibliography",
    "works cited",
    "books",
    "articles",
];

/// Configuration options for reference extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_wikirefs::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Skip the claim pass
/// let options = Options {
///     extract_claims: false,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Recover the sentence each footnote supports.
    ///
    /// Default: `true`
    pub extract_claims: bool,

    /// Maximum number of nodes visited by the backward claim scan.
    ///
    /// Default: `12`
    pub max_claim_nodes: usize,

    /// Headings (case-insensitive) whose sections hold general references.
    ///
    /// Default: references, further reading, external links, bibliography,
    /// works cited, books, articles
    pub general_reference_sections: Vec<String>,

    /// Run the cite-ref pass when rendered HTML is supplied.
    ///
    /// Has no effect unless the `citeref` feature is enabled.
    ///
    /// Default: `true`
    pub include_cite_refs: bool,

    /// Drop general references whose trimmed wikitext was already emitted.
    ///
    /// Default: `true`
    pub deduplicate_general: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            extract_claims: true,
            max_claim_nodes: DEFAULT_MAX_CLAIM_NODES,
            general_reference_sections: DEFAULT_GENERAL_REFERENCE_SECTIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            include_cite_refs: true,
            deduplicate_general: true,
        }
    }
}

impl Options {
    /// Whether `heading` names a general-reference section.
    #[must_use]
    pub fn is_general_reference_heading(&self, heading: &str) -> bool {
        let heading = heading.trim().to_lowercase();
        self.general_reference_sections
            .iter()
            .any(|name| name.trim().to_lowercase() == heading)
    }
}
