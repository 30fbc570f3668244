//! # rs-wikirefs
//!
//! Citation extraction from MediaWiki wikitext.
//!
//! This library finds every reference in a Wikipedia article's source:
//! footnotes (`<ref>` tags and `{{sfn}}` templates) with the sentence they
//! support, and general references listed in bibliography and link
//! sections. Citation templates are parsed into normalized parameter maps
//! and every URL is classified by scheme, host, top-level domain and
//! registrable domain, with Wayback Machine links resolved to their
//! archived target.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_wikirefs::extract_page;
//!
//! let wikitext = "Easter Island is a Chilean island.<ref>{{cite web\
//!     |url=https://www.ine.cl/censo|title=Censo}}</ref>";
//!
//! let page = extract_page(wikitext)?;
//! assert_eq!(page.reference_count(), 1);
//! let reference = &page.references[0];
//! assert_eq!(reference.claim.as_deref(), Some("Easter Island is a Chilean island."));
//! assert_eq!(reference.unique_first_level_domains(), vec!["ine.cl"]);
//! # Ok::<(), rs_wikirefs::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Footnotes**: content and named `<ref>` tags, `{{sfn}}`, nested list-defined refs
//! - **General references**: list items and citation lines in reference sections
//! - **Claims**: best-effort recovery of the sentence before each footnote
//! - **URL classification**: malformation reasons, Wayback targets, first-level domains
//! - **Cite-ref pass** (feature `citeref`): back-links of rendered Parsoid HTML

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// Wikitext node model and parser.
pub mod wikitext;

/// Public suffix list used for first-level domains.
pub mod public_suffix;

/// URL classification.
pub mod url_utils;

/// Citation template parsing and key normalization.
pub mod template;

/// Splitting an article into sections.
pub mod section;

/// Per-section reference extraction (footnotes, general lines, claims).
pub mod extractor;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Reference list of rendered Parsoid HTML.
#[cfg(feature = "citeref")]
pub mod citeref;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::PageExtractionEngine;
pub use options::{Options, DEFAULT_GENERAL_REFERENCE_SECTIONS};
pub use result::{
    reference_id, CiteRef, DomainCounts, FootnoteSubtype, PageExtraction, PageRef, PageReport,
    Reference, ReferenceKind, ReferenceReport,
};
pub use section::Section;
pub use template::{Template, TemplateParser};
pub use url_utils::{MalformedReason, UrlClassifier, WikiUrl};

/// Extracts every reference of an article using default options.
///
/// # Arguments
///
/// * `wikitext` - The article source
///
/// # Returns
///
/// Returns `Ok(PageExtraction)` with sections, references, URLs and
/// domain counts. Returns `Error::MissingInput` if `wikitext` is blank.
///
/// # Example
///
/// ```rust
/// use rs_wikirefs::extract_page;
///
/// let page = extract_page("== External links ==\n* [http://www.aviafrance.com AviaFrance]\n")?;
/// assert_eq!(page.general_count(), 1);
/// assert_eq!(page.first_level_domain_counts, vec![("aviafrance.com".to_string(), 1)]);
/// # Ok::<(), rs_wikirefs::Error>(())
/// ```
pub fn extract_page(wikitext: &str) -> Result<PageExtraction> {
    extract_page_with_options(wikitext, &Options::default())
}

/// Extracts every reference of an article with custom options.
///
/// Builds a fresh `PageExtractionEngine` with the builtin public-suffix
/// data. Keep an engine around instead when extracting many pages.
///
/// # Example
///
/// ```rust
/// use rs_wikirefs::{extract_page_with_options, Options};
///
/// let options = Options {
///     extract_claims: false,
///     ..Options::default()
/// };
/// let page = extract_page_with_options("A fact.<ref>Source</ref>", &options)?;
/// assert_eq!(page.references[0].claim, None);
/// # Ok::<(), rs_wikirefs::Error>(())
/// ```
pub fn extract_page_with_options(wikitext: &str, options: &Options) -> Result<PageExtraction> {
    PageExtractionEngine::new(options.clone()).extract_page(wikitext)
}

/// Extracts every reference from raw bytes.
///
/// A byte order mark selects the encoding; otherwise the bytes are read
/// as UTF-8 with invalid sequences replaced by U+FFFD.
///
/// # Example
///
/// ```rust
/// use rs_wikirefs::extract_page_bytes;
///
/// let page = extract_page_bytes(b"\xEF\xBB\xBFMoai.<ref name=\"m\"/>")?;
/// assert_eq!(page.named_footnote_count(), 1);
/// # Ok::<(), rs_wikirefs::Error>(())
/// ```
pub fn extract_page_bytes(wikitext: &[u8]) -> Result<PageExtraction> {
    extract_page_bytes_with_options(wikitext, &Options::default())
}

/// Combines `extract_page_bytes` and `extract_page_with_options`.
pub fn extract_page_bytes_with_options(
    wikitext: &[u8],
    options: &Options,
) -> Result<PageExtraction> {
    let text = encoding::transcode_to_utf8(wikitext);
    extract_page_with_options(&text, options)
}
