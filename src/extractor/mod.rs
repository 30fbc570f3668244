//! Per-section reference extraction.
//!
//! # Module Structure
//!
//! - `references`: footnote, general-line and loose-link passes
//! - `claim`: backward scan recovering the sentence a footnote supports
//! - `list_items`: line candidates for general references
//! - `state`: what earlier passes and sections have already emitted
//!
//! # Usage
//!
//! ```rust
//! use rs_wikirefs::extractor::{ExtractionState, ReferenceExtractor};
//! use rs_wikirefs::section::SectionSplitter;
//! use rs_wikirefs::url_utils::UrlClassifier;
//! use rs_wikirefs::Options;
//!
//! let options = Options::default();
//! let classifier = UrlClassifier::default();
//! let extractor = ReferenceExtractor::new(&options, &classifier);
//!
//! let sections = SectionSplitter::new(&options).split("Moai.<ref>Source</ref>");
//! let mut state = ExtractionState::new();
//! let references = extractor.extract(&sections[0], &mut state);
//! assert_eq!(references.len(), 1);
//! assert_eq!(references[0].claim.as_deref(), Some("Moai."));
//! ```

pub mod claim;
pub mod list_items;
pub mod references;
pub mod state;

pub use claim::DEFAULT_MAX_CLAIM_NODES;
pub use list_items::{LineCandidate, Residual};
pub use references::ReferenceExtractor;
pub use state::ExtractionState;
