//! Whole-page extraction.
//!
//! `PageExtractionEngine` runs the section splitter and the reference
//! extractor over an article and aggregates URL statistics.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::extractor::{ExtractionState, ReferenceExtractor};
use crate::options::Options;
use crate::result::PageExtraction;
use crate::section::SectionSplitter;
use crate::url_utils::{UrlClassifier, WikiUrl};

/// Extracts references from whole articles.
///
/// The engine owns its options and URL classifier and holds no per-page
/// state, so one engine can serve any number of pages.
#[derive(Debug, Clone, Default)]
pub struct PageExtractionEngine {
    options: Options,
    classifier: UrlClassifier,
}

impl PageExtractionEngine {
    /// Engine with the builtin public-suffix data.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_classifier(options, UrlClassifier::default())
    }

    /// Engine with a caller-supplied classifier, e.g. one built from a
    /// newer copy of the public-suffix list.
    #[must_use]
    pub fn with_classifier(options: Options, classifier: UrlClassifier) -> Self {
        Self {
            options,
            classifier,
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn classifier(&self) -> &UrlClassifier {
        &self.classifier
    }

    /// Split `wikitext` into sections and extract every reference.
    ///
    /// Returns `Error::MissingInput` for empty or whitespace-only input.
    pub fn extract_page(&self, wikitext: &str) -> Result<PageExtraction> {
        if wikitext.trim().is_empty() {
            return Err(Error::MissingInput);
        }

        let sections = SectionSplitter::new(&self.options).split(wikitext);
        let extractor = ReferenceExtractor::new(&self.options, &self.classifier);
        let mut state = ExtractionState::new();
        let references: Vec<_> = sections
            .iter()
            .flat_map(|section| extractor.extract(section, &mut state))
            .collect();

        let urls: Vec<WikiUrl> = references
            .iter()
            .flat_map(|reference| reference.urls.iter().cloned())
            .collect();
        let first_level_domain_counts = count_first_level_domains(&urls);

        debug!(
            sections = sections.len(),
            references = references.len(),
            urls = urls.len(),
            domains = first_level_domain_counts.len(),
            "page extracted"
        );

        Ok(PageExtraction {
            sections,
            references,
            urls,
            first_level_domain_counts,
            cite_refs: Vec::new(),
        })
    }

    /// Like [`extract_page`](Self::extract_page), then read the rendered
    /// reference list from `html` when `include_cite_refs` is set.
    #[cfg(feature = "citeref")]
    pub fn extract_page_with_html(&self, wikitext: &str, html: &str) -> Result<PageExtraction> {
        let mut extraction = self.extract_page(wikitext)?;
        if self.options.include_cite_refs {
            extraction.cite_refs = crate::citeref::extract_cite_refs(html);
        }
        Ok(extraction)
    }
}

/// Frequency of each first-level domain, most frequent first, ties in
/// lexical order. URLs without a domain are skipped.
fn count_first_level_domains(urls: &[WikiUrl]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for domain in urls.iter().filter_map(|u| u.first_level_domain.as_deref()) {
        *counts.entry(domain).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(domain, count)| (domain.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
