//! Extraction state tracking.
//!
//! `ExtractionState` remembers what a page's extraction has already
//! emitted so later passes and sections do not count the same citation
//! twice.

use std::collections::HashSet;

use crate::url_utils::WikiUrl;

/// Tracks emitted wikitext and recorded URLs for one page.
///
/// # Purpose
///
/// - **Seen wikitext**: trimmed wikitext of every emitted reference, used to
///   drop duplicate general references
/// - **Recorded URLs**: effective URLs of every emitted reference, used to
///   skip external links already covered by a reference
#[derive(Debug, Default)]
pub struct ExtractionState {
    seen_wikitext: HashSet<String>,
    recorded_urls: HashSet<String>,
}

impl ExtractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a reference's wikitext. Returns false if it was already seen.
    pub fn mark_wikitext(&mut self, wikitext: &str) -> bool {
        self.seen_wikitext.insert(wikitext.trim().to_string())
    }

    #[must_use]
    pub fn is_seen(&self, wikitext: &str) -> bool {
        self.seen_wikitext.contains(wikitext.trim())
    }

    /// Record the effective form of each URL.
    pub fn record_urls(&mut self, urls: &[WikiUrl]) {
        for url in urls {
            self.recorded_urls.insert(url.effective().to_string());
        }
    }

    #[must_use]
    pub fn has_url(&self, url: &WikiUrl) -> bool {
        self.recorded_urls.contains(url.effective())
    }

    #[must_use]
    pub fn recorded_url_count(&self) -> usize {
        self.recorded_urls.len()
    }
}
