//! Compiled regex patterns shared across the extraction pipeline.
//!
//! All patterns are compiled once on first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// URL Patterns
// =============================================================================

/// Decomposes a Wayback Machine URL into timestamp and archived target.
pub static WAYBACK_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://web\.archive\.org/web/([\d*]+)/(.*)").expect("WAYBACK_URL regex")
});

/// Finds bare URLs in plain text.
///
/// The final character class excludes `.`, `,` and `:` so sentence
/// punctuation after a URL is not swallowed.
pub static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:http|ftp|https)://(?:[\w\-]+(?:(?:\.[\w\-]+)+))(?:[\w\-.,@?^=%&:/~+#]*[\w\-@?^=%&/~+#])?",
    )
    .expect("BARE_URL regex")
});

// =============================================================================
// Comment Patterns
// =============================================================================

/// Text on both sides of a comment. Applied repeatedly; the greedy left
/// group means the last comment is removed first.
pub static PAIRED_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*)<!--.*?-->(.*)$").expect("PAIRED_COMMENT regex")
});

/// A single HTML comment, possibly spanning lines.
pub static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex"));

// =============================================================================
// Section Patterns
// =============================================================================

/// A level-2 heading line with comments removed: `==` on both ends, no
/// third `=` on either side.
pub static LEVEL2_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^==([^=](?:.*[^=])?)==\s*$").expect("LEVEL2_HEADING regex")
});

// =============================================================================
// Claim Patterns
// =============================================================================

/// Sentence boundary seen while walking backwards from a footnote.
pub static CLAIM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\n|\.\s").expect("CLAIM_BOUNDARY regex"));

/// Splits collected claim text into sentences.
pub static SENTENCE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s+").expect("SENTENCE_SPLIT regex"));
