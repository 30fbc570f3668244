//! Splitting an article into its lead and level-2 sections.

use tracing::debug;

use crate::options::Options;
use crate::patterns::{HTML_COMMENT, LEVEL2_HEADING};
use crate::wikitext::{self, WikiNode};

/// Title given to the lead section.
pub const ROOT_SECTION_TITLE: &str = "root";

/// One section of an article.
///
/// The lead section has level 0 and the title `"root"`; every other
/// section starts at a level-2 heading and keeps that heading line as the
/// first line of its wikitext.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub level: usize,
    pub wikitext: String,
    pub nodes: Vec<WikiNode>,
    pub is_general_reference_section: bool,
}

impl Section {
    fn new(title: String, level: usize, wikitext: &str, options: &Options) -> Self {
        let is_general_reference_section = options.is_general_reference_heading(&title);
        Self {
            title,
            level,
            wikitext: wikitext.to_string(),
            nodes: wikitext::parse(wikitext),
            is_general_reference_section,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

/// Partitions wikitext into sections.
pub struct SectionSplitter<'a> {
    options: &'a Options,
}

impl<'a> SectionSplitter<'a> {
    #[must_use]
    pub fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// Split `wikitext` on level-2 heading lines.
    ///
    /// Without any level-2 heading the whole document is the root section.
    /// Otherwise the root section holds the lines before the first heading
    /// and is left out when those lines are blank.
    #[must_use]
    pub fn split(&self, wikitext: &str) -> Vec<Section> {
        let headings = level2_headings(wikitext);
        let Some(&(first_offset, _)) = headings.first() else {
            debug!("no level 2 headings, whole document is the root section");
            return vec![Section::new(
                ROOT_SECTION_TITLE.to_string(),
                0,
                wikitext,
                self.options,
            )];
        };

        let mut sections = Vec::with_capacity(headings.len() + 1);
        let lead = &wikitext[..first_offset];
        if lead.trim().is_empty() {
            debug!("document starts with a level 2 heading, no root section");
        } else {
            sections.push(Section::new(
                ROOT_SECTION_TITLE.to_string(),
                0,
                lead,
                self.options,
            ));
        }

        for (i, (offset, title)) in headings.iter().enumerate() {
            let end = headings.get(i + 1).map_or(wikitext.len(), |(next, _)| *next);
            sections.push(Section::new(
                title.clone(),
                2,
                &wikitext[*offset..end],
                self.options,
            ));
        }

        debug!(
            sections = sections.len(),
            general = sections
                .iter()
                .filter(|s| s.is_general_reference_section)
                .count(),
            "split sections"
        );
        sections
    }
}

/// Byte offset and cleaned title of every level-2 heading line.
fn level2_headings(wikitext: &str) -> Vec<(usize, String)> {
    let mut headings = Vec::new();
    let mut offset = 0;
    for line in wikitext.split_inclusive('\n') {
        if let Some(title) = level2_title(line.trim_end_matches(['\n', '\r'])) {
            headings.push((offset, title));
        }
        offset += line.len();
    }
    headings
}

/// Title of a level-2 heading line. Comments anywhere on the line are
/// ignored, and so is an unterminated one at its end.
fn level2_title(line: &str) -> Option<String> {
    if !line.starts_with("==") || line.starts_with("===") {
        return None;
    }
    let mut cleaned = HTML_COMMENT.replace_all(line, "").into_owned();
    if let Some(open) = cleaned.find("<!--") {
        cleaned.truncate(open);
    }
    let caps = LEVEL2_HEADING.captures(cleaned.trim_end())?;
    let title = caps.get(1).map_or("", |m| m.as_str()).trim();
    Some(title.to_string())
}
