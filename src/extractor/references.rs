//! Reference extraction for one section.
//!
//! Three passes over the section's nodes. The `ExtractionState` is owned
//! by the caller and shared by every section of a page:
//!
//! 1. Footnotes: `<ref>` tags and `{{sfn}}` templates, at the top level
//!    (with a claim) and nested inside other tags or templates.
//! 2. General references: list items with URLs, and in general-reference
//!    sections every list item plus plain lines holding a citation
//!    template or a URL.
//! 3. Loose external links whose URL no earlier reference recorded,
//!    including links inside template parameters.

use std::slice;

use tracing::{debug, trace};

use crate::options::Options;
use crate::patterns::BARE_URL;
use crate::result::{FootnoteSubtype, Reference, ReferenceKind};
use crate::section::Section;
use crate::template::{Template, TemplateParser};
use crate::url_utils::{UrlClassifier, WikiUrl};
use crate::wikitext::{self, TagNode, WikiNode};

use super::claim;
use super::list_items::Residual;
use super::state::ExtractionState;

/// True for nodes that are citation units on their own: `<ref>` tags and
/// `{{sfn}}` templates.
pub(crate) fn is_footnote_marker(node: &WikiNode) -> bool {
    match node {
        WikiNode::Tag(tag) => tag.name == "ref",
        WikiNode::Template(template) => template.name_matches("sfn"),
        _ => false,
    }
}

/// Extracts references from sections.
pub struct ReferenceExtractor<'a> {
    options: &'a Options,
    classifier: &'a UrlClassifier,
}

impl<'a> ReferenceExtractor<'a> {
    #[must_use]
    pub fn new(options: &'a Options, classifier: &'a UrlClassifier) -> Self {
        Self {
            options,
            classifier,
        }
    }

    /// All references of `section`: footnotes, then general references,
    /// then loose external links.
    ///
    /// `state` carries what earlier sections of the same page emitted, so
    /// duplicates and already recorded URLs are skipped page-wide.
    #[must_use]
    pub fn extract(&self, section: &Section, state: &mut ExtractionState) -> Vec<Reference> {
        let mut references = Vec::new();

        self.collect_footnotes(&section.nodes, true, section, state, &mut references);
        let footnotes = references.len();

        self.collect_general_lines(section, state, &mut references);
        self.collect_loose_links(section, state, &mut references);

        debug!(
            section = %section.title,
            footnotes,
            general = references.len() - footnotes,
            recorded_urls = state.recorded_url_count(),
            "extracted references"
        );
        references
    }

    fn collect_footnotes(
        &self,
        nodes: &[WikiNode],
        top_level: bool,
        section: &Section,
        state: &mut ExtractionState,
        out: &mut Vec<Reference>,
    ) {
        for (index, node) in nodes.iter().enumerate() {
            let claim = || {
                (top_level && self.options.extract_claims)
                    .then(|| claim::resolve(index, nodes, self.options.max_claim_nodes))
                    .flatten()
            };
            match node {
                WikiNode::Tag(tag) if tag.name == "ref" => {
                    let mut reference = self.footnote_from_ref(tag, node, section);
                    reference.claim = claim();
                    emit(reference, state, out);
                }
                WikiNode::Template(template) if template.name_matches("sfn") => {
                    let mut reference = self.build(
                        ReferenceKind::Footnote,
                        Some(FootnoteSubtype::Content),
                        section,
                        template.raw.clone(),
                        slice::from_ref(node),
                    );
                    reference.claim = claim();
                    emit(reference, state, out);
                }
                WikiNode::Tag(tag) => {
                    self.collect_footnotes(&tag.contents, false, section, state, out);
                }
                WikiNode::Template(template) => {
                    for param in &template.params {
                        self.collect_footnotes(&param.nodes, false, section, state, out);
                    }
                }
                WikiNode::Text(_)
                | WikiNode::Wikilink(_)
                | WikiNode::ExternalLink(_)
                | WikiNode::Heading(_)
                | WikiNode::Comment(_)
                | WikiNode::Entity(_) => {}
            }
        }
    }

    fn footnote_from_ref(&self, tag: &TagNode, node: &WikiNode, section: &Section) -> Reference {
        let name = tag
            .attribute("name")
            .map(|n| n.trim().trim_end_matches(['/', '\\']).trim().to_string())
            .filter(|n| !n.is_empty());

        let mut reference = if tag.is_empty() {
            Reference::new(
                ReferenceKind::Footnote,
                Some(FootnoteSubtype::Named),
                &section.title,
                tag.raw.clone(),
            )
        } else {
            self.build(
                ReferenceKind::Footnote,
                Some(FootnoteSubtype::Content),
                section,
                tag.raw.clone(),
                slice::from_ref(node),
            )
        };
        reference.name = name;
        reference
    }

    fn collect_general_lines(
        &self,
        section: &Section,
        state: &mut ExtractionState,
        out: &mut Vec<Reference>,
    ) {
        let general = section.is_general_reference_section;
        let residual = Residual::from_nodes(&section.nodes);
        for candidate in residual.candidates(general) {
            let wikitext = candidate.wikitext.trim_end().to_string();
            if self.options.deduplicate_general && state.is_seen(&wikitext) {
                trace!(section = %section.title, line = %wikitext, "duplicate general reference");
                continue;
            }
            let nodes = wikitext::parse(&wikitext);
            let reference = self.build(ReferenceKind::General, None, section, wikitext, &nodes);
            let keep = if candidate.is_list_item {
                general || !reference.urls.is_empty()
            } else {
                !reference.urls.is_empty() || reference.templates.iter().any(is_citation_template)
            };
            if keep {
                emit(reference, state, out);
            }
        }
    }

    fn collect_loose_links(
        &self,
        section: &Section,
        state: &mut ExtractionState,
        out: &mut Vec<Reference>,
    ) {
        let mut links = Vec::new();
        loose_links(&section.nodes, &mut links);
        for node in links {
            let WikiNode::ExternalLink(link) = node else {
                continue;
            };
            let url = self.classifier.classify(&link.url);
            if state.has_url(&url) || state.is_seen(&link.raw) {
                continue;
            }
            let reference = self.build(
                ReferenceKind::General,
                None,
                section,
                link.raw.clone(),
                slice::from_ref(node),
            );
            emit(reference, state, out);
        }
    }

    /// A reference with templates and URLs taken from `nodes`. General
    /// references do not look inside footnotes they happen to contain.
    fn build(
        &self,
        kind: ReferenceKind,
        subtype: Option<FootnoteSubtype>,
        section: &Section,
        raw_wikitext: String,
        nodes: &[WikiNode],
    ) -> Reference {
        let mut reference = Reference::new(kind, subtype, &section.title, raw_wikitext);
        let mut visible = Vec::new();
        match kind {
            ReferenceKind::Footnote => wikitext::walk(nodes, &mut |node| visible.push(node)),
            ReferenceKind::General => outside_footnotes(nodes, &mut visible),
        }
        reference.templates = parse_templates(&visible);
        reference.urls = self.urls(&reference.templates, &visible);
        reference
    }

    /// Union of template URLs, wikicoded links and bare URLs in text.
    fn urls(&self, templates: &[Template], nodes: &[&WikiNode]) -> Vec<WikiUrl> {
        let mut urls: Vec<WikiUrl> = Vec::new();
        let mut push = |url: WikiUrl| {
            if !urls.contains(&url) {
                urls.push(url);
            }
        };

        for template in templates {
            for url in template.urls(self.classifier) {
                push(url);
            }
        }
        for node in nodes {
            if let WikiNode::ExternalLink(link) = node {
                push(self.classifier.classify(&link.url));
            }
        }
        // Free links are already nodes, so this only finds what the parser
        // could not turn into a link.
        for node in nodes {
            if let WikiNode::Text(text) = node {
                for found in BARE_URL.find_iter(text) {
                    push(self.classifier.classify(found.as_str()));
                }
            }
        }
        urls
    }
}

fn emit(reference: Reference, state: &mut ExtractionState, out: &mut Vec<Reference>) {
    state.mark_wikitext(&reference.raw_wikitext);
    state.record_urls(&reference.urls);
    out.push(reference);
}

/// Parsed templates among `nodes`, parser functions skipped.
fn parse_templates(nodes: &[&WikiNode]) -> Vec<Template> {
    nodes
        .iter()
        .filter_map(|node| match node {
            WikiNode::Template(template) => Some(template),
            _ => None,
        })
        .filter(|template| !template.name.trim_start().starts_with('#'))
        .filter_map(|template| match TemplateParser::parse(template) {
            Ok(template) => Some(template),
            Err(err) => {
                debug!(%err, "dropping template");
                None
            }
        })
        .collect()
}

/// `cite ...` and `citation` templates.
fn is_citation_template(template: &Template) -> bool {
    template.name == "citation" || template.name.starts_with("cite ") || template.name == "cite"
}

/// Every node at any depth, skipping footnote markers and their contents.
fn outside_footnotes<'n>(nodes: &'n [WikiNode], out: &mut Vec<&'n WikiNode>) {
    for node in nodes {
        if is_footnote_marker(node) {
            continue;
        }
        out.push(node);
        match node {
            WikiNode::Tag(tag) => outside_footnotes(&tag.contents, out),
            WikiNode::Template(template) => {
                for param in &template.params {
                    outside_footnotes(&param.nodes, out);
                }
            }
            WikiNode::Text(_)
            | WikiNode::Wikilink(_)
            | WikiNode::ExternalLink(_)
            | WikiNode::Heading(_)
            | WikiNode::Comment(_)
            | WikiNode::Entity(_) => {}
        }
    }
}

/// External links at any depth outside footnote markers: top level,
/// inside other tags and inside template parameters.
fn loose_links<'n>(nodes: &'n [WikiNode], out: &mut Vec<&'n WikiNode>) {
    for node in nodes {
        if is_footnote_marker(node) {
            continue;
        }
        match node {
            WikiNode::ExternalLink(_) => out.push(node),
            WikiNode::Tag(tag) => loose_links(&tag.contents, out),
            WikiNode::Template(template) => {
                for param in &template.params {
                    loose_links(&param.nodes, out);
                }
            }
            WikiNode::Text(_)
            | WikiNode::Wikilink(_)
            | WikiNode::Heading(_)
            | WikiNode::Comment(_)
            | WikiNode::Entity(_) => {}
        }
    }
}
