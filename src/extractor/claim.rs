//! Recovering the sentence a footnote supports.
//!
//! Best effort: the scan walks backwards from the footnote and stops at
//! the first node whose text contains a sentence or line break. An
//! abbreviation such as "Mr. " ends the scan early and the claim then
//! starts after it.

use crate::patterns::{CLAIM_BOUNDARY, SENTENCE_SPLIT};
use crate::wikitext::{strip_code, WikiNode};

use super::references::is_footnote_marker;

/// Default number of nodes visited before giving up.
pub const DEFAULT_MAX_CLAIM_NODES: usize = 12;

/// Resolve the claim for the footnote at `index` in `nodes`.
///
/// Visits at most `max_nodes` nodes before `index`, prepending each node's
/// text, then returns the last sentence of what was collected, trimmed.
#[must_use]
pub fn resolve(index: usize, nodes: &[WikiNode], max_nodes: usize) -> Option<String> {
    let end = index.min(nodes.len());
    let mut claim = String::new();
    for node in nodes[..end].iter().rev().take(max_nodes) {
        let text = contribution(node);
        claim.insert_str(0, &text);
        if CLAIM_BOUNDARY.is_match(&text) {
            break;
        }
    }
    let last = SENTENCE_SPLIT.split(&claim).last().unwrap_or_default().trim();
    (!last.is_empty()).then(|| last.to_string())
}

/// Text a node adds to the claim. Neighbouring footnote markers add
/// nothing so stacked citations share one claim.
fn contribution(node: &WikiNode) -> String {
    if is_footnote_marker(node) {
        return String::new();
    }
    match node {
        WikiNode::Text(text) => text.clone(),
        WikiNode::Tag(tag) => strip_code(&tag.contents),
        WikiNode::Wikilink(link) => link.text.clone().unwrap_or_else(|| link.title.clone()),
        WikiNode::Entity(entity) => entity.rendered.clone(),
        WikiNode::Template(_)
        | WikiNode::ExternalLink(_)
        | WikiNode::Heading(_)
        | WikiNode::Comment(_) => node.to_string(),
    }
}
