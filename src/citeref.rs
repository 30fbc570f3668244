//! Reference list of rendered Parsoid HTML.
//!
//! Reads the `ol.references` list of the first `div.mw-references-wrap`
//! and records, for each entry, the back-links into the article and the
//! `data-mw` payload of the reference body.

use dom_query::{Document, Selection};
use tracing::debug;

use crate::result::{CiteRef, PageRef};

/// Every entry of the first rendered reference list in `html`.
///
/// Returns an empty list when the page has no reference list.
///
/// # Example
///
/// ```rust
/// use rs_wikirefs::citeref::extract_cite_refs;
///
/// let html = r##"<div class="mw-references-wrap"><ol class="references">
/// <li id="cite_note-1"><span class="mw-cite-backlink">
/// <a href="#cite_ref-1" id="ref-1"><span class="mw-linkback-text">↑ </span></a></span>
/// <span class="mw-reference-text">A book.</span></li>
/// </ol></div>"##;
/// let refs = extract_cite_refs(html);
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].id.as_deref(), Some("cite_note-1"));
/// assert_eq!(refs[0].page_refs[0].href.as_deref(), Some("#cite_ref-1"));
/// ```
#[must_use]
pub fn extract_cite_refs(html: &str) -> Vec<CiteRef> {
    let doc = Document::from(html);

    let Some(wrapper) = doc.select("div.mw-references-wrap").nodes().first().copied() else {
        debug!("no reference list in html");
        return Vec::new();
    };
    let wrapper = Selection::from(wrapper);
    let Some(list) = wrapper.select("ol.references").nodes().first().copied() else {
        debug!("reference wrapper without an ordered list");
        return Vec::new();
    };
    let list = Selection::from(list);

    let mut refs = Vec::new();
    for (index, node) in list.select("li").nodes().iter().enumerate() {
        let item = Selection::from(*node);
        refs.push(CiteRef {
            id: item.attr("id").map(|s| s.to_string()),
            ref_index: index + 1,
            raw_data: raw_data(&item),
            page_refs: page_refs(&item),
        });
    }

    debug!(cite_refs = refs.len(), "read rendered reference list");
    refs
}

/// Anchors that wrap a `span.mw-linkback-text`.
fn page_refs(item: &Selection) -> Vec<PageRef> {
    item.select("a")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|a| a.select("span.mw-linkback-text").exists())
        .map(|a| PageRef {
            href: a.attr("href").map(|s| s.to_string()),
            id: a.attr("id").map(|s| s.to_string()),
        })
        .collect()
}

/// `data-mw` of the first `link` inside the reference body.
fn raw_data(item: &Selection) -> Option<String> {
    let body = item.select("span.mw-reference-text").nodes().first().copied()?;
    let link = Selection::from(body)
        .select("link")
        .nodes()
        .first()
        .copied()?;
    Selection::from(link).attr("data-mw").map(|s| s.to_string())
}
