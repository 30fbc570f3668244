#![cfg(feature = "citeref")]

use rs_wikirefs::citeref::extract_cite_refs;
use rs_wikirefs::{Options, PageExtractionEngine};

const WIKITEXT: &str = "Rapa Nui has about 7,750 inhabitants.<ref name=\"census\">{{cite web|url=https://resultados.censo2017.cl/}}</ref> Most live in Hanga Roa.<ref name=\"census\"/>";

const HTML: &str = r##"<html><body>
<p>Rapa Nui has about 7,750 inhabitants.<sup about="#mwt1" class="mw-ref reference" id="cite_ref-census_1-0"><a href="./Easter_Island#cite_note-census-1">[1]</a></sup>
Most live in Hanga Roa.<sup class="mw-ref reference" id="cite_ref-census_1-1"><a href="./Easter_Island#cite_note-census-1">[1]</a></sup></p>
<div class="mw-references-wrap"><ol class="mw-references references">
<li about="#cite_note-census-1" id="cite_note-census-1"><span class="mw-cite-backlink"><a href="./Easter_Island#cite_ref-census_1-0" rel="mw:referencedBy"><span class="mw-linkback-text">1 </span></a><a href="./Easter_Island#cite_ref-census_1-1" rel="mw:referencedBy"><span class="mw-linkback-text">2 </span></a></span> <span id="mw-reference-text-cite_note-census-1" class="mw-reference-text"><link rel="mw:PageProp/Category" data-mw='{"parts":[{"template":{"target":{"wt":"cite web"}}}]}'/>Censo 2017</span></li>
</ol></div>
</body></html>"##;

#[test]
fn cite_refs_list_backlinks_per_entry() {
    let refs = extract_cite_refs(HTML);
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].id.as_deref(), Some("cite_note-census-1"));
    let hrefs: Vec<&str> = refs[0]
        .page_refs
        .iter()
        .filter_map(|r| r.href.as_deref())
        .collect();
    assert_eq!(
        hrefs,
        vec![
            "./Easter_Island#cite_ref-census_1-0",
            "./Easter_Island#cite_ref-census_1-1"
        ]
    );
    assert!(refs[0]
        .raw_data
        .as_deref()
        .is_some_and(|data| data.contains("cite web")));
}

#[test]
fn engine_attaches_cite_refs_when_enabled() {
    let engine = PageExtractionEngine::default();
    let page = engine
        .extract_page_with_html(WIKITEXT, HTML)
        .expect("extraction");
    assert_eq!(page.reference_count(), 2);
    assert_eq!(page.cite_refs.len(), 1);

    let json = serde_json::to_value(page.report()).expect("json");
    assert_eq!(json["cite_refs"][0]["ref_index"], 1);
}

#[test]
fn engine_skips_cite_refs_when_disabled() {
    let engine = PageExtractionEngine::new(Options {
        include_cite_refs: false,
        ..Options::default()
    });
    let page = engine
        .extract_page_with_html(WIKITEXT, HTML)
        .expect("extraction");
    assert!(page.cite_refs.is_empty());
}

#[test]
fn html_without_reference_list() {
    let engine = PageExtractionEngine::default();
    let page = engine
        .extract_page_with_html(WIKITEXT, "<html><body><p>No refs</p></body></html>")
        .expect("extraction");
    assert!(page.cite_refs.is_empty());
    assert_eq!(page.reference_count(), 2);
}
