//! Result types for extraction output.
//!
//! `PageExtraction` is what the engine returns. `PageReport` is its flat,
//! serializable form for JSON output.

use md5::{Digest, Md5};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::section::Section;
use crate::template::Template;
use crate::url_utils::WikiUrl;

/// Footnote or general reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `<ref>` tag or `{{sfn}}` template.
    Footnote,
    /// Bibliography line or loose external link.
    General,
}

/// Shape of a footnote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootnoteSubtype {
    /// Reuse of an earlier footnote: `<ref name="x"/>`.
    Named,
    /// Footnote with a body.
    Content,
}

/// One extracted reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// First 8 hex characters of the MD5 of `raw_wikitext`.
    pub reference_id: String,
    pub kind: ReferenceKind,
    /// Set for footnotes only.
    pub footnote_subtype: Option<FootnoteSubtype>,
    /// `name` attribute of the `<ref>` tag.
    pub name: Option<String>,
    /// Title of the owning section.
    pub section: String,
    pub templates: Vec<Template>,
    /// De-duplicated by effective URL, first-seen order.
    pub urls: Vec<WikiUrl>,
    pub claim: Option<String>,
    pub raw_wikitext: String,
}

impl Reference {
    /// Create an empty reference; the id is derived from `raw_wikitext`.
    #[must_use]
    pub fn new(
        kind: ReferenceKind,
        footnote_subtype: Option<FootnoteSubtype>,
        section: &str,
        raw_wikitext: String,
    ) -> Self {
        Self {
            reference_id: reference_id(&raw_wikitext),
            kind,
            footnote_subtype,
            name: None,
            section: section.to_string(),
            templates: Vec::new(),
            urls: Vec::new(),
            claim: None,
            raw_wikitext,
        }
    }

    #[must_use]
    pub fn is_footnote(&self) -> bool {
        self.kind == ReferenceKind::Footnote
    }

    #[must_use]
    pub fn is_general(&self) -> bool {
        self.kind == ReferenceKind::General
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        self.footnote_subtype == Some(FootnoteSubtype::Named)
    }

    #[must_use]
    pub fn is_content(&self) -> bool {
        self.footnote_subtype == Some(FootnoteSubtype::Content)
    }

    #[must_use]
    pub fn template_names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// `title` parameter of each template that has one.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.templates.iter().filter_map(Template::title).collect()
    }

    /// Effective form of every URL.
    #[must_use]
    pub fn raw_urls(&self) -> Vec<&str> {
        self.urls.iter().map(WikiUrl::effective).collect()
    }

    /// First-level domains of the URLs, first-seen order, no repeats.
    #[must_use]
    pub fn unique_first_level_domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = Vec::new();
        for domain in self.urls.iter().filter_map(|u| u.first_level_domain.as_deref()) {
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }
        domains
    }
}

/// Content-addressed id: first 8 lowercase hex characters of the MD5.
#[must_use]
pub fn reference_id(raw_wikitext: &str) -> String {
    let digest = Md5::digest(raw_wikitext.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(8);
    id
}

/// A reference list entry of rendered Parsoid HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiteRef {
    /// `id` attribute of the list item.
    pub id: Option<String>,
    /// 1-based position in the reference list.
    pub ref_index: usize,
    /// `data-mw` of the reference body, when present.
    pub raw_data: Option<String>,
    /// Back-links to the places in the article that cite this entry.
    pub page_refs: Vec<PageRef>,
}

/// One back-link from a reference list entry into the article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub href: Option<String>,
    pub id: Option<String>,
}

/// Everything extracted from one article.
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    pub sections: Vec<Section>,
    /// All references, section by section.
    pub references: Vec<Reference>,
    /// URLs of all references, flattened, with repeats.
    pub urls: Vec<WikiUrl>,
    /// Domain frequencies over `urls`, most frequent first, ties by name.
    pub first_level_domain_counts: Vec<(String, usize)>,
    /// Entries of the rendered reference list, when HTML was supplied.
    pub cite_refs: Vec<CiteRef>,
}

impl PageExtraction {
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    #[must_use]
    pub fn footnote_count(&self) -> usize {
        self.references.iter().filter(|r| r.is_footnote()).count()
    }

    #[must_use]
    pub fn general_count(&self) -> usize {
        self.references.iter().filter(|r| r.is_general()).count()
    }

    #[must_use]
    pub fn content_footnote_count(&self) -> usize {
        self.references.iter().filter(|r| r.is_content()).count()
    }

    #[must_use]
    pub fn named_footnote_count(&self) -> usize {
        self.references.iter().filter(|r| r.is_named()).count()
    }

    #[must_use]
    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// URLs without repeats, first-seen order.
    #[must_use]
    pub fn unique_urls(&self) -> Vec<&WikiUrl> {
        let mut unique: Vec<&WikiUrl> = Vec::new();
        for url in &self.urls {
            if !unique.contains(&url) {
                unique.push(url);
            }
        }
        unique
    }

    #[must_use]
    pub fn reference_ids(&self) -> Vec<&str> {
        self.references
            .iter()
            .map(|r| r.reference_id.as_str())
            .collect()
    }

    /// Raw wikitext of every reference, in order.
    #[must_use]
    pub fn wikitexts(&self) -> Vec<&str> {
        self.references
            .iter()
            .map(|r| r.raw_wikitext.as_str())
            .collect()
    }

    /// Flat, serializable summary.
    #[must_use]
    pub fn report(&self) -> PageReport {
        PageReport {
            references: self.references.iter().map(ReferenceReport::from).collect(),
            reference_count: self.reference_count(),
            footnote_count: self.footnote_count(),
            content_footnote_count: self.content_footnote_count(),
            named_footnote_count: self.named_footnote_count(),
            general_count: self.general_count(),
            url_count: self.url_count(),
            urls: self.urls.iter().map(|u| u.effective().to_string()).collect(),
            first_level_domain_counts: DomainCounts(self.first_level_domain_counts.clone()),
            cite_refs: self.cite_refs.clone(),
        }
    }
}

/// Flat form of a `Reference`.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub footnote_subtype: Option<FootnoteSubtype>,
    pub name: Option<String>,
    pub section: String,
    pub template_names: Vec<String>,
    pub templates: Vec<Template>,
    pub urls: Vec<String>,
    pub wikitext: String,
    pub claim: Option<String>,
    pub first_level_domains: Vec<String>,
}

impl From<&Reference> for ReferenceReport {
    fn from(reference: &Reference) -> Self {
        Self {
            id: reference.reference_id.clone(),
            kind: reference.kind,
            footnote_subtype: reference.footnote_subtype,
            name: reference.name.clone(),
            section: reference.section.clone(),
            template_names: reference
                .template_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            templates: reference.templates.clone(),
            urls: reference
                .raw_urls()
                .into_iter()
                .map(str::to_string)
                .collect(),
            wikitext: reference.raw_wikitext.clone(),
            claim: reference.claim.clone(),
            first_level_domains: reference
                .unique_first_level_domains()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Domain counts that serialize as an ordered JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCounts(pub Vec<(String, usize)>);

impl Serialize for DomainCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (domain, count) in &self.0 {
            map.serialize_entry(domain, count)?;
        }
        map.end()
    }
}

/// JSON report of a page.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub references: Vec<ReferenceReport>,
    pub reference_count: usize,
    pub footnote_count: usize,
    pub content_footnote_count: usize,
    pub named_footnote_count: usize,
    pub general_count: usize,
    pub url_count: usize,
    pub urls: Vec<String>,
    pub first_level_domain_counts: DomainCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cite_refs: Vec<CiteRef>,
}
