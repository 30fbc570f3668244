//! Wikitext node model.
//!
//! A parsed wikitext document is a flat `Vec<WikiNode>`; tags and templates
//! carry their own nested sequences. Every node keeps its exact source so a
//! parsed sequence renders back to the input unchanged.
//!
//! # Module Structure
//!
//! - `parser`: single-pass scanner producing `WikiNode` sequences

use std::fmt;

mod parser;

pub use parser::parse;

/// One node of a parsed wikitext sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiNode {
    /// Plain text between markup.
    Text(String),
    /// An HTML or extension tag such as `<ref>` or `<span>`.
    Tag(TagNode),
    /// A template transclusion `{{name|...}}`.
    Template(TemplateNode),
    /// An internal link `[[Title|text]]`.
    Wikilink(Wikilink),
    /// A bracketed `[url title]` or free-standing external link.
    ExternalLink(ExternalLink),
    /// A `== Heading ==` line.
    Heading(Heading),
    /// An HTML comment, raw including the delimiters.
    Comment(String),
    /// An HTML character entity such as `&nbsp;`.
    Entity(Entity),
}

/// A single `name="value"` attribute of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// An HTML or extension tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    /// Lower-cased tag name.
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Nested nodes between the opening and closing tag.
    pub contents: Vec<WikiNode>,
    /// `<tag ... />` form.
    pub self_closing: bool,
    pub raw: String,
}

impl TagNode {
    /// Get an attribute value by case-insensitive name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value.as_deref())
    }

    /// Source text of the contents, without the surrounding tags.
    #[must_use]
    pub fn contents_wikitext(&self) -> String {
        to_wikitext(&self.contents)
    }

    /// True when the tag carries no body: self-closing, unclosed, or
    /// closed immediately after whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.self_closing || self.contents_wikitext().trim().is_empty()
    }
}

/// A template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Raw key text, or the position number for positional parameters.
    pub name: String,
    /// Raw value text.
    pub value: String,
    /// Parsed value.
    pub nodes: Vec<WikiNode>,
    /// Whether the key was written out (`key=value`).
    pub showkey: bool,
}

/// A template transclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    /// Raw name text, untrimmed.
    pub name: String,
    pub params: Vec<Parameter>,
    pub raw: String,
}

impl TemplateNode {
    /// Case-insensitive name comparison, ignoring surrounding whitespace.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

/// An internal link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wikilink {
    pub title: String,
    pub text: Option<String>,
    pub raw: String,
}

/// An external link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub url: String,
    pub title: Option<String>,
    /// `[url title]` form as opposed to a free link in running text.
    pub bracketed: bool,
    pub raw: String,
}

/// A section heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub title: String,
    pub raw: String,
}

/// An HTML character entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub raw: String,
    pub rendered: String,
}

impl fmt::Display for WikiNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::Comment(text) => f.write_str(text),
            Self::Tag(tag) => f.write_str(&tag.raw),
            Self::Template(template) => f.write_str(&template.raw),
            Self::Wikilink(link) => f.write_str(&link.raw),
            Self::ExternalLink(link) => f.write_str(&link.raw),
            Self::Heading(heading) => f.write_str(&heading.raw),
            Self::Entity(entity) => f.write_str(&entity.raw),
        }
    }
}

/// Render a node sequence back to wikitext.
#[must_use]
pub fn to_wikitext(nodes: &[WikiNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&node.to_string());
    }
    out
}

/// Visit every node depth-first, descending into tag contents and
/// template parameter values.
pub fn walk<'a, F>(nodes: &'a [WikiNode], visit: &mut F)
where
    F: FnMut(&'a WikiNode),
{
    for node in nodes {
        visit(node);
        match node {
            WikiNode::Tag(tag) => walk(&tag.contents, visit),
            WikiNode::Template(template) => {
                for param in &template.params {
                    walk(&param.nodes, visit);
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

/// All templates at any depth, in document order.
#[must_use]
pub fn filter_templates(nodes: &[WikiNode]) -> Vec<&TemplateNode> {
    let mut found = Vec::new();
    walk(nodes, &mut |node| {
        if let WikiNode::Template(template) = node {
            found.push(template);
        }
    });
    found
}

/// All external links at any depth, in document order.
#[must_use]
pub fn filter_external_links(nodes: &[WikiNode]) -> Vec<&ExternalLink> {
    let mut found = Vec::new();
    walk(nodes, &mut |node| {
        if let WikiNode::ExternalLink(link) = node {
            found.push(link);
        }
    });
    found
}

/// All tags named `name` (case-insensitive) at any depth.
#[must_use]
pub fn filter_tags<'a>(nodes: &'a [WikiNode], name: &str) -> Vec<&'a TagNode> {
    let mut found = Vec::new();
    walk(nodes, &mut |node| {
        if let WikiNode::Tag(tag) = node {
            if tag.name.eq_ignore_ascii_case(name) {
                found.push(tag);
            }
        }
    });
    found
}

/// Plain text of a node sequence: templates and comments dropped, links
/// reduced to their visible text, tags reduced to their contents.
#[must_use]
pub fn strip_code(nodes: &[WikiNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            WikiNode::Text(text) => out.push_str(text),
            WikiNode::Tag(tag) => out.push_str(&strip_code(&tag.contents)),
            WikiNode::Wikilink(link) => {
                out.push_str(link.text.as_deref().unwrap_or(&link.title));
            }
            WikiNode::ExternalLink(link) => {
                if link.bracketed {
                    if let Some(title) = &link.title {
                        out.push_str(title);
                    }
                } else {
                    out.push_str(&link.url);
                }
            }
            WikiNode::Heading(heading) => out.push_str(heading.title.trim()),
            WikiNode::Entity(entity) => out.push_str(&entity.rendered),
            WikiNode::Template(_) | WikiNode::Comment(_) => {}
        }
    }
    out
}
