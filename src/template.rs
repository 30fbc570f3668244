//! Citation template parsing.
//!
//! Turns a parsed `{{cite ...}}` node into a `Template` with an ordered,
//! normalized parameter map.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::error::{Error, Result};
use crate::patterns::PAIRED_COMMENT;
use crate::url_utils::{UrlClassifier, WikiUrl};
use crate::wikitext::TemplateNode;

/// Parameter keys that carry URLs.
pub const URL_PARAMETERS: &[&str] = &[
    "url",
    "archive_url",
    "conference_url",
    "transcript_url",
    "chapter_url",
];

/// Alias keys and their canonical names. Applied after `class` is renamed
/// and before dashes become underscores.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("accessdate", "access_date"),
    ("archiveurl", "archive_url"),
    ("archivedate", "archive_date"),
    ("ISBN", "isbn"),
    ("authorlink", "author_link"),
    ("authorlink1", "author_link1"),
    ("authorlink2", "author_link2"),
    ("authorlink3", "author_link3"),
    ("authorlink4", "author_link4"),
    ("authorlink5", "author_link5"),
    ("authorurl", "author_link"),
    ("chapterurl", "chapter_url"),
    ("conferenceurl", "conference_url"),
    ("transcripturl", "transcript_url"),
];

/// Insertion-ordered string map.
///
/// Setting an existing key keeps its position and replaces the value,
/// which matches how MediaWiki resolves repeated parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(String, String)>);

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: String) {
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A parsed citation template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Lower-cased, trimmed name.
    pub name: String,
    pub parameters: Parameters,
    pub isbn: Option<String>,
}

impl Template {
    /// Value of the first positional parameter, if any.
    #[must_use]
    pub fn first_parameter(&self) -> Option<&str> {
        self.parameters.get("first_parameter")
    }

    /// True when the first positional parameter is absent or blank.
    #[must_use]
    pub fn missing_or_empty_first_parameter(&self) -> bool {
        self.first_parameter().is_none_or(|v| v.trim().is_empty())
    }

    /// Non-empty raw values of the URL-bearing parameters, in key order.
    #[must_use]
    pub fn raw_urls(&self) -> Vec<&str> {
        URL_PARAMETERS
            .iter()
            .filter_map(|key| self.parameters.get(key))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Classified URLs of the URL-bearing parameters, de-duplicated by
    /// effective URL. Computed on every call.
    #[must_use]
    pub fn urls(&self, classifier: &UrlClassifier) -> Vec<WikiUrl> {
        let mut urls: Vec<WikiUrl> = Vec::new();
        for raw in self.raw_urls() {
            let url = classifier.classify(raw);
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls
    }

    /// The `title` parameter.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.parameters.get("title")
    }
}

/// Builds `Template` values from parsed template nodes.
pub struct TemplateParser;

impl TemplateParser {
    /// Parse a template node. Fails only when the node has no name.
    pub fn parse(node: &TemplateNode) -> Result<Template> {
        let name = remove_comments(&node.name).trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::UnparseableTemplate(node.raw.clone()));
        }

        let mut parameters = Parameters::new();
        for param in &node.params {
            let key = normalize_key(remove_comments(&param.name).trim());
            let value = remove_comments(&param.value);
            let value = if param.showkey {
                value.trim().to_string()
            } else {
                value
            };
            parameters.insert(key, value);
        }

        if let Some(first) = parameters.get("1").map(str::to_string) {
            trace!(template = %name, first = %first, "first positional parameter");
            parameters.insert("first_parameter".to_string(), first);
        }

        let isbn = if name == "isbn" {
            parameters.get("first_parameter").map(str::to_string)
        } else {
            parameters.get("isbn").map(str::to_string)
        };

        Ok(Template {
            name,
            parameters,
            isbn,
        })
    }
}

/// Remove HTML comments, keeping the text on both sides of each.
fn remove_comments(text: &str) -> String {
    let mut text = text.to_string();
    while let Some(caps) = PAIRED_COMMENT.captures(&text) {
        let before = caps.get(1).map_or("", |m| m.as_str());
        let after = caps.get(2).map_or("", |m| m.as_str());
        text = format!("{before}{after}");
    }
    text
}

fn normalize_key(key: &str) -> String {
    let key = if key == "class" { "news_class" } else { key };
    let key = KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, canonical)| *canonical);
    key.replace('-', "_")
}
