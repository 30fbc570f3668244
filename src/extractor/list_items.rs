//! Line-based candidates for general references.
//!
//! Templates are swapped for opaque placeholders before the section text
//! is split into lines, so a `|` or a line break inside a template never
//! looks like list syntax. Placeholders are restored per candidate.

use crate::wikitext::WikiNode;

use super::references::is_footnote_marker;

const PLACEHOLDER_OPEN: &str = "{{\u{213b}\u{213b}_";
const PLACEHOLDER_CLOSE: &str = "}}";

/// Section wikitext with footnotes removed and templates replaced.
#[derive(Debug, Default)]
pub struct Residual {
    pub text: String,
    placeholders: Vec<String>,
}

impl Residual {
    /// Build from a section's top-level nodes.
    ///
    /// `<ref>` tags and `{{sfn}}` templates are dropped since they are
    /// footnotes already; comments are dropped; other templates and
    /// `<references>` blocks become placeholders.
    #[must_use]
    pub fn from_nodes(nodes: &[WikiNode]) -> Self {
        let mut residual = Self::default();
        for node in nodes {
            if is_footnote_marker(node) {
                continue;
            }
            match node {
                WikiNode::Comment(_) => {}
                WikiNode::Template(template) => residual.push_placeholder(&template.raw),
                WikiNode::Tag(tag) if tag.name == "references" => {
                    residual.push_placeholder(&tag.raw);
                }
                other => residual.text.push_str(&other.to_string()),
            }
        }
        residual
    }

    fn push_placeholder(&mut self, raw: &str) {
        let index = self.placeholders.len();
        self.text
            .push_str(&format!("{PLACEHOLDER_OPEN}{index}{PLACEHOLDER_CLOSE}"));
        self.placeholders.push(raw.to_string());
    }

    /// Put the original template text back into `line`.
    #[must_use]
    pub fn restore(&self, line: &str) -> String {
        let mut restored = line.to_string();
        for (index, raw) in self.placeholders.iter().enumerate() {
            let marker = format!("{PLACEHOLDER_OPEN}{index}{PLACEHOLDER_CLOSE}");
            if restored.contains(&marker) {
                restored = restored.replace(&marker, raw);
            }
        }
        restored
    }

    /// Candidate lines with placeholders restored.
    ///
    /// A list item starts at a line beginning with `*` or `#` and absorbs
    /// following lines that begin with a space. With `include_plain_lines`
    /// every other non-blank, non-heading line is a candidate too.
    #[must_use]
    pub fn candidates(&self, include_plain_lines: bool) -> Vec<LineCandidate> {
        let mut candidates = Vec::new();
        let mut current: Option<String> = None;

        for line in self.text.lines() {
            if line.starts_with('*') || line.starts_with('#') {
                if let Some(item) = current.take() {
                    candidates.push(LineCandidate::list_item(self.restore(&item)));
                }
                current = Some(line.to_string());
                continue;
            }
            if line.starts_with(' ') && !line.trim().is_empty() {
                if let Some(item) = current.as_mut() {
                    item.push('\n');
                    item.push_str(line);
                    continue;
                }
            }
            if let Some(item) = current.take() {
                candidates.push(LineCandidate::list_item(self.restore(&item)));
            }
            if include_plain_lines && !line.trim().is_empty() && !is_heading_line(line) {
                candidates.push(LineCandidate::plain(self.restore(line)));
            }
        }
        if let Some(item) = current.take() {
            candidates.push(LineCandidate::list_item(self.restore(&item)));
        }
        candidates
    }
}

/// One line (or list item) that may hold a general reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCandidate {
    pub wikitext: String,
    pub is_list_item: bool,
}

impl LineCandidate {
    fn list_item(wikitext: String) -> Self {
        Self {
            wikitext,
            is_list_item: true,
        }
    }

    fn plain(wikitext: String) -> Self {
        Self {
            wikitext,
            is_list_item: false,
        }
    }
}

fn is_heading_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() > 2 && trimmed.starts_with('=') && trimmed.ends_with('=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::parse;

    #[test]
    fn test_template_pipes_and_newlines_stay_inside_item() {
        let text = "== Bibliography ==\n* {{cite book\n|title=A\n|url=http://a.example\n}}\n* Plain\n";
        let residual = Residual::from_nodes(&parse(text));
        let candidates = residual.candidates(false);
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[0].wikitext,
            "* {{cite book\n|title=A\n|url=http://a.example\n}}"
        );
        assert_eq!(candidates[1].wikitext, "* Plain");
    }

    #[test]
    fn test_footnotes_are_removed() {
        let residual = Residual::from_nodes(&parse(
            "* Item with note<ref>{{cite web|url=http://x.example}}</ref>{{sfn|Doe|2001}}\n",
        ));
        let candidates = residual.candidates(false);
        assert_eq!(candidates[0].wikitext, "* Item with note");
    }

    #[test]
    fn test_continuation_lines() {
        let residual = Residual::from_nodes(&parse("* First\n  continued\n* Second\nplain\n"));
        let candidates = residual.candidates(false);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].wikitext, "* First\n  continued");
    }

    #[test]
    fn test_plain_lines_only_when_requested() {
        let text = "== Further reading ==\n{{cite book|title=T}}\n\n* Item\nSome text\n";
        let residual = Residual::from_nodes(&parse(text));
        assert_eq!(residual.candidates(false).len(), 1);
        let all = residual.candidates(true);
        let texts: Vec<&str> = all.iter().map(|c| c.wikitext.as_str()).collect();
        assert_eq!(texts, vec!["{{cite book|title=T}}", "* Item", "Some text"]);
        assert!(!all[0].is_list_item);
        assert!(all[1].is_list_item);
    }

    #[test]
    fn test_comments_hide_list_lines() {
        let residual = Residual::from_nodes(&parse("<!--\n* hidden\n-->\n* shown\n"));
        let candidates = residual.candidates(false);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].wikitext, "* shown");
    }
}
