//! Single-pass wikitext scanner.
//!
//! The scanner walks the source once, recognising comments, tags,
//! templates, links, entities and headings at their start character and
//! jumping to their matching end. Everything it cannot match stays text,
//! so parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    Attribute, Entity, ExternalLink, Heading, Parameter, TagNode, TemplateNode, WikiNode, Wikilink,
};

/// Protocols accepted inside `[url title]` links.
const BRACKET_PROTOCOLS: &[&str] = &[
    "http://", "https://", "ftp://", "ftps://", "sftp://", "git://", "irc://", "ircs://",
    "news:", "mailto:", "//",
];

/// Protocols that start a free link in running text.
const FREE_LINK_PROTOCOLS: &[&str] = &["http://", "https://", "ftp://", "ftps://", "sftp://", "git://"];

/// Tags whose body is not wikitext.
const RAW_CONTENT_TAGS: &[&str] = &["nowiki", "pre", "math", "syntaxhighlight", "source", "score", "chem"];

/// Tags that never have a closing counterpart.
const VOID_TAGS: &[&str] = &["br", "hr", "wbr"];

#[allow(clippy::expect_used)]
static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][A-Za-z0-9]*)((?:\s[^<>]*?)?)(/?)>").expect("OPEN_TAG regex")
});

#[allow(clippy::expect_used)]
static TAG_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("TAG_ATTRIBUTE regex")
});

#[allow(clippy::expect_used)]
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#([0-9]{1,7})|#[xX]([0-9A-Fa-f]{1,6})|([A-Za-z][A-Za-z0-9]{1,31}));")
        .expect("ENTITY regex")
});

/// Parse a full wikitext document. Headings are recognised at line starts.
#[must_use]
pub fn parse(src: &str) -> Vec<WikiNode> {
    Parser::new(src, true).run()
}

/// Parse a nested fragment (tag body, parameter value). No headings.
fn parse_fragment(src: &str) -> Vec<WikiNode> {
    Parser::new(src, false).run()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    text_start: usize,
    allow_headings: bool,
    nodes: Vec<WikiNode>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, allow_headings: bool) -> Self {
        Self {
            src,
            pos: 0,
            text_start: 0,
            allow_headings,
            nodes: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<WikiNode> {
        while self.pos < self.src.len() {
            if let Some((node, end)) = self.next_node() {
                self.flush_text();
                self.nodes.push(node);
                self.pos = end;
                self.text_start = end;
            } else if self.rest().starts_with("{{{") {
                // Template arguments are not expanded; keep them as text.
                self.pos += 3;
            } else {
                let step = self.rest().chars().next().map_or(1, char::len_utf8);
                self.pos += step;
            }
        }
        self.flush_text();
        self.nodes
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn flush_text(&mut self) {
        if self.text_start < self.pos {
            self.nodes
                .push(WikiNode::Text(self.src[self.text_start..self.pos].to_string()));
        }
        self.text_start = self.pos;
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.src.as_bytes()[self.pos - 1] == b'\n'
    }

    fn next_node(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        match rest.as_bytes().first()? {
            b'<' => self.try_comment().or_else(|| self.try_tag()),
            b'{' if !rest.starts_with("{{{") => self.try_template(),
            b'[' => self.try_wikilink().or_else(|| self.try_bracketed_link()),
            b'&' => self.try_entity(),
            b'=' if self.allow_headings && self.at_line_start() => self.try_heading(),
            b'h' | b'H' | b'f' | b'F' | b's' | b'S' | b'g' | b'G' => self.try_free_link(),
            _ => None,
        }
    }

    fn try_comment(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        if !rest.starts_with("<!--") {
            return None;
        }
        // An unterminated comment swallows the rest of the document.
        let len = rest[4..].find("-->").map_or(rest.len(), |i| i + 7);
        Some((WikiNode::Comment(rest[..len].to_string()), self.pos + len))
    }

    fn try_tag(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        let caps = OPEN_TAG.captures(rest)?;
        let whole = caps.get(0)?;
        let name = caps.get(1)?.as_str().to_ascii_lowercase();
        let attributes = parse_attributes(caps.get(2).map_or("", |m| m.as_str()));
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        let open_end = self.pos + whole.end();

        if self_closing || VOID_TAGS.contains(&name.as_str()) {
            let tag = TagNode {
                name,
                attributes,
                contents: Vec::new(),
                self_closing,
                raw: whole.as_str().to_string(),
            };
            return Some((WikiNode::Tag(tag), open_end));
        }

        let Some((content_end, close_end)) = find_closing_tag(self.src, open_end, &name) else {
            // Unmatched opener: keep the opening tag on its own.
            let tag = TagNode {
                name,
                attributes,
                contents: Vec::new(),
                self_closing: false,
                raw: whole.as_str().to_string(),
            };
            return Some((WikiNode::Tag(tag), open_end));
        };

        let inner = &self.src[open_end..content_end];
        let contents = if RAW_CONTENT_TAGS.contains(&name.as_str()) {
            if inner.is_empty() {
                Vec::new()
            } else {
                vec![WikiNode::Text(inner.to_string())]
            }
        } else {
            parse_fragment(inner)
        };
        let tag = TagNode {
            name,
            attributes,
            contents,
            self_closing: false,
            raw: self.src[self.pos..close_end].to_string(),
        };
        Some((WikiNode::Tag(tag), close_end))
    }

    fn try_template(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        if !rest.starts_with("{{") {
            return None;
        }
        let end = find_matching(rest, b"{{", b"}}")?;
        let raw = &rest[..end];
        let inner = &raw[2..end - 2];

        let parts = split_top_level(inner, b'|');
        let name = parts.first().copied().unwrap_or_default().to_string();
        let mut params = Vec::new();
        let mut position = 0usize;
        for part in parts.iter().skip(1) {
            let param = if let Some(eq) = find_top_level(part, b'=') {
                let value = &part[eq + 1..];
                Parameter {
                    name: part[..eq].to_string(),
                    value: value.to_string(),
                    nodes: parse_fragment(value),
                    showkey: true,
                }
            } else {
                position += 1;
                Parameter {
                    name: position.to_string(),
                    value: (*part).to_string(),
                    nodes: parse_fragment(part),
                    showkey: false,
                }
            };
            params.push(param);
        }

        let template = TemplateNode {
            name,
            params,
            raw: raw.to_string(),
        };
        Some((WikiNode::Template(template), self.pos + end))
    }

    fn try_wikilink(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        if !rest.starts_with("[[") {
            return None;
        }
        let end = find_matching(rest, b"[[", b"]]")?;
        let raw = &rest[..end];
        let inner = &raw[2..end - 2];
        let (title, text) = match find_top_level(inner, b'|') {
            Some(bar) => (&inner[..bar], Some(inner[bar + 1..].to_string())),
            None => (inner, None),
        };
        let link = Wikilink {
            title: title.to_string(),
            text,
            raw: raw.to_string(),
        };
        Some((WikiNode::Wikilink(link), self.pos + end))
    }

    fn try_bracketed_link(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        let after = rest.strip_prefix('[')?;
        let protocol = BRACKET_PROTOCOLS
            .iter()
            .find(|p| starts_with_ignore_case(after, p))?;
        let close = after.find([']', '\n'])?;
        if after.as_bytes()[close] != b']' {
            return None;
        }
        let inner = &after[..close];
        let (url, title) = match inner.find(char::is_whitespace) {
            Some(space) => {
                let title = inner[space..].trim_start();
                (&inner[..space], (!title.is_empty()).then(|| title.to_string()))
            }
            None => (inner, None),
        };
        if url.len() <= protocol.len() {
            return None;
        }
        let len = close + 2;
        let link = ExternalLink {
            url: url.to_string(),
            title,
            bracketed: true,
            raw: rest[..len].to_string(),
        };
        Some((WikiNode::ExternalLink(link), self.pos + len))
    }

    fn try_free_link(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        let protocol = FREE_LINK_PROTOCOLS
            .iter()
            .find(|p| starts_with_ignore_case(rest, p))?;
        if self.src[..self.pos]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric)
        {
            return None;
        }

        let mut end = 0;
        for (i, ch) in rest.char_indices() {
            if ch.is_whitespace() || matches!(ch, '[' | ']' | '<' | '>' | '"' | '{' | '}' | '|') {
                break;
            }
            end = i + ch.len_utf8();
        }
        let mut url = &rest[..end];
        while let Some(last) = url.chars().next_back() {
            let trailing_punctuation = matches!(last, '.' | ',' | ';' | ':' | '!' | '?' | '\'');
            let unbalanced_paren = last == ')' && !url.contains('(');
            if trailing_punctuation || unbalanced_paren {
                url = &url[..url.len() - 1];
            } else {
                break;
            }
        }
        if url.len() <= protocol.len() {
            return None;
        }

        let link = ExternalLink {
            url: url.to_string(),
            title: None,
            bracketed: false,
            raw: url.to_string(),
        };
        Some((WikiNode::ExternalLink(link), self.pos + url.len()))
    }

    fn try_entity(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        let caps = ENTITY.captures(rest)?;
        let raw = caps.get(0)?.as_str();
        let rendered = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)?.to_string()
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)?
                .to_string()
        } else {
            named_entity(caps.get(3)?.as_str())?.to_string()
        };
        let entity = Entity {
            raw: raw.to_string(),
            rendered,
        };
        Some((WikiNode::Entity(entity), self.pos + raw.len()))
    }

    fn try_heading(&self) -> Option<(WikiNode, usize)> {
        let rest = self.rest();
        let line_end = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_end];
        let trimmed = line.trim_end();
        let leading = trimmed.bytes().take_while(|b| *b == b'=').count();
        let trailing = trimmed.bytes().rev().take_while(|b| *b == b'=').count();
        let level = leading.min(trailing).min(6);
        if level == 0 || trimmed.len() <= level * 2 {
            return None;
        }
        let heading = Heading {
            level,
            title: trimmed[level..trimmed.len() - level].to_string(),
            raw: line.to_string(),
        };
        Some((WikiNode::Heading(heading), self.pos + line_end))
    }
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn parse_attributes(src: &str) -> Vec<Attribute> {
    TAG_ATTRIBUTE
        .captures_iter(src)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            Some(Attribute { name, value })
        })
        .collect()
}

/// Byte offset just past the delimiter closing the construct that opens
/// at the start of `src`. Comments are skipped; nesting is counted.
fn find_matching(src: &str, open: &[u8], close: &[u8]) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(b"<!--") {
            let end = src[i + 4..].find("-->")?;
            i += end + 7;
        } else if rest.starts_with(open) {
            depth += 1;
            i += open.len();
        } else if rest.starts_with(close) {
            depth = depth.saturating_sub(1);
            i += close.len();
            if depth == 0 {
                return Some(i);
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Byte offsets of the first `sep` outside nested templates, links and
/// comments, plus the tail, expressed as the pieces between them.
fn split_top_level(src: &str, sep: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    scan_top_level(src, sep, |at| {
        parts.push(&src[start..at]);
        start = at + 1;
        true
    });
    parts.push(&src[start..]);
    parts
}

fn find_top_level(src: &str, sep: u8) -> Option<usize> {
    let mut found = None;
    scan_top_level(src, sep, |at| {
        found = Some(at);
        false
    });
    found
}

/// Calls `on_sep` for each top-level `sep`; stops when it returns false.
fn scan_top_level<F>(src: &str, sep: u8, mut on_sep: F)
where
    F: FnMut(usize) -> bool,
{
    let bytes = src.as_bytes();
    let mut braces = 0usize;
    let mut brackets = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(b"<!--") {
            match src[i + 4..].find("-->") {
                Some(end) => i += end + 7,
                None => return,
            }
        } else if rest.starts_with(b"{{") {
            braces += 1;
            i += 2;
        } else if rest.starts_with(b"}}") && braces > 0 {
            braces -= 1;
            i += 2;
        } else if rest.starts_with(b"[[") {
            brackets += 1;
            i += 2;
        } else if rest.starts_with(b"]]") && brackets > 0 {
            brackets -= 1;
            i += 2;
        } else {
            if bytes[i] == sep && braces == 0 && brackets == 0 && !on_sep(i) {
                return;
            }
            i += 1;
        }
    }
}

/// Returns (start of closing tag, end of closing tag) for the tag `name`
/// opened just before `from`, counting nested openers of the same name.
fn find_closing_tag(src: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = src.as_bytes();
    let name_bytes = name.as_bytes();
    let n = name_bytes.len();
    let mut depth = 1usize;
    let mut i = from;
    while let Some(offset) = src[i..].find('<') {
        let at = i + offset;
        let after = &bytes[at + 1..];

        if after.starts_with(b"!--") {
            let end = src[at + 4..].find("-->")?;
            i = at + 4 + end + 3;
            continue;
        }

        let is_close = after.first() == Some(&b'/')
            && after.len() > n
            && after[1..=n].eq_ignore_ascii_case(name_bytes)
            && is_tag_name_end(after.get(n + 1));
        if is_close {
            let gt = src[at..].find('>')?;
            depth -= 1;
            if depth == 0 {
                return Some((at, at + gt + 1));
            }
            i = at + gt + 1;
            continue;
        }

        let is_open = after.len() >= n
            && after[..n].eq_ignore_ascii_case(name_bytes)
            && is_tag_name_end(after.get(n));
        if is_open {
            if let Some(gt) = src[at..].find('>') {
                if !src[at..at + gt].ends_with('/') {
                    depth += 1;
                }
                i = at + gt + 1;
                continue;
            }
        }

        i = at + 1;
    }
    None
}

fn is_tag_name_end(byte: Option<&u8>) -> bool {
    matches!(byte, Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r'))
}

fn named_entity(name: &str) -> Option<&'static str> {
    let rendered = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "minus" => "\u{2212}",
        "hellip" => "\u{2026}",
        "thinsp" => "\u{2009}",
        "shy" => "\u{ad}",
        "times" => "\u{d7}",
        "deg" => "\u{b0}",
        "middot" => "\u{b7}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "euro" => "\u{20ac}",
        "pound" => "\u{a3}",
        "sect" => "\u{a7}",
        "para" => "\u{b6}",
        "prime" => "\u{2032}",
        "Prime" => "\u{2033}",
        _ => return None,
    };
    Some(rendered)
}
