//! Public suffix rules for first-level-domain extraction.
//!
//! A `PublicSuffixList` is an immutable value. The embedded copy of the
//! upstream `public_suffix_list.dat` is parsed once and shared through
//! [`PublicSuffixList::builtin`]; other rule text goes through
//! [`PublicSuffixList::parse`] and is handed to [`crate::UrlClassifier::new`].
//!
//! Internationalized rules are stored in both their Unicode and their
//! punycode form, so hosts match whichever form the URL parser produced.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use url::Host;

const BUILTIN_RULES: &str = include_str!("../data/public_suffix_list.dat");

static BUILTIN: LazyLock<Arc<PublicSuffixList>> =
    LazyLock::new(|| Arc::new(PublicSuffixList::parse(BUILTIN_RULES)));

/// Parsed public suffix rules.
#[derive(Debug, Clone, Default)]
pub struct PublicSuffixList {
    rules: HashSet<String>,
    /// Parents of `*.` rules (`*.ck` is stored as `ck`).
    wildcards: HashSet<String>,
    /// `!` rules, stored without the marker.
    exceptions: HashSet<String>,
}

impl PublicSuffixList {
    /// Parse rules in the publicsuffix.org list format.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut list = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let Some(rule) = line.split_whitespace().next() else {
                continue;
            };
            let rule = rule.to_lowercase();
            let (set, name) = if let Some(exception) = rule.strip_prefix('!') {
                (&mut list.exceptions, exception)
            } else if let Some(parent) = rule.strip_prefix("*.") {
                (&mut list.wildcards, parent)
            } else {
                (&mut list.rules, rule.as_str())
            };
            if let Some(ascii) = punycode(name) {
                set.insert(ascii);
            }
            set.insert(name.to_string());
        }
        list
    }

    /// The complete upstream list embedded in the crate, parsed on first use.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Number of stored rules of all kinds, punycode forms included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len() + self.wildcards.len() + self.exceptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The public suffix of `host`, if an explicit rule matches.
    #[must_use]
    pub fn public_suffix(&self, host: &str) -> Option<String> {
        let labels = host_labels(host)?;
        let len = self.suffix_label_count(&labels)?;
        Some(labels[labels.len() - len..].join("."))
    }

    /// The registrable domain of `host`: its public suffix plus one label.
    ///
    /// Returns `None` when no rule matches or when the host is itself a
    /// public suffix.
    #[must_use]
    pub fn registrable_domain(&self, host: &str) -> Option<String> {
        let labels = host_labels(host)?;
        let len = self.suffix_label_count(&labels)?;
        if len >= labels.len() {
            return None;
        }
        Some(labels[labels.len() - len - 1..].join("."))
    }

    /// Label count of the longest matching rule. Candidates are tried from
    /// longest to shortest, so the first hit wins.
    fn suffix_label_count(&self, labels: &[&str]) -> Option<usize> {
        let n = labels.len();
        for start in 0..n {
            let candidate = labels[start..].join(".");
            if self.exceptions.contains(&candidate) {
                return Some(n - start - 1).filter(|len| *len > 0);
            }
            if self.rules.contains(&candidate) {
                return Some(n - start);
            }
            if start + 1 < n && self.wildcards.contains(&labels[start + 1..].join(".")) {
                return Some(n - start);
            }
        }
        None
    }
}

/// ASCII form of a non-ASCII rule.
fn punycode(name: &str) -> Option<String> {
    if name.is_ascii() {
        return None;
    }
    match Host::parse(name) {
        Ok(Host::Domain(ascii)) => Some(ascii),
        _ => None,
    }
}

fn host_labels(host: &str) -> Option<Vec<&str>> {
    let host = host.trim().trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    let labels: Vec<&str> = host.split('.').collect();
    if labels.iter().any(|label| label.is_empty()) {
        return None;
    }
    Some(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(list: &PublicSuffixList, host: &str) -> Option<String> {
        list.registrable_domain(&host.to_lowercase())
    }

    #[test]
    fn test_builtin_is_the_full_list() {
        let list = PublicSuffixList::builtin();
        assert!(list.len() > 9_000);
        assert!(Arc::ptr_eq(&list, &PublicSuffixList::builtin()));
    }

    #[test]
    fn test_newer_generic_and_brand_tlds() {
        let list = PublicSuffixList::builtin();
        for (host, expected) in [
            ("www.visitwales.wales", "visitwales.wales"),
            ("www.example.scot", "example.scot"),
            ("greenpeace.ngo", "greenpeace.ngo"),
            ("abc.bbc", "abc.bbc"),
            ("news.example.cymru", "example.cymru"),
        ] {
            assert_eq!(list.registrable_domain(host).as_deref(), Some(expected), "{host}");
        }
    }

    #[test]
    fn test_internationalized_rules_match_both_forms() {
        let list = PublicSuffixList::parse("\u{440}\u{444}\n");
        assert_eq!(
            list.registrable_domain("www.example.\u{440}\u{444}").as_deref(),
            Some("example.\u{440}\u{444}")
        );
        assert_eq!(
            list.registrable_domain("www.example.xn--p1ai").as_deref(),
            Some("example.xn--p1ai")
        );
    }

    #[test]
    fn test_registrable_domain() {
        let list = PublicSuffixList::builtin();
        assert_eq!(lower(&list, "collections.rmg.co.uk").as_deref(), Some("rmg.co.uk"));
        assert_eq!(lower(&list, "www.aviafrance.com").as_deref(), Some("aviafrance.com"));
        assert_eq!(lower(&list, "web.archive.org").as_deref(), Some("archive.org"));
        assert_eq!(lower(&list, "example.com.").as_deref(), Some("example.com"));
    }

    #[test]
    fn test_suffix_alone_has_no_registrable_domain() {
        let list = PublicSuffixList::builtin();
        assert_eq!(list.registrable_domain("co.uk"), None);
        assert_eq!(list.registrable_domain("com"), None);
    }

    #[test]
    fn test_unknown_tld() {
        let list = PublicSuffixList::builtin();
        assert_eq!(list.registrable_domain("host.invalidtld"), None);
        assert_eq!(list.registrable_domain("127.0.0.1"), None);
        assert_eq!(list.registrable_domain(""), None);
    }

    #[test]
    fn test_wildcard_and_exception_rules() {
        let list = PublicSuffixList::parse("// c\n*.ck\n!www.ck\n");
        assert_eq!(list.registrable_domain("a.b.ck").as_deref(), Some("a.b.ck"));
        assert_eq!(list.registrable_domain("b.ck"), None);
        assert_eq!(list.registrable_domain("www.ck").as_deref(), Some("www.ck"));
        assert_eq!(list.public_suffix("x.www.ck").as_deref(), Some("ck"));
    }

    #[test]
    fn test_private_rules_take_precedence() {
        let list = PublicSuffixList::builtin();
        assert_eq!(
            list.registrable_domain("someone.github.io").as_deref(),
            Some("someone.github.io")
        );
    }
}
