//! URL classification and repair.
//!
//! Citation URLs in wikitext are frequently malformed. `UrlClassifier`
//! never fails: it returns a `WikiUrl` with a `MalformedReason` when
//! something is off, repairs the common `httpwww` typos and missing
//! schemes, decomposes Wayback Machine URLs and computes the
//! first-level domain.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::{Host, Url};

use crate::error::{Error, Result};
use crate::patterns::WAYBACK_URL;
use crate::public_suffix::PublicSuffixList;

/// Schemes accepted in citation URLs.
pub const ACCEPTED_SCHEMES: &[&str] = &["http", "https", "ftp", "sftp"];

/// Why a URL was considered malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    MissingScheme,
    UnrecognizedScheme,
    NoNetloc,
    /// TLD shorter than 2 or longer than 6 characters.
    BadTld,
    /// `httpwww...` rewritten to `http://www...`.
    FixedHttpWww,
    /// `httpswww...` rewritten to `https://www...`.
    FixedHttpsWww,
}

/// A classified URL.
///
/// Equality, hashing and ordering use the effective URL (`fixed` when
/// present, else `raw`), so a raw URL and its repaired form collapse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiUrl {
    pub raw: String,
    /// Repaired form when a malformation was corrected.
    pub fixed: Option<String>,
    /// Lower-cased scheme, empty when absent.
    pub scheme: String,
    /// Host and explicit port, empty when absent.
    pub netloc: String,
    /// Last dot-delimited label of the host.
    pub tld: String,
    pub first_level_domain: Option<String>,
    /// The first-level domain is an IP literal.
    pub fld_is_ip: bool,
    pub malformed: Option<MalformedReason>,
    /// Target of a Wayback Machine URL.
    pub archived_url: Option<String>,
    /// Raw Wayback timestamp (digits, possibly with `*`).
    pub wayback_timestamp: Option<String>,
    /// Wayback timestamp as a date, when it has at least a full date.
    pub archived_at: Option<NaiveDateTime>,
}

impl WikiUrl {
    /// The fixed URL if one was produced, else the raw URL.
    #[must_use]
    pub fn effective(&self) -> &str {
        self.fixed.as_deref().unwrap_or(&self.raw)
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    #[must_use]
    pub fn is_wayback(&self) -> bool {
        self.effective().contains("//web.archive.org")
    }
}

impl PartialEq for WikiUrl {
    fn eq(&self, other: &Self) -> bool {
        self.effective() == other.effective()
    }
}

impl Eq for WikiUrl {}

impl Hash for WikiUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.effective().hash(state);
    }
}

impl PartialOrd for WikiUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WikiUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        self.effective().cmp(other.effective())
    }
}

/// Classifies URL strings against a public suffix list.
///
/// Cloning is cheap: the suffix list is shared.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    suffixes: Arc<PublicSuffixList>,
}

impl Default for UrlClassifier {
    fn default() -> Self {
        Self {
            suffixes: PublicSuffixList::builtin(),
        }
    }
}

impl UrlClassifier {
    #[must_use]
    pub fn new(suffixes: PublicSuffixList) -> Self {
        Self {
            suffixes: Arc::new(suffixes),
        }
    }

    #[must_use]
    pub fn suffixes(&self) -> &PublicSuffixList {
        &self.suffixes
    }

    /// Classify a URL string. Never fails.
    #[must_use]
    pub fn classify(&self, raw: &str) -> WikiUrl {
        let raw = raw.trim();
        let mut url = WikiUrl {
            raw: raw.to_string(),
            ..WikiUrl::default()
        };

        if let Some(rest) = raw.strip_prefix("httpswww") {
            url.fixed = Some(format!("https://www{rest}"));
            url.malformed = Some(MalformedReason::FixedHttpsWww);
        } else if let Some(rest) = raw.strip_prefix("httpwww") {
            url.fixed = Some(format!("http://www{rest}"));
            url.malformed = Some(MalformedReason::FixedHttpWww);
        }
        if url.fixed.is_some() {
            debug!(raw, fixed = url.effective(), "repaired httpwww prefix");
        }

        let effective = url.effective().to_string();
        let wayback = url.is_wayback();
        if wayback {
            if let Some(caps) = WAYBACK_URL.captures(&effective) {
                let timestamp = caps.get(1).map_or("", |m| m.as_str());
                url.archived_at = parse_wayback_timestamp(timestamp);
                url.wayback_timestamp = Some(timestamp.to_string());
                url.archived_url = caps.get(2).map(|m| m.as_str().to_string());
            } else {
                debug!(url = %effective, "wayback url without timestamp and target");
            }
        }

        let target = url.archived_url.clone().unwrap_or(effective);
        let (scheme, netloc) = scheme_and_netloc(&target);
        url.scheme = scheme;
        url.netloc = netloc;
        url.tld = tld_of(&url.netloc);

        if !url.netloc.is_empty()
            && !(2..=6).contains(&url.tld.chars().count())
            && ip_literal(&host_of(&url.netloc)).is_none()
        {
            url.malformed = Some(MalformedReason::BadTld);
        }

        if url.scheme.is_empty() {
            url.malformed = Some(MalformedReason::MissingScheme);
        } else if !ACCEPTED_SCHEMES.contains(&url.scheme.as_str()) {
            url.malformed = Some(MalformedReason::UnrecognizedScheme);
        }

        if url.netloc.is_empty() {
            url.malformed = Some(MalformedReason::NoNetloc);
            let retry = format!("http://{target}");
            let (_, netloc) = scheme_and_netloc(&retry);
            if netloc.is_empty() {
                debug!(url = %target, "no netloc even with http:// prefix");
            } else {
                debug!(url = %target, %netloc, "adding http:// recovered the netloc");
                url.netloc = netloc;
                url.tld = tld_of(&url.netloc);
                if url.archived_url.is_none() {
                    url.fixed = Some(retry);
                }
            }
        }

        self.assign_first_level_domain(&mut url, wayback);
        url
    }

    fn assign_first_level_domain(&self, url: &mut WikiUrl, wayback: bool) {
        let host = host_of(&url.netloc);
        if let Some(fld) = self.suffixes.registrable_domain(&host) {
            url.first_level_domain = Some(fld);
            return;
        }
        match parse_ip(&host) {
            Ok(Some(ip)) => {
                url.first_level_domain = Some(ip.to_string());
                url.fld_is_ip = true;
                return;
            }
            Ok(None) => {}
            Err(err) => debug!(%err, "host is not a domain or an ip literal"),
        }
        if wayback {
            url.first_level_domain = Some("archive.org".to_string());
        } else {
            debug!(url = url.effective(), "could not extract first level domain");
        }
    }
}

/// Scheme and netloc of `target`. Absolute URLs are parsed with `url::Url`,
/// which lower-cases the host and drops default ports. Scheme-relative and
/// bare inputs, which it rejects, fall back to [`split_scheme_netloc`].
fn scheme_and_netloc(target: &str) -> (String, String) {
    match Url::parse(target) {
        Ok(parsed) => {
            let netloc = match (parsed.host_str(), parsed.port()) {
                (Some(host), Some(port)) => format!("{host}:{port}"),
                (Some(host), None) => host.to_string(),
                (None, _) => String::new(),
            };
            (parsed.scheme().to_string(), netloc)
        }
        Err(err) => {
            trace!(url = target, %err, "splitting url by hand");
            split_scheme_netloc(target)
        }
    }
}

/// Split off scheme and netloc the way a generic URI splitter does: the
/// scheme is everything before the first `:` when it looks like one, the
/// netloc follows `//` up to the first `/`, `?` or `#`.
fn split_scheme_netloc(url: &str) -> (String, String) {
    let mut rest = url;
    let mut scheme = String::new();
    if let Some(colon) = url.find(':') {
        let candidate = &url[..colon];
        let looks_like_scheme = candidate
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if looks_like_scheme {
            scheme = candidate.to_ascii_lowercase();
            rest = &url[colon + 1..];
        }
    }
    let netloc = rest
        .strip_prefix("//")
        .map(|after| {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            after[..end].to_string()
        })
        .unwrap_or_default();
    (scheme, netloc)
}

/// Host part of a netloc: no userinfo, no port, lower-cased.
fn host_of(netloc: &str) -> String {
    let without_userinfo = netloc.rsplit('@').next().unwrap_or(netloc);
    let host = if without_userinfo.starts_with('[') {
        match without_userinfo.find(']') {
            Some(end) => &without_userinfo[..=end],
            None => without_userinfo,
        }
    } else {
        match without_userinfo.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
            _ => without_userinfo,
        }
    };
    host.trim_end_matches('.').to_lowercase()
}

fn tld_of(netloc: &str) -> String {
    host_of(netloc)
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Parse a host as an IP literal. IPv6 literals keep their brackets.
fn parse_ip(host: &str) -> Result<Option<IpAddr>> {
    if host.is_empty() {
        return Ok(None);
    }
    let parsed = Host::parse(host).map_err(|err| Error::UnparseableUrl(format!("{host}: {err}")))?;
    Ok(match parsed {
        Host::Ipv4(addr) => Some(IpAddr::V4(addr)),
        Host::Ipv6(addr) => Some(IpAddr::V6(addr)),
        Host::Domain(_) => None,
    })
}

fn ip_literal(host: &str) -> Option<IpAddr> {
    parse_ip(host).ok().flatten()
}

/// Wayback timestamps are `YYYYMMDDhhmmss`, often truncated. Anything with
/// at least a full date is right-padded with zeros.
fn parse_wayback_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    if timestamp.len() < 8 || !timestamp.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let digits: String = timestamp.chars().take(14).collect();
    let padded = format!("{digits:0<14}");
    NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S").ok()
}
