use rs_wikirefs::public_suffix::PublicSuffixList;
use rs_wikirefs::{MalformedReason, UrlClassifier};

fn classifier() -> UrlClassifier {
    UrlClassifier::default()
}

#[test]
fn well_formed_url() {
    let url = classifier().classify("https://www.bbc.co.uk/news/world-12345");
    assert_eq!(url.scheme, "https");
    assert_eq!(url.netloc, "www.bbc.co.uk");
    assert_eq!(url.tld, "uk");
    assert_eq!(url.first_level_domain.as_deref(), Some("bbc.co.uk"));
    assert!(!url.is_malformed());
    assert!(!url.fld_is_ip);
    assert_eq!(url.effective(), "https://www.bbc.co.uk/news/world-12345");
}

#[test]
fn httpwww_prefix_is_repaired() {
    let url = classifier().classify("httpwww.quarryhs.co.uk/x.pdf");
    assert_eq!(url.fixed.as_deref(), Some("http://www.quarryhs.co.uk/x.pdf"));
    assert_eq!(url.malformed, Some(MalformedReason::FixedHttpWww));
    assert_eq!(url.first_level_domain.as_deref(), Some("quarryhs.co.uk"));
    assert_eq!(url.raw, "httpwww.quarryhs.co.uk/x.pdf");
}

#[test]
fn httpswww_prefix_is_repaired() {
    let url = classifier().classify("httpswww.example.org/page");
    assert_eq!(url.fixed.as_deref(), Some("https://www.example.org/page"));
    assert_eq!(url.malformed, Some(MalformedReason::FixedHttpsWww));
    assert_eq!(url.scheme, "https");
}

#[test]
fn ip_without_scheme_gets_netloc_and_ip_domain() {
    let url = classifier().classify("127.0.0.1/test");
    assert_eq!(url.malformed, Some(MalformedReason::NoNetloc));
    assert_eq!(url.netloc, "127.0.0.1");
    assert!(url.fixed.as_deref().is_some_and(|f| f.contains("127.0.0.1")));
    assert_eq!(url.first_level_domain.as_deref(), Some("127.0.0.1"));
    assert!(url.fld_is_ip);
}

#[test]
fn ip_with_scheme_and_port() {
    let url = classifier().classify("http://192.168.1.20:8080/status");
    assert!(!url.is_malformed());
    assert_eq!(url.first_level_domain.as_deref(), Some("192.168.1.20"));
    assert!(url.fld_is_ip);
}

#[test]
fn wayback_url_reports_archived_target() {
    let url = classifier()
        .classify("https://web.archive.org/web/20141031094104/http://collections.rmg.co.uk/x");
    assert!(url.is_wayback());
    assert_eq!(url.wayback_timestamp.as_deref(), Some("20141031094104"));
    assert_eq!(
        url.archived_url.as_deref(),
        Some("http://collections.rmg.co.uk/x")
    );
    assert_eq!(url.first_level_domain.as_deref(), Some("rmg.co.uk"));
    assert_eq!(url.netloc, "collections.rmg.co.uk");
    assert_eq!(
        url.archived_at.map(|t| t.to_string()).as_deref(),
        Some("2014-10-31 09:41:04")
    );
}

#[test]
fn wayback_url_with_unusable_target_falls_back_to_archive_org() {
    let url = classifier().classify("https://web.archive.org/web/2014*/not a url");
    assert!(url.is_wayback());
    assert_eq!(url.wayback_timestamp.as_deref(), Some("2014*"));
    assert_eq!(url.archived_at, None);
    assert_eq!(url.first_level_domain.as_deref(), Some("archive.org"));
}

#[test]
fn wayback_url_without_timestamp_degrades() {
    let url = classifier().classify("https://web.archive.org/save");
    assert!(url.is_wayback());
    assert_eq!(url.wayback_timestamp, None);
    assert_eq!(url.archived_url, None);
    assert_eq!(url.first_level_domain.as_deref(), Some("archive.org"));
}

#[test]
fn missing_scheme() {
    let url = classifier().classify("//cdn.example.com/lib.js");
    assert_eq!(url.malformed, Some(MalformedReason::MissingScheme));
    assert_eq!(url.netloc, "cdn.example.com");
    assert_eq!(url.first_level_domain.as_deref(), Some("example.com"));
}

#[test]
fn unrecognized_scheme() {
    let url = classifier().classify("gopher://gopher.example.org/1/news");
    assert_eq!(url.scheme, "gopher");
    assert_eq!(url.malformed, Some(MalformedReason::UnrecognizedScheme));
    assert_eq!(url.first_level_domain.as_deref(), Some("example.org"));
}

#[test]
fn ftp_and_sftp_are_accepted() {
    for raw in ["ftp://ftp.example.org/pub", "sftp://files.example.org/x"] {
        let url = classifier().classify(raw);
        assert!(!url.is_malformed(), "{raw}");
    }
}

#[test]
fn classification_is_idempotent_on_the_effective_url() {
    let classifier = classifier();
    for raw in [
        "httpwww.quarryhs.co.uk/x.pdf",
        "127.0.0.1/test",
        "https://web.archive.org/web/20141031094104/http://collections.rmg.co.uk/x",
        "https://www.example.com/a",
    ] {
        let once = classifier.classify(raw);
        let twice = classifier.classify(once.effective());
        assert_eq!(once.effective(), twice.effective(), "{raw}");
        assert_eq!(once.first_level_domain, twice.first_level_domain, "{raw}");
    }
}

#[test]
fn private_suffixes_keep_the_owner() {
    let url = classifier().classify("https://someone.github.io/project");
    assert_eq!(url.first_level_domain.as_deref(), Some("someone.github.io"));
}

#[test]
fn caller_supplied_suffix_list() {
    let suffixes = PublicSuffixList::parse("// tiny list\ncom\nexample.com\n");
    let classifier = UrlClassifier::new(suffixes);
    let url = classifier.classify("https://a.b.example.com/x");
    assert_eq!(url.first_level_domain.as_deref(), Some("b.example.com"));

    let unknown = classifier.classify("https://www.example.org/x");
    assert_eq!(unknown.first_level_domain, None);
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let url = classifier().classify("  https://www.example.com/a \n");
    assert_eq!(url.raw, "https://www.example.com/a");
    assert_eq!(url.first_level_domain.as_deref(), Some("example.com"));
}

#[test]
fn newer_top_level_domains_have_a_first_level_domain() {
    let classifier = classifier();
    for (raw, expected) in [
        ("https://www.visitwales.wales/x", "visitwales.wales"),
        ("https://www.example.scot/", "example.scot"),
        ("https://greenpeace.ngo/a", "greenpeace.ngo"),
        ("https://abc.bbc/news", "abc.bbc"),
        ("https://news.example.cymru/", "example.cymru"),
    ] {
        let url = classifier.classify(raw);
        assert_eq!(url.first_level_domain.as_deref(), Some(expected), "{raw}");
    }
}

#[test]
fn host_is_normalized_by_the_url_parser() {
    let url = classifier().classify("HTTP://User@WWW.Example.COM:8080/Path");
    assert_eq!(url.scheme, "http");
    assert_eq!(url.netloc, "www.example.com:8080");
    assert_eq!(url.tld, "com");
    assert_eq!(url.first_level_domain.as_deref(), Some("example.com"));
    assert_eq!(url.raw, "HTTP://User@WWW.Example.COM:8080/Path");
}
