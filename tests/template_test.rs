use rs_wikirefs::wikitext::{filter_templates, parse};
use rs_wikirefs::{Error, Template, TemplateParser, UrlClassifier};

fn template(src: &str) -> Template {
    let nodes = parse(src);
    let node = filter_templates(&nodes)[0];
    match TemplateParser::parse(node) {
        Ok(template) => template,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn keys_are_normalized() {
    let t = template(
        "{{cite web|accessdate=1 May 2010|archiveurl=https://web.archive.org/web/20100715195638/http://www.ine.cl/x|archive-date=15 July 2010}}",
    );
    let keys: Vec<&str> = t.parameters.keys().collect();
    assert_eq!(keys, vec!["access_date", "archive_url", "archive_date"]);
}

#[test]
fn archived_url_reports_target_domain() {
    let t = template(
        "{{cite web|accessdate=1 May 2010|archiveurl=https://web.archive.org/web/20100715195638/http://www.ine.cl/x}}",
    );
    let urls = t.urls(&UrlClassifier::default());
    assert_eq!(urls.len(), 1);
    assert_eq!(urls[0].first_level_domain.as_deref(), Some("ine.cl"));
}

#[test]
fn name_is_trimmed_and_lowercased() {
    let t = template("{{  Cite Journal <!-- x -->\n|title=T}}");
    assert_eq!(t.name, "cite journal");
}

#[test]
fn class_becomes_news_class() {
    let t = template("{{cite arxiv|eprint=1234.5678|class=astro-ph}}");
    assert_eq!(t.parameters.get("news_class"), Some("astro-ph"));
    assert!(!t.parameters.contains_key("class"));
}

#[test]
fn author_links_are_aliased() {
    let t = template("{{cite book|authorlink1=Thor Heyerdahl|author-link2=Arne Skjølsvold}}");
    assert_eq!(t.parameters.get("author_link1"), Some("Thor Heyerdahl"));
    assert_eq!(t.parameters.get("author_link2"), Some("Arne Skjølsvold"));
}

#[test]
fn comments_are_removed_from_values() {
    let t = template("{{cite web|title=Moai<!-- statues --> of Rapa Nui|url=http://a.example/}}");
    assert_eq!(t.parameters.get("title"), Some("Moai of Rapa Nui"));
    assert_eq!(t.title(), Some("Moai of Rapa Nui"));
}

#[test]
fn positional_values_keep_whitespace() {
    let t = template("{{citeq| Q123 }}");
    assert_eq!(t.parameters.get("1"), Some(" Q123 "));
    assert_eq!(t.first_parameter(), Some(" Q123 "));
    assert!(!t.missing_or_empty_first_parameter());
}

#[test]
fn missing_first_parameter() {
    let t = template("{{cite web|url=http://a.example/}}");
    assert!(t.missing_or_empty_first_parameter());
    let empty = template("{{citeq|}}");
    assert!(empty.missing_or_empty_first_parameter());
}

#[test]
fn isbn_from_parameter_or_isbn_template() {
    let book = template("{{cite book|title=Aku-Aku|ISBN=978-0-14-001057-9}}");
    assert_eq!(book.isbn.as_deref(), Some("978-0-14-001057-9"));

    let isbn = template("{{ISBN|0-14-001057-X}}");
    assert_eq!(isbn.name, "isbn");
    assert_eq!(isbn.isbn.as_deref(), Some("0-14-001057-X"));
}

#[test]
fn every_url_key_is_classified() {
    let t = template(
        "{{cite conference|url=http://a.example.org/|conference-url=http://b.example.org/|transcripturl=http://c.example.org/|chapter-url=http://d.example.org/|website=http://ignored.example.org/}}",
    );
    assert_eq!(
        t.raw_urls(),
        vec![
            "http://a.example.org/",
            "http://b.example.org/",
            "http://c.example.org/",
            "http://d.example.org/",
        ]
    );
}

#[test]
fn repeated_keys_keep_first_position_and_last_value() {
    let t = template("{{cite web|title=One|url=http://a.example/|title=Two}}");
    let pairs: Vec<(&str, &str)> = t.parameters.iter().collect();
    assert_eq!(pairs, vec![("title", "Two"), ("url", "http://a.example/")]);
}

#[test]
fn serializes_as_name_parameters_isbn() {
    let t = template("{{cite book|title=B|isbn=123}}");
    let json = serde_json::to_string(&t).expect("json");
    assert_eq!(
        json,
        r#"{"name":"cite book","parameters":{"title":"B","isbn":"123"},"isbn":"123"}"#
    );
}

#[test]
fn nameless_template_is_unparseable() {
    let nodes = parse("{{<!-- nothing -->|a=b}}");
    let node = filter_templates(&nodes)[0];
    assert!(matches!(
        TemplateParser::parse(node),
        Err(Error::UnparseableTemplate(_))
    ));
}
