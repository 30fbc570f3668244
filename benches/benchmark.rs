//! Performance benchmarks for rs-wikirefs.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - A small synthetic article for microbenchmarks
//! - The Easter Island fixtures under `tests/data/` for realistic input
//! - URL classification on its own

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_wikirefs::{extract_page, extract_page_with_options, Options, PageExtractionEngine, UrlClassifier};
use std::fs;

const SAMPLE_WIKITEXT: &str = r#"'''Sample''' is an island.<ref name="a">{{cite web|url=https://www.example.org/a|title=A|access-date=1 May 2010}}</ref>
It has a harbour.<ref name="a"/> Rats arrived early.{{sfn|Doe|2005|p=7}}

== History ==
Settlers arrived by canoe.<ref>{{cite journal|title=Voyages|archiveurl=https://web.archive.org/web/20100501000000/http://journal.example.com/v}}</ref>

== References ==
{{Reflist}}

== Bibliography ==
* {{cite book|last=Doe|first=J.|title=Islands|isbn=978-0-00-000000-0}}
* {{cite book|last=Roe|first=R.|title=Harbours}}

== External links ==
* [http://www.example.net/ Example]
"#;

fn bench_extract_default(c: &mut Criterion) {
    c.bench_function("extract_default", |b| {
        b.iter(|| extract_page(black_box(SAMPLE_WIKITEXT)));
    });
}

fn bench_extract_without_claims(c: &mut Criterion) {
    let options = Options {
        extract_claims: false,
        ..Options::default()
    };

    c.bench_function("extract_without_claims", |b| {
        b.iter(|| extract_page_with_options(black_box(SAMPLE_WIKITEXT), black_box(&options)));
    });
}

/// Benchmark the fixture excerpts with a shared engine
fn bench_fixtures(c: &mut Criterion) {
    let engine = PageExtractionEngine::default();
    let fixtures = ["easter_island_head.wiki", "easter_island_tail.wiki"];

    let mut group = c.benchmark_group("fixtures");

    for filename in &fixtures {
        let path = format!("tests/data/{filename}");
        if let Ok(wikitext) = fs::read_to_string(&path) {
            let size_kb = wikitext.len() / 1024;
            group.throughput(Throughput::Bytes(wikitext.len() as u64));
            group.bench_with_input(
                BenchmarkId::new("extract_page", format!("{filename} ({size_kb}KB)")),
                &wikitext,
                |b, wikitext| {
                    b.iter(|| engine.extract_page(black_box(wikitext)));
                },
            );
        }
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let classifier = UrlClassifier::default();
    let urls = [
        "https://www.ine.cl/censo",
        "httpwww.example.co.uk/page",
        "https://web.archive.org/web/20100501000000/http://journal.example.com/v",
        "http://127.0.0.1:8080/status",
    ];

    c.bench_function("classify", |b| {
        b.iter(|| {
            for url in &urls {
                black_box(classifier.classify(black_box(url)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_extract_default,
    bench_extract_without_claims,
    bench_fixtures,
    bench_classify
);
criterion_main!(benches);
