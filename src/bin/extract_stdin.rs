//! Simple CLI that reads wikitext from stdin and prints the JSON report.
//! An optional first argument names a rendered HTML file for the cite-ref pass.

use rs_wikirefs::{extract_page_bytes, PageReport};
use serde::Serialize;
use std::io::{self, Read};

#[derive(Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    report: Option<PageReport>,
}

fn main() {
    let mut wikitext = Vec::new();
    if io::stdin().read_to_end(&mut wikitext).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let html = std::env::args().nth(1).and_then(|path| match std::fs::read(&path) {
        Ok(bytes) => Some(rs_wikirefs::encoding::transcode_to_utf8(&bytes)),
        Err(err) => {
            eprintln!("Failed to read {path}: {err}");
            None
        }
    });

    let result = extract_page_bytes(&wikitext).map(|mut page| {
        #[cfg(feature = "citeref")]
        if let Some(html) = &html {
            page.cite_refs = rs_wikirefs::citeref::extract_cite_refs(html);
        }
        #[cfg(not(feature = "citeref"))]
        if html.is_some() {
            eprintln!("Built without the citeref feature, ignoring html");
        }
        page.report()
    });

    let output = match result {
        Ok(report) => Output {
            error: None,
            report: Some(report),
        },
        Err(err) => Output {
            error: Some(err.to_string()),
            report: None,
        },
    };

    println!("{}", serde_json::to_string(&output).unwrap_or_default());
}
