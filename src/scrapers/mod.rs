//! Per-source extractors turning a raw page body into [`Fact`]s.
//!
//! Each submodule handles one page family. They share one contract,
//! [`SourceExtractor`], so the aggregator dispatches them without knowing
//! which sites exist.
//!
//! # Supported Sources
//!
//! | Source | Module | Page | Strategy |
//! |--------|--------|------|----------|
//! | Wikipedia | [`wikipedia`] | `/wiki/{Month}_{D}` | Events section, one candidate per line, keyword filter |
//! | Britannica | [`britannica`] | `/on-this-day/{Month}-{D}` | Year-prefixed segments, keyword filter |
//! | NASA APOD | [`apod`] | `/apod/ap{yymmdd}.html` | Whole page is one fact |
//! | OnThisDay | [`onthisday`] | `/historical-events/{Month}-{D}` | `<li>` items, keyword filter |
//! | Science News | [`sciencenews`] | `/article/date/{yyyy}/{mm}/{dd}` | `<article>` blocks, no filter |
//!
//! A page whose structure no longer matches simply yields no facts.

use chrono::NaiveDate;
use scraper::Html;

use crate::models::{Fact, Source};

pub mod apod;
pub mod britannica;
pub mod onthisday;
pub mod sciencenews;
pub mod wikipedia;

/// Keywords marking a line as plausibly about science, technology,
/// astronomy, invention or medicine.
pub const SCIENCE_KEYWORDS: &[&str] = &[
    "science",
    "scientist",
    "discovery",
    "discovered",
    "astronomy",
    "astronomer",
    "physics",
    "physicist",
    "chemistry",
    "chemist",
    "biology",
    "technology",
    "invention",
    "invented",
    "spacecraft",
    "nasa",
    "space",
    "moon",
    "apollo",
    "satellite",
    "rocket",
    "astronaut",
    "cosmonaut",
    "telescope",
    "planet",
    "comet",
    "medicine",
    "vaccine",
    "patent",
];

/// The narrower whitelist used by curated fact pages.
pub const RESEARCH_KEYWORDS: &[&str] = &["science", "discovery", "invention", "research"];

/// Turns one source's page into candidate facts.
pub trait SourceExtractor: Send + Sync {
    /// Which source this extractor reads.
    fn source(&self) -> Source;

    /// The page to fetch for `date`.
    fn page_url(&self, date: NaiveDate) -> String;

    /// Extract every valid fact from `body`, the page fetched for `date`.
    ///
    /// Candidates failing text or year validation are dropped. An empty
    /// result is not an error.
    fn extract(&self, body: &str, date: NaiveDate) -> Vec<Fact>;
}

impl Source {
    /// The extractor implementing this source.
    pub fn extractor(&self) -> Box<dyn SourceExtractor> {
        match self {
            Source::Wikipedia => Box::new(wikipedia::Wikipedia),
            Source::Britannica => Box::new(britannica::Britannica),
            Source::Apod => Box::new(apod::Apod),
            Source::OnThisDay => Box::new(onthisday::OnThisDay),
            Source::ScienceNews => Box::new(sciencenews::ScienceNews),
        }
    }
}

/// Text of an HTML fragment with entities decoded and tags dropped.
pub(crate) fn fragment_text(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect()
}

/// Elements that start a new line of visible text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "center", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// All human-visible text of a document, skipping script and style bodies.
///
/// Inline markup is joined without separators; block elements start a new line.
pub(crate) fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.root_element().descendants() {
        if let Some(el) = node.value().as_element() {
            if BLOCK_ELEMENTS.contains(&el.name()) {
                out.push('\n');
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value().as_element().is_some_and(|e| {
                matches!(e.name(), "script" | "style" | "noscript" | "template")
            })
        });
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

/// Build a fact, logging and dropping candidates that fail validation.
pub(crate) fn validated(
    source: Source,
    url: &str,
    text: String,
    year: String,
    max_year: i32,
) -> Option<Fact> {
    match Fact::new_until(source, url, text, year, max_year) {
        Ok(fact) => Some(fact),
        Err(e) => {
            tracing::trace!(%source, error = %e, "Dropping candidate");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_source_has_matching_extractor() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 20).unwrap();
        for source in Source::ALL {
            let extractor = source.extractor();
            assert_eq!(extractor.source(), source);
            let url = extractor.page_url(date);
            assert!(url::Url::parse(&url).is_ok(), "bad url {url}");
        }
    }

    #[test]
    fn test_extractors_tolerate_garbage() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 20).unwrap();
        for source in Source::ALL {
            let facts = source.extractor().extract("<<<>>> \u{0} not a page", date);
            assert!(facts.is_empty(), "{source} produced facts from garbage");
        }
    }

    #[test]
    fn test_fragment_text_keeps_inline_punctuation_attached() {
        let text = fragment_text("<a href=\"/wiki/Newton\">Isaac Newton</a>'s <i>Principia</i>, a landmark");
        assert_eq!(text, "Isaac Newton's Principia, a landmark");
    }

    #[test]
    fn test_visible_text_breaks_only_at_blocks() {
        let document = Html::parse_document(
            "<body><script>var x = 1;</script><div><span>1687</span><p>The <b>Principia</b>, published.</p></div></body>",
        );
        let text = crate::text::clean_text(&visible_text(&document));
        assert_eq!(text, "1687 The Principia, published.");
    }
}
