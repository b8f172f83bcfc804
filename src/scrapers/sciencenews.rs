//! Science News dated article-index extractor.
//!
//! The index page for a day lists `<article>` blocks, each with a heading,
//! a teaser paragraph and usually a `<time datetime="...">` stamp. Every
//! block is a fact; there is no keyword filter because the whole site is
//! science coverage.

use chrono::{Datelike, Local, NaiveDate};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use super::{SourceExtractor, validated};
use crate::models::{Fact, Source};
use crate::text::{clean_text, extract_year_until, truncate_words};

const MAX_TEASER_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, Default)]
pub struct ScienceNews;

fn first_text(block: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let el = block.select(selector).next()?;
    let text = clean_text(&el.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

/// Year from the block's `<time datetime>` stamp, if it parses as one.
fn stamped_year(block: &ElementRef<'_>, selector: &Selector, max_year: i32) -> Option<String> {
    let datetime = block.select(selector).next()?.value().attr("datetime")?;
    extract_year_until(datetime.get(..4)?, max_year)
}

impl SourceExtractor for ScienceNews {
    fn source(&self) -> Source {
        Source::ScienceNews
    }

    fn page_url(&self, date: NaiveDate) -> String {
        format!(
            "https://www.sciencenews.org/article/date/{}",
            date.format("%Y/%m/%d")
        )
    }

    #[instrument(level = "debug", skip_all, fields(%date))]
    fn extract(&self, body: &str, date: NaiveDate) -> Vec<Fact> {
        let url = self.page_url(date);
        let max_year = Local::now().year();
        let document = Html::parse_document(body);

        let article = Selector::parse("article").unwrap();
        let heading = Selector::parse("h1, h2, h3").unwrap();
        let teaser = Selector::parse("p").unwrap();
        let time = Selector::parse("time[datetime]").unwrap();

        let facts: Vec<Fact> = document
            .select(&article)
            .filter_map(|block| {
                let title = first_text(&block, &heading);
                let summary = first_text(&block, &teaser)
                    .map(|s| truncate_words(&s, MAX_TEASER_CHARS));
                let text = match (title, summary) {
                    (Some(t), Some(s)) => format!("{t}: {s}"),
                    (Some(t), None) => t,
                    (None, Some(s)) => s,
                    (None, None) => return None,
                };
                let year = stamped_year(&block, &time, max_year)
                    .or_else(|| extract_year_until(&text, max_year))
                    .unwrap_or_else(|| format!("{:04}", date.year()));
                validated(Source::ScienceNews, &url, text, year, max_year)
            })
            .collect();

        debug!(count = facts.len(), "Extracted Science News articles");
        facts
    }
}
