//! NASA Astronomy Picture of the Day extractor.
//!
//! Each APOD page describes one picture: a bold title inside the leading
//! `<center>` block and a paragraph introduced by `Explanation:`. The whole
//! page becomes a single fact dated with the query year. The archive starts
//! on 1995-06-16, so earlier dates yield nothing.

use chrono::{Datelike, Local, NaiveDate};
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use super::{SourceExtractor, validated, visible_text};
use crate::models::{Fact, Source};
use crate::text::{clean_text, truncate_words};

const MAX_EXPLANATION_CHARS: usize = 600;

#[derive(Debug, Clone, Copy, Default)]
pub struct Apod;

impl Apod {
    /// First day of the APOD archive.
    pub fn first_issue() -> NaiveDate {
        NaiveDate::from_ymd_opt(1995, 6, 16).unwrap_or_default()
    }
}

fn title(document: &Html) -> Option<String> {
    let heading = Selector::parse("center b").unwrap();
    if let Some(el) = document.select(&heading).next() {
        let text = clean_text(&el.text().collect::<String>());
        if !text.is_empty() {
            return Some(text);
        }
    }

    // <title> APOD: 2024 July 20 - Apollo 11 Landing </title>
    let title_sel = Selector::parse("title").unwrap();
    let raw = document.select(&title_sel).next()?.text().collect::<String>();
    let text = clean_text(raw.rsplit(" - ").next().unwrap_or(&raw));
    (!text.is_empty() && !text.starts_with("APOD")).then_some(text)
}

fn explanation(document: &Html) -> Option<String> {
    let text = visible_text(document);
    let start = text.find("Explanation:")? + "Explanation:".len();
    let rest = &text[start..];
    let end = rest.find("Tomorrow's picture").unwrap_or(rest.len());
    let cleaned = clean_text(&rest[..end]);
    (!cleaned.is_empty()).then(|| truncate_words(&cleaned, MAX_EXPLANATION_CHARS))
}

impl SourceExtractor for Apod {
    fn source(&self) -> Source {
        Source::Apod
    }

    fn page_url(&self, date: NaiveDate) -> String {
        format!("https://apod.nasa.gov/apod/ap{}.html", date.format("%y%m%d"))
    }

    #[instrument(level = "debug", skip_all, fields(%date))]
    fn extract(&self, body: &str, date: NaiveDate) -> Vec<Fact> {
        if date < Self::first_issue() {
            debug!("Date predates the APOD archive");
            return Vec::new();
        }

        let document = Html::parse_document(body);
        let text = match (title(&document), explanation(&document)) {
            (Some(t), Some(e)) => format!("{t}: {e}"),
            (Some(t), None) => t,
            (None, Some(e)) => e,
            (None, None) => {
                debug!("APOD page has no title or explanation");
                return Vec::new();
            }
        };

        let year = format!("{:04}", date.year());
        validated(
            Source::Apod,
            &self.page_url(date),
            text,
            year,
            Local::now().year(),
        )
        .into_iter()
        .collect()
    }
}
