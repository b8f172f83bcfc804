//! English Wikipedia date-page extractor.
//!
//! Date pages such as <https://en.wikipedia.org/wiki/July_20> list events as
//! one `<li>` per line under an "Events" heading, followed by "Births". Each
//! line starts with the year, e.g. `1969 – Apollo 11 lands on the Moon.[14]`.
//!
//! Only lines mentioning a science keyword are kept, and the leading year is
//! dropped from the display text.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use super::{SCIENCE_KEYWORDS, SourceExtractor, fragment_text, validated};
use crate::models::{Fact, Source};
use crate::text::{clean_text, extract_year_until, matches_any, strip_leading_year};

static EVENTS_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)id="Events"|^[\s=#]*Events[\s=]*$"#).unwrap());
static BIRTHS_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)id="Births"|^[\s=#]*Births[\s=]*$"#).unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct Wikipedia;

/// The slice of `body` between the Events and Births headings.
///
/// Bodies without an Events heading are treated as an events list already.
fn events_section(body: &str) -> &str {
    let Some(start) = EVENTS_HEADING.find(body) else {
        return body;
    };
    let rest = &body[start.end()..];
    match BIRTHS_HEADING.find(rest) {
        Some(end) => &rest[..end.start()],
        None => rest,
    }
}

impl SourceExtractor for Wikipedia {
    fn source(&self) -> Source {
        Source::Wikipedia
    }

    fn page_url(&self, date: NaiveDate) -> String {
        format!("https://en.wikipedia.org/wiki/{}", date.format("%B_%-d"))
    }

    #[instrument(level = "debug", skip_all, fields(%date))]
    fn extract(&self, body: &str, date: NaiveDate) -> Vec<Fact> {
        let url = self.page_url(date);
        let max_year = Local::now().year();

        let facts: Vec<Fact> = events_section(body)
            .lines()
            .filter_map(|line| {
                let cleaned = clean_text(&fragment_text(line));
                if !matches_any(&cleaned, SCIENCE_KEYWORDS) {
                    return None;
                }
                let year = extract_year_until(&cleaned, max_year)?;
                let text = strip_leading_year(&cleaned, &year);
                validated(Source::Wikipedia, &url, text, year, max_year)
            })
            .collect();

        debug!(count = facts.len(), "Extracted Wikipedia events");
        facts
    }
}
