//! OnThisDay curated historical-events extractor.
//!
//! Events are list items (`<li class="event">`) whose text begins with the
//! year. Bodies with no list items are read line by line instead. Only items
//! mentioning research-flavoured keywords are kept.

use chrono::{Datelike, Local, NaiveDate};
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use super::{RESEARCH_KEYWORDS, SourceExtractor, fragment_text, validated};
use crate::models::{Fact, Source};
use crate::text::{clean_text, extract_year_until, matches_any, strip_leading_year};

#[derive(Debug, Clone, Copy, Default)]
pub struct OnThisDay;

/// Candidate item texts, in page order.
fn candidates(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let item = Selector::parse("li").unwrap();
    let items: Vec<String> = document
        .select(&item)
        .map(|li| li.text().collect::<String>())
        .collect();

    if items.is_empty() {
        body.lines().map(fragment_text).collect()
    } else {
        items
    }
}

impl SourceExtractor for OnThisDay {
    fn source(&self) -> Source {
        Source::OnThisDay
    }

    fn page_url(&self, date: NaiveDate) -> String {
        format!(
            "https://www.onthisday.com/historical-events/{}",
            date.format("%B-%-d")
        )
    }

    #[instrument(level = "debug", skip_all, fields(%date))]
    fn extract(&self, body: &str, date: NaiveDate) -> Vec<Fact> {
        let url = self.page_url(date);
        let max_year = Local::now().year();

        let facts: Vec<Fact> = candidates(body)
            .iter()
            .filter_map(|raw| {
                let cleaned = clean_text(raw);
                if !matches_any(&cleaned, RESEARCH_KEYWORDS) {
                    return None;
                }
                let year = extract_year_until(&cleaned, max_year)?;
                let text = strip_leading_year(&cleaned, &year);
                validated(Source::OnThisDay, &url, text, year, max_year)
            })
            .collect();

        debug!(count = facts.len(), "Extracted OnThisDay events");
        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 8).unwrap()
    }

    #[test]
    fn test_page_url() {
        assert_eq!(
            OnThisDay.page_url(date()),
            "https://www.onthisday.com/historical-events/November-8"
        );
    }

    #[test]
    fn test_list_items() {
        let body = r#"<ul class="event-list">
<li class="event"><a href="/date/1895">1895</a> Wilhelm R&ouml;ntgen makes the discovery of X-rays</li>
<li class="event"><a href="/date/1960">1960</a> John F. Kennedy is elected president</li>
<li class="event"><a href="/date/1923">1923</a> Beer Hall Putsch begins in Munich</li>
</ul>"#;
        let facts = OnThisDay.extract(body, date());
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].year(), "1895");
        assert_eq!(facts[0].text(), "Wilhelm R\u{f6}ntgen makes the discovery of X-rays");
    }

    #[test]
    fn test_plain_lines_fallback() {
        let body = "1656 Edmond Halley, whose comet research changed astronomy, is born\n\
                    2045 research lab opens\n\
                    1900 nothing relevant";
        let facts = OnThisDay.extract(body, date());
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].year(), "1656");
    }

    #[test]
    fn test_narrow_keyword_set() {
        // "spacecraft" is not in the curated whitelist.
        let facts = OnThisDay.extract("<li>1977 Voyager spacecraft launched</li>", date());
        assert!(facts.is_empty());
    }
}
