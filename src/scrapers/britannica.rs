//! Britannica "on this day" almanac extractor.
//!
//! The almanac page interleaves year labels with short blurbs. The visible
//! page text is cut into segments, each starting at a 4-digit year and
//! running up to the next one, and segments mentioning a science keyword
//! become facts. The year stays part of the display text.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::{debug, instrument};

use super::{SCIENCE_KEYWORDS, SourceExtractor, validated, visible_text};
use crate::models::{Fact, Source};
use crate::text::{clean_text, extract_year_until, matches_any, truncate_words};

static SEGMENT_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());

/// Longest blurb kept; the tail segment of a page often runs into the footer.
const MAX_SEGMENT_CHARS: usize = 400;

#[derive(Debug, Clone, Copy, Default)]
pub struct Britannica;

/// Split `text` into year-prefixed segments.
fn year_segments(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = SEGMENT_YEAR.find_iter(text).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

impl SourceExtractor for Britannica {
    fn source(&self) -> Source {
        Source::Britannica
    }

    fn page_url(&self, date: NaiveDate) -> String {
        format!(
            "https://www.britannica.com/on-this-day/{}",
            date.format("%B-%-d")
        )
    }

    #[instrument(level = "debug", skip_all, fields(%date))]
    fn extract(&self, body: &str, date: NaiveDate) -> Vec<Fact> {
        let url = self.page_url(date);
        let max_year = Local::now().year();
        let text = visible_text(&Html::parse_document(body));

        let facts: Vec<Fact> = year_segments(&text)
            .into_iter()
            .filter_map(|segment| {
                let cleaned = clean_text(segment);
                if !matches_any(&cleaned, SCIENCE_KEYWORDS) {
                    return None;
                }
                // Segments hold exactly one year token, their leading one.
                let year = extract_year_until(&cleaned, max_year)?;
                let blurb = truncate_words(&cleaned, MAX_SEGMENT_CHARS);
                validated(Source::Britannica, &url, blurb, year, max_year)
            })
            .collect();

        debug!(count = facts.len(), "Extracted Britannica events");
        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 5).unwrap()
    }

    #[test]
    fn test_page_url() {
        assert_eq!(
            Britannica.page_url(date()),
            "https://www.britannica.com/on-this-day/July-5"
        );
    }

    #[test]
    fn test_year_segments() {
        let segments = year_segments("intro 1687 Newton publishes 1996 Dolly born");
        assert_eq!(segments, vec!["1687 Newton publishes ", "1996 Dolly born"]);
        assert!(year_segments("no years").is_empty());
    }

    #[test]
    fn test_extracts_keyword_segments() {
        let body = r#"<html><head><script>var launched = 1999;</script></head><body>
<div class="card"><span>1687</span><p>Isaac Newton publishes the <b>Principia</b>, a landmark of physics.</p></div>
<div class="card"><span>1950</span><p>Acme Corp profits rise.</p></div>
<div class="card"><span>1996</span><p>Dolly the sheep, the first cloned mammal, is born in a biology lab.</p></div>
<div class="card"><span>2045</span><p>Acme Corp profits rise after a science fair.</p></div>
</body></html>"#;
        let facts = Britannica.extract(body, date());
        let years: Vec<&str> = facts.iter().map(|f| f.year()).collect();
        assert_eq!(years, vec!["1687", "1996"]);
        assert_eq!(
            facts[0].text(),
            "1687 Isaac Newton publishes the Principia, a landmark of physics."
        );
        assert!(facts.iter().all(|f| f.url() == "https://www.britannica.com/on-this-day/July-5"));
    }

    #[test]
    fn test_long_tail_segment_is_truncated() {
        let body = format!("<p>1957 Sputnik 1, the first satellite, {}</p>", "word ".repeat(200));
        let facts = Britannica.extract(&body, date());
        assert_eq!(facts.len(), 1);
        assert!(facts[0].text().chars().count() <= MAX_SEGMENT_CHARS + 1);
        assert!(facts[0].text().ends_with('\u{2026}'));
    }
}
