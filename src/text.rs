//! Text normalization shared by every extractor.
//!
//! Source pages mix markup, citation markers, statistics and dates freely.
//! These helpers turn a raw fragment into display text and pull out a
//! plausible historical year, bounded at runtime by the current year.

use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::MIN_YEAR;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static CITATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static YEAR_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());

/// Strip markup and citation markers, then collapse whitespace.
///
/// Removal repeats until nothing changes, so nested leftovers such as
/// `[[1]2]` are fully removed and the function is idempotent.
///
/// # Examples
///
/// ```
/// use scifex::text::clean_text;
/// assert_eq!(clean_text("<b>1969</b>  Apollo 11 lands [14]"), "1969 Apollo 11 lands");
/// ```
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let stripped = TAG_RE.replace_all(&text, "");
        let stripped = CITATION_RE.replace_all(&stripped, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// First 4-digit year in `text` between 1000 and the current year.
pub fn extract_year(text: &str) -> Option<String> {
    extract_year_until(text, Local::now().year())
}

/// First 4-digit year token in `text` within `1000..=max_year`.
///
/// Tokens outside the range (statistics, future dates) are skipped rather
/// than ending the search.
pub fn extract_year_until(text: &str, max_year: i32) -> Option<String> {
    YEAR_TOKEN_RE
        .find_iter(text)
        .find(|m| {
            m.as_str()
                .parse::<i32>()
                .is_ok_and(|y| (MIN_YEAR..=max_year).contains(&y))
        })
        .map(|m| m.as_str().to_string())
}

/// Drop a leading `year` and the separator run after it.
///
/// `"1969 – Apollo 11"` becomes `"Apollo 11"`. Text not starting with the
/// year is returned unchanged. The separator run stops at the first ASCII
/// letter, mirroring how date pages write `"1969 – "` or `"1969: "`.
pub fn strip_leading_year(text: &str, year: &str) -> String {
    match text.strip_prefix(year) {
        Some(rest) => rest
            .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
            .to_string(),
        None => text.to_string(),
    }
}

/// Shorten `text` to at most `max` characters, cutting at a word boundary
/// and appending `…` when anything was removed.
pub fn truncate_words(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .nth(max)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut];
    let head = match head.rfind(' ') {
        Some(space) if space > 0 => &head[..space],
        _ => head,
    };
    format!("{}\u{2026}", head.trim_end())
}

/// True when `text` mentions any of `keywords` (case-insensitive substring).
pub fn matches_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}
