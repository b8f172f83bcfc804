//! Data models for scraped facts and their presentation payload.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`Source`]: The closed set of pages facts can come from
//! - [`Fact`]: One validated `(source, url, text, year)` record
//! - [`FactSheet`]: The ordered facts for one query date, ready for output
//!
//! A [`Fact`] can only be built through [`Fact::new`], which enforces the
//! record invariants. Once built it is never mutated.

use chrono::{Datelike, Local, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Earliest year a fact may carry.
pub const MIN_YEAR: i32 = 1000;

/// A page family that facts are scraped from.
///
/// Each variant owns exactly one extractor (see [`Source::extractor`]).
/// The serialized and command-line form is kebab-case (`science-news`),
/// the display form is the human label (`Science News`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// English Wikipedia date page.
    Wikipedia,
    /// Britannica "on this day" almanac.
    Britannica,
    /// NASA Astronomy Picture of the Day bulletin.
    Apod,
    /// OnThisDay curated historical events.
    OnThisDay,
    /// Science News dated article index.
    ScienceNews,
}

impl Source {
    /// Every source, in default dispatch order.
    pub const ALL: [Source; 5] = [
        Source::Wikipedia,
        Source::Britannica,
        Source::Apod,
        Source::OnThisDay,
        Source::ScienceNews,
    ];

    /// Human-readable label used in output.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Wikipedia => "Wikipedia",
            Source::Britannica => "Britannica",
            Source::Apod => "NASA APOD",
            Source::OnThisDay => "OnThisDay",
            Source::ScienceNews => "Science News",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a candidate record is rejected by [`Fact::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    #[error("fact text is empty")]
    EmptyText,
    #[error("year {0:?} is not a four-digit year between 1000 and the current year")]
    YearOutOfRange(String),
    #[error("url {0:?} is not an absolute URL")]
    InvalidUrl(String),
}

/// One candidate "on this day in science" record.
///
/// Fields are private and deserialization goes through [`Fact::new`], so
/// every instance has non-empty text, an absolute URL and a year in
/// `1000..=current_year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFact")]
pub struct Fact {
    source: Source,
    url: String,
    text: String,
    year: String,
}

/// Unchecked wire form of a [`Fact`].
#[derive(Deserialize)]
struct RawFact {
    source: Source,
    url: String,
    text: String,
    year: String,
}

impl TryFrom<RawFact> for Fact {
    type Error = FactError;

    fn try_from(raw: RawFact) -> Result<Self, Self::Error> {
        Fact::new(raw.source, raw.url, raw.text, raw.year)
    }
}

impl Fact {
    /// Validate and build a fact, bounding the year by the current year.
    pub fn new(
        source: Source,
        url: impl Into<String>,
        text: impl Into<String>,
        year: impl Into<String>,
    ) -> Result<Self, FactError> {
        Self::new_until(source, url, text, year, Local::now().year())
    }

    /// Like [`Fact::new`] with an explicit upper bound for the year.
    pub fn new_until(
        source: Source,
        url: impl Into<String>,
        text: impl Into<String>,
        year: impl Into<String>,
        max_year: i32,
    ) -> Result<Self, FactError> {
        let url = url.into();
        let text = text.into();
        let year = year.into();

        if text.trim().is_empty() {
            return Err(FactError::EmptyText);
        }

        let in_range = year.len() == 4
            && year.bytes().all(|b| b.is_ascii_digit())
            && year
                .parse::<i32>()
                .is_ok_and(|y| (MIN_YEAR..=max_year).contains(&y));
        if !in_range {
            return Err(FactError::YearOutOfRange(year));
        }

        match Url::parse(&url) {
            Ok(parsed) if parsed.has_host() => {}
            _ => return Err(FactError::InvalidUrl(url)),
        }

        Ok(Self {
            source,
            url,
            text,
            year,
        })
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// The page the fact was read from, for user-facing verification.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Four-digit year string. Lexical order equals numeric order.
    pub fn year(&self) -> &str {
        &self.year
    }
}

/// The ordered facts for a single query date.
///
/// Serialized as the JSON output of the command-line tool.
#[derive(Debug, Serialize, Deserialize)]
pub struct FactSheet {
    /// The query date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Facts sorted by year, oldest first.
    pub facts: Vec<Fact>,
}

impl FactSheet {
    pub fn new(date: NaiveDate, facts: Vec<Fact>) -> Self {
        Self { date, facts }
    }
}
