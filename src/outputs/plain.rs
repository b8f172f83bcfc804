//! Terminal rendering of facts.

use std::fmt::Write;

use crate::aggregator::SourceOutcome;
use crate::models::Fact;

/// Shown when no source produced anything for the date.
pub const NO_RESULTS_MESSAGE: &str =
    "No verified scientific facts found for this date. Try another date!";

/// One block per fact:
///
/// ```text
/// 1969  [Wikipedia]  Apollo 11 lands on the Moon
///       https://en.wikipedia.org/wiki/July_20
/// ```
pub fn render_facts(facts: &[Fact]) -> String {
    let mut out = String::new();
    for fact in facts {
        let _ = writeln!(out, "{}  [{}]  {}", fact.year(), fact.source(), fact.text());
        let _ = writeln!(out, "      {}", fact.url());
    }
    out
}

/// One line per source, e.g. `Britannica: failed: ... returned HTTP 503`.
pub fn render_outcomes(outcomes: &[SourceOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        let _ = writeln!(out, "{}: {}", outcome.source, outcome.status);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SourceStatus;
    use crate::models::Source;

    #[test]
    fn test_render_facts() {
        let fact = Fact::new_until(
            Source::Apod,
            "https://apod.nasa.gov/apod/ap190720.html",
            "Apollo 11: Buzz Aldrin's Bootprint",
            "2019",
            2025,
        )
        .unwrap();
        assert_eq!(
            render_facts(&[fact]),
            "2019  [NASA APOD]  Apollo 11: Buzz Aldrin's Bootprint\n      https://apod.nasa.gov/apod/ap190720.html\n"
        );
        assert_eq!(render_facts(&[]), "");
    }

    #[test]
    fn test_render_outcomes() {
        let outcomes = vec![
            SourceOutcome {
                source: Source::Wikipedia,
                url: "https://en.wikipedia.org/wiki/July_20".into(),
                status: SourceStatus::Facts(3),
            },
            SourceOutcome {
                source: Source::ScienceNews,
                url: "https://www.sciencenews.org/article/date/2024/07/20".into(),
                status: SourceStatus::Empty,
            },
        ];
        assert_eq!(
            render_outcomes(&outcomes),
            "Wikipedia: 3 fact(s)\nScience News: no matching entries\n"
        );
    }
}
