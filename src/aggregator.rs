//! Concurrent fan-out over every configured source and ordered merge.
//!
//! One task per extractor fetches its page through the shared [`Transport`]
//! and runs the extractor on the body. Tasks are independent: a transport
//! failure, an empty extraction or even a panicking extractor only means
//! "no facts from this source". The aggregator waits for every task, then
//! merges in configured source order and stable-sorts by year, so task
//! completion order never shows up in the output.

use chrono::NaiveDate;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::models::{Fact, Source};
use crate::scrapers::SourceExtractor;
use crate::transport::{Transport, TransportError};

/// What one source contributed to an aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// The page was parsed and produced this many facts.
    Facts(usize),
    /// The page was fetched but nothing matched.
    Empty,
    /// The page could not be fetched or parsed.
    Failed(String),
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Facts(n) => write!(f, "{n} fact(s)"),
            SourceStatus::Empty => f.write_str("no matching entries"),
            SourceStatus::Failed(cause) => write!(f, "failed: {cause}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub source: Source,
    pub url: String,
    pub status: SourceStatus,
}

/// Per-source outcomes plus the merged, year-sorted facts.
#[derive(Debug)]
pub struct AggregateReport {
    /// One entry per configured source, in configured order.
    pub outcomes: Vec<SourceOutcome>,
    pub facts: Vec<Fact>,
}

impl AggregateReport {
    /// The merged facts, or `None` when no source contributed anything.
    pub fn into_facts(self) -> Option<Vec<Fact>> {
        if self.facts.is_empty() {
            None
        } else {
            Some(self.facts)
        }
    }
}

/// Fans fetch + extract out over the configured sources.
pub struct Aggregator<T> {
    transport: T,
    extractors: Vec<Box<dyn SourceExtractor>>,
    workers: usize,
}

impl<T> fmt::Debug for Aggregator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field(
                "sources",
                &self.extractors.iter().map(|e| e.source()).collect::<Vec<_>>(),
            )
            .field("workers", &self.workers)
            .finish()
    }
}

impl<T> Aggregator<T>
where
    T: Transport,
{
    /// Aggregate over `sources` with at most `workers` fetches in flight.
    pub fn new(transport: T, sources: &[Source], workers: usize) -> Self {
        let extractors = sources.iter().map(|s| s.extractor()).collect();
        Self::with_extractors(transport, extractors, workers)
    }

    /// Aggregate over arbitrary extractors.
    pub fn with_extractors(
        transport: T,
        extractors: Vec<Box<dyn SourceExtractor>>,
        workers: usize,
    ) -> Self {
        Self {
            transport,
            extractors,
            workers: workers.max(1),
        }
    }

    /// Facts for `date` sorted by year, or `None` when every source failed
    /// or matched nothing.
    pub async fn analyze(&self, date: NaiveDate) -> Option<Vec<Fact>> {
        self.analyze_report(date).await.into_facts()
    }

    /// Like [`Aggregator::analyze`], keeping the per-source outcomes.
    #[instrument(level = "info", skip(self), fields(sources = self.extractors.len(), workers = self.workers))]
    pub async fn analyze_report(&self, date: NaiveDate) -> AggregateReport {
        let t0 = Instant::now();

        let results: Vec<(usize, SourceOutcome, Vec<Fact>)> =
            stream::iter(self.extractors.iter().enumerate())
                .map(|(index, extractor)| async move {
                    let (outcome, facts) = self.run_source(&**extractor, date).await;
                    (index, outcome, facts)
                })
                .buffer_unordered(self.workers)
                .collect()
                .await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut merged = Vec::new();
        for (_, outcome, facts) in results.into_iter().sorted_by_key(|(index, ..)| *index) {
            outcomes.push(outcome);
            merged.extend(facts);
        }

        // Stable: equal years keep source order, then in-page order.
        let facts: Vec<Fact> = merged
            .into_iter()
            .sorted_by(|a, b| a.year().cmp(b.year()))
            .collect();

        let failed = outcomes
            .iter()
            .filter(|o| matches!(o.status, SourceStatus::Failed(_)))
            .count();
        info!(
            facts = facts.len(),
            failed_sources = failed,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Aggregation complete"
        );

        AggregateReport { outcomes, facts }
    }

    async fn run_source(
        &self,
        extractor: &dyn SourceExtractor,
        date: NaiveDate,
    ) -> (SourceOutcome, Vec<Fact>) {
        let source = extractor.source();
        let url = extractor.page_url(date);

        let task = async {
            let body = self.transport.fetch(&url).await?;
            Ok::<_, TransportError>(extractor.extract(&body, date))
        };

        let (status, facts) = match AssertUnwindSafe(task).catch_unwind().await {
            Ok(Ok(facts)) if facts.is_empty() => {
                debug!(%source, %url, "Page fetched but no entries matched");
                (SourceStatus::Empty, facts)
            }
            Ok(Ok(facts)) => {
                info!(%source, count = facts.len(), "Collected facts");
                (SourceStatus::Facts(facts.len()), facts)
            }
            Ok(Err(e)) => {
                warn!(%source, %url, error = %e, "Source unavailable; skipping");
                (SourceStatus::Failed(e.to_string()), Vec::new())
            }
            Err(panic) => {
                let cause = panic_message(panic.as_ref());
                error!(%source, %url, %cause, "Extractor panicked; skipping");
                (SourceStatus::Failed(format!("extractor panicked: {cause}")), Vec::new())
            }
        };

        (SourceOutcome { source, url, status }, facts)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
