//! # scifex
//!
//! Gather "on this day in science" facts for a calendar date from several
//! independent public web pages, extract structured records from their HTML
//! and merge them into one year-ordered list.
//!
//! ## Architecture
//!
//! The crate is an in-process pipeline:
//! 1. **Fan-out**: [`aggregator::Aggregator`] dispatches one task per configured source
//! 2. **Fetching**: each task downloads its page through a [`transport::Transport`]
//! 3. **Extraction**: the source's [`scrapers::SourceExtractor`] turns the body into [`models::Fact`]s
//! 4. **Merge**: results are concatenated in source order and stable-sorted by year
//!
//! A source that fails or matches nothing contributes no facts; it never
//! aborts the others. When no source contributes anything the result is `None`.
//!
//! ## Usage
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use scifex::aggregator::Aggregator;
//! use scifex::models::Source;
//! use scifex::transport::{HttpTransport, TransportConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(&TransportConfig::default())?;
//! let aggregator = Aggregator::new(transport, &Source::ALL, 5);
//! let date = NaiveDate::from_ymd_opt(1969, 7, 20).unwrap();
//! match aggregator.analyze(date).await {
//!     Some(facts) => facts.iter().for_each(|f| println!("{} {}", f.year(), f.text())),
//!     None => println!("Try another date"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod text;
pub mod transport;

pub use aggregator::{AggregateReport, Aggregator, SourceOutcome, SourceStatus};
pub use models::{Fact, FactSheet, Source};
