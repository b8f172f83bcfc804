//! # scifex
//!
//! Command-line front end: looks up "on this day in science" facts for a
//! date across every configured source and prints them oldest first.
//!
//! ## Usage
//!
//! ```sh
//! scifex --date 1969-07-20
//! scifex --source wikipedia --source apod --format json -j ./json
//! ```

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use scifex::aggregator::Aggregator;
use scifex::cli::{Cli, OutputFormat};
use scifex::config::ScraperConfig;
use scifex::models::FactSheet;
use scifex::outputs::{json, plain};
use scifex::transport::{HttpTransport, RetryTransport};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("scifex starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let base = match &args.config {
        Some(path) => ScraperConfig::load(path)?,
        None => ScraperConfig::default(),
    };
    let config = args.apply(base);
    info!(
        sources = ?config.sources,
        workers = config.workers,
        timeout_secs = config.timeout_secs,
        retries = config.retries,
        insecure = config.allow_insecure_transport,
        "Configuration resolved"
    );

    // ---- Aggregate ----
    let transport = HttpTransport::new(&config.transport())?;
    let transport = RetryTransport::new(transport, config.retries, Duration::from_secs(1));
    let aggregator = Aggregator::new(transport, &config.sources, config.workers);

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    info!(%date, "Looking up facts");

    let report = aggregator.analyze_report(date).await;
    eprint!("{}", plain::render_outcomes(&report.outcomes));

    let facts = report.into_facts();
    let found = facts.is_some();
    let sheet = FactSheet::new(date, facts.unwrap_or_default());

    // ---- Output ----
    match args.format {
        OutputFormat::Text if found => print!("{}", plain::render_facts(&sheet.facts)),
        OutputFormat::Text => println!("{}", plain::NO_RESULTS_MESSAGE),
        OutputFormat::Json => {
            if !found {
                eprintln!("{}", plain::NO_RESULTS_MESSAGE);
            }
            println!("{}", json::to_json(&sheet)?);
        }
    }

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_fact_sheet(&sheet, dir).await {
            error!(path = %dir, error = %e, "Failed to write JSON fact sheet");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        facts = sheet.facts.len(),
        "Execution complete"
    );

    Ok(())
}
