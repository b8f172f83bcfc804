//! Command-line interface definitions for scifex.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Flags override values from the optional YAML config file.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::config::ScraperConfig;
use crate::models::Source;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per fact: year, source, text, link.
    #[default]
    Text,
    /// The fact sheet as pretty-printed JSON.
    Json,
}

/// Command-line arguments for scifex.
///
/// # Examples
///
/// ```sh
/// # Today's facts from every source
/// scifex
///
/// # A specific date, two sources, JSON output
/// scifex --date 1969-07-20 --source wikipedia --source apod --format json
///
/// # Reach sites with broken certificates (opt-in)
/// SCIFEX_ALLOW_INSECURE=true scifex --date 2024-07-20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Calendar date to look up (YYYY-MM-DD). Defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "SCIFEX_CONFIG")]
    pub config: Option<String>,

    /// Restrict to these sources (repeatable)
    #[arg(short, long = "source", value_enum)]
    pub sources: Vec<Source>,

    /// Maximum number of sources fetched concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-fetch timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Retries for transient fetch failures
    #[arg(long)]
    pub retries: Option<usize>,

    /// Disable TLS certificate verification
    #[arg(
        long,
        env = "SCIFEX_ALLOW_INSECURE",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub allow_insecure_transport: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the fact sheet as `{dir}/{date}.json`
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

impl Cli {
    /// Layer the flags that were given on top of `base`.
    pub fn apply(&self, mut base: ScraperConfig) -> ScraperConfig {
        if !self.sources.is_empty() {
            base.sources = self.sources.clone();
        }
        if let Some(workers) = self.workers {
            base.workers = workers;
        }
        if let Some(timeout) = self.timeout_secs {
            base.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            base.retries = retries;
        }
        if self.allow_insecure_transport {
            base.allow_insecure_transport = true;
        }
        base.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["scifex"]);
        assert!(cli.date.is_none());
        assert!(cli.sources.is_empty());
        assert!(!cli.allow_insecure_transport);
        assert_eq!(cli.format, OutputFormat::Text);

        let config = cli.apply(ScraperConfig::default());
        assert_eq!(config, ScraperConfig::default());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "scifex",
            "--date",
            "1969-07-20",
            "--source",
            "wikipedia",
            "--source",
            "on-this-day",
            "--workers",
            "2",
            "--format",
            "json",
            "--allow-insecure-transport",
        ]);

        assert_eq!(cli.date, NaiveDate::from_ymd_opt(1969, 7, 20));
        assert_eq!(cli.sources, vec![Source::Wikipedia, Source::OnThisDay]);
        assert_eq!(cli.format, OutputFormat::Json);

        let config = cli.apply(ScraperConfig::default());
        assert_eq!(config.workers, 2);
        assert!(config.allow_insecure_transport);
        assert_eq!(config.sources, vec![Source::Wikipedia, Source::OnThisDay]);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["scifex", "-d", "2024-02-29", "-s", "apod", "-j", "/tmp/json"]);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(cli.sources, vec![Source::Apod]);
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
    }

    /// Parse with the insecure flag read from `var` instead of the real
    /// variable, so tests never race on shared process environment.
    fn parse_with_insecure_env(var: &'static str, value: &str) -> Result<Cli, clap::Error> {
        use clap::{CommandFactory, FromArgMatches};

        // SAFETY: each caller uses its own variable name.
        unsafe { std::env::set_var(var, value) };
        let command = Cli::command().mut_arg("allow_insecure_transport", |arg| arg.env(var));
        let matches = command.try_get_matches_from(["scifex"])?;
        Cli::from_arg_matches(&matches)
    }

    #[test]
    fn test_insecure_env_accepts_common_truthy_values() {
        let cases = [
            ("SCIFEX_TEST_INSECURE_ONE", "1"),
            ("SCIFEX_TEST_INSECURE_YES", "yes"),
            ("SCIFEX_TEST_INSECURE_TRUE", "true"),
            ("SCIFEX_TEST_INSECURE_ON", "on"),
        ];
        for (var, value) in cases {
            let cli = parse_with_insecure_env(var, value).unwrap();
            assert!(cli.allow_insecure_transport, "{value} should enable");
        }
    }

    #[test]
    fn test_insecure_env_accepts_falsey_values() {
        let cases = [
            ("SCIFEX_TEST_INSECURE_ZERO", "0"),
            ("SCIFEX_TEST_INSECURE_NO", "no"),
            ("SCIFEX_TEST_INSECURE_FALSE", "false"),
            ("SCIFEX_TEST_INSECURE_OFF", "off"),
        ];
        for (var, value) in cases {
            let cli = parse_with_insecure_env(var, value).unwrap();
            assert!(!cli.allow_insecure_transport, "{value} should disable");
        }
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["scifex", "--date", "2024-02-30"]).is_err());
    }
}
