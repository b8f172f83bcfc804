//! Runtime configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional YAML file, and command-line flags (see [`crate::cli::Cli`]).
//!
//! ```yaml
//! timeout_secs: 10
//! workers: 5
//! retries: 0
//! allow_insecure_transport: false
//! sources: [wikipedia, britannica, apod, on-this-day, science-news]
//! ```

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

use crate::models::Source;
use crate::transport::{DEFAULT_USER_AGENT, TransportConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Scraper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Per-fetch timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum sources fetched concurrently.
    pub workers: usize,
    /// Extra attempts for transient fetch failures.
    pub retries: usize,
    /// Skip TLS certificate and hostname verification.
    pub allow_insecure_transport: bool,
    pub user_agent: String,
    /// Sources to query, in dispatch order. Empty means all.
    pub sources: Vec<Source>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            workers: 5,
            retries: 0,
            allow_insecure_transport: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sources: Source::ALL.to_vec(),
        }
    }
}

impl ScraperConfig {
    /// Load from a YAML file. Missing keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded configuration");
        Ok(config.normalized())
    }

    /// Clamp numeric settings to usable values and de-duplicate sources.
    pub fn normalized(mut self) -> Self {
        self.timeout_secs = self.timeout_secs.max(1);
        self.workers = self.workers.max(1);
        self.sources = if self.sources.is_empty() {
            Source::ALL.to_vec()
        } else {
            self.sources.into_iter().unique().collect()
        };
        self
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            allow_insecure_transport: self.allow_insecure_transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_behaviour() {
        let config = ScraperConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.workers, 5);
        assert_eq!(config.retries, 0);
        assert!(!config.allow_insecure_transport);
        assert_eq!(config.sources, Source::ALL.to_vec());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ScraperConfig =
            serde_yaml::from_str("workers: 2\nsources: [apod, wikipedia]\n").unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.sources, vec![Source::Apod, Source::Wikipedia]);
    }

    #[test]
    fn test_normalized() {
        let config = ScraperConfig {
            timeout_secs: 0,
            workers: 0,
            sources: vec![Source::Apod, Source::Wikipedia, Source::Apod],
            ..ScraperConfig::default()
        }
        .normalized();
        assert_eq!(config.timeout_secs, 1);
        assert_eq!(config.workers, 1);
        assert_eq!(config.sources, vec![Source::Apod, Source::Wikipedia]);

        let empty = ScraperConfig {
            sources: vec![],
            ..ScraperConfig::default()
        }
        .normalized();
        assert_eq!(empty.sources, Source::ALL.to_vec());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allow_insecure_transport: true\ntimeout_secs: 3").unwrap();

        let config = ScraperConfig::load(file.path()).unwrap();
        assert!(config.allow_insecure_transport);
        assert_eq!(config.transport().timeout, Duration::from_secs(3));
        assert!(config.transport().allow_insecure_transport);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            ScraperConfig::load("/definitely/not/here.yaml"),
            Err(ConfigError::Read { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sources: [not-a-source]").unwrap();
        assert!(matches!(
            ScraperConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
