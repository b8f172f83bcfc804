//! HTTP transport with a browser-like request profile.
//!
//! The [`Transport`] trait is the only network seam in the crate. The
//! aggregator is generic over it, so tests substitute in-memory stubs.
//!
//! - [`HttpTransport`]: `reqwest` client with user agent, `Accept` header,
//!   hard timeout and opt-in insecure TLS
//! - [`RetryTransport`]: Decorator adding exponential backoff with jitter
//!   to any [`Transport`] implementation
//!
//! Every failure (DNS, connect, timeout, non-2xx, decode) is collapsed into a
//! [`TransportError`] carrying a readable cause. Nothing panics past this
//! boundary.

use rand::{Rng, rng};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Default user agent, a desktop browser string to avoid trivial bot blocks.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default `Accept` header favouring HTML.
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

/// Why a fetch produced no body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode body of {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

impl TransportError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Timeout { .. } | TransportError::Request { .. } => true,
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Fetches a page body as text.
///
/// Implementations must be stateless across calls and safe to share between
/// concurrent tasks.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub user_agent: String,
    pub timeout: Duration,
    /// Skip certificate and hostname verification. Off unless a deployment
    /// explicitly opts in.
    pub allow_insecure_transport: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            allow_insecure_transport: false,
        }
    }
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        if config.allow_insecure_transport {
            warn!("TLS certificate verification is disabled (allow_insecure_transport = true)");
        }

        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.allow_insecure_transport)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    fn map_reqwest(&self, url: &str, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else if e.is_decode() || e.is_body() {
            TransportError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

impl Transport for HttpTransport {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let parsed = url::Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let t0 = Instant::now();
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.map_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Lossy decoding: pages with stray invalid bytes still yield text.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest(url, e))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Transport`].
///
/// Only transient failures (timeouts, connection errors, 429 and 5xx) are
/// retried. The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryTransport<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryTransport<T>
where
    T: Transport,
{
    /// Wrap `inner`. With `max_retries == 0` this is a pass-through.
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTransport")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Transport for RetryTransport<T>
where
    T: Transport,
{
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !e.is_transient() {
                        if self.max_retries > 0 {
                            error!(
                                %url,
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                                error = %e,
                                "fetch() giving up"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        %url,
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
