//! HTTP fetching with retry and a mandatory politeness throttle.
//!
//! The transport sits behind the [`FetchEngine`] trait so the pipeline can be
//! exercised against canned HTML in tests, and the inter-request delay sits
//! behind [`Sleeper`] so tests can run with a no-op clock.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::error::FetchError;

/// Transport collaborator: fetch one URL, return the body or a failure.
#[async_trait]
pub trait FetchEngine: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Clock seam for the politeness throttle.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// reqwest-backed transport engine with a fixed user agent and timeout.
pub struct HttpEngine {
    client: Client,
}

impl HttpEngine {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchEngine for HttpEngine {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

/// Retrying fetcher that enforces the crawl's politeness contract.
pub struct Fetcher {
    engine: Arc<dyn FetchEngine>,
    sleeper: Arc<dyn Sleeper>,
    max_retries: u32,
    delay: Duration,
}

impl Fetcher {
    pub fn new(
        engine: Arc<dyn FetchEngine>,
        sleeper: Arc<dyn Sleeper>,
        config: &ScraperConfig,
    ) -> Self {
        Self {
            engine,
            sleeper,
            max_retries: config.max_retries,
            delay: Duration::from_secs(config.delay_between_requests),
        }
    }

    /// Fetch a page body, retrying transient failures up to `max_retries`
    /// extra attempts with a fixed inter-attempt delay.
    ///
    /// Every attempt, success or not, is followed by the configured delay.
    /// That pause is a rate limit owed to the target site; callers must not
    /// bypass it.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let attempts = self.max_retries + 1;
        let mut last_error = None;

        for attempt in 1..=attempts {
            debug!("GET {url} (attempt {attempt}/{attempts})");
            let result = self.engine.fetch(url).await;
            self.sleeper.sleep(self.delay).await;

            match result {
                Ok(body) => {
                    debug!("fetched {url} ({} bytes) on attempt {attempt}", body.len());
                    return Ok(body);
                }
                Err(e) => {
                    warn!("attempt {attempt}/{attempts} failed for {url}: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts,
            last: Box::new(last_error.unwrap_or_else(|| FetchError::Network {
                url: url.to_string(),
                message: "no attempt was made".to_string(),
            })),
        })
    }
}
