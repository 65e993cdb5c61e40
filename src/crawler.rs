//! Crawl orchestration: pagination traversal and per-job extraction.
//!
//! The session is strictly sequential. Pagination follows only the
//! designated next link, guarded by a visited-URL set so a malformed next
//! chain (including cycles) always terminates. Per-page and per-job failures
//! are recorded into the result and never abort the crawl; the only fatal
//! errors are configuration errors raised at construction, before any
//! network activity.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{ConfigError, FetchError};
use crate::fetcher::{FetchEngine, Fetcher, Sleeper};
use crate::models::{CrawlFailure, CrawlPhase, CrawlResult, JobRecord, JobSummary};
use crate::parsing::{DetailParser, ListingParser, VocabularyTagger};

pub struct Crawler {
    fetcher: Fetcher,
    listing_parser: ListingParser,
    detail_parser: DetailParser,
    tagger: VocabularyTagger,
    stage_url: String,
    max_pages: u32,
}

impl Crawler {
    pub fn new(
        config: &AppConfig,
        engine: Arc<dyn FetchEngine>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, ConfigError> {
        if config.scraper.stage_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "scraper.stage_url",
            });
        }

        Ok(Self {
            fetcher: Fetcher::new(engine, sleeper, &config.scraper),
            listing_parser: ListingParser::new(&config.scraper.base_url, &config.selectors)?,
            detail_parser: DetailParser::new(&config.selectors)?,
            tagger: VocabularyTagger::new(&config.extraction),
            stage_url: config.scraper.stage_url.clone(),
            max_pages: config.scraper.max_pages,
        })
    }

    /// Run one crawl session starting from the configured stage URL.
    ///
    /// `skip_keys` carries the keys already present in the dataset; in
    /// incremental mode their detail pages are not fetched again.
    pub async fn run(&self, skip_keys: &HashSet<String>) -> CrawlResult {
        let mut result = CrawlResult::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queued: HashSet<String> = HashSet::new();
        let mut job_queue: Vec<JobSummary> = Vec::new();

        debug!(phase = ?CrawlPhase::Start, stage_url = %self.stage_url);
        let mut current = Some(self.stage_url.clone());

        while let Some(url) = current.take() {
            if !visited.insert(url.clone()) {
                warn!("next-link chain revisits {url}, stopping pagination");
                break;
            }
            if self.max_pages > 0 && result.pages_visited >= self.max_pages {
                info!("page limit of {} reached", self.max_pages);
                break;
            }

            debug!(phase = ?CrawlPhase::FetchingListing, %url);
            info!("listing page {}: {url}", result.pages_visited + 1);

            match self.fetcher.fetch(&url).await {
                Ok(body) => {
                    result.pages_visited += 1;
                    debug!(phase = ?CrawlPhase::ExtractingJobs, %url);
                    let page = self.listing_parser.parse(&body);
                    info!("{} job summaries on {url}", page.summaries.len());

                    for summary in page.summaries {
                        if queued.insert(summary.url.clone()) {
                            job_queue.push(summary);
                        }
                    }
                    current = page.next_page_url;
                }
                Err(e) => {
                    // Without a page body there is no next link to follow.
                    warn!("listing page {url} failed: {e}");
                    result.failures.push(CrawlFailure {
                        url,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        info!(
            "pagination done: {} pages visited, {} jobs queued",
            result.pages_visited,
            job_queue.len()
        );

        for summary in job_queue {
            if skip_keys.contains(&summary.url) {
                debug!("already stored, skipping {}", summary.url);
                continue;
            }

            debug!(phase = ?CrawlPhase::FetchingDetail, url = %summary.url);
            match self.extract_job(&summary).await {
                Ok(record) => {
                    info!("extracted '{}' from {}", record.title, record.url);
                    result.records.push(record);
                }
                Err(e) => {
                    warn!("giving up on {}: {e}", summary.url);
                    result.failures.push(CrawlFailure {
                        url: summary.url,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(phase = ?CrawlPhase::Done);
        result
    }

    async fn extract_job(&self, summary: &JobSummary) -> Result<JobRecord, FetchError> {
        let body = self.fetcher.fetch(&summary.url).await?;
        let fields = self.detail_parser.parse(&body);

        // The listing title is the fallback when the detail page has none.
        let title = fields.title.unwrap_or_else(|| summary.title.clone());
        let content = fields.content.unwrap_or_default();
        let tags = self.tagger.tag(&content, fields.category.as_deref());

        Ok(JobRecord {
            key: summary.url.clone(),
            title,
            url: summary.url.clone(),
            publication_date: fields.publication_date,
            category: fields.category,
            content,
            tags,
            scraped_at: Utc::now(),
        })
    }
}
