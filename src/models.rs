//! Domain records produced and persisted by the crawl pipeline.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vocabulary tags detected within a posting's free text.
///
/// Ordered sets keep the serialized output deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default)]
    pub cities: BTreeSet<String>,
    #[serde(default)]
    pub contract_types: BTreeSet<String>,
    #[serde(default)]
    pub sectors: BTreeSet<String>,
}

impl Tags {
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.contract_types.is_empty() && self.sectors.is_empty()
    }
}

/// One fully extracted job posting.
///
/// `key` is the detail-page URL: stable across runs for the same posting and
/// unique within a dataset, so re-crawls never duplicate entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub key: String,
    pub title: String,
    pub url: String,
    /// Raw publication date text, deliberately left unparsed to avoid
    /// locale-format guesswork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Tags,
    pub scraped_at: DateTime<Utc>,
}

/// A single entry extracted from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub title: String,
    pub url: String,
}

/// Parsed listing page: job summaries plus the designated next-page link.
///
/// `next_page_url` is `None` once pagination has terminated; that is the
/// normal end of traversal, not an error.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub summaries: Vec<JobSummary>,
    pub next_page_url: Option<String>,
}

/// A per-URL failure recorded during the crawl. Never aborts the session.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome of one crawl session.
#[derive(Debug, Default)]
pub struct CrawlResult {
    pub records: Vec<JobRecord>,
    pub pages_visited: u32,
    pub failures: Vec<CrawlFailure>,
}

/// Phase of a crawl session, used for progress logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Start,
    FetchingListing,
    ExtractingJobs,
    FetchingDetail,
    Done,
}
