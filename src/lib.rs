//! Targeted crawler for emploitogo.info job postings.
//!
//! Paginates the listing index, extracts structured fields from each detail
//! page, tags postings against city / contract-type / sector vocabularies,
//! and persists a deduplicated JSON dataset with crash-safe writes.

pub mod config;
pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod parsing;
pub mod store;

pub use config::AppConfig;
pub use crawler::Crawler;
pub use error::{ConfigError, FetchError, PersistenceError};
pub use fetcher::{FetchEngine, Fetcher, HttpEngine, Sleeper, TokioSleeper};
pub use models::{CrawlFailure, CrawlResult, JobRecord, JobSummary, ListingPage, Tags};
pub use store::Dataset;
