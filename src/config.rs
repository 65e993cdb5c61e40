//! Configuration for the emploitogo.info crawl.
//!
//! All site-specific knowledge — URLs, CSS selectors, vocabulary lists —
//! lives here as data, so the extraction logic stays selector-agnostic and
//! can be exercised against synthetic HTML fixtures.
//!
//! A selector string may be a comma-separated list; alternatives are tried
//! left to right and the first match wins.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;
use url::Url;

use crate::error::ConfigError;
use crate::parsing::compile_selector_list;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
    pub extraction: ExtractionConfig,
    pub logging: LoggingConfig,
}

/// Crawl behavior: target URLs, throttling and retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root, used to resolve relative hrefs.
    pub base_url: String,
    /// First listing page of the crawl.
    pub stage_url: String,
    /// Mandatory pause after every request, in seconds. This is a rate limit
    /// owed to the target site, not a tunable backoff.
    pub delay_between_requests: u64,
    /// Extra attempts after the first failed one.
    pub max_retries: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Listing pages to visit at most; 0 means unlimited.
    pub max_pages: u32,
    /// Skip detail pages whose URL is already in the dataset.
    pub incremental: bool,
}

/// Output dataset location and backup policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub file: PathBuf,
    pub backup_enabled: bool,
}

/// CSS selectors for both page types. Site markup knowledge stays here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One listing-page job article.
    pub job_articles: String,
    /// Title link inside an article; yields both title text and detail href.
    pub job_title_link: String,
    /// All pagination links, numbered ones included. Informational only:
    /// traversal never infers page order from these.
    pub pagination: String,
    /// The designated "next" link. The only selector pagination follows.
    pub next_page: String,
    pub title: String,
    pub publication_date: String,
    pub category: String,
    pub content: String,
}

/// Vocabulary lists matched against posting text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub african_cities: Vec<String>,
    pub contract_types: Vec<String>,
    pub sectors: Vec<String>,
}

/// Logging settings for the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: String,
}

/// Default values for every setting, in one place.
pub mod defaults {
    pub const BASE_URL: &str = "https://www.emploitogo.info";
    pub const STAGE_URL: &str = "https://www.emploitogo.info/emploitogo/";
    pub const DELAY_BETWEEN_REQUESTS_SECS: u64 = 3;
    pub const MAX_RETRIES: u32 = 3;
    pub const TIMEOUT_SECS: u64 = 30;
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    pub const MAX_PAGES: u32 = 5;

    pub const OUTPUT_FILE: &str = "data/jobs_data.json";
    pub const BACKUP_ENABLED: bool = true;

    pub const JOB_ARTICLES: &str = ".post-item";
    pub const JOB_TITLE_LINK: &str = ".entry-title a";
    pub const PAGINATION: &str = ".pages-numbers .pagi-item[href]";
    pub const NEXT_PAGE: &str = ".pages-numbers .pagi-item-next[href]";
    pub const TITLE: &str = "h1.entry-title, h1";
    pub const PUBLICATION_DATE: &str = ".meta-date, time, .published, .post-date";
    pub const CATEGORY: &str = ".meta-firstcat, .category, .post-category";
    pub const CONTENT: &str = ".entry-content, .post-content";

    pub const LOG_LEVEL: &str = "info";

    pub const AFRICAN_CITIES: &[&str] = &[
        "Lomé",
        "Kara",
        "Sokodé",
        "Kpalimé",
        "Atakpamé",
        "Tsévié",
        "Aného",
        "Dapaong",
        "Abidjan",
        "Douala",
        "Yaoundé",
        "Dakar",
        "Cotonou",
        "Ouagadougou",
        "Bamako",
        "Accra",
        "Lagos",
        "Kinshasa",
        "Libreville",
        "Niamey",
    ];

    pub const CONTRACT_TYPES: &[&str] = &[
        "CDI",
        "CDD",
        "Stage",
        "Freelance",
        "Consultant",
        "Temps partiel",
        "Temps plein",
        "Bénévolat",
        "Interim",
        "Apprentissage",
    ];

    pub const SECTORS: &[&str] = &[
        "Informatique",
        "Technologies",
        "Finance",
        "Banque",
        "Assurance",
        "Santé",
        "Médical",
        "Education",
        "Formation",
        "Commerce",
        "Marketing",
        "Communication",
        "Logistique",
        "Transport",
        "Agriculture",
        "Industrie",
        "Construction",
        "BTP",
        "Humanitaire",
        "ONG",
        "Consulting",
        "Juridique",
        "Ressources Humaines",
        "Comptabilité",
        "Audit",
        "Génie Civil",
    ];
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            stage_url: defaults::STAGE_URL.to_string(),
            delay_between_requests: defaults::DELAY_BETWEEN_REQUESTS_SECS,
            max_retries: defaults::MAX_RETRIES,
            timeout_secs: defaults::TIMEOUT_SECS,
            user_agent: defaults::USER_AGENT.to_string(),
            max_pages: defaults::MAX_PAGES,
            incremental: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(defaults::OUTPUT_FILE),
            backup_enabled: defaults::BACKUP_ENABLED,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            job_articles: defaults::JOB_ARTICLES.to_string(),
            job_title_link: defaults::JOB_TITLE_LINK.to_string(),
            pagination: defaults::PAGINATION.to_string(),
            next_page: defaults::NEXT_PAGE.to_string(),
            title: defaults::TITLE.to_string(),
            publication_date: defaults::PUBLICATION_DATE.to_string(),
            category: defaults::CATEGORY.to_string(),
            content: defaults::CONTENT.to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        fn owned(terms: &[&str]) -> Vec<String> {
            terms.iter().map(|t| t.to_string()).collect()
        }
        Self {
            african_cities: owned(defaults::AFRICAN_CITIES),
            contract_types: owned(defaults::CONTRACT_TYPES),
            sectors: owned(defaults::SECTORS),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file. Missing fields fall back to
    /// their defaults, so a partial override file is enough.
    pub async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Unreadable {
                path: path.display().to_string(),
                source,
            })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
                path: path.display().to_string(),
                source,
            })?;

        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate everything the crawl depends on, before any network activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_url("scraper.base_url", &self.scraper.base_url)?;
        Self::require_url("scraper.stage_url", &self.scraper.stage_url)?;

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "scraper.user_agent",
            });
        }
        if self.output.file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "output.file",
            });
        }

        compile_selector_list("selectors.job_articles", &self.selectors.job_articles)?;
        compile_selector_list("selectors.job_title_link", &self.selectors.job_title_link)?;
        compile_selector_list("selectors.pagination", &self.selectors.pagination)?;
        compile_selector_list("selectors.next_page", &self.selectors.next_page)?;
        compile_selector_list("selectors.title", &self.selectors.title)?;
        compile_selector_list(
            "selectors.publication_date",
            &self.selectors.publication_date,
        )?;
        compile_selector_list("selectors.category", &self.selectors.category)?;
        compile_selector_list("selectors.content", &self.selectors.content)?;

        Ok(())
    }

    fn require_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField { field });
        }
        Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_stage_url_is_rejected() {
        let mut config = AppConfig::default();
        config.scraper.stage_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField {
                field: "scraper.stage_url"
            })
        ));
    }

    #[test]
    fn malformed_selector_is_rejected() {
        let mut config = AppConfig::default();
        config.selectors.content = "div[".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }

    #[tokio::test]
    async fn partial_override_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "scraper": { "max_pages": 2 }, "output": { "backup_enabled": false } }"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.scraper.max_pages, 2);
        assert!(!config.output.backup_enabled);
        assert_eq!(config.scraper.base_url, defaults::BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn missing_config_file_is_an_error() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/config.json")).await;
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }
}
