//! Listing-page parser: job summaries and the designated next-page link.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::{compile_selector_list, element_text};
use crate::config::SelectorConfig;
use crate::error::ConfigError;
use crate::models::{JobSummary, ListingPage};

pub struct ListingParser {
    base_url: Url,
    article_selectors: Vec<Selector>,
    title_link_selectors: Vec<Selector>,
    next_page_selectors: Vec<Selector>,
    pagination_selectors: Vec<Selector>,
}

impl ListingParser {
    pub fn new(base_url: &str, selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|_| ConfigError::InvalidUrl {
            field: "scraper.base_url",
            value: base_url.to_string(),
        })?;

        Ok(Self {
            base_url,
            article_selectors: compile_selector_list(
                "selectors.job_articles",
                &selectors.job_articles,
            )?,
            title_link_selectors: compile_selector_list(
                "selectors.job_title_link",
                &selectors.job_title_link,
            )?,
            next_page_selectors: compile_selector_list(
                "selectors.next_page",
                &selectors.next_page,
            )?,
            pagination_selectors: compile_selector_list(
                "selectors.pagination",
                &selectors.pagination,
            )?,
        })
    }

    /// Extract job summaries and the next-page link from one listing page.
    ///
    /// An article without a title link is skipped with a warning, never
    /// fatal. Page order is taken exclusively from the "next" selector;
    /// numbered pagination links are counted for diagnostics only.
    pub fn parse(&self, html: &str) -> ListingPage {
        let document = Html::parse_document(html);
        let mut summaries = Vec::new();

        for selector in &self.article_selectors {
            let articles: Vec<ElementRef> = document.select(selector).collect();
            if articles.is_empty() {
                continue;
            }
            debug!("{} job articles on page", articles.len());

            for (index, article) in articles.iter().enumerate() {
                match self.extract_summary(article) {
                    Some(summary) => summaries.push(summary),
                    None => warn!("skipping article {index}: no title link"),
                }
            }
            break;
        }

        if summaries.is_empty() {
            warn!("no job summaries found on listing page");
        }

        let next_page_url = self.next_page_url(&document);
        let numbered: usize = self
            .pagination_selectors
            .iter()
            .map(|s| document.select(s).count())
            .sum();
        debug!("{numbered} pagination links, next: {next_page_url:?}");

        ListingPage {
            summaries,
            next_page_url,
        }
    }

    fn extract_summary(&self, article: &ElementRef) -> Option<JobSummary> {
        for selector in &self.title_link_selectors {
            if let Some(link) = article.select(selector).next() {
                let href = link.value().attr("href")?;
                let url = self.resolve(href)?;
                return Some(JobSummary {
                    title: element_text(&link),
                    url,
                });
            }
        }
        None
    }

    fn next_page_url(&self, document: &Html) -> Option<String> {
        for selector in &self.next_page_selectors {
            if let Some(link) = document.select(selector).next() {
                if let Some(href) = link.value().attr("href") {
                    return self.resolve(href);
                }
            }
        }
        None
    }

    fn resolve(&self, href: &str) -> Option<String> {
        match self.base_url.join(href) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!("could not resolve href '{href}': {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ListingParser {
        ListingParser::new("https://example.com", &SelectorConfig::default()).unwrap()
    }

    const LISTING: &str = r#"
        <html><body>
        <div class="post-item">
            <h2 class="entry-title"><a href="/jobs/analyste">Analyste financier</a></h2>
        </div>
        <div class="post-item">
            <h2 class="entry-title"><a href="https://example.com/jobs/dev">Développeur web</a></h2>
        </div>
        <div class="post-item"><p>Sponsored block without a title link</p></div>
        <nav class="pages-numbers">
            <a class="pagi-item" href="/jobs/">1</a>
            <a class="pagi-item" href="/jobs/page/3/">3</a>
            <a class="pagi-item-next" href="/jobs/page/2/">Suivant</a>
        </nav>
        </body></html>
    "#;

    #[test]
    fn extracts_summaries_and_resolves_relative_urls() {
        let page = parser().parse(LISTING);

        assert_eq!(page.summaries.len(), 2);
        assert_eq!(page.summaries[0].title, "Analyste financier");
        assert_eq!(page.summaries[0].url, "https://example.com/jobs/analyste");
        assert_eq!(page.summaries[1].url, "https://example.com/jobs/dev");
    }

    #[test]
    fn follows_only_the_designated_next_link() {
        let page = parser().parse(LISTING);

        // The numbered "3" link must never be mistaken for the next page.
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("https://example.com/jobs/page/2/")
        );
    }

    #[test]
    fn missing_next_link_terminates_pagination() {
        let html = r#"
            <html><body>
            <div class="post-item">
                <h2 class="entry-title"><a href="/jobs/last">Dernier poste</a></h2>
            </div>
            <nav class="pages-numbers"><a class="pagi-item" href="/jobs/">1</a></nav>
            </body></html>
        "#;
        let page = parser().parse(html);

        assert_eq!(page.summaries.len(), 1);
        assert!(page.next_page_url.is_none());
    }

    #[test]
    fn empty_page_yields_no_summaries() {
        let page = parser().parse("<html><body><p>maintenance</p></body></html>");
        assert!(page.summaries.is_empty());
        assert!(page.next_page_url.is_none());
    }
}
