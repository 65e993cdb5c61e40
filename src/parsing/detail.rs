//! Detail-page parser: raw field extraction with selector fallbacks.
//!
//! Every field is optional at this level. A selector that matches nothing
//! is a parse anomaly, not an error — the field comes back as `None` and
//! the posting is still usable.

use scraper::{Html, Selector};

use super::{compile_selector_list, select_first_text};
use crate::config::SelectorConfig;
use crate::error::ConfigError;

/// Raw fields extracted from one detail page, before tagging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub title: Option<String>,
    pub publication_date: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
}

pub struct DetailParser {
    title_selectors: Vec<Selector>,
    date_selectors: Vec<Selector>,
    category_selectors: Vec<Selector>,
    content_selectors: Vec<Selector>,
}

impl DetailParser {
    pub fn new(selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title_selectors: compile_selector_list("selectors.title", &selectors.title)?,
            date_selectors: compile_selector_list(
                "selectors.publication_date",
                &selectors.publication_date,
            )?,
            category_selectors: compile_selector_list("selectors.category", &selectors.category)?,
            content_selectors: compile_selector_list("selectors.content", &selectors.content)?,
        })
    }

    /// Extract the raw fields of one job posting.
    ///
    /// First non-empty match wins for each field, in configured fallback
    /// order (e.g. `h1.entry-title` before a bare `h1` for the title).
    pub fn parse(&self, html: &str) -> DetailFields {
        let document = Html::parse_document(html);

        DetailFields {
            title: select_first_text(&document, &self.title_selectors),
            publication_date: select_first_text(&document, &self.date_selectors),
            category: select_first_text(&document, &self.category_selectors),
            content: select_first_text(&document, &self.content_selectors),
        }
    }
}
