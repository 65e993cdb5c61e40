//! Selector-driven HTML parsing for listing and detail pages.
//!
//! Selectors come in from configuration as strings; a comma-separated string
//! is an ordered fallback chain. `scraper` would accept the group syntax
//! directly, but matches would then come back in document order — compiling
//! each alternative separately keeps the configured order authoritative.

pub mod detail;
pub mod listing;
pub mod tagger;

pub use detail::{DetailFields, DetailParser};
pub use listing::ListingParser;
pub use tagger::VocabularyTagger;

use scraper::{ElementRef, Html, Selector};

use crate::error::ConfigError;

/// Compile a comma-separated selector string into ordered fallbacks.
pub(crate) fn compile_selector_list(
    field: &'static str,
    raw: &str,
) -> Result<Vec<Selector>, ConfigError> {
    let mut selectors = Vec::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let selector = Selector::parse(part).map_err(|_| ConfigError::InvalidSelector {
            field,
            selector: part.to_string(),
        })?;
        selectors.push(selector);
    }

    if selectors.is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    Ok(selectors)
}

/// Collected element text with whitespace collapsed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty text match across a fallback chain, in selector order.
pub(crate) fn select_first_text(document: &Html, selectors: &[Selector]) -> Option<String> {
    for selector in selectors {
        for element in document.select(selector) {
            let text = element_text(&element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}
