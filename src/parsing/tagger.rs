//! Vocabulary tagging over free-text posting content.
//!
//! Plain substring containment, compared case-insensitively; the emitted tag
//! is always the canonical vocabulary spelling. No word-boundary checks, no
//! stemming, no fuzzy matching — the heuristic stays deterministic and
//! auditable, false positives on substrings included.

use std::collections::BTreeSet;

use crate::config::ExtractionConfig;
use crate::models::Tags;

pub struct VocabularyTagger {
    cities: Vec<String>,
    contract_types: Vec<String>,
    sectors: Vec<String>,
}

impl VocabularyTagger {
    pub fn new(extraction: &ExtractionConfig) -> Self {
        Self {
            cities: extraction.african_cities.clone(),
            contract_types: extraction.contract_types.clone(),
            sectors: extraction.sectors.clone(),
        }
    }

    /// Tag a posting by scanning its content and category text.
    ///
    /// Multiple matches per vocabulary are kept — a posting may well mention
    /// several cities or contract types.
    pub fn tag(&self, content: &str, category: Option<&str>) -> Tags {
        let mut haystack = content.to_lowercase();
        if let Some(category) = category {
            haystack.push('\n');
            haystack.push_str(&category.to_lowercase());
        }

        Tags {
            cities: Self::matches(&haystack, &self.cities),
            contract_types: Self::matches(&haystack, &self.contract_types),
            sectors: Self::matches(&haystack, &self.sectors),
        }
    }

    fn matches(haystack: &str, vocabulary: &[String]) -> BTreeSet<String> {
        vocabulary
            .iter()
            .filter(|term| haystack.contains(&term.to_lowercase()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagger() -> VocabularyTagger {
        VocabularyTagger::new(&ExtractionConfig::default())
    }

    #[test]
    fn tags_city_contract_and_sector_from_content() {
        let tags = tagger().tag(
            "Poste basé à Lomé, CDI temps plein, secteur Informatique",
            None,
        );

        assert_eq!(tags.cities, BTreeSet::from(["Lomé".to_string()]));
        assert_eq!(
            tags.contract_types,
            BTreeSet::from(["CDI".to_string(), "Temps plein".to_string()])
        );
        assert_eq!(tags.sectors, BTreeSet::from(["Informatique".to_string()]));
    }

    #[test]
    fn emits_canonical_casing_regardless_of_source_casing() {
        let tags = tagger().tag("recrutement en cdd à LOMÉ", None);

        assert!(tags.contract_types.contains("CDD"));
        assert!(tags.cities.contains("Lomé"));
    }

    #[test]
    fn category_text_participates_in_matching() {
        let tags = tagger().tag("Aucun détail fourni.", Some("Banque"));
        assert!(tags.sectors.contains("Banque"));
    }

    #[test]
    fn multiple_cities_are_all_kept() {
        let tags = tagger().tag("Postes ouverts à Lomé, Kara et Abidjan.", None);
        assert_eq!(
            tags.cities,
            BTreeSet::from([
                "Abidjan".to_string(),
                "Kara".to_string(),
                "Lomé".to_string()
            ])
        );
    }

    #[test]
    fn unmatched_text_yields_empty_tags() {
        let tags = tagger().tag("Aucune correspondance ici.", None);
        assert!(tags.is_empty());
    }
}
