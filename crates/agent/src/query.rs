use shopchat_core::domain::product::{Category, PriceSort};
use shopchat_db::repositories::CatalogFilter;

use crate::category::match_category;
use crate::price::{strip_price_phrases, PriceConstraints};

pub const DEFAULT_RESULT_LIMIT: u32 = 6;
pub const SHOW_ALL_RESULT_LIMIT: u32 = 60;

const SHOW_ALL_PHRASES: &[&str] = &[
    "show all",
    "show me all",
    "everything",
    "entire catalog",
    "whole catalog",
    "full catalog",
    "all products",
];

/// A chat message distilled into catalog constraints. Derivation is pure;
/// absent or ambiguous phrases leave fields unset and widen the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductQuery {
    pub raw_text: String,
    pub price: PriceConstraints,
    pub category: Option<Category>,
    pub sort: PriceSort,
    pub show_all: bool,
    pub result_limit: u32,
}

impl ProductQuery {
    pub fn derive(text: &str) -> Self {
        let normalized = text.to_lowercase();
        let price = PriceConstraints::extract(text);
        let hint = match_category(&normalized);
        let show_all =
            SHOW_ALL_PHRASES.iter().any(|phrase| normalized.contains(phrase));

        Self {
            raw_text: text.to_string(),
            price,
            category: hint.map(|hint| hint.category),
            sort: hint.and_then(|hint| hint.sort).unwrap_or_default(),
            show_all,
            result_limit: if show_all { SHOW_ALL_RESULT_LIMIT } else { DEFAULT_RESULT_LIMIT },
        }
    }

    /// Store filter for the category strategy.
    pub fn filter(&self) -> CatalogFilter {
        let bounds = self.price.bounds();
        CatalogFilter {
            category: self.category,
            min_price: bounds.floor,
            max_price: bounds.ceiling,
            sort: self.sort,
            limit: self.result_limit,
        }
    }

    /// Store filter for the text strategies, which match category through
    /// the text itself rather than as a column constraint.
    pub fn filter_without_category(&self) -> CatalogFilter {
        CatalogFilter { category: None, ..self.filter() }
    }

    /// Search terms for the keyword fallback: price phrases stripped, words
    /// longer than two characters, first occurrence kept.
    pub fn keyword_terms(&self) -> Vec<String> {
        let stripped = strip_price_phrases(&self.raw_text).to_lowercase();
        let mut terms: Vec<String> = Vec::new();
        for word in stripped.split(|ch: char| !ch.is_ascii_alphanumeric()) {
            if word.len() > 2 && !terms.iter().any(|seen| seen == word) {
                terms.push(word.to_string());
            }
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use shopchat_core::domain::product::{Category, PriceSort};

    use super::{ProductQuery, DEFAULT_RESULT_LIMIT, SHOW_ALL_RESULT_LIMIT};

    #[test]
    fn ordinary_queries_get_the_default_limit() {
        let query = ProductQuery::derive("wireless headphones under $100");
        assert_eq!(query.result_limit, DEFAULT_RESULT_LIMIT);
        assert!(!query.show_all);
        assert_eq!(query.category, Some(Category::Audio));
        assert_eq!(query.price.max_price, Some(100));
    }

    #[test]
    fn show_all_phrases_raise_the_limit() {
        for text in ["show me everything", "show all products", "browse the entire catalog"] {
            let query = ProductQuery::derive(text);
            assert!(query.show_all, "text: {text}");
            assert_eq!(query.result_limit, SHOW_ALL_RESULT_LIMIT, "text: {text}");
        }
    }

    #[test]
    fn show_me_everything_has_no_category() {
        let query = ProductQuery::derive("show me everything");
        assert_eq!(query.category, None);
        assert!(query.price.is_empty());
    }

    #[test]
    fn gaming_laptop_sorts_descending_without_price_bound() {
        let query = ProductQuery::derive("gaming laptop");
        assert_eq!(query.category, Some(Category::Laptops));
        assert_eq!(query.sort, PriceSort::Descending);
        assert!(query.price.is_empty());
    }

    #[test]
    fn default_sort_is_ascending() {
        let query = ProductQuery::derive("earbuds around $80");
        assert_eq!(query.sort, PriceSort::Ascending);
    }

    #[test]
    fn keyword_terms_drop_price_phrases_and_short_words() {
        let query = ProductQuery::derive("a red speaker under $100 for me");
        let terms = query.keyword_terms();
        assert!(terms.contains(&"red".to_string()));
        assert!(terms.contains(&"speaker".to_string()));
        assert!(!terms.contains(&"100".to_string()));
        assert!(!terms.iter().any(|term| term.len() <= 2));
    }

    #[test]
    fn keyword_terms_deduplicate_preserving_order() {
        let query = ProductQuery::derive("speaker speaker loud speaker");
        assert_eq!(query.keyword_terms(), vec!["speaker".to_string(), "loud".to_string()]);
    }
}
