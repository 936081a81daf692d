use std::sync::Arc;

use tracing::{debug, warn};

use shopchat_core::domain::product::Product;
use shopchat_db::repositories::{CatalogRepository, RepositoryError};

use crate::query::ProductQuery;

/// How many products the last-resort catalog sample returns for an
/// ordinary query. Show-all queries use the query's own limit instead.
const SAMPLE_LIMIT: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStrategy {
    Category,
    FullText,
    Keyword,
    CatalogSample,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub products: Vec<Product>,
    pub strategy: SearchStrategy,
}

/// Runs the fallback cascade: category filter, full-text match, keyword
/// OR-match, then a cheapest-first catalog sample. Total for any derived
/// query; storage errors are logged and treated as zero results.
pub struct QueryExecutor {
    catalog: Arc<dyn CatalogRepository>,
}

impl QueryExecutor {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    pub async fn execute(&self, query: &ProductQuery) -> SearchOutcome {
        if query.category.is_some() {
            let found = swallow(self.catalog.list_filtered(&query.filter()).await, "category");
            if !found.is_empty() {
                return SearchOutcome { products: found, strategy: SearchStrategy::Category };
            }
        } else {
            let found = swallow(
                self.catalog
                    .search_text(&query.raw_text, &query.filter_without_category())
                    .await,
                "full_text",
            );
            if !found.is_empty() {
                return SearchOutcome { products: found, strategy: SearchStrategy::FullText };
            }
        }

        let terms = query.keyword_terms();
        let found = swallow(
            self.catalog.search_keywords(&terms, &query.filter_without_category()).await,
            "keyword",
        );
        if !found.is_empty() {
            return SearchOutcome { products: found, strategy: SearchStrategy::Keyword };
        }

        debug!(
            event_name = "agent.search.fallback",
            raw_text = %query.raw_text,
            "no strategy matched, serving catalog sample"
        );
        let sample_limit = if query.show_all { query.result_limit } else { SAMPLE_LIMIT };
        let products = swallow(self.catalog.cheapest(sample_limit).await, "catalog_sample");
        SearchOutcome { products, strategy: SearchStrategy::CatalogSample }
    }
}

/// Zero results and storage failures look the same to the cascade; the
/// failure is only visible in the logs.
fn swallow(result: Result<Vec<Product>, RepositoryError>, strategy: &'static str) -> Vec<Product> {
    match result {
        Ok(products) => products,
        Err(error) => {
            warn!(
                event_name = "agent.search.store_error",
                strategy,
                error = %error,
                "catalog read failed, treating as zero results"
            );
            Vec::new()
        }
    }
}
