use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use shopchat_core::domain::order::{Order, OrderId, OrderStatus};
use shopchat_core::domain::product::{Category, PriceSort, Product, ProductId};

pub mod catalog;
pub mod memory;
pub mod order;

pub use catalog::SqlCatalogRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryOrderRepository};
pub use order::SqlOrderRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Constraints a catalog read applies at the store. Price bounds are
/// inclusive; `limit` is always a small positive count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<Category>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: PriceSort,
    pub limit: u32,
}

impl CatalogFilter {
    pub fn all(limit: u32) -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            sort: PriceSort::Ascending,
            limit,
        }
    }

    pub fn admits_price(&self, price: &Decimal) -> bool {
        if let Some(floor) = &self.min_price {
            if price < floor {
                return false;
            }
        }
        if let Some(ceiling) = &self.max_price {
            if price > ceiling {
                return false;
            }
        }
        true
    }
}

/// Outcome of a conditional cancellation write. `NotCancellable` reports
/// the status observed at write time so callers can explain the rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancellationOutcome {
    Cancelled,
    NotCancellable(OrderStatus),
    NotFound,
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Category + price-bound listing, sorted by price with catalog natural
    /// order breaking ties.
    async fn list_filtered(&self, filter: &CatalogFilter)
        -> Result<Vec<Product>, RepositoryError>;

    /// Whole-string match over name and description.
    async fn search_text(
        &self,
        query: &str,
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// OR-match of any word against name, description, or category.
    async fn search_keywords(
        &self,
        words: &[String],
        filter: &CatalogFilter,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Cheapest-first slice of the whole catalog; the executor's last
    /// resort.
    async fn cheapest(&self, limit: u32) -> Result<Vec<Product>, RepositoryError>;

    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_number(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

    async fn save(&self, order: Order) -> Result<(), RepositoryError>;

    /// Conditional transition to cancelled: commits only if the order is
    /// still pending/processing at write time.
    async fn cancel_if_open(&self, id: &OrderId) -> Result<CancellationOutcome, RepositoryError>;
}
