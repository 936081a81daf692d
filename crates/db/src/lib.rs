pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect_with_settings, DbPool};
pub use fixtures::{DemoDataset, SeedResult, VerificationResult};
pub use repositories::{
    CancellationOutcome, CatalogFilter, CatalogRepository, InMemoryCatalogRepository,
    InMemoryOrderRepository, OrderRepository, RepositoryError, SqlCatalogRepository,
    SqlOrderRepository,
};
