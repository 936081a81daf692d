pub mod config;
pub mod domain;
pub mod errors;

pub use domain::order::{Order, OrderId, OrderItem, OrderStatus, PaymentSummary};
pub use domain::product::{Category, PriceSort, Product, ProductId, ProductSummary};
pub use errors::DomainError;
