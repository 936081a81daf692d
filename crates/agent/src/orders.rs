use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use shopchat_core::domain::order::{Order, OrderId, OrderStatus};
use shopchat_db::repositories::{CancellationOutcome, OrderRepository};

const ORDER_PHRASES: &[&str] = &[
    "order status",
    "my order",
    "my orders",
    "order history",
    "recent orders",
    "track my",
    "where is my order",
];

fn order_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bORD-[A-Za-z0-9-]+").expect("order reference pattern is a valid regex")
    })
}

/// First `ORD-...` token in the text, normalized to uppercase. Absence of a
/// match is a normal outcome, not an error.
pub fn extract_order_reference(text: &str) -> Option<OrderId> {
    order_reference_pattern().find(text).map(|reference| OrderId::new(reference.as_str()))
}

pub fn contains_order_reference(text: &str) -> bool {
    order_reference_pattern().is_match(text)
}

pub fn has_order_vocabulary(normalized_text: &str) -> bool {
    ORDER_PHRASES.iter().any(|phrase| normalized_text.contains(phrase))
}

/// Result of resolving a message against the order store. Not-found is
/// explicit and never conflated with a storage failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderLookup {
    Found(Order),
    NotFound(OrderId),
    /// Order vocabulary with no identifier to resolve.
    Guidance,
    Unavailable,
}

/// Result of a cancellation request routed through the conditional store
/// write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancellationResult {
    Cancelled(OrderId),
    Rejected { id: OrderId, status: OrderStatus },
    NotFound(OrderId),
    /// The supplied reference does not look like an order number.
    Invalid,
    Unavailable,
}

pub struct OrderResolver {
    orders: Arc<dyn OrderRepository>,
}

impl OrderResolver {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn resolve(&self, text: &str) -> OrderLookup {
        let Some(id) = extract_order_reference(text) else {
            return OrderLookup::Guidance;
        };

        match self.orders.find_by_number(&id).await {
            Ok(Some(order)) => OrderLookup::Found(order),
            Ok(None) => OrderLookup::NotFound(id),
            Err(error) => {
                warn!(
                    event_name = "agent.orders.store_error",
                    order_id = %id,
                    error = %error,
                    "order lookup failed, reporting order system unavailable"
                );
                OrderLookup::Unavailable
            }
        }
    }

    /// Entry point for the order-management caller. The transition commits
    /// only if the order is still pending/processing at write time.
    pub async fn cancel(&self, reference: &str) -> CancellationResult {
        let Some(id) = extract_order_reference(reference) else {
            return CancellationResult::Invalid;
        };

        match self.orders.cancel_if_open(&id).await {
            Ok(CancellationOutcome::Cancelled) => CancellationResult::Cancelled(id),
            Ok(CancellationOutcome::NotCancellable(status)) => {
                CancellationResult::Rejected { id, status }
            }
            Ok(CancellationOutcome::NotFound) => CancellationResult::NotFound(id),
            Err(error) => {
                warn!(
                    event_name = "agent.orders.store_error",
                    order_id = %id,
                    error = %error,
                    "order cancellation failed at the store"
                );
                CancellationResult::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use shopchat_core::domain::order::{Order, OrderId, OrderStatus, PaymentSummary};
    use shopchat_db::repositories::{InMemoryOrderRepository, OrderRepository};

    use super::{
        extract_order_reference, has_order_vocabulary, CancellationResult, OrderLookup,
        OrderResolver,
    };

    fn order(reference: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(reference),
            status,
            items: Vec::new(),
            shipping_address: "18 Castle Street, York".to_string(),
            payment: PaymentSummary {
                card_network: "Visa".to_string(),
                last_four: "4242".to_string(),
            },
            created_at: Utc::now(),
            estimated_delivery: Utc::now() + Duration::days(4),
        }
    }

    async fn resolver_with(orders: Vec<Order>) -> OrderResolver {
        let repo = InMemoryOrderRepository::default();
        for order in orders {
            repo.save(order).await.expect("seed order");
        }
        OrderResolver::new(Arc::new(repo))
    }

    #[test]
    fn extraction_normalizes_case() {
        let id = extract_order_reference("status of ord-12345-67890 please").expect("reference");
        assert_eq!(id.as_str(), "ORD-12345-67890");
    }

    #[test]
    fn extraction_takes_the_first_reference() {
        let id = extract_order_reference("ORD-11111-00000 and ORD-22222-00000").expect("reference");
        assert_eq!(id.as_str(), "ORD-11111-00000");
    }

    #[test]
    fn extraction_requires_the_ord_prefix() {
        assert_eq!(extract_order_reference("order 12345"), None);
        assert!(has_order_vocabulary("where is my order"));
    }

    #[tokio::test]
    async fn lookup_finds_orders_case_insensitively() {
        let resolver =
            resolver_with(vec![order("ORD-12345-67890", OrderStatus::Processing)]).await;

        match resolver.resolve("check ord-12345-67890").await {
            OrderLookup::Found(found) => assert_eq!(found.status, OrderStatus::Processing),
            other => panic!("expected a found order, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_orders_are_reported_not_found() {
        let resolver = resolver_with(Vec::new()).await;

        match resolver.resolve("Check order ORD-12345-67890").await {
            OrderLookup::NotFound(id) => assert_eq!(id.as_str(), "ORD-12345-67890"),
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn order_vocabulary_without_reference_yields_guidance() {
        let resolver = resolver_with(Vec::new()).await;
        assert_eq!(resolver.resolve("where is my order?").await, OrderLookup::Guidance);
    }

    #[tokio::test]
    async fn cancellation_succeeds_while_open() {
        let resolver = resolver_with(vec![order("ORD-10001-20002", OrderStatus::Pending)]).await;

        match resolver.cancel("ORD-10001-20002").await {
            CancellationResult::Cancelled(id) => assert_eq!(id.as_str(), "ORD-10001-20002"),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_rejects_shipped_orders_repeatedly() {
        let resolver = resolver_with(vec![order("ORD-50005-60006", OrderStatus::Shipped)]).await;

        for _ in 0..2 {
            match resolver.cancel("ord-50005-60006").await {
                CancellationResult::Rejected { status, .. } => {
                    assert_eq!(status, OrderStatus::Shipped);
                }
                other => panic!("expected rejection, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn malformed_references_are_invalid_not_errors() {
        let resolver = resolver_with(Vec::new()).await;
        assert_eq!(resolver.cancel("cancel it").await, CancellationResult::Invalid);
    }
}
