use std::sync::Arc;

use tracing::{info, warn};

use shopchat_core::domain::product::ProductId;
use shopchat_db::repositories::{CatalogRepository, OrderRepository};

use crate::intent::{Intent, IntentRouter, RoutedMessage};
use crate::orders::{OrderLookup, OrderResolver};
use crate::query::ProductQuery;
use crate::respond::{self, ChatReply};
use crate::search::QueryExecutor;

/// The interpreter behind the chat endpoint. All collaborators are wired
/// at construction; there is no ambient registry and no state carried
/// between messages.
pub struct AgentRuntime {
    router: IntentRouter,
    executor: QueryExecutor,
    resolver: OrderResolver,
    catalog: Arc<dyn CatalogRepository>,
}

impl AgentRuntime {
    pub fn new(catalog: Arc<dyn CatalogRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self {
            router: IntentRouter::new(),
            executor: QueryExecutor::new(catalog.clone()),
            resolver: OrderResolver::new(orders),
            catalog,
        }
    }

    /// Total: every message, including ones that hit storage failures,
    /// comes back as a formatted reply.
    pub async fn handle_message(&self, text: &str) -> ChatReply {
        let routed = self.router.classify(text);
        info!(
            event_name = "agent.intent.classified",
            intent = ?routed.intent,
            "classified chat message"
        );

        match routed.intent {
            Intent::ProductSearch => self.handle_search(&routed).await,
            Intent::AddToCart => self.handle_add_to_cart(&routed).await,
            Intent::OrderStatus => self.handle_order_status(&routed).await,
            Intent::GeneralHelp => respond::general_help(),
        }
    }

    /// Entry point for the order-management caller; validates the reference
    /// and requests the conditional status transition.
    pub async fn cancel_order(&self, reference: &str) -> ChatReply {
        let result = self.resolver.cancel(reference).await;
        info!(event_name = "agent.orders.cancellation", result = ?result, "handled cancellation");
        respond::cancellation(&result)
    }

    async fn handle_search(&self, routed: &RoutedMessage) -> ChatReply {
        let query = ProductQuery::derive(&routed.raw_text);
        let outcome = self.executor.execute(&query).await;
        info!(
            event_name = "agent.search.completed",
            strategy = ?outcome.strategy,
            result_count = outcome.products.len(),
            "search cascade finished"
        );
        respond::product_results(&query, &outcome)
    }

    async fn handle_add_to_cart(&self, routed: &RoutedMessage) -> ChatReply {
        let Some(token) = routed.cart_product_token.as_deref() else {
            // Classification guarantees a token; treat its absence as an
            // ordinary search so the user still gets products back.
            return self.handle_search(routed).await;
        };

        match self.catalog.find_by_id(&ProductId(token.to_string())).await {
            Ok(Some(product)) => respond::added_to_cart(&product),
            Ok(None) => respond::cart_item_missing(token),
            Err(error) => {
                warn!(
                    event_name = "agent.cart.store_error",
                    product_token = token,
                    error = %error,
                    "cart lookup failed"
                );
                respond::cart_unavailable()
            }
        }
    }

    async fn handle_order_status(&self, routed: &RoutedMessage) -> ChatReply {
        match self.resolver.resolve(&routed.raw_text).await {
            OrderLookup::Found(order) => respond::order_status(&order),
            OrderLookup::NotFound(id) => respond::order_not_found(&id),
            OrderLookup::Guidance => respond::order_guidance(),
            OrderLookup::Unavailable => respond::order_system_unavailable(),
        }
    }
}
