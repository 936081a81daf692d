use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use shopchat_agent::{AgentRuntime, ChatReply};

#[derive(Clone)]
pub struct ChatState {
    runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

pub fn router(runtime: Arc<AgentRuntime>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/orders/{reference}/cancel", post(cancel_order))
        .with_state(ChatState { runtime })
}

/// One message in, one reply out. The runtime is total, so this handler
/// has no error branch to surface.
pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply> {
    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "server.chat.message",
        correlation_id = %correlation_id,
        message_chars = request.message.len(),
        "handling chat message"
    );

    Json(state.runtime.handle_message(&request.message).await)
}

pub async fn cancel_order(
    State(state): State<ChatState>,
    Path(reference): Path<String>,
) -> Json<ChatReply> {
    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "server.chat.cancel_order",
        correlation_id = %correlation_id,
        reference = %reference,
        "handling cancellation request"
    );

    Json(state.runtime.cancel_order(&reference).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::Json;
    use rust_decimal::Decimal;

    use shopchat_agent::AgentRuntime;
    use shopchat_core::domain::product::{Category, Product, ProductId};
    use shopchat_db::repositories::{InMemoryCatalogRepository, InMemoryOrderRepository};

    use super::{chat, cancel_order, ChatRequest, ChatState};

    async fn state() -> ChatState {
        let catalog = InMemoryCatalogRepository::with_products(vec![Product {
            id: ProductId("aurora-buds".to_string()),
            name: "Aurora Buds".to_string(),
            description: "Wireless earbuds".to_string(),
            price: Decimal::new(7999, 2),
            category: Category::Audio,
            image_url: "/images/aurora-buds.jpg".to_string(),
        }])
        .await;

        ChatState {
            runtime: Arc::new(AgentRuntime::new(
                Arc::new(catalog),
                Arc::new(InMemoryOrderRepository::default()),
            )),
        }
    }

    #[tokio::test]
    async fn chat_endpoint_answers_search_messages() {
        let Json(reply) = chat(
            State(state().await),
            Json(ChatRequest { message: "wireless earbuds under $100".to_string() }),
        )
        .await;

        assert!(reply.text.contains("under $100"));
        let products = reply.products.expect("product reply");
        assert_eq!(products[0].id.0, "aurora-buds");
    }

    #[tokio::test]
    async fn cancel_endpoint_reports_unknown_orders() {
        let Json(reply) =
            cancel_order(State(state().await), Path("ORD-99999-00000".to_string())).await;

        assert!(reply.text.contains("ORD-99999-00000"));
        assert!(reply.products.is_none());
    }
}
