use rust_decimal::Decimal;
use serde::Serialize;

use shopchat_core::domain::order::{Order, OrderId, OrderStatus};
use shopchat_core::domain::product::{Product, ProductSummary};

use crate::orders::CancellationResult;
use crate::query::ProductQuery;
use crate::search::{SearchOutcome, SearchStrategy};

/// Response envelope consumed by the chat endpoint. `products` is present
/// only for product results and carries display-safe fields exclusively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductSummary>>,
}

impl ChatReply {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), products: None }
    }
}

pub fn product_results(query: &ProductQuery, outcome: &SearchOutcome) -> ChatReply {
    let mut segments = vec![format!(
        "Showing {} {}",
        outcome.products.len(),
        if outcome.products.len() == 1 { "product" } else { "products" }
    )];

    if let Some(price) = query.price.describe() {
        segments.push(price);
    }
    if let Some(category) = query.category {
        segments.push(format!("{} products", category.label()));
    }
    if query.show_all {
        segments.push("entire catalog".to_string());
    }

    let mut text = segments.join(" \u{2022} ");
    if outcome.strategy == SearchStrategy::CatalogSample {
        text = if outcome.products.is_empty() {
            "The catalog is unavailable right now. Please try again shortly.".to_string()
        } else if query.show_all {
            text
        } else {
            format!("No exact matches for that, so here are a few popular picks. {text}")
        };
    }

    let products: Vec<ProductSummary> = outcome.products.iter().map(Product::summary).collect();
    ChatReply { text, products: (!products.is_empty()).then_some(products) }
}

pub fn order_status(order: &Order) -> ChatReply {
    let mut lines = vec![
        format!("Order {} {}.", order.id, status_phrase(order.status)),
        format!("Placed: {}", order.created_at.format("%b %d, %Y")),
        format!("Estimated delivery: {}", order.estimated_delivery.format("%b %d, %Y")),
    ];

    if !order.items.is_empty() {
        lines.push("Items:".to_string());
        for item in &order.items {
            lines.push(format!(
                "  \u{2022} {}x {} ({})",
                item.quantity,
                item.name,
                format_price(&item.unit_price)
            ));
        }
        lines.push(format!("Total: {}", format_price(&order.total())));
    }

    lines.push(format!("Ship to: {}", order.shipping_address));
    lines.push(format!(
        "Payment: {} ending in {}",
        order.payment.card_network, order.payment.last_four
    ));

    ChatReply::text_only(lines.join("\n"))
}

pub fn order_not_found(id: &OrderId) -> ChatReply {
    ChatReply::text_only(format!(
        "I couldn't find an order with reference {id}. Double-check the number on your \
         confirmation email and try again."
    ))
}

pub fn order_guidance() -> ChatReply {
    ChatReply::text_only(
        "I can look up any order if you give me its reference, which looks like \
         ORD-12345-67890. You can find it on your confirmation email or in Order History.",
    )
}

pub fn order_system_unavailable() -> ChatReply {
    ChatReply::text_only(
        "The order system is unavailable right now. Please try again in a few minutes.",
    )
}

pub fn cancellation(result: &CancellationResult) -> ChatReply {
    match result {
        CancellationResult::Cancelled(id) => ChatReply::text_only(format!(
            "Order {id} has been cancelled. Any payment will be refunded to the original method."
        )),
        CancellationResult::Rejected { id, status } => ChatReply::text_only(format!(
            "Order {id} is already {status} and can no longer be cancelled. Orders can only be \
             cancelled while they are pending or processing."
        )),
        CancellationResult::NotFound(id) => order_not_found(id),
        CancellationResult::Invalid => ChatReply::text_only(
            "That doesn't look like an order reference. It should look like ORD-12345-67890.",
        ),
        CancellationResult::Unavailable => order_system_unavailable(),
    }
}

pub fn added_to_cart(product: &Product) -> ChatReply {
    ChatReply {
        text: format!("Added {} ({}) to your cart.", product.name, format_price(&product.price)),
        products: Some(vec![product.summary()]),
    }
}

pub fn cart_item_missing(token: &str) -> ChatReply {
    ChatReply::text_only(format!(
        "I couldn't find a product called \"{token}\". Try searching first, for example \
         \"show me headphones under $100\"."
    ))
}

pub fn cart_unavailable() -> ChatReply {
    ChatReply::text_only("The cart is unavailable right now. Please try again shortly.")
}

pub fn general_help() -> ChatReply {
    ChatReply::text_only(
        "Hi! I can help you shop. Try things like:\n\
         \u{2022} \"Show me wireless headphones under $100\"\n\
         \u{2022} \"gaming laptop\"\n\
         \u{2022} \"show me everything\"\n\
         \u{2022} \"Check order ORD-12345-67890\"",
    )
}

fn status_phrase(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "is pending",
        OrderStatus::Processing => "is being processed",
        OrderStatus::Shipped => "has shipped",
        OrderStatus::Delivered => "was delivered",
        OrderStatus::Cancelled => "has been cancelled",
    }
}

fn format_price(price: &Decimal) -> String {
    format!("${:.2}", price)
}
