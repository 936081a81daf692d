use std::sync::OnceLock;

use regex::Regex;

use crate::category::has_category_vocabulary;
use crate::orders::{contains_order_reference, has_order_vocabulary};
use crate::price::PriceConstraints;

/// The classified purpose of a user message. Derived per query, never
/// persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    ProductSearch,
    AddToCart,
    OrderStatus,
    GeneralHelp,
}

/// Routing metadata handed to the runtime alongside the intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutedMessage {
    pub raw_text: String,
    pub normalized_text: String,
    pub intent: Intent,
    /// Product-id-shaped token next to an add/buy verb, when the message
    /// classified as a cart addition.
    pub cart_product_token: Option<String>,
}

const PRODUCT_WORDS: &[&str] = &[
    "product",
    "products",
    "show",
    "find",
    "browse",
    "recommend",
    "cheap",
    "cheapest",
    "price",
    "deal",
    "deals",
    "buy",
    "shopping",
];

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "howdy", "help", "thanks", "thank"];

const GREETING_PHRASES: &[&str] =
    &["good morning", "good afternoon", "good evening", "what can you do", "who are you"];

fn cart_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:add|buy|purchase)\b(?:\s+(?:the|a|an|my|this|that))*\s+([A-Za-z0-9]+(?:-[A-Za-z0-9]+)+)",
        )
        .expect("cart pattern is a valid regex")
    })
}

/// Classifies messages with a fixed priority order; ties resolve to the
/// earliest rule. Pure function of the input text.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntentRouter;

impl IntentRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> RoutedMessage {
        let normalized = text.to_lowercase();

        // Rule order is the contract: order lookup, then cart, then search,
        // then help.
        let (intent, cart_product_token) =
            if contains_order_reference(text) || has_order_vocabulary(&normalized) {
                (Intent::OrderStatus, None)
            } else if let Some(token) = cart_token(text) {
                (Intent::AddToCart, Some(token))
            } else if has_product_vocabulary(&normalized) || !has_greeting_vocabulary(&normalized)
            {
                (Intent::ProductSearch, None)
            } else {
                (Intent::GeneralHelp, None)
            };

        RoutedMessage {
            raw_text: text.to_string(),
            normalized_text: normalized,
            intent,
            cart_product_token,
        }
    }
}

fn cart_token(text: &str) -> Option<String> {
    cart_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_lowercase())
}

fn has_product_vocabulary(normalized: &str) -> bool {
    has_category_vocabulary(normalized)
        || !PriceConstraints::extract(normalized).is_empty()
        || normalized.contains('$')
        || PRODUCT_WORDS.iter().any(|word| contains_word(normalized, word))
}

fn has_greeting_vocabulary(normalized: &str) -> bool {
    GREETING_WORDS.iter().any(|word| contains_word(normalized, word))
        || GREETING_PHRASES.iter().any(|phrase| normalized.contains(phrase))
}

fn contains_word(normalized: &str, word: &str) -> bool {
    normalized.split(|ch: char| !ch.is_ascii_alphanumeric()).any(|token| token == word)
}
