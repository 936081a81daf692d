//! Conversational query interpreter for the storefront.
//!
//! Turns a free-form chat message into either a filtered product list or
//! order-status information:
//!
//! 1. **Intent routing** (`intent`) - classify the message into search,
//!    cart-add, order lookup, or help
//! 2. **Constraint extraction** (`price`, `category`, `query`) - pull price
//!    bounds, a catalog category, sort preference, and result limits out of
//!    the text
//! 3. **Execution** (`search`, `orders`) - run the strategy cascade against
//!    the catalog store, or resolve an order reference against the order
//!    store
//! 4. **Response shaping** (`respond`) - every path terminates in a
//!    `ChatReply`; nothing here surfaces an error to the chat endpoint
//!
//! Classification is deterministic and rule-based. There is no model, no
//! external service, and no cross-message state: each call sees one message
//! and builds everything it needs from that text.

pub mod category;
pub mod intent;
pub mod orders;
pub mod price;
pub mod query;
pub mod respond;
pub mod runtime;
pub mod search;

pub use intent::{Intent, IntentRouter, RoutedMessage};
pub use respond::ChatReply;
pub use runtime::AgentRuntime;
