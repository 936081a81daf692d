use thiserror::Error;

use crate::domain::order::OrderStatus;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid order transition from {from:?} to {to:?}")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },
    #[error("order in status {status:?} cannot be cancelled")]
    CancellationForbidden { status: OrderStatus },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}
