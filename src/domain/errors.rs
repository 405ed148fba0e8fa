use thiserror::Error;
use uuid::Uuid;

use super::order::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Order belongs to another user")]
    Forbidden,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient stock for product {product_id}: only {available} left")]
    InsufficientStock { product_id: Uuid, available: i32 },
    #[error("No selected cart lines to check out")]
    EmptyCart,
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Integrity fault: {0}")]
    IntegrityFault(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
