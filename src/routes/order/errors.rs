use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

use super::schemas::OrderStatus;

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum OrderError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Order {0} not found")]
    NotFound(String),
    #[error("Order number {0} is already taken")]
    OrderNoTaken(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<OrderError> for GenericError {
    fn from(err: OrderError) -> GenericError {
        match err {
            OrderError::ValidationError(message) => GenericError::ValidationError(message),
            OrderError::NotFound(order_no) => {
                GenericError::DataNotFound(format!("Order {} not found", order_no))
            }
            OrderError::OrderNoTaken(_) => GenericError::UnexpectedCustomError(
                "Couldn't allocate an order number, please retry".to_string(),
            ),
            OrderError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            OrderError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}

#[derive(thiserror::Error)]
pub enum OrderStatusError {
    #[error("Order status cannot change from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Order {0} not found")]
    NotFound(String),
    #[error("Order {0} has no pending payment to settle")]
    NoPendingPayment(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for OrderStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<OrderStatusError> for GenericError {
    fn from(err: OrderStatusError) -> GenericError {
        match err {
            OrderStatusError::InvalidTransition { from, to } => GenericError::InvalidStateTransition(
                format!("Order status cannot change from {} to {}", from, to),
            ),
            OrderStatusError::NotFound(order_no) => {
                GenericError::DataNotFound(format!("Order {} not found", order_no))
            }
            OrderStatusError::NoPendingPayment(_) => {
                GenericError::InvalidStateTransition(err.to_string())
            }
            OrderStatusError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            OrderStatusError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
