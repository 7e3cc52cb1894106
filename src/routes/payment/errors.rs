use crate::errors::GenericError;
use crate::routes::order::errors::OrderStatusError;
use crate::utils::error_chain_fmt;

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum PaymentError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Order {0} not found")]
    OrderNotFound(String),
    #[error("{0}")]
    InvalidOrderState(String),
    #[error("Payment gateway request failed")]
    GatewayError(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<OrderStatusError> for PaymentError {
    fn from(err: OrderStatusError) -> PaymentError {
        match err {
            OrderStatusError::InvalidTransition { .. } | OrderStatusError::NoPendingPayment(_) => {
                PaymentError::InvalidOrderState(err.to_string())
            }
            OrderStatusError::NotFound(order_no) => PaymentError::OrderNotFound(order_no),
            OrderStatusError::UnexpectedError(error) => PaymentError::UnexpectedError(error),
            OrderStatusError::DatabaseError(message, error) => {
                PaymentError::DatabaseError(message, error)
            }
        }
    }
}

impl From<PaymentError> for GenericError {
    fn from(err: PaymentError) -> GenericError {
        match err {
            PaymentError::ValidationError(message) => GenericError::ValidationError(message),
            PaymentError::OrderNotFound(order_no) => {
                GenericError::DataNotFound(format!("Order {} not found", order_no))
            }
            PaymentError::InvalidOrderState(message) => {
                GenericError::InvalidStateTransition(message)
            }
            PaymentError::GatewayError(error) => {
                tracing::error!("Payment gateway failure: {:?}", error);
                GenericError::PaymentGatewayError(
                    "Payment gateway is currently unavailable".to_string(),
                )
            }
            PaymentError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            PaymentError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
