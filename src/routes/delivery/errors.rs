use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

use super::schemas::DeliveryStatus;

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum DeliveryTrackingError {
    #[error("Delivery status cannot change from {from} to {to}")]
    InvalidStep {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },
    #[error("{0}")]
    InvalidOrderState(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Delivery tracking of order {0} not found")]
    NotFound(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for DeliveryTrackingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<DeliveryTrackingError> for GenericError {
    fn from(err: DeliveryTrackingError) -> GenericError {
        match err {
            DeliveryTrackingError::InvalidStep { .. } => {
                GenericError::InvalidStateTransition(err.to_string())
            }
            DeliveryTrackingError::InvalidOrderState(message) => {
                GenericError::InvalidStateTransition(message)
            }
            DeliveryTrackingError::ValidationError(message) => {
                GenericError::ValidationError(message)
            }
            DeliveryTrackingError::NotFound(_) => GenericError::DataNotFound(err.to_string()),
            DeliveryTrackingError::UnexpectedError(error) => GenericError::UnexpectedError(error),
        }
    }
}
