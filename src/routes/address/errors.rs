use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum AddressError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Address {0} not found")]
    NotFound(uuid::Uuid),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for AddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<AddressError> for GenericError {
    fn from(err: AddressError) -> GenericError {
        match err {
            AddressError::ValidationError(message) => GenericError::ValidationError(message),
            AddressError::NotFound(id) => {
                GenericError::DataNotFound(format!("Address {} not found", id))
            }
            AddressError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            AddressError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
