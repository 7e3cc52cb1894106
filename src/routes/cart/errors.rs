use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum CartError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Product {0} not found")]
    ProductNotFound(i64),
    #[error("Product {0} is not in the cart")]
    ItemNotFound(i64),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<CartError> for GenericError {
    fn from(err: CartError) -> GenericError {
        match err {
            CartError::ValidationError(message) => GenericError::ValidationError(message),
            CartError::ProductNotFound(_) | CartError::ItemNotFound(_) => {
                GenericError::DataNotFound(err.to_string())
            }
            CartError::UnexpectedError(error) => GenericError::UnexpectedError(error),
        }
    }
}
