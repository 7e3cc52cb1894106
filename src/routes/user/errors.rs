use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error("{0}")]
    InvalidStringCredentials(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<AuthError> for GenericError {
    fn from(err: AuthError) -> GenericError {
        match err {
            AuthError::InvalidCredentials(_) => {
                GenericError::ValidationError("Invalid email or password".to_string())
            }
            AuthError::InvalidStringCredentials(message) => GenericError::ValidationError(message),
            AuthError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            AuthError::DatabaseError(message, error) => GenericError::DatabaseError(message, error),
        }
    }
}

#[derive(thiserror::Error)]
pub enum UserRegistrationError {
    #[error("{0} is already registered")]
    DuplicateEmail(String),
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for UserRegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<UserRegistrationError> for GenericError {
    fn from(err: UserRegistrationError) -> GenericError {
        match err {
            UserRegistrationError::DuplicateEmail(email) => {
                GenericError::ValidationError(format!("{} is already registered", email))
            }
            UserRegistrationError::ValidationError(message) => GenericError::ValidationError(message),
            UserRegistrationError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            UserRegistrationError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
