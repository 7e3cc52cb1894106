use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::schemas::GenericResponse;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum CustomJWTTokenError {
    #[error("Token expired")]
    Expired,
    #[error("{0}")]
    Invalid(String),
}

impl std::fmt::Debug for CustomJWTTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum GenericError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    UnexpectedCustomError(String),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error("{0}")]
    SerializationError(String),
    #[error("{0}")]
    InvalidJWT(String),
    #[error("{0}")]
    InsufficientPrevilegeError(String),
    #[error("{0}")]
    DataNotFound(String),
    #[error("{0}")]
    InvalidStateTransition(String),
    #[error("{0}")]
    PaymentGatewayError(String),
}

impl std::fmt::Debug for GenericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<serde_json::Error> for GenericError {
    fn from(err: serde_json::Error) -> Self {
        GenericError::SerializationError(err.to_string())
    }
}

impl ResponseError for GenericError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenericError::ValidationError(_) => StatusCode::BAD_REQUEST,
            GenericError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenericError::UnexpectedCustomError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenericError::DatabaseError(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
            GenericError::SerializationError(_) => StatusCode::BAD_REQUEST,
            GenericError::InvalidJWT(_) => StatusCode::UNAUTHORIZED,
            GenericError::InsufficientPrevilegeError(_) => StatusCode::FORBIDDEN,
            GenericError::DataNotFound(_) => StatusCode::NOT_FOUND,
            GenericError::InvalidStateTransition(_) => StatusCode::CONFLICT,
            GenericError::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let status_code_str = status_code.as_str();
        let inner_error_msg = match self {
            GenericError::ValidationError(message) => message.to_string(),
            GenericError::UnexpectedError(error_msg) => error_msg.to_string(),
            GenericError::UnexpectedCustomError(error_msg) => error_msg.to_string(),
            GenericError::DatabaseError(message, _err) => message.to_string(),
            GenericError::SerializationError(message) => message.to_string(),
            GenericError::InvalidJWT(message) => message.to_string(),
            GenericError::InsufficientPrevilegeError(message) => message.to_string(),
            GenericError::DataNotFound(message) => message.to_string(),
            GenericError::InvalidStateTransition(message) => message.to_string(),
            GenericError::PaymentGatewayError(message) => message.to_string(),
        };

        HttpResponse::build(status_code).json(GenericResponse::error(
            &inner_error_msg,
            status_code_str,
            Some(()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::GenericError;

    #[test]
    fn test_generic_error_status_codes() {
        let cases = [
            (
                GenericError::ValidationError("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GenericError::InvalidJWT("expired".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                GenericError::InsufficientPrevilegeError("admin only".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                GenericError::DataNotFound("missing".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                GenericError::InvalidStateTransition("DELIVERED -> PENDING".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                GenericError::PaymentGatewayError("timeout".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected);
        }
    }

    #[test]
    fn test_database_error_hides_source() {
        let error = GenericError::DatabaseError(
            "Something went wrong while fetching order".to_string(),
            anyhow::anyhow!("connection refused"),
        );
        assert_eq!(error.to_string(), "Something went wrong while fetching order");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
