use crate::errors::GenericError;
use actix_web::{FromRequest, HttpMessage};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenericResponse<D> {
    pub status: bool,
    pub customer_message: String,
    pub code: String,
    pub data: Option<D>,
}

impl<D> GenericResponse<D> {
    pub fn success(message: &str, data: Option<D>) -> Self {
        Self {
            status: true,
            customer_message: String::from(message),
            code: String::from("200"),
            data,
        }
    }

    pub fn error(message: &str, code: &str, data: Option<D>) -> Self {
        Self {
            status: false,
            customer_message: String::from(message),
            code: String::from(code),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ka,
    En,
}

impl Language {
    /// Resolves the first supported language tag of an `x-language` or
    /// `Accept-Language` header value.
    pub fn from_header(value: &str) -> Self {
        value
            .split(',')
            .filter_map(|tag| tag.split(';').next())
            .map(|tag| tag.trim().to_ascii_lowercase())
            .find_map(|tag| match tag.split('-').next() {
                Some("ka") => Some(Language::Ka),
                Some("en") => Some(Language::En),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn pick<'a>(&self, ka: &'a str, en: &'a str) -> &'a str {
        match self {
            Language::Ka => ka,
            Language::En => en,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestMetaData {
    pub request_id: String,
    pub device_id: String,
    pub language: Language,
}

impl FromRequest for RequestMetaData {
    type Error = GenericError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let value = req.extensions().get::<RequestMetaData>().cloned();

        let result = match value {
            Some(meta_data) => Ok(meta_data),
            None => Err(GenericError::UnexpectedCustomError(
                "Something went wrong while parsing request meta data".to_string(),
            )),
        };

        ready(result)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JWTClaims {
    pub sub: Uuid,
    pub exp: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

impl PaginationQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Lets a JSON request body be taken directly as a handler argument, mapping
/// deserialization failures into a `GenericError::ValidationError`.
#[macro_export]
macro_rules! impl_json_request {
    ($struct_name:ident) => {
        impl actix_web::FromRequest for $struct_name {
            type Error = $crate::errors::GenericError;
            type Future = futures_util::future::LocalBoxFuture<'static, Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let fut = <actix_web::web::Json<Self> as actix_web::FromRequest>::from_request(
                    req, payload,
                );

                Box::pin(async move {
                    match fut.await {
                        Ok(json) => Ok(json.into_inner()),
                        Err(e) => Err($crate::errors::GenericError::ValidationError(
                            e.to_string(),
                        )),
                    }
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{Language, PaginationQuery};

    #[test]
    fn test_language_from_header() {
        assert_eq!(Language::from_header("en-US,en;q=0.9"), Language::En);
        assert_eq!(Language::from_header("ka"), Language::Ka);
        assert_eq!(Language::from_header("fr-FR, en;q=0.5"), Language::En);
        assert_eq!(Language::from_header("de"), Language::Ka);
        assert_eq!(Language::from_header(""), Language::Ka);
    }

    #[test]
    fn test_language_pick() {
        assert_eq!(Language::En.pick("ტელეფონი", "Phone"), "Phone");
        assert_eq!(Language::Ka.pick("ტელეფონი", "Phone"), "ტელეფონი");
    }

    #[test]
    fn test_pagination_is_clamped() {
        let query = PaginationQuery {
            limit: Some(1000),
            offset: Some(-4),
        };
        assert_eq!(query.limit(), 100);
        assert_eq!(query.offset(), 0);
        let query = PaginationQuery {
            limit: None,
            offset: None,
        };
        assert_eq!(query.limit(), 20);
    }
}
