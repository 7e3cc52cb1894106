use crate::configuration::SecretSetting;
use crate::errors::GenericError;
use crate::routes::user::schemas::{UserAccount, UserRole};
use crate::routes::user::utils::get_user;
use crate::schemas::{Language, RequestMetaData};
use crate::utils::{bytes_to_payload, decode_token, get_header_value};
use actix_web::body::{self, BoxBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http, web, Error, HttpMessage};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use tracing::instrument;

/// Paths whose bodies carry passwords or access tokens.
const CREDENTIAL_PATHS: [&str; 2] = ["/api/user/register", "/api/user/authenticate"];

const REDACTED_BODY: &str = "[REDACTED]";

pub fn is_credential_path(path: &str) -> bool {
    let path = path.trim_end_matches('/');
    CREDENTIAL_PATHS.contains(&path)
}

// Middlware for saving the request and response into the tracing
pub struct ReadReqResMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for ReadReqResMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    #[instrument(skip(self), name = "Request Response Payload", fields(path = %req.path()))]
    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let svc = Rc::clone(&self.service);
        let is_non_json_req_res =
            req.path().contains("/docs/") || req.path().contains("/api-docs/");
        if is_non_json_req_res {
            return Box::pin(async move { svc.call(req).await });
        }
        let redact_body = is_credential_path(req.path());
        Box::pin(async move {
            let request_bytes = req.extract::<web::Bytes>().await?;
            let request_str = if redact_body {
                REDACTED_BODY.to_string()
            } else {
                String::from_utf8_lossy(&request_bytes).to_string()
            };
            tracing::info!({%request_str}, "HTTP Request");
            req.set_payload(bytes_to_payload(request_bytes));

            let res = svc.call(req).await?;
            let (req, res) = res.into_parts();
            let (res, body) = res.into_parts();
            let body_bytes = body::to_bytes(body).await.unwrap_or_default();
            let response_str = match std::str::from_utf8(&body_bytes) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    tracing::error!("Error decoding response body");
                    String::from("")
                }
            };
            if redact_body {
                tracing::info!(response_str = REDACTED_BODY, "HTTP Response");
            } else {
                tracing::info!({%response_str}, "HTTP Response");
            }
            let res = res.set_body(BoxBody::new(response_str));
            Ok(ServiceResponse::new(req, res))
        })
    }
}

pub struct SaveRequestResponse;

impl<S> Transform<S, ServiceRequest> for SaveRequestResponse
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ReadReqResMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ReadReqResMiddleware {
            service: Rc::new(service),
        }))
    }
}

// Middleware to validate the header in incoming requests
pub struct HeaderMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for HeaderMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = get_header_value(&req, "x-request-id");
        let device_id = get_header_value(&req, "x-device-id");
        let language = get_header_value(&req, "x-language")
            .or_else(|| get_header_value(&req, "Accept-Language"))
            .map(|value| Language::from_header(&value))
            .unwrap_or_default();

        let (request_id, device_id) = match (request_id, device_id) {
            (Some(request_id), Some(device_id)) => (request_id, device_id),
            (None, _) => {
                let (request, _pl) = req.into_parts();
                let json_error =
                    GenericError::ValidationError("x-request-id is missing".to_string());
                return Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) });
            }
            (_, None) => {
                let (request, _pl) = req.into_parts();
                let json_error =
                    GenericError::ValidationError("x-device-id is missing".to_string());
                return Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) });
            }
        };
        req.extensions_mut().insert::<RequestMetaData>(RequestMetaData {
            request_id,
            device_id,
            language,
        });

        let srv = Rc::clone(&self.service);
        Box::pin(async move { srv.call(req).await })
    }
}

/// Middleware factory for the request header validation.
pub struct HeaderValidation;

impl<S> Transform<S, ServiceRequest> for HeaderValidation
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = HeaderMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HeaderMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|h| h.trim().to_string());

        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => {
                let (request, _pl) = req.into_parts();
                let json_error =
                    GenericError::InvalidJWT("Authorization token is missing".to_string());
                return Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) });
            }
        };

        let user_id = match req.app_data::<web::Data<SecretSetting>>() {
            Some(secret) => decode_token(token, &secret.jwt.secret),
            None => {
                let (request, _pl) = req.into_parts();
                let json_error =
                    GenericError::UnexpectedCustomError("JWT secret is not configured".to_string());
                return Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) });
            }
        };
        let user_id = match user_id {
            Ok(id) => id,
            Err(e) => {
                let (request, _pl) = req.into_parts();
                let json_error = GenericError::InvalidJWT(e.to_string());
                return Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) });
            }
        };

        let srv = Rc::clone(&self.service);
        Box::pin(async move {
            let db_pool = req
                .app_data::<web::Data<PgPool>>()
                .ok_or_else(|| {
                    GenericError::UnexpectedCustomError(
                        "Database pool is not configured".to_string(),
                    )
                })?
                .clone();
            let user = get_user(&db_pool, user_id)
                .await
                .map_err(|e| {
                    GenericError::DatabaseError(
                        "Something went wrong while fetching user account".to_string(),
                        e,
                    )
                })?
                .ok_or_else(|| GenericError::InvalidJWT("User doesn't exist".to_string()))?;
            if !user.is_active {
                let (request, _pl) = req.into_parts();
                let json_error = GenericError::ValidationError(
                    "User is Inactive. Please contact customer support".to_string(),
                );
                return Ok(ServiceResponse::from_err(json_error, request));
            }

            req.extensions_mut().insert::<UserAccount>(user);

            srv.call(req).await
        })
    }
}

/// Middleware factory for requiring authentication.
pub struct RequireAuth;

impl<S> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

// Middleware to restrict a route to a set of user roles. Must run after `RequireAuth`.
pub struct RoleMiddleware<S> {
    service: Rc<S>,
    role_list: Vec<UserRole>,
}

impl<S> Service<ServiceRequest> for RoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let role = req.extensions().get::<UserAccount>().map(|user| user.role);
        let json_error = match role {
            Some(role) if self.role_list.contains(&role) => None,
            Some(_) => Some(GenericError::InsufficientPrevilegeError(
                "Insufficient previlege to access this resource".to_string(),
            )),
            None => Some(GenericError::UnexpectedCustomError(
                "User Account doesn't exist".to_string(),
            )),
        };
        if let Some(json_error) = json_error {
            let (request, _pl) = req.into_parts();
            return Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) });
        }
        let srv = Rc::clone(&self.service);
        Box::pin(async move { srv.call(req).await })
    }
}

pub struct RoleValidation {
    pub role_list: Vec<UserRole>,
}

impl RoleValidation {
    pub fn admin() -> Self {
        Self {
            role_list: vec![UserRole::Admin],
        }
    }
}

impl<S> Transform<S, ServiceRequest> for RoleValidation
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = RoleMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleMiddleware {
            service: Rc::new(service),
            role_list: self.role_list.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::is_credential_path;

    #[test]
    fn test_credential_bodies_are_not_logged() {
        assert!(is_credential_path("/api/user/register"));
        assert!(is_credential_path("/api/user/authenticate/"));
        assert!(!is_credential_path("/api/user/profile"));
        assert!(!is_credential_path("/api/order/checkout"));
    }
}
