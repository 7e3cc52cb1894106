use crate::errors::CustomJWTTokenError;
use crate::schemas::JWTClaims;
use actix_web::dev::{Payload, ServiceRequest};
use actix_web::rt::task::JoinHandle;
use actix_web::web;
use chrono::{Duration, Utc};
use futures::{future, stream};
use jsonwebtoken::{
    decode, encode, Algorithm as JWTAlgorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    actix_web::rt::task::spawn_blocking(move || current_span.in_scope(f))
}

#[tracing::instrument(name = "Generate JWT token for user", skip(secret))]
pub fn generate_jwt_token_for_user(
    user_id: Uuid,
    expiry_time: i64,
    secret: &SecretString,
) -> Result<SecretString, anyhow::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(expiry_time))
        .ok_or_else(|| anyhow::anyhow!("Token expiry is out of range"))?
        .timestamp() as usize;
    let claims: JWTClaims = JWTClaims {
        sub: user_id,
        exp: expiration,
    };
    let header = Header::new(JWTAlgorithm::HS256);
    let encoding_key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    let token: String = encode(&header, &claims, &encoding_key)?;
    Ok(SecretString::from(token))
}

#[tracing::instrument(name = "Decode JWT token", skip(token, secret))]
pub fn decode_token<T: Into<String>>(
    token: T,
    secret: &SecretString,
) -> Result<Uuid, CustomJWTTokenError> {
    let decoding_key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let decoded = decode::<JWTClaims>(
        &token.into(),
        &decoding_key,
        &Validation::new(JWTAlgorithm::HS256),
    );
    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(CustomJWTTokenError::Expired),
            _ => Err(CustomJWTTokenError::Invalid("Invalid Token".to_string())),
        },
    }
}

pub fn get_header_value(req: &ServiceRequest, header_name: &str) -> Option<String> {
    req.headers()
        .get(header_name)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.to_string())
}

/// Turns an already consumed request body back into a payload the inner
/// service can read.
pub fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let stream = stream::once(future::ready(Ok(buf)));
    Payload::from(
        Box::pin(stream)
            as std::pin::Pin<
                Box<dyn futures::Stream<Item = Result<web::Bytes, actix_web::error::PayloadError>>>,
            >,
    )
}

#[cfg(test)]
mod tests {
    use super::{decode_token, generate_jwt_token_for_user};
    use crate::errors::CustomJWTTokenError;
    use secrecy::{ExposeSecret, SecretString};
    use uuid::Uuid;

    #[test]
    fn test_jwt_round_trip() {
        let secret = SecretString::from("a-very-long-test-secret");
        let user_id = Uuid::new_v4();
        let token = generate_jwt_token_for_user(user_id, 2, &secret).unwrap();
        let decoded = decode_token(token.expose_secret(), &secret).unwrap();
        assert_eq!(decoded, user_id);
    }

    #[test]
    fn test_jwt_with_wrong_secret_is_invalid() {
        let token =
            generate_jwt_token_for_user(Uuid::new_v4(), 2, &SecretString::from("one")).unwrap();
        let result = decode_token(token.expose_secret(), &SecretString::from("two"));
        assert!(matches!(result, Err(CustomJWTTokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_jwt_is_rejected() {
        let secret = SecretString::from("a-very-long-test-secret");
        let token = generate_jwt_token_for_user(Uuid::new_v4(), -2, &secret).unwrap();
        let result = decode_token(token.expose_secret(), &secret);
        assert!(matches!(result, Err(CustomJWTTokenError::Expired)));
    }
}
