use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{
    AuthData, AuthenticateRequest, CreateUserAccount, UpdateProfileRequest, UserAccount,
};
use super::utils::{
    get_auth_data, get_user, register_user, role_for_email, update_user_profile,
    validate_user_credentials,
};
use crate::configuration::{SecretSetting, UserSettings};
use crate::domain::MobileNo;
use crate::errors::GenericError;
use crate::schemas::GenericResponse;

#[utoipa::path(
    post,
    path = "/api/user/authenticate",
    tag = "User",
    request_body(content = AuthenticateRequest, description = "Request Body"),
    responses(
        (status=200, description= "Authenticate User", body= GenericResponse<AuthData>),
        (status=400, description= "Invalid credentials", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Authenticate User", skip(pool, body, secret_obj), fields(email = %body.email, user_id = tracing::field::Empty))]
pub async fn authenticate(
    body: web::Json<AuthenticateRequest>,
    pool: web::Data<PgPool>,
    secret_obj: web::Data<SecretSetting>,
) -> Result<web::Json<GenericResponse<AuthData>>, GenericError> {
    let user = validate_user_credentials(body.into_inner(), &pool).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user.id));
    let auth_obj = get_auth_data(user, &secret_obj.jwt)?;
    Ok(web::Json(GenericResponse::success(
        "Successfully Authenticated User",
        Some(auth_obj),
    )))
}

#[utoipa::path(
    post,
    path = "/api/user/register",
    tag = "User",
    request_body(content = CreateUserAccount, description = "Request Body"),
    responses(
        (status=200, description= "Account created successfully", body= GenericResponse<TupleUnit>),
        (status=400, description= "Invalid or duplicate account", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "User Account Registration API", skip(pool, body, user_settings), fields(user_id = tracing::field::Empty))]
pub async fn register_user_account(
    body: web::Json<CreateUserAccount>,
    pool: web::Data<PgPool>,
    user_settings: web::Data<UserSettings>,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    let role = role_for_email(&user_settings, body.email.get());
    let user_id = register_user(&pool, body.into_inner(), role).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));
    Ok(web::Json(GenericResponse::success(
        "Sucessfully Registered User",
        Some(()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "User",
    responses(
        (status=200, description= "Current user profile", body= GenericResponse<UserAccount>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(name = "Fetch user profile", skip(user), fields(user_id = %user.id))]
pub async fn fetch_profile(
    user: UserAccount,
) -> Result<web::Json<GenericResponse<UserAccount>>, GenericError> {
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched user profile",
        Some(user),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/user/profile",
    tag = "User",
    request_body(content = UpdateProfileRequest, description = "Request Body"),
    responses(
        (status=200, description= "Updated user profile", body= GenericResponse<UserAccount>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Update user profile", skip(pool, body, user), fields(user_id = %user.id))]
pub async fn update_profile(
    body: web::Json<UpdateProfileRequest>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<UserAccount>>, GenericError> {
    let display_name = match body.display_name.as_deref().map(str::trim) {
        Some("") => {
            return Err(GenericError::ValidationError(
                "Display name cannot be empty".to_string(),
            ))
        }
        other => other,
    };
    let mobile_no = body
        .mobile_no
        .clone()
        .map(MobileNo::parse)
        .transpose()
        .map_err(GenericError::ValidationError)?;

    update_user_profile(&pool, user.id, display_name, mobile_no.as_ref())
        .await
        .map_err(|e| {
            GenericError::DatabaseError(
                "Something went wrong while updating user profile".to_string(),
                e,
            )
        })?;
    let user = get_user(&pool, user.id)
        .await
        .map_err(|e| {
            GenericError::DatabaseError(
                "Something went wrong while fetching user profile".to_string(),
                e,
            )
        })?
        .ok_or_else(|| GenericError::DataNotFound("User doesn't exist".to_string()))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated user profile",
        Some(user),
    )))
}
