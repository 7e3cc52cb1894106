use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;
use uuid::Uuid;

use super::schemas::{Address, AddressList, CreateAddressRequest, UpdateAddressRequest};
use super::utils;
use crate::errors::GenericError;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::GenericResponse;

#[utoipa::path(
    get,
    path = "/api/address/list",
    tag = "Address",
    responses(
        (status=200, description= "Addresses of the current user", body= GenericResponse<AddressList>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "List addresses", skip(pool, user), fields(user_id = %user.id))]
pub async fn list_addresses(
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<AddressList>>, GenericError> {
    let addresses = utils::fetch_addresses(&pool, user.id).await.map_err(|e| {
        GenericError::DatabaseError(
            "Something went wrong while fetching addresses".to_string(),
            e,
        )
    })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched addresses",
        Some(AddressList { addresses }),
    )))
}

#[utoipa::path(
    post,
    path = "/api/address",
    tag = "Address",
    request_body(content = CreateAddressRequest, description = "Request Body"),
    responses(
        (status=200, description= "Created address", body= GenericResponse<Address>),
        (status=400, description= "Invalid address", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Create address", skip(pool, body, user), fields(user_id = %user.id))]
pub async fn create_address(
    body: web::Json<CreateAddressRequest>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Address>>, GenericError> {
    let address = utils::create_address(&pool, user.id, &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created address",
        Some(address),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/address/{id}",
    tag = "Address",
    request_body(content = UpdateAddressRequest, description = "Request Body"),
    responses(
        (status=200, description= "Updated address", body= GenericResponse<Address>),
        (status=404, description= "Address not found", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("id" = Uuid, Path, description = "Address id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Update address", skip(pool, body, user), fields(user_id = %user.id))]
pub async fn update_address(
    path: web::Path<Uuid>,
    body: web::Json<UpdateAddressRequest>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Address>>, GenericError> {
    let address = utils::update_address(&pool, user.id, path.into_inner(), &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated address",
        Some(address),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/address/{id}",
    tag = "Address",
    responses(
        (status=200, description= "Deleted address", body= GenericResponse<TupleUnit>),
        (status=404, description= "Address not found", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("id" = Uuid, Path, description = "Address id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Delete address", skip(pool, user), fields(user_id = %user.id))]
pub async fn delete_address(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    utils::delete_address(&pool, user.id, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully deleted address",
        Some(()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/address/{id}/default",
    tag = "Address",
    responses(
        (status=200, description= "Default address set", body= GenericResponse<TupleUnit>),
        (status=404, description= "Address not found", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("id" = Uuid, Path, description = "Address id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Set default address", skip(pool, user), fields(user_id = %user.id))]
pub async fn set_default_address(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    utils::set_default_address(&pool, user.id, path.into_inner()).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully set default address",
        Some(()),
    )))
}
