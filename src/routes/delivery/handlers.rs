use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{DeliveryTracking, UpdateDeliveryStatusRequest, UpdateDeliveryWeightRequest};
use super::utils;
use crate::configuration::DeliverySettings;
use crate::errors::GenericError;
use crate::routes::order::utils::fetch_order_for_user;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::GenericResponse;

#[utoipa::path(
    get,
    path = "/api/order/{order_no}/delivery",
    tag = "Delivery",
    params(
        ("order_no" = String, Path, description = "Order number"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Delivery tracking of the order", body= GenericResponse<DeliveryTracking>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Fetch delivery tracking", skip(pool, user), fields(user_id = %user.id))]
pub async fn fetch_delivery_tracking(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<DeliveryTracking>>, GenericError> {
    let order = fetch_order_for_user(&pool, &user, &path).await?;
    let tracking = utils::fetch_delivery_tracking(&pool, order.id)
        .await
        .map_err(|e| {
            GenericError::DatabaseError(
                "Something went wrong while fetching delivery tracking".to_string(),
                e,
            )
        })?
        .ok_or_else(|| {
            GenericError::DataNotFound(format!(
                "Delivery tracking of order {} not found",
                order.order_no
            ))
        })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched delivery tracking",
        Some(tracking.into_schema(&order)),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/order/{order_no}/delivery/status",
    tag = "Admin",
    description = "Advances the delivery one stage: ORDERED, RECEIVED_CHINA, SENT_TBILISI, DELIVERED_TBILISI.",
    request_body(content = UpdateDeliveryStatusRequest, description = "Request Body"),
    params(
        ("order_no" = String, Path, description = "Order number"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Updated delivery tracking", body= GenericResponse<DeliveryTracking>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
        (status=409, description= "Not the next delivery stage", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Update delivery status", skip(pool, body, user), fields(admin_id = %user.id, status = %body.status))]
pub async fn update_delivery_status(
    path: web::Path<String>,
    body: UpdateDeliveryStatusRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<DeliveryTracking>>, GenericError> {
    let tracking = utils::update_delivery_status(&pool, &path, body.status).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated delivery status",
        Some(tracking),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/order/{order_no}/delivery/weight",
    tag = "Admin",
    description = "Records the parcel weight and prices transportation with the rate of the order's delivery method.",
    request_body(content = UpdateDeliveryWeightRequest, description = "Request Body"),
    params(
        ("order_no" = String, Path, description = "Order number"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Updated delivery tracking", body= GenericResponse<DeliveryTracking>),
        (status=400, description= "Invalid weight or no delivery method", body= GenericResponse<TupleUnit>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Update delivery weight", skip(pool, body, user, delivery_settings), fields(admin_id = %user.id))]
pub async fn update_delivery_weight(
    path: web::Path<String>,
    body: UpdateDeliveryWeightRequest,
    pool: web::Data<PgPool>,
    delivery_settings: web::Data<DeliverySettings>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<DeliveryTracking>>, GenericError> {
    let tracking =
        utils::update_delivery_weight(&pool, &path, &body.weight_kg, &delivery_settings).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated delivery weight",
        Some(tracking),
    )))
}
