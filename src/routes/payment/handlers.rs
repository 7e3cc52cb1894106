use std::sync::Arc;

use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{
    BankTransferRequest, BogCallback, BogCallbackResult, BogPaymentInitiation,
    InitiateBogPaymentRequest, Payment, PaymentList,
};
use super::utils;
use crate::errors::GenericError;
use crate::payment_client::PaymentGateway;
use crate::routes::order::utils::fetch_order_for_user;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::GenericResponse;

#[utoipa::path(
    post,
    path = "/api/payment/bog/initiate",
    tag = "Payment",
    description = "Creates a BOG payment for a pending order and returns the page the customer pays on.",
    request_body(content = InitiateBogPaymentRequest, description = "Request Body"),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Payment created at BOG", body= GenericResponse<BogPaymentInitiation>),
        (status=400, description= "Order isn't paid through BOG", body= GenericResponse<TupleUnit>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
        (status=409, description= "Order is not pending", body= GenericResponse<TupleUnit>),
        (status=502, description= "BOG request failed", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Initiate BOG payment", skip(pool, gateway, user), fields(user_id = %user.id, order_no = %body.order_no))]
pub async fn initiate_bog_payment(
    body: InitiateBogPaymentRequest,
    pool: web::Data<PgPool>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<BogPaymentInitiation>>, GenericError> {
    let initiation =
        utils::initiate_bog_payment(&pool, gateway.get_ref().as_ref(), user.id, &body.order_no)
            .await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created payment",
        Some(initiation),
    )))
}

#[utoipa::path(
    post,
    path = "/api/payment/bog/callback",
    tag = "Payment",
    description = "Status notifications from BOG. The status is confirmed with BOG before it is applied and the raw payload is kept on the order.",
    request_body(content = BogCallback, description = "Request Body"),
    responses(
        (status=200, description= "Callback applied", body= GenericResponse<BogCallbackResult>),
        (status=400, description= "Callback doesn't match the order", body= GenericResponse<TupleUnit>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
        (status=502, description= "BOG status lookup failed", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "BOG callback", skip(pool, gateway, body))]
pub async fn bog_callback(
    body: web::Bytes,
    pool: web::Data<PgPool>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
) -> Result<web::Json<GenericResponse<BogCallbackResult>>, GenericError> {
    let payload: serde_json::Value = serde_json::from_slice(&body)?;
    let callback: BogCallback = serde_json::from_value(payload.clone())?;
    tracing::info!(
        event = %callback.event,
        status = %callback.body.order_status.key,
        "Received BOG callback for {}",
        callback.body.external_order_id
    );
    let result =
        utils::process_bog_callback(&pool, gateway.get_ref().as_ref(), &callback, &payload)
            .await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully processed callback",
        Some(result),
    )))
}

#[utoipa::path(
    post,
    path = "/api/payment/bank-transfer",
    tag = "Payment",
    description = "Records the bank transfer details of a pending order. The order waits in PROCESSING until an admin confirms the payment.",
    request_body(content = BankTransferRequest, description = "Request Body"),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Transfer recorded", body= GenericResponse<Payment>),
        (status=400, description= "Invalid transfer details", body= GenericResponse<TupleUnit>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
        (status=409, description= "Order is not pending", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Submit bank transfer", skip(pool, body, user), fields(user_id = %user.id, order_no = %body.order_no))]
pub async fn submit_bank_transfer(
    body: BankTransferRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Payment>>, GenericError> {
    let payment = utils::submit_bank_transfer(&pool, user.id, &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully recorded bank transfer",
        Some(payment),
    )))
}

#[utoipa::path(
    get,
    path = "/api/order/{order_no}/payments",
    tag = "Payment",
    params(
        ("order_no" = String, Path, description = "Order number"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Payments of the order", body= GenericResponse<PaymentList>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "List payments", skip(pool, user), fields(user_id = %user.id))]
pub async fn list_payments(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<PaymentList>>, GenericError> {
    let order = fetch_order_for_user(&pool, &user, &path).await?;
    let payments = utils::fetch_payments(&pool, order.id).await.map_err(|e| {
        GenericError::DatabaseError("Something went wrong while fetching payments".to_string(), e)
    })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched payments",
        Some(PaymentList { payments }),
    )))
}
