use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{CheckoutRequest, Order, OrderList, OrderListQuery, UpdateOrderStatusRequest};
use super::utils;
use crate::errors::GenericError;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::GenericResponse;

#[utoipa::path(
    post,
    path = "/api/order/checkout",
    tag = "Order",
    description = "Places an order from the given line items, or from the cart when no items are sent. The order starts as PENDING with a pending payment and delivery tracking.",
    request_body(content = CheckoutRequest, description = "Request Body"),
    responses(
        (status=200, description= "Placed order", body= GenericResponse<Order>),
        (status=400, description= "Invalid order", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Checkout", skip(pool, body, user), fields(user_id = %user.id))]
pub async fn checkout(
    body: CheckoutRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Order>>, GenericError> {
    let order = utils::create_order(&pool, user.id, &body).await?;
    tracing::info!(order_no = %order.order_no, total_amount = order.total_amount, "Order placed");
    Ok(web::Json(GenericResponse::success(
        "Successfully placed order",
        Some(order),
    )))
}

#[utoipa::path(
    get,
    path = "/api/order/list",
    tag = "Order",
    params(
        OrderListQuery,
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Orders of the current user", body= GenericResponse<OrderList>),
    )
)]
#[tracing::instrument(err, name = "List orders", skip(pool, user), fields(user_id = %user.id))]
pub async fn list_orders(
    query: web::Query<OrderListQuery>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<OrderList>>, GenericError> {
    let pagination = query.pagination();
    let orders = utils::fetch_orders(
        &pool,
        Some(user.id),
        query.status,
        pagination.limit(),
        pagination.offset(),
    )
    .await
    .map_err(|e| {
        GenericError::DatabaseError("Something went wrong while fetching orders".to_string(), e)
    })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched orders",
        Some(OrderList {
            orders,
            limit: pagination.limit(),
            offset: pagination.offset(),
        }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/order/{order_no}",
    tag = "Order",
    params(
        ("order_no" = String, Path, description = "Order number"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Order detail", body= GenericResponse<Order>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Fetch order", skip(pool, user), fields(user_id = %user.id))]
pub async fn fetch_order(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Order>>, GenericError> {
    let order = utils::fetch_order_for_user(&pool, &user, &path).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched order",
        Some(order.into_schema()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/order/{order_no}/cancel",
    tag = "Order",
    description = "Cancels an order of the current user. Only PENDING orders can be cancelled.",
    params(
        ("order_no" = String, Path, description = "Order number"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Cancelled order", body= GenericResponse<Order>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
        (status=409, description= "Order can no longer be cancelled", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Cancel order", skip(pool, user), fields(user_id = %user.id))]
pub async fn cancel_order(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Order>>, GenericError> {
    let order = utils::cancel_order(&pool, user.id, &path).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully cancelled order",
        Some(order),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/order/{order_no}/status",
    tag = "Admin",
    description = "Moves an order forward along PENDING, PROCESSING, PAID, SHIPPED, DELIVERED, or cancels it before delivery.",
    request_body(content = UpdateOrderStatusRequest, description = "Request Body"),
    params(
        ("order_no" = String, Path, description = "Order number"),
        ("Authorization" = String, Header, description = "JWT token of an admin"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Updated order", body= GenericResponse<Order>),
        (status=404, description= "Order not found", body= GenericResponse<TupleUnit>),
        (status=409, description= "Transition not allowed", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Update order status", skip(pool, body, user), fields(admin_id = %user.id, status = %body.status))]
pub async fn update_order_status(
    path: web::Path<String>,
    body: UpdateOrderStatusRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Order>>, GenericError> {
    let order = utils::transition_order_status(&pool, &path, body.status).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated order status",
        Some(order),
    )))
}
