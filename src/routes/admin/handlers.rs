use actix_web::web;
use sqlx::PgPool;

use super::schemas::AdminStats;
use super::utils;
use crate::errors::GenericError;
use crate::routes::order::schemas::{OrderList, OrderListQuery};
use crate::routes::order::utils::fetch_orders;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::GenericResponse;

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    params(
        ("Authorization" = String, Header, description = "JWT token of an admin"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Store statistics", body= GenericResponse<AdminStats>),
    )
)]
#[tracing::instrument(err, name = "Fetch admin stats", skip(pool, user), fields(admin_id = %user.id))]
pub async fn fetch_stats(
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<AdminStats>>, GenericError> {
    let stats = utils::fetch_stats(&pool).await.map_err(|e| {
        GenericError::DatabaseError("Something went wrong while fetching stats".to_string(), e)
    })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched stats",
        Some(stats),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/order/list",
    tag = "Admin",
    params(
        OrderListQuery,
        ("Authorization" = String, Header, description = "JWT token of an admin"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Orders of all customers", body= GenericResponse<OrderList>),
    )
)]
#[tracing::instrument(err, name = "List all orders", skip(pool, user), fields(admin_id = %user.id))]
pub async fn list_all_orders(
    query: web::Query<OrderListQuery>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<OrderList>>, GenericError> {
    let pagination = query.pagination();
    let orders = fetch_orders(
        &pool,
        None,
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
