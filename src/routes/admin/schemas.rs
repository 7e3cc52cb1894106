use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::order::schemas::OrderStatus;

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub user_count: i64,
    pub product_count: i64,
    pub order_count: i64,
    pub orders_by_status: Vec<OrderStatusCount>,
    /// Total of paid, shipped and delivered orders in tetri.
    pub revenue: i64,
}
