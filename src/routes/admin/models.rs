use sqlx::FromRow;

use crate::routes::order::schemas::OrderStatus;

#[derive(Debug, FromRow)]
pub struct OrderStatusSummaryModel {
    pub status: OrderStatus,
    pub count: i64,
    pub total_amount: i64,
}
