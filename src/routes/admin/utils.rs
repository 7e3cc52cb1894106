use sqlx::PgPool;

use super::models::OrderStatusSummaryModel;
use super::schemas::{AdminStats, OrderStatusCount};
use crate::routes::order::schemas::OrderStatus;

/// Expands per status totals into a count for every status and the revenue
/// of orders that have been paid.
pub fn summarize_orders(
    rows: &[OrderStatusSummaryModel],
) -> Result<(Vec<OrderStatusCount>, i64), anyhow::Error> {
    let counts = OrderStatus::ALL
        .iter()
        .map(|status| OrderStatusCount {
            status: *status,
            count: rows
                .iter()
                .filter(|row| row.status == *status)
                .map(|row| row.count)
                .sum(),
        })
        .collect();
    let revenue = rows
        .iter()
        .filter(|row| row.status.is_paid_or_later())
        .try_fold(0i64, |total, row| total.checked_add(row.total_amount))
        .ok_or_else(|| anyhow::anyhow!("Revenue is out of range"))?;
    Ok((counts, revenue))
}

async fn count_rows(pool: &PgPool, query: &str) -> Result<i64, anyhow::Error> {
    let count = sqlx::query_scalar::<_, i64>(query)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while counting rows")
        })?;
    Ok(count)
}

async fn fetch_order_summary(pool: &PgPool) -> Result<Vec<OrderStatusSummaryModel>, anyhow::Error> {
    let rows = sqlx::query_as::<_, OrderStatusSummaryModel>(
        r#"SELECT status, COUNT(*) AS count, COALESCE(SUM(total_amount), 0)::BIGINT AS total_amount
        FROM customer_order GROUP BY status"#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while summarizing orders")
    })?;
    Ok(rows)
}

#[tracing::instrument(name = "Fetch admin stats", skip(pool))]
pub async fn fetch_stats(pool: &PgPool) -> Result<AdminStats, anyhow::Error> {
    let (user_count, product_count, summary) = futures::future::try_join3(
        count_rows(pool, "SELECT COUNT(*) FROM user_account"),
        count_rows(pool, "SELECT COUNT(*) FROM product WHERE is_active"),
        fetch_order_summary(pool),
    )
    .await?;
    let (orders_by_status, revenue) = summarize_orders(&summary)?;
    Ok(AdminStats {
        user_count,
        product_count,
        order_count: orders_by_status.iter().map(|row| row.count).sum(),
        orders_by_status,
        revenue,
    })
}
