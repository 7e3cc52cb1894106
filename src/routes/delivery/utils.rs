use anyhow::Context;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive, Zero};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::DeliveryTrackingError;
use super::models::{DeliveryTrackingModel, DELIVERY_TRACKING_COLUMNS};
use super::schemas::{DeliveryStatus, DeliveryTracking};
use crate::configuration::DeliverySettings;
use crate::routes::order::models::OrderModel;
use crate::routes::order::schemas::OrderStatus;
use crate::routes::order::utils::fetch_order_for_update;

/// Decimal places of `delivery_tracking.weight_kg`.
const WEIGHT_SCALE: i64 = 3;
/// Upper bound (exclusive) of a `NUMERIC(10, 3)` weight.
const MAX_WEIGHT_KG: i64 = 10_000_000;

/// Rounds the weight to the precision it is stored with and checks it fits
/// the column.
pub fn normalize_weight(weight_kg: &BigDecimal) -> Result<BigDecimal, String> {
    let weight_kg = weight_kg.with_scale_round(WEIGHT_SCALE, RoundingMode::HalfUp);
    if weight_kg <= BigDecimal::zero() {
        return Err("weightKg must be positive".to_string());
    }
    if weight_kg >= BigDecimal::from(MAX_WEIGHT_KG) {
        return Err(format!("weightKg must be below {}", MAX_WEIGHT_KG));
    }
    Ok(weight_kg)
}

/// `ceil(weight_kg * rate_per_kg)` in tetri, priced on the stored weight.
pub fn transportation_price(weight_kg: &BigDecimal, rate_per_kg: i64) -> Result<i64, String> {
    let weight_kg = normalize_weight(weight_kg)?;
    (weight_kg * BigDecimal::from(rate_per_kg))
        .with_scale_round(0, RoundingMode::Ceiling)
        .to_i64()
        .ok_or_else(|| "Transportation price is out of range".to_string())
}

/// Moves the tracking exactly one stage forward and stamps the time the new
/// stage was reached. Earlier stamps are kept as they are.
pub fn advance_delivery(
    mut tracking: DeliveryTrackingModel,
    next: DeliveryStatus,
    now: DateTime<Utc>,
) -> Result<DeliveryTrackingModel, DeliveryTrackingError> {
    if tracking.delivery_status.next() != Some(next) {
        return Err(DeliveryTrackingError::InvalidStep {
            from: tracking.delivery_status,
            to: next,
        });
    }
    match next {
        DeliveryStatus::Ordered => tracking.ordered_at = now,
        DeliveryStatus::ReceivedChina => tracking.received_china_at = Some(now),
        DeliveryStatus::SentTbilisi => tracking.sent_tbilisi_at = Some(now),
        DeliveryStatus::DeliveredTbilisi => tracking.delivered_tbilisi_at = Some(now),
    }
    tracking.delivery_status = next;
    Ok(tracking)
}

#[tracing::instrument(name = "Save delivery tracking", skip(transaction))]
pub async fn save_delivery_tracking(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"INSERT INTO delivery_tracking (id, order_id, delivery_status, ordered_at)
        VALUES ($1, $2, $3, NOW())"#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(DeliveryStatus::Ordered)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving delivery tracking")
    })?;
    Ok(())
}

#[tracing::instrument(name = "Fetch delivery tracking", skip(pool))]
pub async fn fetch_delivery_tracking(
    pool: &PgPool,
    order_id: Uuid,
) -> Result<Option<DeliveryTrackingModel>, anyhow::Error> {
    let query = format!(
        "SELECT {} FROM delivery_tracking WHERE order_id = $1",
        DELIVERY_TRACKING_COLUMNS
    );
    let row = sqlx::query_as::<_, DeliveryTrackingModel>(&query)
        .bind(order_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching delivery tracking")
        })?;
    Ok(row)
}

async fn lock_delivery_tracking(
    transaction: &mut Transaction<'_, Postgres>,
    order_no: &str,
) -> Result<(OrderModel, DeliveryTrackingModel), DeliveryTrackingError> {
    let order = fetch_order_for_update(transaction, order_no)
        .await?
        .ok_or_else(|| DeliveryTrackingError::NotFound(order_no.to_string()))?;
    let query = format!(
        "SELECT {} FROM delivery_tracking WHERE order_id = $1 FOR UPDATE",
        DELIVERY_TRACKING_COLUMNS
    );
    let tracking = sqlx::query_as::<_, DeliveryTrackingModel>(&query)
        .bind(order.id)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while locking delivery tracking")
        })?
        .ok_or_else(|| DeliveryTrackingError::NotFound(order_no.to_string()))?;
    Ok((order, tracking))
}

#[tracing::instrument(name = "Update delivery status", skip(pool))]
pub async fn update_delivery_status(
    pool: &PgPool,
    order_no: &str,
    next: DeliveryStatus,
) -> Result<DeliveryTracking, DeliveryTrackingError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let (order, tracking) = lock_delivery_tracking(&mut transaction, order_no).await?;
    if order.status == OrderStatus::Cancelled {
        return Err(DeliveryTrackingError::InvalidOrderState(format!(
            "Order {} is cancelled",
            order_no
        )));
    }
    let tracking = advance_delivery(tracking, next, Utc::now())?;
    let query = format!(
        r#"UPDATE delivery_tracking SET
            delivery_status = $2,
            received_china_at = $3,
            sent_tbilisi_at = $4,
            delivered_tbilisi_at = $5,
            updated_on = NOW()
        WHERE id = $1
        RETURNING {}"#,
        DELIVERY_TRACKING_COLUMNS
    );
    let row = sqlx::query_as::<_, DeliveryTrackingModel>(&query)
        .bind(tracking.id)
        .bind(tracking.delivery_status)
        .bind(tracking.received_china_at)
        .bind(tracking.sent_tbilisi_at)
        .bind(tracking.delivered_tbilisi_at)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while updating delivery status")
        })?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to update delivery status")?;
    Ok(row.into_schema(&order))
}

#[tracing::instrument(name = "Update delivery weight", skip(pool, delivery_settings))]
pub async fn update_delivery_weight(
    pool: &PgPool,
    order_no: &str,
    weight_kg: &BigDecimal,
    delivery_settings: &DeliverySettings,
) -> Result<DeliveryTracking, DeliveryTrackingError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let (order, tracking) = lock_delivery_tracking(&mut transaction, order_no).await?;
    let delivery_method = order.delivery_method.ok_or_else(|| {
        DeliveryTrackingError::ValidationError(format!(
            "Order {} has no delivery method",
            order_no
        ))
    })?;
    let weight_kg = normalize_weight(weight_kg).map_err(DeliveryTrackingError::ValidationError)?;
    let price = transportation_price(&weight_kg, delivery_settings.rate_per_kg(delivery_method))
        .map_err(DeliveryTrackingError::ValidationError)?;
    let query = format!(
        r#"UPDATE delivery_tracking SET weight_kg = $2, transportation_price = $3, updated_on = NOW()
        WHERE id = $1
        RETURNING {}"#,
        DELIVERY_TRACKING_COLUMNS
    );
    let row = sqlx::query_as::<_, DeliveryTrackingModel>(&query)
        .bind(tracking.id)
        .bind(&weight_kg)
        .bind(price)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while updating delivery weight")
        })?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to update delivery weight")?;
    Ok(row.into_schema(&order))
}
