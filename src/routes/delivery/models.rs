use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::{DeliveryStatus, DeliveryTracking};
use crate::routes::order::models::OrderModel;

pub const DELIVERY_TRACKING_COLUMNS: &str = "id, order_id, delivery_status, ordered_at, received_china_at, sent_tbilisi_at, delivered_tbilisi_at, weight_kg, transportation_price";

#[derive(Debug, Clone, FromRow)]
pub struct DeliveryTrackingModel {
    pub id: Uuid,
    pub order_id: Uuid,
    pub delivery_status: DeliveryStatus,
    pub ordered_at: DateTime<Utc>,
    pub received_china_at: Option<DateTime<Utc>>,
    pub sent_tbilisi_at: Option<DateTime<Utc>>,
    pub delivered_tbilisi_at: Option<DateTime<Utc>>,
    pub weight_kg: Option<BigDecimal>,
    pub transportation_price: Option<i64>,
}

impl DeliveryTrackingModel {
    pub fn into_schema(self, order: &OrderModel) -> DeliveryTracking {
        DeliveryTracking {
            order_id: self.order_id,
            order_no: order.order_no.clone(),
            delivery_method: order.delivery_method,
            delivery_status: self.delivery_status,
            ordered_at: self.ordered_at,
            received_china_at: self.received_china_at,
            sent_tbilisi_at: self.sent_tbilisi_at,
            delivered_tbilisi_at: self.delivered_tbilisi_at,
            weight_kg: self.weight_kg,
            transportation_price: self.transportation_price,
        }
    }
}
