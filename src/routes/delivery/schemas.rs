use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::impl_json_request;
use crate::routes::order::schemas::DeliveryMethod;

#[derive(
    Serialize, Deserialize, Debug, sqlx::Type, Clone, Copy, PartialEq, Eq, Hash, ToSchema,
)]
#[sqlx(type_name = "delivery_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Ordered,
    ReceivedChina,
    SentTbilisi,
    DeliveredTbilisi,
}

impl DeliveryStatus {
    pub fn next(self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Ordered => Some(DeliveryStatus::ReceivedChina),
            DeliveryStatus::ReceivedChina => Some(DeliveryStatus::SentTbilisi),
            DeliveryStatus::SentTbilisi => Some(DeliveryStatus::DeliveredTbilisi),
            DeliveryStatus::DeliveredTbilisi => None,
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            DeliveryStatus::Ordered => "ORDERED",
            DeliveryStatus::ReceivedChina => "RECEIVED_CHINA",
            DeliveryStatus::SentTbilisi => "SENT_TBILISI",
            DeliveryStatus::DeliveredTbilisi => "DELIVERED_TBILISI",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTracking {
    pub order_id: Uuid,
    pub order_no: String,
    pub delivery_method: Option<DeliveryMethod>,
    pub delivery_status: DeliveryStatus,
    pub ordered_at: DateTime<Utc>,
    pub received_china_at: Option<DateTime<Utc>>,
    pub sent_tbilisi_at: Option<DateTime<Utc>>,
    pub delivered_tbilisi_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>)]
    pub weight_kg: Option<BigDecimal>,
    /// Price in tetri derived from the weight and the delivery method rate.
    pub transportation_price: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryStatusRequest {
    pub status: DeliveryStatus,
}
impl_json_request!(UpdateDeliveryStatusRequest);

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryWeightRequest {
    #[schema(value_type = String, example = "2.350")]
    pub weight_kg: BigDecimal,
}
impl_json_request!(UpdateDeliveryWeightRequest);
