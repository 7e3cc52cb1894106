use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::impl_json_request;
use crate::payment_client::GatewayPaymentStatus;
use crate::routes::order::schemas::{OrderStatus, PaymentMethod};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: i64,
    pub status: OrderStatus,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub payer_name: Option<String>,
    pub bank_name: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentList {
    pub payments: Vec<Payment>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitiateBogPaymentRequest {
    pub order_no: String,
}
impl_json_request!(InitiateBogPaymentRequest);

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BogPaymentInitiation {
    pub order_no: String,
    pub gateway_order_id: String,
    /// Gateway page the customer is sent to.
    pub redirect_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankTransferRequest {
    pub order_no: String,
    pub transaction_id: String,
    pub payer_name: String,
    pub bank_name: String,
}
impl_json_request!(BankTransferRequest);

impl BankTransferRequest {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("transactionId", &self.transaction_id),
            ("payerName", &self.payer_name),
            ("bankName", &self.bank_name),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(format!("{} is required", name)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BogOrderStatus {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BogCallbackBody {
    pub order_id: String,
    pub external_order_id: String,
    pub order_status: BogOrderStatus,
}

/// Status notification posted by BOG to the callback URL.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BogCallback {
    pub event: String,
    pub body: BogCallbackBody,
}

impl BogCallback {
    /// Status claimed by the notification. Only the gateway's own record is
    /// trusted when applying it.
    pub fn reported_status(&self) -> GatewayPaymentStatus {
        GatewayPaymentStatus::from_key(&self.body.order_status.key)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BogCallbackResult {
    pub order_no: String,
    pub status: OrderStatus,
}
