use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::Payment;
use crate::routes::order::schemas::{OrderStatus, PaymentMethod};

pub const PAYMENT_COLUMNS: &str =
    "id, order_id, amount, status, method, transaction_id, payer_name, bank_name, created_on, updated_on";

#[derive(Debug, FromRow)]
pub struct PaymentModel {
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

impl PaymentModel {
    pub fn into_schema(self) -> Payment {
        Payment {
            id: self.id,
            order_id: self.order_id,
            amount: self.amount,
            status: self.status,
            method: self.method,
            transaction_id: self.transaction_id,
            payer_name: self.payer_name,
            bank_name: self.bank_name,
            created_on: self.created_on,
            updated_on: self.updated_on,
        }
    }
}
