use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::{
    DeliveryMethod, Order, OrderLineItem, OrderStatus, PaymentMethod, ShippingAddress,
};

pub const ORDER_COLUMNS: &str = "id, order_no, user_id, items, total_amount, status, payment_method, delivery_method, recipient_name, mobile_no, city, street_address, postal_code, external_order_id, gateway_order_id, created_on, updated_on";

#[derive(Debug, FromRow)]
pub struct OrderModel {
    pub id: Uuid,
    pub order_no: String,
    pub user_id: Uuid,
    pub items: sqlx::types::Json<Vec<OrderLineItem>>,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub delivery_method: Option<DeliveryMethod>,
    pub recipient_name: String,
    pub mobile_no: String,
    pub city: String,
    pub street_address: String,
    pub postal_code: Option<String>,
    pub external_order_id: Option<String>,
    pub gateway_order_id: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl OrderModel {
    pub fn into_schema(self) -> Order {
        Order {
            id: self.id,
            order_no: self.order_no,
            user_id: self.user_id,
            items: self.items.0,
            total_amount: self.total_amount,
            status: self.status,
            payment_method: self.payment_method,
            delivery_method: self.delivery_method,
            shipping_address: ShippingAddress {
                recipient_name: self.recipient_name,
                mobile_no: self.mobile_no,
                city: self.city,
                street_address: self.street_address,
                postal_code: self.postal_code,
            },
            external_order_id: self.external_order_id,
            gateway_order_id: self.gateway_order_id,
            created_on: self.created_on,
            updated_on: self.updated_on,
        }
    }
}
