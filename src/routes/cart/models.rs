use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::schemas::CartItem;
use crate::routes::order::schemas::OrderLineItem;

#[derive(Debug, FromRow)]
pub struct CartItemModel {
    pub product_id: i64,
    pub name: String,
    pub price: i64,
    pub image: Option<String>,
    pub quantity: i32,
    pub created_on: DateTime<Utc>,
}

impl CartItemModel {
    pub fn into_schema(self) -> CartItem {
        CartItem {
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            image: self.image,
            quantity: self.quantity,
            created_on: self.created_on,
        }
    }

    pub fn into_line_item(self) -> OrderLineItem {
        OrderLineItem {
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            image: self.image,
        }
    }
}
