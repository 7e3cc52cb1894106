use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::Address;

#[derive(Debug, FromRow)]
pub struct AddressModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub label: String,
    pub recipient_name: String,
    pub mobile_no: String,
    pub city: String,
    pub street_address: String,
    pub postal_code: Option<String>,
    pub is_default: bool,
    pub created_on: DateTime<Utc>,
}

impl AddressModel {
    pub fn into_schema(self) -> Address {
        Address {
            id: self.id,
            label: self.label,
            recipient_name: self.recipient_name,
            mobile_no: self.mobile_no,
            city: self.city,
            street_address: self.street_address,
            postal_code: self.postal_code,
            is_default: self.is_default,
            created_on: self.created_on,
        }
    }
}
