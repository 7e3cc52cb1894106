use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{deserialize_mobile_no, MobileNo};

#[derive(Debug, Serialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub label: String,
    pub recipient_name: String,
    pub mobile_no: String,
    pub city: String,
    pub street_address: String,
    pub postal_code: Option<String>,
    pub is_default: bool,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressList {
    pub addresses: Vec<Address>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub label: String,
    pub recipient_name: String,
    #[serde(deserialize_with = "deserialize_mobile_no")]
    pub mobile_no: MobileNo,
    pub city: String,
    pub street_address: String,
    pub postal_code: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl CreateAddressRequest {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("label", &self.label),
            ("recipientName", &self.recipient_name),
            ("city", &self.city),
            ("streetAddress", &self.street_address),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(format!("{} is required", name)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    pub label: Option<String>,
    pub recipient_name: Option<String>,
    pub mobile_no: Option<String>,
    pub city: Option<String>,
    pub street_address: Option<String>,
    pub postal_code: Option<String>,
    pub is_default: Option<bool>,
}

impl UpdateAddressRequest {
    pub fn validate(&self) -> Result<Option<MobileNo>, String> {
        let optional = [
            ("label", &self.label),
            ("recipientName", &self.recipient_name),
            ("city", &self.city),
            ("streetAddress", &self.street_address),
        ];
        if let Some((name, _)) = optional
            .iter()
            .find(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        {
            return Err(format!("{} cannot be empty", name));
        }
        self.mobile_no.clone().map(MobileNo::parse).transpose()
    }
}
