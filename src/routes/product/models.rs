use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::schemas::Product;
use crate::schemas::Language;

pub const PRODUCT_COLUMNS: &str = "id, category_id, name_ka, name_en, description_ka, description_en, price, stock, images, is_active, created_on";

#[derive(Debug, FromRow)]
pub struct ProductModel {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name_ka: String,
    pub name_en: String,
    pub description_ka: Option<String>,
    pub description_en: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub images: sqlx::types::Json<Vec<String>>,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
}

impl ProductModel {
    pub fn localized_name(&self, language: Language) -> &str {
        language.pick(&self.name_ka, &self.name_en)
    }

    pub fn into_schema(self, language: Language) -> Product {
        let description = match (&self.description_ka, &self.description_en) {
            (Some(ka), Some(en)) => Some(language.pick(ka, en).to_string()),
            (ka, en) => ka.clone().or_else(|| en.clone()),
        };
        Product {
            id: self.id,
            category_id: self.category_id,
            name: self.localized_name(language).to_string(),
            description,
            name_ka: self.name_ka,
            name_en: self.name_en,
            description_ka: self.description_ka,
            description_en: self.description_en,
            price: self.price,
            stock: self.stock,
            images: self.images.0,
            is_active: self.is_active,
            created_on: self.created_on,
        }
    }
}
