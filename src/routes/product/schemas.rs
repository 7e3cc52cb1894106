use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::impl_json_request;
use crate::schemas::PaginationQuery;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub name_ka: String,
    pub name_en: String,
    pub description_ka: Option<String>,
    pub description_en: Option<String>,
    /// Price in tetri.
    pub price: i64,
    pub stock: i32,
    pub images: Vec<String>,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProductListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub category_id: Option<i64>,
    pub name_ka: String,
    pub name_en: String,
    pub description_ka: Option<String>,
    pub description_en: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<String>,
}
impl_json_request!(CreateProductRequest);

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name_ka.trim().is_empty() || self.name_en.trim().is_empty() {
            return Err("Product name is required in both languages".to_string());
        }
        validate_price_and_stock(Some(self.price), Some(self.stock))
    }
}

#[derive(Debug, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub category_id: Option<i64>,
    pub name_ka: Option<String>,
    pub name_en: Option<String>,
    pub description_ka: Option<String>,
    pub description_en: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
impl_json_request!(UpdateProductRequest);

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        let blank_name = [&self.name_ka, &self.name_en]
            .iter()
            .any(|name| name.as_deref().is_some_and(|n| n.trim().is_empty()));
        if blank_name {
            return Err("Product name cannot be empty".to_string());
        }
        validate_price_and_stock(self.price, self.stock)
    }
}

fn validate_price_and_stock(price: Option<i64>, stock: Option<i32>) -> Result<(), String> {
    if price.is_some_and(|price| price <= 0) {
        return Err("Price must be a positive amount of tetri".to_string());
    }
    if stock.is_some_and(|stock| stock < 0) {
        return Err("Stock cannot be negative".to_string());
    }
    Ok(())
}
