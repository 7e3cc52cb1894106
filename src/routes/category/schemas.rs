use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::impl_json_request;

lazy_static! {
    static ref SLUG_PATTERN: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

pub fn validate_slug(slug: &str) -> Result<(), String> {
    if SLUG_PATTERN.is_match(slug) {
        Ok(())
    } else {
        Err(format!(
            "{} is not a valid slug, use lowercase letters, digits and dashes",
            slug
        ))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub name_ka: String,
    pub name_en: String,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name_ka: String,
    pub name_en: String,
    pub slug: String,
    pub parent_id: Option<i64>,
}
impl_json_request!(CreateCategoryRequest);

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name_ka.trim().is_empty() || self.name_en.trim().is_empty() {
            return Err("Category name is required in both languages".to_string());
        }
        validate_slug(&self.slug)
    }
}

#[derive(Debug, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name_ka: Option<String>,
    pub name_en: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<i64>,
}
impl_json_request!(UpdateCategoryRequest);

impl UpdateCategoryRequest {
    pub fn validate(&self, id: i64) -> Result<(), String> {
        let blank_name = [&self.name_ka, &self.name_en]
            .iter()
            .any(|name| name.as_deref().is_some_and(|n| n.trim().is_empty()));
        if blank_name {
            return Err("Category name cannot be empty".to_string());
        }
        if self.parent_id == Some(id) {
            return Err("A category cannot be its own parent".to_string());
        }
        match &self.slug {
            Some(slug) => validate_slug(slug),
            None => Ok(()),
        }
    }
}
