use sqlx::FromRow;

use super::schemas::Category;
use crate::schemas::Language;

#[derive(Debug, FromRow)]
pub struct CategoryModel {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name_ka: String,
    pub name_en: String,
    pub slug: String,
}

impl CategoryModel {
    pub fn into_schema(self, language: Language) -> Category {
        Category {
            id: self.id,
            parent_id: self.parent_id,
            name: language.pick(&self.name_ka, &self.name_en).to_string(),
            name_ka: self.name_ka,
            name_en: self.name_en,
            slug: self.slug,
        }
    }
}
