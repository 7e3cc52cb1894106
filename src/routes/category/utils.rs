use sqlx::PgPool;

use super::models::CategoryModel;
use super::schemas::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::database::{database_error_code, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::errors::GenericError;
use crate::schemas::Language;

/// Maps slug and parent constraint violations to client errors.
pub fn category_write_error(error: anyhow::Error, action: &str) -> GenericError {
    match database_error_code(&error).as_deref() {
        Some(UNIQUE_VIOLATION) => {
            GenericError::ValidationError("Category slug is already in use".to_string())
        }
        Some(FOREIGN_KEY_VIOLATION) => {
            GenericError::ValidationError("Parent category doesn't exist".to_string())
        }
        _ => GenericError::DatabaseError(
            format!("Something went wrong while {} category", action),
            error,
        ),
    }
}

#[tracing::instrument(name = "Fetch categories", skip(pool))]
pub async fn fetch_categories(
    pool: &PgPool,
    language: Language,
) -> Result<Vec<Category>, anyhow::Error> {
    let rows = sqlx::query_as::<_, CategoryModel>(
        r#"SELECT id, parent_id, name_ka, name_en, slug FROM category
        ORDER BY parent_id NULLS FIRST, id"#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching categories")
    })?;
    Ok(rows.into_iter().map(|row| row.into_schema(language)).collect())
}

#[tracing::instrument(name = "Save category", skip(pool))]
pub async fn save_category(
    pool: &PgPool,
    request: &CreateCategoryRequest,
    language: Language,
) -> Result<Category, anyhow::Error> {
    let row = sqlx::query_as::<_, CategoryModel>(
        r#"INSERT INTO category (parent_id, name_ka, name_en, slug, created_on)
        VALUES ($1, $2, $3, $4, NOW())
        RETURNING id, parent_id, name_ka, name_en, slug"#,
    )
    .bind(request.parent_id)
    .bind(request.name_ka.trim())
    .bind(request.name_en.trim())
    .bind(&request.slug)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving category")
    })?;
    Ok(row.into_schema(language))
}

#[tracing::instrument(name = "Update category", skip(pool))]
pub async fn update_category(
    pool: &PgPool,
    id: i64,
    request: &UpdateCategoryRequest,
    language: Language,
) -> Result<Option<Category>, anyhow::Error> {
    let row = sqlx::query_as::<_, CategoryModel>(
        r#"UPDATE category SET
            name_ka = COALESCE($2, name_ka),
            name_en = COALESCE($3, name_en),
            slug = COALESCE($4, slug),
            parent_id = COALESCE($5, parent_id),
            updated_on = NOW()
        WHERE id = $1
        RETURNING id, parent_id, name_ka, name_en, slug"#,
    )
    .bind(id)
    .bind(request.name_ka.as_deref().map(str::trim))
    .bind(request.name_en.as_deref().map(str::trim))
    .bind(request.slug.as_deref())
    .bind(request.parent_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while updating category")
    })?;
    Ok(row.map(|row| row.into_schema(language)))
}

/// Products of a deleted category keep a `NULL` category through the
/// foreign key's `ON DELETE SET NULL`.
#[tracing::instrument(name = "Delete category", skip(pool))]
pub async fn delete_category(pool: &PgPool, id: i64) -> Result<bool, anyhow::Error> {
    let result = sqlx::query("DELETE FROM category WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while deleting category")
        })?;
    Ok(result.rows_affected() > 0)
}
