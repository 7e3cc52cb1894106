use sqlx::PgPool;

use super::models::{ProductModel, PRODUCT_COLUMNS};
use super::schemas::{CreateProductRequest, Product, ProductListQuery, UpdateProductRequest};
use crate::schemas::Language;

/// Builds a case-insensitive `ILIKE` pattern with the LIKE wildcards of the
/// user input escaped. Blank input means no text filter.
pub fn search_pattern(search: Option<&str>) -> Option<String> {
    let search = search?.trim();
    if search.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

const PRODUCT_FILTER: &str = r#"is_active
    AND ($1::bigint IS NULL OR category_id = $1)
    AND ($2::text IS NULL
        OR name_ka ILIKE $2 OR name_en ILIKE $2
        OR description_ka ILIKE $2 OR description_en ILIKE $2)"#;

#[tracing::instrument(name = "Fetch products", skip(pool))]
pub async fn fetch_products(
    pool: &PgPool,
    query: &ProductListQuery,
    language: Language,
) -> Result<(Vec<Product>, i64), anyhow::Error> {
    let pattern = search_pattern(query.search.as_deref());
    let pagination = query.pagination();
    let list_query = format!(
        "SELECT {} FROM product WHERE {} ORDER BY created_on DESC, id DESC LIMIT $3 OFFSET $4",
        PRODUCT_COLUMNS, PRODUCT_FILTER
    );
    let task1 = sqlx::query_as::<_, ProductModel>(&list_query)
        .bind(query.category_id)
        .bind(pattern.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool);
    let count_query = format!("SELECT COUNT(*) FROM product WHERE {}", PRODUCT_FILTER);
    let task2 = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(query.category_id)
        .bind(pattern.as_deref())
        .fetch_one(pool);
    let (rows, total) = futures::future::try_join(task1, task2).await.map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching products")
    })?;
    Ok((
        rows.into_iter().map(|row| row.into_schema(language)).collect(),
        total,
    ))
}

#[tracing::instrument(name = "Fetch product model", skip(pool))]
pub async fn fetch_product_model(
    pool: &PgPool,
    id: i64,
) -> Result<Option<ProductModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, ProductModel>(&format!(
        "SELECT {} FROM product WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching product")
    })?;
    Ok(row)
}

#[tracing::instrument(name = "Save product", skip(pool))]
pub async fn save_product(
    pool: &PgPool,
    request: &CreateProductRequest,
    language: Language,
) -> Result<Product, anyhow::Error> {
    let row = sqlx::query_as::<_, ProductModel>(&format!(
        r#"INSERT INTO product (category_id, name_ka, name_en, description_ka, description_en, price, stock, images, is_active, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, true, NOW())
        RETURNING {}"#,
        PRODUCT_COLUMNS
    ))
    .bind(request.category_id)
    .bind(request.name_ka.trim())
    .bind(request.name_en.trim())
    .bind(request.description_ka.as_deref())
    .bind(request.description_en.as_deref())
    .bind(request.price)
    .bind(request.stock)
    .bind(sqlx::types::Json(&request.images))
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving product")
    })?;
    Ok(row.into_schema(language))
}

#[tracing::instrument(name = "Update product", skip(pool))]
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    request: &UpdateProductRequest,
    language: Language,
) -> Result<Option<Product>, anyhow::Error> {
    let row = sqlx::query_as::<_, ProductModel>(&format!(
        r#"UPDATE product SET
            category_id = COALESCE($2, category_id),
            name_ka = COALESCE($3, name_ka),
            name_en = COALESCE($4, name_en),
            description_ka = COALESCE($5, description_ka),
            description_en = COALESCE($6, description_en),
            price = COALESCE($7, price),
            stock = COALESCE($8, stock),
            images = COALESCE($9, images),
            is_active = COALESCE($10, is_active),
            updated_on = NOW()
        WHERE id = $1
        RETURNING {}"#,
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .bind(request.category_id)
    .bind(request.name_ka.as_deref().map(str::trim))
    .bind(request.name_en.as_deref().map(str::trim))
    .bind(request.description_ka.as_deref())
    .bind(request.description_en.as_deref())
    .bind(request.price)
    .bind(request.stock)
    .bind(request.images.as_ref().map(sqlx::types::Json))
    .bind(request.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while updating product")
    })?;
    Ok(row.map(|row| row.into_schema(language)))
}

#[tracing::instrument(name = "Deactivate product", skip(pool))]
pub async fn deactivate_product(pool: &PgPool, id: i64) -> Result<bool, anyhow::Error> {
    let result = sqlx::query(
        "UPDATE product SET is_active = false, updated_on = NOW() WHERE id = $1 AND is_active",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while deleting product")
    })?;
    Ok(result.rows_affected() > 0)
}
