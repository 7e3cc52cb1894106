use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{
    CreateProductRequest, Product, ProductList, ProductListQuery, UpdateProductRequest,
};
use super::utils::{
    deactivate_product, fetch_product_model, fetch_products, save_product,
    update_product as update_product_by_id,
};
use crate::database::{database_error_code, FOREIGN_KEY_VIOLATION};
use crate::errors::GenericError;
use crate::schemas::{GenericResponse, RequestMetaData};

fn product_write_error(error: anyhow::Error, action: &str) -> GenericError {
    match database_error_code(&error).as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => {
            GenericError::ValidationError("Category doesn't exist".to_string())
        }
        _ => GenericError::DatabaseError(
            format!("Something went wrong while {} product", action),
            error,
        ),
    }
}

#[utoipa::path(
    get,
    path = "/api/product/list",
    tag = "Product",
    description = "Lists active products, optionally filtered by category and a text search over both languages.",
    params(
        ProductListQuery,
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
        ("x-language" = Option<String>, Header, description = "ka or en"),
    ),
    responses(
        (status=200, description= "Product list", body= GenericResponse<ProductList>),
        (status=400, description= "Invalid query", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "List products", skip(pool, meta_data))]
pub async fn list_products(
    query: web::Query<ProductListQuery>,
    pool: web::Data<PgPool>,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<ProductList>>, GenericError> {
    let (products, total) = fetch_products(&pool, &query, meta_data.language)
        .await
        .map_err(|e| {
            GenericError::DatabaseError(
                "Something went wrong while fetching products".to_string(),
                e,
            )
        })?;
    let pagination = query.pagination();
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched products",
        Some(ProductList {
            products,
            total,
            limit: pagination.limit(),
            offset: pagination.offset(),
        }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/product/{id}",
    tag = "Product",
    params(
        ("id" = i64, Path, description = "Product id"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
        ("x-language" = Option<String>, Header, description = "ka or en"),
    ),
    responses(
        (status=200, description= "Product detail", body= GenericResponse<Product>),
        (status=404, description= "Product not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Fetch product", skip(pool, meta_data))]
pub async fn fetch_product(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<Product>>, GenericError> {
    let id = path.into_inner();
    let product = fetch_product_model(&pool, id)
        .await
        .map_err(|e| {
            GenericError::DatabaseError(
                "Something went wrong while fetching product".to_string(),
                e,
            )
        })?
        .filter(|product| product.is_active)
        .ok_or_else(|| GenericError::DataNotFound(format!("Product {} not found", id)))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched product",
        Some(product.into_schema(meta_data.language)),
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/product",
    tag = "Admin",
    request_body(content = CreateProductRequest, description = "Request Body"),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Created product", body= GenericResponse<Product>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Create product", skip(pool, meta_data))]
pub async fn create_product(
    body: CreateProductRequest,
    pool: web::Data<PgPool>,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<Product>>, GenericError> {
    body.validate().map_err(GenericError::ValidationError)?;
    let product = save_product(&pool, &body, meta_data.language)
        .await
        .map_err(|e| product_write_error(e, "saving"))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created product",
        Some(product),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/product/{id}",
    tag = "Admin",
    request_body(content = UpdateProductRequest, description = "Request Body"),
    params(
        ("id" = i64, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Updated product", body= GenericResponse<Product>),
        (status=404, description= "Product not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Update product", skip(pool, meta_data))]
pub async fn update_product(
    path: web::Path<i64>,
    body: UpdateProductRequest,
    pool: web::Data<PgPool>,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<Product>>, GenericError> {
    let id = path.into_inner();
    body.validate().map_err(GenericError::ValidationError)?;
    let product = update_product_by_id(&pool, id, &body, meta_data.language)
        .await
        .map_err(|e| product_write_error(e, "updating"))?
        .ok_or_else(|| GenericError::DataNotFound(format!("Product {} not found", id)))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated product",
        Some(product),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/product/{id}",
    tag = "Admin",
    params(
        ("id" = i64, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Product deactivated", body= GenericResponse<TupleUnit>),
        (status=404, description= "Product not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Delete product", skip(pool))]
pub async fn delete_product(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    let id = path.into_inner();
    let deleted = deactivate_product(&pool, id).await.map_err(|e| {
        GenericError::DatabaseError(
            "Something went wrong while deleting product".to_string(),
            e,
        )
    })?;
    if !deleted {
        return Err(GenericError::DataNotFound(format!(
            "Product {} not found",
            id
        )));
    }
    Ok(web::Json(GenericResponse::success(
        "Successfully deleted product",
        Some(()),
    )))
}
