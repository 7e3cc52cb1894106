use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{Category, CategoryList, CreateCategoryRequest, UpdateCategoryRequest};
use super::utils::{
    category_write_error, delete_category as delete_category_by_id, fetch_categories,
    save_category, update_category as update_category_by_id,
};
use crate::errors::GenericError;
use crate::schemas::{GenericResponse, RequestMetaData};

#[utoipa::path(
    get,
    path = "/api/category/list",
    tag = "Category",
    responses(
        (status=200, description= "Category list", body= GenericResponse<CategoryList>),
    ),
    params(
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
        ("x-language" = Option<String>, Header, description = "ka or en"),
    )
)]
#[tracing::instrument(err, name = "List categories", skip(pool, meta_data))]
pub async fn list_categories(
    pool: web::Data<PgPool>,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<CategoryList>>, GenericError> {
    let categories = fetch_categories(&pool, meta_data.language)
        .await
        .map_err(|e| {
            GenericError::DatabaseError(
                "Something went wrong while fetching categories".to_string(),
                e,
            )
        })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched categories",
        Some(CategoryList { categories }),
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/category",
    tag = "Admin",
    request_body(content = CreateCategoryRequest, description = "Request Body"),
    responses(
        (status=200, description= "Created category", body= GenericResponse<Category>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Create category", skip(pool, meta_data))]
pub async fn create_category(
    body: CreateCategoryRequest,
    pool: web::Data<PgPool>,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<Category>>, GenericError> {
    body.validate().map_err(GenericError::ValidationError)?;
    let category = save_category(&pool, &body, meta_data.language)
        .await
        .map_err(|e| category_write_error(e, "saving"))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created category",
        Some(category),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/category/{id}",
    tag = "Admin",
    request_body(content = UpdateCategoryRequest, description = "Request Body"),
    responses(
        (status=200, description= "Updated category", body= GenericResponse<Category>),
        (status=404, description= "Category not found", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("id" = i64, Path, description = "Category id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Update category", skip(pool, meta_data))]
pub async fn update_category(
    path: web::Path<i64>,
    body: UpdateCategoryRequest,
    pool: web::Data<PgPool>,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<Category>>, GenericError> {
    let id = path.into_inner();
    body.validate(id).map_err(GenericError::ValidationError)?;
    let category = update_category_by_id(&pool, id, &body, meta_data.language)
        .await
        .map_err(|e| category_write_error(e, "updating"))?
        .ok_or_else(|| GenericError::DataNotFound(format!("Category {} not found", id)))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated category",
        Some(category),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/category/{id}",
    tag = "Admin",
    responses(
        (status=200, description= "Deleted category", body= GenericResponse<TupleUnit>),
        (status=404, description= "Category not found", body= GenericResponse<TupleUnit>),
    ),
    params(
        ("id" = i64, Path, description = "Category id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    )
)]
#[tracing::instrument(err, name = "Delete category", skip(pool))]
pub async fn delete_category(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    let id = path.into_inner();
    let deleted = delete_category_by_id(&pool, id).await.map_err(|e| {
        GenericError::DatabaseError(
            "Something went wrong while deleting category".to_string(),
            e,
        )
    })?;
    if !deleted {
        return Err(GenericError::DataNotFound(format!(
            "Category {} not found",
            id
        )));
    }
    Ok(web::Json(GenericResponse::success(
        "Successfully deleted category",
        Some(()),
    )))
}
