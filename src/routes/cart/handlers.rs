use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{AddCartItemRequest, Cart, UpdateCartItemRequest};
use super::utils;
use crate::errors::GenericError;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::{GenericResponse, RequestMetaData};

async fn current_cart(pool: &PgPool, user: &UserAccount) -> Result<Cart, GenericError> {
    utils::fetch_cart(pool, user.id).await.map_err(|e| {
        GenericError::DatabaseError("Something went wrong while fetching cart".to_string(), e)
    })
}

#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Cart of the current user", body= GenericResponse<Cart>),
    )
)]
#[tracing::instrument(err, name = "Fetch cart", skip(pool, user), fields(user_id = %user.id))]
pub async fn fetch_cart(
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Cart>>, GenericError> {
    let cart = current_cart(&pool, &user).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched cart",
        Some(cart),
    )))
}

#[utoipa::path(
    post,
    path = "/api/cart/item",
    tag = "Cart",
    description = "Adds a product to the cart. Its name, price and first image are copied at this point.",
    request_body(content = AddCartItemRequest, description = "Request Body"),
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
        ("x-language" = Option<String>, Header, description = "ka or en"),
    ),
    responses(
        (status=200, description= "Updated cart", body= GenericResponse<Cart>),
        (status=400, description= "Invalid quantity", body= GenericResponse<TupleUnit>),
        (status=404, description= "Product not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Add cart item", skip(pool, user, meta_data), fields(user_id = %user.id))]
pub async fn add_cart_item(
    body: AddCartItemRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
    meta_data: RequestMetaData,
) -> Result<web::Json<GenericResponse<Cart>>, GenericError> {
    utils::add_cart_item(&pool, user.id, &body, meta_data.language).await?;
    let cart = current_cart(&pool, &user).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully added item to cart",
        Some(cart),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/cart/item/{product_id}",
    tag = "Cart",
    request_body(content = UpdateCartItemRequest, description = "Request Body"),
    params(
        ("product_id" = i64, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Updated cart", body= GenericResponse<Cart>),
        (status=404, description= "Product is not in the cart", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Update cart item", skip(pool, user), fields(user_id = %user.id))]
pub async fn update_cart_item(
    path: web::Path<i64>,
    body: UpdateCartItemRequest,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Cart>>, GenericError> {
    utils::update_cart_item(&pool, user.id, path.into_inner(), body.quantity).await?;
    let cart = current_cart(&pool, &user).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated cart",
        Some(cart),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cart/item/{product_id}",
    tag = "Cart",
    params(
        ("product_id" = i64, Path, description = "Product id"),
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Updated cart", body= GenericResponse<Cart>),
        (status=404, description= "Product is not in the cart", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Remove cart item", skip(pool, user), fields(user_id = %user.id))]
pub async fn remove_cart_item(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<Cart>>, GenericError> {
    let product_id = path.into_inner();
    let removed = utils::remove_cart_item(&pool, user.id, product_id)
        .await
        .map_err(|e| {
            GenericError::DatabaseError(
                "Something went wrong while removing cart item".to_string(),
                e,
            )
        })?;
    if !removed {
        return Err(GenericError::DataNotFound(format!(
            "Product {} is not in the cart",
            product_id
        )));
    }
    let cart = current_cart(&pool, &user).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully removed item from cart",
        Some(cart),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    tag = "Cart",
    params(
        ("Authorization" = String, Header, description = "JWT token"),
        ("x-request-id" = String, Header, description = "Request id"),
        ("x-device-id" = String, Header, description = "Device id"),
    ),
    responses(
        (status=200, description= "Cart cleared", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Clear cart", skip(pool, user), fields(user_id = %user.id))]
pub async fn clear_cart(
    pool: web::Data<PgPool>,
    user: UserAccount,
) -> Result<web::Json<GenericResponse<()>>, GenericError> {
    utils::clear_cart(&pool, user.id).await.map_err(|e| {
        GenericError::DatabaseError("Something went wrong while clearing cart".to_string(), e)
    })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully cleared cart",
        Some(()),
    )))
}
