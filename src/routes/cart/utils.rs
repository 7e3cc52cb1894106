use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::CartError;
use super::models::CartItemModel;
use super::schemas::{AddCartItemRequest, Cart, CartItem};
use crate::routes::product::utils::fetch_product_model;
use crate::schemas::Language;

const CART_ITEM_COLUMNS: &str = "product_id, name, price, image, quantity, created_on";
pub const MAX_CART_QUANTITY: i32 = 10_000;

/// Checks a requested line quantity. Zero is only meaningful for updates,
/// where it removes the line.
pub fn validate_quantity(quantity: i32, allow_zero: bool) -> Result<(), String> {
    match quantity {
        q if q < 0 => Err("quantity can't be negative".to_string()),
        0 if !allow_zero => Err("quantity must be positive".to_string()),
        q if q > MAX_CART_QUANTITY => Err(format!(
            "quantity can't exceed {}",
            MAX_CART_QUANTITY
        )),
        _ => Ok(()),
    }
}

pub fn cart_total(items: &[CartItem]) -> Result<i64, anyhow::Error> {
    items.iter().try_fold(0i64, |total, item| {
        item.price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or_else(|| anyhow::anyhow!("Cart total is out of range"))
    })
}

#[tracing::instrument(name = "Fetch cart", skip(pool))]
pub async fn fetch_cart(pool: &PgPool, user_id: Uuid) -> Result<Cart, anyhow::Error> {
    let query = format!(
        "SELECT {} FROM cart_item WHERE user_id = $1 ORDER BY created_on",
        CART_ITEM_COLUMNS
    );
    let rows = sqlx::query_as::<_, CartItemModel>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching cart")
        })?;
    let items: Vec<CartItem> = rows.into_iter().map(|row| row.into_schema()).collect();
    let total = cart_total(&items)?;
    Ok(Cart { items, total })
}

/// Adds the product with its current name, price and first image. Adding a
/// product that is already in the cart increases its quantity.
#[tracing::instrument(name = "Add cart item", skip(pool))]
pub async fn add_cart_item(
    pool: &PgPool,
    user_id: Uuid,
    request: &AddCartItemRequest,
    language: Language,
) -> Result<(), CartError> {
    validate_quantity(request.quantity, false).map_err(CartError::ValidationError)?;
    let product = fetch_product_model(pool, request.product_id)
        .await?
        .filter(|product| product.is_active)
        .ok_or(CartError::ProductNotFound(request.product_id))?;
    let result = sqlx::query(
        r#"INSERT INTO cart_item (id, user_id, product_id, name, price, image, quantity, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        ON CONFLICT (user_id, product_id) DO UPDATE SET
            quantity = cart_item.quantity + EXCLUDED.quantity,
            name = EXCLUDED.name,
            price = EXCLUDED.price,
            image = EXCLUDED.image,
            updated_on = NOW()
        WHERE cart_item.quantity + EXCLUDED.quantity <= $8"#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(product.id)
    .bind(product.localized_name(language))
    .bind(product.price)
    .bind(product.images.first().cloned())
    .bind(request.quantity)
    .bind(MAX_CART_QUANTITY)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving cart item")
    })?;
    if result.rows_affected() == 0 {
        return Err(CartError::ValidationError(format!(
            "quantity can't exceed {}",
            MAX_CART_QUANTITY
        )));
    }
    Ok(())
}

#[tracing::instrument(name = "Update cart item", skip(pool))]
pub async fn update_cart_item(
    pool: &PgPool,
    user_id: Uuid,
    product_id: i64,
    quantity: i32,
) -> Result<(), CartError> {
    validate_quantity(quantity, true).map_err(CartError::ValidationError)?;
    if quantity == 0 {
        return match remove_cart_item(pool, user_id, product_id).await? {
            true => Ok(()),
            false => Err(CartError::ItemNotFound(product_id)),
        };
    }
    let result = sqlx::query(
        r#"UPDATE cart_item SET quantity = $3, updated_on = NOW()
        WHERE user_id = $1 AND product_id = $2"#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while updating cart item")
    })?;
    if result.rows_affected() == 0 {
        return Err(CartError::ItemNotFound(product_id));
    }
    Ok(())
}

#[tracing::instrument(name = "Remove cart item", skip(pool))]
pub async fn remove_cart_item(
    pool: &PgPool,
    user_id: Uuid,
    product_id: i64,
) -> Result<bool, anyhow::Error> {
    let result = sqlx::query("DELETE FROM cart_item WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while removing cart item")
        })?;
    Ok(result.rows_affected() > 0)
}

#[tracing::instrument(name = "Clear cart", skip(pool))]
pub async fn clear_cart(pool: &PgPool, user_id: Uuid) -> Result<(), anyhow::Error> {
    sqlx::query("DELETE FROM cart_item WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while clearing cart")
        })?;
    Ok(())
}

#[tracing::instrument(name = "Lock cart items", skip(transaction))]
pub async fn lock_cart_items(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Vec<CartItemModel>, anyhow::Error> {
    let query = format!(
        "SELECT {} FROM cart_item WHERE user_id = $1 ORDER BY created_on FOR UPDATE",
        CART_ITEM_COLUMNS
    );
    let rows = sqlx::query_as::<_, CartItemModel>(&query)
        .bind(user_id)
        .fetch_all(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while locking cart")
        })?;
    Ok(rows)
}

#[tracing::instrument(name = "Clear cart items", skip(transaction))]
pub async fn clear_cart_items(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<(), anyhow::Error> {
    sqlx::query("DELETE FROM cart_item WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while clearing cart")
        })?;
    Ok(())
}
