use anyhow::Context;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::{OrderError, OrderStatusError};
use super::models::{OrderModel, ORDER_COLUMNS};
use super::schemas::{CheckoutRequest, Order, OrderLineItem, OrderStatus, ShippingAddress};
use crate::database::{database_error_code, UNIQUE_VIOLATION};
use crate::domain::MobileNo;
use crate::errors::GenericError;
use crate::routes::address::utils::fetch_address;
use crate::routes::cart::utils::{clear_cart_items, lock_cart_items};
use crate::routes::delivery::utils::save_delivery_tracking;
use crate::routes::payment::utils::{
    cancel_pending_payments, save_payment, settle_pending_payments,
};
use crate::routes::user::schemas::UserAccount;

const ORDER_NO_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ORDER_NO_SUFFIX_LEN: usize = 6;
const ORDER_NO_ATTEMPTS: usize = 5;

/// Sum of `price * quantity` over the line items, in minor units.
pub fn compute_total(items: &[OrderLineItem]) -> Result<i64, String> {
    if items.is_empty() {
        return Err("Order must contain at least one item".to_string());
    }
    let mut total: i64 = 0;
    for item in items {
        if item.price <= 0 {
            return Err(format!("Price of product {} must be positive", item.product_id));
        }
        if item.quantity <= 0 {
            return Err(format!(
                "Quantity of product {} must be positive",
                item.product_id
            ));
        }
        total = item
            .price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or_else(|| "Order total is out of range".to_string())?;
    }
    if total <= 0 {
        return Err("Order total must be positive".to_string());
    }
    Ok(total)
}

/// `ORD-YYYYMMDD-XXXXXX` with an unambiguous alphanumeric suffix.
pub fn generate_order_no<R: Rng + ?Sized>(rng: &mut R, date: NaiveDate) -> String {
    let suffix: String = (0..ORDER_NO_SUFFIX_LEN)
        .map(|_| ORDER_NO_CHARSET[rng.random_range(0..ORDER_NO_CHARSET.len())] as char)
        .collect();
    format!("ORD-{}-{}", date.format("%Y%m%d"), suffix)
}

pub fn validate_shipping_address(address: &ShippingAddress) -> Result<ShippingAddress, String> {
    let required = [
        ("recipientName", &address.recipient_name),
        ("city", &address.city),
        ("streetAddress", &address.street_address),
    ];
    if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(format!("shippingAddress.{} is required", name));
    }
    let mobile_no = MobileNo::parse(address.mobile_no.clone())?;
    Ok(ShippingAddress {
        recipient_name: address.recipient_name.trim().to_string(),
        mobile_no: mobile_no.get().to_string(),
        city: address.city.trim().to_string(),
        street_address: address.street_address.trim().to_string(),
        postal_code: address.postal_code.clone(),
    })
}

#[tracing::instrument(name = "Resolve shipping address", skip(pool, request))]
async fn resolve_shipping_address(
    pool: &PgPool,
    user_id: Uuid,
    request: &CheckoutRequest,
) -> Result<ShippingAddress, OrderError> {
    if let Some(address_id) = request.address_id {
        let address = fetch_address(pool, user_id, address_id)
            .await?
            .ok_or_else(|| {
                OrderError::ValidationError(format!("Address {} doesn't exist", address_id))
            })?;
        return Ok(ShippingAddress {
            recipient_name: address.recipient_name,
            mobile_no: address.mobile_no,
            city: address.city,
            street_address: address.street_address,
            postal_code: address.postal_code,
        });
    }
    match &request.shipping_address {
        Some(address) => validate_shipping_address(address).map_err(OrderError::ValidationError),
        None => Err(OrderError::ValidationError(
            "Either addressId or shippingAddress is required".to_string(),
        )),
    }
}

#[tracing::instrument(name = "Save order", skip(transaction, items, shipping_address))]
async fn save_order(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    order_no: &str,
    request: &CheckoutRequest,
    items: &[OrderLineItem],
    total_amount: i64,
    shipping_address: &ShippingAddress,
) -> Result<OrderModel, anyhow::Error> {
    let query = format!(
        r#"INSERT INTO customer_order (id, order_no, user_id, items, total_amount, status, payment_method, delivery_method,
            recipient_name, mobile_no, city, street_address, postal_code, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
        RETURNING {}"#,
        ORDER_COLUMNS
    );
    let row = sqlx::query_as::<_, OrderModel>(&query)
        .bind(Uuid::new_v4())
        .bind(order_no)
        .bind(user_id)
        .bind(sqlx::types::Json(items))
        .bind(total_amount)
        .bind(OrderStatus::Pending)
        .bind(request.payment_method)
        .bind(request.delivery_method)
        .bind(&shipping_address.recipient_name)
        .bind(&shipping_address.mobile_no)
        .bind(&shipping_address.city)
        .bind(&shipping_address.street_address)
        .bind(shipping_address.postal_code.as_deref())
        .fetch_one(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while saving order")
        })?;
    Ok(row)
}

/// Inserts the order and everything created with it in one transaction.
async fn insert_order(
    pool: &PgPool,
    user_id: Uuid,
    order_no: &str,
    request: &CheckoutRequest,
    shipping_address: &ShippingAddress,
) -> Result<OrderModel, OrderError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let items = match &request.items {
        Some(items) => items.clone(),
        None => lock_cart_items(&mut transaction, user_id)
            .await?
            .into_iter()
            .map(|item| item.into_line_item())
            .collect(),
    };
    let total_amount = compute_total(&items).map_err(OrderError::ValidationError)?;

    let order = save_order(
        &mut transaction,
        user_id,
        order_no,
        request,
        &items,
        total_amount,
        shipping_address,
    )
    .await
    .map_err(|e| match database_error_code(&e).as_deref() {
        Some(UNIQUE_VIOLATION) => OrderError::OrderNoTaken(order_no.to_string()),
        _ => OrderError::UnexpectedError(e),
    })?;
    save_payment(
        &mut transaction,
        order.id,
        total_amount,
        request.payment_method,
    )
    .await?;
    save_delivery_tracking(&mut transaction, order.id).await?;
    if request.items.is_none() {
        clear_cart_items(&mut transaction, user_id).await?;
    }
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store a new order")?;
    Ok(order)
}

/// Places the order with numbers drawn from `next_order_no`, moving on to the
/// next number when one is already taken.
pub(crate) async fn create_order_with_numbers<F>(
    pool: &PgPool,
    user_id: Uuid,
    request: &CheckoutRequest,
    mut next_order_no: F,
) -> Result<Order, OrderError>
where
    F: FnMut() -> String,
{
    let shipping_address = resolve_shipping_address(pool, user_id, request).await?;
    let mut attempt = 1;
    loop {
        let order_no = next_order_no();
        match insert_order(pool, user_id, &order_no, request, &shipping_address).await {
            Ok(order) => return Ok(order.into_schema()),
            Err(OrderError::OrderNoTaken(order_no)) if attempt < ORDER_NO_ATTEMPTS => {
                tracing::warn!("Order number {} is taken, retrying", order_no);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Places the order together with its pending payment and delivery tracking
/// row. Items fall back to the cart, which is emptied on success.
#[tracing::instrument(name = "Create order", skip(pool, request))]
pub async fn create_order(
    pool: &PgPool,
    user_id: Uuid,
    request: &CheckoutRequest,
) -> Result<Order, OrderError> {
    create_order_with_numbers(pool, user_id, request, || {
        generate_order_no(&mut rand::rng(), Utc::now().date_naive())
    })
    .await
}

#[tracing::instrument(name = "Fetch order by order number", skip(pool))]
pub async fn fetch_order_by_no(
    pool: &PgPool,
    order_no: &str,
) -> Result<Option<OrderModel>, anyhow::Error> {
    let query = format!("SELECT {} FROM customer_order WHERE order_no = $1", ORDER_COLUMNS);
    let row = sqlx::query_as::<_, OrderModel>(&query)
        .bind(order_no)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching order")
        })?;
    Ok(row)
}

#[tracing::instrument(name = "Fetch order for update", skip(transaction))]
pub async fn fetch_order_for_update(
    transaction: &mut Transaction<'_, Postgres>,
    order_no: &str,
) -> Result<Option<OrderModel>, anyhow::Error> {
    let query = format!(
        "SELECT {} FROM customer_order WHERE order_no = $1 FOR UPDATE",
        ORDER_COLUMNS
    );
    let row = sqlx::query_as::<_, OrderModel>(&query)
        .bind(order_no)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while locking order")
        })?;
    Ok(row)
}

/// Loads an order the user may read: their own, or any order for admins.
/// Other users' orders are reported as missing.
pub async fn fetch_order_for_user(
    pool: &PgPool,
    user: &UserAccount,
    order_no: &str,
) -> Result<OrderModel, GenericError> {
    let order = fetch_order_by_no(pool, order_no).await.map_err(|e| {
        GenericError::DatabaseError("Something went wrong while fetching order".to_string(), e)
    })?;
    match order {
        Some(order) if order.user_id == user.id || user.is_admin() => Ok(order),
        _ => Err(GenericError::DataNotFound(format!(
            "Order {} not found",
            order_no
        ))),
    }
}

#[tracing::instrument(name = "Fetch orders", skip(pool))]
pub async fn fetch_orders(
    pool: &PgPool,
    user_id: Option<Uuid>,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, anyhow::Error> {
    let query = format!(
        r#"SELECT {} FROM customer_order
        WHERE ($1::uuid IS NULL OR user_id = $1) AND ($2::order_status IS NULL OR status = $2)
        ORDER BY created_on DESC
        LIMIT $3 OFFSET $4"#,
        ORDER_COLUMNS
    );
    let rows = sqlx::query_as::<_, OrderModel>(&query)
        .bind(user_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching orders")
        })?;
    Ok(rows.into_iter().map(|row| row.into_schema()).collect())
}

#[tracing::instrument(name = "Update order status", skip(transaction))]
pub async fn update_order_status(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    status: OrderStatus,
) -> Result<OrderModel, anyhow::Error> {
    let query = format!(
        "UPDATE customer_order SET status = $2, updated_on = NOW() WHERE id = $1 RETURNING {}",
        ORDER_COLUMNS
    );
    let row = sqlx::query_as::<_, OrderModel>(&query)
        .bind(order_id)
        .bind(status)
        .fetch_one(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while updating order status")
        })?;
    Ok(row)
}

/// Moves the order to `next` and keeps its pending payments in step.
#[tracing::instrument(name = "Apply order status", skip(transaction, order), fields(order_no = %order.order_no))]
pub async fn apply_order_status(
    transaction: &mut Transaction<'_, Postgres>,
    order: &OrderModel,
    next: OrderStatus,
) -> Result<OrderModel, OrderStatusError> {
    if !order.status.can_transition_to(next) {
        return Err(OrderStatusError::InvalidTransition {
            from: order.status,
            to: next,
        });
    }
    let updated = update_order_status(transaction, order.id, next).await?;
    match next {
        OrderStatus::Paid => {
            if settle_pending_payments(transaction, order.id).await? == 0 {
                return Err(OrderStatusError::NoPendingPayment(order.order_no.clone()));
            }
        }
        OrderStatus::Cancelled => {
            cancel_pending_payments(transaction, order.id).await?;
        }
        _ => {}
    }
    Ok(updated)
}

#[tracing::instrument(name = "Transition order status", skip(pool))]
pub async fn transition_order_status(
    pool: &PgPool,
    order_no: &str,
    next: OrderStatus,
) -> Result<Order, OrderStatusError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let order = fetch_order_for_update(&mut transaction, order_no)
        .await?
        .ok_or_else(|| OrderStatusError::NotFound(order_no.to_string()))?;
    let updated = apply_order_status(&mut transaction, &order, next).await?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to update order status")?;
    Ok(updated.into_schema())
}

/// Customers may only withdraw orders that haven't been processed yet.
#[tracing::instrument(name = "Cancel order", skip(pool))]
pub async fn cancel_order(
    pool: &PgPool,
    user_id: Uuid,
    order_no: &str,
) -> Result<Order, OrderStatusError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let order = fetch_order_for_update(&mut transaction, order_no)
        .await?
        .filter(|order| order.user_id == user_id)
        .ok_or_else(|| OrderStatusError::NotFound(order_no.to_string()))?;
    if order.status != OrderStatus::Pending {
        return Err(OrderStatusError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Cancelled,
        });
    }
    let updated = apply_order_status(&mut transaction, &order, OrderStatus::Cancelled).await?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to cancel an order")?;
    Ok(updated.into_schema())
}
