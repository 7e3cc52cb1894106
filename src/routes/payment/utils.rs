use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::PaymentError;
use super::models::{PaymentModel, PAYMENT_COLUMNS};
use super::schemas::{
    BankTransferRequest, BogCallback, BogCallbackResult, BogPaymentInitiation, Payment,
};
use crate::payment_client::{
    GatewayBasketItem, GatewayOrderRequest, GatewayPaymentStatus, PaymentGateway,
};
use crate::routes::order::models::OrderModel;
use crate::routes::order::schemas::{OrderStatus, PaymentMethod};
use crate::routes::order::utils::{apply_order_status, fetch_order_by_no, fetch_order_for_update};

#[tracing::instrument(name = "Save payment", skip(transaction))]
pub async fn save_payment(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    amount: i64,
    method: PaymentMethod,
) -> Result<Uuid, anyhow::Error> {
    let payment_id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO payment (id, order_id, amount, status, method, created_on)
        VALUES ($1, $2, $3, $4, $5, NOW())"#,
    )
    .bind(payment_id)
    .bind(order_id)
    .bind(amount)
    .bind(OrderStatus::Pending)
    .bind(method)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving payment")
    })?;
    Ok(payment_id)
}

async fn update_pending_payments(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    status: OrderStatus,
) -> Result<u64, anyhow::Error> {
    let result = sqlx::query(
        "UPDATE payment SET status = $2, updated_on = NOW() WHERE order_id = $1 AND status = $3",
    )
    .bind(order_id)
    .bind(status)
    .bind(OrderStatus::Pending)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while updating payments")
    })?;
    Ok(result.rows_affected())
}

/// Returns the number of payments marked as paid.
#[tracing::instrument(name = "Settle pending payments", skip(transaction))]
pub async fn settle_pending_payments(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> Result<u64, anyhow::Error> {
    update_pending_payments(transaction, order_id, OrderStatus::Paid).await
}

#[tracing::instrument(name = "Cancel pending payments", skip(transaction))]
pub async fn cancel_pending_payments(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> Result<u64, anyhow::Error> {
    update_pending_payments(transaction, order_id, OrderStatus::Cancelled).await
}

#[tracing::instrument(name = "Check pending payment", skip(transaction))]
async fn has_pending_payment(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
) -> Result<bool, anyhow::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM payment WHERE order_id = $1 AND status = $2)",
    )
    .bind(order_id)
    .bind(OrderStatus::Pending)
    .fetch_one(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while checking payments")
    })
}

#[tracing::instrument(name = "Fetch payments", skip(pool))]
pub async fn fetch_payments(pool: &PgPool, order_id: Uuid) -> Result<Vec<Payment>, anyhow::Error> {
    let query = format!(
        "SELECT {} FROM payment WHERE order_id = $1 ORDER BY created_on",
        PAYMENT_COLUMNS
    );
    let rows = sqlx::query_as::<_, PaymentModel>(&query)
        .bind(order_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching payments")
        })?;
    Ok(rows.into_iter().map(|row| row.into_schema()).collect())
}

/// Checks that the order belongs to the user, was placed with `method` and is
/// still waiting for payment.
pub fn validate_order_for_payment(
    order: &OrderModel,
    user_id: Uuid,
    method: PaymentMethod,
) -> Result<(), PaymentError> {
    if order.user_id != user_id {
        return Err(PaymentError::OrderNotFound(order.order_no.clone()));
    }
    if order.payment_method != method {
        return Err(PaymentError::ValidationError(format!(
            "Order {} is not paid with {:?}",
            order.order_no, method
        )));
    }
    if order.status != OrderStatus::Pending {
        return Err(PaymentError::InvalidOrderState(format!(
            "Order {} is {} and can't be paid",
            order.order_no, order.status
        )));
    }
    Ok(())
}

#[tracing::instrument(name = "Save gateway order", skip(transaction))]
async fn save_gateway_order(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    gateway_order_id: &str,
    external_order_id: &str,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"UPDATE customer_order SET gateway_order_id = $2, external_order_id = $3, updated_on = NOW()
        WHERE id = $1"#,
    )
    .bind(order_id)
    .bind(gateway_order_id)
    .bind(external_order_id)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving gateway order")
    })?;
    Ok(())
}

/// Creates the BOG order and links it to ours. A payment rejected by an
/// earlier attempt is replaced with a fresh pending one.
#[tracing::instrument(name = "Initiate BOG payment", skip(pool, gateway))]
pub async fn initiate_bog_payment(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    user_id: Uuid,
    order_no: &str,
) -> Result<BogPaymentInitiation, PaymentError> {
    let order = fetch_order_by_no(pool, order_no)
        .await?
        .ok_or_else(|| PaymentError::OrderNotFound(order_no.to_string()))?;
    validate_order_for_payment(&order, user_id, PaymentMethod::Bog)?;

    let request = GatewayOrderRequest {
        external_order_id: &order.order_no,
        total_amount: order.total_amount,
        basket: order
            .items
            .iter()
            .map(|item| GatewayBasketItem {
                product_id: item.product_id.to_string(),
                description: &item.name,
                quantity: item.quantity,
                unit_price: item.price,
            })
            .collect(),
    };
    let gateway_order = gateway
        .create_order(&request)
        .await
        .map_err(PaymentError::GatewayError)?;

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let order = fetch_order_for_update(&mut transaction, order_no)
        .await?
        .ok_or_else(|| PaymentError::OrderNotFound(order_no.to_string()))?;
    validate_order_for_payment(&order, user_id, PaymentMethod::Bog)?;
    save_gateway_order(
        &mut transaction,
        order.id,
        &gateway_order.gateway_order_id,
        &order.order_no,
    )
    .await?;
    if !has_pending_payment(&mut transaction, order.id).await? {
        save_payment(
            &mut transaction,
            order.id,
            order.total_amount,
            PaymentMethod::Bog,
        )
        .await?;
    }
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to initiate a payment")?;
    Ok(BogPaymentInitiation {
        order_no: order.order_no,
        gateway_order_id: gateway_order.gateway_order_id,
        redirect_url: gateway_order.redirect_url,
    })
}

#[tracing::instrument(name = "Save payment response", skip(transaction, payload))]
async fn save_payment_response(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    payload: &serde_json::Value,
) -> Result<(), anyhow::Error> {
    sqlx::query("UPDATE customer_order SET payment_response = $2, updated_on = NOW() WHERE id = $1")
        .bind(order_id)
        .bind(sqlx::types::Json(payload))
        .execute(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while saving payment response")
        })?;
    Ok(())
}

fn validate_callback_order(order: &OrderModel, callback: &BogCallback) -> Result<(), PaymentError> {
    if order.external_order_id.as_deref() != Some(callback.body.external_order_id.as_str())
        || order.gateway_order_id.as_deref() != Some(callback.body.order_id.as_str())
    {
        return Err(PaymentError::ValidationError(format!(
            "Callback doesn't match the payment of order {}",
            callback.body.external_order_id
        )));
    }
    Ok(())
}

/// Applies a BOG status notification. The notification only says which order
/// changed; its status is taken from the gateway. Completed payments mark the
/// order as paid once and repeated notifications leave it untouched.
#[tracing::instrument(name = "Process BOG callback", skip(pool, gateway, payload), fields(external_order_id = %callback.body.external_order_id))]
pub async fn process_bog_callback(
    pool: &PgPool,
    gateway: &dyn PaymentGateway,
    callback: &BogCallback,
    payload: &serde_json::Value,
) -> Result<BogCallbackResult, PaymentError> {
    let external_order_id = &callback.body.external_order_id;
    let order = fetch_order_by_no(pool, external_order_id)
        .await?
        .ok_or_else(|| PaymentError::OrderNotFound(external_order_id.to_string()))?;
    validate_callback_order(&order, callback)?;

    let gateway_status = gateway
        .fetch_order_status(&callback.body.order_id)
        .await
        .map_err(PaymentError::GatewayError)?;
    if gateway_status != callback.reported_status() {
        tracing::warn!(
            "Callback for order {} reports {:?} but BOG has {:?}",
            order.order_no,
            callback.reported_status(),
            gateway_status
        );
    }

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let order = fetch_order_for_update(&mut transaction, external_order_id)
        .await?
        .ok_or_else(|| PaymentError::OrderNotFound(external_order_id.to_string()))?;
    validate_callback_order(&order, callback)?;
    save_payment_response(&mut transaction, order.id, payload).await?;

    let status = match gateway_status {
        GatewayPaymentStatus::Completed if order.status.is_paid_or_later() => order.status,
        GatewayPaymentStatus::Completed if order.status.can_transition_to(OrderStatus::Paid) => {
            apply_order_status(&mut transaction, &order, OrderStatus::Paid)
                .await?
                .status
        }
        GatewayPaymentStatus::Completed => {
            tracing::warn!(
                "Completed payment received for order {} in status {}",
                order.order_no,
                order.status
            );
            order.status
        }
        GatewayPaymentStatus::Rejected => {
            cancel_pending_payments(&mut transaction, order.id).await?;
            order.status
        }
        GatewayPaymentStatus::InProgress => order.status,
    };
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to apply a payment callback")?;
    Ok(BogCallbackResult {
        order_no: order.order_no,
        status,
    })
}

#[tracing::instrument(name = "Record bank transfer", skip(transaction, request))]
async fn record_bank_transfer(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    request: &BankTransferRequest,
) -> Result<Option<PaymentModel>, anyhow::Error> {
    let query = format!(
        r#"UPDATE payment SET transaction_id = $2, payer_name = $3, bank_name = $4, updated_on = NOW()
        WHERE order_id = $1 AND status = $5
        RETURNING {}"#,
        PAYMENT_COLUMNS
    );
    let row = sqlx::query_as::<_, PaymentModel>(&query)
        .bind(order_id)
        .bind(request.transaction_id.trim())
        .bind(request.payer_name.trim())
        .bind(request.bank_name.trim())
        .bind(OrderStatus::Pending)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while recording bank transfer")
        })?;
    Ok(row)
}

/// Stores the transfer details and hands the order over for manual
/// confirmation.
#[tracing::instrument(name = "Submit bank transfer", skip(pool, request), fields(order_no = %request.order_no))]
pub async fn submit_bank_transfer(
    pool: &PgPool,
    user_id: Uuid,
    request: &BankTransferRequest,
) -> Result<Payment, PaymentError> {
    request.validate().map_err(PaymentError::ValidationError)?;
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let order = fetch_order_for_update(&mut transaction, &request.order_no)
        .await?
        .ok_or_else(|| PaymentError::OrderNotFound(request.order_no.clone()))?;
    validate_order_for_payment(&order, user_id, PaymentMethod::BankTransfer)?;
    let payment = record_bank_transfer(&mut transaction, order.id, request)
        .await?
        .ok_or_else(|| {
            PaymentError::InvalidOrderState(format!(
                "Order {} has no pending payment",
                order.order_no
            ))
        })?;
    apply_order_status(&mut transaction, &order, OrderStatus::Processing).await?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to record a bank transfer")?;
    Ok(payment.into_schema())
}
