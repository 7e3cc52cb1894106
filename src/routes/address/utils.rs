use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::AddressError;
use super::models::AddressModel;
use super::schemas::{Address, CreateAddressRequest, UpdateAddressRequest};
use crate::domain::MobileNo;

const ADDRESS_COLUMNS: &str = "id, user_id, label, recipient_name, mobile_no, city, street_address, postal_code, is_default, created_on";

/// The first address of a user is always the default one.
pub fn should_become_default(requested: bool, existing_count: i64) -> bool {
    requested || existing_count == 0
}

/// Picks the most recently created address to inherit the default flag.
pub fn next_default_candidate(remaining: &[(Uuid, DateTime<Utc>)]) -> Option<Uuid> {
    remaining
        .iter()
        .max_by_key(|(_, created_on)| *created_on)
        .map(|(id, _)| *id)
}

#[tracing::instrument(name = "Fetch addresses", skip(pool))]
pub async fn fetch_addresses(pool: &PgPool, user_id: Uuid) -> Result<Vec<Address>, anyhow::Error> {
    let rows = sqlx::query_as::<_, AddressModel>(&format!(
        "SELECT {} FROM address WHERE user_id = $1 ORDER BY is_default DESC, created_on DESC",
        ADDRESS_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching addresses")
    })?;
    Ok(rows.into_iter().map(|row| row.into_schema()).collect())
}

#[tracing::instrument(name = "Fetch address for update", skip(transaction))]
async fn fetch_address_for_update(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    address_id: Uuid,
) -> Result<Option<AddressModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, AddressModel>(&format!(
        "SELECT {} FROM address WHERE id = $1 AND user_id = $2 FOR UPDATE",
        ADDRESS_COLUMNS
    ))
    .bind(address_id)
    .bind(user_id)
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching address")
    })?;
    Ok(row)
}

/// Locks the owning user account and then every address row of the user.
/// The account lock serializes flows even before the first address exists.
#[tracing::instrument(name = "Lock user addresses", skip(transaction))]
async fn lock_user_addresses(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Vec<(Uuid, DateTime<Utc>)>, anyhow::Error> {
    sqlx::query("SELECT id FROM user_account WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while locking user account")
        })?;
    let rows: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(
        "SELECT id, created_on FROM address WHERE user_id = $1 ORDER BY created_on FOR UPDATE",
    )
    .bind(user_id)
    .fetch_all(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while locking addresses")
    })?;
    Ok(rows)
}

#[tracing::instrument(name = "Clear default address", skip(transaction))]
async fn clear_default_address(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    except_id: Option<Uuid>,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"UPDATE address SET is_default = false, updated_on = NOW()
        WHERE user_id = $1 AND is_default AND ($2::uuid IS NULL OR id <> $2)"#,
    )
    .bind(user_id)
    .bind(except_id)
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while clearing default address")
    })?;
    Ok(())
}

#[tracing::instrument(name = "Mark address as default", skip(transaction))]
async fn mark_default_address(
    transaction: &mut Transaction<'_, Postgres>,
    address_id: Uuid,
) -> Result<(), anyhow::Error> {
    sqlx::query("UPDATE address SET is_default = true, updated_on = NOW() WHERE id = $1")
        .bind(address_id)
        .execute(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while setting default address")
        })?;
    Ok(())
}

#[tracing::instrument(name = "Create address", skip(pool, request))]
pub async fn create_address(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateAddressRequest,
) -> Result<Address, AddressError> {
    request.validate().map_err(AddressError::ValidationError)?;
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let existing = lock_user_addresses(&mut transaction, user_id).await?;
    let is_default = should_become_default(request.is_default, existing.len() as i64);
    if is_default {
        clear_default_address(&mut transaction, user_id, None).await?;
    }
    let row = sqlx::query_as::<_, AddressModel>(&format!(
        r#"INSERT INTO address (id, user_id, label, recipient_name, mobile_no, city, street_address, postal_code, is_default, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        RETURNING {}"#,
        ADDRESS_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(request.label.trim())
    .bind(request.recipient_name.trim())
    .bind(request.mobile_no.get())
    .bind(request.city.trim())
    .bind(request.street_address.trim())
    .bind(request.postal_code.as_deref())
    .bind(is_default)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        AddressError::DatabaseError(
            "Something went wrong while saving address".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store an address")?;
    Ok(row.into_schema())
}

#[tracing::instrument(name = "Update address", skip(pool, request))]
pub async fn update_address(
    pool: &PgPool,
    user_id: Uuid,
    address_id: Uuid,
    request: &UpdateAddressRequest,
) -> Result<Address, AddressError> {
    let mobile_no: Option<MobileNo> = request.validate().map_err(AddressError::ValidationError)?;
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    lock_user_addresses(&mut transaction, user_id).await?;
    fetch_address_for_update(&mut transaction, user_id, address_id)
        .await?
        .ok_or(AddressError::NotFound(address_id))?;
    if request.is_default == Some(true) {
        clear_default_address(&mut transaction, user_id, Some(address_id)).await?;
    }
    let row = sqlx::query_as::<_, AddressModel>(&format!(
        r#"UPDATE address SET
            label = COALESCE($2, label),
            recipient_name = COALESCE($3, recipient_name),
            mobile_no = COALESCE($4, mobile_no),
            city = COALESCE($5, city),
            street_address = COALESCE($6, street_address),
            postal_code = COALESCE($7, postal_code),
            is_default = COALESCE($8, is_default),
            updated_on = NOW()
        WHERE id = $1
        RETURNING {}"#,
        ADDRESS_COLUMNS
    ))
    .bind(address_id)
    .bind(request.label.as_deref().map(str::trim))
    .bind(request.recipient_name.as_deref().map(str::trim))
    .bind(mobile_no.as_ref().map(|mobile_no| mobile_no.get()))
    .bind(request.city.as_deref().map(str::trim))
    .bind(request.street_address.as_deref().map(str::trim))
    .bind(request.postal_code.as_deref())
    .bind(request.is_default)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        AddressError::DatabaseError(
            "Something went wrong while updating address".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to update an address")?;
    Ok(row.into_schema())
}

#[tracing::instrument(name = "Delete address", skip(pool))]
pub async fn delete_address(
    pool: &PgPool,
    user_id: Uuid,
    address_id: Uuid,
) -> Result<(), AddressError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    lock_user_addresses(&mut transaction, user_id).await?;
    let address = fetch_address_for_update(&mut transaction, user_id, address_id)
        .await?
        .ok_or(AddressError::NotFound(address_id))?;
    sqlx::query("DELETE FROM address WHERE id = $1")
        .bind(address_id)
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            AddressError::DatabaseError(
                "Something went wrong while deleting address".to_string(),
                anyhow::Error::new(e),
            )
        })?;
    if address.is_default {
        let remaining = lock_user_addresses(&mut transaction, user_id).await?;
        if let Some(next_id) = next_default_candidate(&remaining) {
            mark_default_address(&mut transaction, next_id).await?;
        }
    }
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to delete an address")?;
    Ok(())
}

#[tracing::instrument(name = "Set default address", skip(pool))]
pub async fn set_default_address(
    pool: &PgPool,
    user_id: Uuid,
    address_id: Uuid,
) -> Result<(), AddressError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    lock_user_addresses(&mut transaction, user_id).await?;
    let address = fetch_address_for_update(&mut transaction, user_id, address_id)
        .await?
        .ok_or(AddressError::NotFound(address_id))?;
    clear_default_address(&mut transaction, user_id, Some(address_id)).await?;
    if !address.is_default {
        mark_default_address(&mut transaction, address_id).await?;
    }
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to set the default address")?;
    Ok(())
}

#[tracing::instrument(name = "Fetch address", skip(pool))]
pub async fn fetch_address(
    pool: &PgPool,
    user_id: Uuid,
    address_id: Uuid,
) -> Result<Option<Address>, anyhow::Error> {
    let row = sqlx::query_as::<_, AddressModel>(&format!(
        "SELECT {} FROM address WHERE id = $1 AND user_id = $2",
        ADDRESS_COLUMNS
    ))
    .bind(address_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching address")
    })?;
    Ok(row.map(|row| row.into_schema()))
}
