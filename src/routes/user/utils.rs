use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{AuthError, UserRegistrationError};
use super::models::UserAccountModel;
use super::schemas::{AuthData, AuthenticateRequest, CreateUserAccount, UserAccount, UserRole};
use crate::configuration::{Jwt, UserSettings};
use crate::domain::MobileNo;
use crate::utils::{generate_jwt_token_for_user, spawn_blocking_with_tracing};

const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[tracing::instrument(
    name = "Validate credentials",
    skip(expected_password_hash, password_candidate)
)]
fn verify_password_hash(
    expected_password_hash: SecretString,
    password_candidate: SecretString,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .context("Invalid password.")
        .map_err(AuthError::InvalidCredentials)
}

pub fn compute_password_hash(password: SecretString) -> Result<SecretString, anyhow::Error> {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let params = Params::new(15000, 2, 1, None).map_err(|e| anyhow::anyhow!(e))?;
    let password_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e))?
        .to_string();
    Ok(SecretString::from(password_hash))
}

#[tracing::instrument(name = "Fetch user account by email", skip(pool))]
pub async fn fetch_user_model_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserAccountModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, UserAccountModel>(
        r#"SELECT id, email, mobile_no, display_name, password_hash, role, is_active, created_on
        FROM user_account WHERE email = $1"#,
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching user account")
    })?;
    Ok(row)
}

#[tracing::instrument(name = "Get user account", skip(pool))]
pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<UserAccount>, anyhow::Error> {
    let row = sqlx::query_as::<_, UserAccountModel>(
        r#"SELECT id, email, mobile_no, display_name, password_hash, role, is_active, created_on
        FROM user_account WHERE id = $1"#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching user account")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Validate user credentials", skip(credentials, pool), fields(email = %credentials.email))]
pub async fn validate_user_credentials(
    credentials: AuthenticateRequest,
    pool: &PgPool,
) -> Result<UserAccount, AuthError> {
    let user_model = fetch_user_model_by_email(pool, &credentials.email)
        .await
        .map_err(|e| {
            AuthError::DatabaseError(
                "Something went wrong while fetching user account".to_string(),
                e,
            )
        })?;

    // A missing account still pays for a hash verification so response
    // timing does not reveal which emails are registered.
    let expected_password_hash = user_model
        .as_ref()
        .map(|user| SecretString::from(user.password_hash.clone()))
        .unwrap_or_else(|| SecretString::from(DUMMY_PASSWORD_HASH));
    let password = credentials.password;
    spawn_blocking_with_tracing(move || verify_password_hash(expected_password_hash, password))
        .await
        .context("Failed to spawn blocking task.")??;

    let user = user_model
        .ok_or_else(|| AuthError::InvalidCredentials(anyhow::anyhow!("Unknown email")))?
        .into_schema();
    if !user.is_active {
        return Err(AuthError::InvalidStringCredentials(
            "User is Inactive. Please contact customer support".to_string(),
        ));
    }
    Ok(user)
}

pub fn get_auth_data(user: UserAccount, jwt: &Jwt) -> Result<AuthData, AuthError> {
    let token = generate_jwt_token_for_user(user.id, jwt.expiry, &jwt.secret)?;
    Ok(AuthData { user, token })
}

pub fn role_for_email(user_settings: &UserSettings, email: &str) -> UserRole {
    if user_settings.is_admin_email(email) {
        UserRole::Admin
    } else {
        UserRole::User
    }
}

#[tracing::instrument(name = "Register user account", skip(pool, user_account), fields(email = %user_account.email))]
pub async fn register_user(
    pool: &PgPool,
    user_account: CreateUserAccount,
    role: UserRole,
) -> Result<Uuid, UserRegistrationError> {
    let existing = fetch_user_model_by_email(pool, user_account.email.get())
        .await
        .map_err(|e| {
            UserRegistrationError::DatabaseError(
                "Something went wrong while checking existing user".to_string(),
                e,
            )
        })?;
    if existing.is_some() {
        return Err(UserRegistrationError::DuplicateEmail(
            user_account.email.get().to_string(),
        ));
    }
    if user_account.password.expose_secret().chars().count() < 8 {
        return Err(UserRegistrationError::ValidationError(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    let display_name = user_account.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(UserRegistrationError::ValidationError(
            "Display name is required".to_string(),
        ));
    }

    let password = user_account.password;
    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("Failed to spawn blocking task.")??;

    let user_id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO user_account (id, email, mobile_no, display_name, password_hash, role, is_active, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, true, NOW())"#,
    )
    .bind(user_id)
    .bind(user_account.email.get())
    .bind(user_account.mobile_no.get())
    .bind(&display_name)
    .bind(password_hash.expose_secret())
    .bind(role)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        UserRegistrationError::DatabaseError(
            "Something went wrong while saving user account".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    Ok(user_id)
}

#[tracing::instrument(name = "Update user profile", skip(pool))]
pub async fn update_user_profile(
    pool: &PgPool,
    user_id: Uuid,
    display_name: Option<&str>,
    mobile_no: Option<&MobileNo>,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"UPDATE user_account SET
            display_name = COALESCE($2, display_name),
            mobile_no = COALESCE($3, mobile_no),
            updated_on = NOW()
        WHERE id = $1"#,
    )
    .bind(user_id)
    .bind(display_name)
    .bind(mobile_no.map(|mobile_no| mobile_no.get()))
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while updating user profile")
    })?;
    Ok(())
}

/// Returns `false` when no account matches the email.
#[tracing::instrument(name = "Promote user to admin", skip(pool))]
pub async fn promote_user_to_admin(pool: &PgPool, email: &str) -> Result<bool, anyhow::Error> {
    let result = sqlx::query(
        r#"UPDATE user_account SET role = $2, updated_on = NOW() WHERE email = $1"#,
    )
    .bind(email.trim().to_lowercase())
    .bind(UserRole::Admin)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while promoting user")
    })?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub async fn hard_delete_user_account(pool: &PgPool, user_id: Uuid) -> Result<(), anyhow::Error> {
    sqlx::query("DELETE FROM user_account WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
