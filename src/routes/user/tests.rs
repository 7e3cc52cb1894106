use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use crate::configuration::UserSettings;
use crate::domain::{EmailObject, MobileNo};
use crate::routes::user::schemas::{AuthenticateRequest, CreateUserAccount, UserRole};
use crate::routes::user::utils::{
    compute_password_hash, get_user, hard_delete_user_account, promote_user_to_admin,
    register_user, role_for_email, validate_user_credentials,
};
use crate::tests::tests::get_test_pool;

pub async fn setup_user(pool: &PgPool, email: &str, password: &str) -> Result<Uuid, anyhow::Error> {
    let user_account = CreateUserAccount {
        email: EmailObject::parse(email.to_string()).map_err(anyhow::Error::msg)?,
        mobile_no: MobileNo::parse("599123456".to_string()).map_err(anyhow::Error::msg)?,
        password: SecretString::from(password),
        display_name: "Nino Beridze".to_string(),
    };
    Ok(register_user(pool, user_account, UserRole::User)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?)
}

#[test]
fn test_admin_list_assigns_role() {
    let settings = UserSettings {
        admin_list: vec!["Admin@Storefront.ge".to_string()],
    };
    assert_eq!(role_for_email(&settings, "admin@storefront.ge"), UserRole::Admin);
    assert_eq!(role_for_email(&settings, "nino@storefront.ge"), UserRole::User);
}

#[test]
fn test_password_hash_is_salted() {
    let first = compute_password_hash(SecretString::from("tbilisi-2024")).unwrap();
    let second = compute_password_hash(SecretString::from("tbilisi-2024")).unwrap();
    use secrecy::ExposeSecret;
    assert!(first.expose_secret().starts_with("$argon2id$"));
    assert_ne!(first.expose_secret(), second.expose_secret());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_user_register_authenticate_and_promote() {
    let pool = get_test_pool().await;
    let email = format!("{}@storefront.ge", Uuid::new_v4().simple());
    let user_id = setup_user(&pool, &email, "tbilisi-2024").await.unwrap();

    let duplicate = setup_user(&pool, &email, "tbilisi-2024").await;
    assert!(duplicate.is_err());

    let wrong_password = validate_user_credentials(
        AuthenticateRequest {
            email: email.clone(),
            password: SecretString::from("batumi-2024"),
        },
        &pool,
    )
    .await;
    assert!(wrong_password.is_err());

    let user = validate_user_credentials(
        AuthenticateRequest {
            email: email.to_uppercase(),
            password: SecretString::from("tbilisi-2024"),
        },
        &pool,
    )
    .await
    .unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(user.role, UserRole::User);

    assert!(promote_user_to_admin(&pool, &email).await.unwrap());
    let user = get_user(&pool, user_id).await.unwrap().unwrap();
    assert!(user.is_admin());

    hard_delete_user_account(&pool, user_id).await.unwrap();
}
