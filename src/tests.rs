#[cfg(test)]
pub mod tests {
    use crate::configuration::get_configuration;
    use crate::routes::user::schemas::{UserAccount, UserRole};
    use chrono::Utc;
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;
    use uuid::Uuid;

    pub async fn get_test_pool() -> PgPool {
        let configuration = get_configuration().expect("Failed to read configuration.");
        PgPoolOptions::new()
            .max_connections(configuration.database.max_connections)
            .connect_with(configuration.database.test_with_db())
            .await
            .expect("Failed to connect to the test database.")
    }

    pub fn get_dummy_user_account(role: UserRole) -> UserAccount {
        UserAccount {
            id: Uuid::new_v4(),
            email: "nino@storefront.ge".to_string(),
            mobile_no: "599123456".to_string(),
            display_name: "Nino Beridze".to_string(),
            role,
            is_active: true,
            created_on: Utc::now(),
        }
    }
}
