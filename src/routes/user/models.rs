use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::{UserAccount, UserRole};

#[derive(Debug, FromRow)]
pub struct UserAccountModel {
    pub id: Uuid,
    pub email: String,
    pub mobile_no: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_on: DateTime<Utc>,
}

impl UserAccountModel {
    pub fn into_schema(self) -> UserAccount {
        UserAccount {
            id: self.id,
            email: self.email,
            mobile_no: self.mobile_no,
            display_name: self.display_name,
            role: self.role,
            is_active: self.is_active,
            created_on: self.created_on,
        }
    }
}
