use config::{self, ConfigError, Environment};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{postgres::PgConnectOptions, ConnectOptions};

use crate::routes::order::schemas::DeliveryMethod;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub application: ApplicationConfig,
    pub secret: SecretSetting,
    pub user: UserSettings,
    pub bog: BogConfig,
    pub delivery: DeliverySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationConfig {
    pub port: u16,
    pub host: String,
    pub workers: usize,
    pub service_name: String,
    pub otel_endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub name: String,
    pub test_name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
}

impl DatabaseConfig {
    pub fn without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.name)
            .log_statements(tracing::log::LevelFilter::Trace)
    }

    pub fn test_with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.test_name)
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Jwt {
    pub secret: SecretString,
    /// Token lifetime in hours.
    pub expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSetting {
    pub jwt: Jwt,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserSettings {
    /// Emails that are registered with the admin role.
    pub admin_list: Vec<String>,
}

impl UserSettings {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_list
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BogConfig {
    pub base_url: String,
    pub oauth_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub callback_url: String,
    pub success_url: String,
    pub fail_url: String,
    pub timeout_milliseconds: u64,
}

impl BogConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

/// Transportation rates in minor currency units per kilogram.
#[derive(Debug, Deserialize, Clone)]
pub struct DeliverySettings {
    pub air_rate_per_kg: i64,
    pub ground_rate_per_kg: i64,
    pub sea_rate_per_kg: i64,
}

impl DeliverySettings {
    pub fn rate_per_kg(&self, method: DeliveryMethod) -> i64 {
        match method {
            DeliveryMethod::Air => self.air_rate_per_kg,
            DeliveryMethod::Ground => self.ground_rate_per_kg,
            DeliveryMethod::Sea => self.sea_rate_per_kg,
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");
    let builder = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("configuration.yaml"),
        ))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("user.admin_list")
                .try_parsing(true),
        )
        .build()?;
    builder.try_deserialize::<Settings>()
}
