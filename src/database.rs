use crate::configuration::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, Connection, Executor, PgConnection, PgPool};

pub const UNIQUE_VIOLATION: &str = "23505";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

pub fn get_connection_pool(configuration: &DatabaseConfig) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(
            configuration.acquire_timeout,
        ))
        .max_connections(configuration.max_connections)
        .min_connections(configuration.min_connections)
        .connect_lazy_with(configuration.with_db())
}

/// Postgres error code of a failed query wrapped in `error`, if any.
pub fn database_error_code(error: &anyhow::Error) -> Option<String> {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|e| e.code())
        .map(|code| code.into_owned())
}

#[tracing::instrument(name = "Create database if missing", skip(connection))]
async fn create_database_if_missing(
    connection: &mut PgConnection,
    name: &str,
) -> Result<(), anyhow::Error> {
    let count: i64 =
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM pg_database WHERE datname = $1")
            .bind(name)
            .fetch_one(&mut *connection)
            .await?;
    if count > 0 {
        tracing::info!("Database {} already exists.", name);
    } else {
        connection
            .execute(format!(r#"CREATE DATABASE "{}";"#, name).as_str())
            .await?;
        tracing::info!("Database {} created.", name);
    }
    Ok(())
}

#[tracing::instrument(name = "Create Database", skip(config))]
pub async fn create_database(config: &DatabaseConfig) -> Result<(), anyhow::Error> {
    let mut connection = PgConnection::connect_with(&config.without_db()).await?;
    create_database_if_missing(&mut connection, &config.name).await?;
    create_database_if_missing(&mut connection, &config.test_name).await?;
    Ok(())
}

/// Creates the main and the test database and applies `migrations/` to both.
#[tracing::instrument(name = "Configure database", skip(config))]
pub async fn configure_database_using_sqlx(config: &DatabaseConfig) -> Result<PgPool, anyhow::Error> {
    create_database(config).await?;
    let connection_pool = PgPool::connect_with(config.with_db()).await?;
    sqlx::migrate!("./migrations").run(&connection_pool).await?;

    let test_connection_pool = PgPool::connect_with(config.test_with_db()).await?;
    sqlx::migrate!("./migrations")
        .run(&test_connection_pool)
        .await?;
    Ok(connection_pool)
}

#[cfg(test)]
mod tests {
    use super::database_error_code;

    #[test]
    fn test_non_database_error_has_no_code() {
        let error = anyhow::anyhow!("connection refused");
        assert_eq!(database_error_code(&error), None);
        let error = anyhow::Error::new(sqlx::Error::RowNotFound).context("fetching order");
        assert_eq!(database_error_code(&error), None);
    }
}
