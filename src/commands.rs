use crate::configuration::get_configuration;
use crate::database::{configure_database_using_sqlx, get_connection_pool};
use crate::routes::user::utils::promote_user_to_admin;

#[tracing::instrument(name = "Run custom command")]
pub async fn run_custom_commands(args: Vec<String>) -> Result<(), anyhow::Error> {
    if args.len() < 2 {
        eprintln!("Invalid command. Please provide a valid command.");
        return Ok(());
    }
    let command = args[1].as_str();
    let configuration = get_configuration()?;

    match command {
        "migrate" => {
            configure_database_using_sqlx(&configuration.database).await?;
            tracing::info!("Database migrated.");
        }
        "promote_admin" => {
            let email = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Usage: promote_admin <email>"))?;
            let pool = get_connection_pool(&configuration.database);
            if promote_user_to_admin(&pool, email).await? {
                tracing::info!("{} is now an admin.", email);
            } else {
                eprintln!("No user account found for {}.", email);
            }
        }
        _ => {
            eprintln!("Unknown command: {}. Please use a valid command.", command);
        }
    }

    Ok(())
}
