use geo_storefront::commands::run_custom_commands;
use geo_storefront::configuration::get_configuration;
use geo_storefront::startup::Application;
use geo_storefront::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let configuration = get_configuration()?;
    let subscriber = get_subscriber(
        configuration.application.service_name.clone(),
        "info".into(),
        std::io::stdout,
        configuration.application.otel_endpoint.as_deref(),
    )?;
    init_subscriber(subscriber)?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        run_custom_commands(args).await?;
    } else {
        let application = Application::build(configuration).await?;
        tracing::info!("Listening on port {}", application.port());
        application.run_until_stopped().await?;
    }
    Ok(())
}
