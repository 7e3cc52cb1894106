use geo_storefront::{
    configuration::get_configuration,
    database::get_connection_pool,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use sqlx::PgPool;

#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub port: u16,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Request with the headers every client call must carry.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .header("x-request-id", uuid::Uuid::new_v4().to_string())
            .header("x-device-id", "integration-test")
    }
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    let test_log = std::env::var("TEST_LOG")
        .map(|value| value == "true")
        .unwrap_or(false);
    let result = if test_log {
        get_subscriber(subscriber_name, default_filter_level, std::io::stdout, None)
            .and_then(init_subscriber)
    } else {
        get_subscriber(subscriber_name, default_filter_level, std::io::sink, None)
            .and_then(init_subscriber)
    };
    result.expect("Failed to initialise tracing.");
});

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.database.name = c.database.test_name.clone();
        c.application.host = "127.0.0.1".to_string();
        c.application.port = 0;
        c.application.workers = 1;
        c
    };
    let application = Application::build(configuration.clone())
        .await
        .expect("Failed to build application.");
    let application_port = application.port();

    let address = format!("http://127.0.0.1:{}", application_port);
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        db_pool: get_connection_pool(&configuration.database),
        port: application_port,
        api_client: reqwest::Client::new(),
    }
}
