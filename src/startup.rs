use crate::configuration::{DeliverySettings, SecretSetting, Settings, UserSettings};
use crate::database::get_connection_pool;
use crate::middleware::SaveRequestResponse;
use crate::payment_client::{BogClient, PaymentGateway};
use crate::routes::main_route;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let payment_gateway: Arc<dyn PaymentGateway> =
            Arc::new(BogClient::new(&configuration.bog)?);
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            payment_gateway,
            configuration.secret,
            configuration.user,
            configuration.delivery,
            configuration.application.workers,
        )?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    // Only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn run(
    listener: TcpListener,
    db_pool: PgPool,
    payment_gateway: Arc<dyn PaymentGateway>,
    secret: SecretSetting,
    user_setting: UserSettings,
    delivery_setting: DeliverySettings,
    workers: usize,
) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(db_pool);
    let payment_gateway = web::Data::new(payment_gateway);
    let secret_obj = web::Data::new(secret);
    let user_setting_obj = web::Data::new(user_setting);
    let delivery_setting_obj = web::Data::new(delivery_setting);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(SaveRequestResponse)
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(db_pool.clone())
            .app_data(payment_gateway.clone())
            .app_data(secret_obj.clone())
            .app_data(user_setting_obj.clone())
            .app_data(delivery_setting_obj.clone())
            .configure(main_route)
    })
    .workers(workers)
    .listen(listener)?
    .run();

    Ok(server)
}
