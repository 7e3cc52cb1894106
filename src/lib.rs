pub mod commands;
pub mod configuration;
pub mod database;
pub mod domain;
pub mod errors;
pub mod middleware;
pub mod openapi;
pub mod payment_client;
pub mod routes;
pub mod schemas;
pub mod startup;
pub mod telemetry;
mod tests;
pub mod utils;
