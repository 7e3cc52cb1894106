pub(crate) mod errors;
pub(crate) mod handlers;
mod models;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
pub(crate) mod utils;
pub use routes::{payment_callback_route, payment_route};
