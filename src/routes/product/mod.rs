pub(crate) mod handlers;
pub(crate) mod models;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
pub(crate) mod utils;
pub use routes::product_route;
