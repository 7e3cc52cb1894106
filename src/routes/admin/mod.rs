pub(crate) mod handlers;
mod models;
mod routes;
pub(crate) mod schemas;
#[cfg(test)]
mod tests;
mod utils;
pub use routes::admin_route;
